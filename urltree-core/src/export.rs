// Rendering of exported selections and trees

use crate::model::{ExportedSelection, SelectionTreeNode, UrlNode};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Text,
    Json,
    Csv,
    Markdown,
}

impl ExportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ExportFormat::Text),
            "json" => Some(ExportFormat::Json),
            "csv" => Some(ExportFormat::Csv),
            "markdown" | "md" => Some(ExportFormat::Markdown),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Markdown => "md",
        }
    }
}

pub fn render_export(
    format: ExportFormat,
    items: &[ExportedSelection],
) -> Result<String, serde_json::Error> {
    match format {
        ExportFormat::Json => generate_json_export(items),
        ExportFormat::Csv => Ok(generate_csv_export(items)),
        ExportFormat::Markdown => Ok(generate_markdown_export(items)),
        ExportFormat::Text => Ok(generate_text_export(items)),
    }
}

pub fn generate_json_export(items: &[ExportedSelection]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(items)
}

pub fn generate_csv_export(items: &[ExportedSelection]) -> String {
    let mut out = String::from("id,url,title,description\n");
    for item in items {
        out.push_str(&format!(
            "{},{},{},{}\n",
            csv_field(&item.id),
            csv_field(&item.url),
            csv_field(&item.title),
            csv_field(item.description.as_deref().unwrap_or("")),
        ));
    }
    out
}

pub fn generate_markdown_export(items: &[ExportedSelection]) -> String {
    let mut out = String::from("# Selected links\n\n");
    if items.is_empty() {
        out.push_str("_No links selected._\n");
        return out;
    }
    for item in items {
        out.push_str(&format!("- [{}]({})", markdown_text(&item.title), item.url));
        if let Some(ref description) = item.description {
            out.push_str(&format!(" - {}", markdown_text(description)));
        }
        out.push('\n');
    }
    out
}

pub fn generate_text_export(items: &[ExportedSelection]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Selected links: {}\n\n", items.len()));
    for (idx, item) in items.iter().enumerate() {
        out.push_str(&format!("[{}] {}\n", idx + 1, item.title));
        out.push_str(&format!("    {}\n", item.url));
        if let Some(ref description) = item.description {
            out.push_str(&format!("    {}\n", description));
        }
    }
    out
}

/// Box-drawing view of the selection projection.
pub fn generate_selection_tree_text(nodes: &[SelectionTreeNode]) -> String {
    if nodes.is_empty() {
        return "  (empty)\n".to_string();
    }
    let mut out = String::new();
    write_selection_level(nodes, "", &mut out);
    out
}

fn write_selection_level(nodes: &[SelectionTreeNode], prefix: &str, out: &mut String) {
    for (i, node) in nodes.iter().enumerate() {
        let is_last = i == nodes.len() - 1;
        let branch = if is_last { "└── " } else { "├── " };
        let marker = if node.children.is_empty() {
            ""
        } else if node.is_expanded {
            "[-] "
        } else {
            "[+] "
        };
        out.push_str(&format!("{}{}{}{}  {}\n", prefix, branch, marker, node.title, node.url));

        if node.is_expanded {
            let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
            write_selection_level(&node.children, &child_prefix, out);
        }
    }
}

/// Box-drawing view of the stored link tree. Selected nodes are starred.
pub fn generate_link_tree_text(nodes: &[UrlNode]) -> String {
    if nodes.is_empty() {
        return "  (empty)\n".to_string();
    }
    let mut out = String::new();
    write_link_level(nodes, "", &mut out);
    out
}

fn write_link_level(nodes: &[UrlNode], prefix: &str, out: &mut String) {
    for (i, node) in nodes.iter().enumerate() {
        let is_last = i == nodes.len() - 1;
        let branch = if is_last { "└── " } else { "├── " };
        let star = if node.is_selected { "* " } else { "" };
        let kind = node
            .link_type
            .map(|t| format!(" [{}]", t.as_str()))
            .unwrap_or_default();
        out.push_str(&format!(
            "{}{}{}{}{}  {}\n",
            prefix, branch, star, node.label, kind, node.url
        ));

        let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
        write_link_level(&node.children, &child_prefix, out);
    }
}

pub fn save_export(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn markdown_text(value: &str) -> String {
    value.replace('[', "\\[").replace(']', "\\]")
}
