use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use urltree_scanner::{LinkRecord, LinkType};
use uuid::Uuid;

/// Stable identifier for a URL: the same URL always maps to the same id.
pub fn stable_id(url: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, url.as_bytes()).to_string()
}

/// A node of the full discovered link tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlNode {
    pub id: String,
    pub label: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<UrlNode>,
    #[serde(default)]
    pub is_selected: bool,
    #[serde(default)]
    pub is_expanded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub depth: u32,
    #[serde(default)]
    pub is_loading: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_url: Option<String>,
    #[serde(default)]
    pub level: u32,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<LinkType>,
}

impl UrlNode {
    pub fn root(url: &str) -> Self {
        Self {
            id: stable_id(url),
            label: url.to_string(),
            url: url.to_string(),
            children: Vec::new(),
            is_selected: false,
            is_expanded: true,
            parent: None,
            depth: 0,
            is_loading: false,
            parent_url: None,
            level: 0,
            link_type: None,
        }
    }

    pub fn from_record(record: &LinkRecord, parent: &UrlNode) -> Self {
        Self {
            id: stable_id(&record.url),
            label: record.text.clone(),
            url: record.url.clone(),
            children: Vec::new(),
            is_selected: false,
            is_expanded: false,
            parent: Some(parent.id.clone()),
            depth: parent.depth + 1,
            is_loading: false,
            parent_url: Some(parent.url.clone()),
            level: parent.level + 1,
            link_type: Some(record.link_type),
        }
    }
}

/// A link the user promoted into the flat selection list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedLink {
    pub id: String,
    pub url: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_url: Option<String>,
    pub level: u32,
    pub added_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SelectedLink {
    pub fn new(url: &str, title: &str) -> Self {
        Self {
            id: stable_id(url),
            url: url.to_string(),
            title: title.to_string(),
            parent_url: None,
            level: 0,
            added_at: Utc::now(),
            description: None,
        }
    }

    pub fn from_record(record: &LinkRecord, parent_url: Option<&str>, level: u32) -> Self {
        Self {
            parent_url: parent_url.map(str::to_string),
            level,
            ..Self::new(&record.url, &record.text)
        }
    }

    pub fn from_node(node: &UrlNode) -> Self {
        Self {
            id: node.id.clone(),
            parent_url: node.parent_url.clone(),
            level: node.level,
            ..Self::new(&node.url, &node.label)
        }
    }

    pub fn with_parent_url(mut self, parent_url: impl Into<String>) -> Self {
        self.parent_url = Some(parent_url.into());
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Serializable snapshot handed out by `export_selections`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedSelection {
    pub id: String,
    pub url: String,
    pub title: String,
    pub description: Option<String>,
}

impl From<&SelectedLink> for ExportedSelection {
    fn from(link: &SelectedLink) -> Self {
        Self {
            id: link.id.clone(),
            url: link.url.clone(),
            title: link.title.clone(),
            description: link.description.clone(),
        }
    }
}

/// Nested projection of the selection list, grouped by `parent_url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionTreeNode {
    pub id: String,
    pub url: String,
    pub title: String,
    pub added_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_url: Option<String>,
    pub level: u32,
    pub children: Vec<SelectionTreeNode>,
    pub is_expanded: bool,
}
