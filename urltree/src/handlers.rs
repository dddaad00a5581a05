use anyhow::{Context, bail};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;
use url::Url;
use urltree_core::LinkTreeStore;
use urltree_core::data::Database;
use urltree_core::export::{
    ExportFormat, generate_link_tree_text, generate_selection_tree_text, render_export,
    save_export,
};
use urltree_core::extract::{extract_url, generate_extraction_report};
use urltree_core::model::{SelectedLink, stable_id};
use urltree_core::tree::{build_link_tree, count_nodes, find};
use urltree_scanner::{Extraction, Fetcher, LinkType};

use crate::server::{self, AppState};

pub const DATABASE_FILE: &str = "urltree.db";

pub fn resolve_data_dir(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

pub fn database_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DATABASE_FILE)
}

/// Open the store backed by the database in `data_dir` and load the last
/// snapshot. Without a database the store runs with no persistence medium.
pub fn open_store(data_dir: &Path) -> anyhow::Result<LinkTreeStore> {
    let db_path = database_path(data_dir);
    if !Database::exists(&db_path) {
        warn!(
            "No database at {}, changes will not be saved (run `urltree init`)",
            db_path.display()
        );
        return Ok(LinkTreeStore::new());
    }

    let db = Database::new(&db_path)
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;
    let mut store = LinkTreeStore::with_slots(Box::new(db));
    store.restore();
    Ok(store)
}

/// Store an extraction of `url` in the link tree: under node `parent` when
/// given, otherwise as a fresh tree. Returns the number of nodes added.
///
/// The parent node must be the page that was fetched.
pub fn save_extraction(
    store: &mut LinkTreeStore,
    url: &str,
    extraction: &Extraction,
    parent: Option<&str>,
) -> anyhow::Result<usize> {
    match parent {
        Some(parent_id) => {
            let Some(node) = find(store.tree(), parent_id) else {
                bail!("No node with id {} in the stored link tree", parent_id);
            };
            if node.url != url {
                bail!(
                    "Node {} is {}, not the extracted page {}",
                    parent_id,
                    node.url,
                    url
                );
            }
            store.expand_node(parent_id, extraction);
            Ok(extraction.count)
        }
        None => {
            let root = build_link_tree(url, extraction);
            let added = count_nodes(std::slice::from_ref(&root));
            store.set_tree(vec![root]);
            Ok(added)
        }
    }
}

/// Select the extracted links of `kind` (all when `None`), nested under the
/// page they were found on. Returns how many were newly selected.
pub fn select_extracted(
    store: &mut LinkTreeStore,
    page_url: &str,
    extraction: &Extraction,
    kind: Option<LinkType>,
) -> usize {
    let level = find(store.tree(), &stable_id(page_url))
        .map(|node| node.level + 1)
        .unwrap_or(1);

    extraction
        .links
        .iter()
        .filter(|record| kind.is_none_or(|kind| record.link_type == kind))
        .map(|record| SelectedLink::from_record(record, Some(page_url), level))
        .map(|link| store.add_to_selection(link))
        .filter(|added| *added)
        .count()
}

/// Build a selection for `url`. Values missing from the arguments come from
/// the matching node of the link tree when there is one.
pub fn selection_from_args(
    store: &LinkTreeStore,
    url: &str,
    title: Option<&str>,
    parent_url: Option<&str>,
    level: Option<u32>,
    description: Option<&str>,
) -> SelectedLink {
    let mut link = match find(store.tree(), &stable_id(url)) {
        Some(node) => SelectedLink::from_node(node),
        None => SelectedLink::new(url, url),
    };

    if let Some(title) = title {
        link.title = title.to_string();
    }
    if let Some(parent_url) = parent_url {
        link = link.with_parent_url(parent_url);
    }
    if let Some(level) = level {
        link = link.with_level(level);
    }
    if let Some(description) = description {
        link = link.with_description(description);
    }
    link
}

/// Apply an add or toggle. Returns whether the link is selected afterwards.
pub fn apply_selection(store: &mut LinkTreeStore, link: SelectedLink, toggle: bool) -> bool {
    if toggle {
        store.toggle_selection(link)
    } else {
        let id = link.id.clone();
        store.add_to_selection(link);
        store.is_selected(&id)
    }
}

pub fn render_selections(store: &LinkTreeStore, format: ExportFormat) -> anyhow::Result<String> {
    render_export(format, &store.export_selections()).context("Failed to render selections")
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

fn print_prompt(msg: &str) -> anyhow::Result<String> {
    print!("{} ", msg.bright_cyan().bold());
    io::stdout().flush()?;
    let mut response = String::new();
    io::stdin().read_line(&mut response)?;
    Ok(response.trim().to_lowercase())
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(message.to_string());
    spinner
}

fn persist(store: &mut LinkTreeStore) -> anyhow::Result<()> {
    store.persist().context("Failed to save the link tree")
}

fn parse_link_kind(raw: &str) -> Option<LinkType> {
    match raw {
        "internal" => Some(LinkType::Internal),
        "external" => Some(LinkType::External),
        _ => None,
    }
}

pub fn handle_init(args: &ArgMatches, data_dir: &Path) -> anyhow::Result<()> {
    print_divider();
    println!("{}", "  URLTREE INITIALIZATION".bright_white().bold());
    print_divider();
    println!();

    let force = args.get_flag("force");
    let data_dir = args
        .get_one::<String>("PATH")
        .map(|raw| resolve_data_dir(raw))
        .unwrap_or_else(|| data_dir.to_path_buf());
    let db_path = database_path(&data_dir);

    println!(
        "{} Target: {}",
        "→".blue(),
        data_dir.display().to_string().bright_white()
    );
    println!();

    if Database::exists(&db_path) {
        if !force {
            println!("{}", "⚠ WARNING".yellow().bold());
            println!("Database already exists at:");
            println!(
                "  {} {}",
                "•".yellow(),
                db_path.display().to_string().bright_white()
            );
            println!();
            println!(
                "{}",
                "Overwriting it discards the stored link tree and selections.".yellow()
            );

            let response = print_prompt("Do you want to continue? [y/N]:")?;
            println!();

            if response != "y" && response != "yes" {
                println!("{} Initialization cancelled.", "✗".red().bold());
                return Ok(());
            }
        }

        Database::drop(&db_path)
            .with_context(|| format!("Failed to remove {}", db_path.display()))?;
        println!("{} Existing database removed", "✓".green().bold());
    }

    println!("{} Creating directory structure...", "→".blue());
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create {}", data_dir.display()))?;

    println!("{} Creating database...", "→".blue());
    Database::new(&db_path)
        .with_context(|| format!("Failed to create database {}", db_path.display()))?;

    println!();
    print_divider();
    println!("{}", "  INITIALIZATION COMPLETE".green().bold());
    print_divider();
    println!();
    println!(
        "{} Database: {}",
        "✓".green().bold(),
        db_path.display().to_string().bright_white()
    );
    println!();
    Ok(())
}

pub async fn handle_extract(args: &ArgMatches, data_dir: &Path) -> anyhow::Result<()> {
    let url = args
        .get_one::<Url>("url")
        .context("--url is required")?
        .to_string();
    let format = args.get_one::<String>("format").map(String::as_str).unwrap_or("text");
    let save = args.get_flag("save");
    let parent = args.get_one::<String>("parent").map(String::as_str);
    let select = args.get_one::<String>("select").map(String::as_str);

    let fetcher = Fetcher::new()?;
    let progress = spinner(&format!("Extracting links from {}", url));
    let result = extract_url(&fetcher, &url).await;
    progress.finish_and_clear();
    let extraction = result.with_context(|| format!("Extraction from {} failed", url))?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&extraction)?);
    } else {
        print!("{}", generate_extraction_report(&extraction, &url));
    }

    if !save && select.is_none() {
        return Ok(());
    }

    let mut store = open_store(data_dir)?;
    let added = if save {
        Some(save_extraction(&mut store, &url, &extraction, parent)?)
    } else {
        None
    };
    let selected =
        select.map(|raw| select_extracted(&mut store, &url, &extraction, parse_link_kind(raw)));
    persist(&mut store)?;

    if !store.has_medium() {
        eprintln!(
            "{} Nothing saved: no database in {} (run `urltree init`)",
            "⚠".yellow().bold(),
            data_dir.display().to_string().bright_white()
        );
        return Ok(());
    }
    if let Some(added) = added {
        eprintln!(
            "{} Saved {} nodes to the link tree",
            "✓".green().bold(),
            added.to_string().cyan()
        );
    }
    if let Some(selected) = selected {
        eprintln!(
            "{} Selected {} new links",
            "✓".green().bold(),
            selected.to_string().cyan()
        );
    }
    Ok(())
}

pub async fn handle_serve(args: &ArgMatches) -> anyhow::Result<()> {
    let addr = args
        .get_one::<SocketAddr>("bind")
        .copied()
        .context("--bind is required")?;
    let state = AppState::new(Fetcher::new()?);

    eprintln!(
        "{} Serving POST /api/extract-urls on {}",
        "→".blue(),
        format!("http://{}", addr).bright_white()
    );
    server::serve(addr, state).await
}

pub fn handle_tree_show(data_dir: &Path) -> anyhow::Result<()> {
    let store = open_store(data_dir)?;
    if store.tree().is_empty() {
        println!("{} The link tree is empty", "ℹ".blue());
        return Ok(());
    }
    print!("{}", generate_link_tree_text(store.tree()));
    println!();
    println!(
        "{} nodes, {} selected",
        count_nodes(store.tree()).to_string().cyan(),
        store.selected_count().to_string().cyan()
    );
    Ok(())
}

pub fn handle_tree_clear(data_dir: &Path) -> anyhow::Result<()> {
    let mut store = open_store(data_dir)?;
    store.clear();
    persist(&mut store)?;
    println!("{} Link tree cleared", "✓".green().bold());
    Ok(())
}

pub fn handle_select_add(args: &ArgMatches, data_dir: &Path, toggle: bool) -> anyhow::Result<()> {
    let url = args
        .get_one::<Url>("url")
        .context("--url is required")?
        .to_string();
    Fetcher::validate_url(&url)?;

    let mut store = open_store(data_dir)?;
    let link = selection_from_args(
        &store,
        &url,
        args.get_one::<String>("title").map(String::as_str),
        args.get_one::<String>("parent-url").map(String::as_str),
        args.get_one::<u32>("level").copied(),
        args.get_one::<String>("description").map(String::as_str),
    );
    let title = link.title.clone();
    let selected = apply_selection(&mut store, link, toggle);
    persist(&mut store)?;

    if selected {
        println!(
            "{} Selected {} {}",
            "✓".green().bold(),
            title.bright_white(),
            url.bright_black()
        );
    } else {
        println!("{} Deselected {}", "✓".green().bold(), url.bright_black());
    }
    Ok(())
}

pub fn handle_select_remove(args: &ArgMatches, data_dir: &Path) -> anyhow::Result<()> {
    let id = args.get_one::<String>("id").context("--id is required")?;
    let mut store = open_store(data_dir)?;

    if !store.remove_selection(id) {
        println!("{} No selected link with id {}", "✗".red().bold(), id);
        return Ok(());
    }
    persist(&mut store)?;
    println!("{} Removed {}", "✓".green().bold(), id);
    Ok(())
}

pub fn handle_select_list(data_dir: &Path) -> anyhow::Result<()> {
    let store = open_store(data_dir)?;
    println!(
        "{} {}",
        "Selected links:".bright_blue().bold(),
        store.selected_count().to_string().cyan()
    );
    print!("{}", generate_selection_tree_text(store.selection_tree()));
    Ok(())
}

pub fn handle_select_clear(data_dir: &Path) -> anyhow::Result<()> {
    let mut store = open_store(data_dir)?;
    let removed = store.selected_count();
    store.clear_selections();
    persist(&mut store)?;
    println!("{} Cleared {} selected links", "✓".green().bold(), removed);
    Ok(())
}

pub fn handle_select_export(args: &ArgMatches, data_dir: &Path) -> anyhow::Result<()> {
    let raw_format = args.get_one::<String>("format").map(String::as_str).unwrap_or("json");
    let Some(format) = ExportFormat::from_str(raw_format) else {
        bail!("Unknown export format: {}", raw_format);
    };

    let store = open_store(data_dir)?;
    let content = render_selections(&store, format)?;

    match args.get_one::<PathBuf>("output") {
        Some(path) => {
            save_export(&content, path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "{} Exported {} links to {}",
                "✓".green().bold(),
                store.selected_count(),
                path.display().to_string().bright_white()
            );
        }
        None => println!("{}", content),
    }
    Ok(())
}
