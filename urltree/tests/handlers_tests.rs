use tempfile::TempDir;
use urltree::handlers::*;
use urltree_core::LinkTreeStore;
use urltree_core::data::Database;
use urltree_core::export::ExportFormat;
use urltree_core::model::SelectedLink;
use urltree_scanner::{Extraction, LinkRecord, LinkType};

fn sample_extraction() -> Extraction {
    Extraction::new(vec![
        LinkRecord {
            url: "https://example.com/about".to_string(),
            text: "About us".to_string(),
            link_type: LinkType::Internal,
        },
        LinkRecord {
            url: "https://other.com/".to_string(),
            text: "Other".to_string(),
            link_type: LinkType::External,
        },
    ])
}

fn init_data_dir() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    Database::new(&database_path(temp_dir.path())).unwrap();
    temp_dir
}

#[test]
fn test_resolve_data_dir_expands_tilde() {
    let resolved = resolve_data_dir("~/.config/urltree/");
    assert!(!resolved.to_string_lossy().starts_with('~'));
    assert!(resolved.ends_with(".config/urltree"));

    assert_eq!(
        resolve_data_dir("/tmp/urltree"),
        std::path::PathBuf::from("/tmp/urltree")
    );
}

#[test]
fn test_database_path() {
    let path = database_path(std::path::Path::new("/data"));
    assert_eq!(path, std::path::PathBuf::from("/data/urltree.db"));
}

#[test]
fn test_open_store_without_database_has_no_medium() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = open_store(temp_dir.path()).unwrap();
    assert!(!store.has_medium());
    store.add_to_selection(SelectedLink::new("https://example.com/", "Home"));

    assert!(store.persist().is_ok());
    assert!(!Database::exists(&database_path(temp_dir.path())));
}

#[test]
fn test_save_extraction_replaces_tree() {
    let mut store = LinkTreeStore::new();
    let added = save_extraction(&mut store, "https://example.com/", &sample_extraction(), None)
        .unwrap();

    assert_eq!(added, 3);
    assert_eq!(store.tree().len(), 1);
    assert_eq!(store.tree()[0].url, "https://example.com/");
    assert_eq!(store.tree()[0].children.len(), 2);
}

#[test]
fn test_save_extraction_under_parent() {
    let mut store = LinkTreeStore::new();
    save_extraction(&mut store, "https://example.com/", &sample_extraction(), None).unwrap();
    let about_id = store.tree()[0].children[0].id.clone();

    let nested = Extraction::new(vec![LinkRecord {
        url: "https://example.com/about/team".to_string(),
        text: "Team".to_string(),
        link_type: LinkType::Internal,
    }]);
    let added = save_extraction(
        &mut store,
        "https://example.com/about",
        &nested,
        Some(&about_id),
    )
    .unwrap();

    assert_eq!(added, 1);
    assert_eq!(store.tree().len(), 1);
    assert_eq!(store.tree()[0].children[0].children[0].label, "Team");
}

#[test]
fn test_save_extraction_unknown_parent_fails() {
    let mut store = LinkTreeStore::new();
    let result = save_extraction(
        &mut store,
        "https://example.com/",
        &sample_extraction(),
        Some("missing"),
    );
    assert!(result.is_err());
    assert!(store.tree().is_empty());
}

#[test]
fn test_selection_from_args_uses_tree_node() {
    let mut store = LinkTreeStore::new();
    save_extraction(&mut store, "https://example.com/", &sample_extraction(), None).unwrap();

    let link = selection_from_args(&store, "https://example.com/about", None, None, None, None);
    assert_eq!(link.title, "About us");
    assert_eq!(link.parent_url.as_deref(), Some("https://example.com/"));
    assert_eq!(link.level, 1);
    assert_eq!(link.id, store.tree()[0].children[0].id);
}

#[test]
fn test_selection_from_args_overrides() {
    let store = LinkTreeStore::new();
    let link = selection_from_args(
        &store,
        "https://example.com/x",
        Some("X"),
        Some("https://example.com/"),
        Some(2),
        Some("note"),
    );

    assert_eq!(link.title, "X");
    assert_eq!(link.parent_url.as_deref(), Some("https://example.com/"));
    assert_eq!(link.level, 2);
    assert_eq!(link.description.as_deref(), Some("note"));

    let bare = selection_from_args(&store, "https://example.com/y", None, None, None, None);
    assert_eq!(bare.title, "https://example.com/y");
    assert_eq!(bare.parent_url, None);
}

#[test]
fn test_apply_selection_add_and_toggle() {
    let mut store = LinkTreeStore::new();
    let link = SelectedLink::new("https://example.com/", "Home");

    assert!(apply_selection(&mut store, link.clone(), false));
    assert!(apply_selection(&mut store, link.clone(), false));
    assert_eq!(store.selected_count(), 1);

    assert!(!apply_selection(&mut store, link.clone(), true));
    assert!(!store.has_selections());
    assert!(apply_selection(&mut store, link, true));
}

#[test]
fn test_render_selections() {
    let mut store = LinkTreeStore::new();
    store.add_to_selection(SelectedLink::new("https://example.com/", "Home"));

    let json = render_selections(&store, ExportFormat::Json).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed[0]["url"], "https://example.com/");
    assert_eq!(parsed[0]["title"], "Home");

    let csv = render_selections(&store, ExportFormat::Csv).unwrap();
    assert!(csv.starts_with("id,url,title,description"));
}

#[test]
fn test_state_survives_between_commands() {
    let data_dir = init_data_dir();

    {
        let mut store = open_store(data_dir.path()).unwrap();
        save_extraction(&mut store, "https://example.com/", &sample_extraction(), None).unwrap();
        let link = selection_from_args(&store, "https://example.com/about", None, None, None, None);
        apply_selection(&mut store, link, false);
        store.persist().unwrap();
    }

    let store = open_store(data_dir.path()).unwrap();
    assert_eq!(store.tree()[0].children.len(), 2);
    assert_eq!(store.selected_count(), 1);
    assert!(store.tree()[0].children[0].is_selected);
    assert_eq!(store.selection_tree().len(), 1);
}

#[test]
fn test_open_store_with_database_has_medium() {
    let data_dir = init_data_dir();
    assert!(open_store(data_dir.path()).unwrap().has_medium());
}

#[test]
fn test_save_extraction_rejects_parent_of_other_page() {
    let mut store = LinkTreeStore::new();
    save_extraction(&mut store, "https://example.com/", &sample_extraction(), None).unwrap();
    let about_id = store.tree()[0].children[0].id.clone();

    let nested = Extraction::new(vec![LinkRecord {
        url: "https://example.com/contact/form".to_string(),
        text: "Form".to_string(),
        link_type: LinkType::Internal,
    }]);
    let result = save_extraction(
        &mut store,
        "https://example.com/contact",
        &nested,
        Some(&about_id),
    );

    assert!(result.is_err());
    assert!(store.tree()[0].children[0].children.is_empty());
}

#[test]
fn test_select_extracted_promotes_records() {
    let mut store = LinkTreeStore::new();
    let extraction = sample_extraction();
    save_extraction(&mut store, "https://example.com/", &extraction, None).unwrap();

    let added = select_extracted(&mut store, "https://example.com/", &extraction, None);
    assert_eq!(added, 2);

    let first = &store.selections()[0];
    assert_eq!(first.url, "https://example.com/about");
    assert_eq!(first.title, "About us");
    assert_eq!(first.parent_url.as_deref(), Some("https://example.com/"));
    assert_eq!(first.level, 1);
    assert!(store.tree()[0].children.iter().all(|node| node.is_selected));

    assert_eq!(
        select_extracted(&mut store, "https://example.com/", &extraction, None),
        0
    );
}

#[test]
fn test_select_extracted_filters_by_kind() {
    let mut store = LinkTreeStore::new();
    let added = select_extracted(
        &mut store,
        "https://example.com/",
        &sample_extraction(),
        Some(LinkType::External),
    );

    assert_eq!(added, 1);
    assert_eq!(store.selections()[0].url, "https://other.com/");
}
