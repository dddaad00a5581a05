// Tests for database functionality

use tempfile::TempDir;
use urltree_core::data::{Database, SlotStore};

fn create_test_db() -> (TempDir, Database) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let db = Database::new(&db_path).unwrap();
    (temp_dir, db)
}

// ============================================================================
// Database Creation Tests
// ============================================================================

#[test]
fn test_database_creation() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    let db = Database::new(&db_path);
    assert!(db.is_ok());
    assert!(db_path.exists());
}

#[test]
fn test_database_exists() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    assert!(!Database::exists(&db_path));

    let _db = Database::new(&db_path).unwrap();
    assert!(Database::exists(&db_path));
}

#[test]
fn test_database_drop() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    let db = Database::new(&db_path).unwrap();
    drop(db);
    assert!(Database::exists(&db_path));

    Database::drop(&db_path).unwrap();
    assert!(!Database::exists(&db_path));
}

#[test]
fn test_database_reopen_keeps_schema() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    {
        let db = Database::new(&db_path).unwrap();
        db.put_slot("linkTree", "[]").unwrap();
    }

    let db = Database::new(&db_path).unwrap();
    assert_eq!(db.get_slot("linkTree").unwrap(), Some("[]".to_string()));
}

// ============================================================================
// Slot Tests
// ============================================================================

#[test]
fn test_get_missing_slot() {
    let (_temp_dir, db) = create_test_db();
    assert_eq!(db.get_slot("nothing").unwrap(), None);
    assert_eq!(db.slot_updated_at("nothing").unwrap(), None);
}

#[test]
fn test_put_and_get_slot() {
    let (_temp_dir, db) = create_test_db();

    db.put_slot("selectedLinks", r#"[{"id":"1"}]"#).unwrap();
    assert_eq!(
        db.get_slot("selectedLinks").unwrap().as_deref(),
        Some(r#"[{"id":"1"}]"#)
    );
    assert!(db.slot_updated_at("selectedLinks").unwrap().unwrap() > 0);
}

#[test]
fn test_put_slot_overwrites() {
    let (_temp_dir, db) = create_test_db();

    db.put_slot("linkTree", "[1]").unwrap();
    db.put_slot("linkTree", "[2]").unwrap();

    assert_eq!(db.get_slot("linkTree").unwrap().as_deref(), Some("[2]"));

    let count: i64 = db
        .get_connection()
        .query_row("SELECT COUNT(*) FROM slots", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn test_delete_slot() {
    let (_temp_dir, db) = create_test_db();

    db.put_slot("linkTree", "[]").unwrap();
    assert!(db.delete_slot("linkTree").unwrap());
    assert!(!db.delete_slot("linkTree").unwrap());
    assert_eq!(db.get_slot("linkTree").unwrap(), None);
}

#[test]
fn test_slot_store_trait() {
    let mut db = Database::in_memory().unwrap();

    assert_eq!(SlotStore::get(&db, "k").unwrap(), None);
    SlotStore::put(&mut db, "k", "v").unwrap();
    assert_eq!(SlotStore::get(&db, "k").unwrap().as_deref(), Some("v"));
}
