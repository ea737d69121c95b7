// tests/catalog_gate.rs
// Curator admission path against a real (file-backed) catalog store.

use sqlx::sqlite::SqlitePoolOptions;
use tempfile::TempDir;

use teller::catalog::{CatalogStore, GateError, GatePolicy, ProposedEntry};

async fn file_store(dir: &TempDir) -> CatalogStore {
    let db_path = dir.path().join("catalog.db");
    let url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .expect("file sqlite");

    let store = CatalogStore::new(pool);
    store.init_schema().await.expect("schema");
    store.ensure_seeds().await.expect("seeds");
    store
}

fn proposal(key: &str) -> ProposedEntry {
    ProposedEntry {
        key: key.to_string(),
        patterns: vec!["pension top-up".into(), "retirement match".into()],
        question: "Does your employer match retirement contributions? (yes/no/not sure)".into(),
        explain: String::new(),
        confidence: 0.9,
    }
}

#[tokio::test]
async fn seeds_load_in_insertion_order() {
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir).await;

    let catalog = store.load_active().await.unwrap();
    assert!(!catalog.is_empty());

    let keys: Vec<&str> = catalog.iter().map(|e| e.key.as_str()).collect();
    assert_eq!(keys[0], "salary_transfer");
    // Seeding twice must not duplicate or reorder.
    store.ensure_seeds().await.unwrap();
    let again = store.load_active().await.unwrap();
    let keys_again: Vec<&str> = again.iter().map(|e| e.key.as_str()).collect();
    assert_eq!(keys, keys_again);
}

#[tokio::test]
async fn admitted_proposal_becomes_visible_after_the_gate() {
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir).await;
    let policy = GatePolicy::default();

    let before = store.load_active().await.unwrap().len();

    let outcome = store
        .admit_proposed(&proposal("employer_match"), &policy)
        .await
        .unwrap();
    let entry = outcome.expect("proposal should pass the gate");
    assert_eq!(entry.key, "employer_match");

    let catalog = store.load_active().await.unwrap();
    assert_eq!(catalog.len(), before + 1);
    // Appended at the end: the active catalog is append-only.
    let last = catalog.iter().last().unwrap();
    assert_eq!(last.key, "employer_match");

    // Same key again: rejected by the gate, not a store error.
    let duplicate = store
        .admit_proposed(&proposal("employer_match"), &policy)
        .await
        .unwrap();
    assert_eq!(
        duplicate,
        Err(GateError::DuplicateKey("employer_match".into()))
    );
}

#[tokio::test]
async fn low_confidence_proposal_is_rejected_without_insert() {
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir).await;

    let mut weak = proposal("weak_signal");
    weak.confidence = 0.2;

    let outcome = store
        .admit_proposed(&weak, &GatePolicy::default())
        .await
        .unwrap();
    assert_eq!(outcome, Err(GateError::LowConfidence));

    let catalog = store.load_active().await.unwrap();
    assert!(catalog.get("weak_signal").is_none());
}
