// tests/common/mod.rs
// Shared fixtures: in-memory stores, seeded products, scripted NLU mock.
#![allow(dead_code)] // not every test binary uses every fixture

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use teller::catalog::CatalogStore;
use teller::dialogue::{AskPolicy, ChatTurn, Orchestrator, ScoringWeights};
use teller::error::{TellerError, TellerResult};
use teller::nlu::{ExtractedFacts, NluService, TypeDecision};
use teller::products::{PoolLimits, ProductStore, ProductType};

/// Single-connection in-memory pool: with more than one connection each
/// would get its own empty database.
pub async fn memory_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite")
}

pub async fn init_stores(pool: &SqlitePool) -> (ProductStore, CatalogStore) {
    let products = ProductStore::new(pool.clone());
    products.init_schema().await.expect("products schema");

    let catalog = CatalogStore::new(pool.clone());
    catalog.init_schema().await.expect("catalog schema");
    catalog.ensure_seeds().await.expect("catalog seeds");

    (products, catalog)
}

pub async fn insert_product(
    pool: &SqlitePool,
    id: &str,
    product_type: ProductType,
    provider: &str,
    name: &str,
    rate: f64,
    condition_raw: &str,
) {
    sqlx::query(
        r#"
        INSERT INTO products (id, product_type, provider, name, rate, condition_raw, is_active, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, 1, '2026-01-01T00:00:00Z')
        "#,
    )
    .bind(id)
    .bind(product_type.as_str())
    .bind(provider)
    .bind(name)
    .bind(rate)
    .bind(condition_raw)
    .execute(pool)
    .await
    .expect("insert product");
}

/// Three savings products whose condition text exercises several seeded
/// catalog keys.
pub async fn seed_savings_products(pool: &SqlitePool) {
    insert_product(
        pool,
        "s1",
        ProductType::Savings,
        "Alpha Bank",
        "Alpha Dream Saver",
        3.4,
        "Bonus rate for salary transfer and monthly credit card spend",
    )
    .await;
    insert_product(
        pool,
        "s2",
        ProductType::Savings,
        "Beta Bank",
        "Beta Youth Saver",
        3.9,
        "Extra rate for youth customers signing up via mobile app with marketing consent",
    )
    .await;
    insert_product(
        pool,
        "s3",
        ProductType::Savings,
        "Gamma Bank",
        "Gamma Easy Saver",
        2.9,
        "",
    )
    .await;
}

/// Scripted NLU double. Each call pops the next scripted response; an empty
/// script degrades to the same safe defaults the real client uses when the
/// model output is unusable.
#[derive(Default)]
pub struct MockNlu {
    pub facts: Mutex<VecDeque<ExtractedFacts>>,
    pub decisions: Mutex<VecDeque<TypeDecision>>,
}

impl MockNlu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_facts(&self, facts: ExtractedFacts) {
        self.facts.lock().unwrap().push_back(facts);
    }

    pub fn push_decision(&self, decision: TypeDecision) {
        self.decisions.lock().unwrap().push_back(decision);
    }
}

#[async_trait]
impl NluService for MockNlu {
    async fn extract_facts(
        &self,
        _product_type: ProductType,
        _last_question_key: Option<&str>,
        _user_message: &str,
    ) -> TellerResult<ExtractedFacts> {
        Ok(self
            .facts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }

    async fn classify_product_type(
        &self,
        _user_message: &str,
        _history: &[ChatTurn],
    ) -> TellerResult<TypeDecision> {
        Ok(self
            .decisions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(TypeDecision::fallback_ask))
    }
}

/// NLU double that is always rate limited, for outage-path tests.
pub struct BusyNlu;

#[async_trait]
impl NluService for BusyNlu {
    async fn extract_facts(
        &self,
        _product_type: ProductType,
        _last_question_key: Option<&str>,
        _user_message: &str,
    ) -> TellerResult<ExtractedFacts> {
        Err(TellerError::NluBusy {
            retry_after_secs: 300,
        })
    }

    async fn classify_product_type(
        &self,
        _user_message: &str,
        _history: &[ChatTurn],
    ) -> TellerResult<TypeDecision> {
        Err(TellerError::NluBusy {
            retry_after_secs: 300,
        })
    }
}

pub fn build_orchestrator(
    products: ProductStore,
    catalog: CatalogStore,
    nlu: Arc<dyn NluService>,
) -> Orchestrator {
    Orchestrator::new(
        products,
        catalog,
        nlu,
        ScoringWeights::default(),
        AskPolicy::default(),
        PoolLimits::default(),
    )
}
