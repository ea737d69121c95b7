// src/catalog/store.rs

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::warn;

use super::types::{ConditionCatalog, ConditionEntry};
use super::validate::{GateError, GatePolicy, ProposedEntry, validate_proposed};
use crate::error::TellerResult;

/// Sqlite-backed condition catalog.
///
/// Rows are append-only; deactivation flips `is_active` and entries are never
/// rewritten in place. Load order is insertion order (rowid), which is the
/// priority order the matcher and question selection rely on.
#[derive(Clone)]
pub struct CatalogStore {
    pool: SqlitePool,
}

impl CatalogStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn init_schema(&self) -> TellerResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS condition_catalog (
                key TEXT PRIMARY KEY,
                patterns_json TEXT NOT NULL,
                question TEXT NOT NULL,
                explain TEXT DEFAULT NULL,
                is_active INTEGER NOT NULL DEFAULT 1,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Install the baseline catalog entries when absent. Existing rows are
    /// never touched, so curator-admitted entries survive restarts.
    pub async fn ensure_seeds(&self) -> TellerResult<()> {
        let now = Utc::now().to_rfc3339();
        for entry in seed_entries() {
            let patterns_json =
                serde_json::to_string(&entry.patterns).unwrap_or_else(|_| "[]".to_string());
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO condition_catalog
                    (key, patterns_json, question, explain, is_active, updated_at)
                VALUES (?, ?, ?, ?, 1, ?)
                "#,
            )
            .bind(&entry.key)
            .bind(&patterns_json)
            .bind(&entry.question)
            .bind(&entry.explain)
            .bind(&now)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    /// Load the active catalog in insertion order.
    ///
    /// Rows whose pattern list fails to parse or parses empty are skipped:
    /// an active entry without patterns can never match and only confuses
    /// question selection.
    pub async fn load_active(&self) -> TellerResult<ConditionCatalog> {
        let rows = sqlx::query_as::<_, (String, String, String, Option<String>)>(
            r#"
            SELECT key, patterns_json, question, explain
            FROM condition_catalog
            WHERE is_active = 1
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut entries = Vec::with_capacity(rows.len());
        for (key, patterns_json, question, explain) in rows {
            let patterns: Vec<String> = serde_json::from_str::<Vec<String>>(&patterns_json)
                .unwrap_or_default()
                .into_iter()
                .filter(|p| !p.trim().is_empty())
                .collect();
            if patterns.is_empty() {
                warn!("skipping condition '{}': no usable patterns", key);
                continue;
            }
            entries.push(ConditionEntry {
                key,
                patterns,
                question,
                explain: explain.unwrap_or_default(),
            });
        }

        Ok(ConditionCatalog::new(entries))
    }

    /// Curator append path: validate a proposal against the current active
    /// catalog and insert it when it passes the gate. The inner `Result`
    /// carries the gate decision; store failures stay in the outer one.
    pub async fn admit_proposed(
        &self,
        proposed: &ProposedEntry,
        policy: &GatePolicy,
    ) -> TellerResult<Result<ConditionEntry, GateError>> {
        let existing = self.load_active().await?;
        let entry = match validate_proposed(proposed, &existing, policy) {
            Ok(entry) => entry,
            Err(reason) => return Ok(Err(reason)),
        };

        let patterns_json =
            serde_json::to_string(&entry.patterns).unwrap_or_else(|_| "[]".to_string());
        sqlx::query(
            r#"
            INSERT INTO condition_catalog
                (key, patterns_json, question, explain, is_active, updated_at)
            VALUES (?, ?, ?, ?, 1, ?)
            "#,
        )
        .bind(&entry.key)
        .bind(&patterns_json)
        .bind(&entry.question)
        .bind(&entry.explain)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(Ok(entry))
    }
}

/// Baseline eligibility criteria observed across the product registry.
fn seed_entries() -> Vec<ConditionEntry> {
    let entry = |key: &str, patterns: &[&str], question: &str, explain: &str| ConditionEntry {
        key: key.to_string(),
        patterns: patterns.iter().map(|p| p.to_string()).collect(),
        question: question.to_string(),
        explain: explain.to_string(),
    };

    vec![
        entry(
            "salary_transfer",
            &["salary transfer", "payroll", "salary deposit", "paycheck"],
            "Can you have your salary paid into an account at this bank? (yes/no/not sure)",
            "Salary transfer means your employer pays your wages into an account held at the issuing bank.",
        ),
        entry(
            "auto_transfer",
            &["auto transfer", "automatic transfer", "auto debit", "standing order"],
            "Can you set up an automatic monthly transfer for the deposits? (yes/no/not sure)",
            "",
        ),
        entry(
            "card_spend",
            &["card spend", "card usage", "credit card", "check card", "debit card"],
            "Can you hit a monthly spending target on the bank's card? (yes/no/not sure)",
            "Card spend conditions grant the bonus rate when you spend above a set amount on the bank's card each month.",
        ),
        entry(
            "primary_bank",
            &["primary bank", "main bank", "transaction history", "banking activity"],
            "Can you make this your primary bank (transfers and bill payments in one place)? (yes/no/not sure)",
            "",
        ),
        entry(
            "non_face",
            &["mobile app", "online", "internet", "digital", "app-only"],
            "Are you okay signing up through the mobile app instead of a branch? (yes/no/not sure)",
            "",
        ),
        entry(
            "youth",
            &["youth", "under 34", "aged 19", "first jobber", "young adult"],
            "Do you qualify for youth benefits (roughly ages 19-34)? (yes/no/not sure)",
            "",
        ),
        entry(
            "marketing",
            &["marketing consent", "marketing opt-in", "promotional messages"],
            "Are you fine opting into marketing messages? (yes/no/not sure)",
            "",
        ),
    ]
}
