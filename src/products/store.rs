// src/products/store.rs

use serde::Serialize;
use sqlx::SqlitePool;

use super::types::{Candidate, ProductType};
use crate::error::TellerResult;

/// Rate ordering for catalog queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSort {
    Asc,
    Desc,
}

impl RateSort {
    /// What "best rate first" means for a product type: highest first for
    /// savings-like products, lowest first for loans.
    pub fn best_first(product_type: ProductType) -> Self {
        if product_type.is_loan() {
            RateSort::Asc
        } else {
            RateSort::Desc
        }
    }

    fn order_clause(&self) -> &'static str {
        match self {
            RateSort::Asc => "rate ASC",
            RateSort::Desc => "rate DESC",
        }
    }
}

/// One page of the catalog browsing endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ProductPage {
    pub items: Vec<Candidate>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
}

/// Read-only access to the synchronized product catalog.
///
/// The sync job owns all writes; this store only creates the table shape it
/// expects and queries active rows.
#[derive(Clone)]
pub struct ProductStore {
    pool: SqlitePool,
}

impl ProductStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn init_schema(&self) -> TellerResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id TEXT PRIMARY KEY,
                product_type TEXT NOT NULL,
                provider TEXT NOT NULL,
                name TEXT NOT NULL,
                rate REAL NOT NULL DEFAULT 0,
                condition_raw TEXT NOT NULL DEFAULT '',
                is_active INTEGER NOT NULL DEFAULT 1,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Top products by representative rate, best first for the product type.
    pub async fn top_by_rate(
        &self,
        product_type: ProductType,
        limit: u32,
    ) -> TellerResult<Vec<Candidate>> {
        let sort = RateSort::best_first(product_type);
        let sql = format!(
            r#"
            SELECT id, provider, name, rate, condition_raw
            FROM products
            WHERE product_type = ? AND is_active = 1
            ORDER BY {}
            LIMIT ?
            "#,
            sort.order_clause()
        );

        let rows = sqlx::query_as::<_, Candidate>(&sql)
            .bind(product_type.as_str())
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Top products by raw condition-text length, a cheap proxy for "has rich
    /// eligibility structure". Ties break toward the better rate.
    pub async fn top_by_condition_text(
        &self,
        product_type: ProductType,
        limit: u32,
    ) -> TellerResult<Vec<Candidate>> {
        let sort = RateSort::best_first(product_type);
        let sql = format!(
            r#"
            SELECT id, provider, name, rate, condition_raw
            FROM products
            WHERE product_type = ? AND is_active = 1
            ORDER BY LENGTH(condition_raw) DESC, {}
            LIMIT ?
            "#,
            sort.order_clause()
        );

        let rows = sqlx::query_as::<_, Candidate>(&sql)
            .bind(product_type.as_str())
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Paginated catalog listing for the browsing endpoint.
    ///
    /// `page` is 1-based; `page_size` is clamped to 1..=50. An empty `query`
    /// matches everything, otherwise provider and product name are filtered
    /// by substring.
    pub async fn list_page(
        &self,
        product_type: ProductType,
        page: u32,
        page_size: u32,
        sort: Option<RateSort>,
        query: &str,
    ) -> TellerResult<ProductPage> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, 50);
        let offset = (page - 1) * page_size;
        let sort = sort.unwrap_or_else(|| RateSort::best_first(product_type));
        let query = query.trim();

        let filter = if query.is_empty() {
            ""
        } else {
            " AND (provider LIKE ? OR name LIKE ?)"
        };
        let like = format!("%{}%", query);

        let sql = format!(
            r#"
            SELECT id, provider, name, rate, condition_raw
            FROM products
            WHERE product_type = ? AND is_active = 1{}
            ORDER BY {}
            LIMIT ? OFFSET ?
            "#,
            filter,
            sort.order_clause()
        );

        let mut select = sqlx::query_as::<_, Candidate>(&sql).bind(product_type.as_str());
        if !query.is_empty() {
            select = select.bind(like.clone()).bind(like.clone());
        }
        let items = select.bind(page_size).bind(offset).fetch_all(&self.pool).await?;

        let count_sql = format!(
            "SELECT COUNT(*) FROM products WHERE product_type = ? AND is_active = 1{}",
            filter
        );
        let mut count = sqlx::query_as::<_, (i64,)>(&count_sql).bind(product_type.as_str());
        if !query.is_empty() {
            count = count.bind(like.clone()).bind(like);
        }
        let (total,) = count.fetch_one(&self.pool).await?;

        Ok(ProductPage {
            items,
            total,
            page,
            page_size,
        })
    }
}
