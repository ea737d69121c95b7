//! Product catalog access
//!
//! Read side of the synchronized product catalog. The sync job that ingests
//! the upstream registry writes these tables out of process; this module only
//! queries them and assembles candidate pools for ranking.

mod pool;
mod store;
mod types;

pub use pool::{PoolLimits, build_pool, cap_per_provider, dedupe_candidates};
pub use store::{ProductPage, ProductStore, RateSort};
pub use types::{Candidate, ProductType};
