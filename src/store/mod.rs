//! Persistence collaborator used by the list endpoints.
//!
//! # Data Flow
//! ```text
//! validated Filters + entity filter
//!     → ListStore::list (one round trip, cancellable by dropping)
//!     → ordered rows bounded by (offset, limit) + window count
//! ```
//!
//! The store applies the sort clause it is handed; it never sees the raw
//! `sort` query parameter.

pub mod memory;
pub mod seed;

use std::cmp::Ordering;
use std::time::Duration;

use futures_util::future::BoxFuture;
use thiserror::Error;

use crate::query::filters::Filters;
use crate::query::sort::SortColumn;

pub use memory::MemoryStore;
pub use seed::{load_seed, Seed, SeedError};

/// Failures surfaced by a store. Conflicts and missing records pass
/// through to the client unchanged; everything else is a server fault.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store did not answer within {0:?}")]
    Timeout(Duration),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("edit conflict")]
    EditConflict,

    #[error("record not found")]
    RecordNotFound,
}

/// A page of rows plus the number of rows matching the filter overall.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<R> {
    pub rows: Vec<R>,
    pub total_records: u64,
}

/// An entity the list engine can filter and order.
pub trait Record: Clone + Send + Sync + 'static {
    /// Closed set of columns this entity may be sorted by.
    type Column: SortColumn;

    /// Free-text and list filters for this entity.
    type Filter: Send + Sync;

    fn id(&self) -> i64;

    /// Compare two rows on one column, ascending.
    fn compare_by(&self, other: &Self, column: Self::Column) -> Ordering;

    fn matches(&self, filter: &Self::Filter) -> bool;
}

/// List query collaborator.
pub trait ListStore<R: Record>: Send + Sync {
    fn list<'a>(
        &'a self,
        filter: &'a R::Filter,
        filters: &'a Filters<R::Column>,
    ) -> BoxFuture<'a, Result<Page<R>, StoreError>>;
}
