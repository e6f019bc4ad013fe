//! Runs a validated list query against a store.

use std::time::{Duration, Instant};

use crate::observability::metrics;
use crate::query::filters::Filters;
use crate::query::pagination::Metadata;
use crate::store::{ListStore, Record, StoreError};

/// Rows for one page plus the metadata describing it.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<R> {
    pub rows: Vec<R>,
    pub metadata: Metadata,
}

/// Execute one list round trip bounded by `deadline`.
///
/// On timeout the store future is dropped, which cancels it.
pub async fn execute<R: Record>(
    entity: &'static str,
    store: &dyn ListStore<R>,
    filter: &R::Filter,
    filters: &Filters<R::Column>,
    deadline: Duration,
) -> Result<ListPage<R>, StoreError> {
    let start = Instant::now();

    let result = match tokio::time::timeout(deadline, store.list(filter, filters)).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout(deadline)),
    };

    metrics::record_list_query(entity, result.is_ok(), start);

    let page = result?;
    tracing::debug!(
        entity,
        rows = page.rows.len(),
        total_records = page.total_records,
        order_by = %filters.sort.order_by(),
        "List query complete"
    );

    Ok(ListPage {
        metadata: Metadata::compute(page.total_records, filters.page, filters.page_size),
        rows: page.rows,
    })
}
