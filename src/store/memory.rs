//! In-process store.

use std::sync::{PoisonError, RwLock};

use futures_util::future::{BoxFuture, FutureExt};

use crate::query::filters::Filters;
use crate::query::sort::{SortColumn, SortDirection};
use crate::store::{ListStore, Page, Record, StoreError};

/// Rows held in memory behind a read-write lock.
pub struct MemoryStore<R> {
    rows: RwLock<Vec<R>>,
}

impl<R: Record> MemoryStore<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn query(&self, filter: &R::Filter, filters: &Filters<R::Column>) -> Page<R> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);

        let mut matched: Vec<&R> = rows.iter().filter(|r| r.matches(filter)).collect();

        let column = filters.sort.column();
        let direction = filters.sort.direction();
        matched.sort_by(|a, b| {
            let primary = a.compare_by(b, column);
            let primary = match direction {
                SortDirection::Asc => primary,
                SortDirection::Desc => primary.reverse(),
            };
            primary.then_with(|| a.compare_by(b, <R::Column as SortColumn>::TIE_BREAK))
        });

        let total = matched.len() as u64;
        let offset = usize::try_from(filters.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(filters.limit()).unwrap_or(usize::MAX);

        let page: Vec<R> = matched.into_iter().skip(offset).take(limit).cloned().collect();

        // Window-count semantics: the count rides on the returned rows, so a
        // page past the end reports no matches at all.
        let total_records = if page.is_empty() { 0 } else { total };

        Page {
            rows: page,
            total_records,
        }
    }
}

impl<R: Record> ListStore<R> for MemoryStore<R> {
    fn list<'a>(
        &'a self,
        filter: &'a R::Filter,
        filters: &'a Filters<R::Column>,
    ) -> BoxFuture<'a, Result<Page<R>, StoreError>> {
        async move { Ok(self.query(filter, filters)) }.boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QueryConfig;
    use crate::models::movie::{self, Movie, MovieFilter, Runtime};
    use crate::query::filters::{validate, QueryParams};
    use crate::query::sort::SortSafelist;

    fn film(id: i64, title: &str, year: i32) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            year,
            runtime: Runtime(100),
            genres: vec!["drama".to_string()],
            version: 1,
        }
    }

    fn store() -> MemoryStore<Movie> {
        MemoryStore::new(vec![
            film(1, "Alpha", 2001),
            film(2, "Beta", 1999),
            film(3, "Gamma", 2001),
            film(4, "Delta", 2001),
            film(5, "Epsilon", 1999),
        ])
    }

    async fn list(store: &MemoryStore<Movie>, params: QueryParams) -> Page<Movie> {
        let filters = validate(&params, &movie::sort_safelist(), &QueryConfig::default()).unwrap();
        store.list(&MovieFilter::default(), &filters).await.unwrap()
    }

    fn ids(page: &Page<Movie>) -> Vec<i64> {
        page.rows.iter().map(|m| m.id).collect()
    }

    #[tokio::test]
    async fn test_ties_break_on_id() {
        let store = store();

        let page = list(&store, QueryParams::from([("sort", "-year")])).await;
        assert_eq!(ids(&page), [1, 3, 4, 2, 5]);

        let page = list(&store, QueryParams::from([("sort", "year")])).await;
        assert_eq!(ids(&page), [2, 5, 1, 3, 4]);
    }

    #[tokio::test]
    async fn test_pages_partition_the_ordering() {
        let store = store();
        let mut seen = Vec::new();
        for page in ["1", "2", "3"] {
            let params = QueryParams::from([("sort", "-year"), ("page_size", "2"), ("page", page)]);
            let result = list(&store, params).await;
            assert_eq!(result.total_records, 5);
            seen.extend(ids(&result));
        }
        assert_eq!(seen, [1, 3, 4, 2, 5]);
    }

    #[tokio::test]
    async fn test_page_past_end_has_no_count() {
        let store = store();
        let page = list(&store, QueryParams::from([("page", "9")])).await;
        assert!(page.rows.is_empty());
        assert_eq!(page.total_records, 0);
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum SkuColumn {
        Code,
        Price,
    }

    impl SortColumn for SkuColumn {
        const TIE_BREAK: Self = SkuColumn::Code;

        fn identifier(self) -> &'static str {
            match self {
                SkuColumn::Code => "code",
                SkuColumn::Price => "price",
            }
        }
    }

    #[derive(Debug, Clone)]
    struct Sku {
        id: i64,
        code: &'static str,
        price: u32,
    }

    impl Record for Sku {
        type Column = SkuColumn;
        type Filter = ();

        fn id(&self) -> i64 {
            self.id
        }

        fn compare_by(&self, other: &Self, column: SkuColumn) -> std::cmp::Ordering {
            match column {
                SkuColumn::Code => self.code.cmp(other.code),
                SkuColumn::Price => self.price.cmp(&other.price),
            }
        }

        fn matches(&self, _filter: &()) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_ties_break_on_declared_column() {
        let store = MemoryStore::new(vec![
            Sku { id: 1, code: "c", price: 10 },
            Sku { id: 2, code: "a", price: 10 },
            Sku { id: 3, code: "b", price: 5 },
            Sku { id: 4, code: "d", price: 10 },
        ]);
        let safelist = SortSafelist::from_columns(&[("code", SkuColumn::Code), ("price", SkuColumn::Price)]);
        let params = QueryParams::from([("sort", "-price")]);
        let filters = validate(&params, &safelist, &QueryConfig::default()).unwrap();

        let page = store.list(&(), &filters).await.unwrap();
        let codes: Vec<_> = page.rows.iter().map(|s| s.code).collect();
        assert_eq!(codes, ["a", "c", "d", "b"]);
    }
}
