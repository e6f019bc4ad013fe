//! Query-string parsing and validation for list endpoints.

use std::collections::HashMap;

use crate::config::QueryConfig;
use crate::query::pagination::offset_limit;
use crate::query::sort::{SortClause, SortColumn, SortSafelist};
use crate::query::validator::{ValidationErrors, Validator};

/// Delimiter for list filters such as `?genres=drama,fantasy`.
pub const LIST_DELIMITER: char = ',';

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_SORT: &str = "id";

/// Raw query-string values, as received.
#[derive(Debug, Clone, Default)]
pub struct QueryParams(HashMap<String, String>);

impl QueryParams {
    pub fn new(raw: HashMap<String, String>) -> Self {
        Self(raw)
    }

    /// Value of `key`, or `default` when absent or empty.
    pub fn read_string(&self, key: &str, default: &str) -> String {
        match self.0.get(key) {
            Some(value) if !value.is_empty() => value.clone(),
            _ => default.to_string(),
        }
    }

    /// `key` split on [`LIST_DELIMITER`]; empty when absent or empty.
    pub fn read_csv(&self, key: &str) -> Vec<String> {
        match self.0.get(key) {
            Some(value) if !value.is_empty() => {
                value.split(LIST_DELIMITER).map(str::to_string).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Integer value of `key`, or `default` when absent or empty. A value
    /// that is not an integer records an error and yields `default`.
    pub fn read_int(&self, key: &str, default: u64, v: &mut Validator) -> i64 {
        let Some(value) = self.0.get(key).filter(|s| !s.is_empty()) else {
            return default as i64;
        };

        match value.parse::<i64>() {
            Ok(n) => n,
            Err(_) => {
                v.add_error(key, "must be an integer value");
                default as i64
            }
        }
    }
}

impl From<HashMap<String, String>> for QueryParams {
    fn from(raw: HashMap<String, String>) -> Self {
        Self::new(raw)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for QueryParams {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

/// Validated paging and ordering for one list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filters<C> {
    pub page: u64,
    pub page_size: u64,
    pub sort: SortClause<C>,
}

impl<C> Filters<C> {
    pub fn offset(&self) -> u64 {
        offset_limit(self.page, self.page_size).0
    }

    pub fn limit(&self) -> u64 {
        offset_limit(self.page, self.page_size).1
    }
}

/// Validate `page`, `page_size` and `sort` together, reporting every
/// violation at once.
pub fn validate<C: SortColumn>(
    params: &QueryParams,
    safelist: &SortSafelist<C>,
    limits: &QueryConfig,
) -> Result<Filters<C>, ValidationErrors> {
    let mut v = Validator::new();

    let page = params.read_int("page", DEFAULT_PAGE, &mut v);
    let page_size = params.read_int("page_size", limits.default_page_size, &mut v);
    let sort = params.read_string("sort", DEFAULT_SORT);

    v.check(page > 0, "page", "must be greater than zero");
    v.check(
        page <= clamp_i64(limits.max_page),
        "page",
        format!("must be a maximum of {}", describe(limits.max_page)),
    );
    v.check(page_size > 0, "page_size", "must be greater than zero");
    v.check(
        page_size <= clamp_i64(limits.max_page_size),
        "page_size",
        format!("must be a maximum of {}", describe(limits.max_page_size)),
    );

    match safelist.resolve(&sort) {
        Some(sort) if v.is_valid() => Ok(Filters {
            page: page as u64,
            page_size: page_size as u64,
            sort,
        }),
        Some(_) => Err(v.into_errors()),
        None => {
            v.add_error("sort", "invalid sort value");
            Err(v.into_errors())
        }
    }
}

fn clamp_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn describe(n: u64) -> String {
    if n >= 1_000_000 && n % 1_000_000 == 0 {
        format!("{} million", n / 1_000_000)
    } else {
        n.to_string()
    }
}
