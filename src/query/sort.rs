//! Sort clause construction.
//!
//! A sort token from the query string never reaches SQL text. Tokens are
//! matched against a per-route allow-list, and the matched token is mapped
//! through a fixed enumeration of columns whose identifiers are `'static`
//! strings compiled into the binary.

use std::fmt;

use crate::query::validator::permitted_value;

/// Prefix marking a descending sort token, e.g. `-year`.
pub const DESCENDING_MARKER: char = '-';

/// A closed set of sortable columns for one entity.
pub trait SortColumn: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Unique column appended to every ordering so pagination is stable.
    const TIE_BREAK: Self;

    /// Trusted SQL identifier for this column.
    fn identifier(self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn keyword(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Primary ordering column plus direction. The tie-break column is implied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortClause<C> {
    column: C,
    direction: SortDirection,
}

impl<C: SortColumn> SortClause<C> {
    pub fn column(&self) -> C {
        self.column
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Body of an `ORDER BY` clause, always ending with the tie-break
    /// column ascending.
    pub fn order_by(&self) -> String {
        format!(
            "{} {}, {} ASC",
            self.column.identifier(),
            self.direction.keyword(),
            C::TIE_BREAK.identifier()
        )
    }
}

/// Map a sort token to a clause using a fixed field → column table.
///
/// Performs no allow-list check; callers reach it only through
/// [`SortSafelist::resolve`].
fn build<C: SortColumn>(token: &str, columns: &[(&'static str, C)]) -> Option<SortClause<C>> {
    let (field, direction) = match token.strip_prefix(DESCENDING_MARKER) {
        Some(rest) => (rest, SortDirection::Desc),
        None => (token, SortDirection::Asc),
    };

    columns
        .iter()
        .find(|(name, _)| *name == field)
        .map(|&(_, column)| SortClause { column, direction })
}

/// The sort tokens one route accepts, and the columns they map to.
#[derive(Debug, Clone)]
pub struct SortSafelist<C> {
    tokens: Vec<String>,
    columns: Vec<(&'static str, C)>,
}

impl<C: SortColumn> SortSafelist<C> {
    /// Allow exactly `tokens`. A token whose field has no entry in
    /// `columns` stays unusable: it resolves to nothing.
    pub fn new<I, S>(tokens: I, columns: &[(&'static str, C)]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            columns: columns.to_vec(),
        }
    }

    /// Allow every field in both directions: ascending tokens first, then
    /// their descending counterparts.
    pub fn from_columns(columns: &[(&'static str, C)]) -> Self {
        let ascending = columns.iter().map(|(name, _)| name.to_string());
        let descending = columns
            .iter()
            .map(|(name, _)| format!("{DESCENDING_MARKER}{name}"));
        Self::new(ascending.chain(descending), columns)
    }

    /// Resolve a raw sort token. `None` unless `raw` is an exact member of
    /// the allow-list and maps to a known column.
    pub fn resolve(&self, raw: &str) -> Option<SortClause<C>> {
        if !permitted_value(raw, &self.tokens) {
            return None;
        }
        build(raw, &self.columns)
    }
}
