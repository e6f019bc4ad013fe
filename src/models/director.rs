//! Directors.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::query::filters::QueryParams;
use crate::query::sort::{SortColumn, SortSafelist};
use crate::store::Record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Director {
    pub id: i64,
    pub name: String,
    pub surname: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub awards: Vec<String>,
}

impl Director {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

/// `?name=` and `?awards=` filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectorFilter {
    pub name: String,
    pub awards: Vec<String>,
}

impl DirectorFilter {
    pub fn from_params(params: &QueryParams) -> Self {
        Self {
            name: params.read_string("name", ""),
            awards: params.read_csv("awards"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectorColumn {
    Id,
    Awards,
    FullName,
}

impl SortColumn for DirectorColumn {
    const TIE_BREAK: Self = DirectorColumn::Id;

    fn identifier(self) -> &'static str {
        match self {
            DirectorColumn::Id => "id",
            DirectorColumn::Awards => "awards",
            DirectorColumn::FullName => "concat_ws(' ', name, surname)",
        }
    }
}

const SORT_FIELDS: &[(&str, DirectorColumn)] = &[
    ("id", DirectorColumn::Id),
    ("awards", DirectorColumn::Awards),
    ("fullname", DirectorColumn::FullName),
];

/// Sort tokens accepted by `GET /v1/directors`.
pub fn sort_safelist() -> SortSafelist<DirectorColumn> {
    SortSafelist::from_columns(SORT_FIELDS)
}

impl Record for Director {
    type Column = DirectorColumn;
    type Filter = DirectorFilter;

    fn id(&self) -> i64 {
        self.id
    }

    fn compare_by(&self, other: &Self, column: DirectorColumn) -> Ordering {
        match column {
            DirectorColumn::Id => self.id.cmp(&other.id),
            DirectorColumn::Awards => self.awards.cmp(&other.awards),
            DirectorColumn::FullName => self.full_name().cmp(&other.full_name()),
        }
    }

    fn matches(&self, filter: &DirectorFilter) -> bool {
        super::text_matches(&self.name, &filter.name)
            && super::contains_all(&self.awards, &filter.awards)
    }
}
