//! Movies.

use std::cmp::Ordering;
use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::query::filters::QueryParams;
use crate::query::sort::{SortColumn, SortSafelist};
use crate::store::Record;

/// Running time in minutes, rendered as `"<n> mins"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Runtime(pub i32);

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mins", self.0)
    }
}

impl Serialize for Runtime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Runtime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Minutes(i32),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Minutes(n) => Ok(Runtime(n)),
            Raw::Text(text) => text
                .strip_suffix(" mins")
                .and_then(|n| n.parse().ok())
                .map(Runtime)
                .ok_or_else(|| de::Error::custom("invalid runtime format")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub year: i32,
    pub runtime: Runtime,
    pub genres: Vec<String>,
    #[serde(default = "initial_version")]
    pub version: i32,
}

fn initial_version() -> i32 {
    1
}

/// `?title=` and `?genres=` filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieFilter {
    pub title: String,
    pub genres: Vec<String>,
}

impl MovieFilter {
    pub fn from_params(params: &QueryParams) -> Self {
        Self {
            title: params.read_string("title", ""),
            genres: params.read_csv("genres"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieColumn {
    Id,
    Title,
    Year,
    Runtime,
}

impl SortColumn for MovieColumn {
    const TIE_BREAK: Self = MovieColumn::Id;

    fn identifier(self) -> &'static str {
        match self {
            MovieColumn::Id => "id",
            MovieColumn::Title => "title",
            MovieColumn::Year => "year",
            MovieColumn::Runtime => "runtime",
        }
    }
}

const SORT_FIELDS: &[(&str, MovieColumn)] = &[
    ("id", MovieColumn::Id),
    ("title", MovieColumn::Title),
    ("year", MovieColumn::Year),
    ("runtime", MovieColumn::Runtime),
];

/// Sort tokens accepted by `GET /v1/movies`.
pub fn sort_safelist() -> SortSafelist<MovieColumn> {
    SortSafelist::from_columns(SORT_FIELDS)
}

impl Record for Movie {
    type Column = MovieColumn;
    type Filter = MovieFilter;

    fn id(&self) -> i64 {
        self.id
    }

    fn compare_by(&self, other: &Self, column: MovieColumn) -> Ordering {
        match column {
            MovieColumn::Id => self.id.cmp(&other.id),
            MovieColumn::Title => self.title.cmp(&other.title),
            MovieColumn::Year => self.year.cmp(&other.year),
            MovieColumn::Runtime => self.runtime.cmp(&other.runtime),
        }
    }

    fn matches(&self, filter: &MovieFilter) -> bool {
        super::text_matches(&self.title, &filter.title)
            && super::contains_all(&self.genres, &filter.genres)
    }
}
