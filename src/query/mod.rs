//! List query engine.
//!
//! # Data Flow
//! ```text
//! raw query string
//!     → filters.rs (parse page/page_size/sort, aggregate every error)
//!     → sort.rs (allow-listed token → typed column + direction)
//!     → engine.rs (store round trip under a deadline)
//!     → pagination.rs (metadata from the window count)
//! ```
//!
//! Everything here is stateless and safe to call from any number of tasks.

pub mod engine;
pub mod filters;
pub mod pagination;
pub mod sort;
pub mod validator;

pub use engine::{execute, ListPage};
pub use filters::{validate, Filters, QueryParams};
pub use pagination::{offset_limit, Metadata};
pub use sort::{SortClause, SortColumn, SortDirection, SortSafelist};
pub use validator::{ValidationErrors, Validator};
