//! Response bodies.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::query::ListPage;

/// `{"<key>": [rows...], "metadata": {...}}`. Metadata is left out when
/// nothing matched.
pub struct ListEnvelope<R> {
    key: &'static str,
    page: ListPage<R>,
}

impl<R> ListEnvelope<R> {
    pub fn new(key: &'static str, page: ListPage<R>) -> Self {
        Self { key, page }
    }
}

impl<R: Serialize> Serialize for ListEnvelope<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(self.key, &self.page.rows)?;
        if !self.page.metadata.is_empty() {
            map.serialize_entry("metadata", &self.page.metadata)?;
        }
        map.end()
    }
}
