//! Ordered string lists stored as a single comma-joined column.
//!
//! The hosted schema flattens colors, image URLs, carts and favorites into
//! text columns. [`DelimitedList`] keeps them as real ordered collections in
//! Rust; the comma-joined form exists only at the serde boundary.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const SEPARATOR: char = ',';
const JOINER: &str = ", ";

/// An ordered list of non-empty, trimmed strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DelimitedList(Vec<String>);

impl DelimitedList {
    /// Create an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Split a stored column value. Blank entries are dropped.
    #[must_use]
    pub fn parse(stored: &str) -> Self {
        Self(
            stored
                .split(SEPARATOR)
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_owned)
                .collect(),
        )
    }

    /// Join into the stored column value.
    #[must_use]
    pub fn join(&self) -> String {
        self.0.join(JOINER)
    }

    /// Items in order.
    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, item: &str) -> bool {
        self.0.iter().any(|existing| existing == item)
    }

    /// First item, if any.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Append an item unless it is blank or already present.
    ///
    /// Returns `true` if the list changed.
    pub fn push_unique(&mut self, item: &str) -> bool {
        let item = item.trim();
        if item.is_empty() || self.contains(item) {
            return false;
        }
        self.0.push(item.to_owned());
        true
    }

    /// Insert an item at `index` (clamped to the list length) unless present.
    pub fn insert_unique(&mut self, index: usize, item: &str) -> bool {
        let item = item.trim();
        if item.is_empty() || self.contains(item) {
            return false;
        }
        let index = index.min(self.0.len());
        self.0.insert(index, item.to_owned());
        true
    }

    /// Remove every occurrence of an item. Returns `true` if the list changed.
    pub fn remove(&mut self, item: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|existing| existing != item);
        self.0.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for DelimitedList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = Self::new();
        for item in iter {
            let item: String = item.into();
            list.push_unique(&item);
        }
        list
    }
}

impl Serialize for DelimitedList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.join())
    }
}

impl<'de> Deserialize<'de> for DelimitedList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let stored = Option::<String>::deserialize(deserializer)?;
        Ok(stored.as_deref().map(Self::parse).unwrap_or_default())
    }
}
