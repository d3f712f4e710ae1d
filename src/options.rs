//! User-facing query options keyed by snake_case option names.
//!
//! Options are kept in insertion order inside a BSON document so that every
//! mapping derived from them (modifiers, flags) follows the caller's order.
//! Keys outside [`OptionKey`] are carried along untouched.

use bson::{Bson, Document};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The enumerated set of options the query builder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    Sort,
    Hint,
    Comment,
    Snapshot,
    MaxScan,
    MaxValue,
    MinValue,
    MaxTimeMs,
    ReturnKey,
    ShowDiskLoc,
    Explain,
    Projection,
    Skip,
    Limit,
    BatchSize,
    AllowPartialResults,
    OplogReplay,
    NoCursorTimeout,
    Tailable,
    TailableAwait,
    AwaitData,
}

impl OptionKey {
    pub const ALL: [Self; 21] = [
        Self::Sort,
        Self::Hint,
        Self::Comment,
        Self::Snapshot,
        Self::MaxScan,
        Self::MaxValue,
        Self::MinValue,
        Self::MaxTimeMs,
        Self::ReturnKey,
        Self::ShowDiskLoc,
        Self::Explain,
        Self::Projection,
        Self::Skip,
        Self::Limit,
        Self::BatchSize,
        Self::AllowPartialResults,
        Self::OplogReplay,
        Self::NoCursorTimeout,
        Self::Tailable,
        Self::TailableAwait,
        Self::AwaitData,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sort => "sort",
            Self::Hint => "hint",
            Self::Comment => "comment",
            Self::Snapshot => "snapshot",
            Self::MaxScan => "max_scan",
            Self::MaxValue => "max_value",
            Self::MinValue => "min_value",
            Self::MaxTimeMs => "max_time_ms",
            Self::ReturnKey => "return_key",
            Self::ShowDiskLoc => "show_disk_loc",
            Self::Explain => "explain",
            Self::Projection => "projection",
            Self::Skip => "skip",
            Self::Limit => "limit",
            Self::BatchSize => "batch_size",
            Self::AllowPartialResults => "allow_partial_results",
            Self::OplogReplay => "oplog_replay",
            Self::NoCursorTimeout => "no_cursor_timeout",
            Self::Tailable => "tailable",
            Self::TailableAwait => "tailable_await",
            Self::AwaitData => "await_data",
        }
    }

    /// Looks up a key by its option name. Unknown names yield `None`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `null` and `false` are the only falsy option values.
#[must_use]
pub fn is_truthy(value: &Bson) -> bool {
    !matches!(value, Bson::Null | Bson::Boolean(false))
}

/// Ordered option map handed to the query builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryOptions(Document);

impl QueryOptions {
    #[must_use]
    pub fn new() -> Self {
        Self(Document::new())
    }

    #[must_use]
    pub fn from_document(doc: Document) -> Self {
        Self(doc)
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: OptionKey, value: impl Into<Bson>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: OptionKey, value: impl Into<Bson>) -> Option<Bson> {
        self.0.insert(key.as_str(), value.into())
    }

    pub fn remove(&mut self, key: OptionKey) -> Option<Bson> {
        self.0.remove(key.as_str())
    }

    /// Returns the value for `key`; a `null` value counts as absent.
    #[must_use]
    pub fn get(&self, key: OptionKey) -> Option<&Bson> {
        match self.0.get(key.as_str()) {
            None | Some(Bson::Null) => None,
            Some(v) => Some(v),
        }
    }

    /// Recognized, non-null options in insertion order.
    pub fn recognized(&self) -> impl Iterator<Item = (OptionKey, &Bson)> {
        self.0.iter().filter_map(|(name, value)| {
            if matches!(value, Bson::Null) {
                return None;
            }
            OptionKey::from_name(name).map(|k| (k, value))
        })
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
    pub fn as_document(&self) -> &Document {
        &self.0
    }

    #[must_use]
    pub fn into_document(self) -> Document {
        self.0
    }
}

impl From<Document> for QueryOptions {
    fn from(doc: Document) -> Self {
        Self(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn option_names_round_trip_through_lookup() {
        for key in OptionKey::ALL {
            assert_eq!(OptionKey::from_name(key.as_str()), Some(key));
        }
        assert_eq!(OptionKey::from_name("read_concern"), None);
    }

    #[test]
    fn null_values_read_as_absent() {
        let opts = QueryOptions::from_document(doc! { "limit": Bson::Null, "skip": 5, "bogus": 1 });
        assert!(opts.get(OptionKey::Limit).is_none());
        assert_eq!(opts.get(OptionKey::Skip), Some(&Bson::Int32(5)));
        let keys: Vec<_> = opts.recognized().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![OptionKey::Skip]);
    }
}
