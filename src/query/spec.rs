use crate::read_preference::ReadPreference;
use bson::{Bson, Document};
use serde::Serialize;

use super::flags::CursorFlags;

/// Everything the transport needs to put a legacy query on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuerySpec {
    pub selector: Document,
    /// Whether `selector` is the `$query`-wrapped form.
    pub wrapped: bool,
    pub read: Option<ReadPreference>,
    pub options: SpecOptions,
    pub db_name: String,
    pub coll_name: String,
}

impl QuerySpec {
    /// Full collection name of the legacy query message, `db.coll`.
    #[must_use]
    pub fn namespace(&self) -> String {
        format!("{}.{}", self.db_name, self.coll_name)
    }

    #[must_use]
    pub fn is_wrapped(&self) -> bool {
        self.wrapped
    }
}

/// Legacy limits and flags. Limits are copied from the view without defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpecOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<Bson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<Bson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<Bson>,
    pub flags: CursorFlags,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<Bson>,
}
