//! Read preference modes and their router (mongos) form.

use crate::errors::DbError;
use bson::{Bson, Document, doc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest max staleness a server accepts, in seconds.
pub const SMALLEST_MAX_STALENESS_SECONDS: i64 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReadMode {
    Primary,
    PrimaryPreferred,
    Secondary,
    SecondaryPreferred,
    Nearest,
}

impl ReadMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::PrimaryPreferred => "primaryPreferred",
            Self::Secondary => "secondary",
            Self::SecondaryPreferred => "secondaryPreferred",
            Self::Nearest => "nearest",
        }
    }

    /// Accepts both the wire name (`secondaryPreferred`) and the snake_case
    /// option spelling (`secondary_preferred`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "primary" => Some(Self::Primary),
            "primaryPreferred" | "primary_preferred" => Some(Self::PrimaryPreferred),
            "secondary" => Some(Self::Secondary),
            "secondaryPreferred" | "secondary_preferred" => Some(Self::SecondaryPreferred),
            "nearest" => Some(Self::Nearest),
            _ => None,
        }
    }
}

impl fmt::Display for ReadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which replica set members may serve a read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadPreference {
    pub mode: ReadMode,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag_sets: Vec<Document>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_staleness_seconds: Option<i64>,
}

impl ReadPreference {
    #[must_use]
    pub fn new(mode: ReadMode) -> Self {
        Self { mode, tag_sets: Vec::new(), max_staleness_seconds: None }
    }

    #[must_use]
    pub fn primary() -> Self {
        Self::new(ReadMode::Primary)
    }

    #[must_use]
    pub fn with_tag_sets(mut self, tag_sets: Vec<Document>) -> Self {
        self.tag_sets = tag_sets;
        self
    }

    #[must_use]
    pub fn with_max_staleness(mut self, seconds: i64) -> Self {
        self.max_staleness_seconds = Some(seconds);
        self
    }

    /// Parses `{ mode: "...", tag_sets: [...], max_staleness: n }`.
    ///
    /// # Errors
    /// Returns `InvalidReadPreference` for a missing or unknown mode, or for
    /// fields of the wrong type. The result is validated before returning.
    pub fn from_document(doc: &Document) -> Result<Self, DbError> {
        let mode = match doc.get("mode") {
            Some(Bson::String(s)) => ReadMode::from_name(s)
                .ok_or_else(|| DbError::InvalidReadPreference(format!("unknown mode '{s}'")))?,
            Some(other) => {
                return Err(DbError::InvalidReadPreference(format!(
                    "mode must be a string, got {other}"
                )));
            }
            None => return Err(DbError::InvalidReadPreference("missing mode".into())),
        };
        let mut pref = Self::new(mode);
        match doc.get("tag_sets") {
            None | Some(Bson::Null) => {}
            Some(Bson::Array(items)) => {
                for item in items {
                    match item {
                        Bson::Document(d) => pref.tag_sets.push(d.clone()),
                        other => {
                            return Err(DbError::InvalidReadPreference(format!(
                                "tag set must be a document, got {other}"
                            )));
                        }
                    }
                }
            }
            Some(other) => {
                return Err(DbError::InvalidReadPreference(format!(
                    "tag_sets must be an array, got {other}"
                )));
            }
        }
        pref.max_staleness_seconds = match doc.get("max_staleness") {
            None | Some(Bson::Null) => None,
            Some(Bson::Int32(n)) => Some(i64::from(*n)),
            Some(Bson::Int64(n)) => Some(*n),
            Some(other) => {
                return Err(DbError::InvalidReadPreference(format!(
                    "max_staleness must be an integer, got {other}"
                )));
            }
        };
        pref.validate()?;
        Ok(pref)
    }

    /// # Errors
    /// Primary mode may not carry tag sets or a max staleness, and a max
    /// staleness must be `-1` or at least [`SMALLEST_MAX_STALENESS_SECONDS`].
    pub fn validate(&self) -> Result<(), DbError> {
        if self.mode == ReadMode::Primary {
            if !self.tag_sets.is_empty() {
                return Err(DbError::InvalidReadPreference(
                    "tag sets are not allowed with primary mode".into(),
                ));
            }
            if self.max_staleness().is_some() {
                return Err(DbError::InvalidReadPreference(
                    "max staleness is not allowed with primary mode".into(),
                ));
            }
        }
        if let Some(secs) = self.max_staleness_seconds
            && secs != -1
            && secs < SMALLEST_MAX_STALENESS_SECONDS
        {
            return Err(DbError::InvalidReadPreference(format!(
                "max staleness {secs}s is below the {SMALLEST_MAX_STALENESS_SECONDS}s minimum"
            )));
        }
        Ok(())
    }

    /// Effective max staleness; `-1` means "no maximum".
    #[must_use]
    pub fn max_staleness(&self) -> Option<i64> {
        self.max_staleness_seconds.filter(|s| *s > 0)
    }

    /// Formats the preference for a router. `None` means the router default
    /// applies and no `$readPreference` should be sent.
    ///
    /// # Errors
    /// Returns the validation error when the preference is inconsistent.
    pub fn to_router_form(&self) -> Result<Option<Document>, DbError> {
        self.validate()?;
        match self.mode {
            ReadMode::Primary => return Ok(None),
            ReadMode::SecondaryPreferred
                if self.tag_sets.is_empty() && self.max_staleness().is_none() =>
            {
                return Ok(None);
            }
            _ => {}
        }
        let mut out = doc! { "mode": self.mode.as_str() };
        if !self.tag_sets.is_empty() {
            let tags: Vec<Bson> = self.tag_sets.iter().cloned().map(Bson::Document).collect();
            out.insert("tags", tags);
        }
        if let Some(secs) = self.max_staleness() {
            out.insert("maxStalenessSeconds", secs);
        }
        Ok(Some(out))
    }
}

impl Default for ReadPreference {
    fn default() -> Self {
        Self::primary()
    }
}
