//! Index key types and the `ensure_index` pass-through.

use crate::cluster::ServerAddress;
use crate::errors::DbError;
use crate::logger::AUDIT_TARGET;
use crate::view::Collection;
use bson::{Bson, Document, doc};

pub const ASCENDING: i32 = 1;
pub const DESCENDING: i32 = -1;
pub const GEO2D: &str = "2d";
pub const GEO2DSPHERE: &str = "2dsphere";
pub const GEOHAYSTACK: &str = "geoHaystack";
pub const TEXT: &str = "text";
pub const HASHED: &str = "hashed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexType {
    Ascending,
    Descending,
    Geo2d,
    Geo2dSphere,
    GeoHaystack,
    Text,
    Hashed,
}

impl IndexType {
    /// Value to place against the field in an index spec.
    #[must_use]
    pub fn to_bson(self) -> Bson {
        match self {
            Self::Ascending => Bson::Int32(ASCENDING),
            Self::Descending => Bson::Int32(DESCENDING),
            Self::Geo2d => Bson::String(GEO2D.into()),
            Self::Geo2dSphere => Bson::String(GEO2DSPHERE.into()),
            Self::GeoHaystack => Bson::String(GEOHAYSTACK.into()),
            Self::Text => Bson::String(TEXT.into()),
            Self::Hashed => Bson::String(HASHED.into()),
        }
    }

    #[must_use]
    pub fn from_bson(value: &Bson) -> Option<Self> {
        match value {
            Bson::Int32(1) | Bson::Int64(1) => Some(Self::Ascending),
            Bson::Int32(-1) | Bson::Int64(-1) => Some(Self::Descending),
            Bson::Double(d) if *d == 1.0 => Some(Self::Ascending),
            Bson::Double(d) if *d == -1.0 => Some(Self::Descending),
            Bson::String(s) => match s.as_str() {
                GEO2D => Some(Self::Geo2d),
                GEO2DSPHERE => Some(Self::Geo2dSphere),
                GEOHAYSTACK => Some(Self::GeoHaystack),
                TEXT => Some(Self::Text),
                HASHED => Some(Self::Hashed),
                _ => None,
            },
            _ => None,
        }
    }
}

fn name_part(value: &Bson) -> String {
    match value {
        Bson::String(s) => s.clone(),
        Bson::Int32(i) => i.to_string(),
        Bson::Int64(i) => i.to_string(),
        Bson::Double(d) => format!("{d:?}"),
        other => other.to_string(),
    }
}

/// Joins the flattened spec pairs with `_`: `{name: 1, age: -1}` → `name_1_age_-1`.
#[must_use]
pub fn index_name(spec: &Document) -> String {
    spec.iter()
        .flat_map(|(k, v)| [k.clone(), name_part(v)])
        .collect::<Vec<_>>()
        .join("_")
}

/// Write operation handed to the executor.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsureIndex {
    pub index: Document,
    pub index_name: String,
    pub options: Document,
    pub db_name: String,
    pub coll_name: String,
}

impl EnsureIndex {
    #[must_use]
    pub fn namespace(&self) -> String {
        format!("{}.{}", self.db_name, self.coll_name)
    }

    /// The index document as stored in `system.indexes`.
    #[must_use]
    pub fn index_document(&self) -> Document {
        let mut out = doc! {
            "key": self.index.clone(),
            "name": self.index_name.as_str(),
            "ns": self.namespace(),
        };
        for (k, v) in &self.options {
            if k != "name" {
                out.insert(k.clone(), v.clone());
            }
        }
        out
    }
}

/// Sends write operations to a server.
pub trait WriteExecutor {
    /// # Errors
    /// Implementations report transport or server failures.
    fn execute_ensure_index(
        &self,
        server: &ServerAddress,
        op: &EnsureIndex,
    ) -> Result<Document, DbError>;
}

/// Creates `spec` on `collection` through the primary of its topology.
/// `options.name` overrides the derived index name.
///
/// # Errors
/// `InvalidIndexSpec` for an empty spec, `NoPrimary` when no primary is known,
/// `WriteFailed` when the server replies with `ok: 0`, or whatever the
/// executor returns.
pub fn ensure_index(
    collection: &Collection,
    spec: &Document,
    options: &Document,
    executor: &dyn WriteExecutor,
) -> Result<Document, DbError> {
    if spec.is_empty() {
        return Err(DbError::InvalidIndexSpec("index spec has no keys".into()));
    }
    if let Some((field, value)) = spec.iter().find(|(_, v)| IndexType::from_bson(v).is_none()) {
        return Err(DbError::InvalidIndexSpec(format!("unsupported index type {value} for '{field}'")));
    }
    let index_name = match options.get("name") {
        Some(Bson::String(n)) => n.clone(),
        _ => index_name(spec),
    };
    let op = EnsureIndex {
        index: spec.clone(),
        index_name,
        options: options.clone(),
        db_name: collection.database().name_str(),
        coll_name: collection.name_str(),
    };
    let server = collection.database().cluster().primary()?;
    log::info!(target: AUDIT_TARGET, "ensure_index {} on {} via {}", op.index_name, op.namespace(), server);
    let reply = executor.execute_ensure_index(&server, &op)?;
    check_reply(reply)
}

fn check_reply(reply: Document) -> Result<Document, DbError> {
    let ok = match reply.get("ok") {
        Some(Bson::Int32(n)) => *n != 0,
        Some(Bson::Int64(n)) => *n != 0,
        Some(Bson::Double(f)) => *f != 0.0,
        Some(Bson::Boolean(b)) => *b,
        _ => true,
    };
    if ok {
        return Ok(reply);
    }
    let msg = reply.get_str("errmsg").unwrap_or("server reported ok: 0");
    log::warn!(target: AUDIT_TARGET, "ensure_index failed: {msg}");
    Err(DbError::WriteFailed(msg.to_string()))
}

impl Collection {
    /// # Errors
    /// See [`ensure_index`].
    pub fn ensure_index(
        &self,
        spec: &Document,
        options: &Document,
        executor: &dyn WriteExecutor,
    ) -> Result<Document, DbError> {
        ensure_index(self, spec, options, executor)
    }
}
