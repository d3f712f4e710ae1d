use crate::cluster::{ServerAddress, ServerDescription, ServerRole, Topology, TopologyKind};
use crate::errors::DbError;
use crate::index::index_name;
use crate::options::QueryOptions;
use crate::query::build_specification;
use crate::read_preference::ReadPreference;
use crate::view::Database;
use std::sync::Arc;

pub enum Command {
    BuildSpec {
        db: String,
        collection: String,
        filter_json: Option<String>,
        options_json: Option<String>,
        read_json: Option<String>,
        topology: TopologyKind,
    },
    IndexName {
        spec_json: String,
    },
}

/// Parses a JSON object into a BSON document.
///
/// # Errors
/// `Json` for malformed JSON, `InvalidArgument` if the value is not an object.
pub fn json_to_document(json: &str) -> Result<bson::Document, DbError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let serde_json::Value::Object(obj) = value else {
        return Err(DbError::InvalidArgument(format!("expected a JSON object, got: {json}")));
    };
    bson::Document::try_from(obj).map_err(|e| DbError::InvalidArgument(e.to_string()))
}

fn topology_for(kind: TopologyKind) -> Topology {
    let role = match kind {
        TopologyKind::Single => ServerRole::Standalone,
        TopologyKind::ReplicaSetWithPrimary => ServerRole::Primary,
        TopologyKind::ReplicaSetNoPrimary => ServerRole::Secondary,
        TopologyKind::Sharded => ServerRole::Router,
        TopologyKind::Unknown => ServerRole::Unknown,
    };
    let local = ServerAddress::new("localhost", ServerAddress::DEFAULT_PORT);
    Topology::new(kind, vec![ServerDescription::new(local, role)])
}

/// Runs a command and returns what should be printed.
///
/// # Errors
/// Bad JSON input, an invalid read preference, or a topology that cannot
/// answer whether it is sharded.
pub fn run(cmd: Command) -> Result<String, DbError> {
    match cmd {
        Command::BuildSpec { db, collection, filter_json, options_json, read_json, topology } => {
            let filter = match filter_json {
                Some(s) => json_to_document(&s)?,
                None => bson::Document::new(),
            };
            let options = match options_json {
                Some(s) => QueryOptions::from_document(json_to_document(&s)?),
                None => QueryOptions::new(),
            };
            let database = Arc::new(Database::new(db, Arc::new(topology_for(topology))));
            let coll = database.collection(collection);
            let mut view = coll.find(filter).with_options(options);
            if let Some(s) = read_json {
                view = view.with_read(ReadPreference::from_document(&json_to_document(&s)?)?);
            }
            let spec = build_specification(&view)?;
            Ok(serde_json::to_string_pretty(&spec)?)
        }
        Command::IndexName { spec_json } => Ok(index_name(&json_to_document(&spec_json)?)),
    }
}
