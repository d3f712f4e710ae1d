//! Translation of a logical find (filter + options) into the selector, flags
//! and limits of a legacy OP_QUERY message.
//!
//! ```
//! use bson::doc;
//! use opquery::cluster::{ServerAddress, Topology};
//! use opquery::options::OptionKey;
//! use opquery::query::build_specification;
//! use opquery::view::Database;
//! use std::sync::Arc;
//!
//! let topology = Arc::new(Topology::single(ServerAddress::new("localhost", 27017)));
//! let db = Arc::new(Database::new("shop", topology));
//! let view = db.collection("orders").find(doc! { "x": 1 }).with_option(OptionKey::Sort, doc! { "y": 1 });
//! let spec = build_specification(&view).unwrap();
//! assert_eq!(spec.selector, doc! { "$query": { "x": 1 }, "$orderby": { "y": 1 } });
//! ```

pub mod cli;
pub mod cluster;
pub mod config;
pub mod errors;
pub mod index;
pub mod logger;
pub mod options;
pub mod query;
pub mod read_preference;
pub mod view;

pub use errors::DbError;
pub use options::{OptionKey, QueryOptions};
pub use query::{OpQueryBuilder, QuerySpec, build_specification};
pub use read_preference::{ReadMode, ReadPreference};
pub use view::{Collection, Database, QueryView, View};
