//! Database, collection and the logical query view built on them.

use crate::cluster::Cluster;
use crate::options::{OptionKey, QueryOptions};
use crate::read_preference::ReadPreference;
use bson::{Bson, Document};
use parking_lot::RwLock;
use std::sync::Arc;

/// What the query builder reads from a query. All accessors are read-only.
pub trait QueryView {
    fn filter(&self) -> &Document;
    fn options(&self) -> &QueryOptions;
    /// Read preference in effect right now.
    fn read(&self) -> Option<ReadPreference>;
    fn database_name(&self) -> String;
    fn collection_name(&self) -> String;
    fn cluster(&self) -> &dyn Cluster;
}

pub struct Database {
    pub name: Arc<RwLock<String>>,
    cluster: Arc<dyn Cluster>,
}

impl Database {
    pub fn new(name: impl Into<String>, cluster: Arc<dyn Cluster>) -> Self {
        Self { name: Arc::new(RwLock::new(name.into())), cluster }
    }

    pub fn name_str(&self) -> String {
        self.name.read().clone()
    }

    pub fn set_name(&self, new_name: String) {
        *self.name.write() = new_name;
    }

    pub fn cluster(&self) -> &dyn Cluster {
        self.cluster.as_ref()
    }

    pub fn collection(self: &Arc<Self>, name: impl Into<String>) -> Arc<Collection> {
        Arc::new(Collection::new(name, Arc::clone(self)))
    }
}

pub struct Collection {
    pub name: Arc<RwLock<String>>,
    database: Arc<Database>,
    read_preference: RwLock<Option<ReadPreference>>,
}

impl Collection {
    pub fn new(name: impl Into<String>, database: Arc<Database>) -> Self {
        Self {
            name: Arc::new(RwLock::new(name.into())),
            database,
            read_preference: RwLock::new(None),
        }
    }

    pub fn name_str(&self) -> String {
        self.name.read().clone()
    }

    pub fn set_name(&self, new_name: String) {
        *self.name.write() = new_name;
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.database
    }

    pub fn read_preference(&self) -> Option<ReadPreference> {
        self.read_preference.read().clone()
    }

    pub fn set_read_preference(&self, pref: Option<ReadPreference>) {
        *self.read_preference.write() = pref;
    }

    /// Starts a query over this collection.
    pub fn find(self: &Arc<Self>, filter: Document) -> View {
        View::new(Arc::clone(self), filter)
    }
}

/// A filter plus options against one collection. Without an explicit
/// [`with_read`](Self::with_read), the collection's current read preference
/// applies.
pub struct View {
    collection: Arc<Collection>,
    filter: Document,
    options: QueryOptions,
    read: Option<ReadPreference>,
}

impl View {
    pub fn new(collection: Arc<Collection>, filter: Document) -> Self {
        Self { collection, filter, options: QueryOptions::new(), read: None }
    }

    #[must_use]
    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_option(mut self, key: OptionKey, value: impl Into<Bson>) -> Self {
        self.options.insert(key, value);
        self
    }

    #[must_use]
    pub fn with_read(mut self, read: ReadPreference) -> Self {
        self.read = Some(read);
        self
    }

    pub fn options_mut(&mut self) -> &mut QueryOptions {
        &mut self.options
    }

    pub fn collection(&self) -> &Arc<Collection> {
        &self.collection
    }
}

impl QueryView for View {
    fn filter(&self) -> &Document {
        &self.filter
    }

    fn options(&self) -> &QueryOptions {
        &self.options
    }

    fn read(&self) -> Option<ReadPreference> {
        self.read.clone().or_else(|| self.collection.read_preference())
    }

    fn database_name(&self) -> String {
        self.collection.database().name_str()
    }

    fn collection_name(&self) -> String {
        self.collection.name_str()
    }

    fn cluster(&self) -> &dyn Cluster {
        self.collection.database().cluster()
    }
}
