#![allow(dead_code)]
// Shared fixtures for the integration suites.
use bson::Document;
use opquery::DbError;
use opquery::cluster::{Cluster, ServerAddress, Topology, TopologyKind};
use opquery::view::{Collection, Database};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn topology(kind: TopologyKind) -> Arc<Topology> {
    let t = match kind {
        TopologyKind::Sharded => Topology::sharded(vec![ServerAddress::new("router1", 27017)]),
        TopologyKind::Single => Topology::single(ServerAddress::new("localhost", 27017)),
        other => Topology::new(other, Vec::new()),
    };
    Arc::new(t)
}

pub fn collection_on(cluster: Arc<dyn Cluster>, db: &str, coll: &str) -> Arc<Collection> {
    Arc::new(Database::new(db, cluster)).collection(coll)
}

pub fn collection(kind: TopologyKind) -> Arc<Collection> {
    collection_on(topology(kind), "test", "users")
}

/// Cluster whose sharded check always fails, counting how often it is asked.
#[derive(Default)]
pub struct BrokenCluster {
    pub calls: AtomicUsize,
}

impl BrokenCluster {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Cluster for BrokenCluster {
    fn is_sharded(&self) -> Result<bool, DbError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(DbError::Topology("monitor not started".into()))
    }

    fn primary(&self) -> Result<ServerAddress, DbError> {
        Err(DbError::NoPrimary)
    }
}

/// Recorded `ensure_index` calls. Replies `{ ok: 1 }` unless told otherwise.
#[derive(Default)]
pub struct RecordingExecutor {
    pub calls: parking_lot::Mutex<Vec<(ServerAddress, opquery::index::EnsureIndex)>>,
    pub reply: Option<Document>,
}

impl RecordingExecutor {
    pub fn replying(reply: Document) -> Self {
        Self { reply: Some(reply), ..Self::default() }
    }
}

impl opquery::index::WriteExecutor for RecordingExecutor {
    fn execute_ensure_index(
        &self,
        server: &ServerAddress,
        op: &opquery::index::EnsureIndex,
    ) -> Result<Document, DbError> {
        self.calls.lock().push((server.clone(), op.clone()));
        Ok(self.reply.clone().unwrap_or_else(|| bson::doc! { "ok": 1 }))
    }
}
