//! Cluster topology as seen by the query builder.
//!
//! The builder only needs to know whether it is talking to a router and, for
//! writes, where the primary is. Topology discovery lives elsewhere; callers
//! push what they know through [`Topology::update`].

use crate::errors::DbError;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;

pub trait Cluster: Send + Sync {
    /// # Errors
    /// Fails when the topology kind cannot be determined yet.
    fn is_sharded(&self) -> Result<bool, DbError>;

    /// # Errors
    /// Returns `NoPrimary` when no writable server is known.
    fn primary(&self) -> Result<ServerAddress, DbError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServerAddress {
    pub host: String,
    pub port: u16,
}

impl ServerAddress {
    pub const DEFAULT_PORT: u16 = 27017;

    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { host: host.into(), port }
    }

    /// Parses `host` or `host:port`.
    ///
    /// # Errors
    /// Returns `InvalidArgument` for an empty host or a malformed port.
    pub fn parse(s: &str) -> Result<Self, DbError> {
        let (host, port) = match s.rsplit_once(':') {
            Some((h, p)) => {
                let port = p
                    .parse::<u16>()
                    .map_err(|e| DbError::InvalidArgument(format!("bad port in '{s}': {e}")))?;
                (h, port)
            }
            None => (s, Self::DEFAULT_PORT),
        };
        if host.is_empty() {
            return Err(DbError::InvalidArgument(format!("empty host in '{s}'")));
        }
        Ok(Self::new(host, port))
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopologyKind {
    Unknown,
    Single,
    ReplicaSetNoPrimary,
    ReplicaSetWithPrimary,
    Sharded,
}

impl TopologyKind {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "unknown" => Some(Self::Unknown),
            "single" | "standalone" => Some(Self::Single),
            "replica_set_no_primary" => Some(Self::ReplicaSetNoPrimary),
            "replica_set" | "replica_set_with_primary" => Some(Self::ReplicaSetWithPrimary),
            "sharded" => Some(Self::Sharded),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerRole {
    Standalone,
    Primary,
    Secondary,
    Router,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerDescription {
    pub address: ServerAddress,
    pub role: ServerRole,
}

impl ServerDescription {
    #[must_use]
    pub fn new(address: ServerAddress, role: ServerRole) -> Self {
        Self { address, role }
    }
}

#[derive(Debug)]
struct TopologyState {
    kind: TopologyKind,
    servers: Vec<ServerDescription>,
}

/// Shared, mutable view of the deployment. Reads always see the latest update.
#[derive(Debug)]
pub struct Topology {
    state: RwLock<TopologyState>,
}

impl Topology {
    #[must_use]
    pub fn new(kind: TopologyKind, servers: Vec<ServerDescription>) -> Self {
        Self { state: RwLock::new(TopologyState { kind, servers }) }
    }

    #[must_use]
    pub fn unknown() -> Self {
        Self::new(TopologyKind::Unknown, Vec::new())
    }

    #[must_use]
    pub fn single(address: ServerAddress) -> Self {
        Self::new(TopologyKind::Single, vec![ServerDescription::new(address, ServerRole::Standalone)])
    }

    #[must_use]
    pub fn sharded(routers: Vec<ServerAddress>) -> Self {
        let servers = routers
            .into_iter()
            .map(|a| ServerDescription::new(a, ServerRole::Router))
            .collect();
        Self::new(TopologyKind::Sharded, servers)
    }

    #[must_use]
    pub fn kind(&self) -> TopologyKind {
        self.state.read().kind
    }

    #[must_use]
    pub fn servers(&self) -> Vec<ServerDescription> {
        self.state.read().servers.clone()
    }

    /// Replaces kind and server list in one step.
    pub fn update(&self, kind: TopologyKind, servers: Vec<ServerDescription>) {
        let mut st = self.state.write();
        log::debug!("topology change {:?} -> {:?} ({} servers)", st.kind, kind, servers.len());
        st.kind = kind;
        st.servers = servers;
    }

    pub fn set_kind(&self, kind: TopologyKind) {
        self.state.write().kind = kind;
    }
}

impl Cluster for Topology {
    fn is_sharded(&self) -> Result<bool, DbError> {
        match self.state.read().kind {
            TopologyKind::Unknown => {
                Err(DbError::Topology("topology kind has not been discovered".into()))
            }
            kind => Ok(kind == TopologyKind::Sharded),
        }
    }

    fn primary(&self) -> Result<ServerAddress, DbError> {
        let st = self.state.read();
        let wanted = match st.kind {
            TopologyKind::Single => ServerRole::Standalone,
            TopologyKind::ReplicaSetWithPrimary => ServerRole::Primary,
            TopologyKind::Sharded => ServerRole::Router,
            TopologyKind::Unknown | TopologyKind::ReplicaSetNoPrimary => {
                return Err(DbError::NoPrimary);
            }
        };
        st.servers
            .iter()
            .find(|s| s.role == wanted)
            .map(|s| s.address.clone())
            .ok_or(DbError::NoPrimary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_address_defaults_port() {
        assert_eq!(ServerAddress::parse("db1").unwrap(), ServerAddress::new("db1", 27017));
        assert_eq!(ServerAddress::parse("db1:27018").unwrap().port, 27018);
        assert!(ServerAddress::parse(":1").is_err());
        assert!(ServerAddress::parse("db1:x").is_err());
    }

    #[test]
    fn update_switches_primary_and_sharding() {
        let topo = Topology::unknown();
        assert!(topo.is_sharded().is_err());
        assert!(matches!(topo.primary(), Err(DbError::NoPrimary)));

        let p = ServerAddress::new("p", 27017);
        topo.update(
            TopologyKind::ReplicaSetWithPrimary,
            vec![
                ServerDescription::new(ServerAddress::new("s", 27017), ServerRole::Secondary),
                ServerDescription::new(p.clone(), ServerRole::Primary),
            ],
        );
        assert!(!topo.is_sharded().unwrap());
        assert_eq!(topo.primary().unwrap(), p);
        assert_eq!(topo.servers().len(), 2);

        topo.update(TopologyKind::Sharded, vec![ServerDescription::new(p.clone(), ServerRole::Router)]);
        assert!(topo.is_sharded().unwrap());
        assert_eq!(topo.kind(), TopologyKind::Sharded);
    }
}
