//! Leaf node data model
//!
//! A leaf stands for exactly one monitored host or service. Where its state
//! comes from is up to the caller; the leaf only keeps the last
//! [`Observation`] it was given.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::node::NodeCore;
use super::problem::NodeKind;
use super::state::{SeverityRank, StateName, StatusCode};
use crate::utils::error::{ProcessError, ProcessResult};
use crate::utils::validation::ensure_object_name;

/// Service name used for the host check itself
pub const HOST_STATUS_SERVICE: &str = "Hoststatus";

/// The monitored object behind a leaf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MonitoredObject {
    Host { host: String },
    Service { host: String, service: String },
}

impl MonitoredObject {
    /// Name of the leaf in a process tree (`host;service`)
    pub fn node_name(&self) -> String {
        match self {
            MonitoredObject::Host { host } => format!("{};{}", host, HOST_STATUS_SERVICE),
            MonitoredObject::Service { host, service } => format!("{};{}", host, service),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            MonitoredObject::Host { .. } => NodeKind::Host,
            MonitoredObject::Service { .. } => NodeKind::Service,
        }
    }

    pub fn accepts(&self, state: StateName) -> bool {
        match self {
            MonitoredObject::Host { .. } => state.is_host_state(),
            MonitoredObject::Service { .. } => state.is_service_state(),
        }
    }
}

/// Last known state of a monitored object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub state: StateName,
    #[serde(default)]
    pub in_downtime: bool,
    #[serde(default)]
    pub acknowledged: bool,
    #[serde(default)]
    pub last_state_change: Option<DateTime<Utc>>,
    /// The object no longer exists in the monitoring backend
    #[serde(default)]
    pub missing: bool,
}

impl Default for Observation {
    fn default() -> Self {
        Self {
            state: StateName::Pending,
            in_downtime: false,
            acknowledged: false,
            last_state_change: None,
            missing: false,
        }
    }
}

impl Observation {
    pub fn new(state: StateName) -> Self {
        Self {
            state,
            ..Default::default()
        }
    }

    /// Observation for an object that disappeared
    pub fn missing() -> Self {
        Self {
            missing: true,
            ..Default::default()
        }
    }

    pub fn in_downtime(mut self) -> Self {
        self.in_downtime = true;
        self
    }

    pub fn acknowledged(mut self) -> Self {
        self.acknowledged = true;
        self
    }

    pub fn changed_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_state_change = Some(at);
        self
    }
}

/// A leaf in a process tree
#[derive(Debug)]
pub struct LeafNode {
    core: NodeCore,
    object: MonitoredObject,
    observation: Observation,
}

impl LeafNode {
    pub fn new(object: MonitoredObject) -> ProcessResult<Self> {
        match &object {
            MonitoredObject::Host { host } => ensure_object_name(host)?,
            MonitoredObject::Service { host, service } => {
                ensure_object_name(host)?;
                ensure_object_name(service)?;
            }
        }
        Ok(Self {
            core: NodeCore::new(object.node_name()),
            object,
            observation: Observation::default(),
        })
    }

    pub fn host(host: impl Into<String>) -> ProcessResult<Self> {
        Self::new(MonitoredObject::Host { host: host.into() })
    }

    pub fn service(host: impl Into<String>, service: impl Into<String>) -> ProcessResult<Self> {
        Self::new(MonitoredObject::Service {
            host: host.into(),
            service: service.into(),
        })
    }

    pub fn name(&self) -> &str {
        self.core.name()
    }

    pub fn core(&self) -> &NodeCore {
        &self.core
    }

    pub fn object(&self) -> &MonitoredObject {
        &self.object
    }

    pub fn kind(&self) -> NodeKind {
        self.object.kind()
    }

    pub fn observation(&self) -> &Observation {
        &self.observation
    }

    /// Replace the current observation
    pub fn observe(&mut self, observation: Observation) -> ProcessResult<()> {
        if !observation.missing && !self.object.accepts(observation.state) {
            return Err(ProcessError::InvalidState {
                node: self.name().to_string(),
                state: observation.state.to_string(),
            });
        }
        self.observation = observation;
        Ok(())
    }

    pub fn is_missing(&self) -> bool {
        self.observation.missing
    }

    pub fn state_name(&self) -> StateName {
        if self.is_missing() {
            StateName::Missing
        } else {
            self.observation.state
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::new(
            self.state_name().sort_rank(),
            self.observation.in_downtime,
            self.observation.acknowledged,
        )
    }

    pub fn last_state_change(&self) -> Option<DateTime<Utc>> {
        self.observation.last_state_change
    }

    /// A present object in WARNING or worse
    pub fn is_problem(&self) -> bool {
        !self.is_missing() && self.state_name().sort_rank() >= SeverityRank::WARNING
    }
}
