//! # Subsystem Container
//!
//! Builds every subsystem in dependency order:
//!
//! ```text
//! Level 0: Message bus, Access Store (ng-01), Crypto Gateway (ng-02)
//! Level 1: Majority Vote (ng-05), Authentication (ng-03)
//! Level 2: Access List Sync (ng-04), reaches ng-05 through MajorityVoteAdapter
//! ```
//!
//! ## Thread Safety
//!
//! - All subsystems wrapped in `Arc` for shared ownership
//! - Each service guards its own mutable state; the container holds no locks

use std::sync::Arc;

use ng_01_access_store::{AccessListRepository, KVStoreError, KeyValueStore, StorageLayout};
use ng_02_crypto_gateway::{CryptoError, CryptoGateway};
use ng_03_authentication::{AuthenticationDependencies, AuthenticationService};
use ng_04_access_list_sync::{AccessListSyncService, SyncDependencies};
use ng_05_majority_vote::{MajorityVoteDependencies, MajorityVoteService};
use shared_bus::InMemoryMessageBus;
use shared_types::{IdentifierError, Indicator, LockActuator, NodeId};
use thiserror::Error;
use tracing::{info, instrument};

use crate::adapters::{open_persistence, LoggingIndicator, LoggingLockActuator, MajorityVoteAdapter};
use crate::container::config::GateConfig;

pub type ConcreteAuthenticationService = AuthenticationService<InMemoryMessageBus, CryptoGateway>;

pub type ConcreteMajorityVoteService = MajorityVoteService<InMemoryMessageBus>;

pub type ConcreteSyncService = AccessListSyncService<
    InMemoryMessageBus,
    CryptoGateway,
    MajorityVoteAdapter<ConcreteMajorityVoteService>,
>;

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("Invalid node id: {0}")]
    NodeId(#[from] IdentifierError),

    #[error("No trusted edge public key configured")]
    MissingTrustedKey,

    #[error("Edge key rejected: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Storage unavailable: {0}")]
    Storage(#[from] KVStoreError),
}

/// LED and relay drivers handed to the services.
#[derive(Clone)]
pub struct GateHardware {
    pub indicator: Arc<dyn Indicator>,
    pub actuator: Arc<dyn LockActuator>,
}

impl GateHardware {
    /// Drivers that log every change.
    pub fn logging() -> Self {
        Self {
            indicator: Arc::new(LoggingIndicator::default()),
            actuator: Arc::new(LoggingLockActuator::default()),
        }
    }
}

/// Central container holding all subsystem instances.
pub struct GateContainer {
    // =========================================================================
    // LEVEL 0
    // =========================================================================
    /// Bus shared with the edge server and peer nodes.
    pub bus: Arc<InMemoryMessageBus>,

    /// Access Store (ng-01), single source of truth for authorization.
    pub access_list: Arc<AccessListRepository>,

    /// Crypto Gateway (ng-02).
    pub crypto: Arc<CryptoGateway>,

    // =========================================================================
    // LEVEL 1-2
    // =========================================================================
    pub majority_vote: Arc<ConcreteMajorityVoteService>,
    pub authentication: Arc<ConcreteAuthenticationService>,
    pub sync: Arc<ConcreteSyncService>,

    pub node_id: NodeId,

    /// Gate configuration (immutable after initialization).
    pub config: GateConfig,
}

impl GateContainer {
    /// Build a standalone gate with its own bus, configured storage and
    /// logging hardware.
    pub fn new(config: GateConfig) -> Result<Self, ContainerError> {
        let persistence = open_persistence(&config.storage)?;
        Self::with_parts(
            config,
            Arc::new(InMemoryMessageBus::new()),
            persistence,
            GateHardware::logging(),
        )
    }

    /// Build a gate on an existing bus, e.g. one shared with peers.
    #[instrument(name = "gate_init", skip_all)]
    pub fn with_parts(
        config: GateConfig,
        bus: Arc<InMemoryMessageBus>,
        persistence: Box<dyn KeyValueStore>,
        hardware: GateHardware,
    ) -> Result<Self, ContainerError> {
        let node_id = NodeId::new(config.node.node_id.clone())?;
        info!("Initializing NexxGate node {}", node_id);

        // =====================================================================
        // LEVEL 0
        // =====================================================================
        let access_list = Arc::new(AccessListRepository::new(
            config.storage.capacity,
            persistence,
            StorageLayout::new(config.storage.namespace.clone()),
        ));
        info!("  [ng-01] Access store initialized (capacity {})", access_list.capacity());

        let trusted = config
            .security
            .trusted_public_key
            .as_deref()
            .ok_or(ContainerError::MissingTrustedKey)?;
        let mut crypto = CryptoGateway::new(trusted)?;
        if let Some(encryption_key) = config.security.edge_encryption_key.as_deref() {
            crypto = crypto.with_encryption_key(encryption_key)?;
        }
        let crypto = Arc::new(crypto);
        info!("  [ng-02] Crypto gateway initialized");

        // =====================================================================
        // LEVEL 1
        // =====================================================================
        let majority_vote = Arc::new(MajorityVoteService::new(MajorityVoteDependencies {
            publisher: bus.clone(),
            access_list: access_list.clone(),
            node_id: node_id.clone(),
            config: config.majority_vote.clone(),
        }));
        info!("  [ng-05] Majority vote initialized");

        let authentication = Arc::new(AuthenticationService::new(AuthenticationDependencies {
            publisher: bus.clone(),
            crypto: crypto.clone(),
            access_list: access_list.clone(),
            indicator: hardware.indicator.clone(),
            actuator: hardware.actuator.clone(),
            node_id: node_id.clone(),
            config: config.authentication.clone(),
        }));
        info!("  [ng-03] Authentication initialized");

        // =====================================================================
        // LEVEL 2
        // =====================================================================
        let sync = Arc::new(AccessListSyncService::new(SyncDependencies {
            publisher: bus.clone(),
            crypto: crypto.clone(),
            access_list: access_list.clone(),
            vote: Arc::new(MajorityVoteAdapter::new(majority_vote.clone())),
            indicator: hardware.indicator,
            config: config.sync.clone(),
        }));
        info!("  [ng-04] Access list sync initialized");

        Ok(Self {
            bus,
            access_list,
            crypto,
            majority_vote,
            authentication,
            sync,
            node_id,
            config,
        })
    }
}
