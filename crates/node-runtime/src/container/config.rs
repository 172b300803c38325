//! # Gate Configuration
//!
//! Unified configuration for all subsystems and runtime parameters.
//!
//! ## Security Requirements
//!
//! - `trusted_public_key` MUST be set in production; without it no list
//!   update or verdict can ever be accepted
//! - All timeouts and limits have sane defaults with override capability

use ng_03_authentication::{AuthenticationConfig, IdentifierProtection};
use ng_04_access_list_sync::SyncConfig;
use ng_05_majority_vote::MajorityVoteConfig;
use shared_types::{IdentifierError, NodeId};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Complete gate configuration.
#[derive(Debug, Clone, Default)]
pub struct GateConfig {
    pub node: NodeSettings,
    pub storage: StorageConfig,
    pub security: SecurityConfig,
    pub authentication: AuthenticationConfig,
    pub sync: SyncConfig,
    pub majority_vote: MajorityVoteConfig,
}

impl GateConfig {
    /// Validate configuration for production readiness.
    ///
    /// # Returns
    ///
    /// Returns `Err` if:
    /// - no trusted edge public key is configured
    /// - the node id is empty, too long or not printable ASCII
    /// - the access list capacity is zero
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        if self.security.trusted_public_key.is_none() {
            return Err(ConfigError::MissingTrustedKey);
        }
        NodeId::new(self.node.node_id.clone())?;
        if self.storage.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.authentication.protection == IdentifierProtection::Encrypted
            && self.security.edge_encryption_key.is_none()
        {
            warn!("Encrypted identifiers configured without an edge key; scans deny until one is rotated in");
        }
        Ok(())
    }

    /// Build a configuration from defaults plus `NG_*` overrides read
    /// through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(node_id) = lookup("NG_NODE_ID") {
            config.node.node_id = node_id.trim().to_string();
        }

        if let Some(key) = pem_setting(&lookup, "NG_TRUSTED_PUBLIC_KEY") {
            config.security.trusted_public_key = Some(key);
            info!("Loaded trusted edge public key from environment");
        }
        if let Some(key) = pem_setting(&lookup, "NG_EDGE_ENCRYPTION_KEY") {
            config.security.edge_encryption_key = Some(key);
        }

        if let Some(path) = lookup("NG_STORAGE_PATH") {
            let path = path.trim();
            config.storage.path = if path.is_empty() || path == ":memory:" {
                None
            } else {
                Some(PathBuf::from(path))
            };
        }
        if let Some(capacity) = parsed(&lookup, "NG_ACCESS_CAPACITY") {
            config.storage.capacity = capacity;
        }

        if let Some(protection) = parsed(&lookup, "NG_IDENTIFIER_PROTECTION") {
            config.authentication.protection = protection;
        }
        if let Some(binding) = parsed(&lookup, "NG_VERDICT_BINDING") {
            config.authentication.verdict_binding = binding;
        }
        if let Some(secs) = parsed::<_, u64>(&lookup, "NG_RESYNC_INTERVAL_SECS") {
            config.sync.resync_interval = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(accept) = flag(&lookup, "NG_ACCEPT_UNSIGNED_LISTS") {
            config.sync.accept_unsigned_lists = accept;
        }
        if let Some(dedup) = flag(&lookup, "NG_DEDUP_VOTES") {
            config.majority_vote.dedup_by_peer = dedup;
        }

        config
    }
}

/// Load configuration from the process environment.
pub fn load_config() -> GateConfig {
    GateConfig::from_lookup(|key| std::env::var(key).ok())
}

/// PEM public key from `NAME`, or from the file named by `NAME_FILE`.
///
/// Inline values may carry literal `\n` escapes in place of newlines.
fn pem_setting<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let file_var = format!("{name}_FILE");
    let raw = match lookup(name) {
        Some(inline) => inline.replace("\\n", "\n"),
        None => {
            let path = lookup(&file_var)?;
            match std::fs::read_to_string(path.trim()) {
                Ok(contents) => contents,
                Err(e) => {
                    warn!("{}={:?} unreadable, ignoring: {}", file_var, path, e);
                    return None;
                }
            }
        }
    };

    let pem = raw.trim();
    if pem.starts_with("-----BEGIN") && pem.contains("PUBLIC KEY-----") {
        Some(format!("{pem}\n"))
    } else {
        warn!("{} must be a PEM-encoded RSA public key, ignoring", name);
        None
    }
}

fn parsed<F, T>(lookup: &F, name: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Invalid {}={:?}, keeping default", name, raw);
            None
        }
    }
}

fn flag<F>(lookup: &F, name: &str) -> Option<bool>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(name)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            warn!("Invalid {}={:?}, keeping default", name, raw);
            None
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "SECURITY VIOLATION: no trusted edge public key. \
         Set NG_TRUSTED_PUBLIC_KEY (or NG_TRUSTED_PUBLIC_KEY_FILE) to the edge server's PEM key."
    )]
    MissingTrustedKey,

    #[error("Invalid node id: {0}")]
    InvalidNodeId(#[from] IdentifierError),

    #[error("Access list capacity must be at least 1")]
    ZeroCapacity,
}

/// Node identity.
#[derive(Debug, Clone)]
pub struct NodeSettings {
    /// Identity reported in authentication records and vote messages.
    pub node_id: String,
}

impl Default for NodeSettings {
    fn default() -> Self {
        Self {
            node_id: "1".to_string(),
        }
    }
}

/// Persistent access list storage.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage file; `None` keeps the list in memory only.
    pub path: Option<PathBuf>,
    /// Key partition for the access list records.
    pub namespace: String,
    /// Maximum identifiers held (N).
    pub capacity: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: Some(PathBuf::from("./data/access_list.db")),
            namespace: ng_01_access_store::domain::layout::DEFAULT_NAMESPACE.to_string(),
            capacity: ng_01_access_store::DEFAULT_CAPACITY,
        }
    }
}

/// Edge key material, PEM-encoded RSA public keys.
#[derive(Debug, Clone, Default)]
pub struct SecurityConfig {
    /// Verifies list updates, removals and verdicts.
    /// MUST be set in production.
    pub trusted_public_key: Option<String>,
    /// Target of identifier encryption; may be rotated at runtime.
    pub edge_encryption_key: Option<String>,
}
