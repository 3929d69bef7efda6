//! Engine configuration schema.
//!
//! An `EngineConfig` is deserialized from TOML. Every section and every field
//! has a default, so an empty document is a valid configuration.

use serde::{Deserialize, Serialize};

use caseshare_contracts::access::DenialDisclosure;

/// Access decision settings.
///
/// Example in TOML:
/// ```toml
/// [access]
/// denial_disclosure = "forbidden"
/// verify_index_on_decision = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessSettings {
    /// How every view/comment/reply/export denial is reported.
    pub denial_disclosure: DenialDisclosure,

    /// Verify the index entries of a case against the source tables before
    /// answering any doctor-facing decision on it (view, comment, reply,
    /// export), repairing on mismatch.
    pub verify_index_on_decision: bool,
}

impl Default for AccessSettings {
    fn default() -> Self {
        Self {
            denial_disclosure: DenialDisclosure::NotFound,
            verify_index_on_decision: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MentionSettings {
    /// Upper bound on doctors per mention call. Ids past the bound get a
    /// per-item error; the rest of the batch still runs.
    pub max_batch: usize,
}

impl Default for MentionSettings {
    fn default() -> Self {
        Self { max_batch: 50 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditSettings {
    /// Name stamped into every hash in the audit chain.
    pub ledger_id: String,

    /// Record a `ViewGranted`/`ViewDenied` entry for each view decision.
    pub record_views: bool,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            ledger_id: "caseshare".to_string(),
            record_views: true,
        }
    }
}

/// The top-level structure deserialized from a TOML configuration file.
///
/// Example:
/// ```toml
/// [access]
/// denial_disclosure = "not-found"
///
/// [mentions]
/// max_batch = 20
///
/// [audit]
/// ledger_id = "clinic-east"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub access: AccessSettings,
    pub mentions: MentionSettings,
    pub audit: AuditSettings,
}
