use schemars::JsonSchema;
use sov_modules_api::macros::serialize;
use sov_modules_api::Spec;

/// Events emitted by successful registry calls.
///
/// Variant and field names are read by external indexers.
#[derive(Debug, Clone, PartialEq, Eq, JsonSchema)]
#[serialize(Borsh, Serde)]
#[serde(bound = "S: Spec", rename_all = "snake_case")]
#[schemars(bound = "S: Spec", rename = "Event")]
pub enum Event<S: Spec> {
    ManagerSet {
        old_manager: S::Address,
        new_manager: S::Address,
    },

    EnforcementEnabledSet {
        enabled: bool,
    },

    SessionSignerSet {
        signer: S::Address,
        allowed: bool,
    },

    /// `expiry_ts == 0` means the session was deleted.
    SessionSet {
        wallet: S::Address,
        expiry_ts: u64,
    },

    BypassSet {
        wallet: S::Address,
        bypass: bool,
    },

    ExpiryOffsetUpdated {
        old_offset: u64,
        new_offset: u64,
    },
}
