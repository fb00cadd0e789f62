//! Types used by the `SessionRegistry` module.

use schemars::JsonSchema;
use sov_modules_api::macros::serialize;
use sov_modules_api::Spec;

/// Genesis configuration of the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[serialize(Serde)]
#[serde(rename_all = "snake_case")]
pub struct RegistryConfig<S: Spec> {
    /// Can change the `manager`, toggle enforcement and move the expiry offset.
    pub owner: S::Address,

    /// Can grant or revoke session signers and manage per-wallet bypass.
    pub manager: S::Address,

    /// Initial value for the global enforcement flag.
    pub enforcement_enabled: bool,

    /// Grace period (seconds) added to every session expiry when checking activeness.
    pub expiry_offset: u64,
}

/// Per-wallet session state.
///
/// A wallet without a stored record behaves exactly like `Session::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, JsonSchema)]
#[serialize(Borsh, Serde)]
pub struct Session {
    /// Session expiry timestamp (seconds since epoch, as provided by DA time).
    /// `0` means the session is deleted.
    pub expiry_ts: u64,

    /// If `true`, this wallet is treated as always having an active
    /// and present session.
    pub bypass: bool,
}

impl Session {
    /// Expiry value marking a deleted session.
    pub const DELETED: u64 = 0;

    /// A session is present when it is bypassed or has not been deleted.
    /// Expiry is not considered.
    pub fn is_present(&self) -> bool {
        self.bypass || self.expiry_ts != Self::DELETED
    }

    /// A session is active when it is bypassed, or when it is not deleted and
    /// its offset expiry lies strictly after `now`.
    pub fn is_active(&self, expiry_offset: u64, now: u64) -> bool {
        self.bypass
            || (self.expiry_ts != Self::DELETED && self.effective_expiry(expiry_offset) > now)
    }

    /// Expiry including the grace offset, clamped to `u64::MAX`.
    pub fn effective_expiry(&self, expiry_offset: u64) -> u64 {
        self.expiry_ts.saturating_add(expiry_offset)
    }

    /// Returns `true` if the record carries no information and can be dropped from storage.
    pub fn is_vacant(&self) -> bool {
        !self.bypass && self.expiry_ts == Self::DELETED
    }
}

/// Roles checked by the authorization gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    Owner,
    Manager,
    SessionSigner,
}

/// Entry points of the registry, named as they appear in call messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumIter)]
pub enum Operation {
    SetManager,
    SetEnforcementEnabled,
    SetExpiryOffset,
    SetSessionSigner,
    SetBypass,
    SetSession,
    SetSessionBatch,
    EnforceSessionActive,
    EnforceSessionPresent,
}

impl Operation {
    /// Role the caller must hold, or `None` for operations open to anyone.
    pub fn required_role(self) -> Option<Role> {
        match self {
            Operation::SetManager
            | Operation::SetEnforcementEnabled
            | Operation::SetExpiryOffset => Some(Role::Owner),
            Operation::SetSessionSigner | Operation::SetBypass => Some(Role::Manager),
            Operation::SetSession | Operation::SetSessionBatch => Some(Role::SessionSigner),
            Operation::EnforceSessionActive | Operation::EnforceSessionPresent => None,
        }
    }
}
