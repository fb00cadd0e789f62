//! Call messages and execution entrypoint for the `SessionRegistry` module.

use schemars::JsonSchema;
use sov_modules_api::macros::serialize;
use sov_modules_api::macros::UniversalWallet;
use sov_modules_api::{Context, EventEmitter, Spec, TxState};

use crate::{Event, Operation, SessionRegistry, SessionRegistryError};

/// Transaction-level messages supported by the `SessionRegistry`.
///
/// Access control is enforced in [`execute`], see [`Operation::required_role`]:
/// - `SetManager` / `SetEnforcementEnabled` / `SetExpiryOffset`: owner-only
/// - `SetSessionSigner` / `SetBypass`: manager-only
/// - `SetSession` / `SetSessionBatch`: session-signer-only
/// - `EnforceSessionActive` / `EnforceSessionPresent`: anyone
#[derive(Debug, Clone, PartialEq, Eq, JsonSchema, UniversalWallet)]
#[serialize(Borsh, Serde)]
#[serde(rename_all = "snake_case")]
#[schemars(bound = "S: Spec", rename = "CallMessage")]
pub enum CallMessage<S: Spec> {
    /// Update the manager address.
    SetManager { new_manager: S::Address },

    /// Enable or disable global session enforcement.
    SetEnforcementEnabled { enabled: bool },

    /// Set a new global expiry offset.
    SetExpiryOffset { new_offset: u64 },

    /// Grant or revoke session-signer privileges for an address.
    SetSessionSigner { signer: S::Address, allowed: bool },

    /// Set or clear the bypass flag for a wallet.
    ///
    /// When `bypass == true`, the wallet is always treated as having
    /// an active and present session.
    SetBypass { wallet: S::Address, bypass: bool },

    /// Set or delete the session for a single wallet.
    ///
    /// `expires_at == 0` removes the session and its bypass flag.
    SetSession { wallet: S::Address, expires_at: u64 },

    /// Set or delete sessions for a batch of wallets, applied in order.
    SetSessionBatch {
        wallets: Vec<S::Address>,
        expiries: Vec<u64>,
    },

    /// Assert that a wallet has an active session.
    EnforceSessionActive { wallet: S::Address },

    /// Assert that a wallet has a present (non-deleted) session.
    EnforceSessionPresent { wallet: S::Address },
}

impl<S: Spec> CallMessage<S> {
    /// The operation this message invokes.
    pub fn operation(&self) -> Operation {
        match self {
            CallMessage::SetManager { .. } => Operation::SetManager,
            CallMessage::SetEnforcementEnabled { .. } => Operation::SetEnforcementEnabled,
            CallMessage::SetExpiryOffset { .. } => Operation::SetExpiryOffset,
            CallMessage::SetSessionSigner { .. } => Operation::SetSessionSigner,
            CallMessage::SetBypass { .. } => Operation::SetBypass,
            CallMessage::SetSession { .. } => Operation::SetSession,
            CallMessage::SetSessionBatch { .. } => Operation::SetSessionBatch,
            CallMessage::EnforceSessionActive { .. } => Operation::EnforceSessionActive,
            CallMessage::EnforceSessionPresent { .. } => Operation::EnforceSessionPresent,
        }
    }
}

/// Route a CallMessage to the corresponding `SessionRegistry` logic.
///
/// The sender's role is checked before anything is read or written. A failed
/// call reverts every write it made, so batches apply all-or-nothing.
pub fn execute<S: Spec>(
    module: &mut SessionRegistry<S>,
    msg: CallMessage<S>,
    context: &Context<S>,
    state: &mut impl TxState<S>,
) -> anyhow::Result<()> {
    module.authorize(msg.operation(), context.sender(), state)?;

    match msg {
        CallMessage::SetManager { new_manager } => {
            let old_manager = module.manager(state)?;

            module.manager.set(&new_manager, state)?;

            tracing::debug!(%old_manager, %new_manager, "Session registry manager set");

            module.emit_event(
                state,
                Event::ManagerSet {
                    old_manager,
                    new_manager,
                },
            );
        }
        CallMessage::SetEnforcementEnabled { enabled } => {
            module.enforcement_enabled.set(&enabled, state)?;

            tracing::debug!(enabled, "Session enforcement toggled");

            module.emit_event(state, Event::EnforcementEnabledSet { enabled });
        }
        CallMessage::SetExpiryOffset { new_offset } => {
            let old_offset = module.expiry_offset(state)?;

            module.expiry_offset.set(&new_offset, state)?;

            tracing::debug!(old_offset, new_offset, "Session expiry offset updated");

            module.emit_event(
                state,
                Event::ExpiryOffsetUpdated {
                    old_offset,
                    new_offset,
                },
            );
        }
        CallMessage::SetSessionSigner { signer, allowed } => {
            if allowed {
                module.session_signers.set(&signer, &true, state)?;
            } else {
                module.session_signers.remove(&signer, state)?;
            }

            tracing::debug!(%signer, allowed, "Session signer set");

            module.emit_event(state, Event::SessionSignerSet { signer, allowed });
        }
        CallMessage::SetBypass { wallet, bypass } => {
            module.write_bypass(&wallet, bypass, state)?;
        }
        CallMessage::SetSession { wallet, expires_at } => {
            module.write_session(&wallet, expires_at, state)?;
        }
        CallMessage::SetSessionBatch { wallets, expiries } => {
            if wallets.len() != expiries.len() {
                return Err(SessionRegistryError::MismatchedBatchLength {
                    wallets: wallets.len(),
                    expiries: expiries.len(),
                }
                .into());
            }

            for (wallet, expires_at) in wallets.iter().zip(expiries) {
                module.write_session(wallet, expires_at, state)?;
            }
        }

        // --- Endpoints for direct session checks via transactions ---
        CallMessage::EnforceSessionActive { wallet } => {
            module.enforce_session_active(&wallet, state)?;
        }
        CallMessage::EnforceSessionPresent { wallet } => {
            module.enforce_session_present(&wallet, state)?;
        }
    }

    Ok(())
}
