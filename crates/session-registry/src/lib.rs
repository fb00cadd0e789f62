//! Session registry module.
//!
//! This module defines the `SessionRegistry` Sovereign SDK module, which
//! tracks per-wallet sessions so that other runtime modules (e.g. a trading
//! venue) can require a valid session before privileged operations without
//! managing signers or expiries themselves. It exposes:
//! - Owner/manager configuration and the global enforcement switch,
//! - Session signer management,
//! - Per-wallet session state (expiry + bypass),
//! - In-process enforcement and query helpers for other modules.
//!
mod call;
mod error;
mod event;
mod types;

pub use call::CallMessage;
pub use error::SessionRegistryError;
pub use event::Event;
pub use types::{Operation, RegistryConfig, Role, Session};

use sov_modules_api::{
    Context, EventEmitter, GenesisState, Module, ModuleId, ModuleInfo, ModuleRestApi, Spec,
    StateMap, StateValue, TxState,
};

/// Session registry module definition.
///
/// - `owner`: address with ultimate control (manager, enforcement flag, expiry offset),
/// - `manager`: operational address that controls signers and bypass,
/// - `enforcement_enabled`: global kill-switch for enforcement checks,
/// - `expiry_offset`: grace period added to every expiry,
/// - `sessions`: per-wallet session records,
/// - `session_signers`: addresses allowed to set/remove sessions.
#[derive(Clone, ModuleInfo, ModuleRestApi)]
pub struct SessionRegistry<S: Spec> {
    /// Unique identifier of this module in the runtime.
    #[id]
    pub id: ModuleId,

    /// Source of the current chain time.
    #[module]
    pub chain_state: sov_chain_state::ChainState<S>,

    /// Address with ultimate ownership of the registry. Fixed at genesis.
    #[state]
    pub owner: StateValue<S::Address>,

    /// Operational address that sets session signers and per-wallet bypass.
    #[state]
    pub manager: StateValue<S::Address>,

    /// Global flag controlling whether session enforcement is active.
    #[state]
    pub enforcement_enabled: StateValue<bool>,

    /// Mapping from wallet address to its session state.
    /// Vacant records are removed rather than stored.
    #[state]
    pub sessions: StateMap<S::Address, Session>,

    /// Mapping from address to whether it is allowed to act as a session signer.
    #[state]
    pub session_signers: StateMap<S::Address, bool>,

    /// Grace period added to every session expiry.
    /// Used in emergencies if backend services are down and need to extend sessions.
    #[state]
    pub expiry_offset: StateValue<u64>,
}

impl<S: Spec> Module for SessionRegistry<S> {
    type Spec = S;

    type Config = RegistryConfig<S>;

    type CallMessage = CallMessage<S>;

    type Event = Event<S>;

    type Error = anyhow::Error;

    /// Initialize module state from the [`RegistryConfig`] in the rollup's genesis.
    ///
    /// The signer allow-list and session map start empty.
    fn genesis(
        &mut self,
        _header: &<S::Da as sov_modules_api::DaSpec>::BlockHeader,
        config: &Self::Config,
        state: &mut impl GenesisState<S>,
    ) -> anyhow::Result<()> {
        self.owner.set(&config.owner, state)?;
        self.manager.set(&config.manager, state)?;
        self.enforcement_enabled
            .set(&config.enforcement_enabled, state)?;
        self.expiry_offset.set(&config.expiry_offset, state)?;

        tracing::debug!(
            owner = %config.owner,
            manager = %config.manager,
            enforcement_enabled = config.enforcement_enabled,
            expiry_offset = config.expiry_offset,
            "Session registry initialized"
        );

        Ok(())
    }

    fn call(
        &mut self,
        msg: Self::CallMessage,
        context: &Context<Self::Spec>,
        state: &mut impl TxState<S>,
    ) -> Result<(), Self::Error> {
        call::execute(self, msg, context, state)
    }
}

impl<S: Spec> SessionRegistry<S> {
    // --- APIs for consumer modules ---

    /// Returns `true` if the wallet currently has an active session.
    ///
    /// A session is active if `bypass` is set, or if its expiry plus the
    /// global offset (saturating) is strictly greater than the chain time.
    pub fn is_session_active(
        &self,
        wallet: &S::Address,
        state: &mut impl TxState<S>,
    ) -> anyhow::Result<bool> {
        let Some(session) = self.sessions.get(wallet, state)? else {
            return Ok(false);
        };

        if session.bypass {
            return Ok(true);
        }

        let offset = self.expiry_offset(state)?;
        let now = self.now(state)?;

        Ok(session.is_active(offset, now))
    }

    /// Require that the wallet has an active session.
    ///
    /// Always succeeds while enforcement is disabled.
    pub fn enforce_session_active(
        &self,
        wallet: &S::Address,
        state: &mut impl TxState<S>,
    ) -> anyhow::Result<()> {
        if !self.is_enforcement_enabled(state)? {
            return Ok(());
        }

        if self.is_session_active(wallet, state)? {
            Ok(())
        } else {
            Err(SessionRegistryError::SessionNotActive {
                wallet: wallet.to_string(),
            }
            .into())
        }
    }

    /// Returns `true` if a session is present (bypassed, or not deleted) for a wallet.
    /// Expiry is ignored.
    pub fn is_session_present(
        &self,
        wallet: &S::Address,
        state: &mut impl TxState<S>,
    ) -> anyhow::Result<bool> {
        Ok(self
            .sessions
            .get(wallet, state)?
            .is_some_and(|session| session.is_present()))
    }

    /// Require that a session is present for a wallet.
    ///
    /// Always succeeds while enforcement is disabled.
    pub fn enforce_session_present(
        &self,
        wallet: &S::Address,
        state: &mut impl TxState<S>,
    ) -> anyhow::Result<()> {
        if !self.is_enforcement_enabled(state)? {
            return Ok(());
        }

        if self.is_session_present(wallet, state)? {
            Ok(())
        } else {
            Err(SessionRegistryError::SessionNotPresent {
                wallet: wallet.to_string(),
            }
            .into())
        }
    }

    // --- Read helpers ---

    /// Stored session record for a wallet, `None` if absent or deleted.
    pub fn session(
        &self,
        wallet: &S::Address,
        state: &mut impl TxState<S>,
    ) -> anyhow::Result<Option<Session>> {
        Ok(self.sessions.get(wallet, state)?)
    }

    /// Returns `true` if the given address is configured as a session signer.
    ///
    /// Absence in the map is treated as `false`.
    pub fn is_session_signer(
        &self,
        signer: &S::Address,
        state: &mut impl TxState<S>,
    ) -> anyhow::Result<bool> {
        Ok(self.session_signers.get(signer, state)?.unwrap_or(false))
    }

    /// The configured owner.
    ///
    /// # Errors
    ///
    /// - Returns an error if the owner has not been initialized in state.
    pub fn owner(&self, state: &mut impl TxState<S>) -> anyhow::Result<S::Address> {
        Ok(self
            .owner
            .get(state)?
            .ok_or(SessionRegistryError::OwnerNotInitialized)?)
    }

    /// The configured manager.
    ///
    /// # Errors
    ///
    /// - Returns an error if the manager has not been initialized in state.
    pub fn manager(&self, state: &mut impl TxState<S>) -> anyhow::Result<S::Address> {
        Ok(self
            .manager
            .get(state)?
            .ok_or(SessionRegistryError::ManagerNotInitialized)?)
    }

    /// Global grace period, `0` if never set.
    pub fn expiry_offset(&self, state: &mut impl TxState<S>) -> anyhow::Result<u64> {
        Ok(self.expiry_offset.get(state)?.unwrap_or(0))
    }

    /// Whether enforcement is on. Fails closed: an unset flag counts as enabled.
    pub fn is_enforcement_enabled(&self, state: &mut impl TxState<S>) -> anyhow::Result<bool> {
        Ok(self.enforcement_enabled.get(state)?.unwrap_or(true))
    }

    // --- Helpers ---

    /// Current chain time in seconds. Pre-epoch times clamp to `0`.
    fn now(&self, state: &mut impl TxState<S>) -> anyhow::Result<u64> {
        let now = self.chain_state.get_time(state)?;
        Ok(u64::try_from(now.secs()).unwrap_or(0))
    }

    /// Fails with [`SessionRegistryError::UnauthorizedCaller`] unless `sender`
    /// holds the role `operation` requires.
    fn authorize(
        &self,
        operation: Operation,
        sender: &S::Address,
        state: &mut impl TxState<S>,
    ) -> anyhow::Result<()> {
        let Some(required_role) = operation.required_role() else {
            return Ok(());
        };

        let authorized = match required_role {
            Role::Owner => sender == &self.owner(state)?,
            Role::Manager => sender == &self.manager(state)?,
            Role::SessionSigner => self.is_session_signer(sender, state)?,
        };

        if authorized {
            return Ok(());
        }

        tracing::debug!(%sender, %operation, %required_role, "Unauthorized session registry call");

        Err(SessionRegistryError::UnauthorizedCaller {
            required_role,
            operation,
        }
        .into())
    }

    /// Create, update, or delete the session for a wallet.
    ///
    /// - If `expires_at == 0`, the record is removed, which also clears `bypass`.
    /// - Otherwise `expiry_ts` is set to `expires_at` and `bypass` is retained
    ///   from any existing record, or `false` if none exists.
    fn write_session(
        &mut self,
        wallet: &S::Address,
        expires_at: u64,
        state: &mut impl TxState<S>,
    ) -> anyhow::Result<()> {
        if expires_at == Session::DELETED {
            self.sessions.remove(wallet, state)?;
        } else {
            let bypass = self
                .sessions
                .get(wallet, state)?
                .is_some_and(|session| session.bypass);

            let session = Session {
                expiry_ts: expires_at,
                bypass,
            };

            self.sessions.set(wallet, &session, state)?;
        }

        tracing::debug!(%wallet, expiry_ts = expires_at, "Session set");

        self.emit_event(
            state,
            Event::SessionSet {
                wallet: wallet.clone(),
                expiry_ts: expires_at,
            },
        );

        Ok(())
    }

    /// Set the bypass flag, creating a record with a deleted expiry if needed.
    fn write_bypass(
        &mut self,
        wallet: &S::Address,
        bypass: bool,
        state: &mut impl TxState<S>,
    ) -> anyhow::Result<()> {
        let mut session = self.sessions.get(wallet, state)?.unwrap_or_default();
        session.bypass = bypass;

        if session.is_vacant() {
            self.sessions.remove(wallet, state)?;
        } else {
            self.sessions.set(wallet, &session, state)?;
        }

        tracing::debug!(%wallet, bypass, "Session bypass set");

        self.emit_event(
            state,
            Event::BypassSet {
                wallet: wallet.clone(),
                bypass,
            },
        );

        Ok(())
    }
}
