// Mock DEX module used for testing the in-process session APIs.

mod test_dex {
    use anyhow::{ensure, Result};
    use schemars::JsonSchema;
    use sov_modules_api::macros::{serialize, UniversalWallet};
    use sov_modules_api::{
        Context, GenesisState, Module, ModuleId, ModuleInfo, ModuleRestApi, Spec, TxState,
    };

    use session_registry::{CallMessage, SessionRegistry};

    #[derive(Clone, Debug, PartialEq, Eq)]
    #[serialize(Serde)]
    pub struct DexConfig {}

    #[derive(Debug, Clone, PartialEq, Eq, JsonSchema, UniversalWallet)]
    #[serialize(Borsh, Serde)]
    #[schemars(bound = "S: Spec", rename = "DexCallMessage")]
    #[serde(rename_all = "snake_case")]
    pub enum DexCallMessage<S: Spec> {
        EnforceSessionActive { wallet: S::Address },
        EnforceSessionPresent { wallet: S::Address },
        /// Fails unless `is_session_active` returns `expected`.
        ExpectSessionActive { wallet: S::Address, expected: bool },
        /// Fails unless `is_session_present` returns `expected`.
        ExpectSessionPresent { wallet: S::Address, expected: bool },
        /// Fails unless the stored record has this expiry and bypass.
        /// A missing record reads as `(0, false)`.
        ExpectSession {
            wallet: S::Address,
            expiry_ts: u64,
            bypass: bool,
        },
        /// Fails unless `is_session_signer` returns `expected`.
        ExpectSessionSigner { signer: S::Address, expected: bool },
        /// Fails unless the registry's manager is `manager`.
        ExpectManager { manager: S::Address },
        /// Fails unless the enforce call for `wallet` errors with `error`.
        /// Checks activeness if `active`, presence otherwise.
        ExpectEnforceError {
            wallet: S::Address,
            active: bool,
            error: String,
        },
        /// Forwards `SetManager` to the registry as the sender and fails
        /// unless it errors with `error`.
        ExpectSetManagerError {
            new_manager: S::Address,
            error: String,
        },
        /// Forwards `SetSessionBatch` to the registry as the sender and fails
        /// unless it errors with `error`.
        ExpectSessionBatchError {
            wallets: Vec<S::Address>,
            expiries: Vec<u64>,
            error: String,
        },
    }

    #[derive(Clone, ModuleInfo, ModuleRestApi)]
    pub struct TestDex<S: Spec> {
        #[id]
        pub id: ModuleId,

        #[module]
        pub session_registry: SessionRegistry<S>,
    }

    impl<S: Spec> Module for TestDex<S> {
        type Spec = S;
        type Config = DexConfig;
        type CallMessage = DexCallMessage<S>;
        type Event = ();
        type Error = anyhow::Error;

        fn genesis(
            &mut self,
            _header: &<S::Da as sov_modules_api::DaSpec>::BlockHeader,
            _config: &Self::Config,
            _state: &mut impl GenesisState<S>,
        ) -> Result<()> {
            Ok(())
        }

        fn call(
            &mut self,
            msg: Self::CallMessage,
            ctx: &Context<S>,
            state: &mut impl TxState<S>,
        ) -> Result<()> {
            let registry = &mut self.session_registry;

            match msg {
                DexCallMessage::EnforceSessionActive { wallet } => {
                    registry.enforce_session_active(&wallet, state)
                }
                DexCallMessage::EnforceSessionPresent { wallet } => {
                    registry.enforce_session_present(&wallet, state)
                }
                DexCallMessage::ExpectSessionActive { wallet, expected } => {
                    let actual = registry.is_session_active(&wallet, state)?;
                    ensure!(actual == expected, "is_session_active returned {actual}");
                    Ok(())
                }
                DexCallMessage::ExpectSessionPresent { wallet, expected } => {
                    let actual = registry.is_session_present(&wallet, state)?;
                    ensure!(actual == expected, "is_session_present returned {actual}");
                    Ok(())
                }
                DexCallMessage::ExpectSession {
                    wallet,
                    expiry_ts,
                    bypass,
                } => {
                    let session = registry.session(&wallet, state)?.unwrap_or_default();
                    ensure!(
                        session.expiry_ts == expiry_ts && session.bypass == bypass,
                        "unexpected session {session:?}"
                    );
                    Ok(())
                }
                DexCallMessage::ExpectSessionSigner { signer, expected } => {
                    let actual = registry.is_session_signer(&signer, state)?;
                    ensure!(actual == expected, "is_session_signer returned {actual}");
                    Ok(())
                }
                DexCallMessage::ExpectManager { manager } => {
                    let actual = registry.manager(state)?;
                    ensure!(actual == manager, "manager is {actual}");
                    Ok(())
                }
                DexCallMessage::ExpectEnforceError {
                    wallet,
                    active,
                    error,
                } => {
                    let result = if active {
                        registry.enforce_session_active(&wallet, state)
                    } else {
                        registry.enforce_session_present(&wallet, state)
                    };
                    expect_error(result, &error)
                }
                DexCallMessage::ExpectSetManagerError { new_manager, error } => {
                    let result = registry.call(CallMessage::SetManager { new_manager }, ctx, state);
                    expect_error(result, &error)
                }
                DexCallMessage::ExpectSessionBatchError {
                    wallets,
                    expiries,
                    error,
                } => {
                    let result = registry.call(
                        CallMessage::SetSessionBatch { wallets, expiries },
                        ctx,
                        state,
                    );
                    expect_error(result, &error)
                }
            }
        }
    }

    fn expect_error(result: Result<()>, expected: &str) -> Result<()> {
        match result {
            Ok(()) => anyhow::bail!("call succeeded, expected error: {expected}"),
            Err(e) => {
                ensure!(e.to_string() == expected, "unexpected error: {e}");
                Ok(())
            }
        }
    }
}

pub use test_dex::{DexCallMessage, DexConfig, TestDex};
