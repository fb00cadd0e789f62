use thiserror::Error;

use crate::types::{Operation, Role};

/// Failures returned by the registry.
///
/// Wallet addresses are carried in their display form.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionRegistryError {
    #[error("Owner not initialized")]
    OwnerNotInitialized,

    #[error("Manager not initialized")]
    ManagerNotInitialized,

    #[error("Caller is not the {required_role}, which is required for {operation}")]
    UnauthorizedCaller {
        required_role: Role,
        operation: Operation,
    },

    #[error("Discrepancy in batch lengths: {wallets} wallets, {expiries} expiries")]
    MismatchedBatchLength { wallets: usize, expiries: usize },

    #[error("Session not active for wallet {wallet}")]
    SessionNotActive { wallet: String },

    #[error("Session not present for wallet {wallet}")]
    SessionNotPresent { wallet: String },
}
