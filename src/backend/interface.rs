use std::path::PathBuf;

use thiserror::Error;

use crate::core::{AccountNumber, Amount, Ledger};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error
    },
    #[error("malformed ledger snapshot: {0}")]
    Format(#[from] serde_json::Error),
    #[error("balance of account {number} cannot be stored: {balance}")]
    NonFinite {
        number: AccountNumber,
        balance: Amount
    }
}

pub type Result<T> = std::result::Result<T, BackendError>;

/// Durable home of a ledger. Every save replaces the previous
/// snapshot as a whole.
pub trait LedgerStore: Send + Sync {
    /// Most recently saved ledger, or `None` if nothing was ever saved.
    fn load(&self) -> Result<Option<Ledger>>;
    fn save(&self, ledger: &Ledger) -> Result<()>;
}

/// JSON writes infinities and NaN as `null`, which would make the
/// snapshot unreadable, so stores refuse such a ledger outright.
pub(crate) fn check_storable(ledger: &Ledger) -> Result<()> {
    return match ledger.accounts().find(|account| !account.balance().is_finite()) {
        Some(account) => Err(BackendError::NonFinite {
            number: account.number(),
            balance: account.balance()
        }),
        None => Ok(())
    };
}
