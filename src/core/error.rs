use thiserror::Error;

use crate::backend::BackendError;
use crate::core::account::{Amount, AccountNumber};

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Occurs when an operation names an account number
    /// which is not on the ledger.
    #[error("account not found: {0}")]
    AccountNotFound(AccountNumber),
    /// Occurs when a withdrawal would leave the account
    /// below the minimum balance.
    #[error("insufficient funds in account {number}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        number: AccountNumber,
        balance: Amount,
        requested: Amount
    },
    /// Occurs when an amount is negative or not a number, or when
    /// it would carry a balance out of the representable range.
    #[error("invalid amount: {0}")]
    InvalidAmount(Amount),
    /// Occurs when every account number has been handed out.
    #[error("no account numbers left")]
    NumbersExhausted,
    /// Occurs when the ledger could not be written to or read from its store.
    #[error("persistence failure: {0}")]
    PersistenceFailure(#[from] BackendError)
}

pub type LedgerResult<T> = Result<T, LedgerError>;
