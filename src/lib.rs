mod core;
mod bank;
pub mod backend;

pub use crate::core::{Account, AccountNumber, Amount, Ledger, LedgerError, LedgerResult, MIN_BALANCE};
pub use crate::core::{account, ledger, error};
pub use crate::bank::{Bank, BankStatus};
