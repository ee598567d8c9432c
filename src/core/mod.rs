pub mod account;
pub mod error;
pub mod ledger;

pub use account::{Account, AccountNumber, Amount, MIN_BALANCE};
pub use error::{LedgerError, LedgerResult};
pub use ledger::Ledger;
