use std::fmt;

use serde::{Serialize, Deserialize};

use crate::core::error::{LedgerError, LedgerResult};

pub type Amount = f64;
pub type AccountNumber = u64;

/// Floor below which a withdrawal is refused.
pub const MIN_BALANCE: Amount = 500.0;

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Account {
    number: AccountNumber,
    first_name: String,
    last_name: String,
    balance: Amount
}

impl Account {
    pub(crate) fn new(number: AccountNumber, first_name: &str, last_name: &str, balance: Amount) -> Account {
        return Account {
            number,
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            balance
        };
    }

    pub fn number(&self) -> AccountNumber {
        self.number
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub(crate) fn deposit(&mut self, amount: Amount) {
        self.balance += amount;
    }

    /// Take `amount` out of the account, unless doing so would leave
    /// less than [`MIN_BALANCE`] behind. A refused withdrawal leaves
    /// the balance as it was.
    pub(crate) fn withdraw(&mut self, amount: Amount) -> LedgerResult<()> {
        if self.balance - amount < MIN_BALANCE {
            return Err(LedgerError::InsufficientFunds {
                number: self.number,
                balance: self.balance,
                requested: amount
            });
        }
        self.balance -= amount;
        return Ok(());
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Account Number: {}", self.number)?;
        writeln!(f, "First Name: {}", self.first_name)?;
        writeln!(f, "Last Name: {}", self.last_name)?;
        write!(f, "Balance: {:.2}", self.balance)
    }
}
