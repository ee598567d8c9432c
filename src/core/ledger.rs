use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};

use crate::core::account::{Account, AccountNumber, Amount};
use crate::core::error::{LedgerError, LedgerResult};

type AccountMap = BTreeMap<AccountNumber, Account>;

/// All open accounts, keyed by number, together with the sequence
/// that hands out new numbers. Numbers are never reused, not even
/// after the account holding one is closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LedgerRecord")]
pub struct Ledger {
    next_number: AccountNumber,
    accounts: AccountMap
}

/// Shape of a stored ledger, before the numbering sequence is
/// reconciled with the accounts it contains.
#[derive(Deserialize)]
struct LedgerRecord {
    #[serde(default)]
    next_number: AccountNumber,
    accounts: AccountMap
}

impl TryFrom<LedgerRecord> for Ledger {
    type Error = String;

    fn try_from(record: LedgerRecord) -> Result<Self, Self::Error> {
        let accounts: AccountMap = record.accounts.into_values()
            .map(|account| (account.number(), account))
            .collect();
        let after_last = match accounts.keys().next_back() {
            Some(last) => last.checked_add(1)
                .ok_or_else(|| format!("account number {} leaves no room for new accounts", last))?,
            None => Self::FIRST_NUMBER
        };
        let next_number = record.next_number.max(after_last);

        return Ok(Ledger { next_number, accounts });
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Ledger::new()
    }
}

impl Ledger {
    const FIRST_NUMBER: AccountNumber = 1;

    pub fn new() -> Ledger {
        return Ledger { next_number: Self::FIRST_NUMBER, accounts: BTreeMap::new() };
    }

    /// Ledger holding exactly `accounts`, bypassing the opening rules.
    #[cfg(test)]
    pub(crate) fn with_accounts(accounts: Vec<Account>) -> Ledger {
        let next_number = accounts.iter().map(Account::number).max().map_or(Self::FIRST_NUMBER, |n| n + 1);
        let accounts = accounts.into_iter().map(|account| (account.number(), account)).collect();
        return Ledger { next_number, accounts };
    }

    pub fn next_number(&self) -> AccountNumber {
        self.next_number
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    /// Open an account under the next free number. The initial
    /// balance is taken as given, even below the minimum, but it
    /// has to be a finite number.
    pub fn open(&mut self, first_name: &str, last_name: &str, initial_balance: Amount) -> LedgerResult<&Account> {
        if !initial_balance.is_finite() {
            return Err(LedgerError::InvalidAmount(initial_balance));
        }
        let number = self.next_number;
        self.next_number = number.checked_add(1).ok_or(LedgerError::NumbersExhausted)?;

        let account = Account::new(number, first_name, last_name, initial_balance);
        return Ok(self.accounts.entry(number).or_insert(account));
    }

    pub fn get(&self, number: AccountNumber) -> LedgerResult<&Account> {
        self.accounts.get(&number).ok_or(LedgerError::AccountNotFound(number))
    }

    pub fn deposit(&mut self, number: AccountNumber, amount: Amount) -> LedgerResult<&Account> {
        let account = self.get_mut(number)?;
        Self::check_amount(amount)?;
        if !(account.balance() + amount).is_finite() {
            return Err(LedgerError::InvalidAmount(amount));
        }
        account.deposit(amount);
        return Ok(&*account);
    }

    pub fn withdraw(&mut self, number: AccountNumber, amount: Amount) -> LedgerResult<&Account> {
        let account = self.get_mut(number)?;
        Self::check_amount(amount)?;
        account.withdraw(amount)?;
        return Ok(&*account);
    }

    /// Remove an account, whatever its balance, and hand it back.
    pub fn close(&mut self, number: AccountNumber) -> LedgerResult<Account> {
        self.accounts.remove(&number).ok_or(LedgerError::AccountNotFound(number))
    }

    fn get_mut(&mut self, number: AccountNumber) -> LedgerResult<&mut Account> {
        self.accounts.get_mut(&number).ok_or(LedgerError::AccountNotFound(number))
    }

    fn check_amount(amount: Amount) -> LedgerResult<()> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(LedgerError::InvalidAmount(amount));
        }
        return Ok(());
    }
}


#[cfg(test)]
mod tests {
    use crate::core::{Ledger, LedgerError, MIN_BALANCE};

    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.open("Bilbo", "Baggins", 1000.0).unwrap();
        ledger.open("Frodo", "Baggins", 800.0).unwrap();
        ledger.open("Legolas", "Greenleaf", 600.0).unwrap();
        return ledger;
    }

    #[test]
    fn numbers_start_at_one_and_increase() {
        let mut ledger = Ledger::new();
        let numbers: Vec<_> = (0..5)
            .map(|i| ledger.open("Gimli", &i.to_string(), 0.0).unwrap().number())
            .collect();

        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
        assert_eq!(ledger.next_number(), 6);
    }

    #[test]
    fn open_does_not_check_minimum() {
        let mut ledger = Ledger::new();
        let account = ledger.open("Sam", "Gamgee", 10.0).unwrap();
        assert_eq!(account.balance(), 10.0);
        assert!(account.balance() < MIN_BALANCE);
    }

    #[rstest]
    fn closed_numbers_are_not_reissued(mut ledger: Ledger) {
        ledger.close(3).unwrap();
        let reopened = ledger.open("Legolas", "Greenleaf", 600.0).unwrap().number();
        assert_eq!(reopened, 4);
        assert!(matches!(ledger.get(3), Err(LedgerError::AccountNotFound(3))));
    }

    #[rstest]
    fn deposit_and_withdraw(mut ledger: Ledger) {
        assert_eq!(ledger.deposit(2, 50.0).unwrap().balance(), 850.0);
        assert_eq!(ledger.withdraw(2, 350.0).unwrap().balance(), 500.0);
        assert_eq!(ledger.get(1).unwrap().balance(), 1000.0);
    }

    #[rstest]
    fn refused_withdrawal_changes_nothing(mut ledger: Ledger) {
        let before = ledger.clone();
        let res = ledger.withdraw(3, 100.01);

        assert!(matches!(res, Err(LedgerError::InsufficientFunds { number: 3, .. })));
        assert_eq!(ledger, before);
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn invalid_amounts_are_rejected(mut ledger: Ledger, #[case] amount: f64) {
        let before = ledger.clone();

        assert!(matches!(ledger.deposit(1, amount), Err(LedgerError::InvalidAmount(_))));
        assert!(matches!(ledger.withdraw(1, amount), Err(LedgerError::InvalidAmount(_))));
        assert_eq!(ledger, before);
    }

    #[rstest]
    fn unknown_account(mut ledger: Ledger) {
        assert!(matches!(ledger.get(42), Err(LedgerError::AccountNotFound(42))));
        assert!(matches!(ledger.deposit(42, 1.0), Err(LedgerError::AccountNotFound(42))));
        assert!(matches!(ledger.withdraw(42, 1.0), Err(LedgerError::AccountNotFound(42))));
        assert!(matches!(ledger.close(42), Err(LedgerError::AccountNotFound(42))));
        assert_eq!(ledger.len(), 3);
    }

    #[rstest]
    fn close_returns_account_with_any_balance(mut ledger: Ledger) {
        let closed = ledger.close(1).unwrap();
        assert_eq!(closed.first_name(), "Bilbo");
        assert_eq!(closed.balance(), 1000.0);
        assert_eq!(ledger.len(), 2);
    }

    #[rstest]
    fn accounts_listed_by_number(mut ledger: Ledger) {
        ledger.close(2).unwrap();
        let names: Vec<_> = ledger.accounts().map(|a| a.first_name()).collect();
        assert_eq!(names, vec!["Bilbo", "Legolas"]);
    }

    #[test]
    fn scenario() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.open("Ann", "Lee", 1000.0).unwrap().number(), 1);

        assert!(matches!(ledger.withdraw(1, 600.0), Err(LedgerError::InsufficientFunds { .. })));
        assert_eq!(ledger.withdraw(1, 400.0).unwrap().balance(), 600.0);
        assert_eq!(ledger.deposit(1, 50.0).unwrap().balance(), 650.0);
        ledger.close(1).unwrap();
        assert!(matches!(ledger.get(1), Err(LedgerError::AccountNotFound(1))));
    }

    #[rstest]
    fn serialize(mut ledger: Ledger) {
        ledger.close(2).unwrap();
        let value = serde_json::to_value(&ledger).unwrap();

        assert_eq!(value, json!({
            "next_number": 4,
            "accounts": {
                "1": {"number": 1, "first_name": "Bilbo", "last_name": "Baggins", "balance": 1000.0},
                "3": {"number": 3, "first_name": "Legolas", "last_name": "Greenleaf", "balance": 600.0}
            }
        }));
    }

    #[test]
    fn deserialize_reconciles_numbering() {
        let value = json!({
            "next_number": 2,
            "accounts": {
                "9": {"number": 5, "first_name": "Gimli", "last_name": "Gloinsson", "balance": 700.0}
            }
        });
        let mut ledger = serde_json::from_value::<Ledger>(value).unwrap();

        assert_eq!(ledger.get(5).unwrap().first_name(), "Gimli");
        assert!(ledger.get(9).is_err());
        assert_eq!(ledger.next_number(), 6);
        assert_eq!(ledger.open("Merry", "Brandybuck", 0.0).unwrap().number(), 6);
    }

    #[test]
    fn deserialize_without_sequence() {
        let value = json!({ "accounts": {} });
        let ledger = serde_json::from_value::<Ledger>(value).unwrap();
        assert_eq!(ledger.next_number(), 1);
        assert!(ledger.is_empty());
    }

    #[rstest]
    fn deposit_cannot_overflow_balance(mut ledger: Ledger) {
        ledger.open("Smaug", "Dragon", 1e308).unwrap();
        let res = ledger.deposit(4, 1e308);

        assert!(matches!(res, Err(LedgerError::InvalidAmount(_))));
        assert_eq!(ledger.get(4).unwrap().balance(), 1e308);
    }

    #[rstest]
    #[case(f64::INFINITY)]
    #[case(f64::NEG_INFINITY)]
    #[case(f64::NAN)]
    fn open_needs_finite_balance(mut ledger: Ledger, #[case] balance: f64) {
        let before = ledger.clone();

        assert!(matches!(ledger.open("Gollum", "Smeagol", balance), Err(LedgerError::InvalidAmount(_))));
        assert_eq!(ledger, before);
    }

    #[test]
    fn open_after_last_number() {
        let value = json!({ "next_number": u64::MAX, "accounts": {} });
        let mut ledger = serde_json::from_value::<Ledger>(value).unwrap();

        assert!(matches!(ledger.open("Sam", "Gamgee", 0.0), Err(LedgerError::NumbersExhausted)));
        assert!(ledger.is_empty());
        assert_eq!(ledger.next_number(), u64::MAX);
    }

    #[test]
    fn deserialize_rejects_last_number() {
        let value = json!({
            "next_number": 1,
            "accounts": {
                "1": {"number": u64::MAX, "first_name": "Gimli", "last_name": "Gloinsson", "balance": 700.0}
            }
        });
        let res = serde_json::from_value::<Ledger>(value);

        assert!(res.unwrap_err().to_string().contains("leaves no room for new accounts"));
    }
}
