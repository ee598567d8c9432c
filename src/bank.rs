use serde::{Serialize, Deserialize};

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::backend::LedgerStore;
use crate::core::{Account, AccountNumber, Amount, Ledger, LedgerError, LedgerResult};

/// Summary of the bank taken at a single point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankStatus {
    pub accounts: usize,
    pub next_number: AccountNumber,
    pub dirty: bool
}

struct State {
    ledger: Ledger,
    /// Set when the ledger holds changes the store failed to save.
    dirty: bool
}

/// The ledger shared between callers. Each mutation runs under the
/// write lock and saves the whole ledger to the store before the lock
/// is released, so two withdrawals can never both pass the minimum
/// balance check against the same starting balance.
///
/// A failed save does not undo the mutation and is not reported to the
/// caller of that mutation; it is logged and the bank stays dirty until
/// a later save goes through. See [`Bank::is_dirty`] and [`Bank::flush`].
pub struct Bank {
    state: RwLock<State>,
    store: Box<dyn LedgerStore>
}

impl Bank {
    /// Load the last snapshot from `store`, or start empty if there
    /// is none or it cannot be read.
    pub fn start(store: impl LedgerStore + 'static) -> Bank {
        let ledger = match store.load() {
            Ok(Some(ledger)) => {
                log::info!("resuming with {} accounts, next number {}", ledger.len(), ledger.next_number());
                ledger
            },
            Ok(None) => {
                log::info!("no previous data found, starting fresh");
                Ledger::new()
            },
            Err(err) => {
                log::warn!("could not load previous data, starting fresh: {}", err);
                Ledger::new()
            }
        };

        return Bank {
            state: RwLock::new(State { ledger, dirty: false }),
            store: Box::new(store)
        };
    }

    pub fn open(&self, first_name: &str, last_name: &str, initial_balance: Amount) -> LedgerResult<Account> {
        let mut state = self.write();
        let account = state.ledger.open(first_name, last_name, initial_balance)?.clone();
        log::debug!("opened account {} for {} {}", account.number(), first_name, last_name);
        self.flush_locked(&mut state);
        return Ok(account);
    }

    pub fn balance_enquiry(&self, number: AccountNumber) -> LedgerResult<Account> {
        self.read().ledger.get(number).cloned()
    }

    pub fn deposit(&self, number: AccountNumber, amount: Amount) -> LedgerResult<Account> {
        let mut state = self.write();
        let account = state.ledger.deposit(number, amount)?.clone();
        log::debug!("deposited {} into account {}", amount, number);
        self.flush_locked(&mut state);
        return Ok(account);
    }

    pub fn withdraw(&self, number: AccountNumber, amount: Amount) -> LedgerResult<Account> {
        let mut state = self.write();
        let account = state.ledger.withdraw(number, amount)?.clone();
        log::debug!("withdrew {} from account {}", amount, number);
        self.flush_locked(&mut state);
        return Ok(account);
    }

    pub fn close(&self, number: AccountNumber) -> LedgerResult<Account> {
        let mut state = self.write();
        let account = state.ledger.close(number)?;
        log::debug!("closed account {}", number);
        self.flush_locked(&mut state);
        return Ok(account);
    }

    pub fn list_all(&self) -> Vec<Account> {
        self.read().ledger.accounts().cloned().collect()
    }

    /// Number the next opened account will get.
    pub fn next_number(&self) -> AccountNumber {
        self.read().ledger.next_number()
    }

    pub fn status(&self) -> BankStatus {
        let state = self.read();
        return BankStatus {
            accounts: state.ledger.len(),
            next_number: state.ledger.next_number(),
            dirty: state.dirty
        };
    }

    /// Whether the ledger has changes the last save failed to store.
    pub fn is_dirty(&self) -> bool {
        self.read().dirty
    }

    /// Save the ledger now, reporting failure to the caller.
    pub fn flush(&self) -> LedgerResult<()> {
        let mut state = self.write();
        let res = self.store.save(&state.ledger);
        state.dirty = res.is_err();
        return res.map_err(LedgerError::from);
    }

    fn flush_locked(&self, state: &mut State) {
        match self.store.save(&state.ledger) {
            Ok(()) => state.dirty = false,
            Err(err) => {
                log::error!("error saving accounts, changes are kept in memory only: {}", err);
                state.dirty = true;
            }
        }
    }

    // Ledger operations never leave it half-updated, so a panic
    // elsewhere while holding the lock is no reason to refuse service.
    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
