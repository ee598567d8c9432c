use std::sync::{Mutex, PoisonError};

use crate::backend::interface::{check_storable, LedgerStore, Result};
use crate::core::Ledger;

/// Holds the last saved snapshot in memory, serialized the same way
/// a file would hold it. Useful for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Mutex<Option<String>>
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    /// A store that already holds `ledger`, as if it had been saved earlier.
    pub fn with_ledger(ledger: &Ledger) -> Result<MemoryStore> {
        let store = MemoryStore::new();
        store.save(ledger)?;
        return Ok(store);
    }
}

impl LedgerStore for MemoryStore {
    fn load(&self) -> Result<Option<Ledger>> {
        let snapshot = self.snapshot.lock().unwrap_or_else(PoisonError::into_inner);
        return match snapshot.as_deref() {
            Some(content) => Ok(Some(serde_json::from_str(content)?)),
            None => Ok(None)
        };
    }

    fn save(&self, ledger: &Ledger) -> Result<()> {
        check_storable(ledger)?;
        let content = serde_json::to_string(ledger)?;
        *self.snapshot.lock().unwrap_or_else(PoisonError::into_inner) = Some(content);
        return Ok(());
    }
}


#[cfg(test)]
mod tests {
    use super::MemoryStore;
    use crate::backend::{BackendError, LedgerStore};
    use crate::core::{Account, Ledger};

    #[test]
    fn empty_until_saved() {
        let store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());

        let mut ledger = Ledger::new();
        ledger.open("Sam", "Gamgee", 520.0).unwrap();
        store.save(&ledger).unwrap();

        assert_eq!(store.load().unwrap(), Some(ledger));
    }

    #[test]
    fn nan_balance_is_refused() {
        let store = MemoryStore::new();
        let broken = Ledger::with_accounts(vec![Account::new(1, "Sam", "Gamgee", f64::NAN)]);

        assert!(matches!(store.save(&broken), Err(BackendError::NonFinite { number: 1, .. })));
        assert!(store.load().unwrap().is_none());
    }
}
