use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crm_core::{Customer, CustomerDraft, CustomerId, DomainError, Entity};

use super::{CustomerStore, StoreError};

/// In-memory customer table for tests/dev.
///
/// Ids are handed out like a Postgres `serial`: starting at 1, never reused,
/// and consumed even if the row is later deleted.
#[derive(Debug)]
pub struct InMemoryCustomerStore {
    inner: RwLock<Table>,
}

#[derive(Debug)]
struct Table {
    last_id: i32,
    rows: BTreeMap<CustomerId, Customer>,
}

impl InMemoryCustomerStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Table {
                last_id: 0,
                rows: BTreeMap::new(),
            }),
        }
    }

    /// Number of stored rows.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.rows.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Table>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Table>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
    }
}

impl Default for InMemoryCustomerStore {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_id(raw: &str) -> Result<CustomerId, StoreError> {
    raw.parse::<CustomerId>()
        .map_err(|e| StoreError::from_domain(e, raw))
}

#[async_trait]
impl CustomerStore for InMemoryCustomerStore {
    async fn list(&self) -> Result<Vec<Customer>, StoreError> {
        let table = self.read()?;
        let mut customers: Vec<Customer> = table.rows.values().cloned().collect();
        customers.sort_by(|a, b| a.id().cmp(&b.id()).then_with(|| a.name.cmp(&b.name)));
        Ok(customers)
    }

    async fn get(&self, id: &str) -> Result<Customer, StoreError> {
        let key = parse_id(id)?;
        let table = self.read()?;
        table
            .rows
            .get(&key)
            .cloned()
            .ok_or_else(DomainError::not_found)
            .map_err(|e| StoreError::from_domain(e, id))
    }

    async fn create(&self, draft: CustomerDraft) -> Result<Customer, StoreError> {
        let mut table = self.write()?;
        let next = table
            .last_id
            .checked_add(1)
            .ok_or_else(|| StoreError::Database("nextval: reached maximum value of sequence".to_string()))?;
        table.last_id = next;

        let customer = Customer::from_draft(CustomerId::new(next), draft);
        table.rows.insert(customer.id(), customer.clone());
        Ok(customer)
    }

    async fn update(&self, id: &str, draft: &CustomerDraft) -> Result<u64, StoreError> {
        let key = parse_id(id)?;
        let mut table = self.write()?;
        match table.rows.get_mut(&key) {
            Some(row) => {
                row.name = draft.name.clone();
                row.email = draft.email.clone();
                row.status = draft.status.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: &str) -> Result<u64, StoreError> {
        let key = parse_id(id)?;
        let mut table = self.write()?;
        Ok(table.rows.remove(&key).map_or(0, |_| 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn draft(name: &str) -> CustomerDraft {
        CustomerDraft::new(name, format!("{}@x.com", name.to_lowercase()), "active")
    }

    #[tokio::test]
    async fn ids_start_at_one_and_are_not_reused() {
        let store = InMemoryCustomerStore::new();
        let a = store.create(draft("Ann")).await.unwrap();
        let b = store.create(draft("Bob")).await.unwrap();
        assert_eq!(a.id, CustomerId::new(1));
        assert_eq!(b.id, CustomerId::new(2));

        assert_eq!(store.delete("2").await.unwrap(), 1);
        let c = store.create(draft("Cid")).await.unwrap();
        assert_eq!(c.id, CustomerId::new(3));
    }

    #[tokio::test]
    async fn get_missing_row_is_not_found() {
        let store = InMemoryCustomerStore::new();
        assert_eq!(store.get("7").await, Err(StoreError::NotFound("7".to_string())));
    }

    #[tokio::test]
    async fn non_numeric_id_is_rejected_like_postgres() {
        let store = InMemoryCustomerStore::new();
        let err = store.get("abc").await.unwrap_err();
        assert_eq!(
            err,
            StoreError::InvalidId("invalid input syntax for type integer: \"abc\"".to_string())
        );
        assert!(matches!(store.update("1x", &draft("Ann")).await, Err(StoreError::InvalidId(_))));
        assert!(matches!(store.delete("").await, Err(StoreError::InvalidId(_))));
    }

    #[tokio::test]
    async fn update_and_delete_of_missing_rows_affect_nothing() {
        let store = InMemoryCustomerStore::new();
        store.create(draft("Ann")).await.unwrap();

        assert_eq!(store.update("42", &draft("Zed")).await.unwrap(), 0);
        assert_eq!(store.delete("42").await.unwrap(), 0);
        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.get("1").await.unwrap().name, "Ann");
    }

    #[tokio::test]
    async fn update_keeps_id_and_replaces_fields() {
        let store = InMemoryCustomerStore::new();
        let created = store.create(draft("Ann")).await.unwrap();

        let changed = CustomerDraft::new("Anne", "anne@y.com", "inactive");
        assert_eq!(store.update("1", &changed).await.unwrap(), 1);

        let fetched = store.get("1").await.unwrap();
        assert_eq!(fetched, Customer::from_draft(created.id, changed));
    }

    #[tokio::test]
    async fn poisoned_lock_reports_unavailable() {
        let store = std::sync::Arc::new(InMemoryCustomerStore::new());
        store.create(draft("Ann")).await.unwrap();

        let poisoner = store.clone();
        let joined = std::thread::spawn(move || {
            let _guard = poisoner.inner.write().unwrap();
            panic!("poison the table lock");
        })
        .join();
        assert!(joined.is_err());

        assert!(matches!(store.len(), Err(StoreError::Unavailable(_))));
        assert!(matches!(store.is_empty(), Err(StoreError::Unavailable(_))));
        assert!(matches!(store.list().await, Err(StoreError::Unavailable(_))));
        assert!(matches!(store.create(draft("Bob")).await, Err(StoreError::Unavailable(_))));
    }

    proptest! {
        #[test]
        fn list_is_always_ordered_by_id(
            names in proptest::collection::vec("[a-z]{0,6}", 0..20),
            deletes in proptest::collection::vec(1i32..25, 0..5)
        ) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            rt.block_on(async {
                let store = InMemoryCustomerStore::new();
                for name in &names {
                    store.create(draft(name)).await.unwrap();
                }
                for id in &deletes {
                    store.delete(&id.to_string()).await.unwrap();
                }

                let listed = store.list().await.unwrap();
                prop_assert_eq!(listed.len(), store.len().unwrap());
                for pair in listed.windows(2) {
                    prop_assert!((pair[0].id, &pair[0].name) < (pair[1].id, &pair[1].name));
                }
                Ok::<(), TestCaseError>(())
            })?;
        }
    }
}
