use std::{
    collections::VecDeque,
    sync::atomic::{AtomicUsize, Ordering},
};

use anyhow::anyhow;
use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::db::bill::{Bill, BillStore};

/// Bill store kept in process memory
#[derive(Debug, Default)]
pub struct InMemBillStore {
    bills: RwLock<Vec<Bill>>,
    failures: Mutex<VecDeque<String>>,
    list_calls: AtomicUsize,
}

impl InMemBillStore {
    pub fn with_bills(bills: Vec<Bill>) -> Self {
        Self {
            bills: RwLock::new(bills),
            ..Default::default()
        }
    }

    /// Make the next `list_bills` call fail with the given message
    #[cfg(test)]
    pub async fn fail_next_list(&self, message: impl Into<String>) {
        self.failures.lock().await.push_back(message.into());
    }

    #[cfg(test)]
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl BillStore for InMemBillStore {
    async fn list_bills(&self) -> Result<Vec<Bill>, anyhow::Error> {
        self.list_calls.fetch_add(1, Ordering::Relaxed);
        if let Some(message) = self.failures.lock().await.pop_front() {
            return Err(anyhow!(message));
        }
        Ok(self.bills.read().await.clone())
    }

    async fn add_bill(&self, bill: &Bill) -> Result<(), anyhow::Error> {
        let mut bills = self.bills.write().await;
        if bills.iter().any(|b| b.id == bill.id) {
            return Err(anyhow!("bill {} already exists", bill.id));
        }
        bills.push(bill.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures;

    #[tokio::test]
    async fn lists_seeded_bills_and_counts_calls() {
        let store = InMemBillStore::with_bills(fixtures::bills());
        let bills = store.list_bills().await.expect("bills");
        assert_eq!(bills.len(), 4);
        assert_eq!(store.list_calls(), 1);
    }

    #[tokio::test]
    async fn queued_failure_applies_once() {
        let store = InMemBillStore::with_bills(fixtures::bills());
        store.fail_next_list("Erreur 404").await;

        let err = store.list_bills().await.expect_err("queued failure");
        assert_eq!(err.to_string(), "Erreur 404");
        assert_eq!(store.list_bills().await.expect("recovered").len(), 4);
        assert_eq!(store.list_calls(), 2);
    }

    #[tokio::test]
    async fn rejects_duplicate_ids() {
        let store = InMemBillStore::default();
        let bill = fixtures::bills().remove(0);
        store.add_bill(&bill).await.expect("first insert");
        assert!(store.add_bill(&bill).await.is_err());
        assert_eq!(store.list_bills().await.expect("bills").len(), 1);
    }
}
