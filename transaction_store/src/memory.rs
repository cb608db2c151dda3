//! Vector-backed store, used by tests and for ad-hoc reports over fixtures.

use async_trait::async_trait;

use crate::{
    models::{CallerId, DateRange, Transaction},
    store::{StoreError, TransactionStore},
};

/// Keeps owner-tagged transactions in memory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    rows: Vec<(CallerId, Transaction)>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, owner: CallerId, tx: Transaction) {
        self.rows.push((owner, tx));
    }

    pub fn extend(&mut self, owner: &CallerId, txs: impl IntoIterator<Item = Transaction>) {
        self.rows
            .extend(txs.into_iter().map(|tx| (owner.clone(), tx)));
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[async_trait]
impl TransactionStore for InMemoryStore {
    async fn fetch_range(
        &self,
        caller: &CallerId,
        range: DateRange,
    ) -> Result<Vec<Transaction>, StoreError> {
        let mut out: Vec<Transaction> = self
            .rows
            .iter()
            .filter(|(owner, tx)| owner == caller && range.contains(tx.created_at))
            .map(|(_, tx)| tx.clone())
            .collect();
        // stable: equal timestamps keep insertion order
        out.sort_by_key(|tx| tx.created_at);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn tx(id: &str, hour: u32) -> Transaction {
        Transaction {
            id: id.into(),
            customer: "c".into(),
            total_amount: 10.0,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap(),
            items: vec![],
        }
    }

    #[tokio::test]
    async fn filters_by_owner_and_range() {
        let alice = CallerId::from("alice");
        let bob = CallerId::from("bob");
        let mut store = InMemoryStore::new();
        store.extend(&alice, [tx("late", 12), tx("early", 3), tx("outside", 23)]);
        store.insert(bob.clone(), tx("bobs", 5));

        let range = DateRange::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        );
        let got = store.fetch_range(&alice, range).await.unwrap();
        let ids: Vec<_> = got.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["early", "late"]);

        let got = store.fetch_range(&bob, range).await.unwrap();
        assert_eq!(got.len(), 1);
    }
}
