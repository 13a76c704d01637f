use std::borrow::Borrow;
use std::collections::BTreeMap;

use crate::model::{AffinityRecord, Sku, Transaction};

/// Sparse undirected co-occurrence graph keyed by SKU.
///
/// Only observed pairs have entries. Iteration is SKU ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AffinityGraph {
    records: BTreeMap<Sku, AffinityRecord>,
    transactions: usize,
}

/// Build the graph from every transaction.
pub fn build_affinity_graph<I>(transactions: I) -> AffinityGraph
where
    I: IntoIterator,
    I::Item: Borrow<Transaction>,
{
    let mut graph = AffinityGraph::new();
    for transaction in transactions {
        graph.observe(transaction.borrow());
    }
    log::debug!(
        "affinity graph: {} SKUs from {} transactions",
        graph.len(),
        graph.transaction_count()
    );
    graph
}

impl AffinityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one transaction: every SKU gains a frequency and a co-occurrence
    /// with each other SKU in it.
    pub fn observe(&mut self, transaction: &Transaction) {
        self.transactions += 1;
        for &sku in transaction {
            let record = self.records.entry(sku).or_default();
            record.frequency += 1;
            for &other in transaction {
                if other != sku {
                    *record.co_occurrence.entry(other).or_insert(0) += 1;
                }
            }
        }
    }

    /// Add another graph's counts into this one.
    pub fn merge(&mut self, other: AffinityGraph) {
        self.transactions += other.transactions;
        for (sku, theirs) in other.records {
            let ours = self.records.entry(sku).or_default();
            ours.frequency += theirs.frequency;
            for (partner, count) in theirs.co_occurrence {
                *ours.co_occurrence.entry(partner).or_insert(0) += count;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of transactions observed.
    pub fn transaction_count(&self) -> usize {
        self.transactions
    }

    pub fn record(&self, sku: Sku) -> Option<&AffinityRecord> {
        self.records.get(&sku)
    }

    pub fn contains(&self, sku: Sku) -> bool {
        self.records.contains_key(&sku)
    }

    pub fn frequency(&self, sku: Sku) -> u64 {
        self.records.get(&sku).map_or(0, |r| r.frequency)
    }

    /// Transactions containing both `a` and `b`.
    pub fn co_occurrence(&self, a: Sku, b: Sku) -> u64 {
        self.records
            .get(&a)
            .and_then(|r| r.co_occurrence.get(&b))
            .copied()
            .unwrap_or(0)
    }

    /// Strongest `n` partners of `sku`, count descending.
    pub fn top_partners(&self, sku: Sku, n: usize) -> Vec<(Sku, u64)> {
        let mut ranked = self
            .records
            .get(&sku)
            .map(AffinityRecord::ranked_partners)
            .unwrap_or_default();
        ranked.truncate(n);
        ranked
    }

    pub fn iter(&self) -> impl Iterator<Item = (Sku, &AffinityRecord)> {
        self.records.iter().map(|(&sku, record)| (sku, record))
    }

    /// Detach `sku` from the pool, returning its record.
    pub fn remove(&mut self, sku: Sku) -> Option<AffinityRecord> {
        self.records.remove(&sku)
    }
}
