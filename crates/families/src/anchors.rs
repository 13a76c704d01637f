use crate::config::TierConfig;
use crate::graph::AffinityGraph;
use crate::model::{FamilySet, Sku};

/// Anchors promoted into empty families, and the pool left to assign.
#[derive(Debug, Clone)]
pub struct AnchorSelection {
    pub families: FamilySet,
    pub pool: AffinityGraph,
}

/// Every SKU with its frequency, most frequent first, SKU ascending on ties.
pub fn rank_by_frequency(graph: &AffinityGraph) -> Vec<(Sku, u64)> {
    let mut ranked: Vec<(Sku, u64)> = graph.iter().map(|(sku, r)| (sku, r.frequency)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked
}

/// Promote the top-ranked SKUs to anchors, one tier at a time.
///
/// Tier `i` contributes `tiers[i].anchors` consecutive anchors whose families
/// get `tiers[i].capacity`. Anchors leave the pool.
pub fn select_anchors(mut graph: AffinityGraph, tiers: &[TierConfig]) -> AnchorSelection {
    let wanted = tiers
        .iter()
        .fold(0usize, |acc, t| acc.saturating_add(t.anchors));
    let ranked = rank_by_frequency(&graph);

    if ranked.len() < wanted {
        log::warn!(
            "only {} SKUs observed, fewer than the {} anchors requested",
            ranked.len(),
            wanted
        );
    }

    let tier_of_rank = tiers
        .iter()
        .enumerate()
        .flat_map(|(i, tier)| std::iter::repeat((i, tier.capacity)).take(tier.anchors));

    let mut families = FamilySet::new();
    for ((sku, frequency), (tier, capacity)) in ranked.into_iter().zip(tier_of_rank) {
        graph.remove(sku);
        families.add_family(sku, tier, capacity);
        log::debug!("anchor {sku}: frequency {frequency}, tier {tier}, capacity {capacity}");
    }

    log::info!(
        "selected {} anchors, {} SKUs left to assign",
        families.len(),
        graph.len()
    );

    AnchorSelection {
        families,
        pool: graph,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_affinity_graph;
    use crate::model::Transaction;

    fn tx(skus: &[Sku]) -> Transaction {
        skus.iter().copied().collect()
    }

    fn graph() -> AffinityGraph {
        // frequencies: 1→4, 2→3, 3→3, 4→1, 5→1
        build_affinity_graph([
            tx(&[1, 2, 3]),
            tx(&[1, 2, 3]),
            tx(&[1, 2, 3, 4]),
            tx(&[1, 5]),
        ])
    }

    #[test]
    fn ranks_by_frequency_then_sku() {
        let ranked = rank_by_frequency(&graph());
        assert_eq!(ranked, vec![(1, 4), (2, 3), (3, 3), (4, 1), (5, 1)]);
    }

    #[test]
    fn selects_top_k_and_removes_them_from_pool() {
        let tiers = [TierConfig { anchors: 2, capacity: 5 }];
        let selection = select_anchors(graph(), &tiers);
        let anchors: Vec<Sku> = selection.families.iter().map(|f| f.anchor).collect();
        assert_eq!(anchors, vec![1, 2]);
        assert!(!selection.pool.contains(1));
        assert!(!selection.pool.contains(2));
        assert_eq!(selection.pool.len(), 3);
        assert!(selection.families.iter().all(|f| f.members.is_empty()));
    }

    #[test]
    fn tiers_assign_capacity_by_rank() {
        let tiers = [
            TierConfig { anchors: 1, capacity: 10 },
            TierConfig { anchors: 2, capacity: 4 },
        ];
        let selection = select_anchors(graph(), &tiers);
        let table: Vec<(Sku, usize, usize)> = selection
            .families
            .iter()
            .map(|f| (f.anchor, f.tier, f.capacity))
            .collect();
        assert_eq!(table, vec![(1, 0, 10), (2, 1, 4), (3, 1, 4)]);
    }

    #[test]
    fn fewer_skus_than_anchors_promotes_everything() {
        let tiers = [TierConfig { anchors: 10, capacity: 3 }];
        let selection = select_anchors(graph(), &tiers);
        assert_eq!(selection.families.len(), 5);
        assert!(selection.pool.is_empty());
    }

    #[test]
    fn selection_keeps_remaining_affinities_intact() {
        let tiers = [TierConfig { anchors: 1, capacity: 5 }];
        let selection = select_anchors(graph(), &tiers);
        // Remaining records still point at the anchor as a partner
        assert_eq!(selection.pool.co_occurrence(5, 1), 1);
        assert_eq!(selection.pool.frequency(2), 3);
    }
}
