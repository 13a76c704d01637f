use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Integer product identifier.
pub type Sku = i64;

/// The unique SKUs of one receipt.
pub type Transaction = BTreeSet<Sku>;

// ---------------------------------------------------------------------------
// Affinity
// ---------------------------------------------------------------------------

/// Per-SKU transaction frequency and co-occurrence counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AffinityRecord {
    /// Number of transactions containing this SKU.
    pub frequency: u64,
    /// Other SKU -> number of transactions containing both.
    pub co_occurrence: BTreeMap<Sku, u64>,
}

impl AffinityRecord {
    /// Partners ranked by co-occurrence count descending, SKU ascending on ties.
    pub fn ranked_partners(&self) -> Vec<(Sku, u64)> {
        let mut ranked: Vec<(Sku, u64)> =
            self.co_occurrence.iter().map(|(&sku, &count)| (sku, count)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }
}

// ---------------------------------------------------------------------------
// Families
// ---------------------------------------------------------------------------

/// A capacity-bounded group built around one anchor.
///
/// `capacity` counts the anchor, so at most `capacity - 1` members fit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Family {
    pub anchor: Sku,
    /// Index into the tier table this family's capacity came from.
    pub tier: usize,
    pub capacity: usize,
    pub members: Vec<Sku>,
}

impl Family {
    pub fn new(anchor: Sku, tier: usize, capacity: usize) -> Self {
        Self {
            anchor,
            tier,
            capacity,
            members: Vec::new(),
        }
    }

    /// Maximum number of members (anchor excluded).
    pub fn member_limit(&self) -> usize {
        self.capacity.saturating_sub(1)
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= self.member_limit()
    }

    pub fn remaining(&self) -> usize {
        self.member_limit().saturating_sub(self.members.len())
    }

    /// Anchor followed by members.
    pub fn row(&self) -> Vec<Sku> {
        let mut row = Vec::with_capacity(self.members.len() + 1);
        row.push(self.anchor);
        row.extend_from_slice(&self.members);
        row
    }
}

/// Families in anchor rank order, with anchor and member lookups.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct FamilySet {
    families: Vec<Family>,
    #[serde(skip)]
    by_anchor: HashMap<Sku, usize>,
    #[serde(skip)]
    by_member: HashMap<Sku, usize>,
}

impl FamilySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an empty family. Returns false if `anchor` already names one.
    pub fn add_family(&mut self, anchor: Sku, tier: usize, capacity: usize) -> bool {
        if self.by_anchor.contains_key(&anchor) {
            return false;
        }
        self.by_anchor.insert(anchor, self.families.len());
        self.families.push(Family::new(anchor, tier, capacity));
        true
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Family> {
        self.families.iter()
    }

    pub fn is_anchor(&self, sku: Sku) -> bool {
        self.by_anchor.contains_key(&sku)
    }

    pub fn get(&self, anchor: Sku) -> Option<&Family> {
        self.by_anchor.get(&anchor).map(|&i| &self.families[i])
    }

    /// The family `sku` was placed into, if any.
    pub fn family_of(&self, sku: Sku) -> Option<&Family> {
        self.by_member.get(&sku).map(|&i| &self.families[i])
    }

    pub fn contains(&self, sku: Sku) -> bool {
        self.is_anchor(sku) || self.by_member.contains_key(&sku)
    }

    /// Appends `sku` to the family of `anchor`.
    ///
    /// Returns false when the family is full, the anchor is unknown, or `sku`
    /// is already an anchor or member somewhere.
    pub fn place(&mut self, anchor: Sku, sku: Sku) -> bool {
        if self.contains(sku) {
            return false;
        }
        let Some(&idx) = self.by_anchor.get(&anchor) else {
            return false;
        };
        let family = &mut self.families[idx];
        if family.is_full() {
            return false;
        }
        family.members.push(sku);
        self.by_member.insert(sku, idx);
        true
    }

    /// Anchor of the first family in rank order that still has room.
    pub fn first_open(&self) -> Option<Sku> {
        self.families.iter().find(|f| !f.is_full()).map(|f| f.anchor)
    }

    /// Sum of all capacities, anchors included.
    pub fn total_capacity(&self) -> usize {
        self.families.iter().map(|f| f.capacity).sum()
    }

    /// Anchors plus members.
    pub fn placed_count(&self) -> usize {
        self.families.len() + self.by_member.len()
    }
}

// ---------------------------------------------------------------------------
// Assignment
// ---------------------------------------------------------------------------

/// Strategy that placed a SKU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Tier 1: co-occurs with the anchor.
    Direct,
    /// Tier 2: co-occurs with an SKU already placed in the family.
    Transitive,
    /// Left alone by both tiers, placed by the shuffled fallback.
    Forced,
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Transitive => write!(f, "transitive"),
            Self::Forced => write!(f, "forced"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForcedPlacement {
    pub sku: Sku,
    pub anchor: Sku,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssignmentReport {
    pub direct: usize,
    pub transitive: usize,
    /// SKUs neither affinity tier could place, in deferral order.
    pub left_alone: Vec<Sku>,
    /// Fallback placements in shuffled order.
    pub forced: Vec<ForcedPlacement>,
}

impl AssignmentReport {
    pub fn record(&mut self, placement: Placement) {
        match placement {
            Placement::Direct => self.direct += 1,
            Placement::Transitive => self.transitive += 1,
            Placement::Forced => {}
        }
    }

    pub fn placed(&self) -> usize {
        self.direct + self.transitive + self.forced.len()
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct FamilySummary {
    pub transactions: usize,
    pub skus: usize,
    pub anchors: usize,
    pub families: usize,
    pub total_capacity: usize,
    pub direct: usize,
    pub transitive: usize,
    pub forced: usize,
    pub left_alone: usize,
    pub largest_family: usize,
    pub smallest_family: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FamilyMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FamilyResult {
    pub meta: FamilyMeta,
    pub summary: FamilySummary,
    #[serde(skip)]
    pub families: FamilySet,
    pub report: AssignmentReport,
}
