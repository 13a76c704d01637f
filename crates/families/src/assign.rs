use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::FamilyError;
use crate::graph::AffinityGraph;
use crate::model::{AffinityRecord, AssignmentReport, FamilySet, ForcedPlacement, Placement, Sku};

/// Assign every pool SKU to exactly one family.
///
/// Pool SKUs are visited in ascending order. Each tries direct affinity with
/// an anchor, then transitive affinity through an already placed partner.
/// SKUs neither tier can place are shuffled with `rng` and dropped into the
/// first family with room. Fails instead of overflowing when none has room.
pub fn assign_families<R: Rng + ?Sized>(
    pool: &AffinityGraph,
    families: &mut FamilySet,
    rng: &mut R,
) -> Result<AssignmentReport, FamilyError> {
    let mut report = AssignmentReport::default();

    for (sku, record) in pool.iter() {
        match place_by_affinity(sku, record, families) {
            Some(placement) => report.record(placement),
            None => {
                log::warn!("SKU {sku} left alone");
                report.left_alone.push(sku);
            }
        }
    }

    if !report.left_alone.is_empty() {
        log::warn!(
            "{} SKUs left alone, distributing them to open families",
            report.left_alone.len()
        );
    }

    let mut leftovers = report.left_alone.clone();
    leftovers.shuffle(rng);
    for sku in leftovers {
        let anchor = families
            .first_open()
            .ok_or_else(|| FamilyError::CapacityExhausted {
                sku,
                families: families.len(),
                capacity: families.total_capacity(),
            })?;
        let placed = families.place(anchor, sku);
        debug_assert!(placed, "first open family rejected SKU {sku}");
        report.forced.push(ForcedPlacement { sku, anchor });
    }

    log::info!(
        "assigned {} SKUs: {} direct, {} transitive, {} forced",
        report.placed(),
        report.direct,
        report.transitive,
        report.forced.len()
    );

    Ok(report)
}

/// Try the two affinity tiers for one SKU. `None` leaves it alone.
pub fn place_by_affinity(
    sku: Sku,
    record: &AffinityRecord,
    families: &mut FamilySet,
) -> Option<Placement> {
    let (anchors, others): (Vec<Sku>, Vec<Sku>) = record
        .ranked_partners()
        .into_iter()
        .map(|(partner, _)| partner)
        .partition(|&partner| families.is_anchor(partner));

    // Tier 1: strongest anchor partner with room
    for anchor in anchors {
        if families.place(anchor, sku) {
            return Some(Placement::Direct);
        }
    }

    // Tier 2: ride along with a placed non-anchor partner
    for partner in others {
        let Some(anchor) = families.family_of(partner).map(|f| f.anchor) else {
            continue;
        };
        if families.place(anchor, sku) {
            return Some(Placement::Transitive);
        }
    }

    None
}
