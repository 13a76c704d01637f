use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::anchors::select_anchors;
use crate::assign::assign_families;
use crate::config::FamilyConfig;
use crate::error::FamilyError;
use crate::graph::build_affinity_graph;
use crate::model::{AssignmentReport, FamilyMeta, FamilyResult, FamilySet, FamilySummary, Transaction};

/// Build families per config. Returns the families, assignment report and summary.
pub fn run(config: &FamilyConfig, transactions: &[Transaction]) -> Result<FamilyResult, FamilyError> {
    config.validate()?;

    let graph = build_affinity_graph(transactions);
    let skus = graph.len();

    if skus != config.universe_size {
        log::warn!(
            "observed {skus} distinct SKUs, config expects a universe of {}",
            config.universe_size
        );
    }
    if skus > config.total_capacity() {
        log::warn!(
            "total family capacity {} cannot hold {skus} SKUs",
            config.total_capacity()
        );
    }

    let selection = select_anchors(graph, &config.tiers);
    let mut families = selection.families;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let report = assign_families(&selection.pool, &mut families, &mut rng)?;

    let summary = compute_summary(transactions.len(), skus, &families, &report);

    Ok(FamilyResult {
        meta: FamilyMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            seed: config.seed,
        },
        summary,
        families,
        report,
    })
}

pub fn compute_summary(
    transactions: usize,
    skus: usize,
    families: &FamilySet,
    report: &AssignmentReport,
) -> FamilySummary {
    let sizes: Vec<usize> = families.iter().map(|f| f.members.len() + 1).collect();
    FamilySummary {
        transactions,
        skus,
        anchors: families.len(),
        families: families.len(),
        total_capacity: families.total_capacity(),
        direct: report.direct,
        transitive: report.transitive,
        forced: report.forced.len(),
        left_alone: report.left_alone.len(),
        largest_family: sizes.iter().copied().max().unwrap_or(0),
        smallest_family: sizes.iter().copied().min().unwrap_or(0),
    }
}
