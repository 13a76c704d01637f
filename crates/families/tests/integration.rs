use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use skufam_families::config::FamilyConfig;
use skufam_families::engine::run;
use skufam_families::export::{family_rows, write_delimited_rows, write_json_rows};
use skufam_families::model::{FamilyResult, ForcedPlacement, Transaction};
use skufam_families::transactions::read_transactions;
use skufam_families::FamilyError;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_baskets(name: &str) -> Result<Vec<Transaction>, FamilyError> {
    let path = fixtures_dir().join(name);
    let file = File::open(&path).unwrap_or_else(|e| panic!("cannot open {}: {e}", path.display()));
    read_transactions(BufReader::new(file))
}

fn load_config(name: &str) -> FamilyConfig {
    let toml = std::fs::read_to_string(fixtures_dir().join(name)).unwrap();
    FamilyConfig::from_toml(&toml).unwrap()
}

fn load_and_run(config_name: &str) -> Result<FamilyResult, FamilyError> {
    let config = load_config(config_name);
    let baskets = load_baskets("baskets.dat")?;
    run(&config, &baskets)
}

// -------------------------------------------------------------------------
// End-to-end
// -------------------------------------------------------------------------

#[test]
fn two_tier_fixture_families() {
    let result = load_and_run("two-tier.toml").unwrap();

    assert_eq!(result.meta.config_name, "Fixture Two-Tier");
    assert_eq!(result.summary.transactions, 12);
    assert_eq!(result.summary.skus, 13);
    assert_eq!(result.summary.anchors, 2);
    assert_eq!(result.summary.direct, 9);
    assert_eq!(result.summary.transitive, 1);
    assert_eq!(result.summary.forced, 1);

    let dairy = result.families.get(100).unwrap();
    assert_eq!(dairy.tier, 0);
    assert_eq!(dairy.capacity, 8);
    assert_eq!(dairy.members, vec![101, 102, 103, 104, 105, 300, 900]);

    let bakery = result.families.get(200).unwrap();
    assert_eq!(bakery.tier, 1);
    assert_eq!(bakery.capacity, 6);
    assert_eq!(bakery.members, vec![201, 202, 203, 204]);

    assert_eq!(
        result.report.forced,
        vec![ForcedPlacement { sku: 900, anchor: 100 }]
    );
}

#[test]
fn bridge_sku_rides_along_with_its_partner() {
    let result = load_and_run("two-tier.toml").unwrap();
    // 300 only co-occurs with 101, which joined 100 directly
    assert_eq!(result.families.family_of(101).map(|f| f.anchor), Some(100));
    assert_eq!(result.families.family_of(300).map(|f| f.anchor), Some(100));
}

#[test]
fn exported_rows_smallest_first() {
    let result = load_and_run("two-tier.toml").unwrap();
    let rows = family_rows(&result.families);

    let mut json = Vec::new();
    write_json_rows(&mut json, &rows).unwrap();
    assert_eq!(
        String::from_utf8(json).unwrap(),
        "[[200,201,202,203,204],[100,101,102,103,104,105,300,900]]"
    );

    let mut csv = Vec::new();
    write_delimited_rows(&mut csv, &rows, b';').unwrap();
    assert_eq!(
        String::from_utf8(csv).unwrap(),
        "200;201;202;203;204\n100;101;102;103;104;105;300;900\n"
    );
}

#[test]
fn tight_capacity_fails_instead_of_overflowing() {
    let err = load_and_run("tight.toml").unwrap_err();
    match err {
        FamilyError::CapacityExhausted { families, capacity, .. } => {
            assert_eq!(families, 2);
            assert_eq!(capacity, 12);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_token_aborts_read() {
    let err = load_baskets("bad-token.dat").unwrap_err();
    assert!(matches!(err, FamilyError::InputFormat { line: 2, .. }));
    assert!(err.to_string().contains("1O2"));
}

#[test]
fn repeated_runs_with_seed_are_identical() {
    let a = load_and_run("two-tier.toml").unwrap();
    let b = load_and_run("two-tier.toml").unwrap();
    assert_eq!(family_rows(&a.families), family_rows(&b.families));
    assert_eq!(a.report, b.report);
}
