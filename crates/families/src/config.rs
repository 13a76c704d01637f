use serde::Deserialize;

use crate::error::FamilyError;

/// Expected SKU universe when no config says otherwise.
pub const DEFAULT_UNIVERSE_SIZE: usize = 12_750;

/// Anchors selected when no tier table is configured.
pub const DEFAULT_ANCHORS: usize = 60;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FamilyConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// Expected number of distinct SKUs in the input.
    #[serde(default = "default_universe_size")]
    pub universe_size: usize,
    /// Seed for the forced-fallback shuffle. Entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Capacity tiers in rank order: earlier tiers hold the more frequent anchors.
    #[serde(default = "default_tiers")]
    pub tiers: Vec<TierConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for FamilyConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            universe_size: default_universe_size(),
            seed: None,
            tiers: default_tiers(),
            output: OutputConfig::default(),
        }
    }
}

fn default_name() -> String {
    "default".into()
}

fn default_universe_size() -> usize {
    DEFAULT_UNIVERSE_SIZE
}

/// One tier sized so the families together span the default universe.
fn default_tiers() -> Vec<TierConfig> {
    vec![TierConfig {
        anchors: DEFAULT_ANCHORS,
        capacity: DEFAULT_UNIVERSE_SIZE / DEFAULT_ANCHORS,
    }]
}

// ---------------------------------------------------------------------------
// Tiers
// ---------------------------------------------------------------------------

/// `anchors` consecutive anchors (by rank) whose families hold `capacity`
/// SKUs each, anchor included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TierConfig {
    pub anchors: usize,
    pub capacity: usize,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_json_path")]
    pub json: String,
    #[serde(default = "default_csv_path")]
    pub csv: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json: default_json_path(),
            csv: default_csv_path(),
            delimiter: default_delimiter(),
        }
    }
}

fn default_json_path() -> String {
    "families.json".into()
}

fn default_csv_path() -> String {
    "families.csv".into()
}

fn default_delimiter() -> char {
    ','
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl FamilyConfig {
    pub fn from_toml(input: &str) -> Result<Self, FamilyError> {
        let config: FamilyConfig =
            toml::from_str(input).map_err(|e| FamilyError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FamilyError> {
        if self.tiers.is_empty() {
            return Err(FamilyError::ConfigValidation(
                "at least one tier is required".into(),
            ));
        }

        for (i, tier) in self.tiers.iter().enumerate() {
            if tier.anchors == 0 {
                return Err(FamilyError::ConfigValidation(format!(
                    "tier {i}: anchors must be at least 1"
                )));
            }
            if tier.capacity == 0 {
                return Err(FamilyError::ConfigValidation(format!(
                    "tier {i}: capacity must be at least 1"
                )));
            }
        }

        let mut anchors = 0usize;
        let mut capacity = 0usize;
        for (i, tier) in self.tiers.iter().enumerate() {
            let slots = tier.anchors.checked_mul(tier.capacity).ok_or_else(|| {
                FamilyError::ConfigValidation(format!(
                    "tier {i}: {} anchors x capacity {} overflows",
                    tier.anchors, tier.capacity
                ))
            })?;
            anchors = anchors.checked_add(tier.anchors).ok_or_else(|| {
                FamilyError::ConfigValidation("total anchor count overflows".into())
            })?;
            capacity = capacity.checked_add(slots).ok_or_else(|| {
                FamilyError::ConfigValidation("total capacity overflows".into())
            })?;
        }

        // Earlier-ranked anchors never get smaller families
        for (i, pair) in self.tiers.windows(2).enumerate() {
            if pair[1].capacity > pair[0].capacity {
                return Err(FamilyError::ConfigValidation(format!(
                    "tier {}: capacity {} exceeds tier {i} capacity {}",
                    i + 1,
                    pair[1].capacity,
                    pair[0].capacity
                )));
            }
        }

        if !self.output.delimiter.is_ascii() {
            return Err(FamilyError::ConfigValidation(format!(
                "delimiter must be an ASCII character, got '{}'",
                self.output.delimiter
            )));
        }

        Ok(())
    }

    /// Total number of anchors across all tiers. Saturates on unvalidated tables.
    pub fn anchor_count(&self) -> usize {
        self.tiers
            .iter()
            .fold(0usize, |acc, t| acc.saturating_add(t.anchors))
    }

    /// Sum of every family's capacity, anchors included.
    pub fn total_capacity(&self) -> usize {
        self.tiers.iter().fold(0usize, |acc, t| {
            acc.saturating_add(t.anchors.saturating_mul(t.capacity))
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
