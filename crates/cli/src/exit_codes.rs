//! CLI Exit Code Registry
//!
//! This is the single source of truth for all `skufam` exit codes.
//! Exit codes are part of the shell contract. Scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | General error (unspecified)                          |
//! | 2    | Usage error (bad args, unreadable input)             |
//! | 3    | Malformed transaction line                           |
//! | 4    | Families cannot hold every observed SKU              |
//! | 5    | Config parse or validation failure                   |
//! | 6    | Output artifact could not be written                 |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant below
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Map it in `CliError::from(FamilyError)` if it comes from the engine

use skufam_families::FamilyError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing input file.
pub const EXIT_USAGE: u8 = 2;

/// A basket line is empty or holds a non-integer token. Nothing was written.
pub const EXIT_INPUT_FORMAT: u8 = 3;

/// Forced fallback found every family full. Nothing was written.
pub const EXIT_CAPACITY_EXHAUSTED: u8 = 4;

/// Config TOML failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 5;

/// Writing or renaming an output artifact failed.
pub const EXIT_OUTPUT_WRITE: u8 = 6;

/// Map an engine error to its exit code.
pub fn family_exit_code(err: &FamilyError) -> u8 {
    match err {
        FamilyError::ConfigParse(_) | FamilyError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        FamilyError::InputFormat { .. } => EXIT_INPUT_FORMAT,
        FamilyError::CapacityExhausted { .. } => EXIT_CAPACITY_EXHAUSTED,
        FamilyError::Io(_) => EXIT_USAGE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let codes = [
            EXIT_SUCCESS,
            EXIT_ERROR,
            EXIT_USAGE,
            EXIT_INPUT_FORMAT,
            EXIT_CAPACITY_EXHAUSTED,
            EXIT_INVALID_CONFIG,
            EXIT_OUTPUT_WRITE,
        ];
        let unique: std::collections::HashSet<u8> = codes.iter().copied().collect();
        assert_eq!(unique.len(), codes.len());
    }

    #[test]
    fn engine_errors_map_to_codes() {
        let err = FamilyError::CapacityExhausted { sku: 1, families: 2, capacity: 3 };
        assert_eq!(family_exit_code(&err), EXIT_CAPACITY_EXHAUSTED);
        let err = FamilyError::InputFormat { line: 1, message: "empty transaction".into() };
        assert_eq!(family_exit_code(&err), EXIT_INPUT_FORMAT);
        assert_eq!(family_exit_code(&FamilyError::ConfigParse("x".into())), EXIT_INVALID_CONFIG);
    }
}
