use std::io::BufRead;

use crate::error::FamilyError;
use crate::model::{Sku, Transaction};

/// Parse one basket line (1-based `line_no`) into its set of SKUs.
///
/// Tokens are separated by any run of whitespace. Repeated SKUs collapse.
pub fn parse_transaction(line_no: usize, line: &str) -> Result<Transaction, FamilyError> {
    let mut skus = Transaction::new();
    for token in line.split_whitespace() {
        let sku: Sku = token.parse().map_err(|_| FamilyError::InputFormat {
            line: line_no,
            message: format!("invalid SKU '{token}'"),
        })?;
        skus.insert(sku);
    }

    if skus.is_empty() {
        return Err(FamilyError::InputFormat {
            line: line_no,
            message: "empty transaction".into(),
        });
    }

    Ok(skus)
}

/// Parse every line of an in-memory basket file.
pub fn parse_transactions(input: &str) -> Result<Vec<Transaction>, FamilyError> {
    input
        .lines()
        .enumerate()
        .map(|(i, line)| parse_transaction(i + 1, line))
        .collect()
}

/// Read baskets line by line. The first bad line aborts the read.
pub fn read_transactions<R: BufRead>(reader: R) -> Result<Vec<Transaction>, FamilyError> {
    let mut transactions = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| match e.kind() {
            std::io::ErrorKind::InvalidData => FamilyError::InputFormat {
                line: i + 1,
                message: "line is not valid UTF-8".into(),
            },
            _ => FamilyError::from(e),
        })?;
        transactions.push(parse_transaction(i + 1, &line)?);
    }
    log::debug!("read {} transactions", transactions.len());
    Ok(transactions)
}
