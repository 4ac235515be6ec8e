//! Bulk asset import: CSV parsing and per-row validation.
//!
//! Pure logic only -- no I/O, no database. The API handler resolves asset
//! type codes and location names against the catalog, feeds the lookups in
//! here, and persists the rows that survive validation. A failing row never
//! aborts the rest of the file; its error is collected with a 1-based data
//! row number.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::Serialize;

use crate::csv;
use crate::types::{Date, DbId};

/// Expected header of an asset definition import file, in order.
pub const EXPECTED_HEADER: &[&str] = &[
    "asset_code",
    "asset_type_code",
    "name",
    "asset_value",
    "purchase_date",
    "location",
    "remarks",
];

/// Date format accepted in the `purchase_date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A validated, resolved row ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedAsset {
    /// 1-based data row number, for reporting insert-time failures.
    pub row: usize,
    pub asset_code: String,
    pub asset_type_id: DbId,
    pub name: String,
    pub asset_value: Decimal,
    pub purchase_date: Option<Date>,
    pub location_id: Option<DbId>,
    pub remarks: Option<String>,
}

/// A row that failed validation, reported back to the caller.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RowError {
    /// 1-based data row number (the header is row 0).
    pub row: usize,
    pub error: String,
}

/// Outcome of parsing and validating a whole file.
#[derive(Debug, Serialize)]
pub struct ImportSummary {
    pub success: bool,
    pub total_rows: usize,
    pub successful_imports: usize,
    pub failed_imports: usize,
    pub errors: Vec<RowError>,
}

impl ImportSummary {
    pub fn new(total_rows: usize, successful: usize, errors: Vec<RowError>) -> Self {
        Self {
            success: errors.is_empty(),
            total_rows,
            successful_imports: successful,
            failed_imports: errors.len(),
            errors,
        }
    }
}

/// Catalog lookups the importer validates against.
#[derive(Debug, Default)]
pub struct ImportContext {
    /// asset type code (as stored) → asset type id, active types only.
    pub asset_types_by_code: HashMap<String, DbId>,
    /// location name → location id.
    pub locations_by_name: HashMap<String, DbId>,
    /// asset codes already present in the database.
    pub existing_asset_codes: HashSet<String>,
}

/// Parse raw CSV bytes and validate every data row against the context.
///
/// Returns the rows that passed together with the errors of those that did
/// not. A malformed header fails the whole file with a single error on
/// row 0.
pub fn parse_asset_import(
    data: &[u8],
    ctx: &ImportContext,
) -> Result<(Vec<ImportedAsset>, Vec<RowError>), String> {
    let text = std::str::from_utf8(data).map_err(|e| format!("Invalid UTF-8: {e}"))?;
    let mut lines = text.lines();

    let header_line = lines.next().ok_or("CSV is empty")?;
    let headers: Vec<String> = csv::parse_line(header_line)
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();
    if headers != EXPECTED_HEADER {
        return Err(format!(
            "Unexpected header. Expected: {}",
            EXPECTED_HEADER.join(",")
        ));
    }

    let mut imported = Vec::new();
    let mut errors = Vec::new();
    // Codes seen earlier in this file; duplicates within one upload are
    // row errors, not unique-constraint surprises at insert time.
    let mut seen_codes = HashSet::new();

    for (idx, line) in lines.enumerate() {
        let row = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        match parse_row(row, line, ctx, &seen_codes) {
            Ok(asset) => {
                seen_codes.insert(asset.asset_code.clone());
                imported.push(asset);
            }
            Err(error) => errors.push(RowError { row, error }),
        }
    }

    Ok((imported, errors))
}

fn parse_row(
    row: usize,
    line: &str,
    ctx: &ImportContext,
    seen_codes: &HashSet<String>,
) -> Result<ImportedAsset, String> {
    let fields = csv::parse_line(line);
    if fields.len() != EXPECTED_HEADER.len() {
        return Err(format!(
            "Expected {} columns, found {}",
            EXPECTED_HEADER.len(),
            fields.len()
        ));
    }

    let asset_code = fields[0].trim();
    if asset_code.is_empty() {
        return Err("asset_code must not be empty".into());
    }
    if seen_codes.contains(asset_code) {
        return Err(format!("Duplicate asset_code '{asset_code}' within the file"));
    }
    if ctx.existing_asset_codes.contains(asset_code) {
        return Err(format!("asset_code '{asset_code}' already exists"));
    }

    let type_code = fields[1].trim();
    if type_code.is_empty() {
        return Err("asset_type_code must not be empty".into());
    }
    let asset_type_id = *ctx
        .asset_types_by_code
        .get(type_code)
        .ok_or_else(|| format!("Unknown or inactive asset type code '{type_code}'"))?;

    let name = fields[2].trim();
    if name.is_empty() {
        return Err("name must not be empty".into());
    }

    let value_text = fields[3].trim();
    let asset_value: Decimal = value_text
        .parse()
        .map_err(|_| format!("Invalid asset_value '{value_text}'"))?;
    if asset_value < Decimal::ZERO {
        return Err("asset_value must not be negative".into());
    }

    let date_text = fields[4].trim();
    let purchase_date = if date_text.is_empty() {
        None
    } else {
        Some(
            Date::parse_from_str(date_text, DATE_FORMAT)
                .map_err(|_| format!("Invalid purchase_date '{date_text}' (expected YYYY-MM-DD)"))?,
        )
    };

    let location_text = fields[5].trim();
    let location_id = if location_text.is_empty() {
        None
    } else {
        Some(
            *ctx.locations_by_name
                .get(location_text)
                .ok_or_else(|| format!("Unknown location '{location_text}'"))?,
        )
    };

    let remarks = fields[6].trim();
    let remarks = if remarks.is_empty() {
        None
    } else {
        Some(remarks.to_string())
    };

    Ok(ImportedAsset {
        row,
        asset_code: asset_code.to_string(),
        asset_type_id,
        name: name.to_string(),
        asset_value,
        purchase_date,
        location_id,
        remarks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ImportContext {
        ImportContext {
            asset_types_by_code: HashMap::from([("LPT".to_string(), 1), ("MON".to_string(), 2)]),
            locations_by_name: HashMap::from([("HQ".to_string(), 10)]),
            existing_asset_codes: HashSet::from(["LPT-0001".to_string()]),
        }
    }

    const HEADER: &str = "asset_code,asset_type_code,name,asset_value,purchase_date,location,remarks";

    fn file(rows: &[&str]) -> Vec<u8> {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text.into_bytes()
    }

    #[test]
    fn test_valid_row_parses() {
        let data = file(&["LPT-0002,LPT,Thinkpad T14,1200.00,2024-03-01,HQ,for onboarding"]);
        let (imported, errors) = parse_asset_import(&data, &ctx()).unwrap();
        assert!(errors.is_empty());
        assert_eq!(imported.len(), 1);
        let asset = &imported[0];
        assert_eq!(asset.asset_code, "LPT-0002");
        assert_eq!(asset.asset_type_id, 1);
        assert_eq!(asset.asset_value, Decimal::new(120000, 2));
        assert_eq!(asset.location_id, Some(10));
        assert_eq!(asset.remarks.as_deref(), Some("for onboarding"));
    }

    #[test]
    fn test_optional_fields_may_be_blank() {
        let data = file(&["LPT-0002,LPT,Thinkpad T14,1200,,,"]);
        let (imported, errors) = parse_asset_import(&data, &ctx()).unwrap();
        assert!(errors.is_empty());
        assert_eq!(imported[0].purchase_date, None);
        assert_eq!(imported[0].location_id, None);
        assert_eq!(imported[0].remarks, None);
    }

    #[test]
    fn test_bad_rows_collect_errors_without_aborting() {
        let data = file(&[
            "LPT-0002,LPT,Thinkpad T14,1200.00,2024-03-01,HQ,",
            ",LPT,No code,100,,,",
            "LPT-0003,XXX,Unknown type,100,,,",
            "LPT-0004,LPT,Bad value,abc,,,",
            "LPT-0005,LPT,Bad date,100,03/01/2024,,",
            "LPT-0006,LPT,Bad location,100,,Mars Office,",
            "LPT-0001,LPT,Already exists,100,,,",
        ]);
        let (imported, errors) = parse_asset_import(&data, &ctx()).unwrap();
        assert_eq!(imported.len(), 1);
        assert_eq!(errors.len(), 6);
        assert_eq!(errors[0].row, 2);
        assert!(errors[0].error.contains("asset_code"));
        assert!(errors[1].error.contains("asset type code"));
        assert!(errors[2].error.contains("asset_value"));
        assert!(errors[3].error.contains("purchase_date"));
        assert!(errors[4].error.contains("location"));
        assert!(errors[5].error.contains("already exists"));
    }

    #[test]
    fn test_duplicate_code_within_file() {
        let data = file(&[
            "LPT-0002,LPT,First,100,,,",
            "LPT-0002,LPT,Second,100,,,",
        ]);
        let (imported, errors) = parse_asset_import(&data, &ctx()).unwrap();
        assert_eq!(imported.len(), 1);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].error.contains("Duplicate asset_code"));
    }

    #[test]
    fn test_wrong_header_fails_file() {
        let data = b"code,type\nLPT-0002,LPT".to_vec();
        assert!(parse_asset_import(&data, &ctx()).is_err());
    }

    #[test]
    fn test_empty_file_fails() {
        assert!(parse_asset_import(b"", &ctx()).is_err());
    }

    #[test]
    fn test_quoted_fields_supported() {
        let data = file(&[r#"LPT-0002,LPT,"Laptop, 14 inch",1200,,,"docked, with stand""#]);
        let (imported, errors) = parse_asset_import(&data, &ctx()).unwrap();
        assert!(errors.is_empty());
        assert_eq!(imported[0].name, "Laptop, 14 inch");
        assert_eq!(imported[0].remarks.as_deref(), Some("docked, with stand"));
    }

    #[test]
    fn test_summary_shape() {
        let summary = ImportSummary::new(
            3,
            2,
            vec![RowError {
                row: 3,
                error: "bad".into(),
            }],
        );
        assert!(!summary.success);
        assert_eq!(summary.total_rows, 3);
        assert_eq!(summary.successful_imports, 2);
        assert_eq!(summary.failed_imports, 1);
    }
}
