//! CSV ingest with header-alias resolution and per-row cleaning.
//!
//! The loader accepts the two column layouts the source files ship with:
//! the snake_case layout (`crop,region,year,yield_t_ha,...`) and the
//! capitalized layout (`Crop,Area,Year,Crop_Yield,Rain_mm`). Each logical
//! column resolves through an alias list after header normalization, so a
//! file may mix the two. Leftover dataframe-index columns (`Unnamed: 0`)
//! are never looked up and therefore ignored.
//!
//! Cleaning rules:
//!
//! - rows missing crop, region, year, or yield are skipped and counted;
//! - optional covariates that fail numeric parsing coerce to `None`;
//! - when a crops-of-interest allow-list is given, rows for other crops
//!   are dropped and counted separately.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;
use yieldscope_types::Observation;

use crate::error::DataError;

/// Accepted headers for the crop column.
const CROP_ALIASES: &[&str] = &["crop"];
/// Accepted headers for the region column.
const REGION_ALIASES: &[&str] = &["region", "area"];
/// Accepted headers for the year column.
const YEAR_ALIASES: &[&str] = &["year"];
/// Accepted headers for the primary yield column.
const YIELD_ALIASES: &[&str] = &["yield_t_ha", "crop_yield"];
/// Accepted headers for the secondary yield column.
const YIELD_HG_ALIASES: &[&str] = &["yield_hg_ha"];
/// Accepted headers for the rainfall covariate.
const RAINFALL_ALIASES: &[&str] = &["rainfall_mm", "rain_mm"];
/// Accepted headers for the temperature covariate.
const TEMP_ALIASES: &[&str] = &["avg_temp_c"];
/// Accepted headers for the pesticide covariate.
const PESTICIDE_ALIASES: &[&str] = &["pesticide_t"];

/// One row dropped during cleaning, with its 1-based file line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSkip {
    /// Line number in the source file (the header is line 1).
    pub line: usize,
    /// Human-readable reason the row was dropped.
    pub message: String,
}

/// Everything the loader produced from one file.
#[derive(Debug, Clone)]
pub struct IngestReport {
    /// Cleaned observations in file order.
    pub observations: Vec<Observation>,
    /// Rows dropped because a required field was missing or unparseable.
    pub skips: Vec<RowSkip>,
    /// Data rows read from the file, before any cleaning.
    pub rows_read: u64,
    /// Rows dropped by the crops-of-interest allow-list.
    pub rows_filtered: u64,
}

/// Loads and cleans observations from a CSV file on disk.
///
/// # Errors
///
/// Returns [`DataError::Open`] when the file cannot be opened, and the
/// errors of [`read_csv`] for everything past that.
pub fn load_csv(path: &Path, crops_of_interest: &[String]) -> Result<IngestReport, DataError> {
    let file = File::open(path).map_err(|source| DataError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_csv(file, crops_of_interest)
}

/// Loads and cleans observations from any CSV reader.
///
/// # Errors
///
/// Returns [`DataError::Csv`] when a record cannot be decoded and
/// [`DataError::MissingColumn`] when a required column has no accepted
/// header in the file.
pub fn read_csv<R: Read>(
    reader: R,
    crops_of_interest: &[String],
) -> Result<IngestReport, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let columns = ColumnIndexes::resolve(&headers)?;

    let mut observations = Vec::new();
    let mut skips = Vec::new();
    let mut rows_read: u64 = 0;
    let mut rows_filtered: u64 = 0;

    for (idx, result) in rdr.records().enumerate() {
        let record = result?;
        rows_read = rows_read.saturating_add(1);
        // The header occupies line 1, so data rows start at line 2.
        let line = idx.saturating_add(2);

        let Some(crop) = field(&record, columns.crop) else {
            skip(&mut skips, line, "missing crop");
            continue;
        };
        let Some(region) = field(&record, columns.region) else {
            skip(&mut skips, line, "missing region");
            continue;
        };
        let Some(year) = field(&record, columns.year).and_then(|s| s.parse::<i32>().ok()) else {
            skip(&mut skips, line, "missing or non-integer year");
            continue;
        };
        let Some(yield_t_ha) = parse_f64(field(&record, columns.yield_t_ha)) else {
            skip(&mut skips, line, "missing or non-numeric yield");
            continue;
        };

        if !crops_of_interest.is_empty() && !crops_of_interest.iter().any(|c| c == crop) {
            rows_filtered = rows_filtered.saturating_add(1);
            continue;
        }

        observations.push(Observation {
            crop: crop.to_owned(),
            region: region.to_owned(),
            year,
            yield_t_ha,
            yield_hg_ha: optional_f64(&record, columns.yield_hg_ha),
            rainfall_mm: optional_f64(&record, columns.rainfall_mm),
            avg_temp_c: optional_f64(&record, columns.avg_temp_c),
            pesticide_t: optional_f64(&record, columns.pesticide_t),
        });
    }

    debug!(
        rows_read,
        rows_used = observations.len(),
        rows_skipped = skips.len(),
        rows_filtered,
        "CSV ingest finished"
    );

    Ok(IngestReport {
        observations,
        skips,
        rows_read,
        rows_filtered,
    })
}

/// Resolved indexes of every logical column in one header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndexes {
    crop: usize,
    region: usize,
    year: usize,
    yield_t_ha: usize,
    yield_hg_ha: Option<usize>,
    rainfall_mm: Option<usize>,
    avg_temp_c: Option<usize>,
    pesticide_t: Option<usize>,
}

impl ColumnIndexes {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, DataError> {
        let map = build_header_map(headers);
        Ok(Self {
            crop: require_column(&map, "crop", CROP_ALIASES)?,
            region: require_column(&map, "region", REGION_ALIASES)?,
            year: require_column(&map, "year", YEAR_ALIASES)?,
            yield_t_ha: require_column(&map, "yield", YIELD_ALIASES)?,
            yield_hg_ha: find_column(&map, YIELD_HG_ALIASES),
            rainfall_mm: find_column(&map, RAINFALL_ALIASES),
            avg_temp_c: find_column(&map, TEMP_ALIASES),
            pesticide_t: find_column(&map, PESTICIDE_ALIASES),
        })
    }
}

/// Maps normalized header names to their column index.
fn build_header_map(headers: &csv::StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(index, name)| (normalize_header(name), index))
        .collect()
}

/// Lowercases a header and strips surrounding whitespace and a UTF-8 BOM.
fn normalize_header(name: &str) -> String {
    name.trim().trim_start_matches('\u{feff}').to_lowercase()
}

fn find_column(map: &HashMap<String, usize>, aliases: &[&str]) -> Option<usize> {
    aliases.iter().find_map(|name| map.get(*name).copied())
}

fn require_column(
    map: &HashMap<String, usize>,
    column: &'static str,
    aliases: &[&str],
) -> Result<usize, DataError> {
    find_column(map, aliases).ok_or_else(|| DataError::MissingColumn {
        column,
        aliases: aliases.join(", "),
    })
}

/// Returns the trimmed field at `index`, treating empty strings as absent.
fn field<'r>(record: &'r csv::StringRecord, index: usize) -> Option<&'r str> {
    record.get(index).map(str::trim).filter(|s| !s.is_empty())
}

/// Parses a finite float, coercing anything else to `None`.
fn parse_f64(value: Option<&str>) -> Option<f64> {
    value
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn optional_f64(record: &csv::StringRecord, index: Option<usize>) -> Option<f64> {
    index.and_then(|i| parse_f64(field(record, i)))
}

fn skip(skips: &mut Vec<RowSkip>, line: usize, message: &str) {
    debug!(line, message, "skipping unusable row");
    skips.push(RowSkip {
        line,
        message: message.to_owned(),
    });
}
