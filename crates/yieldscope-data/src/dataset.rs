//! The immutable observation table and its derived indexes.
//!
//! A [`Dataset`] is built once at startup from an [`IngestReport`] and never
//! mutated. It owns the cleaned rows plus everything the dashboards derive
//! from them: sorted crop and region lists, the dataset-wide year range,
//! per-crop year sequences, filtered views, and the CSV export encoding.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use yieldscope_types::Observation;

use crate::error::DataError;
use crate::filter::FilterSpec;
use crate::ingest::IngestReport;

/// Header row of the CSV export, matching the snake_case input layout.
const EXPORT_HEADER: [&str; 8] = [
    "crop",
    "region",
    "year",
    "yield_t_ha",
    "yield_hg_ha",
    "rainfall_mm",
    "avg_temp_c",
    "pesticide_t",
];

/// Load accounting captured when the dataset is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetProfile {
    /// Data rows read from the file.
    pub rows_read: u64,
    /// Rows that survived cleaning.
    pub rows_used: u64,
    /// Rows dropped for missing required fields.
    pub rows_skipped: u64,
    /// Rows dropped by the crops-of-interest allow-list.
    pub rows_filtered: u64,
    /// Distinct crops in the cleaned data.
    pub crop_count: usize,
    /// Distinct regions in the cleaned data.
    pub region_count: usize,
    /// Earliest observed year.
    pub year_min: i32,
    /// Latest observed year.
    pub year_max: i32,
    /// When the dataset was built.
    pub loaded_at: DateTime<Utc>,
}

/// The cleaned observation table, immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct Dataset {
    observations: Vec<Observation>,
    crops: Vec<String>,
    regions: Vec<String>,
    year_min: i32,
    year_max: i32,
    profile: DatasetProfile,
}

impl Dataset {
    /// Builds the dataset and its derived indexes from an ingest report.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::EmptyDataset`] when no observations survived
    /// cleaning; an empty table supports none of the dashboards.
    pub fn new(report: IngestReport) -> Result<Self, DataError> {
        let IngestReport {
            observations,
            skips,
            rows_read,
            rows_filtered,
        } = report;

        if observations.is_empty() {
            return Err(DataError::EmptyDataset {
                skipped: u64::try_from(skips.len()).unwrap_or(u64::MAX),
            });
        }

        let mut crop_set = BTreeSet::new();
        let mut region_set = BTreeSet::new();
        let mut year_min = i32::MAX;
        let mut year_max = i32::MIN;
        for obs in &observations {
            crop_set.insert(obs.crop.clone());
            region_set.insert(obs.region.clone());
            year_min = year_min.min(obs.year);
            year_max = year_max.max(obs.year);
        }
        let crops: Vec<String> = crop_set.into_iter().collect();
        let regions: Vec<String> = region_set.into_iter().collect();

        let profile = DatasetProfile {
            rows_read,
            rows_used: u64::try_from(observations.len()).unwrap_or(u64::MAX),
            rows_skipped: u64::try_from(skips.len()).unwrap_or(u64::MAX),
            rows_filtered,
            crop_count: crops.len(),
            region_count: regions.len(),
            year_min,
            year_max,
            loaded_at: Utc::now(),
        };

        Ok(Self {
            observations,
            crops,
            regions,
            year_min,
            year_max,
            profile,
        })
    }

    /// All cleaned observations in file order.
    #[must_use]
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Distinct crops, sorted ascending.
    #[must_use]
    pub fn crops(&self) -> &[String] {
        &self.crops
    }

    /// Distinct regions, sorted ascending.
    #[must_use]
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    /// Earliest observed year across all crops.
    #[must_use]
    pub const fn year_min(&self) -> i32 {
        self.year_min
    }

    /// Latest observed year across all crops.
    #[must_use]
    pub const fn year_max(&self) -> i32 {
        self.year_max
    }

    /// Load accounting for startup logging.
    #[must_use]
    pub const fn profile(&self) -> &DatasetProfile {
        &self.profile
    }

    /// Ascending, duplicate-free years with at least one observation for
    /// `crop`. Unknown crops produce an empty sequence.
    #[must_use]
    pub fn year_sequence(&self, crop: &str) -> Vec<i32> {
        let years: BTreeSet<i32> = self
            .observations
            .iter()
            .filter(|obs| obs.crop == crop)
            .map(|obs| obs.year)
            .collect();
        years.into_iter().collect()
    }

    /// Observations passing the filter, in file order.
    #[must_use]
    pub fn filtered(&self, filter: &FilterSpec) -> Vec<&Observation> {
        self.observations
            .iter()
            .filter(|obs| filter.matches(obs))
            .collect()
    }

    /// Encodes the filtered observations as a CSV document.
    ///
    /// Absent covariates encode as empty fields, mirroring the input format.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Export`] when the in-memory writer cannot be
    /// finalized.
    pub fn to_csv(&self, filter: &FilterSpec) -> Result<String, DataError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(EXPORT_HEADER)?;

        for obs in self.filtered(filter) {
            let year = obs.year.to_string();
            let yield_t_ha = obs.yield_t_ha.to_string();
            let yield_hg_ha = optional_field(obs.yield_hg_ha);
            let rainfall_mm = optional_field(obs.rainfall_mm);
            let avg_temp_c = optional_field(obs.avg_temp_c);
            let pesticide_t = optional_field(obs.pesticide_t);
            writer.write_record([
                obs.crop.as_str(),
                obs.region.as_str(),
                year.as_str(),
                yield_t_ha.as_str(),
                yield_hg_ha.as_str(),
                rainfall_mm.as_str(),
                avg_temp_c.as_str(),
                pesticide_t.as_str(),
            ])?;
        }

        writer
            .flush()
            .map_err(|err| DataError::Export(err.to_string()))?;
        let bytes = writer
            .into_inner()
            .map_err(|err| DataError::Export(err.to_string()))?;
        String::from_utf8(bytes).map_err(|err| DataError::Export(err.to_string()))
    }
}

/// Encodes an optional float, using the empty string for `None`.
fn optional_field(value: Option<f64>) -> String {
    value.map_or_else(String::new, |v| v.to_string())
}
