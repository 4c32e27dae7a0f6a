//! Reference table loading from CSV files
//!
//! # File formats
//!
//! - `fccs2covertype.csv`: `fccs_id,cover_type_id`
//! - `covertype2efgroup.csv`: `cover_type_id,wf,rx,regional_wf,regional_rx`
//! - `catphase2efgroup.csv`: `region,fuel_category,fuel_sub_category,phase,ef_group`
//!   (an empty or `None` EF group suppresses emissions)
//! - `efgroup2ef.csv`: `ef_group,<species>,<species>,...` with empty cells
//!   for species that were not measured
//!
//! Cells are trimmed; keys are otherwise matched exactly.

use super::{
    CoverTypeEfGroups, CoverTypeRecord, EfGroupTable, EfSet, FuelbedCoverTypes, OverrideTable,
};
use crate::core_types::{EfGroupId, Phase, RegionId};
use crate::error::LoadError;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Cell value the override table uses for an explicit null
const NULL_EF_GROUP: &str = "None";

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn open(path: &Path) -> Result<(csv::Reader<File>, String), LoadError> {
    let origin = path.display().to_string();
    let file = File::open(path).map_err(|e| LoadError::Csv {
        origin: origin.clone(),
        source: csv::Error::from(e),
    })?;
    Ok((csv_reader(file), origin))
}

fn csv_error(origin: &str) -> impl Fn(csv::Error) -> LoadError + '_ {
    move |source| LoadError::Csv {
        origin: origin.to_owned(),
        source,
    }
}

fn non_empty(cell: Option<String>) -> Option<String> {
    cell.filter(|c| !c.is_empty())
}

#[derive(Debug, Deserialize)]
struct FuelbedRow {
    fccs_id: String,
    cover_type_id: String,
}

#[derive(Debug, Deserialize)]
struct CoverTypeRow {
    cover_type_id: String,
    #[serde(default)]
    wf: Option<String>,
    #[serde(default)]
    rx: Option<String>,
    #[serde(default)]
    regional_wf: Option<String>,
    #[serde(default)]
    regional_rx: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OverrideRow {
    region: String,
    fuel_category: String,
    fuel_sub_category: String,
    phase: String,
    #[serde(default)]
    ef_group: Option<String>,
}

impl FuelbedCoverTypes {
    /// Load the fuelbed → cover type table from a CSV file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed, or a fuelbed is
    /// listed twice
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let (reader, origin) = open(path.as_ref())?;
        Self::read(reader, &origin)
    }

    /// Load the fuelbed → cover type table from CSV text
    ///
    /// # Errors
    /// See [`FuelbedCoverTypes::from_path`]
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        Self::read(csv_reader(reader), "fuelbed cover type table")
    }

    fn read<R: Read>(mut reader: csv::Reader<R>, origin: &str) -> Result<Self, LoadError> {
        let mut table = Self::new();
        for row in reader.deserialize::<FuelbedRow>() {
            let row = row.map_err(csv_error(origin))?;
            if table.insert(row.fccs_id.clone(), row.cover_type_id).is_some() {
                return Err(LoadError::DuplicateKey {
                    origin: origin.to_owned(),
                    key: format!("fuelbed '{}'", row.fccs_id),
                });
            }
        }
        debug!(origin, fuelbeds = table.len(), "Loaded fuelbed cover types");
        Ok(table)
    }
}

impl CoverTypeEfGroups {
    /// Load the cover type → EF group table from a CSV file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed, or a cover type
    /// is listed twice
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let (reader, origin) = open(path.as_ref())?;
        Self::read(reader, &origin)
    }

    /// Load the cover type → EF group table from CSV text
    ///
    /// # Errors
    /// See [`CoverTypeEfGroups::from_path`]
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        Self::read(csv_reader(reader), "cover type EF group table")
    }

    fn read<R: Read>(mut reader: csv::Reader<R>, origin: &str) -> Result<Self, LoadError> {
        let mut table = Self::new();
        for row in reader.deserialize::<CoverTypeRow>() {
            let row = row.map_err(csv_error(origin))?;
            let record = CoverTypeRecord {
                wf: non_empty(row.wf).map(EfGroupId::from),
                rx: non_empty(row.rx).map(EfGroupId::from),
                regional_wf: non_empty(row.regional_wf).map(RegionId::from),
                regional_rx: non_empty(row.regional_rx).map(RegionId::from),
            };
            if table.insert(row.cover_type_id.clone(), record).is_some() {
                return Err(LoadError::DuplicateKey {
                    origin: origin.to_owned(),
                    key: format!("cover type '{}'", row.cover_type_id),
                });
            }
        }
        debug!(origin, cover_types = table.len(), "Loaded cover type EF groups");
        Ok(table)
    }
}

impl OverrideTable {
    /// Load the category/phase override table from a CSV file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed, a phase is not
    /// recognised, or a combination is listed twice
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let (reader, origin) = open(path.as_ref())?;
        Self::read(reader, &origin)
    }

    /// Load the category/phase override table from CSV text
    ///
    /// # Errors
    /// See [`OverrideTable::from_path`]
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        Self::read(csv_reader(reader), "override table")
    }

    fn read<R: Read>(mut reader: csv::Reader<R>, origin: &str) -> Result<Self, LoadError> {
        let mut table = Self::new();
        for row in reader.deserialize::<OverrideRow>() {
            let row = row.map_err(csv_error(origin))?;
            let phase: Phase = row.phase.parse().map_err(|_| LoadError::InvalidPhase {
                origin: origin.to_owned(),
                phase: row.phase.clone(),
            })?;
            let ef_group = non_empty(row.ef_group)
                .filter(|g| g != NULL_EF_GROUP)
                .map(EfGroupId::from);
            let key = format!(
                "({}, {}, {}, {})",
                row.region, row.fuel_category, row.fuel_sub_category, phase
            );
            if table
                .insert(row.region, row.fuel_category, row.fuel_sub_category, phase, ef_group)
                .is_some()
            {
                return Err(LoadError::DuplicateKey {
                    origin: origin.to_owned(),
                    key,
                });
            }
        }
        debug!(origin, overrides = table.len(), "Loaded EF group overrides");
        Ok(table)
    }
}

impl EfGroupTable {
    /// Load EF values per group from a wide CSV file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed, the `ef_group`
    /// column is missing, a value is not a non-negative number, or a group
    /// is listed twice
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let (reader, origin) = open(path.as_ref())?;
        Self::read(reader, &origin)
    }

    /// Load EF values per group from wide CSV text
    ///
    /// # Errors
    /// See [`EfGroupTable::from_path`]
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        Self::read(csv_reader(reader), "EF group table")
    }

    fn read<R: Read>(mut reader: csv::Reader<R>, origin: &str) -> Result<Self, LoadError> {
        let headers = reader.headers().map_err(csv_error(origin))?.clone();
        let group_col = headers
            .iter()
            .position(|h| h == "ef_group")
            .ok_or_else(|| LoadError::MissingColumn {
                origin: origin.to_owned(),
                column: "ef_group",
            })?;

        let mut table = Self::new();
        for record in reader.records() {
            let record = record.map_err(csv_error(origin))?;
            let ef_group = record.get(group_col).unwrap_or_default();
            if table.contains(ef_group) {
                return Err(LoadError::DuplicateKey {
                    origin: origin.to_owned(),
                    key: format!("EF group '{ef_group}'"),
                });
            }
            let cells = headers
                .iter()
                .zip(record.iter())
                .enumerate()
                .filter(|(i, _)| *i != group_col)
                .map(|(_, cell)| cell);
            let set = EfSet::from_raw(origin, ef_group, cells)?;
            table.insert(ef_group, set);
        }
        debug!(origin, ef_groups = table.len(), "Loaded EF groups");
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{Override, WOODY_RSC_GROUP};
    use approx::assert_relative_eq;

    #[test]
    fn test_fuelbed_table() {
        let csv = "fccs_id,cover_type_id\n52,118\n53, 118 \n";
        let table = FuelbedCoverTypes::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.cover_type("53").unwrap().as_str(), "118");
    }

    #[test]
    fn test_fuelbed_table_rejects_duplicates() {
        let csv = "fccs_id,cover_type_id\n52,118\n52,119\n";
        let err = FuelbedCoverTypes::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateKey { .. }), "{err}");
    }

    #[test]
    fn test_cover_type_table_rejects_duplicates() {
        let csv = "cover_type_id,wf,rx,regional_wf,regional_rx\n118,G7,G8,,\n118,G3,G4,,\n";
        let err = CoverTypeEfGroups::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateKey { ref key, .. } if key.contains("118")));
    }

    #[test]
    fn test_cover_type_table_empty_cells() {
        let csv = "cover_type_id,wf,rx,regional_wf,regional_rx\n118,G7,G8,,southeast\n119,,G8,,\n";
        let table = CoverTypeEfGroups::from_reader(csv.as_bytes()).unwrap();
        let record = table.get("118").unwrap();
        assert_eq!(record.wf.as_deref(), Some("G7"));
        assert_eq!(record.regional_wf, None);
        assert_eq!(record.regional_rx.as_deref(), Some("southeast"));
        assert_eq!(table.get("119").unwrap().wf, None);
    }

    #[test]
    fn test_override_table_null_and_redirect() {
        let csv = "region,fuel_category,fuel_sub_category,phase,ef_group\n\
                   southeast,canopy,overstory,flaming,G9\n\
                   southeast,canopy,overstory,residual,\n\
                   southeast,canopy,midstory,residual,None\n";
        let table = OverrideTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);
        assert!(matches!(
            table.probe("southeast", "canopy", "overstory", Phase::Flaming),
            Override::Redirect(g) if g.as_str() == "G9"
        ));
        assert_eq!(
            table.probe("southeast", "canopy", "overstory", Phase::Residual),
            Override::Suppressed
        );
        assert_eq!(
            table.probe("southeast", "canopy", "midstory", Phase::Residual),
            Override::Suppressed
        );
    }

    #[test]
    fn test_override_table_rejects_duplicates() {
        // Same combination, even when one row suppresses and the other redirects
        let csv = "region,fuel_category,fuel_sub_category,phase,ef_group\n\
                   southeast,canopy,overstory,flaming,G9\n\
                   southeast,canopy,overstory,flaming,None\n";
        let err = OverrideTable::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateKey { .. }), "{err}");

        let csv = "region,fuel_category,fuel_sub_category,phase,ef_group\n\
                   southeast,canopy,overstory,flaming,G9\n\
                   southeast,canopy,overstory,smoldering,G9\n";
        assert_eq!(OverrideTable::from_reader(csv.as_bytes()).unwrap().len(), 2);
    }

    #[test]
    fn test_override_table_rejects_unknown_phase() {
        let csv = "region,fuel_category,fuel_sub_category,phase,ef_group\n\
                   southeast,canopy,overstory,glowing,G9\n";
        let err = OverrideTable::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidPhase { ref phase, .. } if phase == "glowing"));
    }

    #[test]
    fn test_ef_group_table_wide_format() {
        let csv = "ef_group,CO2,CH4,PM2.5\n\
                   G7,1655.0,,0.012\n\
                   residual rsc woody,1408.0,11.3,\n";
        let table = EfGroupTable::from_reader(csv.as_bytes()).unwrap();
        let g7 = table.get("G7").unwrap();
        assert_relative_eq!(g7.get("CO2").unwrap(), 1655.0);
        assert_relative_eq!(g7.get("PM2.5").unwrap(), 0.012);
        assert_eq!(g7.get("CH4"), None);
        assert_eq!(table.get(WOODY_RSC_GROUP).unwrap().len(), 2);
    }

    #[test]
    fn test_ef_group_column_may_be_anywhere() {
        let csv = "CO2,ef_group\n1.5,G1\n";
        let table = EfGroupTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.get("G1").unwrap().get("CO2"), Some(1.5));
        assert_eq!(table.get("G1").unwrap().get("ef_group"), None);
    }

    #[test]
    fn test_ef_group_table_rejects_duplicates() {
        let csv = "ef_group,CO2\nG7,1655.0\nG7,1600.0\n";
        let err = EfGroupTable::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateKey { ref key, .. } if key.contains("G7")));
    }

    #[test]
    fn test_ef_group_table_requires_group_column() {
        let csv = "group,CO2\nG7,1.0\n";
        let err = EfGroupTable::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { column: "ef_group", .. }));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = FuelbedCoverTypes::from_path("/nonexistent/fccs2covertype.csv").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/fccs2covertype.csv"));
    }
}
