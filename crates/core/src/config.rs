//! Lookup configuration
//!
//! Names the four reference table files and the burn type. Configs are
//! plain JSON:
//!
//! ```json
//! {
//!   "is_rx": false,
//!   "tables": {
//!     "fccs_2_cover_type": "data/fccs2covertype.csv",
//!     "cover_type_2_ef_group": "data/covertype2efgroup.csv",
//!     "cat_phase_2_ef_group": "data/catphase2efgroup.csv",
//!     "ef_group_2_ef": "data/efgroup2ef.csv"
//!   }
//! }
//! ```
//!
//! Relative table paths resolve against the directory of the config file.

use crate::core_types::BurnType;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Conventional file names inside a table directory
pub const FCCS_2_COVER_TYPE_FILE: &str = "fccs2covertype.csv";
pub const COVER_TYPE_2_EF_GROUP_FILE: &str = "covertype2efgroup.csv";
pub const CAT_PHASE_2_EF_GROUP_FILE: &str = "catphase2efgroup.csv";
pub const EF_GROUP_2_EF_FILE: &str = "efgroup2ef.csv";

/// Paths of the four reference tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableFiles {
    pub fccs_2_cover_type: PathBuf,
    pub cover_type_2_ef_group: PathBuf,
    pub cat_phase_2_ef_group: PathBuf,
    pub ef_group_2_ef: PathBuf,
}

impl TableFiles {
    /// Tables stored under their conventional names in one directory
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            fccs_2_cover_type: dir.join(FCCS_2_COVER_TYPE_FILE),
            cover_type_2_ef_group: dir.join(COVER_TYPE_2_EF_GROUP_FILE),
            cat_phase_2_ef_group: dir.join(CAT_PHASE_2_EF_GROUP_FILE),
            ef_group_2_ef: dir.join(EF_GROUP_2_EF_FILE),
        }
    }

    /// Resolve relative paths against `base`
    pub fn relative_to(mut self, base: &Path) -> Self {
        for path in [
            &mut self.fccs_2_cover_type,
            &mut self.cover_type_2_ef_group,
            &mut self.cat_phase_2_ef_group,
            &mut self.ef_group_2_ef,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        self
    }
}

/// Table locations plus burn type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupConfig {
    pub tables: TableFiles,
    /// Prescribed burn (true) or wildfire (false)
    #[serde(default)]
    pub is_rx: bool,
}

impl LookupConfig {
    pub fn new(tables: TableFiles, is_rx: bool) -> Self {
        Self { tables, is_rx }
    }

    /// Load a config from a JSON file
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(Self {
            tables: config.tables.relative_to(base),
            is_rx: config.is_rx,
        })
    }

    pub fn burn_type(&self) -> BurnType {
        BurnType::from_is_rx(self.is_rx)
    }
}
