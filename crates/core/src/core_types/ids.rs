//! Identifier newtypes for the lookup chain
//!
//! Every identifier in the reference tables is a string, even when it looks
//! numeric (FCCS fuelbed `"52"`, cover type `"118"`). Wrapping them keeps a
//! fuelbed id from being passed where a cover type id is expected.
//!
//! # Usage
//! ```
//! use fccs2ef_core::core_types::{CoverTypeId, FuelbedId};
//!
//! let fuelbed = FuelbedId::from(52_u32);
//! assert_eq!(&*fuelbed, "52");
//!
//! let cover_type = CoverTypeId::from("118");
//! assert_eq!(cover_type.to_string(), "118");
//! ```

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrow the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// True if the identifier is the empty string
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// FCCS fuelbed identifier (caller supplied, often numeric-looking)
    FuelbedId
);

string_id!(
    /// Cover type identifier; many fuelbeds share one cover type
    CoverTypeId
);

string_id!(
    /// Named bundle of per-species emission factors
    EfGroupId
);

string_id!(
    /// Region selecting a row set of the override table
    RegionId
);

string_id!(
    /// Chemical species name (`"CO2"`, `"PM2.5"`, ...)
    Species
);

/// Numeric fuelbed ids are accepted and stored in their decimal form
impl From<u32> for FuelbedId {
    fn from(value: u32) -> Self {
        Self(value.to_string())
    }
}
