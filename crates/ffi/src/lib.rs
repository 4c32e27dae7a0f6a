//! C-compatible interface to the FCCS emission factor lookup
//!
//! Create a handle once (from a JSON config or a table directory), run any
//! number of lookups against it, then destroy it. Every function returns a
//! [`Fccs2EfErrorCode`]; details of the last failure on the calling thread
//! are available from `fccs2ef_get_last_error`.

mod error;
mod helpers;
mod lookup;

pub use error::{fccs2ef_get_last_error, fccs2ef_get_last_error_code, Fccs2EfErrorCode};
pub use lookup::{
    fccs2ef_destroy, fccs2ef_get_cover_type, fccs2ef_get_fuelbed, fccs2ef_new,
    fccs2ef_new_from_dir, Fccs2EfHandle,
};
