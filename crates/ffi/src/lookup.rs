use fccs2ef_core::{LookupConfig, ResolverRegistry, Subject, TableFiles};
use std::os::raw::c_char;
use std::ptr;

use crate::error::{DefaultFccs2EfError, Fccs2EfErrorCode};
use crate::helpers::{str_arg, track_error, track_result};

/// Emission factor lookup context.
/// Holds the loaded reference tables and the per cover type resolver cache.
///
/// # Thread Safety
/// `Fccs2EfHandle` is thread-safe and can be shared across threads. The
/// resolver cache is guarded internally; lookups from several threads on one
/// handle build each cover type's resolver exactly once.
pub struct Fccs2EfHandle {
    pub(crate) registry: ResolverRegistry,
}

impl Fccs2EfHandle {
    pub(crate) fn from_config(config: &LookupConfig) -> Result<Box<Self>, DefaultFccs2EfError> {
        Ok(Box::new(Self {
            registry: ResolverRegistry::from_config(config)?,
        }))
    }
}

/// Write a freshly created handle (or null on failure) to `out_handle`.
///
/// # Safety
/// `out_handle` must be non-null and writable.
unsafe fn write_handle(
    result: Result<Box<Fccs2EfHandle>, DefaultFccs2EfError>,
    out_handle: *mut *mut Fccs2EfHandle,
) -> Fccs2EfErrorCode {
    match track_result(result) {
        Ok(handle) => {
            unsafe {
                *out_handle = Box::into_raw(handle);
            }
            Fccs2EfErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                // Set to null on error (per documentation contract)
                *out_handle = ptr::null_mut();
            }
            code
        }
    }
}

/// Create a lookup handle from a JSON config file.
///
/// Returns
/// - `Fccs2EfErrorCode::Ok` (0): success, `out_handle` contains valid pointer
/// - `Fccs2EfErrorCode::NullPointer`: `config_path` or `out_handle` is null
/// - `Fccs2EfErrorCode::InvalidString`: `config_path` is not UTF-8
/// - `Fccs2EfErrorCode::LoadFailed`: config or a table could not be read
///
/// # Safety
/// - `config_path` must be null or a valid null-terminated string.
/// - `out_handle` must be a valid, non-null pointer to writable memory.
/// - The caller takes ownership of the returned handle and MUST call
///   `fccs2ef_destroy` exactly once.
#[no_mangle]
pub unsafe extern "C" fn fccs2ef_new(
    config_path: *const c_char,
    out_handle: *mut *mut Fccs2EfHandle,
) -> Fccs2EfErrorCode {
    if out_handle.is_null() {
        return track_error(&DefaultFccs2EfError::null_pointer("out_handle"));
    }

    let result = unsafe { str_arg(config_path, "config_path") }.and_then(|path| {
        let config = LookupConfig::load(path)?;
        Fccs2EfHandle::from_config(&config)
    });
    unsafe { write_handle(result, out_handle) }
}

/// Create a lookup handle from a directory holding the four tables under
/// their conventional file names.
///
/// Returns the same codes as `fccs2ef_new`.
///
/// # Safety
/// Same contract as `fccs2ef_new`, with `tables_dir` in place of `config_path`.
#[no_mangle]
pub unsafe extern "C" fn fccs2ef_new_from_dir(
    tables_dir: *const c_char,
    is_rx: bool,
    out_handle: *mut *mut Fccs2EfHandle,
) -> Fccs2EfErrorCode {
    if out_handle.is_null() {
        return track_error(&DefaultFccs2EfError::null_pointer("out_handle"));
    }

    let result = unsafe { str_arg(tables_dir, "tables_dir") }.and_then(|dir| {
        Fccs2EfHandle::from_config(&LookupConfig::new(TableFiles::in_dir(dir), is_rx))
    });
    unsafe { write_handle(result, out_handle) }
}

/// Destroys a handle previously created by `fccs2ef_new` or
/// `fccs2ef_new_from_dir`. Null is a no-op.
///
/// # Safety
/// - The pointer MUST have been created by one of the constructors above.
/// - The pointer MUST NOT have been freed already; it must not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn fccs2ef_destroy(handle: *mut Fccs2EfHandle) {
    if handle.is_null() {
        return;
    }

    // SAFETY: The pointer was created by `Box::into_raw` in `write_handle`
    // and has not been freed, per the contract above.
    unsafe {
        drop(Box::from_raw(handle));
    }
}

/// Shared body of the two lookup entry points.
///
/// # Safety
/// All pointers must be null or valid for the duration of the call.
#[allow(clippy::too_many_arguments)]
unsafe fn lookup(
    handle: *const Fccs2EfHandle,
    subject: impl FnOnce(&str) -> Subject,
    subject_id: *const c_char,
    phase: *const c_char,
    fuel_category: *const c_char,
    fuel_sub_category: *const c_char,
    species: *const c_char,
    out_value: *mut f64,
    out_found: *mut bool,
) -> Fccs2EfErrorCode {
    if handle.is_null() {
        return track_error(&DefaultFccs2EfError::null_pointer("handle"));
    }
    if out_value.is_null() {
        return track_error(&DefaultFccs2EfError::null_pointer("out_value"));
    }
    if out_found.is_null() {
        return track_error(&DefaultFccs2EfError::null_pointer("out_found"));
    }

    // SAFETY: handle is non-null and, per contract, points to a live handle.
    let handle = unsafe { &*handle };
    let result = unsafe {
        (|| {
            let subject = subject(str_arg(subject_id, "subject_id")?);
            let value = handle.registry.get(
                &subject,
                str_arg(phase, "phase")?,
                str_arg(fuel_category, "fuel_category")?,
                str_arg(fuel_sub_category, "fuel_sub_category")?,
                str_arg(species, "species")?,
            )?;
            Ok::<_, DefaultFccs2EfError>(value)
        })()
    };

    match track_result(result) {
        Ok(value) => {
            unsafe {
                *out_found = value.is_some();
                *out_value = value.unwrap_or(0.0);
            }
            Fccs2EfErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                *out_found = false;
                *out_value = 0.0;
            }
            code
        }
    }
}

/// Look up an emission factor by FCCS fuelbed id.
///
/// On success `out_found` tells whether an emission factor exists; when it
/// is false `out_value` is 0.0 and must not be read as a measured zero. An
/// unknown fuelbed is reported as not found, not as an error.
///
/// Returns
/// - `Fccs2EfErrorCode::Ok` (0): lookup completed
/// - `Fccs2EfErrorCode::NullPointer`: any pointer argument is null
/// - `Fccs2EfErrorCode::InvalidString`: a string argument is not UTF-8
/// - `Fccs2EfErrorCode::MissingLookupKey`: phase, category, sub-category or species is empty
///
/// # Safety
/// - `handle` must come from `fccs2ef_new`/`fccs2ef_new_from_dir` and not be destroyed.
/// - String arguments must be null or valid null-terminated strings.
/// - `out_value` and `out_found` must be writable.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn fccs2ef_get_fuelbed(
    handle: *const Fccs2EfHandle,
    fuelbed_id: *const c_char,
    phase: *const c_char,
    fuel_category: *const c_char,
    fuel_sub_category: *const c_char,
    species: *const c_char,
    out_value: *mut f64,
    out_found: *mut bool,
) -> Fccs2EfErrorCode {
    unsafe {
        lookup(
            handle,
            |id| Subject::Fuelbed(id.into()),
            fuelbed_id,
            phase,
            fuel_category,
            fuel_sub_category,
            species,
            out_value,
            out_found,
        )
    }
}

/// Look up an emission factor by cover type id.
///
/// Same contract and return codes as `fccs2ef_get_fuelbed`.
///
/// # Safety
/// See `fccs2ef_get_fuelbed`.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn fccs2ef_get_cover_type(
    handle: *const Fccs2EfHandle,
    cover_type_id: *const c_char,
    phase: *const c_char,
    fuel_category: *const c_char,
    fuel_sub_category: *const c_char,
    species: *const c_char,
    out_value: *mut f64,
    out_found: *mut bool,
) -> Fccs2EfErrorCode {
    unsafe {
        lookup(
            handle,
            |id| Subject::CoverType(id.into()),
            cover_type_id,
            phase,
            fuel_category,
            fuel_sub_category,
            species,
            out_value,
            out_found,
        )
    }
}
