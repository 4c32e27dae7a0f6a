use fccs2ef_core::{ConfigError, LookupError};
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for FFI error types.
///
/// - `code()` - Returns the error code to be passed across FFI boundary
/// - `msg()` - Returns the error message for diagnostic purposes
pub(crate) trait Fccs2EfError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> Fccs2EfErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `Fccs2EfError` for the FFI error scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultFccs2EfError {
    code: Fccs2EfErrorCode,
    msg: String,
}

impl DefaultFccs2EfError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_handle"`, `"species"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: Fccs2EfErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for a C string that is not valid UTF-8.
    pub fn invalid_string(param_name: &str) -> Self {
        Self {
            code: Fccs2EfErrorCode::InvalidString,
            msg: format!("Parameter '{param_name}' is not valid UTF-8"),
        }
    }
}

impl From<ConfigError> for DefaultFccs2EfError {
    fn from(error: ConfigError) -> Self {
        Self {
            code: Fccs2EfErrorCode::LoadFailed,
            msg: error.to_string(),
        }
    }
}

impl From<LookupError> for DefaultFccs2EfError {
    fn from(error: LookupError) -> Self {
        let code = match error {
            LookupError::MissingLookupKey(_) => Fccs2EfErrorCode::MissingLookupKey,
            LookupError::InvalidFuelbedId(_)
            | LookupError::InvalidCoverTypeId(_)
            | LookupError::InvalidEfGroup { .. } => Fccs2EfErrorCode::InvalidIdentifier,
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

impl Fccs2EfError for DefaultFccs2EfError {
    fn code(&self) -> Fccs2EfErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by lookup functions.
/// Follows standard C convention: 0 = success, non-zero = error.
///
/// A lookup that finds no emission factor is not an error; it returns `Ok`
/// with `out_found` set to false.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fccs2EfErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// A string argument is not valid UTF-8.
    InvalidString = 2,

    /// Config or reference tables could not be loaded.
    LoadFailed = 3,

    /// Phase, fuel category, fuel sub-category or species was empty.
    MissingLookupKey = 4,

    /// Identifier does not translate to a usable cover type.
    InvalidIdentifier = 5,
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// The CString is stored to prevent memory leaks when returning raw pointers via FFI.
    static LAST_ERROR: RefCell<(Option<CString>, Fccs2EfErrorCode)> =
        const { RefCell::new((None, Fccs2EfErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, Fccs2EfErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, Fccs2EfErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if an error occurred.
/// - `null` if no error has occurred or the error message cannot be converted to C string.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread that
/// sets or clears the error.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```c
/// Fccs2EfHandle* lookup = NULL;
/// if (fccs2ef_new("fccs2ef.json", &lookup) != Ok) {
///     const char* error = fccs2ef_get_last_error();
///     if (error) {
///         printf("Lookup creation failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn fccs2ef_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code.
///
/// Returns `Fccs2EfErrorCode::Ok` (0) if the last call on this thread succeeded.
#[no_mangle]
pub extern "C" fn fccs2ef_get_last_error_code() -> Fccs2EfErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
