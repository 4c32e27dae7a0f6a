use crate::error::{with_last_error_mut, DefaultFccs2EfError, Fccs2EfError, Fccs2EfErrorCode};
use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Set the thread-local error message and code.
/// Accepts any type implementing `Fccs2EfError` trait.
pub(crate) fn set_last_error(error: &impl Fccs2EfError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl Fccs2EfError) -> Fccs2EfErrorCode {
    set_last_error(error);
    error.code()
}

/// Clear the thread-local error message and code.
/// Called on successful operations.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = Fccs2EfErrorCode::Ok;
    });
}

/// Record the error of a failed result, or clear the last error on success.
pub(crate) fn track_result<T, E>(result: Result<T, E>) -> Result<T, Fccs2EfErrorCode>
where
    E: Into<DefaultFccs2EfError>,
{
    match result {
        Ok(value) => {
            clear_last_error();
            Ok(value)
        }
        Err(error) => Err(track_error(&error.into())),
    }
}

/// Borrow a C string argument as `&str`.
///
/// # Safety
/// `ptr` must be null or point to a valid null-terminated string that
/// outlives the returned borrow.
pub(crate) unsafe fn str_arg<'a>(
    ptr: *const c_char,
    param_name: &str,
) -> Result<&'a str, DefaultFccs2EfError> {
    if ptr.is_null() {
        return Err(DefaultFccs2EfError::null_pointer(param_name));
    }
    // SAFETY: non-null checked above; validity is the caller's contract.
    let cstr = unsafe { CStr::from_ptr(ptr) };
    cstr.to_str()
        .map_err(|_| DefaultFccs2EfError::invalid_string(param_name))
}
