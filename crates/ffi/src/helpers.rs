use crate::error::{with_last_error_mut, CarbonErrorCode, CarbonFfiError};
use std::ffi::CString;

/// Set the thread-local error message and code.
/// Accepts any type implementing `CarbonFfiError` trait.
pub(crate) fn set_last_error(error: &impl CarbonFfiError) {
    tracing::debug!(code = ?error.code(), error = error.msg(), "FFI call failed");
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl CarbonFfiError) -> CarbonErrorCode {
    set_last_error(error);
    error.code()
}

/// Clear the thread-local error message and code.
/// Called on successful operations.
pub(crate) fn clear_last_error() -> CarbonErrorCode {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = CarbonErrorCode::Ok;
    });
    CarbonErrorCode::Ok
}
