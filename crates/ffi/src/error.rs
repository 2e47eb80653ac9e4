use carbon_stock_core::CarbonError;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for FFI error types.
///
/// - `code()` - Returns the error code to be passed across FFI boundary
/// - `msg()` - Returns the error message for diagnostic purposes
pub(crate) trait CarbonFfiError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> CarbonErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `CarbonFfiError` for the FFI error scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultCarbonError {
    code: CarbonErrorCode,
    msg: String,
}

impl DefaultCarbonError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"trees"`, `"out_aggregate"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: CarbonErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for a rejected tree measurement.
    ///
    /// The C surface only reaches measurement validation and `estimate`, whose
    /// sole failure is `CarbonError::InvalidMeasurement`.
    pub fn invalid_measurement(error: &CarbonError) -> Self {
        Self {
            code: CarbonErrorCode::InvalidMeasurement,
            msg: error.to_string(),
        }
    }
}

impl CarbonFfiError for DefaultCarbonError {
    fn code(&self) -> CarbonErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by carbon estimation functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarbonErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// A tree's DBH or wood density was zero, negative or non-finite.
    InvalidMeasurement = 2,
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// The CString is stored to prevent memory leaks when returning raw pointers via FFI.
    static LAST_ERROR: RefCell<(Option<CString>, CarbonErrorCode)> = const { RefCell::new((None, CarbonErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, CarbonErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, CarbonErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if the last call on this thread failed.
/// - `null` if the last call succeeded or the message cannot be converted to a C string.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```c
/// CarbonAggregate agg;
/// if (carbon_estimate(trees, n, area, &agg, NULL) != Ok) {
///     const char* error = carbon_get_last_error();
///     if (error) {
///         printf("Carbon estimate failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn carbon_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code (`Ok` if the last call succeeded).
#[no_mangle]
pub extern "C" fn carbon_get_last_error_code() -> CarbonErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
