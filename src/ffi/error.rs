// Copyright 2024-2026 ML Service Contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-thread last-error storage and argument helpers for the C ABI.

use std::cell::RefCell;
use std::ffi::{c_char, CStr, CString};
use std::ptr;

use crate::error::{ErrorCode, ServiceError};

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

pub(crate) fn set_last_error(msg: impl Into<String>) {
    let msg = msg.into().replace('\0', " ");
    LAST_ERROR.with(|slot| {
        *slot.borrow_mut() = CString::new(msg).ok();
    });
}

/// Record `err` as this thread's last error and return its status code.
pub(crate) fn fail(err: ServiceError) -> i32 {
    set_last_error(err.to_string());
    err.code()
}

/// Collapse a service result into a status code.
pub(crate) fn status(result: Result<(), ServiceError>) -> i32 {
    match result {
        Ok(()) => {
            clear();
            ErrorCode::None.as_i32()
        }
        Err(e) => fail(e),
    }
}

/// Run one C entry point body and collapse its result into a status code.
pub(crate) fn ffi_call(body: impl FnOnce() -> Result<(), ServiceError>) -> i32 {
    status(body())
}

fn clear() {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = None);
}

/// Message of the last failed call on this thread, or null.
///
/// The pointer stays valid until the next `ml_service_*` call on the same
/// thread.
#[no_mangle]
pub extern "C" fn ml_service_last_error() -> *const c_char {
    LAST_ERROR.with(|slot| match slot.borrow().as_ref() {
        Some(msg) => msg.as_ptr(),
        None => ptr::null(),
    })
}

#[no_mangle]
pub extern "C" fn ml_service_clear_last_error() {
    clear();
}

/// Borrow a C string argument. Null maps to `""` so the service layer
/// reports the missing value.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that outlives `'a`.
pub(crate) unsafe fn arg_str<'a>(ptr: *const c_char, what: &str) -> Result<&'a str, ServiceError> {
    if ptr.is_null() {
        return Ok("");
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| ServiceError::invalid(format!("The parameter, '{}' is not valid UTF-8.", what)))
}

/// Like [`arg_str`] but keeps null distinct from an empty string.
///
/// # Safety
/// Same as [`arg_str`].
pub(crate) unsafe fn arg_opt_str<'a>(
    ptr: *const c_char,
    what: &str,
) -> Result<Option<&'a str>, ServiceError> {
    if ptr.is_null() {
        return Ok(None);
    }
    arg_str(ptr, what).map(Some)
}

/// Check an output pointer for a pointer result: it must be non-null and
/// point to a null slot. An occupied slot is left untouched.
///
/// # Safety
/// `out` must be null or valid for reads.
pub(crate) unsafe fn check_slot<T>(out: *mut *mut T, what: &'static str) -> Result<(), ServiceError> {
    if out.is_null() {
        return Err(ServiceError::invalid(format!(
            "The parameter, '{}' is NULL. It should be a valid pointer.",
            what
        )));
    }
    if !(*out).is_null() {
        return Err(ServiceError::OutputSlotOccupied(what));
    }
    Ok(())
}

/// Check an output pointer for a plain value result.
pub(crate) fn check_out<T>(out: *mut T, what: &str) -> Result<(), ServiceError> {
    if out.is_null() {
        return Err(ServiceError::invalid(format!(
            "The parameter, '{}' is NULL. It should be a valid pointer.",
            what
        )));
    }
    Ok(())
}

/// Hand an owned string to C. Free it with `ml_service_string_free`.
pub(crate) fn into_c_string(value: &str) -> Result<*mut c_char, ServiceError> {
    CString::new(value)
        .map(CString::into_raw)
        .map_err(|_| ServiceError::Decode("value contains an interior NUL byte".into()))
}

/// Free a string returned by this library.
///
/// # Safety
/// `s` must be null or a pointer returned by an `ml_service_*` function that
/// has not been freed yet.
#[no_mangle]
pub unsafe extern "C" fn ml_service_string_free(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}
