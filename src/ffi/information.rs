// Copyright 2024-2026 ML Service Contributors
// SPDX-License-Identifier: Apache-2.0

//! Information and information-list accessors for the C ABI.

use std::ffi::c_char;

use super::error::{arg_str, check_out, check_slot, ffi_call, into_c_string};
use crate::error::ServiceError;
use crate::information::{Information, InformationList};

fn null_arg(what: &str) -> ServiceError {
    ServiceError::invalid(format!("The parameter, '{}' is NULL.", what))
}

/// Copy the value stored under `key` into `*out_value`. Free it with
/// `ml_service_string_free`.
///
/// # Safety
/// Pointers must be null or valid; strings NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn ml_service_information_get(
    info: *const Information,
    key: *const c_char,
    out_value: *mut *mut c_char,
) -> i32 {
    ffi_call(|| {
        check_slot(out_value, "value")?;
        let info = info.as_ref().ok_or_else(|| null_arg("info"))?;
        let value = info.require(arg_str(key, "key")?)?;
        *out_value = into_c_string(value)?;
        Ok(())
    })
}

/// Free an information record returned by a query.
///
/// # Safety
/// `info` must be null or a pointer from this library that has not been
/// freed and was not borrowed from a list.
#[no_mangle]
pub unsafe extern "C" fn ml_service_information_destroy(info: *mut Information) -> i32 {
    ffi_call(|| {
        if info.is_null() {
            return Err(null_arg("info"));
        }
        drop(Box::from_raw(info));
        Ok(())
    })
}

/// # Safety
/// Pointers must be null or valid.
#[no_mangle]
pub unsafe extern "C" fn ml_service_information_list_length(
    list: *const InformationList,
    out_length: *mut u32,
) -> i32 {
    ffi_call(|| {
        check_out(out_length, "length")?;
        let list = list.as_ref().ok_or_else(|| null_arg("list"))?;
        *out_length = u32::try_from(list.len())
            .map_err(|_| ServiceError::invalid("list is too long to report"))?;
        Ok(())
    })
}

/// Borrow the record at `index`. The pointer stays valid until the list is
/// destroyed and must not be passed to `ml_service_information_destroy`.
///
/// # Safety
/// Pointers must be null or valid.
#[no_mangle]
pub unsafe extern "C" fn ml_service_information_list_get(
    list: *const InformationList,
    index: u32,
    out_info: *mut *const Information,
) -> i32 {
    ffi_call(|| {
        check_slot(out_info as *mut *mut Information, "info")?;
        let list = list.as_ref().ok_or_else(|| null_arg("list"))?;
        let info = list.get(index as usize).ok_or_else(|| {
            ServiceError::invalid(format!(
                "The parameter, 'index' is out of range ({} >= {}).",
                index,
                list.len()
            ))
        })?;
        *out_info = info as *const Information;
        Ok(())
    })
}

/// Free a list and every record in it.
///
/// # Safety
/// `list` must be null or a pointer from this library that has not been
/// freed yet.
#[no_mangle]
pub unsafe extern "C" fn ml_service_information_list_destroy(list: *mut InformationList) -> i32 {
    ffi_call(|| {
        if list.is_null() {
            return Err(null_arg("list"));
        }
        drop(Box::from_raw(list));
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::{CStr, CString};
    use std::ptr;

    fn sample_list() -> *mut InformationList {
        let mut list = InformationList::new();
        for version in ["1", "2"] {
            let mut info = Information::new();
            info.set("version", version).unwrap();
            list.add(info).unwrap();
        }
        Box::into_raw(Box::new(list))
    }

    #[test]
    fn test_list_accessors() {
        let list = sample_list();
        let key = CString::new("version").unwrap();
        unsafe {
            let mut len = 0u32;
            assert_eq!(ml_service_information_list_length(list, &mut len), 0);
            assert_eq!(len, 2);

            let mut info: *const Information = ptr::null();
            assert_eq!(ml_service_information_list_get(list, 1, &mut info), 0);

            let mut value: *mut c_char = ptr::null_mut();
            assert_eq!(ml_service_information_get(info, key.as_ptr(), &mut value), 0);
            assert_eq!(CStr::from_ptr(value).to_str().unwrap(), "2");
            super::super::ml_service_string_free(value);

            let mut missing: *const Information = ptr::null();
            assert_eq!(ml_service_information_list_get(list, 2, &mut missing), -22);
            assert!(missing.is_null());

            assert_eq!(ml_service_information_list_destroy(list), 0);
        }
    }

    #[test]
    fn test_missing_key_reports_invalid_parameter() {
        let mut info = Information::new();
        info.set("name", "a").unwrap();
        let info = Box::into_raw(Box::new(info));
        let key = CString::new("path").unwrap();
        unsafe {
            let mut value: *mut c_char = ptr::null_mut();
            assert_eq!(ml_service_information_get(info, key.as_ptr(), &mut value), -22);
            assert!(value.is_null());
            assert_eq!(ml_service_information_destroy(info), 0);
            assert_eq!(ml_service_information_destroy(ptr::null_mut()), -22);
        }
    }
}
