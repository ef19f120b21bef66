// Copyright 2024-2026 ML Service Contributors
// SPDX-License-Identifier: Apache-2.0

//! Model and resource registry functions for the C ABI.

use std::ffi::c_char;

use super::error::{arg_opt_str, arg_str, check_out, check_slot, ffi_call};
use super::{client_ref, MlServiceClient};
use crate::information::{Information, InformationList};

/// Register a model file and write the assigned version to `*out_version`.
/// On failure `*out_version` is 0.
///
/// # Safety
/// Pointers must be null or valid; strings NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn ml_service_model_register(
    client: *const MlServiceClient,
    name: *const c_char,
    path: *const c_char,
    activate: bool,
    description: *const c_char,
    out_version: *mut u32,
) -> i32 {
    ffi_call(|| {
        check_out(out_version, "version")?;
        *out_version = 0;
        let service = client_ref(client)?;
        let version = service.model_register(
            arg_str(name, "name")?,
            arg_str(path, "path")?,
            activate,
            arg_opt_str(description, "description")?,
        )?;
        *out_version = version;
        Ok(())
    })
}

/// # Safety
/// Pointers must be null or valid; strings NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn ml_service_model_update_description(
    client: *const MlServiceClient,
    name: *const c_char,
    version: u32,
    description: *const c_char,
) -> i32 {
    ffi_call(|| {
        let service = client_ref(client)?;
        let description = arg_str(description, "description")?;
        service.model_update_description(arg_str(name, "name")?, version, description)
    })
}

/// # Safety
/// Pointers must be null or valid; strings NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn ml_service_model_activate(
    client: *const MlServiceClient,
    name: *const c_char,
    version: u32,
) -> i32 {
    ffi_call(|| client_ref(client)?.model_activate(arg_str(name, "name")?, version))
}

/// Query one model version. Free the result with
/// `ml_service_information_destroy`.
///
/// # Safety
/// Pointers must be null or valid; strings NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn ml_service_model_get(
    client: *const MlServiceClient,
    name: *const c_char,
    version: u32,
    out_info: *mut *mut Information,
) -> i32 {
    ffi_call(|| {
        check_slot(out_info, "info")?;
        let info = client_ref(client)?.model_get(arg_str(name, "name")?, version)?;
        *out_info = Box::into_raw(Box::new(info));
        Ok(())
    })
}

/// # Safety
/// Pointers must be null or valid; strings NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn ml_service_model_get_activated(
    client: *const MlServiceClient,
    name: *const c_char,
    out_info: *mut *mut Information,
) -> i32 {
    ffi_call(|| {
        check_slot(out_info, "info")?;
        let info = client_ref(client)?.model_get_activated(arg_str(name, "name")?)?;
        *out_info = Box::into_raw(Box::new(info));
        Ok(())
    })
}

/// Query every version of a model. Free the result with
/// `ml_service_information_list_destroy`.
///
/// # Safety
/// Pointers must be null or valid; strings NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn ml_service_model_get_all(
    client: *const MlServiceClient,
    name: *const c_char,
    out_list: *mut *mut InformationList,
) -> i32 {
    ffi_call(|| {
        check_slot(out_list, "info_list")?;
        let list = client_ref(client)?.model_get_all(arg_str(name, "name")?)?;
        *out_list = Box::into_raw(Box::new(list));
        Ok(())
    })
}

/// # Safety
/// Pointers must be null or valid; strings NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn ml_service_model_delete(
    client: *const MlServiceClient,
    name: *const c_char,
    version: u32,
) -> i32 {
    ffi_call(|| client_ref(client)?.model_delete(arg_str(name, "name")?, version))
}

/// # Safety
/// Pointers must be null or valid; strings NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn ml_service_resource_add(
    client: *const MlServiceClient,
    name: *const c_char,
    path: *const c_char,
    description: *const c_char,
) -> i32 {
    ffi_call(|| {
        let service = client_ref(client)?;
        let description = arg_opt_str(description, "description")?;
        service.resource_add(arg_str(name, "name")?, arg_str(path, "path")?, description)
    })
}

/// # Safety
/// Pointers must be null or valid; strings NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn ml_service_resource_delete(
    client: *const MlServiceClient,
    name: *const c_char,
) -> i32 {
    ffi_call(|| client_ref(client)?.resource_delete(arg_str(name, "name")?))
}

/// # Safety
/// Pointers must be null or valid; strings NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn ml_service_resource_get(
    client: *const MlServiceClient,
    name: *const c_char,
    out_list: *mut *mut InformationList,
) -> i32 {
    ffi_call(|| {
        check_slot(out_list, "info_list")?;
        let list = client_ref(client)?.resource_get(arg_str(name, "name")?)?;
        *out_list = Box::into_raw(Box::new(list));
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::InMemoryAgent;
    use crate::service::MlService;
    use std::ffi::CString;
    use std::ptr;
    use std::sync::Arc;

    #[test]
    fn test_register_and_query() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.bin");
        std::fs::write(&file, b"x").unwrap();

        let client = MlServiceClient::into_raw(MlService::new(Arc::new(InMemoryAgent::new())));
        let name = CString::new("a").unwrap();
        let path = CString::new(file.to_str().unwrap()).unwrap();

        unsafe {
            let mut version = 0u32;
            let code = ml_service_model_register(
                client,
                name.as_ptr(),
                path.as_ptr(),
                true,
                ptr::null(),
                &mut version,
            );
            assert_eq!(code, 0);
            assert_eq!(version, 1);

            let mut list: *mut InformationList = ptr::null_mut();
            assert_eq!(ml_service_model_get_all(client, name.as_ptr(), &mut list), 0);
            assert_eq!((*list).len(), 1);
            super::super::ml_service_information_list_destroy(list);

            assert_eq!(ml_service_model_activate(client, name.as_ptr(), 0), -22);
            assert_eq!(ml_service_model_delete(client, name.as_ptr(), 0), 0);

            super::super::ml_service_client_free(client);
        }
    }

    #[test]
    fn test_null_client_rejected() {
        let name = CString::new("a").unwrap();
        let code = unsafe { ml_service_resource_delete(ptr::null(), name.as_ptr()) };
        assert_eq!(code, -22);
    }
}
