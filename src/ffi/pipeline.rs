// Copyright 2024-2026 ML Service Contributors
// SPDX-License-Identifier: Apache-2.0

//! Pipeline functions for the C ABI.

use std::ffi::c_char;

use super::error::{arg_str, check_out, check_slot, fail, ffi_call, into_c_string, status};
use super::{client_ref, MlServiceClient};
use crate::error::ServiceError;
use crate::service::{PipelineState, ServiceHandle};

/// Store a pipeline description under `name`.
///
/// # Safety
/// Pointers must be null or valid; strings NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn ml_service_pipeline_set(
    client: *const MlServiceClient,
    name: *const c_char,
    pipeline_desc: *const c_char,
) -> i32 {
    ffi_call(|| {
        let service = client_ref(client)?;
        let desc = arg_str(pipeline_desc, "pipeline_desc")?;
        service.pipeline_set_description(arg_str(name, "name")?, desc)
    })
}

/// Fetch the description stored under `name` into `*out_desc`.
///
/// # Safety
/// Pointers must be null or valid; strings NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn ml_service_pipeline_get(
    client: *const MlServiceClient,
    name: *const c_char,
    out_desc: *mut *mut c_char,
) -> i32 {
    ffi_call(|| {
        check_slot(out_desc, "pipeline_desc")?;
        let service = client_ref(client)?;
        let desc = service.pipeline_get_description(arg_str(name, "name")?)?;
        *out_desc = into_c_string(&desc)?;
        Ok(())
    })
}

/// # Safety
/// Pointers must be null or valid; strings NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn ml_service_pipeline_delete(
    client: *const MlServiceClient,
    name: *const c_char,
) -> i32 {
    ffi_call(|| client_ref(client)?.pipeline_delete(arg_str(name, "name")?))
}

/// Launch the pipeline named `name` and write the bound handle to
/// `*out_handle`. Release it with [`ml_service_pipeline_destroy`].
///
/// # Safety
/// Pointers must be null or valid; strings NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn ml_service_pipeline_launch(
    client: *const MlServiceClient,
    name: *const c_char,
    out_handle: *mut *mut ServiceHandle,
) -> i32 {
    ffi_call(|| {
        check_slot(out_handle, "handle")?;
        let handle = client_ref(client)?.pipeline_launch(arg_str(name, "name")?)?;
        *out_handle = Box::into_raw(Box::new(handle));
        Ok(())
    })
}

/// Write the current pipeline state to `*out_state`. `UNKNOWN` is written
/// before any other check, so it is the value seen on failure.
///
/// # Safety
/// Pointers must be null or valid.
#[no_mangle]
pub unsafe extern "C" fn ml_service_pipeline_get_state(
    client: *const MlServiceClient,
    handle: *const ServiceHandle,
    out_state: *mut i32,
) -> i32 {
    if !out_state.is_null() {
        *out_state = PipelineState::Unknown as i32;
    }
    ffi_call(|| {
        check_out(out_state, "state")?;
        let service = client_ref(client)?;
        let handle = handle.as_ref().ok_or_else(|| {
            ServiceError::invalid("The parameter, 'handle' is NULL. It should be a valid handle.")
        })?;
        *out_state = service.pipeline_get_state(handle)? as i32;
        Ok(())
    })
}

/// Destroy a launched pipeline and free its handle. The handle is freed even
/// when the agent reports a failure.
///
/// # Safety
/// `handle` must be null or a pointer from [`ml_service_pipeline_launch`]
/// that has not been destroyed yet.
#[no_mangle]
pub unsafe extern "C" fn ml_service_pipeline_destroy(handle: *mut ServiceHandle) -> i32 {
    if handle.is_null() {
        return fail(ServiceError::invalid(
            "The parameter, 'handle' is NULL. It should be a valid handle.",
        ));
    }
    let mut handle = Box::from_raw(handle);
    status(handle.destroy())
}
