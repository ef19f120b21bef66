// Copyright 2024-2026 ML Service Contributors
// SPDX-License-Identifier: Apache-2.0

//! C ABI over [`MlService`].
//!
//! Every function returns a status code (`0` on success, a negative errno
//! value otherwise) and records a message retrievable with
//! [`ml_service_last_error`]. Pointer results are written through an output
//! slot that must point to `NULL`; an occupied slot is rejected and left
//! unchanged.

mod error;
mod information;
mod pipeline;
mod registry;

pub use error::{ml_service_clear_last_error, ml_service_last_error, ml_service_string_free};
pub use information::{
    ml_service_information_destroy, ml_service_information_get,
    ml_service_information_list_destroy, ml_service_information_list_get,
    ml_service_information_list_length,
};
pub use pipeline::{
    ml_service_pipeline_delete, ml_service_pipeline_destroy, ml_service_pipeline_get,
    ml_service_pipeline_get_state, ml_service_pipeline_launch, ml_service_pipeline_set,
};
pub use registry::{
    ml_service_model_activate, ml_service_model_delete, ml_service_model_get,
    ml_service_model_get_activated, ml_service_model_get_all, ml_service_model_register,
    ml_service_model_update_description, ml_service_resource_add, ml_service_resource_delete,
    ml_service_resource_get,
};

use crate::config;
use crate::error::ServiceError;
use crate::service::MlService;
use error::{check_slot, fail};

/// Opaque client owning a configured service.
pub struct MlServiceClient {
    service: MlService,
}

impl MlServiceClient {
    /// Box `service` for handing to C. Release with [`ml_service_client_free`].
    pub fn into_raw(service: MlService) -> *mut MlServiceClient {
        Box::into_raw(Box::new(MlServiceClient { service }))
    }

    pub fn service(&self) -> &MlService {
        &self.service
    }
}

/// Borrow the client behind `client`.
///
/// # Safety
/// `client` must be null or a live pointer from this library.
unsafe fn client_ref<'a>(client: *const MlServiceClient) -> Result<&'a MlService, ServiceError> {
    client.as_ref().map(MlServiceClient::service).ok_or_else(|| {
        ServiceError::invalid("The parameter, 'client' is NULL. It should be a valid client.")
    })
}

/// Create a client from environment configuration.
///
/// # Safety
/// `out_client` must be null or valid for reads and writes.
#[no_mangle]
pub unsafe extern "C" fn ml_service_client_new(out_client: *mut *mut MlServiceClient) -> i32 {
    if let Err(e) = check_slot(out_client, "client") {
        return fail(e);
    }
    match MlService::from_config(&config::load()) {
        Ok(service) => {
            *out_client = MlServiceClient::into_raw(service);
            0
        }
        Err(e) => fail(e),
    }
}

/// Free a client. Null is ignored.
///
/// # Safety
/// `client` must be null or a pointer from [`ml_service_client_new`] that has
/// not been freed yet. Handles created through it stay usable.
#[no_mangle]
pub unsafe extern "C" fn ml_service_client_free(client: *mut MlServiceClient) {
    if !client.is_null() {
        drop(Box::from_raw(client));
    }
}
