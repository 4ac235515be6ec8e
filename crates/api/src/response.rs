//! Response envelope types.
//!
//! Every JSON endpoint wraps its payload as `{ "data": ... }`; errors use
//! the `{ "error", "code" }` shape produced by
//! [`AppError`](crate::error::AppError). [`DataResponse`] keeps the success
//! side typed instead of scattering `serde_json::json!` envelopes through
//! handlers.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
