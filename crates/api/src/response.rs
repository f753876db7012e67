//! Shared response envelope types for API handlers.
//!
//! Dashboard endpoints use a `{ "data": ... }` envelope. The webhook entry
//! points keep their own `{ "success": ... }` bodies.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
