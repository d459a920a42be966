//! Authentication context shared across request handlers

use serde::{Deserialize, Serialize};

/// Identity attached to a request after token verification.
///
/// Every protected handler receives this through the `RequireAuth`
/// extractor. The `org_id` is the tenancy boundary: all queries must be
/// scoped to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: i32,
    pub email: String,
    pub org_id: i32,
}
