//! Role checks for write operations.

use crate::{
    api::models::users::CurrentUser,
    errors::{Error, Result},
    types::{Operation, Resource},
};
use tracing::info;

/// Fleet data is readable by every authenticated user; changing it needs the `Manager` role.
pub fn require_manager(user: &CurrentUser, action: Operation, resource: Resource) -> Result<()> {
    if user.is_manager() {
        return Ok(());
    }

    info!(user = %user.username, %action, %resource, "Denied non-manager write");
    Err(Error::InsufficientPermissions { action, resource })
}
