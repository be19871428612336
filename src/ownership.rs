//! The single ownership rule shared by the project and task stores.
//!
//! A record is accessible only to the owner of its project: a project's owner
//! directly, a task's owner through its parent project. How a denial is
//! reported depends on where the check happens, and callers say so
//! explicitly with a [`Boundary`]:
//!
//! * [`Boundary::Lookup`] - the caller is still locating the record (reading
//!   a project, or resolving the parent project before creating or listing
//!   tasks). Denial is reported as `NotFound`, identical to absence, so a
//!   non-owner learns nothing about other users' records.
//! * [`Boundary::Mutation`] - the record was already resolved by id and the
//!   caller is about to change it (task update/delete). Denial is reported
//!   as `Forbidden`.

use uuid::Uuid;

use crate::error::AppError;

/// Where an ownership check is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Lookup,
    Mutation,
}

/// Pure rule: may `actor` act on a record whose effective owner is `owner`?
///
/// `owner` is `None` when the owner could not be resolved (for instance a
/// task whose parent project no longer exists); nobody owns such a record.
pub fn is_owner(actor: Uuid, owner: Option<Uuid>) -> bool {
    owner == Some(actor)
}

/// Applies [`is_owner`] and turns a denial into the error kind for
/// `boundary`. `not_found` is the message used for `Lookup` denials so it
/// matches the caller's message for genuine absence.
pub fn ensure_owner(
    actor: Uuid,
    owner: Option<Uuid>,
    boundary: Boundary,
    not_found: &str,
) -> Result<(), AppError> {
    if is_owner(actor, owner) {
        return Ok(());
    }
    Err(match boundary {
        Boundary::Lookup => AppError::NotFound(not_found.to_string()),
        Boundary::Mutation => AppError::Forbidden("Not authorized".to_string()),
    })
}
