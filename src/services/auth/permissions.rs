/*
 * Responsibility
 * - 検証済み Claims が要求 permission を持つかの判定
 */
use super::error::AuthError;
use super::verify::Claims;

/// Check that verified claims grant `required`.
///
/// A token with no permissions list at all is a malformed shape (the provider
/// always includes the claim when RBAC is enabled) and is rejected as
/// `invalid_claims`, distinct from "has permissions, just not this one".
/// Matching is exact and case-sensitive.
pub fn check_permission(required: &str, claims: &Claims) -> Result<(), AuthError> {
    let permissions = claims
        .permissions
        .as_ref()
        .ok_or(AuthError::MissingPermissionsClaim)?;

    if !permissions.iter().any(|p| p == required) {
        return Err(AuthError::PermissionNotFound);
    }

    Ok(())
}
