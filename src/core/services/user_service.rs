// src/core/services/user_service.rs
use crate::{
    api::{validate_request, CreateUserRequest, UpdateUserPreferencesRequest, UpdateUserRequest},
    error::CapsuleError,
    models::common::{AccountStatus, Timestamp, UserRole},
    models::user::User,
    storage::{self, collections, DocumentStore},
};
use serde_json::{json, Map};
use tracing::{info, warn};

/// Creates the user document for a freshly authenticated identity.
///
/// # Arguments
/// * `uid` - Identity id assigned by the authentication provider.
/// * `req` - Validated profile data.
///
/// # Returns
/// * The stored `User`, or `AlreadyExists` if the id is taken.
pub fn create_user(
    store: &dyn DocumentStore,
    uid: &str,
    req: &CreateUserRequest,
    now: Timestamp,
) -> Result<User, CapsuleError> {
    validate_request(req)?;

    if store.get(collections::USERS, uid)?.is_some() {
        return Err(CapsuleError::AlreadyExists(uid.to_string()));
    }

    let user = User {
        id: uid.to_string(),
        email: req.email.clone(),
        display_name: req.display_name.clone(),
        last_active: now,
        profile_picture: req.profile_picture.clone(),
        preferences: req.preferences.clone().unwrap_or_default(),
        is_email_verified: false,
        account_status: AccountStatus::Active,
        role: UserRole::User,
        permissions: Vec::new(),
        created_at: now,
        updated_at: Some(now),
    };

    storage::put_typed(store, collections::USERS, uid, &user)?;
    info!(user = uid, "user created");
    Ok(user)
}

pub fn get_user(store: &dyn DocumentStore, uid: &str) -> Result<Option<User>, CapsuleError> {
    storage::get_typed(store, collections::USERS, uid)
}

fn require_user(store: &dyn DocumentStore, uid: &str) -> Result<User, CapsuleError> {
    get_user(store, uid)?.ok_or_else(|| CapsuleError::UserNotFound(uid.to_string()))
}

/// Applies a partial profile update.
pub fn update_user(
    store: &dyn DocumentStore,
    req: &UpdateUserRequest,
    now: Timestamp,
) -> Result<User, CapsuleError> {
    validate_request(req)?;
    let mut user = require_user(store, &req.id)?;

    if let Some(display_name) = &req.display_name {
        user.display_name = display_name.clone();
    }
    if let Some(profile_picture) = &req.profile_picture {
        user.profile_picture = Some(profile_picture.clone());
    }
    if let Some(preferences) = &req.preferences {
        user.preferences = preferences.clone();
    }
    if let Some(account_status) = req.account_status {
        user.account_status = account_status;
    }
    user.updated_at = Some(now);

    storage::put_typed(store, collections::USERS, &req.id, &user)?;
    Ok(user)
}

/// Replaces the user's preference block.
pub fn update_user_preferences(
    store: &dyn DocumentStore,
    req: &UpdateUserPreferencesRequest,
    now: Timestamp,
) -> Result<User, CapsuleError> {
    validate_request(req)?;
    let mut user = require_user(store, &req.id)?;
    user.preferences = req.preferences.clone();
    user.updated_at = Some(now);
    storage::put_typed(store, collections::USERS, &req.id, &user)?;
    Ok(user)
}

/// Touches the last-active timestamp. Non-critical: a failure is logged and
/// swallowed so a flaky write never fails the surrounding operation.
pub fn update_last_active(store: &dyn DocumentStore, uid: &str, now: Timestamp) {
    let mut patch = Map::new();
    patch.insert("lastActive".to_string(), json!(now));
    patch.insert("updatedAt".to_string(), json!(now));
    if let Err(err) = store.update(collections::USERS, uid, patch) {
        warn!(user = uid, %err, "failed to update last active");
    }
}

pub fn update_user_role(
    store: &dyn DocumentStore,
    uid: &str,
    role: UserRole,
    permissions: Vec<String>,
    now: Timestamp,
) -> Result<User, CapsuleError> {
    let mut user = require_user(store, uid)?;
    user.role = role;
    user.permissions = permissions;
    user.updated_at = Some(now);
    storage::put_typed(store, collections::USERS, uid, &user)?;
    info!(user = uid, ?role, "user role updated");
    Ok(user)
}

/// Whether the user holds an admin role. Missing users are simply not admins.
pub fn is_admin(store: &dyn DocumentStore, uid: &str) -> bool {
    matches!(get_user(store, uid), Ok(Some(user)) if user.is_admin())
}

pub fn get_permissions(store: &dyn DocumentStore, uid: &str) -> Vec<String> {
    match get_user(store, uid) {
        Ok(Some(user)) => user.permissions,
        _ => Vec::new(),
    }
}
