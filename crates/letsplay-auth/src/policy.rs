//! The authorization policy.
//!
//! Every protected operation asks one question: may this [`Principal`]
//! perform this [`Action`] on a resource owned by this user id? [`decide`]
//! answers it from a fixed rule table with no state and no I/O, so the same
//! inputs always produce the same [`Decision`].
//!
//! Rules, first match wins:
//!
//! | # | condition | decision |
//! |---|-----------|----------|
//! | 1 | read product (list or single) | allow |
//! | 2 | register / login | allow |
//! | 3 | caller anonymous | deny, unauthenticated |
//! | 4 | caller is ADMIN | allow |
//! | 5 | create product | allow |
//! | 6 | update/delete product the caller owns | allow |
//! | 7 | update/delete someone else's product | deny, forbidden |
//! | 8 | read/update the caller's own user record | allow |
//! | 9 | list users, delete user, assign role | deny, forbidden |
//! | 10 | anything else | deny, forbidden |

use uuid::Uuid;

use letsplay_core::AppError;

use crate::claims::Identity;
use crate::roles::Role;

/// Who is making the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Principal {
    /// No bearer token was presented.
    #[default]
    Anonymous,
    Authenticated(Identity),
}

impl Principal {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Principal::Anonymous => None,
            Principal::Authenticated(identity) => Some(identity),
        }
    }

    pub fn subject_id(&self) -> Option<Uuid> {
        self.identity().map(|identity| identity.subject_id)
    }

    pub fn role(&self) -> Option<Role> {
        self.identity().map(|identity| identity.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }

    /// The caller's identity, or 401 for anonymous callers. Use after
    /// [`authorize`] has already allowed an authenticated-only action.
    pub fn require_identity(&self) -> Result<&Identity, AppError> {
        self.identity()
            .ok_or_else(|| AppError::unauthenticated("Authentication is required"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ListProducts,
    ReadProduct,
    CreateProduct,
    UpdateProduct,
    DeleteProduct,
    Register,
    Login,
    ListUsers,
    ReadUser,
    UpdateUser,
    AssignRole,
    DeleteUser,
}

impl Action {
    pub const ALL: [Action; 12] = [
        Action::ListProducts,
        Action::ReadProduct,
        Action::CreateProduct,
        Action::UpdateProduct,
        Action::DeleteProduct,
        Action::Register,
        Action::Login,
        Action::ListUsers,
        Action::ReadUser,
        Action::UpdateUser,
        Action::AssignRole,
        Action::DeleteUser,
    ];

    fn forbidden_message(self) -> &'static str {
        match self {
            Action::UpdateProduct | Action::DeleteProduct => {
                "You can only modify products you own"
            }
            Action::ReadUser | Action::UpdateUser => "You can only access your own account",
            Action::AssignRole => "Only administrators can change roles",
            _ => "Administrator privileges required",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    Unauthenticated,
    Forbidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Evaluates the rule table. `resource_owner` is the owning user id for
/// product actions and the target user id for user actions.
pub fn decide(principal: &Principal, action: Action, resource_owner: Option<Uuid>) -> Decision {
    use Action::*;

    let owns = |identity: &Identity| resource_owner == Some(identity.subject_id);

    match (action, principal) {
        (ListProducts | ReadProduct, _) => Decision::Allow,
        (Register | Login, _) => Decision::Allow,
        (_, Principal::Anonymous) => Decision::Deny(DenyReason::Unauthenticated),
        (_, Principal::Authenticated(identity)) if identity.role == Role::Admin => Decision::Allow,
        (CreateProduct, _) => Decision::Allow,
        (UpdateProduct | DeleteProduct, Principal::Authenticated(identity)) if owns(identity) => {
            Decision::Allow
        }
        (UpdateProduct | DeleteProduct, _) => Decision::Deny(DenyReason::Forbidden),
        (ReadUser | UpdateUser, Principal::Authenticated(identity)) if owns(identity) => {
            Decision::Allow
        }
        (ListUsers | DeleteUser | AssignRole, _) => Decision::Deny(DenyReason::Forbidden),
        _ => Decision::Deny(DenyReason::Forbidden),
    }
}

/// [`decide`], with denials turned into the matching 401/403 [`AppError`].
pub fn authorize(
    principal: &Principal,
    action: Action,
    resource_owner: Option<Uuid>,
) -> Result<(), AppError> {
    match decide(principal, action, resource_owner) {
        Decision::Allow => Ok(()),
        Decision::Deny(DenyReason::Unauthenticated) => {
            Err(AppError::unauthenticated("Authentication is required"))
        }
        Decision::Deny(DenyReason::Forbidden) => {
            Err(AppError::forbidden(action.forbidden_message()))
        }
    }
}
