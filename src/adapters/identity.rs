use crate::errors::{AppError, AppResult};
use crate::models::user::User;

pub trait IdentityProvider {
    fn current_user(&self) -> Option<User>;

    /// The caller, or `Unauthenticated`.
    fn require_user(&self) -> AppResult<User> {
        self.current_user().ok_or(AppError::Unauthenticated)
    }
}

/// Identity fixed at construction (CLI flag / env var, or tests).
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user: Option<User>,
}

impl StaticIdentity {
    pub fn signed_in(user: User) -> Self {
        Self { user: Some(user) }
    }

    pub fn anonymous() -> Self {
        Self { user: None }
    }

    /// Build from an optional id; blank ids count as signed out.
    pub fn from_parts(id: Option<&str>, email: Option<&str>) -> Self {
        let user = id.map(str::trim).filter(|s| !s.is_empty()).map(|id| {
            let u = User::new(id);
            match email {
                Some(e) => u.with_email(e),
                None => u,
            }
        });
        Self { user }
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<User> {
        self.user.clone()
    }
}
