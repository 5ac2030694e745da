use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::constants::{ROLE_ADMIN, ROLE_CANDIDATE, ROLE_EMPLOYER};

/// The user a validated session token resolves to.
///
/// Attached to request extensions by the auth middleware. Session issuance
/// (login, OAuth, whatever the platform uses) is not this service's concern.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    /// Check if user has a specific role
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Admins see every file, run housekeeping, and read the CV archive
    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }

    #[allow(dead_code)]
    pub fn is_employer(&self) -> bool {
        self.has_role(ROLE_EMPLOYER)
    }

    #[allow(dead_code)]
    pub fn is_candidate(&self) -> bool {
        self.has_role(ROLE_CANDIDATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_checks() {
        let user = AuthenticatedUser {
            id: Uuid::new_v4(),
            email: "a@b.c".into(),
            roles: vec!["admin".into(), "employer".into()],
        };
        assert!(user.is_admin());
        assert!(user.is_employer());
        assert!(!user.is_candidate());
    }
}
