#[cfg(test)]
use crate::features::auth::model::AuthenticatedUser;

#[cfg(test)]
use crate::shared::constants::{ROLE_ADMIN, ROLE_CANDIDATE};

#[cfg(test)]
#[allow(dead_code)]
pub fn create_admin_user() -> AuthenticatedUser {
    AuthenticatedUser {
        id: uuid::Uuid::new_v4(),
        email: "admin@karira.test".to_string(),
        roles: vec![ROLE_ADMIN.to_string()],
    }
}

#[cfg(test)]
#[allow(dead_code)]
pub fn create_candidate_user() -> AuthenticatedUser {
    AuthenticatedUser {
        id: uuid::Uuid::new_v4(),
        email: "candidate@karira.test".to_string(),
        roles: vec![ROLE_CANDIDATE.to_string()],
    }
}
