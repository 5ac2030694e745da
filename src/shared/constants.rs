/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Admin role - full access to the dashboard, every file, and housekeeping
pub const ROLE_ADMIN: &str = "admin";

/// Employer role - posts jobs, uploads job images and company logos
#[allow(dead_code)]
pub const ROLE_EMPLOYER: &str = "employer";

/// Candidate role - browses jobs, uploads CVs and profile images
#[allow(dead_code)]
pub const ROLE_CANDIDATE: &str = "candidate";
