//! Well-known role name constants carried in access tokens.

/// Map administrators: may review answers awaiting manual validation.
pub const ROLE_ADMIN: &str = "admin";

