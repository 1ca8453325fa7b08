//! Access-token handling.
//!
//! Members authenticate with an HS256 bearer token issued by the account
//! service; this crate only validates it.

pub mod jwt;
