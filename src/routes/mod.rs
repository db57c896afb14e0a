//! Router Module Index
//!
//! Splits the API by resource and by access level. Authorization is applied as a
//! route layer on whole routers, never inside handlers.

/// `/api/v1/user/*`: signup and signin, open to anyone.
pub mod user;

/// `/api/v1/blog/*`: public reads and token-protected writes.
pub mod blog;
