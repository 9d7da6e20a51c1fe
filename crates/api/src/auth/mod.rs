//! Authentication: session credentials, password hashing, the single-use
//! token service, and the request extractor.

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod tokens;
