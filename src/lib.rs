//! pagerole - per-page, role-based read access control
//!
//! The `access` module holds the pure reconciliation and authorization
//! logic; `storage` and `service` wire it to a SeaORM database.

pub mod access;
pub mod entities;
pub mod errors;
pub mod service;
pub mod settings;
pub mod storage;
