//! Page read access: the per-page entry store, the reconciler that keeps it
//! in line with a desired set of readable roles, and the authorizer that
//! answers read checks against it. Nothing in here performs I/O.

pub mod engine;
pub mod errors;
pub mod reconcile;
pub mod store;
pub mod types;

pub use engine::Authorizer;
pub use errors::AccessError;
pub use reconcile::{parse_role_ids, reconcile, ReconcilePlan};
pub use store::PageAccess;
pub use types::{AccessEntry, Action, Role, RoleId, User};
