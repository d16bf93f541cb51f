pub mod builders;
pub mod db;

pub use builders::{PageBuilder, RoleBuilder, UserBuilder};
pub use db::TestDb;
