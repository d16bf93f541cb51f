pub mod page;
pub mod page_role;
pub mod role;
pub mod user;
pub mod user_role;

pub use page::Entity as Page;
pub use page_role::Entity as PageRole;
pub use role::Entity as Role;
pub use user::Entity as User;
pub use user_role::Entity as UserRole;
