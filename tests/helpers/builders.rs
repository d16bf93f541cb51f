use pagerole::access::{Role, RoleId, User};
use pagerole::storage::{self, NewRole, Page};
use sea_orm::DatabaseConnection;

/// Builder for creating test roles
pub struct RoleBuilder {
    title: String,
    superuser: bool,
}

impl RoleBuilder {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            superuser: false,
        }
    }

    pub fn superuser(mut self) -> Self {
        self.superuser = true;
        self
    }

    pub async fn create(self, db: &DatabaseConnection) -> Role {
        storage::create_role(
            db,
            NewRole {
                title: self.title,
                superuser: self.superuser,
                anonymous: false,
            },
        )
        .await
        .expect("Failed to create test role")
    }
}

/// Builder for creating test pages
pub struct PageBuilder {
    title: String,
}

impl PageBuilder {
    pub fn new() -> Self {
        Self {
            title: "Getting started".to_string(),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub async fn create(self, db: &DatabaseConnection) -> Page {
        storage::create_page(db, &self.title)
            .await
            .expect("Failed to create test page")
    }
}

impl Default for PageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating test users
pub struct UserBuilder {
    username: String,
    roles: Vec<RoleId>,
}

impl UserBuilder {
    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            roles: Vec::new(),
        }
    }

    pub fn with_role(mut self, role: &Role) -> Self {
        self.roles.push(role.id);
        self
    }

    pub async fn create(self, db: &DatabaseConnection) -> User {
        let user = storage::create_user(db, &self.username)
            .await
            .expect("Failed to create test user");

        for role_id in self.roles {
            storage::assign_role(db, user.id, role_id)
                .await
                .expect("Failed to assign role");
        }

        storage::get_user(db, user.id)
            .await
            .expect("Failed to get user")
            .expect("User not found")
    }
}
