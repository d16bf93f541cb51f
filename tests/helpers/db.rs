use pagerole::access::Role;
use pagerole::service::PageAccessService;
use pagerole::settings::Roles;
use pagerole::storage;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tempfile::NamedTempFile;

/// Test database with automatic cleanup
pub struct TestDb {
    connection: DatabaseConnection,
    _temp_file: NamedTempFile,
}

impl TestDb {
    /// Create a new test database with migrations applied
    pub async fn new() -> Self {
        // Create temporary SQLite database file
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let db_path = temp_file.path().to_str().expect("Invalid temp file path");
        let db_url = format!("sqlite://{}?mode=rwc", db_path);

        // Connect to database
        let connection = Database::connect(&db_url)
            .await
            .expect("Failed to connect to test database");

        // Run migrations
        migration::Migrator::up(&connection, None)
            .await
            .expect("Failed to run migrations");

        Self {
            connection,
            _temp_file: temp_file,
        }
    }

    /// Get database connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }
}

/// Seed the default anonymous and superuser roles
pub async fn seed_builtin_roles(db: &DatabaseConnection) -> (Role, Role) {
    let builtin = storage::ensure_builtin_roles(db, &Roles::default())
        .await
        .expect("Failed to seed built-in roles");
    let superuser = builtin
        .superusers
        .into_iter()
        .next()
        .expect("No superuser role seeded");
    (builtin.anonymous, superuser)
}

/// Seed the built-in roles and build a service on top of them
pub async fn seed_service(db: &DatabaseConnection) -> PageAccessService {
    seed_builtin_roles(db).await;
    PageAccessService::connect(db.clone())
        .await
        .expect("Failed to build service")
}
