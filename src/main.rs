use clap::Parser;
use miette::{IntoDiagnostic, Result};
use pagerole::{settings, storage};
use sea_orm_migration::MigratorTrait;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "pagerole",
    version,
    about = "Prepare the page access database: run migrations and seed built-in roles"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // logging
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    // load settings
    let settings = settings::Settings::load(&cli.config)?;
    tracing::info!(?settings, "Loaded configuration");

    // init storage (database)
    let db = storage::init(&settings.database).await?;
    migration::Migrator::up(&db, None).await.into_diagnostic()?;

    let builtin = storage::ensure_builtin_roles(&db, &settings.roles).await?;
    let roles = storage::list_roles(&db).await?;
    tracing::info!(
        anonymous = %builtin.anonymous.title,
        superusers = builtin.superusers.len(),
        roles = roles.len(),
        "Page access database ready"
    );
    Ok(())
}
