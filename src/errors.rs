use miette::Diagnostic;
use thiserror::Error;

use crate::access::AccessError;

#[derive(Debug, Error, Diagnostic)]
pub enum PageRoleError {
    #[error("I/O error: {0}")]
    #[diagnostic(code(pagerole::io))]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    #[diagnostic(code(pagerole::config))]
    Config(#[from] config::ConfigError),

    #[error("Database error: {0}")]
    #[diagnostic(code(pagerole::db))]
    Db(#[from] sea_orm::DbErr),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Access(#[from] AccessError),

    #[error("Not found: {0}")]
    #[diagnostic(code(pagerole::not_found))]
    NotFound(String),
}
