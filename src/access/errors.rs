use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum AccessError {
    #[error("Unsupported action `{0}`")]
    #[diagnostic(
        code(pagerole::access::unsupported_action),
        help("Only the `read` action is supported on pages")
    )]
    UnsupportedAction(String),

    #[error("Malformed role identifier `{0}`")]
    #[diagnostic(
        code(pagerole::access::malformed_role_id),
        help("Role identifiers must be integers; blank entries are ignored")
    )]
    MalformedRoleIdentifier(String),

    #[error("Page {page_id} already has an access entry for role {role_id}")]
    #[diagnostic(code(pagerole::access::duplicate_entry))]
    DuplicateEntry { page_id: i32, role_id: i32 },

    #[error("Superuser role {role_id} cannot have an access entry on page {page_id}")]
    #[diagnostic(
        code(pagerole::access::superuser_entry),
        help("Superuser access is implicit and never stored")
    )]
    SuperuserEntry { page_id: i32, role_id: i32 },
}
