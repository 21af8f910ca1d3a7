use thiserror::Error;

/// Failures a caller may want to tell apart. Everything else travels as
/// plain `anyhow` context.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("`{0}` must not be empty")]
    InvalidCredentials(&'static str),

    #[error("Graph API responded with HTTP {status} for {path}")]
    Status { status: u16, path: String },

    #[error("Group {group_id} has no mail address")]
    MissingMail { group_id: String },

    #[error("Group {group_id} has a mail address without `@`: {mail}")]
    MalformedMail { group_id: String, mail: String },
}
