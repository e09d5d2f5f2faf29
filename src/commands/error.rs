//! Command outcomes and error mapping.

use thiserror::Error;

use crate::domain::DomainError;
use crate::forms::FormError;
use crate::routes;

pub type CommandResult<T> = Result<T, CommandError>;

/// Successful POST outcome: send the client elsewhere
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub location: String,
}

impl Redirect {
    pub fn to(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Anonymous request; `location` is the login page with `?next=`
    #[error("Login required, redirecting to {location}")]
    LoginRequired { location: String },

    /// Absent or someone else's; never says which
    #[error("Not found")]
    NotFound,

    /// Rejected input, re-presented to the user; nothing was changed
    #[error("Invalid input: {0}")]
    Invalid(FormError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CommandError {
    /// HTTP status code for this outcome
    pub fn status(&self) -> u16 {
        match self {
            CommandError::LoginRequired { .. } => 302,
            CommandError::NotFound => 404,
            CommandError::Invalid(_) => 400,
            CommandError::Internal(_) => 500,
        }
    }

    /// Map a domain error, sending anonymous requests to `login_url`
    ///
    /// There is no `From<DomainError>`: the login page comes from config, so
    /// every handler maps through here with it.
    pub fn from_domain(err: DomainError, login_url: &str) -> Self {
        match err {
            DomainError::AuthenticationRequired { next } => CommandError::LoginRequired {
                location: routes::login_redirect(login_url, &next),
            },
            DomainError::NotFound(_) => CommandError::NotFound,
            DomainError::InvalidInput(message) => CommandError::Invalid(FormError {
                field: "form".to_string(),
                message,
                submitted: None,
            }),
            DomainError::Internal(message) => CommandError::Internal(message),
        }
    }
}

impl From<FormError> for CommandError {
    fn from(err: FormError) -> Self {
        CommandError::Invalid(err)
    }
}
