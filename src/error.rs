use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookshelfError {
    #[error("Missing credentials. Please log in or register.")]
    MissingCredentials,
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("{0}")]
    Validation(String),
    #[error("Malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
    #[error("Credential storage failure: {0}")]
    Storage(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BookshelfError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        BookshelfError::Validation(message.into())
    }
}

pub type Result<T> = anyhow::Result<T, BookshelfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_displays_server_message() {
        let err = BookshelfError::Api {
            status: 404,
            message: "not found".to_string(),
        };
        assert_eq!(err.to_string(), "not found");
    }

    #[test]
    fn validation_error_displays_reason() {
        let err = BookshelfError::validation("Please enter an ISBN.");
        assert_eq!(err.to_string(), "Please enter an ISBN.");
    }
}
