use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// Stable machine-readable names for the error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCode {
    NotFound,
    AccessDenied,
    InvalidArgument,
    Unauthenticated,
    Conflict,
    Unavailable,
    Storage,
}

impl ErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::AccessDenied => "access_denied",
            Self::InvalidArgument => "invalid_argument",
            Self::Unauthenticated => "unauthenticated",
            Self::Conflict => "conflict",
            Self::Unavailable => "unavailable",
            Self::Storage => "storage",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain error shared by the model, store, and service layers.
///
/// Validation and authorization failures must be raised before any mutation
/// runs; `Storage` is reserved for unexpected datastore failures and is
/// never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    NotFound {
        kind: &'static str,
        id: String,
    },
    AccessDenied {
        message: String,
    },
    InvalidArgument {
        message: String,
    },
    Unauthenticated {
        message: String,
    },
    Conflict {
        message: String,
    },
    Unavailable {
        message: String,
    },
    Storage {
        message: String,
    },
}

impl Error {
    #[must_use]
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    #[must_use]
    pub fn access_denied(message: impl Into<String>) -> Self {
        Self::AccessDenied {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::AccessDenied { .. } => ErrorCode::AccessDenied,
            Self::InvalidArgument { .. } => ErrorCode::InvalidArgument,
            Self::Unauthenticated { .. } => ErrorCode::Unauthenticated,
            Self::Conflict { .. } => ErrorCode::Conflict,
            Self::Unavailable { .. } => ErrorCode::Unavailable,
            Self::Storage { .. } => ErrorCode::Storage,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::AccessDenied { message }
            | Self::InvalidArgument { message }
            | Self::Unauthenticated { message }
            | Self::Conflict { message }
            | Self::Unavailable { message }
            | Self::Storage { message } => f.write_str(message),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable_strings() {
        assert_eq!(ErrorCode::NotFound.as_str(), "not_found");
        assert_eq!(ErrorCode::AccessDenied.as_str(), "access_denied");
        assert_eq!(
            Error::invalid_argument("title cannot be empty").code(),
            ErrorCode::InvalidArgument
        );
    }

    #[test]
    fn not_found_display_names_the_entity() {
        let err = Error::not_found("workspace", "w-1");
        assert_eq!(err.to_string(), "workspace not found: w-1");
    }
}
