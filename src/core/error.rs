//! Core error types.

use std::fmt;

/// Boxed error used by request bodies.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Core errors for request handling and serving.
#[derive(Debug)]
pub enum Error {
    /// Reading the request body failed.
    Body(BoxError),

    /// Socket I/O error.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Body(e) => write!(f, "body error: {}", e),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Body(e) => Some(e.as_ref()),
            Error::Io(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Body("length limit exceeded".into());
        assert_eq!(err.to_string(), "body error: length limit exceeded");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use");
        let err: Error = io_err.into();

        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.to_string(), "I/O error: address in use");
    }
}
