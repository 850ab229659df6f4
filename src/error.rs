use std::io;
use thiserror::Error;

pub type SftpResult<I> = Result<I, SftpError>;

/// Status codes a server attaches to an `SSH_FXP_STATUS` reply
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum StatusCode {
    Eof,
    NoSuchFile,
    PermissionDenied,
    Failure,
    BadMessage,
    NoConnection,
    ConnectionLost,
    OpUnsupported,
}

#[derive(Debug, Error)]
pub enum SftpError {
    #[error("Connection error: {0}")]
    ConnectionError(String),
    #[error("The client is not connected")]
    NotConnected,
    #[error("Traversal aborted while listing `{path}`: {source}")]
    TraversalError {
        path: String,
        #[source]
        source: Box<SftpError>,
    },
    #[error("Path conflict: `{0}` exists and is not a directory")]
    PathConflictError(String),
    #[error("Transfer from `{from}` to `{to}` failed: {source}")]
    TransferError {
        from: String,
        to: String,
        #[source]
        source: Box<SftpError>,
    },
    #[error("Remote `{path}` replied {code}: {message}")]
    Status {
        path: String,
        code: StatusCode,
        message: String,
    },
    #[error(transparent)]
    IoError(#[from] io::Error),
}

impl SftpError {
    pub(crate) fn traversal(path: &str, source: SftpError) -> Self {
        SftpError::TraversalError {
            path: path.to_owned(),
            source: Box::new(source),
        }
    }

    pub(crate) fn transfer(from: &str, to: &str, source: SftpError) -> Self {
        SftpError::TransferError {
            from: from.to_owned(),
            to: to.to_owned(),
            source: Box::new(source),
        }
    }

    pub(crate) fn status<M: ToString>(path: &str, code: StatusCode, message: M) -> Self {
        SftpError::Status {
            path: path.to_owned(),
            code,
            message: message.to_string(),
        }
    }

    /// the remote status code, if this error is a server reply
    ///
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            SftpError::Status { code, .. } => Some(*code),
            SftpError::TraversalError { source, .. } | SftpError::TransferError { source, .. } => {
                source.status_code()
            }
            _ => None,
        }
    }
}

impl From<russh::Error> for SftpError {
    fn from(e: russh::Error) -> Self {
        SftpError::ConnectionError(e.to_string())
    }
}
