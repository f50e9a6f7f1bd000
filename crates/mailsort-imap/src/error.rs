//! Errors of the IMAP client.

use std::time::Duration;

use thiserror::Error;

/// Everything that can go wrong talking to an IMAP server.
#[derive(Debug, Error)]
pub enum Error {
    /// The socket failed.
    #[error("connection error: {0}")]
    Io(#[from] std::io::Error),

    /// The TLS layer failed.
    #[error("TLS error: {0}")]
    Tls(#[from] rustls::Error),

    /// The host name cannot be used for certificate checks.
    #[error("host is not a valid DNS name: {0}")]
    InvalidDnsName(#[from] rustls::pki_types::InvalidDnsNameError),

    /// A server response did not follow the grammar.
    #[error("malformed response at byte {position}: {message}")]
    Parse {
        /// Offset into the response.
        position: usize,
        /// What was expected.
        message: String,
    },

    /// The server refused the command (`NO`).
    #[error("server refused: {0}")]
    No(String),

    /// `NO [ALREADYEXISTS]` on CREATE.
    #[error("mailbox already exists: {0}")]
    AlreadyExists(String),

    /// The server rejected the command as malformed (`BAD`).
    #[error("server rejected command: {0}")]
    Bad(String),

    /// The server is closing the connection (`BYE`).
    #[error("server closed the session: {0}")]
    Bye(String),

    /// No answer within the configured limit.
    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// The client is in no state to run the command.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The server broke the protocol, e.g. by never completing a command.
    #[error("protocol violation: {0}")]
    Protocol(String),
}

impl Error {
    /// Returns true if the server reported that the target mailbox exists.
    ///
    /// Servers without RFC 5530 response codes only say so in the text of
    /// a `NO`, so that text is checked as well.
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        match self {
            Self::AlreadyExists(_) => true,
            Self::No(text) => {
                let lower = text.to_ascii_lowercase();
                lower.contains("already exists") || lower.contains("mailbox exists")
            }
            _ => false,
        }
    }
}

/// `Result` with this crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
