//! # mailsort-imap
//!
//! The IMAP client behind `mailsort`. It covers the part of RFC 9051
//! (`IMAP4rev2`) and RFC 3501 (`IMAP4rev1`) a mailbox-filing job needs:
//! logging in, listing the folder tree, creating folders, fetching one
//! header per message and moving messages by UID.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailsort_imap::{Config, Security, Session};
//!
//! #[tokio::main]
//! async fn main() -> mailsort_imap::Result<()> {
//!     let config = Config::new("imap.example.com", Security::Implicit);
//!     let mut session = Session::connect(&config, "user@example.com", "password").await?;
//!
//!     for folder in session.list_folders().await? {
//!         println!("Folder: {}", folder.mailbox);
//!     }
//!
//!     let headers = session.fetch_header_field("INBOX", "Envelope-To").await?;
//!     println!("{} messages", headers.len());
//!
//!     session.logout().await
//! }
//! ```
//!
//! ## Connection States
//!
//! [`Client`] uses the type-state pattern so that only commands valid in the
//! current IMAP state can be issued:
//!
//! ```text
//! NotAuthenticated ── login() ──→ Authenticated ── select() ──→ Selected
//! ```
//!
//! [`Session`] wraps the typed client behind a `&mut self` API for callers
//! that drive a whole run through one value.
//!
//! ## Modules
//!
//! - [`command`]: IMAP command builders and types
//! - [`connection`]: TLS streams, framing, the typed client and [`Session`]
//! - [`parser`]: Sans-I/O response parser
//! - [`types`]: Core IMAP types (mailboxes, UIDs, flags, capabilities)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod command;
pub mod connection;
mod error;
pub mod parser;
pub mod types;

pub use command::{Command, FetchAttribute, TagGenerator};
pub use connection::{
    Authenticated, Client, Config, FramedStream, HeaderField, ImapStream, LoggedIn,
    NotAuthenticated, ResponseAccumulator, Security, SelectRefused, Selected, Session,
};
pub use error::{Error, Result};
pub use parser::{FetchItem, Response, ResponseParser, UntaggedResponse};
pub use types::{
    Capability, Flag, ListResponse, Mailbox, MailboxAttribute, MailboxStatus, ResponseCode, SeqNum,
    Status, Tag, Uid, UidSet,
};
