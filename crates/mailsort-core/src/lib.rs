//! # mailsort-core
//!
//! Files every inbox message into a per-recipient folder under
//! `<root>.<container>` (by default `INBOX.Received.<name>`), where the
//! name is the local part of the message's delivery address.
//!
//! One run is one login, one scan and one logout:
//!
//! 1. [`FolderCatalog::initialize`] reads the folder tree and fails fast if
//!    the root or container folder is missing.
//! 2. The inbox is listed once, with the delivery-address header of every
//!    message.
//! 3. [`route`] derives each message's folder with [`folder_name`], makes
//!    sure it exists and moves the message there. Per-message failures are
//!    recorded in the [`RunReport`] and do not stop the run.
//!
//! The server is reached through the [`MailSession`] trait; the IMAP
//! implementation lives on [`mailsort_imap::Session`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod config;
pub mod driver;
pub mod envelope;
mod error;
pub mod report;
pub mod router;
pub mod transport;

pub use catalog::FolderCatalog;
pub use config::{Config, RoutingOptions};
pub use driver::{Connector, ImapConnector, run, sort_mailbox};
pub use envelope::folder_name;
pub use error::{Error, Result};
pub use report::RunReport;
pub use router::{RouteOutcome, RouteStage, route};
pub use transport::{MailItem, MailSession, TransportError, TransportResult};
