//! Commands this client sends.
//!
//! Messages are only ever addressed by UID. Each [`Command`] knows its own
//! wire form through [`Command::serialize`].

mod serialize;
mod tag_generator;

use crate::types::{Flag, Mailbox, UidSet};

pub use tag_generator::TagGenerator;

use serialize::{write_add_flags, write_astring, write_fetch_attributes};

/// One item of a `UID FETCH` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchAttribute {
    /// `UID`
    Uid,
    /// `BODY.PEEK[HEADER.FIELDS (...)]`: the named header lines, without
    /// setting `\Seen`.
    HeaderFields(Vec<String>),
}

impl FetchAttribute {
    /// A request for the single header `name`.
    #[must_use]
    pub fn header_field(name: &str) -> Self {
        Self::HeaderFields(vec![name.to_ascii_uppercase()])
    }
}

/// An IMAP command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `CAPABILITY`
    Capability,
    /// `LOGOUT`
    Logout,
    /// `STARTTLS`
    StartTls,
    /// `LOGIN <user> <password>`
    Login {
        /// User name.
        username: String,
        /// Password.
        password: String,
    },
    /// `LIST <reference> <pattern>`
    List {
        /// Reference name, usually empty.
        reference: String,
        /// Mailbox pattern.
        pattern: String,
    },
    /// `CREATE <mailbox>`
    Create {
        /// Full path of the mailbox.
        mailbox: Mailbox,
    },
    /// `SELECT <mailbox>`
    Select {
        /// Full path of the mailbox.
        mailbox: Mailbox,
    },
    /// `UID FETCH <set> <items>`
    UidFetch {
        /// Messages to fetch.
        uids: UidSet,
        /// Items to return for each message.
        items: Vec<FetchAttribute>,
    },
    /// `UID STORE <set> +FLAGS.SILENT (<flags>)`
    UidAddFlags {
        /// Messages to flag.
        uids: UidSet,
        /// Flags to add.
        flags: Vec<Flag>,
    },
    /// `UID COPY <set> <mailbox>`
    UidCopy {
        /// Messages to copy.
        uids: UidSet,
        /// Destination.
        mailbox: Mailbox,
    },
    /// `UID MOVE <set> <mailbox>` (RFC 6851)
    UidMove {
        /// Messages to move.
        uids: UidSet,
        /// Destination.
        mailbox: Mailbox,
    },
    /// `UID EXPUNGE <set>` (RFC 4315)
    UidExpunge {
        /// Messages to expunge, if flagged `\Deleted`.
        uids: UidSet,
    },
    /// `EXPUNGE`
    Expunge,
}

impl Command {
    /// The command name, for logs and error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Capability => "CAPABILITY",
            Self::Logout => "LOGOUT",
            Self::StartTls => "STARTTLS",
            Self::Login { .. } => "LOGIN",
            Self::List { .. } => "LIST",
            Self::Create { .. } => "CREATE",
            Self::Select { .. } => "SELECT",
            Self::UidFetch { .. } => "UID FETCH",
            Self::UidAddFlags { .. } => "UID STORE",
            Self::UidCopy { .. } => "UID COPY",
            Self::UidMove { .. } => "UID MOVE",
            Self::UidExpunge { .. } => "UID EXPUNGE",
            Self::Expunge => "EXPUNGE",
        }
    }

    /// Encodes the command line, CRLF included, under `tag`.
    #[must_use]
    pub fn serialize(&self, tag: &str) -> Vec<u8> {
        let mut buf = format!("{tag} {}", self.name()).into_bytes();

        match self {
            Self::Capability | Self::Logout | Self::StartTls | Self::Expunge => {}
            Self::Login { username, password } => {
                buf.push(b' ');
                write_astring(&mut buf, username);
                buf.push(b' ');
                write_astring(&mut buf, password);
            }
            Self::List { reference, pattern } => {
                buf.push(b' ');
                write_astring(&mut buf, reference);
                buf.push(b' ');
                write_astring(&mut buf, pattern);
            }
            Self::Create { mailbox } | Self::Select { mailbox } => {
                buf.push(b' ');
                write_astring(&mut buf, &mailbox.to_wire());
            }
            Self::UidFetch { uids, items } => {
                buf.extend_from_slice(format!(" {uids} ").as_bytes());
                write_fetch_attributes(&mut buf, items);
            }
            Self::UidAddFlags { uids, flags } => {
                buf.extend_from_slice(format!(" {uids} ").as_bytes());
                write_add_flags(&mut buf, flags);
            }
            Self::UidCopy { uids, mailbox } | Self::UidMove { uids, mailbox } => {
                buf.extend_from_slice(format!(" {uids} ").as_bytes());
                write_astring(&mut buf, &mailbox.to_wire());
            }
            Self::UidExpunge { uids } => {
                buf.extend_from_slice(format!(" {uids}").as_bytes());
            }
        }

        buf.extend_from_slice(b"\r\n");
        buf
    }
}
