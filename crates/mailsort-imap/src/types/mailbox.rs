//! Mailboxes: names, LIST entries and SELECT snapshots.

use std::fmt;

use super::{Uid, UidValidity};

/// Full server path of a mailbox.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mailbox(String);

impl Mailbox {
    /// Wraps a mailbox path.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Decodes a name received from the server.
    ///
    /// Names travel in modified UTF-7 (RFC 3501 5.1.3). A name that is not
    /// well-formed modified UTF-7 is kept exactly as sent.
    #[must_use]
    pub fn from_wire(raw: String) -> Self {
        match decode_modified_utf7(&raw) {
            Some(decoded) => Self(decoded),
            None => Self(raw),
        }
    }

    /// The path in modified UTF-7, ready to be sent.
    #[must_use]
    pub fn to_wire(&self) -> String {
        utf7_imap::encode_utf7_imap(self.0.clone())
    }

    /// The decoded path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `INBOX` is special: RFC 3501 makes its name case-insensitive.
    #[must_use]
    pub fn is_inbox(&self) -> bool {
        self.0.eq_ignore_ascii_case("INBOX")
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decodes each `&...-` shift on its own. `None` unless the name is ASCII
/// and every shift holds canonical modified base64 of whole UTF-16 units.
fn decode_modified_utf7(name: &str) -> Option<String> {
    if !name.is_ascii() {
        return None;
    }

    let mut decoded = String::with_capacity(name.len());
    let mut rest = name;
    while let Some(start) = rest.find('&') {
        decoded.push_str(&rest[..start]);
        let shifted = &rest[start..];
        let end = shifted.find('-')?;
        let run = &shifted[1..end];
        if run.is_empty() {
            decoded.push('&');
        } else if is_base64_run(run) {
            decoded.push_str(&utf7_imap::decode_utf7_imap(shifted[..=end].to_string()));
        } else {
            return None;
        }
        rest = &shifted[end + 1..];
    }
    decoded.push_str(rest);
    Some(decoded)
}

fn is_base64_run(run: &str) -> bool {
    let sextet = |byte: u8| match byte {
        b'A'..=b'Z' => Some(byte - b'A'),
        b'a'..=b'z' => Some(byte - b'a' + 26),
        b'0'..=b'9' => Some(byte - b'0' + 52),
        b'+' => Some(62),
        b',' => Some(63),
        _ => None,
    };
    let Some(sextets) = run.bytes().map(sextet).collect::<Option<Vec<u8>>>() else {
        return false;
    };

    let spare_bits = match sextets.len() % 4 {
        0 => 0,
        2 => 4,
        3 => 2,
        _ => return false,
    };
    let whole_units = (sextets.len() * 6 / 8) % 2 == 0;
    let clean_tail = sextets
        .last()
        .is_none_or(|last| last & ((1u8 << spare_bits) - 1) == 0);
    whole_units && clean_tail
}

/// What SELECT reported about a mailbox.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailboxStatus {
    /// Messages in the mailbox.
    pub exists: u32,
    /// Messages with `\Recent`.
    pub recent: u32,
    /// UID the next delivered message will get.
    pub uid_next: Option<Uid>,
    /// Current `UIDVALIDITY`.
    pub uid_validity: Option<UidValidity>,
    /// The server granted read-only access.
    pub read_only: bool,
}

/// One line of a LIST response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListResponse {
    /// Flags such as `\Noselect` or `\HasChildren`.
    pub attributes: Vec<MailboxAttribute>,
    /// Hierarchy delimiter, `None` for a flat namespace.
    pub delimiter: Option<char>,
    /// The mailbox path.
    pub mailbox: Mailbox,
}

impl ListResponse {
    /// False for `\Noselect` and `\NonExistent` entries.
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        !self
            .attributes
            .iter()
            .any(|a| matches!(a, MailboxAttribute::NoSelect | MailboxAttribute::NonExistent))
    }
}

/// A LIST attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MailboxAttribute {
    /// `\Noselect`: a placeholder in the hierarchy.
    NoSelect,
    /// `\NonExistent` (RFC 5258)
    NonExistent,
    /// `\HasChildren`
    HasChildren,
    /// `\HasNoChildren`
    HasNoChildren,
    /// Anything else, including SPECIAL-USE markers, as sent.
    Other(String),
}

impl MailboxAttribute {
    /// Maps an attribute atom, ignoring case.
    #[must_use]
    pub fn parse(atom: &str) -> Self {
        let known = [
            ("\\Noselect", Self::NoSelect),
            ("\\NonExistent", Self::NonExistent),
            ("\\HasChildren", Self::HasChildren),
            ("\\HasNoChildren", Self::HasNoChildren),
        ];
        known
            .into_iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(atom))
            .map_or_else(|| Self::Other(atom.to_string()), |(_, attribute)| attribute)
    }
}
