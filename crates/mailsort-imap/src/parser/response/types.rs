//! Parsed response data.

use crate::types::{Capability, Flag, ListResponse, ResponseCode, SeqNum, Status, Uid};

/// One item inside a `FETCH` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchItem {
    /// `FLAGS (...)`
    Flags(Vec<Flag>),
    /// `UID n`
    Uid(Uid),
    /// `BODY[section] data`
    Body {
        /// Section text between the brackets, e.g. `HEADER.FIELDS (ENVELOPE-TO)`.
        section: Option<String>,
        /// Payload, `None` for `NIL`.
        data: Option<Vec<u8>>,
    },
}

impl FetchItem {
    /// The UID, if this is a `UID` item.
    #[must_use]
    pub const fn as_uid(&self) -> Option<Uid> {
        match self {
            Self::Uid(uid) => Some(*uid),
            _ => None,
        }
    }
}

/// Data the server sends outside a command completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UntaggedResponse {
    /// `* OK|NO|BAD|PREAUTH|BYE [code] text`
    Status {
        /// Which status word.
        status: Status,
        /// Bracketed response code, if any.
        code: Option<ResponseCode>,
        /// Free text after the code.
        text: String,
    },
    /// `* CAPABILITY ...`
    Capability(Vec<Capability>),
    /// `* FLAGS (...)` for the selected mailbox.
    Flags(Vec<Flag>),
    /// `* LIST ...`
    List(ListResponse),
    /// `* n EXISTS`
    Exists(u32),
    /// `* n RECENT`
    Recent(u32),
    /// `* n EXPUNGE`
    Expunge(SeqNum),
    /// `* n FETCH (...)`
    Fetch {
        /// Sequence number of the message.
        seq: SeqNum,
        /// Items in the order the server sent them.
        items: Vec<FetchItem>,
    },
}
