//! Bracketed response codes.

use super::{Capability, Uid, UidValidity};

/// The `[...]` code of a status response.
///
/// Codes that do not affect this client are kept by name only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseCode {
    /// `ALREADYEXISTS` (RFC 5530), on a CREATE for an existing mailbox.
    AlreadyExists,
    /// `NONEXISTENT` (RFC 5530)
    NonExistent,
    /// `TRYCREATE`: the destination of a COPY or MOVE is missing.
    TryCreate,
    /// `READ-ONLY` on SELECT.
    ReadOnly,
    /// `READ-WRITE` on SELECT.
    ReadWrite,
    /// `UIDNEXT n`
    UidNext(Uid),
    /// `UIDVALIDITY n`
    UidValidity(UidValidity),
    /// `CAPABILITY ...`, often sent with the greeting or after LOGIN.
    Capability(Vec<Capability>),
    /// Any other code, by name.
    Other(String),
}
