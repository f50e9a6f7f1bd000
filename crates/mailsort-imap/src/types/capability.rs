//! Completion status and server capabilities.

/// Status word of a tagged or untagged status response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// `OK`
    Ok,
    /// `NO`: the command was understood but refused.
    No,
    /// `BAD`: the command was malformed.
    Bad,
    /// `PREAUTH`: greeting of an already-authenticated connection.
    PreAuth,
    /// `BYE`: the server is hanging up.
    Bye,
}

impl Status {
    /// Maps a status word, ignoring case.
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        [
            ("OK", Self::Ok),
            ("NO", Self::No),
            ("BAD", Self::Bad),
            ("PREAUTH", Self::PreAuth),
            ("BYE", Self::Bye),
        ]
        .into_iter()
        .find_map(|(name, status)| name.eq_ignore_ascii_case(word).then_some(status))
    }

    /// `OK` and `PREAUTH` count as success.
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok | Self::PreAuth)
    }
}

/// A capability the server advertised.
///
/// Only the ones that change how this client behaves get their own
/// variant; everything else is kept verbatim in [`Capability::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Capability {
    /// `IMAP4rev1`
    Imap4Rev1,
    /// `IMAP4rev2`
    Imap4Rev2,
    /// `MOVE` (RFC 6851): enables `UID MOVE`.
    Move,
    /// `UIDPLUS` (RFC 4315): enables `UID EXPUNGE`.
    UidPlus,
    /// `STARTTLS`
    StartTls,
    /// `LOGINDISABLED`: `LOGIN` must not be sent.
    LoginDisabled,
    /// Any other capability, as sent.
    Other(String),
}

impl Capability {
    /// Maps a capability atom, ignoring case.
    #[must_use]
    pub fn parse(atom: &str) -> Self {
        const KNOWN: [(&str, Capability); 6] = [
            ("IMAP4rev1", Capability::Imap4Rev1),
            ("IMAP4rev2", Capability::Imap4Rev2),
            ("MOVE", Capability::Move),
            ("UIDPLUS", Capability::UidPlus),
            ("STARTTLS", Capability::StartTls),
            ("LOGINDISABLED", Capability::LoginDisabled),
        ];

        KNOWN
            .into_iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(atom))
            .map_or_else(|| Self::Other(atom.to_string()), |(_, cap)| cap)
    }
}
