//! Message flags.

/// A message flag. System flags are matched without regard to case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Flag {
    /// `\Seen`
    Seen,
    /// `\Answered`
    Answered,
    /// `\Flagged`
    Flagged,
    /// `\Deleted`: removed by the next expunge.
    Deleted,
    /// `\Draft`
    Draft,
    /// `\Recent`
    Recent,
    /// A keyword such as `$Junk`, kept as sent.
    Keyword(String),
}

impl Flag {
    const SYSTEM: [Self; 6] = [
        Self::Seen,
        Self::Answered,
        Self::Flagged,
        Self::Deleted,
        Self::Draft,
        Self::Recent,
    ];

    /// Maps a flag atom.
    #[must_use]
    pub fn parse(atom: &str) -> Self {
        Self::SYSTEM
            .into_iter()
            .find(|flag| flag.as_str().eq_ignore_ascii_case(atom))
            .unwrap_or_else(|| Self::Keyword(atom.to_string()))
    }

    /// The wire spelling.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Seen => "\\Seen",
            Self::Answered => "\\Answered",
            Self::Flagged => "\\Flagged",
            Self::Deleted => "\\Deleted",
            Self::Draft => "\\Draft",
            Self::Recent => "\\Recent",
            Self::Keyword(keyword) => keyword,
        }
    }
}
