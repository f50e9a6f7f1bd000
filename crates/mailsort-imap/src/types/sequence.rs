//! Message sets in UID commands.

use std::fmt;

use super::Uid;

/// The messages a UID command applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UidSet {
    /// One message.
    Single(Uid),
    /// Every message from this UID up, `n:*`.
    From(Uid),
}

impl UidSet {
    /// One message.
    #[must_use]
    pub const fn single(uid: Uid) -> Self {
        Self::Single(uid)
    }

    /// Every message in the mailbox, `1:*`.
    #[must_use]
    pub const fn all() -> Self {
        Self::From(Uid::MIN)
    }
}

impl fmt::Display for UidSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(uid) => write!(f, "{uid}"),
            Self::From(uid) => write!(f, "{uid}:*"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_forms() {
        assert_eq!(UidSet::single(Uid::new(3).unwrap()).to_string(), "3");
        assert_eq!(UidSet::all().to_string(), "1:*");
        assert_eq!(UidSet::From(Uid::new(40).unwrap()).to_string(), "40:*");
    }
}
