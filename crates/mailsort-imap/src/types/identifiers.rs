//! Tags and the non-zero numbers IMAP uses to address messages.

use std::fmt;
use std::num::NonZeroU32;

/// A command tag as echoed in a tagged response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag(String);

impl Tag {
    /// Wraps a tag string.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The tag text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! nonzero_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(NonZeroU32);

        impl $name {
            /// The smallest valid value, 1.
            pub const MIN: Self = Self(NonZeroU32::MIN);

            /// Returns `None` for 0, which IMAP never assigns.
            #[must_use]
            pub const fn new(n: u32) -> Option<Self> {
                match NonZeroU32::new(n) {
                    Some(n) => Some(Self(n)),
                    None => None,
                }
            }

            /// The numeric value.
            #[must_use]
            pub const fn get(self) -> u32 {
                self.0.get()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

nonzero_id! {
    /// Position of a message in the selected mailbox. Shifts on expunge.
    SeqNum
}

nonzero_id! {
    /// Message identifier, stable within one mailbox while its
    /// `UIDVALIDITY` holds. Moves address messages by UID.
    Uid
}

nonzero_id! {
    /// `UIDVALIDITY` of a mailbox.
    UidValidity
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_rejected() {
        assert!(Uid::new(0).is_none());
        assert!(SeqNum::new(0).is_none());
        assert_eq!(Uid::new(42).unwrap().get(), 42);
        assert_eq!(Uid::MIN.get(), 1);
    }

    #[test]
    fn test_uids_order_numerically() {
        assert!(Uid::new(9).unwrap() < Uid::new(10).unwrap());
    }

    #[test]
    fn test_display_is_the_number() {
        assert_eq!(SeqNum::new(7).unwrap().to_string(), "7");
        assert_eq!(Uid::new(12345).unwrap().to_string(), "12345");
        assert_eq!(Tag::new("A0001").as_str(), "A0001");
    }
}
