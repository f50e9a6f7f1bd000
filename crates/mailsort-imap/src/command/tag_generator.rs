//! Command tags.

/// Hands out the tags `A0000`, `A0001`, ... for one connection.
///
/// The counter wraps after `A9999` into five digits (`A10000`), which IMAP
/// allows; tags only need to be unique among commands in flight.
#[derive(Debug, Default)]
pub struct TagGenerator {
    issued: u32,
}

impl TagGenerator {
    /// Returns the next unused tag.
    pub fn next(&mut self) -> String {
        let tag = format!("A{:04}", self.issued);
        self.issued = self.issued.wrapping_add(1);
        tag
    }
}
