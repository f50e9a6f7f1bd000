//! Lexer output.

/// One token of a server response.
///
/// Atoms borrow from the input; quoted strings and literals are owned
/// because they may need unescaping or carry arbitrary bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// A run of atom characters that is not a number or `NIL`.
    Atom(&'a str),
    /// An unsigned 32-bit number.
    Number(u32),
    /// `NIL`, in any case.
    Nil,
    /// `"..."`, unescaped.
    QuotedString(String),
    /// The payload of `{n}` followed by CRLF.
    Literal(Vec<u8>),
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// A single space.
    Space,
    /// `*`, opening an untagged response.
    Asterisk,
    /// `+`, opening a continuation request.
    Plus,
    /// `\r\n`
    Crlf,
    /// No input left.
    Eof,
}
