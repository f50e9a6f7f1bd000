//! Tokenizer for server responses.
//!
//! Works on one complete response as framed by the connection, so literal
//! payloads are always present in the input.

#![allow(clippy::missing_errors_doc)]

mod token;

pub use token::Token;

use crate::{Error, Result};

/// Cursor over the bytes of one response.
pub struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Starts at the first byte of `input`.
    #[must_use]
    pub const fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Byte offset of the cursor.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Everything not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        self.input.get(self.pos..).unwrap_or_default()
    }

    /// True once the whole input is consumed.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// The byte under the cursor.
    #[must_use]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Consumes and returns the byte under the cursor.
    pub fn advance(&mut self) -> Option<u8> {
        let byte = self.peek();
        if byte.is_some() {
            self.pos += 1;
        }
        byte
    }

    /// Moves the cursor `n` bytes forward, stopping at the end.
    pub fn skip(&mut self, n: usize) {
        self.pos = self.pos.saturating_add(n).min(self.input.len());
    }

    /// Consumes `byte` if it is next.
    fn eat(&mut self, byte: u8) -> bool {
        let hit = self.peek() == Some(byte);
        if hit {
            self.pos += 1;
        }
        hit
    }

    /// Consumes the longest run of bytes matching `pred`.
    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a [u8] {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        &self.input[start..self.pos]
    }

    /// Produces the next token, or [`Token::Eof`] at the end.
    pub fn next_token(&mut self) -> Result<Token<'a>> {
        let Some(byte) = self.peek() else {
            return Ok(Token::Eof);
        };

        if let Some(token) = punctuation(byte) {
            self.pos += 1;
            return Ok(token);
        }

        match byte {
            b'\r' => {
                self.pos += 1;
                if self.eat(b'\n') {
                    Ok(Token::Crlf)
                } else {
                    Err(self.fail("bare CR"))
                }
            }
            b'"' => self.quoted(),
            b'{' => self.literal(),
            _ if is_atom_char(byte) => Ok(self.atom()),
            _ => Err(self.fail(format!("unexpected byte {byte:#04x}"))),
        }
    }

    fn quoted(&mut self) -> Result<Token<'a>> {
        self.pos += 1;

        let mut text = Vec::new();
        loop {
            let byte = self
                .advance()
                .ok_or_else(|| self.fail("quoted string not terminated"))?;
            match byte {
                b'"' => break,
                b'\\' => match self.advance() {
                    Some(escaped @ (b'"' | b'\\')) => text.push(escaped),
                    _ => return Err(self.fail("bad escape in quoted string")),
                },
                _ => text.push(byte),
            }
        }

        String::from_utf8(text)
            .map(Token::QuotedString)
            .map_err(|_| self.fail("quoted string is not UTF-8"))
    }

    /// `{n}` or `{n+}`, CRLF, then `n` bytes.
    fn literal(&mut self) -> Result<Token<'a>> {
        self.pos += 1;

        let size = self
            .take_while(|b| b.is_ascii_digit())
            .iter()
            .try_fold(0usize, |acc, d| {
                acc.checked_mul(10)?.checked_add(usize::from(d - b'0'))
            })
            .ok_or_else(|| self.fail("literal size out of range"))?;

        self.eat(b'+');
        if !(self.eat(b'}') && self.eat(b'\r') && self.eat(b'\n')) {
            return Err(self.fail("malformed literal header"));
        }

        let end = self
            .pos
            .checked_add(size)
            .filter(|&end| end <= self.input.len())
            .ok_or_else(|| self.fail("literal shorter than announced"))?;
        let data = self.input[self.pos..end].to_vec();
        self.pos = end;

        Ok(Token::Literal(data))
    }

    fn atom(&mut self) -> Token<'a> {
        let raw = self.take_while(is_atom_char);
        // Atom bytes are ASCII.
        let text = std::str::from_utf8(raw).unwrap_or_default();

        if text.eq_ignore_ascii_case("NIL") {
            return Token::Nil;
        }
        if raw.iter().all(u8::is_ascii_digit)
            && let Ok(n) = text.parse()
        {
            return Token::Number(n);
        }
        Token::Atom(text)
    }

    fn fail(&self, message: impl Into<String>) -> Error {
        Error::Parse {
            position: self.pos,
            message: message.into(),
        }
    }

    /// Consumes a token of the same kind as `expected`.
    #[allow(clippy::needless_pass_by_value)]
    pub fn expect(&mut self, expected: Token<'_>) -> Result<()> {
        let found = self.next_token()?;
        if std::mem::discriminant(&found) == std::mem::discriminant(&expected) {
            Ok(())
        } else {
            Err(self.fail(format!("wanted {expected:?}, found {found:?}")))
        }
    }

    /// Consumes a single space.
    pub fn expect_space(&mut self) -> Result<()> {
        self.expect(Token::Space)
    }

    /// Reads an atom, number, quoted string or literal as text.
    pub fn read_astring(&mut self) -> Result<String> {
        match self.next_token()? {
            Token::Atom(text) => Ok(text.to_owned()),
            Token::Number(n) => Ok(n.to_string()),
            Token::QuotedString(text) => Ok(text),
            Token::Literal(data) => {
                String::from_utf8(data).map_err(|_| self.fail("literal is not UTF-8"))
            }
            found => Err(self.fail(format!("wanted a string, found {found:?}"))),
        }
    }

    /// Reads a number.
    pub fn read_number(&mut self) -> Result<u32> {
        match self.next_token()? {
            Token::Number(n) => Ok(n),
            found => Err(self.fail(format!("wanted a number, found {found:?}"))),
        }
    }

    /// Reads an atom.
    pub fn read_atom_string(&mut self) -> Result<&'a str> {
        match self.next_token()? {
            Token::Atom(text) => Ok(text),
            found => Err(self.fail(format!("wanted an atom, found {found:?}"))),
        }
    }
}

const fn punctuation(byte: u8) -> Option<Token<'static>> {
    Some(match byte {
        b' ' => Token::Space,
        b'(' => Token::LParen,
        b')' => Token::RParen,
        b'[' => Token::LBracket,
        b']' => Token::RBracket,
        b'*' => Token::Asterisk,
        b'+' => Token::Plus,
        _ => return None,
    })
}

/// Bytes that can appear in an atom.
///
/// Printable ASCII minus the specials. `\` is let through so that system
/// flags such as `\Seen` come out as one atom.
#[must_use]
pub const fn is_atom_char(byte: u8) -> bool {
    byte.is_ascii_graphic()
        && !matches!(
            byte,
            b'(' | b')' | b'{' | b'}' | b'"' | b'%' | b'*' | b'[' | b']'
        )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tokens(input: &[u8]) -> Vec<Token<'_>> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token().unwrap();
            if token == Token::Eof {
                return out;
            }
            out.push(token);
        }
    }

    #[test]
    fn test_tagged_status_line() {
        assert_eq!(
            tokens(b"A0001 OK done\r\n"),
            vec![
                Token::Atom("A0001"),
                Token::Space,
                Token::Atom("OK"),
                Token::Space,
                Token::Atom("done"),
                Token::Crlf,
            ]
        );
    }

    #[test]
    fn test_numbers_and_nil() {
        assert_eq!(
            tokens(b"42 NIL nil 4294967296"),
            vec![
                Token::Number(42),
                Token::Space,
                Token::Nil,
                Token::Space,
                Token::Nil,
                Token::Space,
                Token::Atom("4294967296"),
            ]
        );
    }

    #[test]
    fn test_quoted_string_unescapes() {
        assert_eq!(
            tokens(br#""say \"hi\" \\ bye""#),
            vec![Token::QuotedString(r#"say "hi" \ bye"#.to_string())]
        );
    }

    #[test]
    fn test_system_flags_are_single_atoms() {
        assert_eq!(
            tokens(b"(\\Seen \\Deleted)"),
            vec![
                Token::LParen,
                Token::Atom("\\Seen"),
                Token::Space,
                Token::Atom("\\Deleted"),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_section_brackets_split_atoms() {
        assert_eq!(
            tokens(b"BODY[HEADER]"),
            vec![
                Token::Atom("BODY"),
                Token::LBracket,
                Token::Atom("HEADER"),
                Token::RBracket,
            ]
        );
    }

    #[test]
    fn test_literals_carry_raw_bytes() {
        assert_eq!(
            tokens(b"{5}\r\nhe)lo)"),
            vec![Token::Literal(b"he)lo".to_vec()), Token::RParen]
        );
        assert_eq!(tokens(b"{0+}\r\n"), vec![Token::Literal(Vec::new())]);
    }

    #[test]
    fn test_malformed_input_is_rejected() {
        for input in [
            &b"{10}\r\nshort"[..],
            b"{5x}\r\nhello",
            b"\"open",
            b"\"bad \\n escape\"",
            b"\rX",
            b"%",
        ] {
            assert!(
                Lexer::new(input).next_token().is_err(),
                "accepted {input:?}"
            );
        }
    }

    #[test]
    fn test_atom_characters() {
        for byte in [b'A', b'z', b'.', b'\\', b'-', b'@', b'+'] {
            assert!(is_atom_char(byte), "{}", byte as char);
        }
        for byte in [b' ', b'(', b')', b'"', b'%', b'*', b'[', b']', b'{', b'}', b'\r'] {
            assert!(!is_atom_char(byte), "{}", byte as char);
        }
    }
}
