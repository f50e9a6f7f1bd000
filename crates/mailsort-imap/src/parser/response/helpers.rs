//! Pieces shared by several response forms.

use crate::parser::lexer::{Lexer, Token};
use crate::types::{
    Capability, Flag, ListResponse, Mailbox, MailboxAttribute, ResponseCode, Uid, UidValidity,
};
use crate::{Error, Result};

fn parse_error(lexer: &Lexer<'_>, message: impl Into<String>) -> Error {
    Error::Parse {
        position: lexer.position(),
        message: message.into(),
    }
}

/// Reads ` <n>` and rejects 0.
fn nonzero_argument<T>(lexer: &mut Lexer<'_>, code: &str, make: fn(u32) -> Option<T>) -> Result<T> {
    lexer.expect_space()?;
    let n = lexer.read_number()?;
    make(n).ok_or_else(|| parse_error(lexer, format!("{code} 0")))
}

/// Parses `[CODE args]`. Arguments of codes without a variant are skipped.
pub fn parse_response_code(lexer: &mut Lexer<'_>) -> Result<ResponseCode> {
    lexer.expect(Token::LBracket)?;
    let name = lexer.read_atom_string()?;

    let code = if name.eq_ignore_ascii_case("ALREADYEXISTS") {
        ResponseCode::AlreadyExists
    } else if name.eq_ignore_ascii_case("NONEXISTENT") {
        ResponseCode::NonExistent
    } else if name.eq_ignore_ascii_case("TRYCREATE") {
        ResponseCode::TryCreate
    } else if name.eq_ignore_ascii_case("READ-ONLY") {
        ResponseCode::ReadOnly
    } else if name.eq_ignore_ascii_case("READ-WRITE") {
        ResponseCode::ReadWrite
    } else if name.eq_ignore_ascii_case("UIDNEXT") {
        ResponseCode::UidNext(nonzero_argument(lexer, "UIDNEXT", Uid::new)?)
    } else if name.eq_ignore_ascii_case("UIDVALIDITY") {
        ResponseCode::UidValidity(nonzero_argument(lexer, "UIDVALIDITY", UidValidity::new)?)
    } else if name.eq_ignore_ascii_case("CAPABILITY") {
        ResponseCode::Capability(parse_capability_data(lexer)?)
    } else {
        ResponseCode::Other(name.to_string())
    };

    while !lexer.is_eof() && lexer.peek() != Some(b']') {
        lexer.advance();
    }
    lexer.expect(Token::RBracket)?;

    Ok(code)
}

/// Parses the space-separated atoms after `CAPABILITY`.
pub fn parse_capability_data(lexer: &mut Lexer<'_>) -> Result<Vec<Capability>> {
    let mut capabilities = Vec::new();
    while lexer.peek() == Some(b' ') {
        lexer.advance();
        if let Token::Atom(atom) = lexer.next_token()? {
            capabilities.push(Capability::parse(atom));
        }
    }
    Ok(capabilities)
}

/// Parses `(atom atom ...)`, handing each atom to `each`.
fn parse_atom_list(lexer: &mut Lexer<'_>, what: &str, mut each: impl FnMut(&str)) -> Result<()> {
    lexer.expect(Token::LParen)?;
    loop {
        match lexer.next_token()? {
            Token::RParen => return Ok(()),
            Token::Space => {}
            Token::Atom(atom) => each(atom),
            token => return Err(parse_error(lexer, format!("{token:?} in {what}"))),
        }
    }
}

/// Parses a parenthesized flag list.
pub fn parse_flag_list(lexer: &mut Lexer<'_>) -> Result<Vec<Flag>> {
    let mut flags = Vec::new();
    parse_atom_list(lexer, "flag list", |atom| flags.push(Flag::parse(atom)))?;
    Ok(flags)
}

/// Parses the data of `* LIST (attributes) delimiter mailbox`.
pub fn parse_list_response(lexer: &mut Lexer<'_>) -> Result<ListResponse> {
    let mut attributes = Vec::new();
    parse_atom_list(lexer, "LIST attributes", |atom| {
        attributes.push(MailboxAttribute::parse(atom));
    })?;

    lexer.expect_space()?;
    let delimiter = match lexer.next_token()? {
        Token::Nil => None,
        Token::QuotedString(s) => s.chars().next(),
        token => return Err(parse_error(lexer, format!("{token:?} as LIST delimiter"))),
    };

    lexer.expect_space()?;
    let mailbox = Mailbox::from_wire(lexer.read_astring()?);

    Ok(ListResponse {
        attributes,
        delimiter,
        mailbox,
    })
}

/// Takes the rest of the line as text and consumes the CRLF.
pub fn read_text_until_crlf(lexer: &mut Lexer<'_>) -> String {
    let rest = lexer.remaining();
    let len = rest
        .windows(2)
        .position(|pair| pair == b"\r\n")
        .unwrap_or(rest.len());

    lexer.skip(len);
    if lexer.peek() == Some(b'\r') {
        lexer.skip(2);
    }

    String::from_utf8_lossy(&rest[..len]).into_owned()
}
