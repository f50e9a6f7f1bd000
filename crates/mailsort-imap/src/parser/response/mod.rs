//! Server response parser.
//!
//! Input is one response as framed by the connection: a CRLF-terminated
//! line with any literals already inlined.

#![allow(clippy::missing_errors_doc)]

mod fetch;
mod helpers;
mod types;

pub use types::{FetchItem, UntaggedResponse};

use crate::parser::lexer::{Lexer, Token};
use crate::types::{ResponseCode, SeqNum, Status, Tag};
use crate::{Error, Result};

use helpers::{
    parse_capability_data, parse_flag_list, parse_list_response, parse_response_code,
    read_text_until_crlf,
};

/// A parsed server response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Completion of the command that carried `tag`.
    Tagged {
        /// Tag of the completed command.
        tag: Tag,
        /// Outcome.
        status: Status,
        /// Bracketed response code, if any.
        code: Option<ResponseCode>,
        /// Free text after the code.
        text: String,
    },
    /// `* ...`
    Untagged(UntaggedResponse),
    /// `+ ...`, the server waiting for more input.
    Continuation {
        /// Text after the `+`, if any.
        text: Option<String>,
    },
}

/// Entry point of the parser.
pub struct ResponseParser;

impl ResponseParser {
    /// Parses one complete response.
    pub fn parse(input: &[u8]) -> Result<Response> {
        let mut lexer = Lexer::new(input);

        match lexer.next_token()? {
            Token::Asterisk => {
                lexer.expect_space()?;
                untagged(&mut lexer).map(Response::Untagged)
            }
            Token::Plus => {
                skip_space(&mut lexer);
                let text = read_text_until_crlf(&mut lexer);
                Ok(Response::Continuation {
                    text: (!text.is_empty()).then_some(text),
                })
            }
            Token::Atom(tag) => {
                lexer.expect_space()?;
                let word = lexer.read_atom_string()?;
                let status = Status::from_keyword(word)
                    .ok_or_else(|| error_at(&lexer, format!("not a status word: {word}")))?;
                let (code, text) = status_text(&mut lexer)?;
                Ok(Response::Tagged {
                    tag: Tag::new(tag),
                    status,
                    code,
                    text,
                })
            }
            found => Err(error_at(&lexer, format!("response starts with {found:?}"))),
        }
    }
}

fn untagged(lexer: &mut Lexer<'_>) -> Result<UntaggedResponse> {
    match lexer.next_token()? {
        Token::Atom(keyword) => keyword_data(lexer, keyword),
        Token::Number(n) => message_data(lexer, n),
        found => Err(error_at(lexer, format!("untagged response with {found:?}"))),
    }
}

/// `* <keyword> ...`: status responses and mailbox-independent data.
fn keyword_data(lexer: &mut Lexer<'_>, keyword: &str) -> Result<UntaggedResponse> {
    if let Some(status) = Status::from_keyword(keyword) {
        let (code, text) = status_text(lexer)?;
        return Ok(UntaggedResponse::Status { status, code, text });
    }

    if keyword.eq_ignore_ascii_case("CAPABILITY") {
        Ok(UntaggedResponse::Capability(parse_capability_data(lexer)?))
    } else if keyword.eq_ignore_ascii_case("LIST") {
        lexer.expect_space()?;
        Ok(UntaggedResponse::List(parse_list_response(lexer)?))
    } else if keyword.eq_ignore_ascii_case("FLAGS") {
        lexer.expect_space()?;
        Ok(UntaggedResponse::Flags(parse_flag_list(lexer)?))
    } else {
        Err(error_at(lexer, format!("unsupported response {keyword}")))
    }
}

/// `* <n> <keyword> ...`: counts and per-message data.
fn message_data(lexer: &mut Lexer<'_>, n: u32) -> Result<UntaggedResponse> {
    lexer.expect_space()?;
    let keyword = lexer.read_atom_string()?.to_ascii_uppercase();

    let seq = || SeqNum::new(n).ok_or_else(|| error_at(lexer, "message number 0"));
    let data = match keyword.as_str() {
        "EXISTS" => UntaggedResponse::Exists(n),
        "RECENT" => UntaggedResponse::Recent(n),
        "EXPUNGE" => UntaggedResponse::Expunge(seq()?),
        "FETCH" => {
            let seq = seq()?;
            lexer.expect_space()?;
            let items = fetch::parse_fetch_response(lexer)?;
            UntaggedResponse::Fetch { seq, items }
        }
        _ => return Err(error_at(lexer, format!("unsupported message data {keyword}"))),
    };
    Ok(data)
}

/// `[code] text` after a status word. Both parts are optional, and so is
/// the space before them, which some servers leave out.
fn status_text(lexer: &mut Lexer<'_>) -> Result<(Option<ResponseCode>, String)> {
    skip_space(lexer);
    let code = if lexer.peek() == Some(b'[') {
        let code = parse_response_code(lexer)?;
        skip_space(lexer);
        Some(code)
    } else {
        None
    };
    Ok((code, read_text_until_crlf(lexer)))
}

fn skip_space(lexer: &mut Lexer<'_>) {
    if lexer.peek() == Some(b' ') {
        lexer.advance();
    }
}

fn error_at(lexer: &Lexer<'_>, message: impl Into<String>) -> Error {
    Error::Parse {
        position: lexer.position(),
        message: message.into(),
    }
}
