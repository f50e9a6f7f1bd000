//! FETCH response parsing.

use crate::parser::lexer::{Lexer, Token};
use crate::types::Uid;
use crate::{Error, Result};

use super::helpers::parse_flag_list;
use super::types::FetchItem;

/// Parses the parenthesized item list of a FETCH response.
pub fn parse_fetch_response(lexer: &mut Lexer<'_>) -> Result<Vec<FetchItem>> {
    lexer.expect(Token::LParen)?;

    let mut items = Vec::new();

    loop {
        match lexer.next_token()? {
            Token::RParen => break,
            Token::Atom(name) => match name.to_uppercase().as_str() {
                "FLAGS" => {
                    lexer.expect_space()?;
                    items.push(FetchItem::Flags(parse_flag_list(lexer)?));
                }
                "UID" => {
                    lexer.expect_space()?;
                    let n = lexer.read_number()?;
                    let uid = Uid::new(n).ok_or_else(|| Error::Parse {
                        position: lexer.position(),
                        message: format!("invalid UID value: {n} (UID cannot be 0)"),
                    })?;
                    items.push(FetchItem::Uid(uid));
                }
                "BODY" | "RFC822.HEADER" => {
                    let section = parse_body_section(lexer);
                    lexer.expect_space()?;
                    let data = match lexer.next_token()? {
                        Token::Literal(d) => Some(d),
                        Token::QuotedString(s) => Some(s.into_bytes()),
                        _ => None,
                    };
                    items.push(FetchItem::Body { section, data });
                }
                _ => skip_fetch_value(lexer)?,
            },
            Token::Eof => {
                return Err(Error::Parse {
                    position: lexer.position(),
                    message: "Unterminated FETCH item list".to_string(),
                });
            }
            _ => {}
        }
    }

    Ok(items)
}

/// Reads an optional `[section]` and drops a partial `<origin>` suffix.
fn parse_body_section(lexer: &mut Lexer<'_>) -> Option<String> {
    let mut section = None;

    if lexer.peek() == Some(b'[') {
        lexer.advance();

        let mut buf = String::new();
        while let Some(b) = lexer.advance() {
            if b == b']' {
                break;
            }
            buf.push(char::from(b));
        }
        if !buf.is_empty() {
            section = Some(buf);
        }
    }

    if lexer.peek() == Some(b'<') {
        while let Some(b) = lexer.advance() {
            if b == b'>' {
                break;
            }
        }
    }

    section
}

/// Skips the value of a FETCH item this client does not use.
///
/// Works on tokens so that literals and quoted strings containing
/// parentheses do not confuse the nesting count.
fn skip_fetch_value(lexer: &mut Lexer<'_>) -> Result<()> {
    if lexer.peek() == Some(b'[') {
        parse_body_section(lexer);
    }
    if lexer.peek() == Some(b' ') {
        lexer.advance();
    }

    let mut depth = 0usize;
    loop {
        match lexer.peek() {
            None | Some(b'\r') => return Ok(()),
            Some(b')') if depth == 0 => return Ok(()),
            Some(b' ') if depth == 0 => return Ok(()),
            Some(b'[' | b']' | b'<' | b'>') => {
                lexer.advance();
                continue;
            }
            _ => {}
        }

        match lexer.next_token()? {
            Token::LParen => depth += 1,
            Token::RParen => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Ok(());
                }
            }
            Token::Eof => return Ok(()),
            _ if depth == 0 => return Ok(()),
            _ => {}
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_uid_and_header_literal() {
        let input = b"(UID 42 BODY[HEADER.FIELDS (ENVELOPE-TO)] {32}\r\nEnvelope-To: alice@example.com\r\n)";
        let mut lexer = Lexer::new(input);
        let items = parse_fetch_response(&mut lexer).unwrap();

        assert_eq!(items[0], FetchItem::Uid(Uid::new(42).unwrap()));
        assert_eq!(
            items[1],
            FetchItem::Body {
                section: Some("HEADER.FIELDS (ENVELOPE-TO)".to_string()),
                data: Some(b"Envelope-To: alice@example.com\r\n".to_vec()),
            }
        );
    }

    #[test]
    fn test_nil_body_section() {
        let mut lexer = Lexer::new(b"(BODY[HEADER.FIELDS (X-NONE)] NIL UID 3)");
        let items = parse_fetch_response(&mut lexer).unwrap();

        assert_eq!(
            items[0],
            FetchItem::Body {
                section: Some("HEADER.FIELDS (X-NONE)".to_string()),
                data: None,
            }
        );
        assert_eq!(items[1].as_uid(), Uid::new(3));
    }

    #[test]
    fn test_unknown_items_are_skipped() {
        let input = b"(MODSEQ (12) INTERNALDATE \"17-Jul-1996 02:44:25 -0700\" X-GM-LABELS (\"a (b)\" {3}\r\n)()) RFC822.SIZE 44 UID 9)";
        let mut lexer = Lexer::new(input);
        let items = parse_fetch_response(&mut lexer).unwrap();

        assert_eq!(items, vec![FetchItem::Uid(Uid::new(9).unwrap())]);
    }

    #[test]
    fn test_flags_item() {
        let mut lexer = Lexer::new(b"(FLAGS (\\Seen \\Deleted) UID 5)");
        let items = parse_fetch_response(&mut lexer).unwrap();

        assert_eq!(
            items[0],
            FetchItem::Flags(vec![crate::types::Flag::Seen, crate::types::Flag::Deleted])
        );
    }

    #[test]
    fn test_zero_uid_is_rejected() {
        let mut lexer = Lexer::new(b"(UID 0)");
        assert!(parse_fetch_response(&mut lexer).is_err());
    }
}
