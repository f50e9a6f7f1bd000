//! IMAP protocol parser.
//!
//! A sans-I/O parser for the server responses this client consumes: status
//! responses, `CAPABILITY`, `LIST`, `FLAGS`, message-count data and `FETCH`
//! results carrying UIDs and header sections.
//!
//! # Example
//!
//! ```
//! use mailsort_imap::parser::{Response, ResponseParser, UntaggedResponse};
//!
//! let response = ResponseParser::parse(b"* 4 EXISTS\r\n").unwrap();
//! assert_eq!(response, Response::Untagged(UntaggedResponse::Exists(4)));
//! ```

pub mod lexer;
pub mod response;

pub use lexer::{Lexer, Token};
pub use response::{FetchItem, Response, ResponseParser, UntaggedResponse};
