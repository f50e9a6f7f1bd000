//! Splits the byte stream into responses.
//!
//! A response is a CRLF-terminated line, except that a line ending in
//! `{n}` announces `n` raw bytes followed by more of the same response.

#![allow(clippy::missing_errors_doc)]

use std::io;

use bytes::BytesMut;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::{Error, Result};

const READ_BUFFER: usize = 8 * 1024;

/// Longest line accepted before a literal or CRLF shows up.
const MAX_LINE_LENGTH: usize = 1024 * 1024;

/// Largest literal accepted. Header sections are far below this.
const MAX_LITERAL_SIZE: usize = 16 * 1024 * 1024;

/// Buffered reader and writer of whole responses and commands.
pub struct FramedStream<S> {
    inner: BufReader<S>,
    response: BytesMut,
}

impl<S> FramedStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps `stream`.
    pub fn new(stream: S) -> Self {
        Self {
            inner: BufReader::with_capacity(READ_BUFFER, stream),
            response: BytesMut::with_capacity(READ_BUFFER),
        }
    }

    /// Reads one complete response, literals included.
    pub async fn read_response(&mut self) -> Result<Vec<u8>> {
        self.response.clear();

        loop {
            let line_start = self.response.len();
            self.read_line().await?;

            let Some(size) = parse_literal_length(&self.response[line_start..]) else {
                break;
            };
            if size > MAX_LITERAL_SIZE {
                return Err(Error::Protocol(format!(
                    "literal too large: {size} bytes, limit {MAX_LITERAL_SIZE}"
                )));
            }

            let literal_start = self.response.len();
            self.response.resize(literal_start + size, 0);
            self.inner
                .read_exact(&mut self.response[literal_start..])
                .await?;
        }

        Ok(self.response.to_vec())
    }

    /// Appends bytes up to and including the next CRLF to `self.response`.
    async fn read_line(&mut self) -> Result<()> {
        let mut taken = 0;
        loop {
            let available = self.inner.fill_buf().await?;
            if available.is_empty() {
                return Err(Error::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "server closed the connection",
                )));
            }

            let (chunk, done) = match available.iter().position(|&b| b == b'\n') {
                Some(lf) => (&available[..=lf], true),
                None => (available, false),
            };
            let len = chunk.len();
            self.response.extend_from_slice(chunk);
            self.inner.consume(len);
            taken += len;

            if done && self.response.ends_with(b"\r\n") {
                return Ok(());
            }
            if taken > MAX_LINE_LENGTH {
                return Err(Error::Protocol("line too long".to_string()));
            }
        }
    }

    /// Sends one serialized command.
    pub async fn write_command(&mut self, data: &[u8]) -> Result<()> {
        let stream = self.inner.get_mut();
        stream.write_all(data).await?;
        stream.flush().await?;
        Ok(())
    }

    /// Gives back the stream. Unread buffered bytes are dropped, which is
    /// what STARTTLS requires.
    pub fn into_inner(self) -> S {
        self.inner.into_inner()
    }
}

/// Size announced by a trailing `{n}` or `{n+}` on a line.
fn parse_literal_length(line: &[u8]) -> Option<usize> {
    let body = line.strip_suffix(b"}\r\n")?;
    let body = body.strip_suffix(b"+").unwrap_or(body);
    let open = body.iter().rposition(|&b| b == b'{')?;
    let digits = &body[open + 1..];

    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(digits).ok()?.parse().ok()
}

/// Collects responses up to and including the tagged completion of a command.
pub struct ResponseAccumulator {
    tag: String,
    responses: Vec<Vec<u8>>,
}

impl ResponseAccumulator {
    /// Creates a new response accumulator for the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            responses: Vec::new(),
        }
    }

    /// Reads responses until the one tagged with our tag arrives.
    pub async fn read_until_tagged<S>(
        &mut self,
        framed: &mut FramedStream<S>,
    ) -> Result<Vec<Vec<u8>>>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        loop {
            let response = framed.read_response().await?;
            let done = self.is_completion(&response);
            self.responses.push(response);

            if done {
                return Ok(std::mem::take(&mut self.responses));
            }
        }
    }

    fn is_completion(&self, response: &[u8]) -> bool {
        response
            .strip_prefix(self.tag.as_bytes())
            .is_some_and(|rest| rest.first() == Some(&b' '))
    }
}
