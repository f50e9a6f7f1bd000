//! Wire encoding of command arguments.

use crate::types::Flag;

use super::FetchAttribute;

/// Appends `value` as an atom when it can be one, else as a quoted string.
pub fn write_astring(buf: &mut Vec<u8>, value: &str) {
    let bare = !value.is_empty() && value.bytes().all(is_plain);
    if bare {
        buf.extend_from_slice(value.as_bytes());
        return;
    }

    buf.push(b'"');
    for byte in value.bytes() {
        if matches!(byte, b'"' | b'\\') {
            buf.push(b'\\');
        }
        buf.push(byte);
    }
    buf.push(b'"');
}

/// Bytes that may be sent unquoted. `]` is excluded so a bare name is never
/// mistaken for the end of a response code.
const fn is_plain(byte: u8) -> bool {
    byte > 0x20
        && byte < 0x7F
        && !matches!(byte, b'"' | b'\\' | b'(' | b')' | b'{' | b'%' | b'*' | b']')
}

/// Appends a parenthesized, space-separated list.
fn write_list<T>(buf: &mut Vec<u8>, items: &[T], mut write: impl FnMut(&mut Vec<u8>, &T)) {
    buf.push(b'(');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            buf.push(b' ');
        }
        write(buf, item);
    }
    buf.push(b')');
}

/// Appends the FETCH item list; a single item goes without parentheses.
pub fn write_fetch_attributes(buf: &mut Vec<u8>, attributes: &[FetchAttribute]) {
    match attributes {
        [single] => write_fetch_attribute(buf, single),
        _ => write_list(buf, attributes, write_fetch_attribute),
    }
}

fn write_fetch_attribute(buf: &mut Vec<u8>, attribute: &FetchAttribute) {
    match attribute {
        FetchAttribute::Uid => buf.extend_from_slice(b"UID"),
        FetchAttribute::HeaderFields(names) => {
            buf.extend_from_slice(b"BODY.PEEK[HEADER.FIELDS ");
            write_list(buf, names, |buf, name| buf.extend_from_slice(name.as_bytes()));
            buf.push(b']');
        }
    }
}

/// Appends `+FLAGS.SILENT (<flags>)`.
pub fn write_add_flags(buf: &mut Vec<u8>, flags: &[Flag]) {
    buf.extend_from_slice(b"+FLAGS.SILENT ");
    write_list(buf, flags, |buf, flag| {
        buf.extend_from_slice(flag.as_str().as_bytes());
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn astring(value: &str) -> String {
        let mut buf = Vec::new();
        write_astring(&mut buf, value);
        String::from_utf8(buf).unwrap_or_default()
    }

    #[test]
    fn test_plain_names_go_bare() {
        assert_eq!(astring("INBOX.Received.alice"), "INBOX.Received.alice");
        assert_eq!(astring("user@example.com"), "user@example.com");
    }

    #[test]
    fn test_everything_else_is_quoted() {
        assert_eq!(astring(""), "\"\"");
        assert_eq!(astring("pass word"), "\"pass word\"");
        assert_eq!(astring("a\"b\\c"), "\"a\\\"b\\\\c\"");
        assert_eq!(astring("*"), "\"*\"");
        assert_eq!(astring("tab\there"), "\"tab\there\"");
    }

    #[test]
    fn test_several_header_fields() {
        let mut buf = Vec::new();
        write_fetch_attributes(
            &mut buf,
            &[FetchAttribute::HeaderFields(vec!["TO".into(), "CC".into()])],
        );
        assert_eq!(buf, b"BODY.PEEK[HEADER.FIELDS (TO CC)]");
    }
}
