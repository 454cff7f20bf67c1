//! Tests for the line framer

use super::*;

#[test]
fn test_single_line() {
    let mut decoder = SseDecoder::new();
    let lines = decoder.feed(b"data: {\"text\": \"hello\"}\n").unwrap();

    assert_eq!(lines, vec!["data: {\"text\": \"hello\"}"]);
    assert!(!decoder.has_remaining());
}

#[test]
fn test_blank_separator_lines_are_returned() {
    let mut decoder = SseDecoder::new();
    let lines = decoder.feed(b"data: first\n\ndata: second\n\n").unwrap();

    assert_eq!(lines, vec!["data: first", "", "data: second", ""]);
}

#[test]
fn test_partial_chunks() {
    let mut decoder = SseDecoder::new();

    let lines1 = decoder.feed(b"data: {\"ty").unwrap();
    assert!(lines1.is_empty());
    assert!(decoder.has_remaining());

    let lines2 = decoder.feed(b"pe\": \"delta\"}\n").unwrap();
    assert_eq!(lines2, vec!["data: {\"type\": \"delta\"}"]);
    assert!(!decoder.has_remaining());
}

#[test]
fn test_byte_at_a_time() {
    let input = b"data: one\ndata: two\n";
    let mut decoder = SseDecoder::new();
    let mut lines = Vec::new();

    for byte in input.iter() {
        lines.extend(decoder.feed(std::slice::from_ref(byte)).unwrap());
    }

    assert_eq!(lines, vec!["data: one", "data: two"]);
}

#[test]
fn test_windows_line_endings() {
    let mut decoder = SseDecoder::new();
    let lines = decoder.feed(b"data: value\r\n\r\n").unwrap();

    assert_eq!(lines, vec!["data: value", ""]);
}

#[test]
fn test_finish_flushes_trailing_line() {
    let mut decoder = SseDecoder::new();
    assert!(decoder.feed(b"data: [DONE]").unwrap().is_empty());

    assert_eq!(decoder.finish(), Some("data: [DONE]".to_string()));
    assert_eq!(decoder.finish(), None);
}

#[test]
fn test_finish_on_empty_buffer() {
    let mut decoder = SseDecoder::new();
    decoder.feed(b"data: x\n").unwrap();
    assert_eq!(decoder.finish(), None);
}

#[test]
fn test_unterminated_line_over_limit_fails() {
    let mut decoder = SseDecoder::with_max_line(8);
    assert!(decoder.feed(b"data: ab").unwrap().is_empty());

    let err = decoder.feed(b"cdef").unwrap_err();
    assert_eq!(err, LineTooLong { len: 12, max: 8 });
    assert!(!decoder.has_remaining());
}

#[test]
fn test_long_input_with_breaks_stays_within_limit() {
    let mut decoder = SseDecoder::with_max_line(8);
    let lines = decoder.feed(b"data: a\ndata: b\ndata: c\ndata").unwrap();

    assert_eq!(lines, vec!["data: a", "data: b", "data: c"]);
    assert!(decoder.has_remaining());
}

// ==================== UTF-8 Boundary Tests ====================

#[test]
fn test_utf8_2byte_split() {
    let mut decoder = SseDecoder::new();

    assert!(decoder.feed(b"data: caf\xC3").unwrap().is_empty());
    let lines = decoder.feed(b"\xA9\n").unwrap();

    assert_eq!(lines, vec!["data: café"]);
}

#[test]
fn test_utf8_4byte_emoji_split() {
    let emoji = "😄".as_bytes();
    let mut decoder = SseDecoder::new();

    let mut first = b"data: ".to_vec();
    first.extend_from_slice(&emoji[..2]);
    assert!(decoder.feed(&first).unwrap().is_empty());

    let mut second = emoji[2..].to_vec();
    second.extend_from_slice(b"\n");
    let lines = decoder.feed(&second).unwrap();

    assert_eq!(lines, vec!["data: 😄"]);
}

#[test]
fn test_invalid_utf8_is_replaced() {
    let mut decoder = SseDecoder::new();
    let lines = decoder.feed(b"data: \xFF\n").unwrap();

    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("data: "));
    assert!(lines[0].contains('\u{FFFD}'));
}
