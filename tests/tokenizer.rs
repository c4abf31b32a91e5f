use streamjson::{JsonReader, StrSource, TokenKind};
use pretty_assertions::assert_eq;

#[test]
fn flat_array_of_scalars() {
    let mut r = JsonReader::new(StrSource::new(r#"[1,"two",true,false,null,3.5]"#));
    r.begin_array().unwrap();
    assert_eq!(r.next_i32().unwrap(), 1, "should decode a cached long as an i32");
    assert_eq!(r.next_string().unwrap(), "two", "should decode a quoted string");
    assert_eq!(r.next_bool().unwrap(), true, "should decode `true`");
    assert_eq!(r.next_bool().unwrap(), false, "should decode `false`");
    r.next_null().unwrap();
    assert_eq!(r.next_f64().unwrap(), 3.5, "should decode a fractional literal");
    r.end_array().unwrap();
    assert_eq!(r.peek().unwrap(), TokenKind::Eof, "a single top-level value exhausts the document");
}

#[test]
fn nested_path_tracks_array_index_and_object_name() {
    let mut r = JsonReader::new(StrSource::new(r#"{"a":{"b":[10,20,99]}}"#));
    r.begin_object().unwrap();
    assert_eq!(r.next_name().unwrap(), "a");
    r.begin_object().unwrap();
    assert_eq!(r.next_name().unwrap(), "b");
    r.begin_array().unwrap();
    assert_eq!(r.next_i32().unwrap(), 10);
    assert_eq!(r.next_i32().unwrap(), 20);
    assert_eq!(r.path(), "$.a.b[2]", "path should report the array index about to be read");
    assert_eq!(r.next_i32().unwrap(), 99);
    r.end_array().unwrap();
    r.end_object().unwrap();
    r.end_object().unwrap();
}

#[test]
fn skip_value_descends_through_nested_containers() {
    let mut r = JsonReader::new(StrSource::new(r#"[{"a":[1,2,{"b":3}]},"next"]"#));
    r.begin_array().unwrap();
    r.skip_value().unwrap();
    assert_eq!(r.next_string().unwrap(), "next", "skip_value should land cleanly on the sibling value");
    r.end_array().unwrap();
}

#[test]
fn strict_mode_rejects_a_trailing_comma() {
    let mut r = JsonReader::new(StrSource::new("[1,2,]"));
    r.begin_array().unwrap();
    assert_eq!(r.next_i32().unwrap(), 1);
    assert_eq!(r.next_i32().unwrap(), 2);
    assert!(r.peek().is_err(), "strict mode should reject a trailing comma");
}

#[test]
fn large_integer_is_exact_as_a_string_and_lossy_as_a_double() {
    let text = "123456789012345678901234567890";
    let mut r = JsonReader::new(StrSource::new(text));
    assert_eq!(r.peek().unwrap(), TokenKind::Number, "an integer too big for i64 is a textual Number");
    assert_eq!(r.next_string().unwrap(), text, "its string form should round-trip exactly");

    let mut r2 = JsonReader::new(StrSource::new(text));
    let as_double = r2.next_f64().unwrap();
    assert_eq!(as_double, text.parse::<f64>().unwrap(), "reading it as f64 should match the textual parse");
}

#[test]
fn oversized_literal_without_lenient_mode_is_malformed() {
    let text = "9".repeat(4096);
    let mut r = JsonReader::new(StrSource::new(&text));
    assert!(r.peek().is_err(), "a literal longer than the lookahead window needs lenient mode to fall back");
}

#[test]
fn peek_without_consume_does_not_advance() {
    let mut r = JsonReader::new(StrSource::new("[1,2]"));
    r.begin_array().unwrap();
    let first = r.peek().unwrap();
    let second = r.peek().unwrap();
    assert_eq!(first, second, "repeated peek() without consume must be idempotent");
    assert_eq!(r.next_i32().unwrap(), 1, "the peeked token should still be there to consume");
}

#[test]
fn close_forbids_further_operations() {
    let mut r = JsonReader::new(StrSource::new("[1]"));
    r.close().unwrap();
    assert!(r.peek().is_err(), "peek() after close() should report a state error");
}

#[test]
fn leading_byte_order_mark_is_stripped_in_strict_mode() {
    let mut r = JsonReader::new(StrSource::new("\u{feff}{\"a\":1}"));
    r.begin_object().unwrap();
    assert_eq!(r.next_name().unwrap(), "a", "a leading BOM should never reach the grammar");
    assert_eq!(r.next_i32().unwrap(), 1);
    r.end_object().unwrap();
}
