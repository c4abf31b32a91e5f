//! Round-trips arbitrary JSON documents through the tokenizer and checks the
//! values read back match the tree that was serialized.
use proptest::prelude::*;
use streamjson::{JsonReader, StrSource};

#[derive(Debug, Clone)]
enum Json {
    Null,
    Bool(bool),
    Int(i32),
    Str(String),
    Array(Vec<Json>),
    Object(Vec<(String, Json)>),
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

fn to_json_string(value: &Json, out: &mut String) {
    match value {
        Json::Null => out.push_str("null"),
        Json::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Json::Int(i) => out.push_str(&i.to_string()),
        Json::Str(s) => out.push_str(&escape(s)),
        Json::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                to_json_string(item, out);
            }
            out.push(']');
        }
        Json::Object(fields) => {
            out.push('{');
            for (i, (name, item)) in fields.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&escape(name));
                out.push(':');
                to_json_string(item, out);
            }
            out.push('}');
        }
    }
}

fn check(reader: &mut JsonReader<StrSource<'_>>, value: &Json) {
    match value {
        Json::Null => reader.next_null().unwrap(),
        Json::Bool(b) => assert_eq!(reader.next_bool().unwrap(), *b),
        Json::Int(i) => assert_eq!(reader.next_i32().unwrap(), *i),
        Json::Str(s) => assert_eq!(&reader.next_string().unwrap(), s),
        Json::Array(items) => {
            reader.begin_array().unwrap();
            for item in items {
                check(reader, item);
            }
            assert!(!reader.has_next().unwrap(), "extra elements beyond what was generated");
            reader.end_array().unwrap();
        }
        Json::Object(fields) => {
            reader.begin_object().unwrap();
            for (name, item) in fields {
                assert_eq!(&reader.next_name().unwrap(), name);
                check(reader, item);
            }
            assert!(!reader.has_next().unwrap(), "extra fields beyond what was generated");
            reader.end_object().unwrap();
        }
    }
}

fn safe_string() -> impl Strategy<Value = String> {
    proptest::collection::vec(0x20u8..0x7e, 0..12)
        .prop_map(|bytes| bytes.into_iter().map(char::from).collect())
}

fn json_strategy() -> impl Strategy<Value = Json> {
    let leaf = prop_oneof![
        Just(Json::Null),
        any::<bool>().prop_map(Json::Bool),
        any::<i32>().prop_map(Json::Int),
        safe_string().prop_map(Json::Str),
    ];
    leaf.prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..8).prop_map(Json::Array),
            proptest::collection::vec((safe_string(), inner), 0..8).prop_map(Json::Object),
        ]
    })
}

proptest! {
    #[test]
    fn arbitrary_documents_round_trip(value in json_strategy()) {
        let mut text = String::new();
        to_json_string(&value, &mut text);

        let mut reader = JsonReader::new(StrSource::new(&text));
        check(&mut reader, &value);
        prop_assert!(reader.close().is_ok());
    }

    #[test]
    fn arbitrary_documents_are_fully_skippable(value in json_strategy()) {
        let mut text = String::new();
        to_json_string(&value, &mut text);

        let mut reader = JsonReader::new(StrSource::new(&text));
        reader.skip_value().unwrap();
        prop_assert!(reader.close().is_ok());
    }
}
