use streamjson::{JsonReader, OrderedMap, StrSource};

fn main() {
    // Turn on debugging.
    // You can show it with `RUST_LOG=debug cargo run --example reader`
    env_logger::init();

    // Strictly tokenize a flat document.
    let mut r = JsonReader::new(StrSource::new(r#"{"a":1,"b":[true,null,"x"]}"#));
    r.begin_object().unwrap();
    while r.has_next().unwrap() {
        let name = r.next_name().unwrap();
        println!("name: {name} at {}", r.path());
        match name.as_str() {
            "a" => {
                println!("  value: {}", r.next_i32().unwrap());
            }
            "b" => {
                r.begin_array().unwrap();
                while r.has_next().unwrap() {
                    println!("  path: {} value: {:?}", r.path(), r.peek().unwrap());
                    r.skip_value().unwrap();
                }
                r.end_array().unwrap();
            }
            _ => r.skip_value().unwrap(),
        }
    }
    r.end_object().unwrap();

    // The lenient superset tolerates trailing commas, comments, unquoted
    // names, and the `)]}'\n` anti-hijacking prefix.
    let mut lenient = JsonReader::new(StrSource::new(
        ")]}'\n{unquoted: 'value', /* comment */ trailing: 1,}",
    ));
    lenient.set_lenient(true);
    lenient.begin_object().unwrap();
    while lenient.has_next().unwrap() {
        let name = lenient.next_name().unwrap();
        let value = lenient.next_string().unwrap();
        println!("{name} = {value}");
    }
    lenient.end_object().unwrap();

    // OrderedMap keeps entries in insertion order no matter how the
    // underlying hash table has to resize to fit them.
    let mut map: OrderedMap<String, i32> = OrderedMap::new();
    for (i, word) in "the quick brown fox jumps over the lazy dog".split_whitespace().enumerate() {
        map.insert(word.to_string(), i as i32);
    }
    for (word, index) in &map {
        println!("{word}: {index}");
    }
}
