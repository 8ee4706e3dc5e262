use decalc_rs::{bindings_from_fields, compile_formula, FieldValue};

fn main() {
    pretty_env_logger::init();

    // One pricing formula, many records: compile once, run per record.
    let compiled = compile_formula("(base + surcharge) * rate - discount").expect("valid formula");

    let records = vec![
        vec![
            ("base", FieldValue::from("100.00")),
            ("surcharge", FieldValue::from(2.5)),
            ("rate", FieldValue::from("1.19")),
            ("discount", FieldValue::from(0_i64)),
        ],
        vec![
            ("base", FieldValue::from("249.99")),
            ("surcharge", FieldValue::from(0.0)),
            ("rate", FieldValue::from("1.07")),
            ("discount", FieldValue::from(10_i64)),
        ],
    ];

    for (index, record) in records.into_iter().enumerate() {
        let bindings = bindings_from_fields(record).expect("convertible record");
        match compiled.run(&bindings) {
            Ok(result) => println!("record {}: {}", index, result),
            Err(err) => println!("record {}: error: {}", index, err),
        }
    }
}
