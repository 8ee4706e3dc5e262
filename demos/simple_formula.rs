use decalc_rs::{evaluate_formula, Bindings};
use rust_decimal_macros::dec;

fn main() {
    pretty_env_logger::init();

    let bindings = Bindings::from([
        ("price".to_string(), dec!(12.50)),
        ("tax".to_string(), dec!(0.99)),
        ("quantity".to_string(), dec!(3)),
    ]);

    let formula = "round2((price + tax) * quantity)";
    match evaluate_formula(formula, &bindings) {
        Ok(result) => println!("{} = {}", formula, result),
        Err(err) => println!("Error: {}", err),
    }
}
