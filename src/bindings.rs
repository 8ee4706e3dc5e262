use crate::error::BindingError;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

/// Variable name to decimal value, case-sensitive. Supplied fresh per
/// evaluation call and never mutated or retained by the evaluators.
pub type Bindings = HashMap<String, Decimal>;

/// One field of a caller record, before conversion into the decimal domain.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Decimal(Decimal),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        FieldValue::Decimal(value)
    }
}

/// Converts a record of named fields into a binding map.
///
/// Textual fields are parsed as decimal literals and numeric fields are
/// converted; field names become binding names verbatim. One inconvertible
/// field fails the whole call.
pub fn bindings_from_fields<I, K, V>(fields: I) -> Result<Bindings, BindingError>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<FieldValue>,
{
    let mut bindings = Bindings::new();
    for (name, value) in fields {
        let name = name.into();
        let value = match value.into() {
            FieldValue::Text(text) => {
                Decimal::from_str(text.trim()).map_err(|source| BindingError::Conversion {
                    field: name.clone(),
                    source,
                })?
            }
            FieldValue::Integer(number) => Decimal::from(number),
            FieldValue::Float(number) => Decimal::from_f64(number)
                .ok_or_else(|| BindingError::OutOfRange { field: name.clone() })?,
            FieldValue::Decimal(number) => number,
        };
        bindings.insert(name, value);
    }
    Ok(bindings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_converts_mixed_field_types() {
        let bindings = bindings_from_fields([
            ("price", FieldValue::Text("12.50".to_string())),
            ("quantity", FieldValue::Integer(3)),
            ("rate", FieldValue::Float(0.25)),
            ("fee", FieldValue::Decimal(dec!(1.99))),
        ])
        .unwrap();

        assert_eq!(bindings["price"], dec!(12.50));
        assert_eq!(bindings["quantity"], dec!(3));
        assert_eq!(bindings["rate"], dec!(0.25));
        assert_eq!(bindings["fee"], dec!(1.99));
    }

    #[test]
    fn test_field_names_are_kept_verbatim() {
        let bindings = bindings_from_fields([("Rate", "1"), ("rate", "2")]).unwrap();
        assert_eq!(bindings["Rate"], dec!(1));
        assert_eq!(bindings["rate"], dec!(2));
    }

    #[test]
    fn test_unparseable_text_fails_the_whole_call() {
        let result = bindings_from_fields([("good", "1.5"), ("bad", "12,5")]);
        assert!(matches!(
            result,
            Err(BindingError::Conversion { field, .. }) if field == "bad"
        ));
    }

    #[test]
    fn test_non_finite_float_is_rejected() {
        let result = bindings_from_fields([("x", f64::NAN)]);
        assert!(matches!(
            result,
            Err(BindingError::OutOfRange { field }) if field == "x"
        ));
    }

    #[test]
    fn test_textual_whitespace_is_trimmed() {
        let bindings = bindings_from_fields([("x", " 42.0 ")]).unwrap();
        assert_eq!(bindings["x"], dec!(42));
    }
}
