//! Text <-> value coercion rules for every field kind.
//!
//! The same rules apply to query values, send-time params and declared defaults.

use std::ops::RangeInclusive;

use super::{FieldInfo, FieldKind, FieldValue};
use crate::enums::EnumFormatter;


pub const YES: &str = "yes";
pub const NO: &str = "no";

const LIST_SEPARATOR: char = ',';


/// Parses a boolean token, ignoring ASCII case.
///
/// Accepts `yes`/`true`/`1` and `no`/`false`/`0`; the empty string is `false`.
pub fn parse_bool(raw: &str) -> Option<bool> {
    const TRUTHY: [&str; 3] = [YES, "true", "1"];
    const FALSY: [&str; 4] = [NO, "false", "0", ""];

    if TRUTHY.iter().any(|token| token.eq_ignore_ascii_case(raw)) {
        Some(true)
    } else if FALSY.iter().any(|token| token.eq_ignore_ascii_case(raw)) {
        Some(false)
    } else {
        None
    }
}

#[inline]
pub fn format_bool(value: bool) -> &'static str {
    if value {
        YES
    } else {
        NO
    }
}

/// Parses a decimal integer with an optional leading `-` and checks it against `range`.
pub fn parse_int(raw: &str, range: &RangeInclusive<i64>) -> Result<i64, String> {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err("expected a decimal integer".to_string());
    }

    let value = raw
        .parse::<i64>()
        .map_err(|error| format!("integer out of bounds ({})", error))?;

    if !range.contains(&value) {
        return Err(format!(
            "expected an integer between {} and {}",
            range.start(),
            range.end()
        ));
    }

    Ok(value)
}

/// Splits a comma-joined list. The empty string is the empty list.
pub fn parse_list(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }

    raw.split(LIST_SEPARATOR).map(str::to_string).collect()
}

pub fn format_list(values: &[String]) -> String {
    values.join(&LIST_SEPARATOR.to_string())
}


/// Coerces `raw` into a value of `field`'s kind.
///
/// `formatter` must be present for enum fields; the schema guarantees that.
pub(crate) fn parse_value(
    field: &FieldInfo,
    raw: &str,
    formatter: Option<&dyn EnumFormatter>,
) -> Result<FieldValue, String> {
    match field.kind {
        FieldKind::Text => Ok(FieldValue::Text(raw.to_string())),
        FieldKind::Bool => parse_bool(raw)
            .map(FieldValue::Bool)
            .ok_or_else(|| "expected one of yes, no, true, false, 1 or 0".to_string()),
        FieldKind::Int => parse_int(raw, &field.range).map(FieldValue::Int),
        FieldKind::List => Ok(FieldValue::List(parse_list(raw))),
        FieldKind::Enum => {
            let formatter = formatter.ok_or_else(|| "no enum formatter registered".to_string())?;

            formatter.parse(raw).map(FieldValue::Enum).ok_or_else(|| {
                format!("expected one of {}", formatter.names().join(", "))
            })
        }
    }
}

/// Renders a value back into its canonical text.
pub(crate) fn format_value(value: &FieldValue, formatter: Option<&dyn EnumFormatter>) -> String {
    match value {
        FieldValue::Text(text) => text.clone(),
        FieldValue::Bool(value) => format_bool(*value).to_string(),
        FieldValue::Int(value) => value.to_string(),
        FieldValue::List(values) => format_list(values),
        FieldValue::Enum(ordinal) => match formatter {
            Some(formatter) => formatter.format(*ordinal),
            None => ordinal.to_string(),
        },
    }
}



#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_tokens() {
        for token in ["yes", "YES", "Yes", "true", "TRUE", "1"] {
            assert_eq!(parse_bool(token), Some(true), "token {:?}", token);
        }
    }

    #[test]
    fn falsy_tokens() {
        for token in ["no", "NO", "false", "False", "0", ""] {
            assert_eq!(parse_bool(token), Some(false), "token {:?}", token);
        }
    }

    #[test]
    fn unknown_bool_tokens_are_rejected() {
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool("on"), None);
        assert_eq!(parse_bool(" yes"), None);
    }

    #[test]
    fn booleans_render_as_yes_no() {
        assert_eq!(format_bool(true), "yes");
        assert_eq!(format_bool(false), "no");
    }

    #[test]
    fn integers() {
        let any = i64::MIN..=i64::MAX;

        assert_eq!(parse_int("42", &any), Ok(42));
        assert_eq!(parse_int("-7", &any), Ok(-7));
        assert!(parse_int("+7", &any).is_err());
        assert!(parse_int("", &any).is_err());
        assert!(parse_int("-", &any).is_err());
        assert!(parse_int("1.5", &any).is_err());
        assert!(parse_int("99999999999999999999", &any).is_err());
    }

    #[test]
    fn integer_ranges() {
        let port = 1..=65535;

        assert_eq!(parse_int("1883", &port), Ok(1883));
        assert!(parse_int("0", &port).is_err());
        assert!(parse_int("65536", &port).is_err());
    }

    #[test]
    fn lists() {
        assert_eq!(parse_list(""), Vec::<String>::new());
        assert_eq!(parse_list("a,b"), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(
            format_list(&["a".to_string(), "b".to_string()]),
            "a,b"
        );
    }

    #[test]
    fn text_values_are_taken_verbatim() {
        let field = FieldInfo::new("Title", FieldKind::Text);

        assert_eq!(
            parse_value(&field, " spaced ", None),
            Ok(FieldValue::Text(" spaced ".to_string()))
        );
    }

    #[test]
    fn enum_values_without_formatter_fail() {
        let field = FieldInfo::new("Level", FieldKind::Enum);

        assert!(parse_value(&field, "High", None).is_err());
        assert_eq!(format_value(&FieldValue::Enum(3), None), "3");
    }
}
