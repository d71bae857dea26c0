use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::binding::{DecimalArgs, IntArgs, NumberArgs};
use crate::config::Coercer;
use crate::value::FieldValue;

pub fn int(args: IntArgs) -> Coercer {
    Arc::new(move |value, _selector, _entity| {
        let text = value.to_string();
        if !is_integer_text(&text) {
            return None;
        }
        let radix = args.radix.unwrap_or(10);
        // i64::from_str_radix panics outside 2..=36
        if !(2..=36).contains(&radix) {
            return None;
        }
        let parsed = i64::from_str_radix(&text, radix).ok()?;
        if let Some(min) = args.min
            && parsed <= min
        {
            return None;
        }
        if let Some(max) = args.max
            && parsed >= max
        {
            return None;
        }
        Some((FieldValue::Str(text), FieldValue::Int(parsed)))
    })
}

pub fn float(args: NumberArgs) -> Coercer {
    Arc::new(move |value, _selector, _entity| {
        let text = value.to_string();
        if !is_float_text(&text) {
            return None;
        }
        let parsed = f64::from_str(&text).ok()?;
        if let Some(min) = args.min
            && parsed <= min
        {
            return None;
        }
        if let Some(max) = args.max
            && parsed >= max
        {
            return None;
        }
        Some((FieldValue::Str(text), FieldValue::Float(parsed)))
    })
}

pub fn decimal(args: DecimalArgs) -> Coercer {
    Arc::new(move |value, _selector, _entity| {
        let text = value.to_string();
        if !is_float_text(&text) {
            return None;
        }
        // Decimal rejects a bare trailing dot
        let parsed = Decimal::from_str(text.trim_end_matches('.')).ok()?;
        if let Some(min) = args.min
            && parsed <= min
        {
            return None;
        }
        if let Some(max) = args.max
            && parsed >= max
        {
            return None;
        }
        Some((FieldValue::Str(text), FieldValue::Decimal(parsed)))
    })
}

fn is_integer_text(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|byte| byte.is_ascii_digit())
}

fn is_float_text(text: &str) -> bool {
    match text.split_once('.') {
        None => is_integer_text(text),
        Some((whole, frac)) => {
            is_integer_text(whole) && frac.bytes().all(|byte| byte.is_ascii_digit())
        }
    }
}
