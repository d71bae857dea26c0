use std::sync::Arc;

use crate::config::{Validator, ValidatorArgs};
use crate::value::FieldValue;

pub const REQUIRED_MESSAGE: &str = "this field is required";
pub const INT_MESSAGE: &str = "must be a whole number";
pub const FLOAT_MESSAGE: &str = "must be a number";

pub fn required() -> Validator {
    required_with(REQUIRED_MESSAGE)
}

pub fn required_with(message: impl Into<String>) -> Validator {
    let message = message.into();
    Arc::new(move |args: ValidatorArgs<'_>| is_missing(args.value).then(|| message.clone()))
}

pub fn min_len(min: usize) -> Validator {
    min_len_with(min, format!("must be at least {min} characters long"))
}

pub fn min_len_with(min: usize, message: impl Into<String>) -> Validator {
    let message = message.into();
    Arc::new(move |args: ValidatorArgs<'_>| {
        let length = args.value.to_string().chars().count();
        (length < min).then(|| message.clone())
    })
}

pub fn max_len(max: usize) -> Validator {
    max_len_with(max, format!("must be at most {max} characters long"))
}

pub fn max_len_with(max: usize, message: impl Into<String>) -> Validator {
    let message = message.into();
    Arc::new(move |args: ValidatorArgs<'_>| {
        let length = args.value.to_string().chars().count();
        (length > max).then(|| message.clone())
    })
}

pub fn int_like() -> Validator {
    int_like_with(INT_MESSAGE)
}

pub fn int_like_with(message: impl Into<String>) -> Validator {
    let message = message.into();
    Arc::new(move |args: ValidatorArgs<'_>| {
        let ok = match args.value {
            FieldValue::Int(_) => true,
            FieldValue::Float(value) => value.fract() == 0.0,
            FieldValue::Decimal(value) => value.is_integer(),
            FieldValue::Str(text) => text.parse::<i64>().is_ok(),
            _ => false,
        };
        (!ok).then(|| message.clone())
    })
}

pub fn float_like() -> Validator {
    float_like_with(FLOAT_MESSAGE)
}

pub fn float_like_with(message: impl Into<String>) -> Validator {
    let message = message.into();
    Arc::new(move |args: ValidatorArgs<'_>| {
        let ok = match args.value {
            FieldValue::Int(_) | FieldValue::Float(_) | FieldValue::Decimal(_) => true,
            FieldValue::Str(text) => text.parse::<f64>().is_ok(),
            _ => false,
        };
        (!ok).then(|| message.clone())
    })
}

fn is_missing(value: &FieldValue) -> bool {
    match value {
        FieldValue::Null => true,
        FieldValue::Str(text) => text.trim().is_empty(),
        FieldValue::Bool(flag) => !*flag,
        FieldValue::Int(value) => *value == 0,
        FieldValue::Float(value) => *value == 0.0,
        FieldValue::Decimal(value) => value.is_zero(),
        FieldValue::List(items) => items.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::entity::EntityState;
    use crate::form::FieldKey;

    fn check(validator: &Validator, value: FieldValue) -> Option<String> {
        let entity = EntityState::new();
        validator(ValidatorArgs {
            value: &value,
            entity: &entity,
            selector: FieldKey::new("field"),
        })
    }

    #[test]
    fn required_rejects_empty_shapes() {
        let validator = required();
        assert!(check(&validator, FieldValue::Null).is_some());
        assert!(check(&validator, FieldValue::Str(String::new())).is_some());
        assert!(check(&validator, FieldValue::Str("  ".into())).is_some());
        assert!(check(&validator, FieldValue::Bool(false)).is_some());
        assert_eq!(check(&validator, FieldValue::Str("x".into())), None);
        assert_eq!(check(&validator, FieldValue::Bool(true)), None);
        assert_eq!(check(&validator, FieldValue::Int(1)), None);
    }

    #[test]
    fn length_checks_count_characters() {
        let min = min_len(3);
        assert!(check(&min, FieldValue::Str("ab".into())).is_some());
        assert_eq!(check(&min, FieldValue::Str("abc".into())), None);
        assert!(check(&min, FieldValue::Null).is_some());

        let max = max_len(3);
        assert!(check(&max, FieldValue::Str("abcd".into())).is_some());
        assert_eq!(check(&max, FieldValue::Str("abc".into())), None);
        assert_eq!(check(&max, FieldValue::Null), None);
    }

    #[test]
    fn int_like_accepts_whole_numbers_only() {
        let validator = int_like();
        assert_eq!(check(&validator, FieldValue::Int(5)), None);
        assert_eq!(check(&validator, FieldValue::Float(2.0)), None);
        assert_eq!(check(&validator, FieldValue::Str("12".into())), None);
        assert_eq!(check(&validator, FieldValue::Decimal(Decimal::from(3))), None);
        assert!(check(&validator, FieldValue::Float(2.5)).is_some());
        assert!(check(&validator, FieldValue::Str("1.5".into())).is_some());
        assert!(check(&validator, FieldValue::Bool(true)).is_some());
    }

    #[test]
    fn custom_messages_replace_the_defaults() {
        let validator = required_with("give us a name");
        assert_eq!(
            check(&validator, FieldValue::Null).as_deref(),
            Some("give us a name")
        );
        assert_eq!(check(&validator, FieldValue::Str("x".into())), None);

        let validator = min_len_with(3, "too short for a postcode");
        assert_eq!(
            check(&validator, FieldValue::Str("ab".into())).as_deref(),
            Some("too short for a postcode")
        );

        let validator = max_len_with(3, "keep it brief");
        assert_eq!(
            check(&validator, FieldValue::Str("abcd".into())).as_deref(),
            Some("keep it brief")
        );

        let validator = int_like_with("whole units only");
        assert_eq!(
            check(&validator, FieldValue::Float(2.5)).as_deref(),
            Some("whole units only")
        );

        let validator = float_like_with("not a price");
        assert_eq!(
            check(&validator, FieldValue::Str("x".into())).as_deref(),
            Some("not a price")
        );
    }

    #[test]
    fn float_like_accepts_numeric_text() {
        let validator = float_like();
        assert_eq!(check(&validator, FieldValue::Str("1.5".into())), None);
        assert_eq!(check(&validator, FieldValue::Float(0.25)), None);
        assert_eq!(
            check(&validator, FieldValue::Decimal(Decimal::new(15, 1))),
            None
        );
        assert!(check(&validator, FieldValue::Str("x".into())).is_some());
        assert!(check(&validator, FieldValue::Null).is_some());
    }
}
