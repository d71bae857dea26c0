use std::fmt::{Display, Formatter};

use rust_decimal::Decimal;

use crate::form::FieldKey;
use crate::value::{EntityMap, FieldValue};

pub trait FormModel: Sized {
    type Fields;

    fn fields() -> Self::Fields;

    fn from_entity(entity: &EntityMap) -> Result<Self, EntityReadError>;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EntityReadError {
    pub field: FieldKey,
    pub expected: &'static str,
}

impl Display for EntityReadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "field {} cannot be read as {}",
            self.field, self.expected
        )
    }
}

impl std::error::Error for EntityReadError {}

pub trait FromFieldValue: Sized {
    const EXPECTED: &'static str;

    fn from_field_value(value: Option<&FieldValue>) -> Option<Self>;
}

impl FromFieldValue for String {
    const EXPECTED: &'static str = "text";

    fn from_field_value(value: Option<&FieldValue>) -> Option<Self> {
        match value? {
            FieldValue::Str(text) => Some(text.clone()),
            _ => None,
        }
    }
}

impl FromFieldValue for bool {
    const EXPECTED: &'static str = "flag";

    fn from_field_value(value: Option<&FieldValue>) -> Option<Self> {
        value?.as_bool()
    }
}

impl FromFieldValue for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_field_value(value: Option<&FieldValue>) -> Option<Self> {
        value?.as_i64()
    }
}

impl FromFieldValue for f64 {
    const EXPECTED: &'static str = "number";

    fn from_field_value(value: Option<&FieldValue>) -> Option<Self> {
        value?.as_f64()
    }
}

impl FromFieldValue for Decimal {
    const EXPECTED: &'static str = "decimal";

    fn from_field_value(value: Option<&FieldValue>) -> Option<Self> {
        value?.as_decimal()
    }
}

impl<T> FromFieldValue for Option<T>
where
    T: FromFieldValue,
{
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_field_value(value: Option<&FieldValue>) -> Option<Self> {
        match value {
            None | Some(FieldValue::Null) => Some(None),
            some => T::from_field_value(some).map(Some),
        }
    }
}

pub fn read_field<T>(entity: &EntityMap, field: FieldKey) -> Result<T, EntityReadError>
where
    T: FromFieldValue,
{
    T::from_field_value(entity.get(&field)).ok_or(EntityReadError {
        field,
        expected: T::EXPECTED,
    })
}
