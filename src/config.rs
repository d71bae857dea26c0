use std::sync::Arc;

use crate::entity::EntityState;
use crate::event::ChangeEvent;
use crate::form::FieldKey;
use crate::value::{EntityMap, FieldValue};

pub type Coercer =
    Arc<dyn Fn(&FieldValue, FieldKey, &EntityMap) -> Option<(FieldValue, FieldValue)> + Send + Sync>;

pub type EventParser = Arc<dyn Fn(&ChangeEvent) -> FieldValue + Send + Sync>;

pub type Validator = Arc<dyn Fn(ValidatorArgs<'_>) -> Option<String> + Send + Sync>;

pub struct ValidatorArgs<'a> {
    pub value: &'a FieldValue,
    pub entity: &'a EntityState,
    pub selector: FieldKey,
}

#[derive(Clone, Default)]
pub struct FieldConfig {
    pub default_value: Option<FieldValue>,
    pub coercer: Option<Coercer>,
    pub event_parser: Option<EventParser>,
    pub validators: Vec<Validator>,
}

impl FieldConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn nullable(mut self) -> Self {
        self.default_value = Some(FieldValue::Null);
        self
    }

    pub fn coercer(mut self, coercer: Coercer) -> Self {
        self.coercer = Some(coercer);
        self
    }

    pub fn event_parser<F>(mut self, parser: F) -> Self
    where
        F: Fn(&ChangeEvent) -> FieldValue + Send + Sync + 'static,
    {
        self.event_parser = Some(Arc::new(parser));
        self
    }

    pub fn validator<F>(mut self, validator: F) -> Self
    where
        F: for<'a> Fn(ValidatorArgs<'a>) -> Option<String> + Send + Sync + 'static,
    {
        self.validators.push(Arc::new(validator));
        self
    }

    pub fn validators(mut self, validators: Vec<Validator>) -> Self {
        self.validators.extend(validators);
        self
    }
}
