use std::sync::Arc;

use rust_decimal::Decimal;

use crate::adapter::{BindAdapter, BindArgs, FieldBlurFn, FieldChangeFn};
use crate::coerce;
use crate::config::{EventParser, FieldConfig, Validator};
use crate::event::ChangeEvent;
use crate::form::{
    FieldKey, Form, FormError, FormResult, emit_change, note_blur, read_lock, write_lock,
};

#[derive(Clone)]
pub enum BindSpec {
    Parser(EventParser),
    Validators(Vec<Validator>),
    Config(FieldConfig),
}

impl BindSpec {
    fn into_config(self) -> FieldConfig {
        match self {
            BindSpec::Parser(parser) => FieldConfig {
                event_parser: Some(parser),
                ..FieldConfig::default()
            },
            BindSpec::Validators(validators) => FieldConfig {
                validators,
                ..FieldConfig::default()
            },
            BindSpec::Config(config) => config,
        }
    }
}

#[derive(Clone)]
pub enum BindInput {
    Key(FieldKey),
    Entry(FieldKey, BindSpec),
    Map(Vec<(FieldKey, BindSpec)>),
}

impl From<FieldKey> for BindInput {
    fn from(selector: FieldKey) -> Self {
        Self::Key(selector)
    }
}

impl From<&'static str> for BindInput {
    fn from(selector: &'static str) -> Self {
        Self::Key(FieldKey::new(selector))
    }
}

impl From<(FieldKey, FieldConfig)> for BindInput {
    fn from((selector, config): (FieldKey, FieldConfig)) -> Self {
        Self::Entry(selector, BindSpec::Config(config))
    }
}

impl From<(&'static str, FieldConfig)> for BindInput {
    fn from((selector, config): (&'static str, FieldConfig)) -> Self {
        Self::Entry(FieldKey::new(selector), BindSpec::Config(config))
    }
}

impl From<(FieldKey, Vec<Validator>)> for BindInput {
    fn from((selector, validators): (FieldKey, Vec<Validator>)) -> Self {
        Self::Entry(selector, BindSpec::Validators(validators))
    }
}

impl From<(&'static str, Vec<Validator>)> for BindInput {
    fn from((selector, validators): (&'static str, Vec<Validator>)) -> Self {
        Self::Entry(FieldKey::new(selector), BindSpec::Validators(validators))
    }
}

impl From<(FieldKey, EventParser)> for BindInput {
    fn from((selector, parser): (FieldKey, EventParser)) -> Self {
        Self::Entry(selector, BindSpec::Parser(parser))
    }
}

impl From<(&'static str, EventParser)> for BindInput {
    fn from((selector, parser): (&'static str, EventParser)) -> Self {
        Self::Entry(FieldKey::new(selector), BindSpec::Parser(parser))
    }
}

impl From<Vec<(FieldKey, BindSpec)>> for BindInput {
    fn from(entries: Vec<(FieldKey, BindSpec)>) -> Self {
        Self::Map(entries)
    }
}

pub(crate) fn normalize(input: BindInput) -> FormResult<(FieldKey, Option<FieldConfig>)> {
    match input {
        BindInput::Key(selector) => Ok((selector, None)),
        BindInput::Entry(selector, spec) => Ok((selector, Some(spec.into_config()))),
        BindInput::Map(mut entries) => {
            if entries.len() != 1 {
                return Err(FormError::InvalidBindingInput(entries.len()));
            }
            let Some((selector, spec)) = entries.pop() else {
                return Err(FormError::InvalidBindingInput(0));
            };
            Ok((selector, Some(spec.into_config())))
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct IntArgs {
    pub radix: Option<u32>,
    pub min: Option<i64>,
    pub max: Option<i64>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NumberArgs {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DecimalArgs {
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

impl<A> Form<A>
where
    A: BindAdapter,
{
    pub fn bind(&self, input: impl Into<BindInput>) -> FormResult<A::Props> {
        let (selector, config) = normalize(input.into())?;
        self.bind_field(selector, config)
    }

    pub fn bind_int(&self, input: impl Into<BindInput>, args: IntArgs) -> FormResult<A::Props> {
        let (selector, config) = normalize(input.into())?;
        let config = config.unwrap_or_default().coercer(coerce::int(args));
        self.bind_field(selector, Some(config))
    }

    pub fn bind_float(
        &self,
        input: impl Into<BindInput>,
        args: NumberArgs,
    ) -> FormResult<A::Props> {
        let (selector, config) = normalize(input.into())?;
        let config = config.unwrap_or_default().coercer(coerce::float(args));
        self.bind_field(selector, Some(config))
    }

    pub fn bind_decimal(
        &self,
        input: impl Into<BindInput>,
        args: DecimalArgs,
    ) -> FormResult<A::Props> {
        let (selector, config) = normalize(input.into())?;
        let config = config.unwrap_or_default().coercer(coerce::decimal(args));
        self.bind_field(selector, Some(config))
    }

    pub fn bind_nullable(&self, input: impl Into<BindInput>) -> FormResult<A::Props> {
        let (selector, config) = normalize(input.into())?;
        let config = config.unwrap_or_default().nullable();
        self.bind_field(selector, Some(config))
    }

    fn bind_field(&self, selector: FieldKey, config: Option<FieldConfig>) -> FormResult<A::Props> {
        {
            let mut registry = write_lock(&self.core.registry, "recording bound field")?;
            registry.record(selector, config.clone());
        }
        let (live, errors) = {
            let state = read_lock(&self.core.state, "reading live state for binding")?;
            (state.live.clone(), state.errors.clone())
        };
        let change: FieldChangeFn = {
            let core = self.core.clone();
            let config = config.clone();
            Arc::new(move |event: ChangeEvent| {
                drop(emit_change(&core, event, selector, config.as_ref()));
            })
        };
        let blur: FieldBlurFn = {
            let core = self.core.clone();
            Arc::new(move || {
                drop(note_blur(&core));
            })
        };
        let args = BindArgs {
            selector,
            config: config.as_ref(),
            entity: &live,
            errors: &errors,
            field_change: &change,
            field_blur: &blur,
        };
        Ok(self.adapter.adapt(args))
    }
}
