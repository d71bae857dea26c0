use std::sync::Arc;

use crate::config::FieldConfig;
use crate::entity::EntityState;
use crate::event::ChangeEvent;
use crate::form::FieldKey;
use crate::validate::ValidationErrors;
use crate::value::FieldValue;

pub type FieldChangeFn = Arc<dyn Fn(ChangeEvent) + Send + Sync>;
pub type FieldBlurFn = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone)]
pub struct BoundField {
    pub data_key: FieldKey,
    pub value: FieldValue,
    pub on_change: FieldChangeFn,
    pub on_blur: FieldBlurFn,
}

impl BoundField {
    pub fn change(&self, event: ChangeEvent) {
        (self.on_change)(event);
    }

    pub fn write(&self, value: impl Into<FieldValue>) {
        self.change(ChangeEvent::input(value));
    }

    pub fn blur(&self) {
        (self.on_blur)();
    }
}

pub struct BindArgs<'a> {
    pub selector: FieldKey,
    pub config: Option<&'a FieldConfig>,
    pub entity: &'a EntityState,
    pub errors: &'a ValidationErrors,
    pub field_change: &'a FieldChangeFn,
    pub field_blur: &'a FieldBlurFn,
}

impl BindArgs<'_> {
    pub fn base(&self) -> BoundField {
        let fallback = self
            .config
            .and_then(|config| config.default_value.clone())
            .unwrap_or_default();
        let value = self
            .entity
            .display_of(self.selector)
            .filter(|value| !value.is_null())
            .or_else(|| {
                self.entity
                    .value_of(self.selector)
                    .filter(|value| !value.is_null())
            })
            .cloned()
            .unwrap_or(fallback);
        BoundField {
            data_key: self.selector,
            value,
            on_change: self.field_change.clone(),
            on_blur: self.field_blur.clone(),
        }
    }
}

pub trait BindAdapter: Send + Sync + 'static {
    type Props;

    fn adapt(&self, args: BindArgs<'_>) -> Self::Props;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultBindAdapter;

impl BindAdapter for DefaultBindAdapter {
    type Props = BoundField;

    fn adapt(&self, args: BindArgs<'_>) -> BoundField {
        args.base()
    }
}

#[derive(Clone)]
pub struct AnnotatedProps {
    pub name: String,
    pub error: bool,
    pub helper_text: Option<String>,
    pub base: BoundField,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AnnotatedBindAdapter;

impl BindAdapter for AnnotatedBindAdapter {
    type Props = AnnotatedProps;

    fn adapt(&self, args: BindArgs<'_>) -> AnnotatedProps {
        let errors = args.errors.field(args.selector);
        AnnotatedProps {
            name: args.selector.to_string(),
            error: errors.is_some(),
            helper_text: errors.and_then(|messages| messages.first().cloned()),
            base: args.base(),
        }
    }
}
