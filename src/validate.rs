use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::{Validator, ValidatorArgs};
use crate::entity::EntityState;
use crate::form::{
    FieldKey, FormCore, FormError, FormResult, fire_validation_hook, read_lock, write_lock,
};
use crate::registry::FieldRecord;
use crate::value::FieldValue;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ValidationErrors {
    entries: BTreeMap<FieldKey, Vec<String>>,
}

impl ValidationErrors {
    pub const FORM_KEY: FieldKey = FieldKey::new("_form_errors");

    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&self, selector: FieldKey) -> Option<&[String]> {
        self.entries.get(&selector).map(Vec::as_slice)
    }

    pub fn set_field(&mut self, selector: FieldKey, errors: Vec<String>) {
        if errors.is_empty() {
            self.entries.remove(&selector);
        } else {
            self.entries.insert(selector, errors);
        }
    }

    pub fn clear_field(&mut self, selector: FieldKey) {
        self.entries.remove(&selector);
    }

    pub fn form_errors(&self) -> Option<&[String]> {
        self.field(Self::FORM_KEY)
    }

    pub fn set_form_errors(&mut self, errors: Vec<String>) {
        self.set_field(Self::FORM_KEY, errors);
    }

    pub fn contains(&self, selector: FieldKey) -> bool {
        self.entries.contains_key(&selector)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &[String])> {
        self.entries
            .iter()
            .map(|(selector, errors)| (*selector, errors.as_slice()))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValidateTarget {
    Field(FieldKey),
    All,
    Touched,
}

impl From<FieldKey> for ValidateTarget {
    fn from(selector: FieldKey) -> Self {
        Self::Field(selector)
    }
}

pub(crate) fn run_validators(
    validators: &[Validator],
    value: &FieldValue,
    entity: &EntityState,
    selector: FieldKey,
) -> Vec<String> {
    validators
        .iter()
        .filter_map(|validator| {
            validator(ValidatorArgs {
                value,
                entity,
                selector,
            })
        })
        .filter(|message| !message.is_empty())
        .collect()
}

pub(crate) fn validate_core(
    core: &Arc<FormCore>,
    target: ValidateTarget,
    dry_run: bool,
) -> FormResult<bool> {
    let published = {
        let state = read_lock(&core.state, "reading settled snapshot for validation")?;
        if !dry_run && state.closed {
            return Err(FormError::FormClosed);
        }
        state.published.clone()
    };
    let selected: Vec<(FieldKey, FieldRecord)> = {
        let registry = read_lock(&core.registry, "listing fields for validation")?;
        match target {
            ValidateTarget::Field(selector) => {
                vec![(
                    selector,
                    registry.get(selector).cloned().unwrap_or_default(),
                )]
            }
            ValidateTarget::All => registry.list(false),
            ValidateTarget::Touched => registry.list(true),
        }
    };

    let null = FieldValue::Null;
    let mut all_valid = true;
    let mut results = Vec::with_capacity(selected.len());
    for (selector, record) in &selected {
        let resolved = published
            .value
            .get(selector)
            .filter(|value| !value.is_null())
            .or_else(|| published.display.get(selector))
            .unwrap_or(&null);
        let errors = run_validators(&record.config.validators, resolved, &published, *selector);
        all_valid &= errors.is_empty();
        results.push((*selector, errors));
    }

    if dry_run {
        return Ok(all_valid);
    }

    let (changed, errors) = {
        let mut state = write_lock(&core.state, "committing validation results")?;
        if state.closed {
            return Err(FormError::FormClosed);
        }
        let before = state.errors.clone();
        for (selector, errors) in results {
            state.errors.set_field(selector, errors);
        }
        (state.errors != before, state.errors.clone())
    };
    #[cfg(feature = "tracing")]
    tracing::debug!(fields = selected.len(), valid = all_valid, "validation pass");
    if changed {
        fire_validation_hook(core, &errors);
    }
    Ok(all_valid)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMAIL: FieldKey = FieldKey::new("email");

    #[test]
    fn empty_error_lists_remove_the_entry() {
        let mut errors = ValidationErrors::new();
        errors.set_field(EMAIL, vec!["missing".into()]);
        assert!(errors.contains(EMAIL));
        errors.set_field(EMAIL, Vec::new());
        assert!(!errors.contains(EMAIL));
        assert!(errors.is_empty());
    }

    #[test]
    fn form_errors_live_under_the_reserved_key() {
        let mut errors = ValidationErrors::new();
        errors.set_form_errors(vec!["nothing matches".into()]);
        assert_eq!(
            errors.field(ValidationErrors::FORM_KEY),
            Some(&["nothing matches".to_owned()][..])
        );
        assert_eq!(errors.form_errors(), errors.field(ValidationErrors::FORM_KEY));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn replacing_errors_overwrites_instead_of_appending() {
        let mut errors = ValidationErrors::new();
        errors.set_field(EMAIL, vec!["first".into()]);
        errors.set_field(EMAIL, vec!["second".into()]);
        assert_eq!(errors.field(EMAIL), Some(&["second".to_owned()][..]));
    }

    #[test]
    fn iteration_walks_every_entry() {
        let mut errors = ValidationErrors::new();
        errors.set_field(EMAIL, vec!["bad".into()]);
        errors.set_form_errors(vec!["broken".into()]);
        let collected: Vec<FieldKey> = errors.iter().map(|(selector, _)| selector).collect();
        assert_eq!(collected, vec![ValidationErrors::FORM_KEY, EMAIL]);
    }
}
