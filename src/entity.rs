use crate::config::Coercer;
use crate::form::FieldKey;
use crate::value::{EntityMap, FieldValue};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityState {
    pub value: EntityMap,
    pub display: EntityMap,
}

impl EntityState {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn seeded(initial: &EntityMap) -> Self {
        Self {
            value: initial.clone(),
            display: initial.clone(),
        }
    }

    pub fn value_of(&self, key: FieldKey) -> Option<&FieldValue> {
        self.value.get(&key)
    }

    pub fn display_of(&self, key: FieldKey) -> Option<&FieldValue> {
        self.display.get(&key)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChangeOutcome {
    Committed,
    Rejected,
    Ignored,
}

pub(crate) enum Transition {
    Committed(EntityState),
    Rejected,
}

pub(crate) fn apply_change(
    prev: &EntityState,
    selector: FieldKey,
    candidate: &FieldValue,
    coercer: Option<&Coercer>,
) -> Transition {
    let mut next = prev.clone();
    next.display.insert(selector, candidate.clone());
    next.value.insert(selector, candidate.clone());
    if let Some(coercer) = coercer
        && !candidate.is_clear()
    {
        let Some((display, value)) = coercer(&next.value[&selector], selector, &next.value) else {
            return Transition::Rejected;
        };
        next.display.insert(selector, display);
        next.value.insert(selector, value);
    }
    Transition::Committed(next)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    const KEY: FieldKey = FieldKey::new("amount");

    #[test]
    fn plain_changes_land_in_both_maps() {
        let candidate = FieldValue::Str("abc".into());
        match apply_change(&EntityState::new(), KEY, &candidate, None) {
            Transition::Committed(next) => {
                assert_eq!(next.display_of(KEY), Some(&candidate));
                assert_eq!(next.value_of(KEY), Some(&candidate));
            }
            Transition::Rejected => panic!("plain change must commit"),
        }
    }

    #[test]
    fn coercion_splits_display_and_typed_value() {
        let coercer: Coercer = Arc::new(|value, _, _| {
            let text = value.to_string();
            let parsed = text.parse::<i64>().ok()?;
            Some((FieldValue::Str(text), FieldValue::Int(parsed)))
        });
        let candidate = FieldValue::Str("41".into());
        match apply_change(&EntityState::new(), KEY, &candidate, Some(&coercer)) {
            Transition::Committed(next) => {
                assert_eq!(next.display_of(KEY), Some(&FieldValue::Str("41".into())));
                assert_eq!(next.value_of(KEY), Some(&FieldValue::Int(41)));
            }
            Transition::Rejected => panic!("numeric text must coerce"),
        }
    }

    #[test]
    fn rejected_coercion_leaves_prior_state_alone() {
        let coercer: Coercer = Arc::new(|_, _, _| None);
        let prev = {
            let candidate = FieldValue::Str("1".into());
            match apply_change(&EntityState::new(), KEY, &candidate, None) {
                Transition::Committed(next) => next,
                Transition::Rejected => panic!("seed change must commit"),
            }
        };
        let candidate = FieldValue::Str("1b".into());
        assert!(matches!(
            apply_change(&prev, KEY, &candidate, Some(&coercer)),
            Transition::Rejected
        ));
        assert_eq!(prev.value_of(KEY), Some(&FieldValue::Str("1".into())));
    }

    #[test]
    fn clear_candidates_skip_the_coercer() {
        let coercer: Coercer = Arc::new(|_, _, _| None);
        for candidate in [FieldValue::Null, FieldValue::Str(String::new())] {
            match apply_change(&EntityState::new(), KEY, &candidate, Some(&coercer)) {
                Transition::Committed(next) => {
                    assert_eq!(next.value_of(KEY), Some(&candidate));
                    assert_eq!(next.display_of(KEY), Some(&candidate));
                }
                Transition::Rejected => panic!("clear candidates commit verbatim"),
            }
        }
    }

    #[test]
    fn coercer_sees_the_candidate_already_written() {
        let coercer: Coercer = Arc::new(|value, selector, entity| {
            assert_eq!(entity.get(&selector), Some(value));
            Some((value.clone(), value.clone()))
        });
        let candidate = FieldValue::Str("x".into());
        assert!(matches!(
            apply_change(&EntityState::new(), KEY, &candidate, Some(&coercer)),
            Transition::Committed(_)
        ));
    }
}
