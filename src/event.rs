use crate::value::FieldValue;

#[derive(Clone, Debug, PartialEq)]
pub enum ChangeTarget {
    Input { value: FieldValue },
    Checkbox { checked: bool },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChangeEvent {
    pub target: Option<ChangeTarget>,
}

impl ChangeEvent {
    pub fn input(value: impl Into<FieldValue>) -> Self {
        Self {
            target: Some(ChangeTarget::Input {
                value: value.into(),
            }),
        }
    }

    pub fn checkbox(checked: bool) -> Self {
        Self {
            target: Some(ChangeTarget::Checkbox { checked }),
        }
    }

    pub fn detached() -> Self {
        Self { target: None }
    }

    pub(crate) fn extract(&self) -> Option<FieldValue> {
        match &self.target {
            Some(ChangeTarget::Checkbox { checked }) => Some(FieldValue::Bool(*checked)),
            Some(ChangeTarget::Input { value }) => Some(value.clone()),
            None => None,
        }
    }
}
