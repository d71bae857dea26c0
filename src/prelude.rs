pub use crate::adapter::{AnnotatedBindAdapter, BindAdapter, BoundField, DefaultBindAdapter};
pub use crate::binding::{BindInput, DecimalArgs, IntArgs, NumberArgs};
pub use crate::coerce;
pub use crate::config::{FieldConfig, ValidatorArgs};
pub use crate::entity::{ChangeOutcome, EntityState};
pub use crate::event::ChangeEvent;
pub use crate::form::{
    DEFAULT_INPUT_DELAY, EntityPatch, FieldKey, Form, FormError, FormOptions, FormResult,
    FormSnapshot,
};
pub use crate::model::{FormModel, FromFieldValue};
pub use crate::validate::{ValidateTarget, ValidationErrors};
pub use crate::validators;
pub use crate::value::{EntityMap, FieldValue};

pub use formwire_derive::FormModel;
