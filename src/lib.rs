pub mod adapter;
pub mod binding;
pub mod coerce;
pub mod config;
pub mod entity;
pub mod event;
pub mod form;
pub mod model;
pub mod prelude;
pub mod validate;
pub mod validators;
pub mod value;

mod registry;


pub use crate::adapter::{
    AnnotatedBindAdapter, AnnotatedProps, BindAdapter, BindArgs, BoundField, DefaultBindAdapter,
    FieldBlurFn, FieldChangeFn,
};
pub use crate::binding::{BindInput, BindSpec, DecimalArgs, IntArgs, NumberArgs};
pub use crate::config::{Coercer, EventParser, FieldConfig, Validator, ValidatorArgs};
pub use crate::entity::{ChangeOutcome, EntityState};
pub use crate::event::{ChangeEvent, ChangeTarget};
pub use crate::form::{
    ChangeCallback, ChangeCallbackArgs, DEFAULT_INPUT_DELAY, EntityPatch, FieldKey, Form,
    FormError, FormOptions, FormResult, FormSnapshot, TaskFuture, TaskSpawner, ValidationHook,
};
pub use crate::model::{EntityReadError, FormModel, FromFieldValue, read_field};
pub use crate::validate::{ValidateTarget, ValidationErrors};
pub use crate::value::{EntityMap, FieldValue};

pub use formwire_derive::FormModel;
