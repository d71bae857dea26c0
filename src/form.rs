use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use futures_timer::Delay;

use crate::adapter::{BindAdapter, DefaultBindAdapter};
use crate::config::FieldConfig;
use crate::entity::{ChangeOutcome, EntityState, Transition, apply_change};
use crate::event::ChangeEvent;
use crate::registry::FieldRegistry;
use crate::validate::{ValidateTarget, ValidationErrors, validate_core};
use crate::value::{EntityMap, FieldValue};

pub const DEFAULT_INPUT_DELAY: Duration = Duration::from_millis(100);

// blur validation must read the settled snapshot, so it waits slightly
// past the debounce quiet period
const BLUR_DELAY_FACTOR: f64 = 1.02;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FieldKey(&'static str);

impl FieldKey {
    pub const fn new(value: &'static str) -> Self {
        Self(value)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl Display for FieldKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FormError {
    StatePoisoned(&'static str),
    InvalidBindingInput(usize),
    FormClosed,
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormError::StatePoisoned(context) => {
                write!(f, "form state lock poisoned while {context}")
            }
            FormError::InvalidBindingInput(entries) => {
                write!(
                    f,
                    "binding input mapping must hold exactly one field, got {entries}"
                )
            }
            FormError::FormClosed => f.write_str("form has been closed"),
        }
    }
}

impl std::error::Error for FormError {}

pub type FormResult<T> = Result<T, FormError>;

pub type TaskFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;
pub type TaskSpawner = Arc<dyn Fn(TaskFuture) + Send + Sync>;
pub type ChangeCallback =
    Arc<dyn for<'a> Fn(ChangeCallbackArgs<'a>) -> Option<EntityPatch> + Send + Sync>;
pub type ValidationHook = Arc<dyn Fn(&ValidationErrors) + Send + Sync>;

pub struct ChangeCallbackArgs<'a> {
    pub event: &'a ChangeEvent,
    pub value: &'a FieldValue,
    pub selector: FieldKey,
    pub config: Option<&'a FieldConfig>,
    pub entity: &'a EntityMap,
    pub prev_entity: &'a EntityMap,
    pub entity_display: &'a EntityMap,
    pub prev_entity_display: &'a EntityMap,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityPatch {
    pub value: EntityMap,
    pub display: EntityMap,
}

impl EntityPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(mut self, selector: FieldKey, value: impl Into<FieldValue>) -> Self {
        self.value.insert(selector, value.into());
        self
    }

    pub fn display(mut self, selector: FieldKey, value: impl Into<FieldValue>) -> Self {
        self.display.insert(selector, value.into());
        self
    }
}

#[derive(Clone)]
pub struct FormOptions {
    pub(crate) initial: EntityMap,
    pub(crate) delay: Duration,
    pub(crate) on_change: Option<ChangeCallback>,
    pub(crate) on_validation_error: Option<ValidationHook>,
    pub(crate) spawner: Option<TaskSpawner>,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            initial: EntityMap::new(),
            delay: DEFAULT_INPUT_DELAY,
            on_change: None,
            on_validation_error: None,
            spawner: None,
        }
    }
}

impl FormOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initial<I, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (FieldKey, V)>,
        V: Into<FieldValue>,
    {
        self.initial = entries
            .into_iter()
            .map(|(selector, value)| (selector, value.into()))
            .collect();
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: for<'a> Fn(ChangeCallbackArgs<'a>) -> Option<EntityPatch> + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(callback));
        self
    }

    pub fn on_validation_error<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ValidationErrors) + Send + Sync + 'static,
    {
        self.on_validation_error = Some(Arc::new(hook));
        self
    }

    pub fn spawner<F>(mut self, spawner: F) -> Self
    where
        F: Fn(TaskFuture) + Send + Sync + 'static,
    {
        self.spawner = Some(Arc::new(spawner));
        self
    }
}

#[derive(Clone)]
pub(crate) struct LastChange {
    pub(crate) event: ChangeEvent,
    pub(crate) value: FieldValue,
    pub(crate) selector: FieldKey,
    pub(crate) config: Option<FieldConfig>,
    pub(crate) prev: EntityState,
}

pub(crate) struct FormState {
    pub(crate) live: EntityState,
    pub(crate) published: EntityState,
    pub(crate) errors: ValidationErrors,
    pub(crate) last_change: Option<LastChange>,
    pub(crate) epoch: u64,
    pub(crate) published_epoch: u64,
    pub(crate) pending_blur: Option<FieldKey>,
    pub(crate) closed: bool,
}

pub(crate) struct FormCore {
    pub(crate) state: RwLock<FormState>,
    pub(crate) registry: RwLock<FieldRegistry>,
    pub(crate) delay: Duration,
    pub(crate) on_change: Option<ChangeCallback>,
    pub(crate) on_validation_error: Option<ValidationHook>,
    pub(crate) spawner: Option<TaskSpawner>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormSnapshot {
    pub live: EntityState,
    pub published: EntityState,
    pub errors: ValidationErrors,
    pub touched: BTreeSet<FieldKey>,
}

pub struct Form<A = DefaultBindAdapter>
where
    A: BindAdapter,
{
    pub(crate) core: Arc<FormCore>,
    pub(crate) adapter: Arc<A>,
}

impl<A> Clone for Form<A>
where
    A: BindAdapter,
{
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
            adapter: self.adapter.clone(),
        }
    }
}

impl Form {
    pub fn new(options: FormOptions) -> Self {
        Self::with_adapter(options, DefaultBindAdapter)
    }
}

impl<A> Form<A>
where
    A: BindAdapter,
{
    pub fn with_adapter(options: FormOptions, adapter: A) -> Self {
        let seeded = EntityState::seeded(&options.initial);
        Self {
            core: Arc::new(FormCore {
                state: RwLock::new(FormState {
                    live: seeded.clone(),
                    published: seeded,
                    errors: ValidationErrors::new(),
                    last_change: None,
                    epoch: 0,
                    published_epoch: 0,
                    pending_blur: None,
                    closed: false,
                }),
                registry: RwLock::new(FieldRegistry::default()),
                delay: options.delay,
                on_change: options.on_change,
                on_validation_error: options.on_validation_error,
                spawner: options.spawner,
            }),
            adapter: Arc::new(adapter),
        }
    }

    pub fn delay(&self) -> Duration {
        self.core.delay
    }

    pub fn emit_field_change(
        &self,
        event: ChangeEvent,
        selector: FieldKey,
        config: Option<&FieldConfig>,
    ) -> FormResult<ChangeOutcome> {
        emit_change(&self.core, event, selector, config)
    }

    pub async fn settle(&self) -> FormResult<bool> {
        settle_core(self.core.clone()).await
    }

    pub async fn blur_validate(&self) -> FormResult<bool> {
        blur_core(self.core.clone()).await
    }

    pub fn validate(&self, target: impl Into<ValidateTarget>, dry_run: bool) -> FormResult<bool> {
        validate_core(&self.core, target.into(), dry_run)
    }

    pub fn entity(&self) -> FormResult<EntityMap> {
        Ok(read_lock(&self.core.state, "reading published entity")?
            .published
            .value
            .clone())
    }

    pub fn errors(&self) -> FormResult<ValidationErrors> {
        Ok(read_lock(&self.core.state, "reading validation errors")?
            .errors
            .clone())
    }

    pub fn set_errors(&self, errors: ValidationErrors) -> FormResult<()> {
        let changed = {
            let mut state = write_lock(&self.core.state, "replacing validation errors")?;
            if state.closed {
                return Err(FormError::FormClosed);
            }
            let changed = state.errors != errors;
            state.errors = errors.clone();
            changed
        };
        if changed {
            fire_validation_hook(&self.core, &errors);
        }
        Ok(())
    }

    pub fn snapshot(&self) -> FormResult<FormSnapshot> {
        let (live, published, errors) = {
            let state = read_lock(&self.core.state, "creating form snapshot")?;
            (
                state.live.clone(),
                state.published.clone(),
                state.errors.clone(),
            )
        };
        let touched = read_lock(&self.core.registry, "reading touched fields")?.touched_keys();
        Ok(FormSnapshot {
            live,
            published,
            errors,
            touched,
        })
    }

    pub fn close(&self) -> FormResult<()> {
        let mut state = write_lock(&self.core.state, "closing form")?;
        state.closed = true;
        state.pending_blur = None;
        #[cfg(feature = "tracing")]
        tracing::debug!("form closed");
        Ok(())
    }

    pub fn is_closed(&self) -> FormResult<bool> {
        Ok(read_lock(&self.core.state, "reading close flag")?.closed)
    }
}

pub(crate) fn emit_change(
    core: &Arc<FormCore>,
    event: ChangeEvent,
    selector: FieldKey,
    config: Option<&FieldConfig>,
) -> FormResult<ChangeOutcome> {
    let candidate = match config.and_then(|config| config.event_parser.as_ref()) {
        Some(parser) => parser(&event),
        None => match event.extract() {
            Some(value) => value,
            None => return Ok(ChangeOutcome::Ignored),
        },
    };

    let outcome = {
        let mut state = write_lock(&core.state, "applying field change")?;
        if state.closed {
            return Err(FormError::FormClosed);
        }
        let transition = apply_change(
            &state.live,
            selector,
            &candidate,
            config.and_then(|config| config.coercer.as_ref()),
        );
        match transition {
            Transition::Committed(next) => {
                let prev = std::mem::replace(&mut state.live, next);
                state.epoch += 1;
                state.last_change = Some(LastChange {
                    event,
                    value: candidate,
                    selector,
                    config: config.cloned(),
                    prev,
                });
                ChangeOutcome::Committed
            }
            Transition::Rejected => {
                let prev = state.live.clone();
                state.last_change = Some(LastChange {
                    event,
                    value: candidate,
                    selector,
                    config: config.cloned(),
                    prev,
                });
                ChangeOutcome::Rejected
            }
        }
    };

    {
        let mut registry = write_lock(&core.registry, "marking field touched")?;
        registry.mark_touched(selector);
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(field = %selector, ?outcome, "field change");

    if outcome == ChangeOutcome::Committed {
        if core.delay.is_zero() {
            publish_now(core)?;
        } else if let Some(spawner) = &core.spawner {
            let core = core.clone();
            spawner(Box::pin(async move {
                drop(settle_core(core).await);
            }));
        }
    }
    Ok(outcome)
}

pub(crate) async fn settle_core(core: Arc<FormCore>) -> FormResult<bool> {
    let ticket = {
        let state = read_lock(&core.state, "reading change epoch")?;
        if state.closed || state.published_epoch == state.epoch {
            return Ok(false);
        }
        state.epoch
    };
    if !core.delay.is_zero() {
        Delay::new(core.delay).await;
    }
    {
        let state = read_lock(&core.state, "confirming change epoch after quiet period")?;
        if state.closed || state.epoch != ticket {
            return Ok(false);
        }
    }
    publish_now(&core)
}

pub(crate) fn publish_now(core: &Arc<FormCore>) -> FormResult<bool> {
    let (settled, last) = {
        let mut state = write_lock(&core.state, "claiming snapshot publication")?;
        if state.closed || state.published_epoch == state.epoch {
            return Ok(false);
        }
        state.published_epoch = state.epoch;
        (state.live.clone(), state.last_change.clone())
    };

    let mut published = settled.clone();
    if let (Some(callback), Some(last)) = (&core.on_change, &last) {
        let args = ChangeCallbackArgs {
            event: &last.event,
            value: &last.value,
            selector: last.selector,
            config: last.config.as_ref(),
            entity: &settled.value,
            prev_entity: &last.prev.value,
            entity_display: &settled.display,
            prev_entity_display: &last.prev.display,
        };
        if let Some(patch) = callback(args) {
            published.value.extend(patch.value);
            published.display.extend(patch.display);
        }
    }

    {
        let mut state = write_lock(&core.state, "storing published snapshot")?;
        if state.closed {
            return Ok(false);
        }
        state.published = published;
    }
    #[cfg(feature = "tracing")]
    tracing::debug!("settled snapshot published");
    Ok(true)
}

pub(crate) fn note_blur(core: &Arc<FormCore>) -> FormResult<()> {
    {
        let mut state = write_lock(&core.state, "recording blur")?;
        if state.closed {
            return Err(FormError::FormClosed);
        }
        let Some(last) = &state.last_change else {
            return Ok(());
        };
        state.pending_blur = Some(last.selector);
    }
    if let Some(spawner) = &core.spawner {
        let core = core.clone();
        spawner(Box::pin(async move {
            drop(blur_core(core).await);
        }));
    }
    Ok(())
}

pub(crate) async fn blur_core(core: Arc<FormCore>) -> FormResult<bool> {
    {
        let state = read_lock(&core.state, "reading pending blur")?;
        if state.closed || state.pending_blur.is_none() {
            return Ok(false);
        }
    }
    let wait = core.delay.mul_f64(BLUR_DELAY_FACTOR);
    if !wait.is_zero() {
        Delay::new(wait).await;
    }
    let selector = {
        let mut state = write_lock(&core.state, "taking pending blur")?;
        if state.closed {
            return Ok(false);
        }
        match state.pending_blur.take() {
            Some(selector) => selector,
            None => return Ok(false),
        }
    };
    validate_core(&core, ValidateTarget::Field(selector), false)
}

pub(crate) fn fire_validation_hook(core: &FormCore, errors: &ValidationErrors) {
    if !errors.is_empty()
        && let Some(hook) = &core.on_validation_error
    {
        hook(errors);
    }
}

pub(crate) fn read_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| FormError::StatePoisoned(context))
}

pub(crate) fn write_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| FormError::StatePoisoned(context))
}
