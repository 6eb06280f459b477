//! FMI 2.0 instance interface

use std::marker::PhantomData;

use super::{binding, logger::Fmi2Environment, Fmi2Status, Model};
use crate::{
    callbacks::InstanceEnvironment,
    gateway,
    lifecycle::{legal, Gate, Guard, Lifecycle},
    Error, FmiInstance, InstanceOptions, InstanceState, InstanceTag, InterfaceType,
    ModelDescription, NativeHandle, RegistryEntry, Status, StatusPolicy, CS, ME,
};

mod co_simulation;
mod common;
mod model_exchange;
mod traits;

pub use traits::{CoSimulation, Common, ModelExchange};

pub type InstanceME<'a> = Instance<'a, ME>;
pub type InstanceCS<'a> = Instance<'a, CS>;

/// An FMU state saved with [`Common::get_fmu_state`]. Only valid for the instance that
/// created it.
#[derive(Debug, PartialEq, Eq)]
pub struct FmuState(usize);

#[derive(Debug)]
struct SavedState {
    native: binding::fmi2FMUstate,
    /// Lifecycle state and time when the state was saved, restored along with it
    state: InstanceState,
    time: f64,
}

pub struct Instance<'a, Tag> {
    model: &'a Model,
    /// Pointer to the raw FMI 2.0 instance, `None` once freed
    handle: Option<NativeHandle>,
    lifecycle: Lifecycle,
    /// Instantiation arguments, reused by an emulated reset
    options: InstanceOptions,
    /// Target of the `componentEnvironment` pointer
    environment: Box<Fmi2Environment>,
    /// Callbacks struct, kept alive as long as the native instance
    callbacks: Box<binding::fmi2CallbackFunctions>,
    saved_states: Vec<Option<SavedState>>,
    /// End time of an asynchronous `fmi2DoStep` that returned `Pending`
    pending_step_end: Option<f64>,
    _tag: PhantomData<Tag>,
}

impl<'a, Tag> std::fmt::Debug for Instance<'a, Tag> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("name", &self.lifecycle.name())
            .field("handle", &self.handle)
            .field("state", &self.lifecycle.state())
            .finish()
    }
}

impl<'a, Tag> Drop for Instance<'a, Tag> {
    fn drop(&mut self) {
        if self.handle.is_some() {
            if let Err(err) = self.release("fmi2FreeInstance") {
                log::error!("Error freeing instance '{}': {err}", self.lifecycle.name());
            }
        }
    }
}

impl<'a, Tag> Instance<'a, Tag> {
    #[inline]
    fn binding(&self) -> &'a binding::Fmi2Binding {
        self.model.binding()
    }

    fn call<F: Copy>(
        &mut self,
        guard: Guard,
        entry_point: Option<F>,
        call: impl FnOnce(F, binding::fmi2Component) -> binding::fmi2Status,
    ) -> Result<Status, Error> {
        gateway::invoke(&mut self.lifecycle, self.handle, guard, entry_point, |f, c| {
            Fmi2Status(call(f, c))
        })
    }

    /// Remove the instance from the registry, free its FMU states and the native instance.
    fn release(&mut self, function: &'static str) -> Result<(), Error> {
        let handle = self.handle.ok_or_else(|| {
            log::error!(
                "`{function}` on instance '{}', which was already freed",
                self.lifecycle.name()
            );
            Error::Consistency(format!(
                "instance '{}' was already freed",
                self.lifecycle.name()
            ))
        })?;

        self.model.registry().deregister(handle)?;
        self.free_saved_states(handle);

        let free = gateway::entry(self.binding().fmi2FreeInstance, "fmi2FreeInstance")?;
        log::trace!("Freeing component {handle:?}");
        unsafe { free(handle.as_ptr()) };
        self.handle = None;
        self.environment.env.set_handle(None);
        Ok(())
    }

    /// Saved states of a `Fatal` instance are dropped without calling into the FMU.
    fn free_saved_states(&mut self, handle: NativeHandle) {
        let saved_states: Vec<_> = self.saved_states.drain(..).flatten().collect();
        if saved_states.is_empty() {
            return;
        }
        if self.lifecycle.state() == InstanceState::Fatal {
            log::warn!(
                "Dropping {} FMU states of fatal instance '{}' without fmi2FreeFMUstate",
                saved_states.len(),
                self.lifecycle.name()
            );
            return;
        }
        let Some(free_state) = self.binding().fmi2FreeFMUstate else {
            return;
        };
        for mut saved in saved_states {
            let status = Status::from(Fmi2Status(unsafe {
                free_state(handle.as_ptr(), &mut saved.native)
            }));
            if !status.is_success() {
                log::warn!("fmi2FreeFMUstate returned {status} while freeing {handle:?}");
            }
        }
    }

    /// Record a native FMU state and hand out its index.
    fn track_state(&mut self, native: binding::fmi2FMUstate) -> Option<FmuState> {
        if native.is_null() {
            return None;
        }
        self.saved_states.push(Some(SavedState {
            native,
            state: self.lifecycle.state(),
            time: self.lifecycle.time(),
        }));
        Some(FmuState(self.saved_states.len() - 1))
    }

    fn saved_state(&self, state: &FmuState) -> Result<&SavedState, Error> {
        self.saved_states
            .get(state.0)
            .and_then(Option::as_ref)
            .ok_or(Error::UnknownFmuState(state.0))
    }

    /// Stop tracking a state the FMU has released.
    fn forget_state(&mut self, state: &FmuState) {
        if let Some(slot) = self.saved_states.get_mut(state.0) {
            *slot = None;
        }
    }

    pub fn model(&self) -> &'a Model {
        self.model
    }

    pub fn options(&self) -> &InstanceOptions {
        &self.options
    }

    pub fn time_offset(&self) -> f64 {
        self.lifecycle.time_offset()
    }
}

impl<'a, Tag: InstanceTag> Instance<'a, Tag> {
    pub(crate) fn new(
        model: &'a Model,
        name: &str,
        options: InstanceOptions,
    ) -> Result<Self, Error> {
        let environment = Fmi2Environment::new(InstanceEnvironment::new(
            name,
            options.log_filter.clone(),
            model.registry().clone(),
            false,
        ));
        let callbacks = Box::new(environment.callback_functions());
        let handle = model.instantiate_native(name, Tag::TYPE, &options, &callbacks)?;

        let policy = options.policy.unwrap_or(model.policy());
        let mut instance = Self {
            model,
            handle: None,
            lifecycle: Lifecycle::new(name, policy),
            options,
            environment,
            callbacks,
            saved_states: Vec::new(),
            pending_step_end: None,
            _tag: PhantomData,
        };
        instance.attach(handle)?;
        Ok(instance)
    }

    /// Register a freshly created native instance and take ownership of it.
    fn attach(&mut self, handle: NativeHandle) -> Result<(), Error> {
        let entry = RegistryEntry {
            handle,
            name: self.lifecycle.name().to_owned(),
            interface: Tag::TYPE,
        };
        if let Err(err) = self.model.registry().register(entry) {
            if let Some(free) = self.binding().fmi2FreeInstance {
                unsafe { free(handle.as_ptr()) };
            }
            return Err(err);
        }
        log::trace!("Instance '{}' owns {handle:?}", self.lifecycle.name());
        self.handle = Some(handle);
        self.environment.env.set_handle(Some(handle));
        Ok(())
    }

    fn emulate_reset(&mut self) -> Result<Status, Error> {
        log::debug!(
            "fmi2Reset not exported, re-instantiating '{}'",
            self.lifecycle.name()
        );
        self.release("fmi2Reset")?;

        let attached = self
            .model
            .instantiate_native(
                self.lifecycle.name(),
                Tag::TYPE,
                &self.options,
                &self.callbacks,
            )
            .and_then(|handle| self.attach(handle));

        match attached {
            Ok(()) => {
                self.lifecycle.restart();
                self.pending_step_end = None;
                Ok(Status::Ok)
            }
            Err(err) => {
                log::error!(
                    "Re-instantiation of '{}' failed: {err}",
                    self.lifecycle.name()
                );
                self.lifecycle.fail(InstanceState::Error);
                Err(Error::Reinstantiation)
            }
        }
    }
}

impl<'a, Tag: InstanceTag> FmiInstance for Instance<'a, Tag> {
    fn name(&self) -> &str {
        self.lifecycle.name()
    }

    fn interface_type(&self) -> InterfaceType {
        Tag::TYPE
    }

    fn model_description(&self) -> &ModelDescription {
        self.model.description()
    }

    fn state(&self) -> InstanceState {
        self.lifecycle.state()
    }

    fn handle(&self) -> Option<NativeHandle> {
        self.handle
    }

    fn policy(&self) -> StatusPolicy {
        self.lifecycle.policy()
    }

    fn set_policy(&mut self, policy: StatusPolicy) {
        self.lifecycle.set_policy(policy);
    }

    fn time(&self) -> f64 {
        self.lifecycle.time()
    }

    fn set_time_offset(&mut self, offset: f64) {
        self.lifecycle.set_time_offset(offset);
    }

    fn terminate(&mut self, soft: bool) -> Result<Status, Error> {
        let guard = Guard::new("fmi2Terminate", legal::TERMINATE)
            .soft(soft)
            .transition(InstanceState::Terminated);
        self.call(guard, self.binding().fmi2Terminate, |f, c| unsafe { f(c) })
    }

    /// Without a native `fmi2Reset` the instance is freed and instantiated again with the
    /// original arguments. Saved FMU states do not survive an emulated reset.
    fn reset(&mut self, soft: bool) -> Result<Status, Error> {
        let guard = Guard::new("fmi2Reset", legal::RESET)
            .soft(soft)
            .transition(InstanceState::Instantiated);
        let native = gateway::handle(self.handle, guard.function)?;
        if self.lifecycle.gate(&guard)? == Gate::Bypass {
            return Ok(Status::Ok);
        }

        match self.binding().fmi2Reset {
            Some(reset) => {
                log::trace!("fmi2Reset({native:?})");
                let status = Fmi2Status(unsafe { reset(native) }).into();
                let status = self.lifecycle.settle(&guard, status)?;
                if status.is_success() {
                    self.lifecycle.restart();
                    self.pending_step_end = None;
                }
                Ok(status)
            }
            None => self.emulate_reset(),
        }
    }

    fn free_instance(&mut self) -> Result<(), Error> {
        self.release("fmi2FreeInstance")
    }
}
