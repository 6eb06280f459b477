//! Traits for the different instance types.

use super::FmuState;
use crate::{fmi2::binding, Error, EventFlags, FmiInstance, Status};

/// Interface common to both Model Exchange and Co-Simulation instances
pub trait Common: FmiInstance {
    /// The FMI-standard version string
    fn get_version(&self) -> Result<&str, Error>;

    fn get_types_platform(&self) -> Result<&str, Error>;

    /// The function controls debug logging that is output via the logger function callback.
    ///
    /// If `logging_on` is true, debug logging is enabled, otherwise it is switched off. An empty
    /// `categories` list enables or disables every category.
    fn set_debug_logging(&mut self, logging_on: bool, categories: &[&str])
        -> Result<Status, Error>;

    /// Informs the FMU to setup the experiment. Sets the instance time to `start_time`.
    ///
    /// This function must be called after `instantiate` and before `enter_initialization_mode`.
    fn setup_experiment(
        &mut self,
        tolerance: Option<f64>,
        start_time: f64,
        stop_time: Option<f64>,
    ) -> Result<Status, Error>;

    /// Informs the FMU to enter Initialization Mode.
    fn enter_initialization_mode(&mut self, soft: bool) -> Result<Status, Error>;

    /// Leave Initialization Mode: Model Exchange instances continue in Event Mode,
    /// Co-Simulation instances in Step Mode.
    fn exit_initialization_mode(&mut self, soft: bool) -> Result<Status, Error>;

    fn get_real(
        &mut self,
        vrs: &[binding::fmi2ValueReference],
        values: &mut [binding::fmi2Real],
    ) -> Result<Status, Error>;

    fn get_integer(
        &mut self,
        vrs: &[binding::fmi2ValueReference],
        values: &mut [binding::fmi2Integer],
    ) -> Result<Status, Error>;

    fn get_boolean(
        &mut self,
        vrs: &[binding::fmi2ValueReference],
        values: &mut [bool],
    ) -> Result<Status, Error>;

    /// The strings are copied out of FMU-owned memory before returning.
    fn get_string(
        &mut self,
        vrs: &[binding::fmi2ValueReference],
        values: &mut [String],
    ) -> Result<Status, Error>;

    /// Set real values
    ///
    /// # Arguments
    /// * `vrs` - a slice of `fmi2ValueReference` ValueReferences
    /// * `values` - a slice of `fmi2Real` values to set, one per value reference
    fn set_real(
        &mut self,
        vrs: &[binding::fmi2ValueReference],
        values: &[binding::fmi2Real],
    ) -> Result<Status, Error>;

    fn set_integer(
        &mut self,
        vrs: &[binding::fmi2ValueReference],
        values: &[binding::fmi2Integer],
    ) -> Result<Status, Error>;

    fn set_boolean(
        &mut self,
        vrs: &[binding::fmi2ValueReference],
        values: &[bool],
    ) -> Result<Status, Error>;

    fn set_string<S: AsRef<str>>(
        &mut self,
        vrs: &[binding::fmi2ValueReference],
        values: &[S],
    ) -> Result<Status, Error>;

    /// Save the current state of the FMU. `None` if the FMU did not hand out a state.
    fn get_fmu_state(&mut self) -> Result<Option<FmuState>, Error>;

    /// Restore a saved state, including the lifecycle state and time at which it was saved.
    fn set_fmu_state(&mut self, state: &FmuState) -> Result<Status, Error>;

    /// Release a saved state. A state the FMU refused to free stays tracked and is released
    /// together with the instance.
    fn free_fmu_state(&mut self, state: FmuState) -> Result<Status, Error>;

    fn serialize_fmu_state(&mut self, state: &FmuState) -> Result<Vec<u8>, Error>;

    fn deserialize_fmu_state(&mut self, serialized: &[u8]) -> Result<Option<FmuState>, Error>;

    /// Compute `dv_unknown = (d unknowns / d knowns) * dv_known`.
    fn get_directional_derivative(
        &mut self,
        unknowns: &[binding::fmi2ValueReference],
        knowns: &[binding::fmi2ValueReference],
        dv_known: &[binding::fmi2Real],
        dv_unknown: &mut [binding::fmi2Real],
    ) -> Result<Status, Error>;
}

pub trait ModelExchange: Common {
    /// The model enters Event Mode from the Continuous-Time Mode and discrete-time equations may
    /// become active (and relations are not "frozen").
    fn enter_event_mode(&mut self, soft: bool) -> Result<Status, Error>;

    /// The FMU is in Event Mode and the super dense time is incremented by this call.
    ///
    /// If the FMU reports `new_discrete_states_needed`, this function should be called again.
    fn new_discrete_states(&mut self, event_flags: &mut EventFlags) -> Result<Status, Error>;

    /// The model enters Continuous-Time Mode and all discrete-time equations become inactive and
    /// all relations are "frozen".
    fn enter_continuous_time_mode(&mut self, soft: bool) -> Result<Status, Error>;

    /// This function must be called by the environment after every completed step of the
    /// integrator provided the capability flag `completedIntegratorStepNotNeeded = false`.
    ///
    /// Returns `(enter_event_mode, terminate_simulation)`.
    fn completed_integrator_step(
        &mut self,
        no_set_fmu_state_prior_to_current_point: bool,
    ) -> Result<(bool, bool), Error>;

    /// Set a new time instant and re-initialize caching of variables that depend on time,
    /// provided the newly provided time value is different to the previously set time value.
    fn set_time(&mut self, time: f64) -> Result<Status, Error>;

    /// Set a new (continuous) state vector and re-initialize caching of variables that depend on
    /// the states.
    fn set_continuous_states(&mut self, states: &[f64]) -> Result<Status, Error>;

    /// Compute state derivatives at the current time instant and for the current states.
    fn get_derivatives(&mut self, derivatives: &mut [f64]) -> Result<Status, Error>;

    /// Compute event indicators at the current time instant and for the current states.
    fn get_event_indicators(&mut self, indicators: &mut [f64]) -> Result<Status, Error>;

    /// Return the new (continuous) state vector x.
    fn get_continuous_states(&mut self, states: &mut [f64]) -> Result<Status, Error>;

    fn get_nominals_of_continuous_states(&mut self, nominals: &mut [f64])
        -> Result<Status, Error>;
}

pub trait CoSimulation: Common {
    /// Advance the slave by one communication step from the current time.
    ///
    /// On `Ok` or `Warning` the instance time advances by `step_size`. A `Pending` status means
    /// the step runs asynchronously: the time advances once [`CoSimulation::do_step_status`] or
    /// [`CoSimulation::take_async_status`] reports that it finished successfully.
    fn do_step(
        &mut self,
        step_size: f64,
        no_set_fmu_state_prior_to_current_point: bool,
        soft: bool,
    ) -> Result<Status, Error>;

    /// Stop an asynchronous `do_step` that returned `Pending`.
    fn cancel_step(&mut self) -> Result<Status, Error>;

    /// Set the `orders` derivatives of real inputs, used for extrapolation during the next step.
    fn set_real_input_derivatives(
        &mut self,
        vrs: &[binding::fmi2ValueReference],
        orders: &[binding::fmi2Integer],
        values: &[binding::fmi2Real],
    ) -> Result<Status, Error>;

    fn get_real_output_derivatives(
        &mut self,
        vrs: &[binding::fmi2ValueReference],
        orders: &[binding::fmi2Integer],
        values: &mut [binding::fmi2Real],
    ) -> Result<Status, Error>;

    /// Result of the asynchronous `do_step`, `Pending` while it is still running.
    fn do_step_status(&mut self) -> Result<Status, Error>;

    /// Description of the currently running asynchronous `do_step`.
    fn pending_status(&mut self) -> Result<String, Error>;

    /// End time of the last successfully completed communication step, without the time
    /// offset.
    fn last_successful_time(&mut self) -> Result<f64, Error>;

    /// Whether the slave wants to terminate the simulation.
    fn terminated(&mut self) -> Result<bool, Error>;

    /// Status reported through the `stepFinished` callback since the last call.
    fn take_async_status(&mut self) -> Option<Status>;
}
