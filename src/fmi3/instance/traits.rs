//! Traits for the different instance types.

use super::{FmuState, StepResult};
use crate::{fmi3::binding, Error, EventFlags, FmiInstance, Status};

/// Interface common to all instance types
///
/// Every operation is checked against the lifecycle state of the instance before the native
/// function runs. Operations taking a `soft` flag return `Ok(Status::Ok)` without calling the
/// FMU when the instance is in a state that does not allow them.
pub trait Common: FmiInstance {
    /// The FMI-standard version string
    fn get_version(&self) -> Result<&str, Error>;

    /// The function controls the debug logging that is output by the FMU
    ///
    /// See [https://fmi-standard.org/docs/3.0.1/#fmi3SetDebugLogging]
    fn set_debug_logging(&mut self, logging_on: bool, categories: &[&str])
        -> Result<Status, Error>;

    /// Changes state to `Initialization Mode`. Sets the instance time to `start_time`.
    ///
    /// Both `start_time` and `stop_time` are forwarded with the time offset added.
    ///
    /// See [https://fmi-standard.org/docs/3.0.1/#fmi3EnterInitializationMode]
    fn enter_initialization_mode(
        &mut self,
        tolerance: Option<f64>,
        start_time: f64,
        stop_time: Option<f64>,
        soft: bool,
    ) -> Result<Status, Error>;

    /// Changes the state, depending on the instance type:
    /// * Model Exchange: Event Mode
    /// * Co-Simulation:
    ///     * `event_mode_used` and `has_event_mode`: Event Mode
    ///     * otherwise: Step Mode
    /// * Scheduled Execution: Clock Activation Mode.
    fn exit_initialization_mode(&mut self, soft: bool) -> Result<Status, Error>;

    /// Enter Configuration Mode from `Instantiated`, or Reconfiguration Mode from an operating
    /// state.
    ///
    /// See [https://fmi-standard.org/docs/3.0/#fmi3EnterConfigurationMode]
    fn enter_configuration_mode(&mut self, soft: bool) -> Result<Status, Error>;

    /// Leave (Re)configuration Mode for the state it was entered from.
    fn exit_configuration_mode(&mut self, soft: bool) -> Result<Status, Error>;

    /// This function changes the state to Event Mode.
    ///
    /// See [https://fmi-standard.org/docs/3.0.1/#fmi3EnterEventMode]
    fn enter_event_mode(&mut self, soft: bool) -> Result<Status, Error>;

    /// Evaluate the discrete-time equations of the current super-dense time instant.
    ///
    /// See [https://fmi-standard.org/docs/3.0.1/#fmi3UpdateDiscreteStates]
    fn update_discrete_states(&mut self, event_flags: &mut EventFlags) -> Result<Status, Error>;

    /// Refresh discrete states outside Event Mode, e.g. after changing tunable parameters.
    fn evaluate_discrete_states(&mut self) -> Result<Status, Error>;

    /// See [https://fmi-standard.org/docs/3.0.1/#get-and-set-variable-values]
    ///
    /// `values` may be longer than `vrs` for array variables.
    fn get_float32(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        values: &mut [f32],
    ) -> Result<Status, Error>;
    fn get_float64(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        values: &mut [f64],
    ) -> Result<Status, Error>;
    fn get_int8(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        values: &mut [i8],
    ) -> Result<Status, Error>;
    fn get_uint8(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        values: &mut [u8],
    ) -> Result<Status, Error>;
    fn get_int16(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        values: &mut [i16],
    ) -> Result<Status, Error>;
    fn get_uint16(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        values: &mut [u16],
    ) -> Result<Status, Error>;
    fn get_int32(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        values: &mut [i32],
    ) -> Result<Status, Error>;
    fn get_uint32(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        values: &mut [u32],
    ) -> Result<Status, Error>;
    fn get_int64(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        values: &mut [i64],
    ) -> Result<Status, Error>;
    fn get_uint64(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        values: &mut [u64],
    ) -> Result<Status, Error>;
    fn get_boolean(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        values: &mut [bool],
    ) -> Result<Status, Error>;
    /// The strings are copied out of FMU-owned memory before returning.
    fn get_string(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        values: &mut [String],
    ) -> Result<Status, Error>;
    /// The binary values are copied out of FMU-owned memory before returning.
    fn get_binary(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        values: &mut [Vec<u8>],
    ) -> Result<Status, Error>;
    fn get_clock(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        values: &mut [binding::fmi3Clock],
    ) -> Result<Status, Error>;

    fn set_float32(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        values: &[f32],
    ) -> Result<Status, Error>;
    fn set_float64(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        values: &[f64],
    ) -> Result<Status, Error>;
    fn set_int8(&mut self, vrs: &[binding::fmi3ValueReference], values: &[i8])
        -> Result<Status, Error>;
    fn set_uint8(&mut self, vrs: &[binding::fmi3ValueReference], values: &[u8])
        -> Result<Status, Error>;
    fn set_int16(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        values: &[i16],
    ) -> Result<Status, Error>;
    fn set_uint16(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        values: &[u16],
    ) -> Result<Status, Error>;
    fn set_int32(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        values: &[i32],
    ) -> Result<Status, Error>;
    fn set_uint32(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        values: &[u32],
    ) -> Result<Status, Error>;
    fn set_int64(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        values: &[i64],
    ) -> Result<Status, Error>;
    fn set_uint64(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        values: &[u64],
    ) -> Result<Status, Error>;
    fn set_boolean(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        values: &[bool],
    ) -> Result<Status, Error>;
    fn set_string<S: AsRef<str>>(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        values: &[S],
    ) -> Result<Status, Error>;
    fn set_binary<B: AsRef<[u8]>>(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        values: &[B],
    ) -> Result<Status, Error>;
    fn set_clock(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        values: &[binding::fmi3Clock],
    ) -> Result<Status, Error>;

    /// Save the current state of the FMU. `None` if the FMU did not hand out a state.
    ///
    /// See [https://fmi-standard.org/docs/3.0.1/#fmi3GetFMUState]
    fn get_fmu_state(&mut self) -> Result<Option<FmuState>, Error>;

    /// Restore a saved state, including the lifecycle state and time at which it was saved.
    ///
    /// See [https://fmi-standard.org/docs/3.0.1/#fmi3SetFMUState]
    fn set_fmu_state(&mut self, state: &FmuState) -> Result<Status, Error>;

    /// Release a saved state. A state the FMU refused to free stays tracked and is released
    /// together with the instance.
    fn free_fmu_state(&mut self, state: FmuState) -> Result<Status, Error>;

    fn serialize_fmu_state(&mut self, state: &FmuState) -> Result<Vec<u8>, Error>;

    fn deserialize_fmu_state(&mut self, serialized: &[u8]) -> Result<Option<FmuState>, Error>;

    /// Compute `sensitivity = (d unknowns / d knowns) * seed`.
    fn get_directional_derivative(
        &mut self,
        unknowns: &[binding::fmi3ValueReference],
        knowns: &[binding::fmi3ValueReference],
        seed: &[f64],
        sensitivity: &mut [f64],
    ) -> Result<Status, Error>;

    /// Compute `sensitivity = seed^T * (d unknowns / d knowns)`.
    fn get_adjoint_derivative(
        &mut self,
        unknowns: &[binding::fmi3ValueReference],
        knowns: &[binding::fmi3ValueReference],
        seed: &[f64],
        sensitivity: &mut [f64],
    ) -> Result<Status, Error>;
}

/// Interface for Model Exchange instances
pub trait ModelExchange: Common {
    fn enter_continuous_time_mode(&mut self, soft: bool) -> Result<Status, Error>;

    /// This function is called after every completed step of the integrator.
    ///
    /// Returns `(enter_event_mode, terminate_simulation)`.
    fn completed_integrator_step(
        &mut self,
        no_set_fmu_state_prior_to_current_point: bool,
    ) -> Result<(bool, bool), Error>;

    /// Set the independent variable. The time offset is added before forwarding.
    ///
    /// See: [https://fmi-standard.org/docs/3.0.1/#fmi3SetTime]
    fn set_time(&mut self, time: f64) -> Result<Status, Error>;

    fn set_continuous_states(&mut self, states: &[f64]) -> Result<Status, Error>;

    /// See: [https://fmi-standard.org/docs/3.0.1/#fmi3GetContinuousStates]
    fn get_continuous_states(&mut self, states: &mut [f64]) -> Result<Status, Error>;

    fn get_continuous_state_derivatives(&mut self, derivatives: &mut [f64])
        -> Result<Status, Error>;

    /// See: [https://fmi-standard.org/docs/3.0.1/#fmi3GetNominalsOfContinuousStates]
    fn get_nominals_of_continuous_states(&mut self, nominals: &mut [f64])
        -> Result<Status, Error>;

    /// See: [https://fmi-standard.org/docs/3.0.1/#fmi3GetEventIndicators]
    fn get_event_indicators(&mut self, indicators: &mut [f64]) -> Result<Status, Error>;

    /// Number of event indicators as reported by the FMU, which may differ from the model
    /// description once structural parameters have been changed.
    fn get_number_of_event_indicators(&mut self) -> Result<usize, Error>;

    fn get_number_of_continuous_states(&mut self) -> Result<usize, Error>;
}

/// Interface for Co-Simulation instances
pub trait CoSimulation: Common {
    /// This function must be called to change from Event Mode into Step Mode in Co-Simulation.
    fn enter_step_mode(&mut self, soft: bool) -> Result<Status, Error>;

    /// Advance the FMU by one communication step from the current time.
    ///
    /// On success the instance time moves to `last_successful_time`, which is earlier than
    /// `current + step_size` after an early return.
    ///
    /// See: [https://fmi-standard.org/docs/3.0.1/#fmi3DoStep]
    fn do_step(
        &mut self,
        step_size: f64,
        no_set_fmu_state_prior_to_current_point: bool,
        soft: bool,
    ) -> Result<StepResult, Error>;

    fn get_output_derivatives(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        orders: &[i32],
        values: &mut [f64],
    ) -> Result<Status, Error>;

    /// Number of intermediate-update callbacks received since instantiation.
    fn intermediate_updates(&self) -> usize;
}

/// Interface for Scheduled instances
///
/// See [https://fmi-standard.org/docs/3.0.1/#fmi-for-scheduled-execution]
pub trait ScheduledExecution: Common {
    /// Run the model partition of the clock `clock_reference` that ticked at `activation_time`.
    ///
    /// See [https://fmi-standard.org/docs/3.0.1/#fmi3ActivateModelPartition]
    fn activate_model_partition(
        &mut self,
        clock_reference: binding::fmi3ValueReference,
        activation_time: f64,
    ) -> Result<Status, Error>;

    /// Number of clock-update callbacks received since instantiation.
    fn clock_updates(&self) -> usize;
}
