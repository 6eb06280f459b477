//! Lifecycle tests of the FMI 3.0 instance API against an in-process mock FMU.
#![cfg(feature = "fmi3")]

use std::{
    cell::Cell,
    ffi::c_void,
    sync::atomic::{AtomicUsize, Ordering},
};

use assert_approx_eq::assert_approx_eq;
use fmi_binding::{
    fmi3::{
        self, binding,
        instance::{CoSimulation, Common, ModelExchange, ScheduledExecution},
    },
    Error, EventFlags, FmiInstance, InstanceOptions, InstanceState, InterfaceCapabilities,
    ModelDescription, Severity, Status, StatusPolicy,
};

static NEXT_HANDLE: AtomicUsize = AtomicUsize::new(0x3000);

thread_local! {
    /// Status returned by every mocked state-changing call
    static STATUS: Cell<binding::fmi3Status> = const { Cell::new(binding::fmi3Status_fmi3OK) };
    static CALLS: Cell<usize> = const { Cell::new(0) };
    static INSTANTIATIONS: Cell<usize> = const { Cell::new(0) };
    static FREES: Cell<usize> = const { Cell::new(0) };
    static STATE_FREES: Cell<usize> = const { Cell::new(0) };
    static FAIL_INSTANTIATE: Cell<bool> = const { Cell::new(false) };
    static LAST_TIME: Cell<f64> = const { Cell::new(f64::NAN) };
    static ENVIRONMENT: Cell<*mut c_void> = const { Cell::new(std::ptr::null_mut()) };
    static INTERMEDIATE: Cell<binding::fmi3IntermediateUpdateCallback> = const { Cell::new(None) };
    static CLOCK_UPDATE: Cell<binding::fmi3ClockUpdateCallback> = const { Cell::new(None) };
}

fn set_status(status: binding::fmi3Status) {
    STATUS.with(|s| s.set(status));
}

fn calls() -> usize {
    CALLS.with(Cell::get)
}

fn next_handle() -> binding::fmi3Instance {
    if FAIL_INSTANTIATE.with(Cell::get) {
        return std::ptr::null_mut();
    }
    INSTANTIATIONS.with(|n| n.set(n.get() + 1));
    NEXT_HANDLE.fetch_add(16, Ordering::Relaxed) as binding::fmi3Instance
}

fn status_call() -> binding::fmi3Status {
    CALLS.with(|n| n.set(n.get() + 1));
    STATUS.with(Cell::get)
}

unsafe extern "C" fn get_version() -> *const std::ffi::c_char {
    c"3.0".as_ptr()
}

unsafe extern "C" fn instantiate_me(
    _name: binding::fmi3String,
    _token: binding::fmi3String,
    _resource_path: binding::fmi3String,
    _visible: bool,
    _logging_on: bool,
    environment: binding::fmi3InstanceEnvironment,
    log_message: binding::fmi3LogMessageCallback,
) -> binding::fmi3Instance {
    if let Some(log_message) = log_message {
        log_message(
            environment,
            binding::fmi3Status_fmi3OK,
            c"logEvents".as_ptr(),
            c"instantiated".as_ptr(),
        );
    }
    next_handle()
}

#[allow(clippy::too_many_arguments)]
unsafe extern "C" fn instantiate_cs(
    _name: binding::fmi3String,
    _token: binding::fmi3String,
    _resource_path: binding::fmi3String,
    _visible: bool,
    _logging_on: bool,
    _event_mode_used: bool,
    _early_return_allowed: bool,
    _required: *const binding::fmi3ValueReference,
    _n_required: usize,
    environment: binding::fmi3InstanceEnvironment,
    _log_message: binding::fmi3LogMessageCallback,
    intermediate_update: binding::fmi3IntermediateUpdateCallback,
) -> binding::fmi3Instance {
    ENVIRONMENT.with(|e| e.set(environment));
    INTERMEDIATE.with(|i| i.set(intermediate_update));
    next_handle()
}

#[allow(clippy::too_many_arguments)]
unsafe extern "C" fn instantiate_se(
    _name: binding::fmi3String,
    _token: binding::fmi3String,
    _resource_path: binding::fmi3String,
    _visible: bool,
    _logging_on: bool,
    environment: binding::fmi3InstanceEnvironment,
    _log_message: binding::fmi3LogMessageCallback,
    clock_update: binding::fmi3ClockUpdateCallback,
    _lock_preemption: binding::fmi3LockPreemptionCallback,
    _unlock_preemption: binding::fmi3UnlockPreemptionCallback,
) -> binding::fmi3Instance {
    ENVIRONMENT.with(|e| e.set(environment));
    CLOCK_UPDATE.with(|c| c.set(clock_update));
    next_handle()
}

unsafe extern "C" fn free_instance(_instance: binding::fmi3Instance) {
    FREES.with(|n| n.set(n.get() + 1));
}

unsafe extern "C" fn enter_initialization_mode(
    _instance: binding::fmi3Instance,
    _tolerance_defined: bool,
    _tolerance: f64,
    start_time: f64,
    _stop_time_defined: bool,
    _stop_time: f64,
) -> binding::fmi3Status {
    LAST_TIME.with(|t| t.set(start_time));
    status_call()
}

unsafe extern "C" fn no_args(_instance: binding::fmi3Instance) -> binding::fmi3Status {
    status_call()
}

#[allow(clippy::too_many_arguments)]
unsafe extern "C" fn do_step(
    _instance: binding::fmi3Instance,
    current: f64,
    step_size: f64,
    _no_set_prior: bool,
    event_handling_needed: *mut bool,
    terminate_simulation: *mut bool,
    early_return: *mut bool,
    last_successful_time: *mut f64,
) -> binding::fmi3Status {
    LAST_TIME.with(|t| t.set(current));
    *event_handling_needed = false;
    *terminate_simulation = false;
    *early_return = false;
    *last_successful_time = current + step_size;

    if let Some(update) = INTERMEDIATE.with(Cell::get) {
        let midpoint = current + step_size / 2.0;
        let mut requested = false;
        let mut return_time = 0.0;
        update(
            ENVIRONMENT.with(Cell::get),
            midpoint,
            false,
            true,
            true,
            true,
            &mut requested,
            &mut return_time,
        );
        if requested {
            *early_return = true;
            *last_successful_time = return_time;
        }
    }
    status_call()
}

unsafe extern "C" fn get_float64(
    _instance: binding::fmi3Instance,
    _vrs: *const binding::fmi3ValueReference,
    n_vrs: usize,
    values: *mut f64,
    n_values: usize,
) -> binding::fmi3Status {
    assert_eq!(n_vrs, n_values);
    for i in 0..n_values {
        *values.add(i) = i as f64 * 1.5;
    }
    status_call()
}

unsafe extern "C" fn get_clock(
    _instance: binding::fmi3Instance,
    _vrs: *const binding::fmi3ValueReference,
    _n_vrs: usize,
    _values: *mut bool,
) -> binding::fmi3Status {
    status_call()
}

unsafe extern "C" fn activate_model_partition(
    _instance: binding::fmi3Instance,
    _clock_reference: binding::fmi3ValueReference,
    activation_time: f64,
) -> binding::fmi3Status {
    LAST_TIME.with(|t| t.set(activation_time));
    if let Some(clock_update) = CLOCK_UPDATE.with(Cell::get) {
        clock_update(ENVIRONMENT.with(Cell::get));
    }
    status_call()
}

unsafe extern "C" fn update_discrete_states(
    _instance: binding::fmi3Instance,
    discrete_states_need_update: *mut bool,
    terminate_simulation: *mut bool,
    _nominals_changed: *mut bool,
    _values_changed: *mut bool,
    next_event_time_defined: *mut bool,
    next_event_time: *mut f64,
) -> binding::fmi3Status {
    *discrete_states_need_update = false;
    *terminate_simulation = false;
    *next_event_time_defined = true;
    *next_event_time = 2.5;
    status_call()
}

unsafe extern "C" fn get_fmu_state(
    _instance: binding::fmi3Instance,
    state: *mut binding::fmi3FMUState,
) -> binding::fmi3Status {
    *state = NEXT_HANDLE.fetch_add(16, Ordering::Relaxed) as binding::fmi3FMUState;
    status_call()
}

unsafe extern "C" fn set_fmu_state(
    _instance: binding::fmi3Instance,
    _state: binding::fmi3FMUState,
) -> binding::fmi3Status {
    status_call()
}

unsafe extern "C" fn free_fmu_state(
    _instance: binding::fmi3Instance,
    state: *mut binding::fmi3FMUState,
) -> binding::fmi3Status {
    STATE_FREES.with(|n| n.set(n.get() + 1));
    *state = std::ptr::null_mut();
    status_call()
}

/// Entry-point table of a complete FMU, without `fmi3Reset`.
fn mock_binding() -> binding::Fmi3Binding {
    let mut binding = binding::Fmi3Binding::default();
    binding.fmi3GetVersion = Some(get_version);
    binding.fmi3InstantiateModelExchange = Some(instantiate_me);
    binding.fmi3InstantiateCoSimulation = Some(instantiate_cs);
    binding.fmi3InstantiateScheduledExecution = Some(instantiate_se);
    binding.fmi3FreeInstance = Some(free_instance);
    binding.fmi3EnterInitializationMode = Some(enter_initialization_mode);
    binding.fmi3ExitInitializationMode = Some(no_args);
    binding.fmi3EnterConfigurationMode = Some(no_args);
    binding.fmi3ExitConfigurationMode = Some(no_args);
    binding.fmi3EnterEventMode = Some(no_args);
    binding.fmi3EnterStepMode = Some(no_args);
    binding.fmi3EnterContinuousTimeMode = Some(no_args);
    binding.fmi3Terminate = Some(no_args);
    binding.fmi3DoStep = Some(do_step);
    binding.fmi3GetFloat64 = Some(get_float64);
    binding.fmi3GetClock = Some(get_clock);
    binding.fmi3ActivateModelPartition = Some(activate_model_partition);
    binding.fmi3UpdateDiscreteStates = Some(update_discrete_states);
    binding.fmi3GetFMUState = Some(get_fmu_state);
    binding.fmi3SetFMUState = Some(set_fmu_state);
    binding.fmi3FreeFMUState = Some(free_fmu_state);
    binding
}

fn description(has_event_mode: bool) -> ModelDescription {
    let capabilities = InterfaceCapabilities {
        model_identifier: "Mock".to_owned(),
        has_event_mode,
        provides_intermediate_update: true,
        can_return_early_after_intermediate_update: true,
        ..Default::default()
    };
    ModelDescription {
        fmi_version: "3.0".to_owned(),
        model_name: "Mock".to_owned(),
        instantiation_token: "{mock}".to_owned(),
        model_exchange: Some(capabilities.clone()),
        co_simulation: Some(capabilities.clone()),
        scheduled_execution: Some(capabilities),
        ..Default::default()
    }
}

fn mock_model(has_event_mode: bool) -> fmi3::Model {
    fmi3::Model::new(mock_binding(), description(has_event_mode), "/tmp/resources/").unwrap()
}

fn initialize<Tag>(instance: &mut fmi3::Instance<'_, Tag>)
where
    Tag: fmi_binding::InstanceTag,
{
    instance
        .enter_initialization_mode(None, 0.0, None, false)
        .unwrap();
    instance.exit_initialization_mode(false).unwrap();
}

#[test_log::test]
fn test_cs_operating_state() {
    let model = mock_model(true);

    let mut plain = model.instantiate_cs("plain", InstanceOptions::default()).unwrap();
    initialize(&mut plain);
    assert_eq!(plain.state(), InstanceState::StepMode);

    let mut evented = model
        .instantiate_cs("evented", InstanceOptions::default().event_mode_used(true))
        .unwrap();
    initialize(&mut evented);
    assert_eq!(evented.state(), InstanceState::EventMode);
    evented.enter_step_mode(false).unwrap();
    assert_eq!(evented.state(), InstanceState::StepMode);

    // Event mode requested but not offered by the model
    let model = mock_model(false);
    let mut fallback = model
        .instantiate_cs("fallback", InstanceOptions::default().event_mode_used(true))
        .unwrap();
    initialize(&mut fallback);
    assert_eq!(fallback.state(), InstanceState::StepMode);
}

#[test_log::test]
fn test_me_event_iteration() {
    let model = mock_model(false);
    let mut instance = model.instantiate_me("me", InstanceOptions::default()).unwrap();
    assert_eq!(instance.get_version().unwrap(), "3.0");
    initialize(&mut instance);
    assert_eq!(instance.state(), InstanceState::EventMode);

    let mut flags = EventFlags {
        discrete_states_need_update: true,
        ..Default::default()
    };
    instance.update_discrete_states(&mut flags).unwrap();
    assert!(!flags.discrete_states_need_update);
    assert_eq!(flags.next_event_time, Some(2.5));

    instance.enter_continuous_time_mode(false).unwrap();
    assert_eq!(instance.state(), InstanceState::ContinuousTimeMode);
    instance.enter_event_mode(false).unwrap();
    assert_eq!(instance.state(), InstanceState::EventMode);
}

#[test_log::test]
fn test_configuration_mode() {
    let model = mock_model(false);
    let mut instance = model.instantiate_cs("config", InstanceOptions::default()).unwrap();

    instance.enter_configuration_mode(false).unwrap();
    assert_eq!(instance.state(), InstanceState::ConfigurationMode);
    instance.exit_configuration_mode(false).unwrap();
    assert_eq!(instance.state(), InstanceState::Instantiated);

    initialize(&mut instance);
    instance.enter_configuration_mode(false).unwrap();
    assert_eq!(instance.state(), InstanceState::ReconfigurationMode);
    instance.exit_configuration_mode(false).unwrap();
    assert_eq!(instance.state(), InstanceState::StepMode);
}

#[test_log::test]
fn test_soft_call_is_bypassed() {
    let model = mock_model(false);
    let mut instance = model.instantiate_cs("soft", InstanceOptions::default()).unwrap();
    initialize(&mut instance);
    let before = calls();

    let status = instance
        .enter_initialization_mode(None, 5.0, None, true)
        .unwrap();
    assert_eq!(status, Status::Ok);
    assert_eq!(calls(), before);
    assert_eq!(instance.state(), InstanceState::StepMode);
    assert_eq!(instance.time(), 0.0);

    // The same call without `soft` is forwarded
    instance
        .enter_initialization_mode(None, 5.0, None, false)
        .unwrap();
    assert_eq!(calls(), before + 1);
}

#[test_log::test]
fn test_soft_do_step_keeps_time() {
    let model = mock_model(false);
    let mut instance = model.instantiate_cs("soft_step", InstanceOptions::default()).unwrap();
    let before = calls();

    let result = instance.do_step(0.5, true, true).unwrap();
    assert_eq!(result.status, Status::Ok);
    assert_eq!(result.last_successful_time, 0.0);
    assert_eq!(calls(), before);
    assert_eq!(instance.time(), 0.0);
    assert_eq!(instance.state(), InstanceState::Instantiated);
}

#[test_log::test]
fn test_fatal_is_terminal() {
    let model = mock_model(false);
    let mut instance = model.instantiate_cs("fatal", InstanceOptions::default()).unwrap();
    initialize(&mut instance);

    set_status(binding::fmi3Status_fmi3Fatal);
    let err = instance.do_step(0.1, true, false).unwrap_err();
    assert!(matches!(&err, Error::Status(report) if report.severity == Severity::Fatal));
    assert!(err.is_unrecoverable());
    assert_eq!(instance.state(), InstanceState::Fatal);
    set_status(binding::fmi3Status_fmi3OK);

    let before = calls();
    assert!(matches!(
        instance.terminate(true),
        Err(Error::InstanceFatal("fmi3Terminate"))
    ));
    assert!(matches!(
        instance.do_step(0.1, true, false),
        Err(Error::InstanceFatal("fmi3DoStep"))
    ));
    assert_eq!(calls(), before);

    instance.free_instance().unwrap();
}

#[test_log::test]
fn test_discarded_step_keeps_state_and_time() {
    let model = mock_model(false);
    let mut instance = model.instantiate_cs("discard", InstanceOptions::default()).unwrap();
    initialize(&mut instance);

    set_status(binding::fmi3Status_fmi3Discard);
    let result = instance.do_step(0.1, true, false).unwrap();
    set_status(binding::fmi3Status_fmi3OK);

    assert_eq!(result.status, Status::Discard);
    assert_eq!(instance.state(), InstanceState::StepMode);
    assert_eq!(instance.time(), 0.0);
}

#[test_log::test]
fn test_error_status_follows_policy() {
    let model = mock_model(false);
    let mut strict = model.instantiate_cs("strict", InstanceOptions::default()).unwrap();
    initialize(&mut strict);
    let mut lenient = model
        .instantiate_cs(
            "lenient",
            InstanceOptions::default().policy(StatusPolicy::LENIENT),
        )
        .unwrap();
    initialize(&mut lenient);

    set_status(binding::fmi3Status_fmi3Error);
    assert!(matches!(
        strict.do_step(0.1, true, false),
        Err(Error::Status(report)) if report.function == "fmi3DoStep"
    ));
    let result = lenient.do_step(0.1, true, false).unwrap();
    set_status(binding::fmi3Status_fmi3OK);

    assert_eq!(result.status, Status::Error);
    assert_eq!(strict.state(), InstanceState::Error);
    assert_eq!(lenient.state(), InstanceState::Error);
}

#[test_log::test]
fn test_double_free() {
    let model = mock_model(false);
    let mut instance = model.instantiate_me("twice", InstanceOptions::default()).unwrap();
    let frees = FREES.with(Cell::get);

    instance.free_instance().unwrap();
    assert!(matches!(instance.free_instance(), Err(Error::Consistency(_))));
    assert!(matches!(
        instance.terminate(false),
        Err(Error::Freed("fmi3Terminate"))
    ));
    assert_eq!(FREES.with(Cell::get), frees + 1);
    assert!(model.registry().is_empty());
}

#[test_log::test]
fn test_emulated_reset() {
    let model = mock_model(false);
    let mut instance = model.instantiate_cs("reset", InstanceOptions::default()).unwrap();
    let first = instance.handle().unwrap();
    initialize(&mut instance);
    instance.do_step(0.5, true, false).unwrap();
    instance.terminate(false).unwrap();

    let instantiations = INSTANTIATIONS.with(Cell::get);
    instance.reset(false).unwrap();
    let second = instance.handle().unwrap();

    assert_ne!(first, second);
    assert_eq!(INSTANTIATIONS.with(Cell::get), instantiations + 1);
    assert_eq!(instance.state(), InstanceState::Instantiated);
    assert_eq!(instance.time(), 0.0);
    assert_eq!(model.registry().handles(), vec![second]);
}

#[test_log::test]
fn test_native_reset_keeps_handle() {
    let mut binding = mock_binding();
    binding.fmi3Reset = Some(no_args);
    let model = fmi3::Model::new(binding, description(false), "/tmp/resources/").unwrap();
    let mut instance = model.instantiate_cs("native", InstanceOptions::default()).unwrap();
    let handle = instance.handle();
    initialize(&mut instance);
    instance.terminate(false).unwrap();

    instance.reset(false).unwrap();
    assert_eq!(instance.handle(), handle);
    assert_eq!(instance.state(), InstanceState::Instantiated);
}

#[test_log::test]
fn test_failed_reinstantiation() {
    let model = mock_model(false);
    let mut instance = model.instantiate_cs("doomed", InstanceOptions::default()).unwrap();
    initialize(&mut instance);
    instance.terminate(false).unwrap();

    FAIL_INSTANTIATE.with(|f| f.set(true));
    let result = instance.reset(false);
    FAIL_INSTANTIATE.with(|f| f.set(false));

    assert!(matches!(result, Err(Error::Reinstantiation)));
    assert!(instance.handle().is_none());
    assert_eq!(instance.state(), InstanceState::Error);
    assert!(model.registry().is_empty());
}

#[test_log::test]
fn test_time_offset() {
    let model = mock_model(false);
    let mut instance = model.instantiate_cs("offset", InstanceOptions::default()).unwrap();
    instance.set_time_offset(100.0);
    instance
        .enter_initialization_mode(None, 1.0, None, false)
        .unwrap();
    assert_eq!(LAST_TIME.with(Cell::get), 101.0);
    instance.exit_initialization_mode(false).unwrap();

    let result = instance.do_step(0.25, true, false).unwrap();
    assert_eq!(LAST_TIME.with(Cell::get), 101.0);
    assert_eq!(result.last_successful_time, 1.25);
    assert_eq!(instance.time(), 1.25);
}

#[test_log::test]
fn test_early_return() {
    let model = mock_model(false);
    let mut instance = model
        .instantiate_cs("early", InstanceOptions::default().early_return(true, true))
        .unwrap();
    initialize(&mut instance);

    let result = instance.do_step(1.0, false, false).unwrap();
    assert!(result.early_return);
    assert_eq!(result.last_successful_time, 0.5);
    assert_eq!(instance.time(), 0.5);
    assert_eq!(instance.intermediate_updates(), 1);

    // Allowed but not elected: the FMU finishes the step
    let mut full = model
        .instantiate_cs("full", InstanceOptions::default().early_return(true, false))
        .unwrap();
    initialize(&mut full);
    let result = full.do_step(1.0, false, false).unwrap();
    assert!(!result.early_return);
    assert_eq!(full.time(), 1.0);
}

#[test_log::test]
fn test_scheduled_execution() {
    let model = mock_model(false);
    let mut instance = model.instantiate_se("se", InstanceOptions::default()).unwrap();
    initialize(&mut instance);
    assert_eq!(instance.state(), InstanceState::ClockActivationMode);

    instance.activate_model_partition(1, 0.5).unwrap();
    assert_eq!(LAST_TIME.with(Cell::get), 0.5);
    assert_eq!(instance.clock_updates(), 1);

    let mut ticks = [false; 2];
    instance.get_clock(&[1, 2], &mut ticks).unwrap();
}

#[test_log::test]
fn test_unsupported_and_length_mismatch() {
    let model = mock_model(false);
    let mut instance = model.instantiate_se("partial", InstanceOptions::default()).unwrap();
    initialize(&mut instance);

    let mut values = [0i32; 2];
    assert!(matches!(
        instance.get_int32(&[1, 2], &mut values),
        Err(Error::Unsupported("fmi3GetInt32"))
    ));

    let mut ticks = [false; 1];
    assert!(matches!(
        instance.get_clock(&[1, 2], &mut ticks),
        Err(Error::LengthMismatch {
            function: "fmi3GetClock",
            expected: 2,
            found: 1
        })
    ));

    let mut reals = [0.0; 3];
    instance.get_float64(&[1, 2, 3], &mut reals).unwrap();
    assert_eq!(reals, [0.0, 1.5, 3.0]);
}

#[test_log::test]
fn test_fmu_state_restores_lifecycle() {
    let model = mock_model(false);
    let mut instance = model.instantiate_cs("states", InstanceOptions::default()).unwrap();
    initialize(&mut instance);
    let saved = instance.get_fmu_state().unwrap().unwrap();

    instance.do_step(0.5, true, false).unwrap();
    instance.terminate(false).unwrap();
    assert_eq!(instance.state(), InstanceState::Terminated);

    instance.set_fmu_state(&saved).unwrap();
    assert_eq!(instance.state(), InstanceState::StepMode);
    assert_eq!(instance.time(), 0.0);

    instance.free_fmu_state(saved).unwrap();
}

#[test_log::test]
fn test_fatal_instance_drops_saved_states() {
    let model = mock_model(false);
    let mut instance = model.instantiate_cs("fatal_states", InstanceOptions::default()).unwrap();
    initialize(&mut instance);
    let saved = instance.get_fmu_state().unwrap().unwrap();

    set_status(binding::fmi3Status_fmi3Fatal);
    instance.do_step(0.1, true, false).unwrap_err();
    set_status(binding::fmi3Status_fmi3OK);

    let state_frees = STATE_FREES.with(Cell::get);
    let frees = FREES.with(Cell::get);
    assert!(matches!(
        instance.free_fmu_state(saved),
        Err(Error::InstanceFatal("fmi3FreeFMUState"))
    ));
    instance.free_instance().unwrap();

    assert_eq!(STATE_FREES.with(Cell::get), state_frees);
    assert_eq!(FREES.with(Cell::get), frees + 1);
}

#[test_log::test]
fn test_rejected_state_free_is_retried_on_free_instance() {
    let model = mock_model(false);
    let mut instance = model.instantiate_cs("kept_state", InstanceOptions::default()).unwrap();
    initialize(&mut instance);
    let saved = instance.get_fmu_state().unwrap().unwrap();
    let state_frees = STATE_FREES.with(Cell::get);

    set_status(binding::fmi3Status_fmi3Error);
    let err = instance.free_fmu_state(saved).unwrap_err();
    set_status(binding::fmi3Status_fmi3OK);
    assert!(matches!(err, Error::Status(report) if report.status == Status::Error));
    assert_eq!(STATE_FREES.with(Cell::get), state_frees + 1);

    instance.free_instance().unwrap();
    assert_eq!(STATE_FREES.with(Cell::get), state_frees + 2);
}

/// Shut down any kind of instance through the shared trait.
fn shutdown(instance: &mut impl FmiInstance) -> Result<(), Error> {
    instance.terminate(true)?;
    instance.free_instance()
}

#[test_log::test]
fn test_end_to_end() {
    let model = mock_model(true);
    let mut instance = model.instantiate_cs("inst1", InstanceOptions::default()).unwrap();
    let handle = instance.handle().unwrap();
    assert!(model.registry().contains(handle));
    assert_eq!(
        model.registry().lookup_by_name("inst1").map(|e| e.handle),
        Some(handle)
    );

    let status = instance
        .enter_initialization_mode(None, 0.0, None, false)
        .unwrap();
    assert_eq!(status, Status::Ok);
    assert_eq!(instance.state(), InstanceState::InitializationMode);
    instance.exit_initialization_mode(false).unwrap();
    assert_eq!(instance.state(), InstanceState::StepMode);

    for _ in 0..10 {
        let step = instance.do_step(0.1, true, false).unwrap();
        assert_eq!(step.status, Status::Ok);
        assert!(!step.terminate_simulation);
        assert_eq!(instance.state(), InstanceState::StepMode);
    }
    assert_approx_eq!(instance.time(), 1.0);

    shutdown(&mut instance).unwrap();
    assert_eq!(instance.state(), InstanceState::Terminated);
    assert!(!instance.is_live());
    assert!(!model.registry().contains(handle));
    assert!(model.registry().is_empty());
}
