//! Lifecycle tests of the FMI 2.0 instance API against an in-process mock FMU.
#![cfg(feature = "fmi2")]

use std::{
    cell::Cell,
    ffi::c_char,
    sync::atomic::{AtomicUsize, Ordering},
};

use fmi_binding::{
    fmi2::{
        self, binding,
        instance::{CoSimulation, Common, ModelExchange},
    },
    Error, EventFlags, FmiInstance, InstanceOptions, InstanceState, InterfaceCapabilities,
    ModelDescription, Status,
};

static NEXT_HANDLE: AtomicUsize = AtomicUsize::new(0x2000);

thread_local! {
    static STATUS: Cell<binding::fmi2Status> = const { Cell::new(binding::fmi2Status_fmi2OK) };
    static CALLS: Cell<usize> = const { Cell::new(0) };
    static INSTANTIATIONS: Cell<usize> = const { Cell::new(0) };
    static FREES: Cell<usize> = const { Cell::new(0) };
    static STATE_FREES: Cell<usize> = const { Cell::new(0) };
    /// Value reported by `fmi2GetStatus(fmi2DoStepStatus)`
    static DO_STEP_STATUS: Cell<binding::fmi2Status> =
        const { Cell::new(binding::fmi2Status_fmi2Pending) };
    static LAST_TIME: Cell<f64> = const { Cell::new(f64::NAN) };
    static CALLBACKS: Cell<Option<binding::fmi2CallbackFunctions>> = const { Cell::new(None) };
}

fn set_status(status: binding::fmi2Status) {
    STATUS.with(|s| s.set(status));
}

fn calls() -> usize {
    CALLS.with(Cell::get)
}

fn status_call() -> binding::fmi2Status {
    CALLS.with(|n| n.set(n.get() + 1));
    STATUS.with(Cell::get)
}

unsafe extern "C" fn get_version() -> *const c_char {
    c"2.0".as_ptr()
}

unsafe extern "C" fn get_types_platform() -> *const c_char {
    c"default".as_ptr()
}

unsafe extern "C" fn instantiate(
    instance_name: binding::fmi2String,
    _fmu_type: binding::fmi2Type,
    _guid: binding::fmi2String,
    _resource_location: binding::fmi2String,
    functions: *const binding::fmi2CallbackFunctions,
    _visible: binding::fmi2Boolean,
    _logging_on: binding::fmi2Boolean,
) -> binding::fmi2Component {
    let functions = *functions;
    CALLBACKS.with(|c| c.set(Some(functions)));
    if let Some(logger) = functions.logger {
        logger(
            functions.componentEnvironment,
            instance_name,
            binding::fmi2Status_fmi2OK,
            c"logAll".as_ptr(),
            c"instantiated".as_ptr(),
        );
    }
    INSTANTIATIONS.with(|n| n.set(n.get() + 1));
    NEXT_HANDLE.fetch_add(16, Ordering::Relaxed) as binding::fmi2Component
}

unsafe extern "C" fn free_instance(_c: binding::fmi2Component) {
    FREES.with(|n| n.set(n.get() + 1));
}

unsafe extern "C" fn setup_experiment(
    _c: binding::fmi2Component,
    _tolerance_defined: binding::fmi2Boolean,
    _tolerance: f64,
    start_time: f64,
    _stop_time_defined: binding::fmi2Boolean,
    _stop_time: f64,
) -> binding::fmi2Status {
    LAST_TIME.with(|t| t.set(start_time));
    status_call()
}

unsafe extern "C" fn no_args(_c: binding::fmi2Component) -> binding::fmi2Status {
    status_call()
}

unsafe extern "C" fn do_step(
    _c: binding::fmi2Component,
    current: f64,
    _step_size: f64,
    _no_set_prior: binding::fmi2Boolean,
) -> binding::fmi2Status {
    LAST_TIME.with(|t| t.set(current));
    let status = status_call();
    if status == binding::fmi2Status_fmi2Pending {
        if let Some(functions) = CALLBACKS.with(Cell::get) {
            if let Some(step_finished) = functions.stepFinished {
                step_finished(functions.componentEnvironment, binding::fmi2Status_fmi2OK);
            }
        }
    }
    status
}

unsafe extern "C" fn get_real_status(
    _c: binding::fmi2Component,
    _kind: binding::fmi2StatusKind,
    value: *mut f64,
) -> binding::fmi2Status {
    *value = LAST_TIME.with(Cell::get);
    status_call()
}

unsafe extern "C" fn get_status(
    _c: binding::fmi2Component,
    _kind: binding::fmi2StatusKind,
    value: *mut binding::fmi2Status,
) -> binding::fmi2Status {
    *value = DO_STEP_STATUS.with(Cell::get);
    status_call()
}

unsafe extern "C" fn get_fmu_state(
    _c: binding::fmi2Component,
    state: *mut binding::fmi2FMUstate,
) -> binding::fmi2Status {
    *state = NEXT_HANDLE.fetch_add(16, Ordering::Relaxed) as binding::fmi2FMUstate;
    status_call()
}

unsafe extern "C" fn free_fmu_state(
    _c: binding::fmi2Component,
    state: *mut binding::fmi2FMUstate,
) -> binding::fmi2Status {
    STATE_FREES.with(|n| n.set(n.get() + 1));
    *state = std::ptr::null_mut();
    status_call()
}

unsafe extern "C" fn get_real(
    _c: binding::fmi2Component,
    _vr: *const binding::fmi2ValueReference,
    nvr: usize,
    value: *mut f64,
) -> binding::fmi2Status {
    for i in 0..nvr {
        *value.add(i) = 2.0 * i as f64;
    }
    status_call()
}

unsafe extern "C" fn get_boolean(
    _c: binding::fmi2Component,
    _vr: *const binding::fmi2ValueReference,
    nvr: usize,
    value: *mut binding::fmi2Boolean,
) -> binding::fmi2Status {
    for i in 0..nvr {
        *value.add(i) = (i % 2) as binding::fmi2Boolean;
    }
    status_call()
}

unsafe extern "C" fn new_discrete_states(
    _c: binding::fmi2Component,
    event_info: *mut binding::fmi2EventInfo,
) -> binding::fmi2Status {
    *event_info = binding::fmi2EventInfo {
        nextEventTimeDefined: binding::fmi2True,
        nextEventTime: 4.0,
        ..Default::default()
    };
    status_call()
}

unsafe extern "C" fn set_time(_c: binding::fmi2Component, time: f64) -> binding::fmi2Status {
    LAST_TIME.with(|t| t.set(time));
    status_call()
}

/// Entry-point table of a complete FMU, without `fmi2Reset`.
fn mock_binding() -> binding::Fmi2Binding {
    let mut binding = binding::Fmi2Binding::default();
    binding.fmi2GetVersion = Some(get_version);
    binding.fmi2GetTypesPlatform = Some(get_types_platform);
    binding.fmi2Instantiate = Some(instantiate);
    binding.fmi2FreeInstance = Some(free_instance);
    binding.fmi2SetupExperiment = Some(setup_experiment);
    binding.fmi2EnterInitializationMode = Some(no_args);
    binding.fmi2ExitInitializationMode = Some(no_args);
    binding.fmi2Terminate = Some(no_args);
    binding.fmi2EnterEventMode = Some(no_args);
    binding.fmi2EnterContinuousTimeMode = Some(no_args);
    binding.fmi2NewDiscreteStates = Some(new_discrete_states);
    binding.fmi2SetTime = Some(set_time);
    binding.fmi2DoStep = Some(do_step);
    binding.fmi2GetRealStatus = Some(get_real_status);
    binding.fmi2GetStatus = Some(get_status);
    binding.fmi2GetFMUstate = Some(get_fmu_state);
    binding.fmi2FreeFMUstate = Some(free_fmu_state);
    binding.fmi2GetReal = Some(get_real);
    binding.fmi2GetBoolean = Some(get_boolean);
    binding
}

fn description(once_per_process: bool) -> ModelDescription {
    let capabilities = InterfaceCapabilities {
        model_identifier: "Mock".to_owned(),
        can_be_instantiated_only_once_per_process: once_per_process,
        // Ignored by FMI 2.0, which has no Event Mode in Co-Simulation
        has_event_mode: true,
        ..Default::default()
    };
    ModelDescription {
        fmi_version: "2.0".to_owned(),
        model_name: "Mock".to_owned(),
        instantiation_token: "{mock-guid}".to_owned(),
        model_exchange: Some(capabilities.clone()),
        co_simulation: Some(capabilities),
        ..Default::default()
    }
}

fn mock_model() -> fmi2::Model {
    fmi2::Model::new(mock_binding(), description(false), "file:///tmp/resources/").unwrap()
}

fn initialize<Tag: fmi_binding::InstanceTag>(instance: &mut fmi2::Instance<'_, Tag>) {
    instance.setup_experiment(None, 0.0, None).unwrap();
    instance.enter_initialization_mode(false).unwrap();
    instance.exit_initialization_mode(false).unwrap();
}

#[test_log::test]
fn test_check_consistency() {
    let model = mock_model();
    model.check_consistency().unwrap();
    let instance = model.instantiate_me("version", InstanceOptions::default()).unwrap();
    assert_eq!(instance.get_version().unwrap(), "2.0");
    assert_eq!(instance.get_types_platform().unwrap(), "default");
}

#[test_log::test]
fn test_operating_states() {
    let model = mock_model();

    let mut me = model.instantiate_me("me", InstanceOptions::default()).unwrap();
    initialize(&mut me);
    assert_eq!(me.state(), InstanceState::EventMode);

    let mut cs = model.instantiate_cs("cs", InstanceOptions::default()).unwrap();
    initialize(&mut cs);
    assert_eq!(cs.state(), InstanceState::StepMode);
}

#[test_log::test]
fn test_me_event_loop() {
    let model = mock_model();
    let mut instance = model.instantiate_me("me", InstanceOptions::default()).unwrap();
    initialize(&mut instance);

    let mut flags = EventFlags::default();
    instance.new_discrete_states(&mut flags).unwrap();
    assert_eq!(flags.next_event_time, Some(4.0));

    instance.enter_continuous_time_mode(false).unwrap();
    instance.set_time(1.5).unwrap();
    assert_eq!(instance.time(), 1.5);
    instance.enter_event_mode(false).unwrap();
    assert_eq!(instance.state(), InstanceState::EventMode);

    // Not exported by the mock
    let mut states = [0.0; 2];
    assert!(matches!(
        instance.get_continuous_states(&mut states),
        Err(Error::Unsupported("fmi2GetContinuousStates"))
    ));
}

#[test_log::test]
fn test_soft_step_is_bypassed() {
    let model = mock_model();
    let mut instance = model.instantiate_cs("soft", InstanceOptions::default()).unwrap();
    let before = calls();

    assert_eq!(instance.do_step(0.1, true, true).unwrap(), Status::Ok);
    assert_eq!(calls(), before);
    assert_eq!(instance.time(), 0.0);
    assert_eq!(instance.state(), InstanceState::Instantiated);

    // Without `soft` the illegal call is forwarded anyway
    instance.do_step(0.1, true, false).unwrap();
    assert_eq!(calls(), before + 1);
}

#[test_log::test]
fn test_fatal_blocks_further_calls() {
    let model = mock_model();
    let mut instance = model.instantiate_cs("fatal", InstanceOptions::default()).unwrap();
    initialize(&mut instance);

    set_status(binding::fmi2Status_fmi2Fatal);
    let err = instance.do_step(0.1, true, false).unwrap_err();
    set_status(binding::fmi2Status_fmi2OK);
    assert!(err.is_unrecoverable());
    assert_eq!(instance.state(), InstanceState::Fatal);

    let before = calls();
    assert!(matches!(
        instance.terminate(true),
        Err(Error::InstanceFatal("fmi2Terminate"))
    ));
    assert_eq!(calls(), before);
    instance.free_instance().unwrap();
}

#[test_log::test]
fn test_rejected_step() {
    let model = mock_model();
    let mut instance = model.instantiate_cs("rejected", InstanceOptions::default()).unwrap();
    initialize(&mut instance);

    set_status(binding::fmi2Status_fmi2Discard);
    let status = instance.do_step(0.1, true, false).unwrap();
    set_status(binding::fmi2Status_fmi2OK);
    assert_eq!(status, Status::Discard);
    assert_eq!(instance.state(), InstanceState::StepMode);
    assert_eq!(instance.time(), 0.0);

    set_status(binding::fmi2Status_fmi2Error);
    let err = instance.do_step(0.1, true, false).unwrap_err();
    set_status(binding::fmi2Status_fmi2OK);
    assert!(matches!(err, Error::Status(report) if report.status == Status::Error));
    assert_eq!(instance.state(), InstanceState::Error);
    assert_eq!(instance.time(), 0.0);
}

#[test_log::test]
fn test_asynchronous_step() {
    let model = mock_model();
    let mut instance = model.instantiate_cs("async", InstanceOptions::default()).unwrap();
    initialize(&mut instance);
    assert_eq!(instance.take_async_status(), None);

    set_status(binding::fmi2Status_fmi2Pending);
    let status = instance.do_step(0.1, true, false).unwrap();
    set_status(binding::fmi2Status_fmi2OK);

    assert_eq!(status, Status::Pending);
    assert_eq!(instance.state(), InstanceState::StepMode);
    assert_eq!(instance.take_async_status(), Some(Status::Ok));
    assert_eq!(instance.take_async_status(), None);
}

#[test_log::test]
fn test_asynchronous_step_advances_time() {
    let model = mock_model();
    let mut instance = model.instantiate_cs("async_time", InstanceOptions::default()).unwrap();
    initialize(&mut instance);

    set_status(binding::fmi2Status_fmi2Pending);
    assert_eq!(instance.do_step(0.5, true, false).unwrap(), Status::Pending);
    set_status(binding::fmi2Status_fmi2OK);
    assert_eq!(instance.time(), 0.0);

    assert_eq!(instance.take_async_status(), Some(Status::Ok));
    assert_eq!(instance.time(), 0.5);

    assert_eq!(instance.do_step(0.5, true, false).unwrap(), Status::Ok);
    assert_eq!(LAST_TIME.with(Cell::get), 0.5);
    assert_eq!(instance.time(), 1.0);
}

#[test_log::test]
fn test_polled_step_status_advances_time_once() {
    let model = mock_model();
    let mut instance = model.instantiate_cs("polled", InstanceOptions::default()).unwrap();
    initialize(&mut instance);

    set_status(binding::fmi2Status_fmi2Pending);
    instance.do_step(0.25, true, false).unwrap();
    set_status(binding::fmi2Status_fmi2OK);

    DO_STEP_STATUS.with(|s| s.set(binding::fmi2Status_fmi2Pending));
    assert_eq!(instance.do_step_status().unwrap(), Status::Pending);
    assert_eq!(instance.time(), 0.0);

    DO_STEP_STATUS.with(|s| s.set(binding::fmi2Status_fmi2OK));
    assert_eq!(instance.do_step_status().unwrap(), Status::Ok);
    assert_eq!(instance.time(), 0.25);

    // The callback reported the same step, which must not advance time a second time
    assert_eq!(instance.take_async_status(), Some(Status::Ok));
    assert_eq!(instance.do_step_status().unwrap(), Status::Ok);
    assert_eq!(instance.time(), 0.25);
}

#[test_log::test]
fn test_fatal_instance_drops_saved_states() {
    let model = mock_model();
    let mut instance = model.instantiate_cs("fatal_states", InstanceOptions::default()).unwrap();
    initialize(&mut instance);
    let saved = instance.get_fmu_state().unwrap().unwrap();

    set_status(binding::fmi2Status_fmi2Fatal);
    instance.do_step(0.1, true, false).unwrap_err();
    set_status(binding::fmi2Status_fmi2OK);
    assert_eq!(instance.state(), InstanceState::Fatal);

    let state_frees = STATE_FREES.with(Cell::get);
    assert!(matches!(
        instance.free_fmu_state(saved),
        Err(Error::InstanceFatal("fmi2FreeFMUstate"))
    ));
    instance.free_instance().unwrap();
    assert_eq!(STATE_FREES.with(Cell::get), state_frees);
}

#[test_log::test]
fn test_freed_state_is_not_freed_again() {
    let model = mock_model();
    let mut instance = model.instantiate_cs("state_once", InstanceOptions::default()).unwrap();
    initialize(&mut instance);
    let saved = instance.get_fmu_state().unwrap().unwrap();
    let state_frees = STATE_FREES.with(Cell::get);

    assert_eq!(instance.free_fmu_state(saved).unwrap(), Status::Ok);
    instance.free_instance().unwrap();
    assert_eq!(STATE_FREES.with(Cell::get), state_frees + 1);
}

#[test_log::test]
fn test_double_free() {
    let model = mock_model();
    let mut instance = model.instantiate_cs("twice", InstanceOptions::default()).unwrap();
    let frees = FREES.with(Cell::get);

    instance.free_instance().unwrap();
    assert!(matches!(instance.free_instance(), Err(Error::Consistency(_))));
    assert!(matches!(
        instance.do_step(0.1, true, true),
        Err(Error::Freed("fmi2DoStep"))
    ));
    assert_eq!(FREES.with(Cell::get), frees + 1);
}

#[test_log::test]
fn test_emulated_reset() {
    let model = mock_model();
    let mut instance = model.instantiate_me("reset", InstanceOptions::default()).unwrap();
    let first = instance.handle().unwrap();
    initialize(&mut instance);
    instance.terminate(false).unwrap();

    let instantiations = INSTANTIATIONS.with(Cell::get);
    instance.reset(false).unwrap();
    let second = instance.handle().unwrap();

    assert_ne!(first, second);
    assert_eq!(INSTANTIATIONS.with(Cell::get), instantiations + 1);
    assert_eq!(instance.state(), InstanceState::Instantiated);
    assert!(!model.registry().contains(first));
    assert!(model.registry().contains(second));

    // The fresh instance goes through the whole lifecycle again
    initialize(&mut instance);
    assert_eq!(instance.state(), InstanceState::EventMode);
}

#[test_log::test]
fn test_reset_is_gated() {
    let model = mock_model();
    let mut instance = model.instantiate_cs("early_reset", InstanceOptions::default()).unwrap();
    let handle = instance.handle();

    assert_eq!(instance.reset(true).unwrap(), Status::Ok);
    assert_eq!(instance.handle(), handle);
    assert_eq!(instance.state(), InstanceState::Instantiated);
}

#[test_log::test]
fn test_once_per_process() {
    let model =
        fmi2::Model::new(mock_binding(), description(true), "file:///tmp/resources/").unwrap();
    let mut first = model.instantiate_cs("first", InstanceOptions::default()).unwrap();
    assert!(matches!(
        model.instantiate_cs("second", InstanceOptions::default()),
        Err(Error::Instantiation)
    ));

    first.free_instance().unwrap();
    model
        .instantiate_cs("third", InstanceOptions::default())
        .unwrap();
}

#[test_log::test]
fn test_values() {
    let model = mock_model();
    let mut instance = model.instantiate_cs("values", InstanceOptions::default()).unwrap();
    initialize(&mut instance);

    let mut reals = [0.0; 3];
    instance.get_real(&[0, 1, 2], &mut reals).unwrap();
    assert_eq!(reals, [0.0, 2.0, 4.0]);

    let mut flags = [true; 2];
    instance.get_boolean(&[0, 1], &mut flags).unwrap();
    assert_eq!(flags, [false, true]);

    let mut short = [0.0; 2];
    assert!(matches!(
        instance.get_real(&[0, 1, 2], &mut short),
        Err(Error::LengthMismatch {
            function: "fmi2GetReal",
            expected: 3,
            found: 2
        })
    ));
}

#[test_log::test]
fn test_time_offset() {
    let model = mock_model();
    let mut instance = model.instantiate_cs("offset", InstanceOptions::default()).unwrap();
    instance.set_time_offset(50.0);
    initialize(&mut instance);
    assert_eq!(LAST_TIME.with(Cell::get), 50.0);

    instance.do_step(0.5, true, false).unwrap();
    assert_eq!(LAST_TIME.with(Cell::get), 50.0);
    assert_eq!(instance.time(), 0.5);
    assert_eq!(instance.last_successful_time().unwrap(), 0.0);
}

fn run_to_end(instance: &mut impl FmiInstance) -> Result<(), Error> {
    assert!(instance.is_live());
    instance.terminate(false)?;
    assert_eq!(instance.state(), InstanceState::Terminated);
    instance.free_instance()
}

#[test_log::test]
fn test_end_to_end() {
    let model = mock_model();
    let mut instance = model.instantiate_cs("inst1", InstanceOptions::default()).unwrap();
    assert_eq!(model.registry().len(), 1);

    initialize(&mut instance);
    for _ in 0..4 {
        assert_eq!(instance.do_step(0.25, true, false).unwrap(), Status::Ok);
    }
    assert_eq!(instance.time(), 1.0);

    run_to_end(&mut instance).unwrap();
    assert!(instance.handle().is_none());
    assert!(model.registry().is_empty());
}
