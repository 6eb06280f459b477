//! The instance state machine shared by FMI 2.0 and FMI 3.0 instances.

use std::fmt;

use crate::{
    status::{classify, Classification, Severity, Status, StatusPolicy, StatusReport},
    Error, InterfaceType, ModelDescription,
};

/// Lifecycle states of an FMU instance, the union of the FMI 2.0 and FMI 3.0 state machines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstanceState {
    /// Directly after instantiation or reset.
    Instantiated,
    /// FMI 3.0: structural parameters may be changed before initialization.
    ConfigurationMode,
    /// FMI 3.0: structural parameters may be changed during the simulation.
    ReconfigurationMode,
    InitializationMode,
    /// Co-Simulation: communication steps with `do_step`.
    StepMode,
    EventMode,
    /// Scheduled Execution: model partitions are activated.
    ClockActivationMode,
    /// Model Exchange: continuous states are integrated by the importer.
    ContinuousTimeMode,
    Terminated,
    /// A call returned `Error`. Only `reset`, `free_instance` and FMU state restoration help.
    Error,
    /// A call returned `Fatal`. The instance can only be freed.
    Fatal,
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The state an instance operates in after leaving Initialization Mode or Reconfiguration Mode.
///
/// * Model Exchange: Event Mode
/// * Co-Simulation: Event Mode if the instance was created with `event_mode_used` and the model
///   has an Event Mode, Step Mode otherwise
/// * Scheduled Execution: Clock Activation Mode
pub fn operating_state(
    interface: InterfaceType,
    event_mode_used: bool,
    description: &ModelDescription,
) -> InstanceState {
    match interface {
        InterfaceType::ModelExchange => InstanceState::EventMode,
        InterfaceType::CoSimulation if event_mode_used && description.has_event_mode() => {
            InstanceState::EventMode
        }
        InterfaceType::CoSimulation => InstanceState::StepMode,
        InterfaceType::ScheduledExecution => InstanceState::ClockActivationMode,
    }
}

/// Legal source states of the guarded operations.
pub(crate) mod legal {
    use super::InstanceState::{self, *};

    pub const INSTANTIATED: &[InstanceState] = &[Instantiated];
    pub const INITIALIZATION: &[InstanceState] = &[InitializationMode];
    pub const CONFIGURATION_ENTRY: &[InstanceState] =
        &[Instantiated, StepMode, EventMode, ClockActivationMode];
    pub const CONFIGURATION: &[InstanceState] = &[ConfigurationMode, ReconfigurationMode];
    pub const EVENT: &[InstanceState] = &[EventMode];
    pub const EVENT_ENTRY: &[InstanceState] = &[ContinuousTimeMode, StepMode];
    pub const CONTINUOUS_TIME: &[InstanceState] = &[ContinuousTimeMode];
    pub const EVENT_OR_CONTINUOUS_TIME: &[InstanceState] = &[EventMode, ContinuousTimeMode];
    pub const STEP: &[InstanceState] = &[StepMode];
    pub const CLOCK_ACTIVATION: &[InstanceState] = &[ClockActivationMode];
    pub const DISCRETE_UPDATE: &[InstanceState] = &[EventMode, ClockActivationMode];
    pub const DISCRETE_EVALUATION: &[InstanceState] = &[ContinuousTimeMode, StepMode];
    pub const TERMINATE: &[InstanceState] =
        &[ContinuousTimeMode, EventMode, ClockActivationMode, StepMode];
    pub const RESET: &[InstanceState] = &[Terminated, Error];
    pub const ME_QUERY: &[InstanceState] = &[
        InitializationMode,
        EventMode,
        ContinuousTimeMode,
        Terminated,
        Error,
    ];
    pub const STEP_QUERY: &[InstanceState] = &[StepMode, Terminated, Error];
    pub const INPUT_DERIVATIVES: &[InstanceState] = &[Instantiated, InitializationMode, StepMode];
    pub const GET: &[InstanceState] = &[
        InitializationMode,
        ConfigurationMode,
        ReconfigurationMode,
        EventMode,
        ContinuousTimeMode,
        StepMode,
        ClockActivationMode,
        Terminated,
        Error,
    ];
    pub const SET: &[InstanceState] = &[
        Instantiated,
        ConfigurationMode,
        ReconfigurationMode,
        InitializationMode,
        EventMode,
        ContinuousTimeMode,
        StepMode,
        ClockActivationMode,
    ];
    pub const ANY: &[InstanceState] = &[
        Instantiated,
        ConfigurationMode,
        ReconfigurationMode,
        InitializationMode,
        StepMode,
        EventMode,
        ClockActivationMode,
        ContinuousTimeMode,
        Terminated,
        Error,
    ];
}

/// Declaration of a guarded operation: legal source states, soft-mode flag and the transition
/// applied when the native call succeeds.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Guard {
    pub function: &'static str,
    pub legal: &'static [InstanceState],
    pub soft: bool,
    pub on_success: Option<InstanceState>,
}

impl Guard {
    pub fn new(function: &'static str, legal: &'static [InstanceState]) -> Self {
        Self {
            function,
            legal,
            soft: false,
            on_success: None,
        }
    }

    pub fn soft(self, soft: bool) -> Self {
        Self { soft, ..self }
    }

    pub fn transition(self, next: InstanceState) -> Self {
        Self {
            on_success: Some(next),
            ..self
        }
    }
}

/// Outcome of checking a [`Guard`] against the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Gate {
    /// Invoke the native function.
    Call,
    /// Soft call from an illegal state: report `Ok` without invoking native code.
    Bypass,
}

/// Bookkeeping shared by FMI 2.0 and FMI 3.0 instances.
#[derive(Debug)]
pub(crate) struct Lifecycle {
    name: String,
    state: InstanceState,
    policy: StatusPolicy,
    /// Simulation time as seen by the importer
    time: f64,
    /// Added to every time value forwarded to native code
    time_offset: f64,
}

impl Lifecycle {
    pub fn new(name: impl Into<String>, policy: StatusPolicy) -> Self {
        Self {
            name: name.into(),
            state: InstanceState::Instantiated,
            policy,
            time: 0.0,
            time_offset: 0.0,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn state(&self) -> InstanceState {
        self.state
    }

    #[inline]
    pub fn policy(&self) -> StatusPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: StatusPolicy) {
        self.policy = policy;
    }

    /// Check `guard` against the current state.
    pub fn gate(&self, guard: &Guard) -> Result<Gate, Error> {
        if self.state == InstanceState::Fatal {
            log::error!(
                "`{}` refused: instance '{}' is in state Fatal",
                guard.function,
                self.name
            );
            return Err(Error::InstanceFatal(guard.function));
        }

        if guard.legal.contains(&self.state) {
            return Ok(Gate::Call);
        }

        if guard.soft {
            log::debug!(
                "`{}` skipped on instance '{}' in state {}",
                guard.function,
                self.name,
                self.state
            );
            Ok(Gate::Bypass)
        } else {
            log::warn!(
                "`{}` called on instance '{}' in state {}, allowed only in {:?}",
                guard.function,
                self.name,
                self.state,
                guard.legal
            );
            Ok(Gate::Call)
        }
    }

    /// Classify the status of a completed native call and apply the resulting transition.
    pub fn settle(&mut self, guard: &Guard, status: Status) -> Result<Status, Error> {
        let Classification { severity, raise } = classify(status, &self.policy);

        match severity {
            Severity::Ok | Severity::Warning => {
                if let Some(next) = guard.on_success {
                    if next != self.state {
                        log::trace!("Instance '{}': {} -> {next}", self.name, self.state);
                    }
                    self.state = next;
                }
            }
            Severity::Discard => {}
            Severity::Error => self.state = InstanceState::Error,
            Severity::Fatal => self.state = InstanceState::Fatal,
        }

        match severity {
            Severity::Ok => {}
            Severity::Warning | Severity::Discard => log::warn!(
                "`{}` on instance '{}' returned {status}",
                guard.function,
                self.name
            ),
            Severity::Error | Severity::Fatal => log::error!(
                "`{}` on instance '{}' returned {status}",
                guard.function,
                self.name
            ),
        }

        if raise {
            Err(Error::Status(StatusReport {
                function: guard.function,
                instance: self.name.clone(),
                status,
                severity,
            }))
        } else {
            Ok(status)
        }
    }

    /// Return to `Instantiated` with the simulation time cleared, as after a fresh
    /// instantiation.
    pub fn restart(&mut self) {
        self.state = InstanceState::Instantiated;
        self.time = 0.0;
    }

    pub fn fail(&mut self, state: InstanceState) {
        self.state = state;
    }

    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn set_time(&mut self, time: f64) {
        if time < self.time {
            log::debug!(
                "Instance '{}': time moves backwards from {} to {time}",
                self.name,
                self.time
            );
        }
        self.time = time;
    }

    #[inline]
    pub fn time_offset(&self) -> f64 {
        self.time_offset
    }

    pub fn set_time_offset(&mut self, offset: f64) {
        self.time_offset = offset;
    }

    /// Convert an importer time into the time forwarded to native code.
    #[inline]
    pub fn native_time(&self, time: f64) -> f64 {
        time + self.time_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InterfaceCapabilities;

    fn cs_description(has_event_mode: bool) -> ModelDescription {
        ModelDescription {
            co_simulation: Some(InterfaceCapabilities {
                model_identifier: "model".to_owned(),
                has_event_mode,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_operating_state() {
        let me = ModelDescription::default();
        assert_eq!(
            operating_state(InterfaceType::ModelExchange, false, &me),
            InstanceState::EventMode
        );
        assert_eq!(
            operating_state(InterfaceType::CoSimulation, false, &cs_description(true)),
            InstanceState::StepMode
        );
        assert_eq!(
            operating_state(InterfaceType::CoSimulation, true, &cs_description(true)),
            InstanceState::EventMode
        );
        assert_eq!(
            operating_state(InterfaceType::CoSimulation, true, &cs_description(false)),
            InstanceState::StepMode
        );
        assert_eq!(
            operating_state(InterfaceType::ScheduledExecution, false, &me),
            InstanceState::ClockActivationMode
        );
    }

    #[test]
    fn test_gate() {
        let lifecycle = Lifecycle::new("inst", StatusPolicy::default());
        let guard = Guard::new("fmi3DoStep", legal::STEP);
        assert_eq!(lifecycle.gate(&guard).unwrap(), Gate::Call);
        assert_eq!(lifecycle.gate(&guard.soft(true)).unwrap(), Gate::Bypass);
        let guard = Guard::new("fmi3EnterInitializationMode", legal::INSTANTIATED).soft(true);
        assert_eq!(lifecycle.gate(&guard).unwrap(), Gate::Call);
    }

    #[test]
    fn test_settle_transitions() {
        let mut lifecycle = Lifecycle::new("inst", StatusPolicy::LENIENT);
        let guard = Guard::new("fmi3EnterInitializationMode", legal::INSTANTIATED)
            .transition(InstanceState::InitializationMode);

        // Discard leaves the state untouched
        assert_eq!(lifecycle.settle(&guard, Status::Discard).unwrap(), Status::Discard);
        assert_eq!(lifecycle.state(), InstanceState::Instantiated);

        assert_eq!(lifecycle.settle(&guard, Status::Warning).unwrap(), Status::Warning);
        assert_eq!(lifecycle.state(), InstanceState::InitializationMode);

        assert_eq!(lifecycle.settle(&guard, Status::Error).unwrap(), Status::Error);
        assert_eq!(lifecycle.state(), InstanceState::Error);
    }

    #[test]
    fn test_fatal_is_terminal() {
        let mut lifecycle = Lifecycle::new("inst", StatusPolicy::LENIENT);
        let guard = Guard::new("fmi3Terminate", legal::TERMINATE)
            .transition(InstanceState::Terminated);
        let err = lifecycle.settle(&guard, Status::Fatal).unwrap_err();
        assert!(err.is_unrecoverable());
        assert_eq!(lifecycle.state(), InstanceState::Fatal);

        let soft = Guard::new("fmi3Reset", legal::RESET).soft(true);
        assert!(matches!(
            lifecycle.gate(&soft),
            Err(Error::InstanceFatal("fmi3Reset"))
        ));
    }

    #[test]
    fn test_time_offset() {
        let mut lifecycle = Lifecycle::new("inst", StatusPolicy::default());
        lifecycle.set_time(2.0);
        lifecycle.set_time_offset(10.0);
        assert_eq!(lifecycle.native_time(lifecycle.time()), 12.0);
        lifecycle.restart();
        assert_eq!(lifecycle.time(), 0.0);
        assert_eq!(lifecycle.time_offset(), 10.0);
    }
}
