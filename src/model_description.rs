//! Read-only metadata consumed by the binding.
//!
//! The values are produced by an external `modelDescription.xml` parser (or built by hand); the
//! binding only projects them into the decisions the state machine needs.

use std::fmt::Display;

use crate::InterfaceType;

/// Capability flags of one interface type (`<ModelExchange>`, `<CoSimulation>` or
/// `<ScheduledExecution>`).
#[derive(Default, PartialEq, Debug, Clone)]
pub struct InterfaceCapabilities {
    /// Prefix of the exported C functions, and base name of the shared library.
    pub model_identifier: String,
    pub needs_execution_tool: bool,
    pub can_be_instantiated_only_once_per_process: bool,
    pub can_get_and_set_fmu_state: bool,
    pub can_serialize_fmu_state: bool,
    pub provides_directional_derivatives: bool,
    pub provides_adjoint_derivatives: bool,
    /// Co-Simulation only
    pub can_handle_variable_communication_step_size: bool,
    /// Co-Simulation only
    pub has_event_mode: bool,
    /// Co-Simulation only
    pub provides_intermediate_update: bool,
    /// Co-Simulation only
    pub can_return_early_after_intermediate_update: bool,
    /// Co-Simulation only
    pub might_return_early_from_do_step: bool,
    /// FMI 2.0 Co-Simulation only
    pub can_run_asynchronuously: bool,
    /// Model Exchange only
    pub completed_integrator_step_not_needed: bool,
}

#[derive(Default, PartialEq, Debug, Clone, Copy)]
pub struct DefaultExperiment {
    pub start_time: Option<f64>,
    pub stop_time: Option<f64>,
    pub tolerance: Option<f64>,
    pub step_size: Option<f64>,
}

/// Counts of variables in the model
#[derive(Default, PartialEq, Eq, Debug, Clone, Copy)]
pub struct VariableCounts {
    pub num_states: usize,
    pub num_event_indicators: usize,
    pub num_inputs: usize,
    pub num_outputs: usize,
    pub num_parameters: usize,
}

impl Display for VariableCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Variable Counts")
            .field("States", &self.num_states)
            .field("Event indicators", &self.num_event_indicators)
            .field("Inputs", &self.num_inputs)
            .field("Outputs", &self.num_outputs)
            .field("Parameters", &self.num_parameters)
            .finish()
    }
}

#[derive(Default, PartialEq, Eq, Debug, Clone, Copy)]
pub enum VariableNamingConvention {
    #[default]
    Flat,
    Structured,
}

#[derive(Default, PartialEq, Debug, Clone)]
pub struct ModelDescription {
    /// Version string of the standard the FMU was exported for, e.g. "3.0"
    pub fmi_version: String,
    pub model_name: String,
    /// `guid` in FMI 2.0, `instantiationToken` in FMI 3.0
    pub instantiation_token: String,
    pub model_exchange: Option<InterfaceCapabilities>,
    pub co_simulation: Option<InterfaceCapabilities>,
    pub scheduled_execution: Option<InterfaceCapabilities>,
    pub counts: VariableCounts,
    pub variable_naming_convention: VariableNamingConvention,
    /// Names of the `<LogCategories>` declared by the FMU
    pub log_categories: Vec<String>,
    pub default_experiment: Option<DefaultExperiment>,
}

impl ModelDescription {
    pub fn supports_model_exchange(&self) -> bool {
        self.model_exchange.is_some()
    }

    pub fn supports_co_simulation(&self) -> bool {
        self.co_simulation.is_some()
    }

    pub fn supports_scheduled_execution(&self) -> bool {
        self.scheduled_execution.is_some()
    }

    pub fn supports(&self, interface: InterfaceType) -> bool {
        self.capabilities(interface).is_some()
    }

    pub fn capabilities(&self, interface: InterfaceType) -> Option<&InterfaceCapabilities> {
        match interface {
            InterfaceType::ModelExchange => self.model_exchange.as_ref(),
            InterfaceType::CoSimulation => self.co_simulation.as_ref(),
            InterfaceType::ScheduledExecution => self.scheduled_execution.as_ref(),
        }
    }

    pub fn model_identifier(&self, interface: InterfaceType) -> Option<&str> {
        self.capabilities(interface)
            .map(|caps| caps.model_identifier.as_str())
    }

    fn any_interface(&self, flag: impl Fn(&InterfaceCapabilities) -> bool) -> bool {
        [
            &self.model_exchange,
            &self.co_simulation,
            &self.scheduled_execution,
        ]
        .into_iter()
        .flatten()
        .any(flag)
    }

    /// Whether the Co-Simulation interface supports Event Mode.
    pub fn has_event_mode(&self) -> bool {
        self.co_simulation
            .as_ref()
            .is_some_and(|cs| cs.has_event_mode)
    }

    pub fn can_get_and_set_fmu_state(&self) -> bool {
        self.any_interface(|caps| caps.can_get_and_set_fmu_state)
    }

    pub fn can_serialize_fmu_state(&self) -> bool {
        self.any_interface(|caps| caps.can_serialize_fmu_state)
    }

    pub fn provides_directional_derivatives(&self) -> bool {
        self.any_interface(|caps| caps.provides_directional_derivatives)
    }

    pub fn provides_adjoint_derivatives(&self) -> bool {
        self.any_interface(|caps| caps.provides_adjoint_derivatives)
    }

    pub fn can_handle_variable_communication_step_size(&self) -> bool {
        self.co_simulation
            .as_ref()
            .is_some_and(|cs| cs.can_handle_variable_communication_step_size)
    }

    /// Whether an instance of `interface` may be asked to return early from `do_step` after an
    /// intermediate update.
    pub fn can_return_early(&self, interface: InterfaceType) -> bool {
        self.capabilities(interface)
            .is_some_and(|caps| caps.can_return_early_after_intermediate_update)
    }

    pub fn num_states(&self) -> usize {
        self.counts.num_states
    }

    pub fn num_event_indicators(&self) -> usize {
        self.counts.num_event_indicators
    }

    pub fn num_inputs(&self) -> usize {
        self.counts.num_inputs
    }

    pub fn num_outputs(&self) -> usize {
        self.counts.num_outputs
    }

    pub fn num_parameters(&self) -> usize {
        self.counts.num_parameters
    }

    pub fn variable_naming_convention(&self) -> VariableNamingConvention {
        self.variable_naming_convention
    }

    pub fn default_experiment(&self) -> Option<&DefaultExperiment> {
        self.default_experiment.as_ref()
    }
}
