//! The `fmi-binding` crate implements a Rust interface to FMUs (Functional Mockup Units) that
//! follow the FMI Standard, versions 2.0.2 and 3.0. See <http://www.fmi-standard.org/>
//!
//! Every FMU instance carries an explicit lifecycle state machine. Each wrapper checks the
//! current [`InstanceState`] against the states in which the standard allows the call, invokes
//! the native entry point, classifies the returned [`Status`] according to the instance's
//! [`StatusPolicy`] and moves the instance to its next state.
//!
//! ## Examples
//!
//! ### Stepping an FMI 3.0 Co-Simulation FMU
//!
//! ```rust,no_run
//! use fmi_binding::{
//!     fmi3::{self, instance::{CoSimulation, Common}},
//!     FmiInstance, InstanceOptions, InstanceState, ModelDescription,
//! };
//!
//! // The model description comes from an external modelDescription.xml parser
//! let description = ModelDescription::default();
//! let model = unsafe { fmi3::Model::load("path/to/model.so", description, "path/to/resources") }
//!     .unwrap();
//!
//! let mut instance = model.instantiate_cs("inst1", InstanceOptions::default()).unwrap();
//! instance.enter_initialization_mode(None, 0.0, None, false).unwrap();
//! instance.exit_initialization_mode(false).unwrap();
//! assert_eq!(instance.state(), InstanceState::StepMode);
//!
//! let step = instance.do_step(0.1, true, false).unwrap();
//! assert!(!step.terminate_simulation);
//!
//! instance.terminate(false).unwrap();
//! instance.free_instance().unwrap();
//! ```
#![doc = document_features::document_features!()]
#![deny(clippy::all)]

use std::path::PathBuf;

mod callbacks;
mod event_flags;
mod gateway;
mod lifecycle;
mod model_description;
mod options;
mod registry;
mod status;
mod traits;

#[cfg(feature = "fmi2")]
pub mod fmi2;
#[cfg(feature = "fmi3")]
pub mod fmi3;

pub use callbacks::{LogFilter, StatusMask};
pub use event_flags::EventFlags;
pub use gateway::NativeHandle;
pub use lifecycle::{operating_state, InstanceState};
pub use model_description::{
    DefaultExperiment, InterfaceCapabilities, ModelDescription, VariableCounts,
    VariableNamingConvention,
};
pub use options::InstanceOptions;
pub use registry::{Registry, RegistryEntry};
pub use status::{classify, Classification, Severity, Status, StatusPolicy, StatusReport};
pub use traits::FmiInstance;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Error instantiating import")]
    Instantiation,

    /// A native call returned a status that the instance's [`StatusPolicy`] raises.
    #[error("{0}")]
    Status(StatusReport),

    #[error("`{0}` is not supported by this FMU")]
    Unsupported(&'static str),

    #[error("FMU does not export the required entry point `{0}`")]
    MissingEntryPoint(&'static str),

    #[error("Model type {0} not supported by this FMU")]
    UnsupportedFmuType(String),

    #[error("`{0}` called on an instance in state Fatal")]
    InstanceFatal(&'static str),

    #[error("`{0}` called on an instance that has already been freed")]
    Freed(&'static str),

    #[error("Internal consistency fault: {0}")]
    Consistency(String),

    #[error("Re-instantiation failed while emulating reset")]
    Reinstantiation,

    #[error("Length mismatch in `{function}`: expected {expected} values, found {found}")]
    LengthMismatch {
        function: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Unknown FMU state handle {0}")]
    UnknownFmuState(usize),

    #[error("Invalid resource path {0:?}")]
    ResourcePath(PathBuf),

    #[error("TypesPlatform of loaded API ({0}) doesn't match expected (default)")]
    TypesPlatformMismatch(String),

    #[error("FMI version of loaded API ({found}) doesn't match expected ({expected})")]
    FmiVersionMismatch { found: String, expected: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Nul(#[from] std::ffi::NulError),

    #[error(transparent)]
    Utf8Error(#[from] std::str::Utf8Error),

    #[error(transparent)]
    LibLoading {
        #[from]
        source: libloading::Error,
    },
}

impl Error {
    /// Faults that indicate a corrupted or invalid instance, as opposed to an ordinary status
    /// the caller can react to.
    pub fn is_unrecoverable(&self) -> bool {
        match self {
            Error::InstanceFatal(_)
            | Error::Freed(_)
            | Error::Consistency(_)
            | Error::Reinstantiation => true,
            Error::Status(report) => report.severity == Severity::Fatal,
            _ => false,
        }
    }

    /// The status report carried by a raised native status, if any.
    pub fn report(&self) -> Option<&StatusReport> {
        match self {
            Error::Status(report) => Some(report),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterfaceType {
    ModelExchange,
    CoSimulation,
    ScheduledExecution,
}

impl std::fmt::Display for InterfaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            InterfaceType::ModelExchange => "ModelExchange",
            InterfaceType::CoSimulation => "CoSimulation",
            InterfaceType::ScheduledExecution => "ScheduledExecution",
        };
        f.write_str(name)
    }
}

/// Compile-time interface type of an instance.
pub trait InstanceTag {
    const TYPE: InterfaceType;
}

/// Tag for Model Exchange
#[derive(Debug)]
pub struct ME;

impl InstanceTag for ME {
    const TYPE: InterfaceType = InterfaceType::ModelExchange;
}

/// Tag for Co-Simulation
#[derive(Debug)]
pub struct CS;

impl InstanceTag for CS {
    const TYPE: InterfaceType = InterfaceType::CoSimulation;
}

/// Tag for Scheduled Execution
#[derive(Debug)]
pub struct SE;

impl InstanceTag for SE {
    const TYPE: InterfaceType = InterfaceType::ScheduledExecution;
}
