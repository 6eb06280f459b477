//! FMI 2.0 API

pub mod instance;
mod logger;
mod model;

pub use fmi_sys::fmi2 as binding;
pub use instance::{FmuState, Instance, InstanceCS, InstanceME};
pub use model::Model;

use crate::Status;

/// Raw FMI 2.0 status code as returned by a native call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fmi2Status(pub binding::fmi2Status);

impl From<Fmi2Status> for Status {
    fn from(Fmi2Status(status): Fmi2Status) -> Self {
        match status {
            binding::fmi2Status_fmi2OK => Status::Ok,
            binding::fmi2Status_fmi2Warning => Status::Warning,
            binding::fmi2Status_fmi2Discard => Status::Discard,
            binding::fmi2Status_fmi2Error => Status::Error,
            binding::fmi2Status_fmi2Fatal => Status::Fatal,
            binding::fmi2Status_fmi2Pending => Status::Pending,
            unknown => {
                log::error!("Unknown fmi2Status code {unknown}");
                Status::Fatal
            }
        }
    }
}

impl From<Status> for Fmi2Status {
    fn from(status: Status) -> Self {
        Self(match status {
            Status::Ok => binding::fmi2Status_fmi2OK,
            Status::Warning => binding::fmi2Status_fmi2Warning,
            Status::Discard => binding::fmi2Status_fmi2Discard,
            Status::Error => binding::fmi2Status_fmi2Error,
            Status::Fatal => binding::fmi2Status_fmi2Fatal,
            Status::Pending => binding::fmi2Status_fmi2Pending,
        })
    }
}

/// Status information that can be queried from an asynchronous co-simulation slave.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// Can be called when `do_step` returned `Pending`. Delivers `Pending` if the computation
    /// is not finished, otherwise the result of the asynchronous `fmi2DoStep` call.
    DoStepStatus = binding::fmi2StatusKind_fmi2DoStepStatus,
    /// Informs about the status of the currently running asynchronous `fmi2DoStep`.
    PendingStatus = binding::fmi2StatusKind_fmi2PendingStatus,
    /// End time of the last successfully completed communication step. Can be called after
    /// `do_step` returned `Discard`.
    LastSuccessfulTime = binding::fmi2StatusKind_fmi2LastSuccessfulTime,
    /// Whether the slave wants to terminate the simulation. Can be called after `do_step`
    /// returned `Discard`.
    Terminated = binding::fmi2StatusKind_fmi2Terminated,
}
