//! FMI 3.0 API

mod callbacks;
pub mod instance;
mod model;

pub use fmi_sys::fmi3 as binding;
pub use instance::{FmuState, Instance, InstanceCS, InstanceME, InstanceSE, StepResult};
pub use model::Model;

use crate::Status;

/// Raw FMI 3.0 status code as returned by a native call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fmi3Status(pub binding::fmi3Status);

impl From<Fmi3Status> for Status {
    fn from(Fmi3Status(status): Fmi3Status) -> Self {
        match status {
            binding::fmi3Status_fmi3OK => Status::Ok,
            binding::fmi3Status_fmi3Warning => Status::Warning,
            binding::fmi3Status_fmi3Discard => Status::Discard,
            binding::fmi3Status_fmi3Error => Status::Error,
            binding::fmi3Status_fmi3Fatal => Status::Fatal,
            unknown => {
                log::error!("Unknown fmi3Status code {unknown}");
                Status::Fatal
            }
        }
    }
}

impl From<Status> for Fmi3Status {
    /// FMI 3.0 has no `Pending`, it maps to `OK`.
    fn from(status: Status) -> Self {
        Self(match status {
            Status::Ok | Status::Pending => binding::fmi3Status_fmi3OK,
            Status::Warning => binding::fmi3Status_fmi3Warning,
            Status::Discard => binding::fmi3Status_fmi3Discard,
            Status::Error => binding::fmi3Status_fmi3Error,
            Status::Fatal => binding::fmi3Status_fmi3Fatal,
        })
    }
}
