//! Callbacks handed to an FMI 2.0 FMU through `fmi2CallbackFunctions`.

use std::ffi::c_void;

use super::{binding, Fmi2Status};
use crate::callbacks::InstanceEnvironment;

use binding::logger::{fmi2LoggerDispatch, fmi2_logger_shim, lossy};

/// The memory `componentEnvironment` points to. The dispatch header must stay the first field,
/// the C logger shim reads it from there.
#[repr(C)]
#[derive(Debug)]
pub(crate) struct Fmi2Environment {
    dispatch: fmi2LoggerDispatch,
    pub env: InstanceEnvironment,
}

impl Fmi2Environment {
    pub fn new(env: InstanceEnvironment) -> Box<Self> {
        Box::new(Self {
            dispatch: fmi2LoggerDispatch { log: dispatch_log },
            env,
        })
    }

    /// Callback table pointing back at this environment.
    pub fn callback_functions(&self) -> binding::fmi2CallbackFunctions {
        binding::fmi2CallbackFunctions {
            logger: Some(fmi2_logger_shim),
            allocateMemory: Some(libc::calloc),
            freeMemory: Some(libc::free),
            stepFinished: Some(step_finished),
            componentEnvironment: self as *const Self as *mut c_void,
        }
    }
}

unsafe extern "C" fn dispatch_log(
    dispatch: *const fmi2LoggerDispatch,
    _instance_name: binding::fmi2String,
    status: binding::fmi2Status,
    category: binding::fmi2String,
    message: binding::fmi2String,
) {
    let environment = &*(dispatch as *const Fmi2Environment);
    environment
        .env
        .log(Fmi2Status(status).into(), &lossy(category), &lossy(message));
}

/// Notification that an asynchronous `fmi2DoStep` has finished.
unsafe extern "C" fn step_finished(
    component_environment: binding::fmi2ComponentEnvironment,
    status: binding::fmi2Status,
) {
    if component_environment.is_null() {
        log::warn!("stepFinished called without a component environment");
        return;
    }
    let environment = &*(component_environment as *const Fmi2Environment);
    environment.env.record_step_finished(Fmi2Status(status).into());
}
