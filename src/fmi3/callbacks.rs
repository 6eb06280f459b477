//! Callbacks handed to an FMI 3.0 FMU at instantiation.
//!
//! `instanceEnvironment` always points at the boxed [`InstanceEnvironment`] of the instance.

use std::ffi::CStr;

use super::{binding, Fmi3Status};
use crate::{callbacks::InstanceEnvironment, Status};

unsafe fn lossy(ptr: binding::fmi3String) -> String {
    if ptr.is_null() {
        return "NULL".to_owned();
    }
    CStr::from_ptr(ptr).to_string_lossy().into_owned()
}

unsafe fn environment<'a>(
    instance_environment: binding::fmi3InstanceEnvironment,
) -> Option<&'a InstanceEnvironment> {
    (instance_environment as *const InstanceEnvironment).as_ref()
}

/// Callback function for logging
pub(crate) unsafe extern "C" fn log_message(
    instance_environment: binding::fmi3InstanceEnvironment,
    status: binding::fmi3Status,
    category: binding::fmi3String,
    message: binding::fmi3String,
) {
    let status: Status = Fmi3Status(status).into();
    match environment(instance_environment) {
        Some(env) => env.log(status, &lossy(category), &lossy(message)),
        None => log::log!(
            target: "fmu",
            status.log_level(),
            "[{}] {}",
            lossy(category),
            lossy(message)
        ),
    }
}

/// Co-Simulation: the FMU reached an intermediate point inside `fmi3DoStep`.
///
/// An early return is requested only if the instance elected it, the FMU offers it and the
/// instance is still registered with its model.
#[allow(clippy::too_many_arguments)]
pub(crate) unsafe extern "C" fn intermediate_update(
    instance_environment: binding::fmi3InstanceEnvironment,
    intermediate_update_time: binding::fmi3Float64,
    _intermediate_variable_set_requested: binding::fmi3Boolean,
    _intermediate_variable_get_allowed: binding::fmi3Boolean,
    _intermediate_step_finished: binding::fmi3Boolean,
    can_return_early: binding::fmi3Boolean,
    early_return_requested: *mut binding::fmi3Boolean,
    early_return_time: *mut binding::fmi3Float64,
) {
    let request = environment(instance_environment)
        .is_some_and(|env| env.intermediate_update(intermediate_update_time, can_return_early));
    if let Some(requested) = early_return_requested.as_mut() {
        *requested = request;
    }
    if request {
        if let Some(time) = early_return_time.as_mut() {
            *time = intermediate_update_time;
        }
    }
}

/// Scheduled Execution: a clock ticked inside the FMU.
pub(crate) unsafe extern "C" fn clock_update(
    instance_environment: binding::fmi3InstanceEnvironment,
) {
    if let Some(env) = environment(instance_environment) {
        env.record_clock_update();
    }
}

pub(crate) unsafe extern "C" fn lock_preemption() {
    log::trace!("lockPreemption");
}

pub(crate) unsafe extern "C" fn unlock_preemption() {
    log::trace!("unlockPreemption");
}
