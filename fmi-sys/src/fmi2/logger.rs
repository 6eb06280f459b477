//! Bridge between the variadic FMI 2.0 logger and Rust.
//!
//! `fmi2_logger_shim` (logger.c) is handed to the FMU as `fmi2CallbackFunctions::logger`. It
//! formats the message and calls [`fmi2_log_formatted`], which routes it to the
//! [`fmi2LoggerDispatch`] found at the start of the component environment, or straight to the
//! `log` facade when the environment is null.

use std::ffi::CStr;

use super::{
    fmi2ComponentEnvironment, fmi2Status, fmi2Status_fmi2Discard, fmi2Status_fmi2Error,
    fmi2Status_fmi2Fatal, fmi2Status_fmi2OK, fmi2Status_fmi2Pending, fmi2Status_fmi2Warning,
    fmi2String,
};

/// Header an importer places at the start of the memory its component environment points to.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct fmi2LoggerDispatch {
    pub log: unsafe extern "C" fn(
        dispatch: *const fmi2LoggerDispatch,
        instanceName: fmi2String,
        status: fmi2Status,
        category: fmi2String,
        message: fmi2String,
    ),
}

extern "C" {
    /// Implemented in logger.c
    /// Note: This can be re-implemented in pure Rust once the `c_variadic` feature stabilizes.
    /// See: https://doc.rust-lang.org/beta/unstable-book/language-features/c-variadic.html
    pub fn fmi2_logger_shim(
        componentEnvironment: fmi2ComponentEnvironment,
        instanceName: fmi2String,
        status: fmi2Status,
        category: fmi2String,
        message: fmi2String,
        ...
    );
}

/// This function gets called from logger.c
#[no_mangle]
unsafe extern "C" fn fmi2_log_formatted(
    component_environment: fmi2ComponentEnvironment,
    instance_name: fmi2String,
    status: fmi2Status,
    category: fmi2String,
    message: fmi2String,
) {
    if !component_environment.is_null() {
        let dispatch = component_environment as *const fmi2LoggerDispatch;
        ((*dispatch).log)(dispatch, instance_name, status, category, message);
        return;
    }

    let level = match status {
        fmi2Status_fmi2OK | fmi2Status_fmi2Pending => log::Level::Info,
        fmi2Status_fmi2Warning => log::Level::Warn,
        fmi2Status_fmi2Discard => log::Level::Trace,
        fmi2Status_fmi2Error | fmi2Status_fmi2Fatal => log::Level::Error,
        _ => log::Level::Error,
    };

    log::logger().log(
        &log::Record::builder()
            .args(format_args!("[{}] {}", lossy(category), lossy(message)))
            .level(level)
            .module_path(Some("fmu"))
            .target(&lossy(instance_name))
            .build(),
    );
}

/// Copy a possibly-null C string into an owned `String`.
///
/// # Safety
/// A non-null `ptr` must point to a NUL-terminated string.
pub unsafe fn lossy(ptr: fmi2String) -> String {
    if ptr.is_null() {
        return "NULL".to_owned();
    }
    CStr::from_ptr(ptr).to_string_lossy().into_owned()
}
