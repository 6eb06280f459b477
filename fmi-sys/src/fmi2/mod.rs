//! FMI 2.0.2 C ABI: `fmi2TypesPlatform.h`, `fmi2FunctionTypes.h` and `fmi2Functions.h`.
#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]

use std::os::raw::{c_char, c_int, c_uint, c_void};

pub mod logger;

pub type fmi2Component = *mut c_void;
pub type fmi2ComponentEnvironment = *mut c_void;
pub type fmi2FMUstate = *mut c_void;
pub type fmi2ValueReference = c_uint;
pub type fmi2Real = f64;
pub type fmi2Integer = c_int;
pub type fmi2Boolean = c_int;
pub type fmi2Char = c_char;
pub type fmi2String = *const fmi2Char;
pub type fmi2Byte = c_char;

pub const fmi2True: fmi2Boolean = 1;
pub const fmi2False: fmi2Boolean = 0;

pub const fmi2TypesPlatform: &str = "default";
pub const fmi2Version: &str = "2.0";

pub type fmi2Status = c_uint;
pub const fmi2Status_fmi2OK: fmi2Status = 0;
pub const fmi2Status_fmi2Warning: fmi2Status = 1;
pub const fmi2Status_fmi2Discard: fmi2Status = 2;
pub const fmi2Status_fmi2Error: fmi2Status = 3;
pub const fmi2Status_fmi2Fatal: fmi2Status = 4;
pub const fmi2Status_fmi2Pending: fmi2Status = 5;

pub type fmi2Type = c_uint;
pub const fmi2Type_fmi2ModelExchange: fmi2Type = 0;
pub const fmi2Type_fmi2CoSimulation: fmi2Type = 1;

pub type fmi2StatusKind = c_uint;
pub const fmi2StatusKind_fmi2DoStepStatus: fmi2StatusKind = 0;
pub const fmi2StatusKind_fmi2PendingStatus: fmi2StatusKind = 1;
pub const fmi2StatusKind_fmi2LastSuccessfulTime: fmi2StatusKind = 2;
pub const fmi2StatusKind_fmi2Terminated: fmi2StatusKind = 3;

pub type fmi2CallbackLogger = Option<
    unsafe extern "C" fn(
        componentEnvironment: fmi2ComponentEnvironment,
        instanceName: fmi2String,
        status: fmi2Status,
        category: fmi2String,
        message: fmi2String,
        ...
    ),
>;
pub type fmi2CallbackAllocateMemory =
    Option<unsafe extern "C" fn(nobj: usize, size: usize) -> *mut c_void>;
pub type fmi2CallbackFreeMemory = Option<unsafe extern "C" fn(obj: *mut c_void)>;
pub type fmi2StepFinished =
    Option<unsafe extern "C" fn(componentEnvironment: fmi2ComponentEnvironment, status: fmi2Status)>;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct fmi2CallbackFunctions {
    pub logger: fmi2CallbackLogger,
    pub allocateMemory: fmi2CallbackAllocateMemory,
    pub freeMemory: fmi2CallbackFreeMemory,
    pub stepFinished: fmi2StepFinished,
    pub componentEnvironment: fmi2ComponentEnvironment,
}

#[repr(C)]
#[derive(Default, Debug, Copy, Clone)]
pub struct fmi2EventInfo {
    pub newDiscreteStatesNeeded: fmi2Boolean,
    pub terminateSimulation: fmi2Boolean,
    pub nominalsOfContinuousStatesChanged: fmi2Boolean,
    pub valuesOfContinuousStatesChanged: fmi2Boolean,
    pub nextEventTimeDefined: fmi2Boolean,
    pub nextEventTime: fmi2Real,
}

entry_points! {
    /// Entry points exported by an FMI 2.0 shared library.
    pub struct Fmi2Binding {
        fmi2GetTypesPlatform: unsafe extern "C" fn() -> *const c_char,
        fmi2GetVersion: unsafe extern "C" fn() -> *const c_char,
        fmi2SetDebugLogging: unsafe extern "C" fn(
            c: fmi2Component,
            loggingOn: fmi2Boolean,
            nCategories: usize,
            categories: *const fmi2String,
        ) -> fmi2Status,
        fmi2Instantiate: unsafe extern "C" fn(
            instanceName: fmi2String,
            fmuType: fmi2Type,
            fmuGUID: fmi2String,
            fmuResourceLocation: fmi2String,
            functions: *const fmi2CallbackFunctions,
            visible: fmi2Boolean,
            loggingOn: fmi2Boolean,
        ) -> fmi2Component,
        fmi2FreeInstance: unsafe extern "C" fn(c: fmi2Component),
        fmi2SetupExperiment: unsafe extern "C" fn(
            c: fmi2Component,
            toleranceDefined: fmi2Boolean,
            tolerance: fmi2Real,
            startTime: fmi2Real,
            stopTimeDefined: fmi2Boolean,
            stopTime: fmi2Real,
        ) -> fmi2Status,
        fmi2EnterInitializationMode: unsafe extern "C" fn(c: fmi2Component) -> fmi2Status,
        fmi2ExitInitializationMode: unsafe extern "C" fn(c: fmi2Component) -> fmi2Status,
        fmi2Terminate: unsafe extern "C" fn(c: fmi2Component) -> fmi2Status,
        fmi2Reset: unsafe extern "C" fn(c: fmi2Component) -> fmi2Status,
        fmi2GetReal: unsafe extern "C" fn(
            c: fmi2Component,
            vr: *const fmi2ValueReference,
            nvr: usize,
            value: *mut fmi2Real,
        ) -> fmi2Status,
        fmi2GetInteger: unsafe extern "C" fn(
            c: fmi2Component,
            vr: *const fmi2ValueReference,
            nvr: usize,
            value: *mut fmi2Integer,
        ) -> fmi2Status,
        fmi2GetBoolean: unsafe extern "C" fn(
            c: fmi2Component,
            vr: *const fmi2ValueReference,
            nvr: usize,
            value: *mut fmi2Boolean,
        ) -> fmi2Status,
        fmi2GetString: unsafe extern "C" fn(
            c: fmi2Component,
            vr: *const fmi2ValueReference,
            nvr: usize,
            value: *mut fmi2String,
        ) -> fmi2Status,
        fmi2SetReal: unsafe extern "C" fn(
            c: fmi2Component,
            vr: *const fmi2ValueReference,
            nvr: usize,
            value: *const fmi2Real,
        ) -> fmi2Status,
        fmi2SetInteger: unsafe extern "C" fn(
            c: fmi2Component,
            vr: *const fmi2ValueReference,
            nvr: usize,
            value: *const fmi2Integer,
        ) -> fmi2Status,
        fmi2SetBoolean: unsafe extern "C" fn(
            c: fmi2Component,
            vr: *const fmi2ValueReference,
            nvr: usize,
            value: *const fmi2Boolean,
        ) -> fmi2Status,
        fmi2SetString: unsafe extern "C" fn(
            c: fmi2Component,
            vr: *const fmi2ValueReference,
            nvr: usize,
            value: *const fmi2String,
        ) -> fmi2Status,
        fmi2GetFMUstate:
            unsafe extern "C" fn(c: fmi2Component, FMUstate: *mut fmi2FMUstate) -> fmi2Status,
        fmi2SetFMUstate:
            unsafe extern "C" fn(c: fmi2Component, FMUstate: fmi2FMUstate) -> fmi2Status,
        fmi2FreeFMUstate:
            unsafe extern "C" fn(c: fmi2Component, FMUstate: *mut fmi2FMUstate) -> fmi2Status,
        fmi2SerializedFMUstateSize: unsafe extern "C" fn(
            c: fmi2Component,
            FMUstate: fmi2FMUstate,
            size: *mut usize,
        ) -> fmi2Status,
        fmi2SerializeFMUstate: unsafe extern "C" fn(
            c: fmi2Component,
            FMUstate: fmi2FMUstate,
            serializedState: *mut fmi2Byte,
            size: usize,
        ) -> fmi2Status,
        fmi2DeSerializeFMUstate: unsafe extern "C" fn(
            c: fmi2Component,
            serializedState: *const fmi2Byte,
            size: usize,
            FMUstate: *mut fmi2FMUstate,
        ) -> fmi2Status,
        fmi2GetDirectionalDerivative: unsafe extern "C" fn(
            c: fmi2Component,
            vUnknown_ref: *const fmi2ValueReference,
            nUnknown: usize,
            vKnown_ref: *const fmi2ValueReference,
            nKnown: usize,
            dvKnown: *const fmi2Real,
            dvUnknown: *mut fmi2Real,
        ) -> fmi2Status,
        fmi2EnterEventMode: unsafe extern "C" fn(c: fmi2Component) -> fmi2Status,
        fmi2NewDiscreteStates:
            unsafe extern "C" fn(c: fmi2Component, fmi2eventInfo: *mut fmi2EventInfo) -> fmi2Status,
        fmi2EnterContinuousTimeMode: unsafe extern "C" fn(c: fmi2Component) -> fmi2Status,
        fmi2CompletedIntegratorStep: unsafe extern "C" fn(
            c: fmi2Component,
            noSetFMUStatePriorToCurrentPoint: fmi2Boolean,
            enterEventMode: *mut fmi2Boolean,
            terminateSimulation: *mut fmi2Boolean,
        ) -> fmi2Status,
        fmi2SetTime: unsafe extern "C" fn(c: fmi2Component, time: fmi2Real) -> fmi2Status,
        fmi2SetContinuousStates:
            unsafe extern "C" fn(c: fmi2Component, x: *const fmi2Real, nx: usize) -> fmi2Status,
        fmi2GetDerivatives: unsafe extern "C" fn(
            c: fmi2Component,
            derivatives: *mut fmi2Real,
            nx: usize,
        ) -> fmi2Status,
        fmi2GetEventIndicators: unsafe extern "C" fn(
            c: fmi2Component,
            eventIndicators: *mut fmi2Real,
            ni: usize,
        ) -> fmi2Status,
        fmi2GetContinuousStates:
            unsafe extern "C" fn(c: fmi2Component, x: *mut fmi2Real, nx: usize) -> fmi2Status,
        fmi2GetNominalsOfContinuousStates: unsafe extern "C" fn(
            c: fmi2Component,
            x_nominal: *mut fmi2Real,
            nx: usize,
        ) -> fmi2Status,
        fmi2SetRealInputDerivatives: unsafe extern "C" fn(
            c: fmi2Component,
            vr: *const fmi2ValueReference,
            nvr: usize,
            order: *const fmi2Integer,
            value: *const fmi2Real,
        ) -> fmi2Status,
        fmi2GetRealOutputDerivatives: unsafe extern "C" fn(
            c: fmi2Component,
            vr: *const fmi2ValueReference,
            nvr: usize,
            order: *const fmi2Integer,
            value: *mut fmi2Real,
        ) -> fmi2Status,
        fmi2DoStep: unsafe extern "C" fn(
            c: fmi2Component,
            currentCommunicationPoint: fmi2Real,
            communicationStepSize: fmi2Real,
            noSetFMUStatePriorToCurrentPoint: fmi2Boolean,
        ) -> fmi2Status,
        fmi2CancelStep: unsafe extern "C" fn(c: fmi2Component) -> fmi2Status,
        fmi2GetStatus: unsafe extern "C" fn(
            c: fmi2Component,
            s: fmi2StatusKind,
            value: *mut fmi2Status,
        ) -> fmi2Status,
        fmi2GetRealStatus: unsafe extern "C" fn(
            c: fmi2Component,
            s: fmi2StatusKind,
            value: *mut fmi2Real,
        ) -> fmi2Status,
        fmi2GetIntegerStatus: unsafe extern "C" fn(
            c: fmi2Component,
            s: fmi2StatusKind,
            value: *mut fmi2Integer,
        ) -> fmi2Status,
        fmi2GetBooleanStatus: unsafe extern "C" fn(
            c: fmi2Component,
            s: fmi2StatusKind,
            value: *mut fmi2Boolean,
        ) -> fmi2Status,
        fmi2GetStringStatus: unsafe extern "C" fn(
            c: fmi2Component,
            s: fmi2StatusKind,
            value: *mut fmi2String,
        ) -> fmi2Status,
    }
}
