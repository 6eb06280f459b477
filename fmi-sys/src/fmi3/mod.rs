//! FMI 3.0 C ABI: `fmi3PlatformTypes.h`, `fmi3FunctionTypes.h` and `fmi3Functions.h`.
#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]

use std::os::raw::{c_char, c_uint, c_void};

pub type fmi3Instance = *mut c_void;
pub type fmi3InstanceEnvironment = *mut c_void;
pub type fmi3FMUState = *mut c_void;
pub type fmi3ValueReference = u32;
pub type fmi3Float32 = f32;
pub type fmi3Float64 = f64;
pub type fmi3Int8 = i8;
pub type fmi3UInt8 = u8;
pub type fmi3Int16 = i16;
pub type fmi3UInt16 = u16;
pub type fmi3Int32 = i32;
pub type fmi3UInt32 = u32;
pub type fmi3Int64 = i64;
pub type fmi3UInt64 = u64;
pub type fmi3Boolean = bool;
pub type fmi3Char = c_char;
pub type fmi3String = *const fmi3Char;
pub type fmi3Byte = u8;
pub type fmi3Binary = *const fmi3Byte;
pub type fmi3Clock = bool;

pub const fmi3Version: &str = "3.0";

pub type fmi3Status = c_uint;
pub const fmi3Status_fmi3OK: fmi3Status = 0;
pub const fmi3Status_fmi3Warning: fmi3Status = 1;
pub const fmi3Status_fmi3Discard: fmi3Status = 2;
pub const fmi3Status_fmi3Error: fmi3Status = 3;
pub const fmi3Status_fmi3Fatal: fmi3Status = 4;

pub type fmi3LogMessageCallback = Option<
    unsafe extern "C" fn(
        instanceEnvironment: fmi3InstanceEnvironment,
        status: fmi3Status,
        category: fmi3String,
        message: fmi3String,
    ),
>;
pub type fmi3ClockUpdateCallback =
    Option<unsafe extern "C" fn(instanceEnvironment: fmi3InstanceEnvironment)>;
pub type fmi3IntermediateUpdateCallback = Option<
    unsafe extern "C" fn(
        instanceEnvironment: fmi3InstanceEnvironment,
        intermediateUpdateTime: fmi3Float64,
        intermediateVariableSetRequested: fmi3Boolean,
        intermediateVariableGetAllowed: fmi3Boolean,
        intermediateStepFinished: fmi3Boolean,
        canReturnEarly: fmi3Boolean,
        earlyReturnRequested: *mut fmi3Boolean,
        earlyReturnTime: *mut fmi3Float64,
    ),
>;
pub type fmi3LockPreemptionCallback = Option<unsafe extern "C" fn()>;
pub type fmi3UnlockPreemptionCallback = Option<unsafe extern "C" fn()>;

macro_rules! getter_setter_types {
    ($($get:ident, $set:ident: $ty:ty;)*) => {
        $(
            pub type $get = unsafe extern "C" fn(
                instance: fmi3Instance,
                valueReferences: *const fmi3ValueReference,
                nValueReferences: usize,
                values: *mut $ty,
                nValues: usize,
            ) -> fmi3Status;
            pub type $set = unsafe extern "C" fn(
                instance: fmi3Instance,
                valueReferences: *const fmi3ValueReference,
                nValueReferences: usize,
                values: *const $ty,
                nValues: usize,
            ) -> fmi3Status;
        )*
    };
}

getter_setter_types! {
    fmi3GetFloat32TYPE, fmi3SetFloat32TYPE: fmi3Float32;
    fmi3GetFloat64TYPE, fmi3SetFloat64TYPE: fmi3Float64;
    fmi3GetInt8TYPE, fmi3SetInt8TYPE: fmi3Int8;
    fmi3GetUInt8TYPE, fmi3SetUInt8TYPE: fmi3UInt8;
    fmi3GetInt16TYPE, fmi3SetInt16TYPE: fmi3Int16;
    fmi3GetUInt16TYPE, fmi3SetUInt16TYPE: fmi3UInt16;
    fmi3GetInt32TYPE, fmi3SetInt32TYPE: fmi3Int32;
    fmi3GetUInt32TYPE, fmi3SetUInt32TYPE: fmi3UInt32;
    fmi3GetInt64TYPE, fmi3SetInt64TYPE: fmi3Int64;
    fmi3GetUInt64TYPE, fmi3SetUInt64TYPE: fmi3UInt64;
    fmi3GetBooleanTYPE, fmi3SetBooleanTYPE: fmi3Boolean;
    fmi3GetStringTYPE, fmi3SetStringTYPE: fmi3String;
}

pub type fmi3DerivativeTYPE = unsafe extern "C" fn(
    instance: fmi3Instance,
    unknowns: *const fmi3ValueReference,
    nUnknowns: usize,
    knowns: *const fmi3ValueReference,
    nKnowns: usize,
    seed: *const fmi3Float64,
    nSeed: usize,
    sensitivity: *mut fmi3Float64,
    nSensitivity: usize,
) -> fmi3Status;

entry_points! {
    /// Entry points exported by an FMI 3.0 shared library.
    pub struct Fmi3Binding {
        fmi3GetVersion: unsafe extern "C" fn() -> *const c_char,
        fmi3SetDebugLogging: unsafe extern "C" fn(
            instance: fmi3Instance,
            loggingOn: fmi3Boolean,
            nCategories: usize,
            categories: *const fmi3String,
        ) -> fmi3Status,
        fmi3InstantiateModelExchange: unsafe extern "C" fn(
            instanceName: fmi3String,
            instantiationToken: fmi3String,
            resourcePath: fmi3String,
            visible: fmi3Boolean,
            loggingOn: fmi3Boolean,
            instanceEnvironment: fmi3InstanceEnvironment,
            logMessage: fmi3LogMessageCallback,
        ) -> fmi3Instance,
        fmi3InstantiateCoSimulation: unsafe extern "C" fn(
            instanceName: fmi3String,
            instantiationToken: fmi3String,
            resourcePath: fmi3String,
            visible: fmi3Boolean,
            loggingOn: fmi3Boolean,
            eventModeUsed: fmi3Boolean,
            earlyReturnAllowed: fmi3Boolean,
            requiredIntermediateVariables: *const fmi3ValueReference,
            nRequiredIntermediateVariables: usize,
            instanceEnvironment: fmi3InstanceEnvironment,
            logMessage: fmi3LogMessageCallback,
            intermediateUpdate: fmi3IntermediateUpdateCallback,
        ) -> fmi3Instance,
        fmi3InstantiateScheduledExecution: unsafe extern "C" fn(
            instanceName: fmi3String,
            instantiationToken: fmi3String,
            resourcePath: fmi3String,
            visible: fmi3Boolean,
            loggingOn: fmi3Boolean,
            instanceEnvironment: fmi3InstanceEnvironment,
            logMessage: fmi3LogMessageCallback,
            clockUpdate: fmi3ClockUpdateCallback,
            lockPreemption: fmi3LockPreemptionCallback,
            unlockPreemption: fmi3UnlockPreemptionCallback,
        ) -> fmi3Instance,
        fmi3FreeInstance: unsafe extern "C" fn(instance: fmi3Instance),
        fmi3EnterInitializationMode: unsafe extern "C" fn(
            instance: fmi3Instance,
            toleranceDefined: fmi3Boolean,
            tolerance: fmi3Float64,
            startTime: fmi3Float64,
            stopTimeDefined: fmi3Boolean,
            stopTime: fmi3Float64,
        ) -> fmi3Status,
        fmi3ExitInitializationMode: unsafe extern "C" fn(instance: fmi3Instance) -> fmi3Status,
        fmi3EnterEventMode: unsafe extern "C" fn(instance: fmi3Instance) -> fmi3Status,
        fmi3Terminate: unsafe extern "C" fn(instance: fmi3Instance) -> fmi3Status,
        fmi3Reset: unsafe extern "C" fn(instance: fmi3Instance) -> fmi3Status,
        fmi3GetFloat32: fmi3GetFloat32TYPE,
        fmi3SetFloat32: fmi3SetFloat32TYPE,
        fmi3GetFloat64: fmi3GetFloat64TYPE,
        fmi3SetFloat64: fmi3SetFloat64TYPE,
        fmi3GetInt8: fmi3GetInt8TYPE,
        fmi3SetInt8: fmi3SetInt8TYPE,
        fmi3GetUInt8: fmi3GetUInt8TYPE,
        fmi3SetUInt8: fmi3SetUInt8TYPE,
        fmi3GetInt16: fmi3GetInt16TYPE,
        fmi3SetInt16: fmi3SetInt16TYPE,
        fmi3GetUInt16: fmi3GetUInt16TYPE,
        fmi3SetUInt16: fmi3SetUInt16TYPE,
        fmi3GetInt32: fmi3GetInt32TYPE,
        fmi3SetInt32: fmi3SetInt32TYPE,
        fmi3GetUInt32: fmi3GetUInt32TYPE,
        fmi3SetUInt32: fmi3SetUInt32TYPE,
        fmi3GetInt64: fmi3GetInt64TYPE,
        fmi3SetInt64: fmi3SetInt64TYPE,
        fmi3GetUInt64: fmi3GetUInt64TYPE,
        fmi3SetUInt64: fmi3SetUInt64TYPE,
        fmi3GetBoolean: fmi3GetBooleanTYPE,
        fmi3SetBoolean: fmi3SetBooleanTYPE,
        fmi3GetString: fmi3GetStringTYPE,
        fmi3SetString: fmi3SetStringTYPE,
        fmi3GetBinary: unsafe extern "C" fn(
            instance: fmi3Instance,
            valueReferences: *const fmi3ValueReference,
            nValueReferences: usize,
            valueSizes: *mut usize,
            values: *mut fmi3Binary,
            nValues: usize,
        ) -> fmi3Status,
        fmi3SetBinary: unsafe extern "C" fn(
            instance: fmi3Instance,
            valueReferences: *const fmi3ValueReference,
            nValueReferences: usize,
            valueSizes: *const usize,
            values: *const fmi3Binary,
            nValues: usize,
        ) -> fmi3Status,
        fmi3GetClock: unsafe extern "C" fn(
            instance: fmi3Instance,
            valueReferences: *const fmi3ValueReference,
            nValueReferences: usize,
            values: *mut fmi3Clock,
        ) -> fmi3Status,
        fmi3SetClock: unsafe extern "C" fn(
            instance: fmi3Instance,
            valueReferences: *const fmi3ValueReference,
            nValueReferences: usize,
            values: *const fmi3Clock,
        ) -> fmi3Status,
        fmi3GetFMUState:
            unsafe extern "C" fn(instance: fmi3Instance, FMUState: *mut fmi3FMUState) -> fmi3Status,
        fmi3SetFMUState:
            unsafe extern "C" fn(instance: fmi3Instance, FMUState: fmi3FMUState) -> fmi3Status,
        fmi3FreeFMUState:
            unsafe extern "C" fn(instance: fmi3Instance, FMUState: *mut fmi3FMUState) -> fmi3Status,
        fmi3SerializedFMUStateSize: unsafe extern "C" fn(
            instance: fmi3Instance,
            FMUState: fmi3FMUState,
            size: *mut usize,
        ) -> fmi3Status,
        fmi3SerializeFMUState: unsafe extern "C" fn(
            instance: fmi3Instance,
            FMUState: fmi3FMUState,
            serializedState: *mut fmi3Byte,
            size: usize,
        ) -> fmi3Status,
        fmi3DeserializeFMUState: unsafe extern "C" fn(
            instance: fmi3Instance,
            serializedState: *const fmi3Byte,
            size: usize,
            FMUState: *mut fmi3FMUState,
        ) -> fmi3Status,
        fmi3GetDirectionalDerivative: fmi3DerivativeTYPE,
        fmi3GetAdjointDerivative: fmi3DerivativeTYPE,
        fmi3EnterConfigurationMode: unsafe extern "C" fn(instance: fmi3Instance) -> fmi3Status,
        fmi3ExitConfigurationMode: unsafe extern "C" fn(instance: fmi3Instance) -> fmi3Status,
        fmi3EvaluateDiscreteStates: unsafe extern "C" fn(instance: fmi3Instance) -> fmi3Status,
        fmi3UpdateDiscreteStates: unsafe extern "C" fn(
            instance: fmi3Instance,
            discreteStatesNeedUpdate: *mut fmi3Boolean,
            terminateSimulation: *mut fmi3Boolean,
            nominalsOfContinuousStatesChanged: *mut fmi3Boolean,
            valuesOfContinuousStatesChanged: *mut fmi3Boolean,
            nextEventTimeDefined: *mut fmi3Boolean,
            nextEventTime: *mut fmi3Float64,
        ) -> fmi3Status,
        fmi3EnterContinuousTimeMode: unsafe extern "C" fn(instance: fmi3Instance) -> fmi3Status,
        fmi3CompletedIntegratorStep: unsafe extern "C" fn(
            instance: fmi3Instance,
            noSetFMUStatePriorToCurrentPoint: fmi3Boolean,
            enterEventMode: *mut fmi3Boolean,
            terminateSimulation: *mut fmi3Boolean,
        ) -> fmi3Status,
        fmi3SetTime: unsafe extern "C" fn(instance: fmi3Instance, time: fmi3Float64) -> fmi3Status,
        fmi3SetContinuousStates: unsafe extern "C" fn(
            instance: fmi3Instance,
            continuousStates: *const fmi3Float64,
            nContinuousStates: usize,
        ) -> fmi3Status,
        fmi3GetContinuousStateDerivatives: unsafe extern "C" fn(
            instance: fmi3Instance,
            derivatives: *mut fmi3Float64,
            nContinuousStates: usize,
        ) -> fmi3Status,
        fmi3GetEventIndicators: unsafe extern "C" fn(
            instance: fmi3Instance,
            eventIndicators: *mut fmi3Float64,
            nEventIndicators: usize,
        ) -> fmi3Status,
        fmi3GetContinuousStates: unsafe extern "C" fn(
            instance: fmi3Instance,
            continuousStates: *mut fmi3Float64,
            nContinuousStates: usize,
        ) -> fmi3Status,
        fmi3GetNominalsOfContinuousStates: unsafe extern "C" fn(
            instance: fmi3Instance,
            nominals: *mut fmi3Float64,
            nContinuousStates: usize,
        ) -> fmi3Status,
        fmi3GetNumberOfEventIndicators: unsafe extern "C" fn(
            instance: fmi3Instance,
            nEventIndicators: *mut usize,
        ) -> fmi3Status,
        fmi3GetNumberOfContinuousStates: unsafe extern "C" fn(
            instance: fmi3Instance,
            nContinuousStates: *mut usize,
        ) -> fmi3Status,
        fmi3EnterStepMode: unsafe extern "C" fn(instance: fmi3Instance) -> fmi3Status,
        fmi3GetOutputDerivatives: unsafe extern "C" fn(
            instance: fmi3Instance,
            valueReferences: *const fmi3ValueReference,
            nValueReferences: usize,
            orders: *const fmi3Int32,
            values: *mut fmi3Float64,
            nValues: usize,
        ) -> fmi3Status,
        fmi3DoStep: unsafe extern "C" fn(
            instance: fmi3Instance,
            currentCommunicationPoint: fmi3Float64,
            communicationStepSize: fmi3Float64,
            noSetFMUStatePriorToCurrentPoint: fmi3Boolean,
            eventHandlingNeeded: *mut fmi3Boolean,
            terminateSimulation: *mut fmi3Boolean,
            earlyReturn: *mut fmi3Boolean,
            lastSuccessfulTime: *mut fmi3Float64,
        ) -> fmi3Status,
        fmi3ActivateModelPartition: unsafe extern "C" fn(
            instance: fmi3Instance,
            clockReference: fmi3ValueReference,
            activationTime: fmi3Float64,
        ) -> fmi3Status,
    }
}
