use crate::{
    Error, InstanceState, InterfaceType, ModelDescription, NativeHandle, Status, StatusPolicy,
};

/// Lifecycle surface shared by FMI 2.0 and FMI 3.0 instances.
pub trait FmiInstance {
    /// Get the instance name
    fn name(&self) -> &str;

    fn interface_type(&self) -> InterfaceType;

    /// Get the model description of the FMU
    fn model_description(&self) -> &ModelDescription;

    /// Current lifecycle state
    fn state(&self) -> InstanceState;

    /// The native instance, `None` once freed.
    fn handle(&self) -> Option<NativeHandle>;

    fn policy(&self) -> StatusPolicy;

    fn set_policy(&mut self, policy: StatusPolicy);

    /// Current simulation time as seen by the importer
    fn time(&self) -> f64;

    /// Offset added to every time value forwarded to the FMU.
    fn set_time_offset(&mut self, offset: f64);

    fn terminate(&mut self, soft: bool) -> Result<Status, Error>;

    fn reset(&mut self, soft: bool) -> Result<Status, Error>;

    /// Free the native instance. Calling it again is a consistency fault.
    fn free_instance(&mut self) -> Result<(), Error>;

    fn is_live(&self) -> bool {
        self.handle().is_some()
    }
}
