use super::{traits::ScheduledExecution, Instance};
use crate::{
    fmi3::binding,
    lifecycle::{legal, Guard},
    Error, Status, SE,
};

impl<'a> ScheduledExecution for Instance<'a, SE> {
    fn activate_model_partition(
        &mut self,
        clock_reference: binding::fmi3ValueReference,
        activation_time: f64,
    ) -> Result<Status, Error> {
        let native_time = self.lifecycle.native_time(activation_time);
        let guard = Guard::new("fmi3ActivateModelPartition", legal::CLOCK_ACTIVATION);
        self.call(guard, self.binding().fmi3ActivateModelPartition, |f, c| unsafe {
            f(c, clock_reference, native_time)
        })
    }

    fn clock_updates(&self) -> usize {
        self.environment.clock_updates()
    }
}
