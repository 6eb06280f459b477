use super::{traits::CoSimulation, Instance};
use crate::{
    fmi2::{binding, Fmi2Status, StatusKind},
    gateway::check_len,
    lifecycle::{legal, Guard},
    Error, Status, CS,
};

impl<'a> CoSimulation for Instance<'a, CS> {
    fn do_step(
        &mut self,
        step_size: f64,
        no_set_fmu_state_prior_to_current_point: bool,
        soft: bool,
    ) -> Result<Status, Error> {
        let current = self.lifecycle.time();
        let native_time = self.lifecycle.native_time(current);
        let mut called = false;
        let guard = Guard::new("fmi2DoStep", legal::STEP).soft(soft);
        let status = self.call(guard, self.binding().fmi2DoStep, |f, c| unsafe {
            called = true;
            f(
                c,
                native_time,
                step_size,
                no_set_fmu_state_prior_to_current_point as binding::fmi2Boolean,
            )
        })?;
        if called {
            match status {
                Status::Ok | Status::Warning => {
                    self.pending_step_end = None;
                    self.lifecycle.set_time(current + step_size);
                }
                Status::Pending => self.pending_step_end = Some(current + step_size),
                _ => {}
            }
        }
        Ok(status)
    }

    fn cancel_step(&mut self) -> Result<Status, Error> {
        let guard = Guard::new("fmi2CancelStep", legal::STEP);
        let status = self.call(guard, self.binding().fmi2CancelStep, |f, c| unsafe { f(c) })?;
        if status.is_success() {
            self.pending_step_end = None;
        }
        Ok(status)
    }

    fn set_real_input_derivatives(
        &mut self,
        vrs: &[binding::fmi2ValueReference],
        orders: &[binding::fmi2Integer],
        values: &[binding::fmi2Real],
    ) -> Result<Status, Error> {
        check_len("fmi2SetRealInputDerivatives", vrs.len(), orders.len())?;
        check_len("fmi2SetRealInputDerivatives", vrs.len(), values.len())?;
        let guard = Guard::new("fmi2SetRealInputDerivatives", legal::INPUT_DERIVATIVES);
        self.call(guard, self.binding().fmi2SetRealInputDerivatives, |f, c| unsafe {
            f(c, vrs.as_ptr(), vrs.len(), orders.as_ptr(), values.as_ptr())
        })
    }

    fn get_real_output_derivatives(
        &mut self,
        vrs: &[binding::fmi2ValueReference],
        orders: &[binding::fmi2Integer],
        values: &mut [binding::fmi2Real],
    ) -> Result<Status, Error> {
        check_len("fmi2GetRealOutputDerivatives", vrs.len(), orders.len())?;
        check_len("fmi2GetRealOutputDerivatives", vrs.len(), values.len())?;
        let guard = Guard::new("fmi2GetRealOutputDerivatives", legal::STEP_QUERY);
        self.call(guard, self.binding().fmi2GetRealOutputDerivatives, |f, c| unsafe {
            f(c, vrs.as_ptr(), vrs.len(), orders.as_ptr(), values.as_mut_ptr())
        })
    }

    fn do_step_status(&mut self) -> Result<Status, Error> {
        let mut value = binding::fmi2Status_fmi2Pending;
        let guard = Guard::new("fmi2GetStatus", legal::STEP_QUERY);
        self.call(guard, self.binding().fmi2GetStatus, |f, c| unsafe {
            f(c, StatusKind::DoStepStatus as binding::fmi2StatusKind, &mut value)
        })?;
        let status: Status = Fmi2Status(value).into();
        self.finish_pending_step(status);
        Ok(status)
    }

    fn pending_status(&mut self) -> Result<String, Error> {
        let mut value: binding::fmi2String = std::ptr::null();
        let guard = Guard::new("fmi2GetStringStatus", legal::STEP_QUERY);
        self.call(guard, self.binding().fmi2GetStringStatus, |f, c| unsafe {
            f(c, StatusKind::PendingStatus as binding::fmi2StatusKind, &mut value)
        })?;
        Ok(unsafe { binding::logger::lossy(value) })
    }

    fn last_successful_time(&mut self) -> Result<f64, Error> {
        let mut value: binding::fmi2Real = 0.0;
        let guard = Guard::new("fmi2GetRealStatus", legal::STEP_QUERY);
        self.call(guard, self.binding().fmi2GetRealStatus, |f, c| unsafe {
            f(
                c,
                StatusKind::LastSuccessfulTime as binding::fmi2StatusKind,
                &mut value,
            )
        })?;
        Ok(value - self.lifecycle.time_offset())
    }

    fn terminated(&mut self) -> Result<bool, Error> {
        let mut value = binding::fmi2False;
        let guard = Guard::new("fmi2GetBooleanStatus", legal::STEP_QUERY);
        self.call(guard, self.binding().fmi2GetBooleanStatus, |f, c| unsafe {
            f(c, StatusKind::Terminated as binding::fmi2StatusKind, &mut value)
        })?;
        Ok(value != binding::fmi2False)
    }

    fn take_async_status(&mut self) -> Option<Status> {
        let status = self.environment.env.take_step_finished()?;
        self.finish_pending_step(status);
        Some(status)
    }
}

impl<'a> Instance<'a, CS> {
    /// Settle the time of an asynchronous step once its outcome is known.
    fn finish_pending_step(&mut self, status: Status) {
        match status {
            Status::Pending => {}
            Status::Ok | Status::Warning => {
                if let Some(end) = self.pending_step_end.take() {
                    self.lifecycle.set_time(end);
                }
            }
            _ => self.pending_step_end = None,
        }
    }
}
