use super::{traits::CoSimulation, Instance};
use crate::{
    fmi3::binding,
    gateway::check_len,
    lifecycle::{legal, Guard},
    Error, InstanceState, Status, CS,
};

/// Outcome of [`CoSimulation::do_step`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    pub status: Status,
    /// The FMU needs Event Mode before the next step
    pub event_handling_needed: bool,
    pub terminate_simulation: bool,
    /// The step ended before `current + step_size`
    pub early_return: bool,
    /// End time of the step, in the caller's time base
    pub last_successful_time: f64,
}

impl<'a> CoSimulation for Instance<'a, CS> {
    fn enter_step_mode(&mut self, soft: bool) -> Result<Status, Error> {
        let guard = Guard::new("fmi3EnterStepMode", legal::EVENT)
            .soft(soft)
            .transition(InstanceState::StepMode);
        self.call(guard, self.binding().fmi3EnterStepMode, |f, c| unsafe { f(c) })
    }

    fn do_step(
        &mut self,
        step_size: f64,
        no_set_fmu_state_prior_to_current_point: bool,
        soft: bool,
    ) -> Result<StepResult, Error> {
        let current = self.lifecycle.time();
        let native_time = self.lifecycle.native_time(current);

        let mut event_handling_needed = false;
        let mut terminate_simulation = false;
        let mut early_return = false;
        let mut last_successful_time = native_time + step_size;
        let mut called = false;

        let guard = Guard::new("fmi3DoStep", legal::STEP).soft(soft);
        let status = self.call(guard, self.binding().fmi3DoStep, |f, c| unsafe {
            called = true;
            f(
                c,
                native_time,
                step_size,
                no_set_fmu_state_prior_to_current_point,
                &mut event_handling_needed,
                &mut terminate_simulation,
                &mut early_return,
                &mut last_successful_time,
            )
        })?;

        if !called {
            return Ok(StepResult {
                status,
                event_handling_needed: false,
                terminate_simulation: false,
                early_return: false,
                last_successful_time: current,
            });
        }

        let last_successful_time = last_successful_time - self.lifecycle.time_offset();
        if status.is_success() {
            self.lifecycle.set_time(last_successful_time);
        }
        let requested = self.environment.take_early_return_requested();
        if early_return && !requested {
            log::debug!(
                "Instance '{}' returned early at t={last_successful_time} on its own",
                self.lifecycle.name()
            );
        }
        Ok(StepResult {
            status,
            event_handling_needed,
            terminate_simulation,
            early_return,
            last_successful_time,
        })
    }

    fn get_output_derivatives(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        orders: &[i32],
        values: &mut [f64],
    ) -> Result<Status, Error> {
        check_len("fmi3GetOutputDerivatives", vrs.len(), orders.len())?;
        let guard = Guard::new("fmi3GetOutputDerivatives", legal::STEP_QUERY);
        self.call(guard, self.binding().fmi3GetOutputDerivatives, |f, c| unsafe {
            f(
                c,
                vrs.as_ptr(),
                vrs.len(),
                orders.as_ptr(),
                values.as_mut_ptr(),
                values.len(),
            )
        })
    }

    fn intermediate_updates(&self) -> usize {
        self.environment.intermediate_updates()
    }
}
