use super::{traits::ModelExchange, Instance};
use crate::{
    lifecycle::{legal, Guard},
    Error, InstanceState, Status, ME,
};

impl<'a> ModelExchange for Instance<'a, ME> {
    fn enter_continuous_time_mode(&mut self, soft: bool) -> Result<Status, Error> {
        let guard = Guard::new("fmi3EnterContinuousTimeMode", legal::EVENT)
            .soft(soft)
            .transition(InstanceState::ContinuousTimeMode);
        self.call(guard, self.binding().fmi3EnterContinuousTimeMode, |f, c| unsafe {
            f(c)
        })
    }

    fn completed_integrator_step(
        &mut self,
        no_set_fmu_state_prior_to_current_point: bool,
    ) -> Result<(bool, bool), Error> {
        let mut enter_event_mode = false;
        let mut terminate_simulation = false;
        let guard = Guard::new("fmi3CompletedIntegratorStep", legal::CONTINUOUS_TIME);
        self.call(guard, self.binding().fmi3CompletedIntegratorStep, |f, c| unsafe {
            f(
                c,
                no_set_fmu_state_prior_to_current_point,
                &mut enter_event_mode,
                &mut terminate_simulation,
            )
        })?;
        Ok((enter_event_mode, terminate_simulation))
    }

    fn set_time(&mut self, time: f64) -> Result<Status, Error> {
        let native_time = self.lifecycle.native_time(time);
        let guard = Guard::new("fmi3SetTime", legal::EVENT_OR_CONTINUOUS_TIME);
        let status = self.call(guard, self.binding().fmi3SetTime, |f, c| unsafe {
            f(c, native_time)
        })?;
        if status.is_success() {
            self.lifecycle.set_time(time);
        }
        Ok(status)
    }

    fn set_continuous_states(&mut self, states: &[f64]) -> Result<Status, Error> {
        let guard = Guard::new("fmi3SetContinuousStates", legal::EVENT_OR_CONTINUOUS_TIME);
        self.call(guard, self.binding().fmi3SetContinuousStates, |f, c| unsafe {
            f(c, states.as_ptr(), states.len())
        })
    }

    fn get_continuous_state_derivatives(
        &mut self,
        derivatives: &mut [f64],
    ) -> Result<Status, Error> {
        let guard = Guard::new("fmi3GetContinuousStateDerivatives", legal::ME_QUERY);
        self.call(
            guard,
            self.binding().fmi3GetContinuousStateDerivatives,
            |f, c| unsafe { f(c, derivatives.as_mut_ptr(), derivatives.len()) },
        )
    }

    fn get_event_indicators(&mut self, indicators: &mut [f64]) -> Result<Status, Error> {
        let guard = Guard::new("fmi3GetEventIndicators", legal::ME_QUERY);
        self.call(guard, self.binding().fmi3GetEventIndicators, |f, c| unsafe {
            f(c, indicators.as_mut_ptr(), indicators.len())
        })
    }

    fn get_continuous_states(&mut self, states: &mut [f64]) -> Result<Status, Error> {
        let guard = Guard::new("fmi3GetContinuousStates", legal::ME_QUERY);
        self.call(guard, self.binding().fmi3GetContinuousStates, |f, c| unsafe {
            f(c, states.as_mut_ptr(), states.len())
        })
    }

    fn get_nominals_of_continuous_states(
        &mut self,
        nominals: &mut [f64],
    ) -> Result<Status, Error> {
        let guard = Guard::new("fmi3GetNominalsOfContinuousStates", legal::ME_QUERY);
        self.call(
            guard,
            self.binding().fmi3GetNominalsOfContinuousStates,
            |f, c| unsafe { f(c, nominals.as_mut_ptr(), nominals.len()) },
        )
    }

    fn get_number_of_event_indicators(&mut self) -> Result<usize, Error> {
        let mut count: usize = 0;
        let guard = Guard::new("fmi3GetNumberOfEventIndicators", legal::ANY);
        self.call(guard, self.binding().fmi3GetNumberOfEventIndicators, |f, c| unsafe {
            f(c, &mut count)
        })?;
        Ok(count)
    }

    fn get_number_of_continuous_states(&mut self) -> Result<usize, Error> {
        let mut count: usize = 0;
        let guard = Guard::new("fmi3GetNumberOfContinuousStates", legal::ANY);
        self.call(guard, self.binding().fmi3GetNumberOfContinuousStates, |f, c| unsafe {
            f(c, &mut count)
        })?;
        Ok(count)
    }
}
