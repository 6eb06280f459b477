use super::{traits::ModelExchange, Instance};
use crate::{
    fmi2::binding,
    lifecycle::{legal, Guard},
    Error, EventFlags, InstanceState, Status, ME,
};

impl<'a> ModelExchange for Instance<'a, ME> {
    fn enter_event_mode(&mut self, soft: bool) -> Result<Status, Error> {
        let guard = Guard::new("fmi2EnterEventMode", legal::CONTINUOUS_TIME)
            .soft(soft)
            .transition(InstanceState::EventMode);
        self.call(guard, self.binding().fmi2EnterEventMode, |f, c| unsafe { f(c) })
    }

    fn new_discrete_states(&mut self, event_flags: &mut EventFlags) -> Result<Status, Error> {
        let mut event_info = binding::fmi2EventInfo::default();
        let guard = Guard::new("fmi2NewDiscreteStates", legal::EVENT);
        let status = self.call(guard, self.binding().fmi2NewDiscreteStates, |f, c| unsafe {
            f(c, &mut event_info)
        })?;
        event_flags.update_from_fmi2_event_info(event_info);
        Ok(status)
    }

    fn enter_continuous_time_mode(&mut self, soft: bool) -> Result<Status, Error> {
        let guard = Guard::new("fmi2EnterContinuousTimeMode", legal::EVENT)
            .soft(soft)
            .transition(InstanceState::ContinuousTimeMode);
        self.call(guard, self.binding().fmi2EnterContinuousTimeMode, |f, c| unsafe {
            f(c)
        })
    }

    fn completed_integrator_step(
        &mut self,
        no_set_fmu_state_prior_to_current_point: bool,
    ) -> Result<(bool, bool), Error> {
        let mut enter_event_mode = binding::fmi2False;
        let mut terminate_simulation = binding::fmi2False;
        let guard = Guard::new("fmi2CompletedIntegratorStep", legal::CONTINUOUS_TIME);
        self.call(guard, self.binding().fmi2CompletedIntegratorStep, |f, c| unsafe {
            f(
                c,
                no_set_fmu_state_prior_to_current_point as binding::fmi2Boolean,
                &mut enter_event_mode,
                &mut terminate_simulation,
            )
        })?;
        Ok((
            enter_event_mode != binding::fmi2False,
            terminate_simulation != binding::fmi2False,
        ))
    }

    fn set_time(&mut self, time: f64) -> Result<Status, Error> {
        let native_time = self.lifecycle.native_time(time);
        let guard = Guard::new("fmi2SetTime", legal::EVENT_OR_CONTINUOUS_TIME);
        let status = self.call(guard, self.binding().fmi2SetTime, |f, c| unsafe {
            f(c, native_time)
        })?;
        if status.is_success() {
            self.lifecycle.set_time(time);
        }
        Ok(status)
    }

    fn set_continuous_states(&mut self, states: &[f64]) -> Result<Status, Error> {
        let guard = Guard::new("fmi2SetContinuousStates", legal::EVENT_OR_CONTINUOUS_TIME);
        self.call(guard, self.binding().fmi2SetContinuousStates, |f, c| unsafe {
            f(c, states.as_ptr(), states.len())
        })
    }

    fn get_derivatives(&mut self, derivatives: &mut [f64]) -> Result<Status, Error> {
        let guard = Guard::new("fmi2GetDerivatives", legal::ME_QUERY);
        self.call(guard, self.binding().fmi2GetDerivatives, |f, c| unsafe {
            f(c, derivatives.as_mut_ptr(), derivatives.len())
        })
    }

    fn get_event_indicators(&mut self, indicators: &mut [f64]) -> Result<Status, Error> {
        let guard = Guard::new("fmi2GetEventIndicators", legal::ME_QUERY);
        self.call(guard, self.binding().fmi2GetEventIndicators, |f, c| unsafe {
            f(c, indicators.as_mut_ptr(), indicators.len())
        })
    }

    fn get_continuous_states(&mut self, states: &mut [f64]) -> Result<Status, Error> {
        let guard = Guard::new("fmi2GetContinuousStates", legal::ME_QUERY);
        self.call(guard, self.binding().fmi2GetContinuousStates, |f, c| unsafe {
            f(c, states.as_mut_ptr(), states.len())
        })
    }

    fn get_nominals_of_continuous_states(
        &mut self,
        nominals: &mut [f64],
    ) -> Result<Status, Error> {
        let guard = Guard::new("fmi2GetNominalsOfContinuousStates", legal::ME_QUERY);
        self.call(
            guard,
            self.binding().fmi2GetNominalsOfContinuousStates,
            |f, c| unsafe { f(c, nominals.as_mut_ptr(), nominals.len()) },
        )
    }
}
