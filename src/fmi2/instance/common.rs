use std::ffi::CString;

use super::{traits::Common, FmuState, Instance};
use crate::{
    fmi2::binding::{self, logger::lossy},
    gateway::check_len,
    lifecycle::{legal, operating_state, Guard},
    Error, InstanceState, InstanceTag, Status,
};

impl<'a, Tag: InstanceTag> Common for Instance<'a, Tag> {
    fn get_version(&self) -> Result<&str, Error> {
        self.model.get_version()
    }

    fn get_types_platform(&self) -> Result<&str, Error> {
        self.model.get_types_platform()
    }

    fn set_debug_logging(
        &mut self,
        logging_on: bool,
        categories: &[&str],
    ) -> Result<Status, Error> {
        let categories = categories
            .iter()
            .map(|c| CString::new(*c))
            .collect::<Result<Vec<_>, _>>()?;
        let category_ptrs: Vec<_> = categories.iter().map(|c| c.as_ptr()).collect();

        let guard = Guard::new("fmi2SetDebugLogging", legal::ANY);
        self.call(guard, self.binding().fmi2SetDebugLogging, |f, c| unsafe {
            f(
                c,
                logging_on as binding::fmi2Boolean,
                category_ptrs.len(),
                category_ptrs.as_ptr(),
            )
        })
    }

    fn setup_experiment(
        &mut self,
        tolerance: Option<f64>,
        start_time: f64,
        stop_time: Option<f64>,
    ) -> Result<Status, Error> {
        let native_start = self.lifecycle.native_time(start_time);
        let native_stop = stop_time.map(|t| self.lifecycle.native_time(t));

        let guard = Guard::new("fmi2SetupExperiment", legal::INSTANTIATED);
        let status = self.call(guard, self.binding().fmi2SetupExperiment, |f, c| unsafe {
            f(
                c,
                tolerance.is_some() as binding::fmi2Boolean,
                tolerance.unwrap_or(0.0),
                native_start,
                native_stop.is_some() as binding::fmi2Boolean,
                native_stop.unwrap_or(0.0),
            )
        })?;
        if status.is_success() {
            self.lifecycle.set_time(start_time);
        }
        Ok(status)
    }

    fn enter_initialization_mode(&mut self, soft: bool) -> Result<Status, Error> {
        let guard = Guard::new("fmi2EnterInitializationMode", legal::INSTANTIATED)
            .soft(soft)
            .transition(InstanceState::InitializationMode);
        self.call(guard, self.binding().fmi2EnterInitializationMode, |f, c| unsafe {
            f(c)
        })
    }

    fn exit_initialization_mode(&mut self, soft: bool) -> Result<Status, Error> {
        let next = operating_state(Tag::TYPE, false, self.model.description());
        let guard = Guard::new("fmi2ExitInitializationMode", legal::INITIALIZATION)
            .soft(soft)
            .transition(next);
        self.call(guard, self.binding().fmi2ExitInitializationMode, |f, c| unsafe {
            f(c)
        })
    }

    fn get_real(
        &mut self,
        vrs: &[binding::fmi2ValueReference],
        values: &mut [binding::fmi2Real],
    ) -> Result<Status, Error> {
        check_len("fmi2GetReal", vrs.len(), values.len())?;
        let guard = Guard::new("fmi2GetReal", legal::GET);
        self.call(guard, self.binding().fmi2GetReal, |f, c| unsafe {
            f(c, vrs.as_ptr(), vrs.len(), values.as_mut_ptr())
        })
    }

    fn get_integer(
        &mut self,
        vrs: &[binding::fmi2ValueReference],
        values: &mut [binding::fmi2Integer],
    ) -> Result<Status, Error> {
        check_len("fmi2GetInteger", vrs.len(), values.len())?;
        let guard = Guard::new("fmi2GetInteger", legal::GET);
        self.call(guard, self.binding().fmi2GetInteger, |f, c| unsafe {
            f(c, vrs.as_ptr(), vrs.len(), values.as_mut_ptr())
        })
    }

    fn get_boolean(
        &mut self,
        vrs: &[binding::fmi2ValueReference],
        values: &mut [bool],
    ) -> Result<Status, Error> {
        check_len("fmi2GetBoolean", vrs.len(), values.len())?;
        let mut raw = vec![binding::fmi2False; values.len()];
        let guard = Guard::new("fmi2GetBoolean", legal::GET);
        let status = self.call(guard, self.binding().fmi2GetBoolean, |f, c| unsafe {
            f(c, vrs.as_ptr(), vrs.len(), raw.as_mut_ptr())
        })?;
        for (value, raw) in values.iter_mut().zip(raw) {
            *value = raw != binding::fmi2False;
        }
        Ok(status)
    }

    fn get_string(
        &mut self,
        vrs: &[binding::fmi2ValueReference],
        values: &mut [String],
    ) -> Result<Status, Error> {
        check_len("fmi2GetString", vrs.len(), values.len())?;
        let mut raw: Vec<binding::fmi2String> = vec![std::ptr::null(); values.len()];
        let guard = Guard::new("fmi2GetString", legal::GET);
        let status = self.call(guard, self.binding().fmi2GetString, |f, c| unsafe {
            f(c, vrs.as_ptr(), vrs.len(), raw.as_mut_ptr())
        })?;
        for (value, ptr) in values.iter_mut().zip(raw) {
            if !ptr.is_null() {
                *value = unsafe { lossy(ptr) };
            }
        }
        Ok(status)
    }

    fn set_real(
        &mut self,
        vrs: &[binding::fmi2ValueReference],
        values: &[binding::fmi2Real],
    ) -> Result<Status, Error> {
        check_len("fmi2SetReal", vrs.len(), values.len())?;
        let guard = Guard::new("fmi2SetReal", legal::SET);
        self.call(guard, self.binding().fmi2SetReal, |f, c| unsafe {
            f(c, vrs.as_ptr(), vrs.len(), values.as_ptr())
        })
    }

    fn set_integer(
        &mut self,
        vrs: &[binding::fmi2ValueReference],
        values: &[binding::fmi2Integer],
    ) -> Result<Status, Error> {
        check_len("fmi2SetInteger", vrs.len(), values.len())?;
        let guard = Guard::new("fmi2SetInteger", legal::SET);
        self.call(guard, self.binding().fmi2SetInteger, |f, c| unsafe {
            f(c, vrs.as_ptr(), vrs.len(), values.as_ptr())
        })
    }

    fn set_boolean(
        &mut self,
        vrs: &[binding::fmi2ValueReference],
        values: &[bool],
    ) -> Result<Status, Error> {
        check_len("fmi2SetBoolean", vrs.len(), values.len())?;
        let raw: Vec<binding::fmi2Boolean> = values
            .iter()
            .map(|&v| v as binding::fmi2Boolean)
            .collect();
        let guard = Guard::new("fmi2SetBoolean", legal::SET);
        self.call(guard, self.binding().fmi2SetBoolean, |f, c| unsafe {
            f(c, vrs.as_ptr(), vrs.len(), raw.as_ptr())
        })
    }

    fn set_string<S: AsRef<str>>(
        &mut self,
        vrs: &[binding::fmi2ValueReference],
        values: &[S],
    ) -> Result<Status, Error> {
        check_len("fmi2SetString", vrs.len(), values.len())?;
        let values = values
            .iter()
            .map(|v| CString::new(v.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        let ptrs: Vec<binding::fmi2String> = values.iter().map(|v| v.as_ptr()).collect();
        let guard = Guard::new("fmi2SetString", legal::SET);
        self.call(guard, self.binding().fmi2SetString, |f, c| unsafe {
            f(c, vrs.as_ptr(), vrs.len(), ptrs.as_ptr())
        })
    }

    fn get_fmu_state(&mut self) -> Result<Option<FmuState>, Error> {
        let mut native: binding::fmi2FMUstate = std::ptr::null_mut();
        let guard = Guard::new("fmi2GetFMUstate", legal::ANY);
        self.call(guard, self.binding().fmi2GetFMUstate, |f, c| unsafe {
            f(c, &mut native)
        })?;
        Ok(self.track_state(native))
    }

    fn set_fmu_state(&mut self, state: &FmuState) -> Result<Status, Error> {
        let saved = self.saved_state(state)?;
        let (native, restored, time) = (saved.native, saved.state, saved.time);

        let guard = Guard::new("fmi2SetFMUstate", legal::ANY).transition(restored);
        let status = self.call(guard, self.binding().fmi2SetFMUstate, |f, c| unsafe {
            f(c, native)
        })?;
        if status.is_success() {
            self.lifecycle.set_time(time);
        }
        Ok(status)
    }

    fn free_fmu_state(&mut self, state: FmuState) -> Result<Status, Error> {
        let mut native = self.saved_state(&state)?.native;
        let guard = Guard::new("fmi2FreeFMUstate", legal::ANY);
        let status = self.call(guard, self.binding().fmi2FreeFMUstate, |f, c| unsafe {
            f(c, &mut native)
        })?;
        self.forget_state(&state);
        Ok(status)
    }

    fn serialize_fmu_state(&mut self, state: &FmuState) -> Result<Vec<u8>, Error> {
        let native = self.saved_state(state)?.native;

        let mut size: usize = 0;
        let guard = Guard::new("fmi2SerializedFMUstateSize", legal::ANY);
        self.call(guard, self.binding().fmi2SerializedFMUstateSize, |f, c| unsafe {
            f(c, native, &mut size)
        })?;

        let mut buffer = vec![0u8; size];
        let guard = Guard::new("fmi2SerializeFMUstate", legal::ANY);
        self.call(guard, self.binding().fmi2SerializeFMUstate, |f, c| unsafe {
            f(
                c,
                native,
                buffer.as_mut_ptr() as *mut binding::fmi2Byte,
                buffer.len(),
            )
        })?;
        Ok(buffer)
    }

    fn deserialize_fmu_state(&mut self, serialized: &[u8]) -> Result<Option<FmuState>, Error> {
        let mut native: binding::fmi2FMUstate = std::ptr::null_mut();
        let guard = Guard::new("fmi2DeSerializeFMUstate", legal::ANY);
        self.call(guard, self.binding().fmi2DeSerializeFMUstate, |f, c| unsafe {
            f(
                c,
                serialized.as_ptr() as *const binding::fmi2Byte,
                serialized.len(),
                &mut native,
            )
        })?;
        Ok(self.track_state(native))
    }

    fn get_directional_derivative(
        &mut self,
        unknowns: &[binding::fmi2ValueReference],
        knowns: &[binding::fmi2ValueReference],
        dv_known: &[binding::fmi2Real],
        dv_unknown: &mut [binding::fmi2Real],
    ) -> Result<Status, Error> {
        check_len("fmi2GetDirectionalDerivative", knowns.len(), dv_known.len())?;
        check_len("fmi2GetDirectionalDerivative", unknowns.len(), dv_unknown.len())?;
        let guard = Guard::new("fmi2GetDirectionalDerivative", legal::GET);
        self.call(guard, self.binding().fmi2GetDirectionalDerivative, |f, c| unsafe {
            f(
                c,
                unknowns.as_ptr(),
                unknowns.len(),
                knowns.as_ptr(),
                knowns.len(),
                dv_known.as_ptr(),
                dv_unknown.as_mut_ptr(),
            )
        })
    }
}
