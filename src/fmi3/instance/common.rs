use std::ffi::{CStr, CString};

use super::{traits::Common, FmuState, Instance};
use crate::{
    fmi3::binding,
    gateway::check_len,
    lifecycle::{legal, operating_state, Guard},
    Error, EventFlags, InstanceState, InstanceTag, Status,
};

macro_rules! impl_getter_setter {
    ($name:ident, $ty:ty, $get:ident, $set:ident) => {
        paste::paste! {
            fn [<get_ $name>](
                &mut self,
                vrs: &[binding::fmi3ValueReference],
                values: &mut [$ty],
            ) -> Result<Status, Error> {
                let guard = Guard::new(stringify!($get), legal::GET);
                self.call(guard, self.binding().$get, |f, c| unsafe {
                    f(c, vrs.as_ptr(), vrs.len(), values.as_mut_ptr(), values.len())
                })
            }

            fn [<set_ $name>](
                &mut self,
                vrs: &[binding::fmi3ValueReference],
                values: &[$ty],
            ) -> Result<Status, Error> {
                let guard = Guard::new(stringify!($set), legal::SET);
                self.call(guard, self.binding().$set, |f, c| unsafe {
                    f(c, vrs.as_ptr(), vrs.len(), values.as_ptr(), values.len())
                })
            }
        }
    };
}

impl<'a, Tag: InstanceTag> Common for Instance<'a, Tag> {
    fn get_version(&self) -> Result<&str, Error> {
        self.model.get_version()
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

        let guard = Guard::new("fmi3SetDebugLogging", legal::ANY);
        self.call(guard, self.binding().fmi3SetDebugLogging, |f, c| unsafe {
            f(c, logging_on, category_ptrs.len(), category_ptrs.as_ptr())
        })
    }

    fn enter_initialization_mode(
        &mut self,
        tolerance: Option<f64>,
        start_time: f64,
        stop_time: Option<f64>,
        soft: bool,
    ) -> Result<Status, Error> {
        let native_start = self.lifecycle.native_time(start_time);
        let native_stop = stop_time.map(|t| self.lifecycle.native_time(t));

        let mut called = false;
        let guard = Guard::new("fmi3EnterInitializationMode", legal::INSTANTIATED)
            .soft(soft)
            .transition(InstanceState::InitializationMode);
        let status = self.call(guard, self.binding().fmi3EnterInitializationMode, |f, c| unsafe {
            called = true;
            f(
                c,
                tolerance.is_some(),
                tolerance.unwrap_or(0.0),
                native_start,
                native_stop.is_some(),
                native_stop.unwrap_or(0.0),
            )
        })?;
        if called && status.is_success() {
            self.lifecycle.set_time(start_time);
        }
        Ok(status)
    }

    fn exit_initialization_mode(&mut self, soft: bool) -> Result<Status, Error> {
        let next = operating_state(
            Tag::TYPE,
            self.options.event_mode_used,
            self.model.description(),
        );
        let guard = Guard::new("fmi3ExitInitializationMode", legal::INITIALIZATION)
            .soft(soft)
            .transition(next);
        self.call(guard, self.binding().fmi3ExitInitializationMode, |f, c| unsafe {
            f(c)
        })
    }

    fn enter_configuration_mode(&mut self, soft: bool) -> Result<Status, Error> {
        let next = match self.lifecycle.state() {
            InstanceState::Instantiated => InstanceState::ConfigurationMode,
            _ => InstanceState::ReconfigurationMode,
        };
        let guard = Guard::new("fmi3EnterConfigurationMode", legal::CONFIGURATION_ENTRY)
            .soft(soft)
            .transition(next);
        self.call(guard, self.binding().fmi3EnterConfigurationMode, |f, c| unsafe {
            f(c)
        })
    }

    fn exit_configuration_mode(&mut self, soft: bool) -> Result<Status, Error> {
        let mut guard =
            Guard::new("fmi3ExitConfigurationMode", legal::CONFIGURATION).soft(soft);
        guard.on_success = match self.lifecycle.state() {
            InstanceState::ConfigurationMode => Some(InstanceState::Instantiated),
            InstanceState::ReconfigurationMode => Some(operating_state(
                Tag::TYPE,
                self.options.event_mode_used,
                self.model.description(),
            )),
            _ => None,
        };
        self.call(guard, self.binding().fmi3ExitConfigurationMode, |f, c| unsafe {
            f(c)
        })
    }

    fn enter_event_mode(&mut self, soft: bool) -> Result<Status, Error> {
        let guard = Guard::new("fmi3EnterEventMode", legal::EVENT_ENTRY)
            .soft(soft)
            .transition(InstanceState::EventMode);
        self.call(guard, self.binding().fmi3EnterEventMode, |f, c| unsafe { f(c) })
    }

    fn update_discrete_states(&mut self, event_flags: &mut EventFlags) -> Result<Status, Error> {
        let mut next_event_time_defined = false;
        let mut next_event_time = 0.0;
        let guard = Guard::new("fmi3UpdateDiscreteStates", legal::DISCRETE_UPDATE);
        let status = self.call(guard, self.binding().fmi3UpdateDiscreteStates, |f, c| unsafe {
            f(
                c,
                &mut event_flags.discrete_states_need_update,
                &mut event_flags.terminate_simulation,
                &mut event_flags.nominals_of_continuous_states_changed,
                &mut event_flags.values_of_continuous_states_changed,
                &mut next_event_time_defined,
                &mut next_event_time,
            )
        })?;
        event_flags.next_event_time = next_event_time_defined.then_some(next_event_time);
        Ok(status)
    }

    fn evaluate_discrete_states(&mut self) -> Result<Status, Error> {
        let guard = Guard::new("fmi3EvaluateDiscreteStates", legal::DISCRETE_EVALUATION);
        self.call(guard, self.binding().fmi3EvaluateDiscreteStates, |f, c| unsafe {
            f(c)
        })
    }

    impl_getter_setter!(float32, f32, fmi3GetFloat32, fmi3SetFloat32);
    impl_getter_setter!(float64, f64, fmi3GetFloat64, fmi3SetFloat64);
    impl_getter_setter!(int8, i8, fmi3GetInt8, fmi3SetInt8);
    impl_getter_setter!(uint8, u8, fmi3GetUInt8, fmi3SetUInt8);
    impl_getter_setter!(int16, i16, fmi3GetInt16, fmi3SetInt16);
    impl_getter_setter!(uint16, u16, fmi3GetUInt16, fmi3SetUInt16);
    impl_getter_setter!(int32, i32, fmi3GetInt32, fmi3SetInt32);
    impl_getter_setter!(uint32, u32, fmi3GetUInt32, fmi3SetUInt32);
    impl_getter_setter!(int64, i64, fmi3GetInt64, fmi3SetInt64);
    impl_getter_setter!(uint64, u64, fmi3GetUInt64, fmi3SetUInt64);
    impl_getter_setter!(boolean, bool, fmi3GetBoolean, fmi3SetBoolean);

    fn get_string(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        values: &mut [String],
    ) -> Result<Status, Error> {
        let mut raw: Vec<binding::fmi3String> = vec![std::ptr::null(); values.len()];
        let guard = Guard::new("fmi3GetString", legal::GET);
        let status = self.call(guard, self.binding().fmi3GetString, |f, c| unsafe {
            f(c, vrs.as_ptr(), vrs.len(), raw.as_mut_ptr(), raw.len())
        })?;
        for (value, ptr) in values.iter_mut().zip(raw) {
            if !ptr.is_null() {
                *value = unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned();
            }
        }
        Ok(status)
    }

    fn set_string<S: AsRef<str>>(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        values: &[S],
    ) -> Result<Status, Error> {
        let values = values
            .iter()
            .map(|v| CString::new(v.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        let ptrs: Vec<binding::fmi3String> = values.iter().map(|v| v.as_ptr()).collect();
        let guard = Guard::new("fmi3SetString", legal::SET);
        self.call(guard, self.binding().fmi3SetString, |f, c| unsafe {
            f(c, vrs.as_ptr(), vrs.len(), ptrs.as_ptr(), ptrs.len())
        })
    }

    fn get_binary(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        values: &mut [Vec<u8>],
    ) -> Result<Status, Error> {
        let mut sizes = vec![0usize; values.len()];
        let mut raw: Vec<binding::fmi3Binary> = vec![std::ptr::null(); values.len()];
        let guard = Guard::new("fmi3GetBinary", legal::GET);
        let status = self.call(guard, self.binding().fmi3GetBinary, |f, c| unsafe {
            f(
                c,
                vrs.as_ptr(),
                vrs.len(),
                sizes.as_mut_ptr(),
                raw.as_mut_ptr(),
                raw.len(),
            )
        })?;
        for ((value, ptr), size) in values.iter_mut().zip(raw).zip(sizes) {
            if !ptr.is_null() {
                *value = unsafe { std::slice::from_raw_parts(ptr, size) }.to_vec();
            }
        }
        Ok(status)
    }

    fn set_binary<B: AsRef<[u8]>>(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        values: &[B],
    ) -> Result<Status, Error> {
        let sizes: Vec<usize> = values.iter().map(|v| v.as_ref().len()).collect();
        let ptrs: Vec<binding::fmi3Binary> = values.iter().map(|v| v.as_ref().as_ptr()).collect();
        let guard = Guard::new("fmi3SetBinary", legal::SET);
        self.call(guard, self.binding().fmi3SetBinary, |f, c| unsafe {
            f(
                c,
                vrs.as_ptr(),
                vrs.len(),
                sizes.as_ptr(),
                ptrs.as_ptr(),
                ptrs.len(),
            )
        })
    }

    fn get_clock(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        values: &mut [binding::fmi3Clock],
    ) -> Result<Status, Error> {
        check_len("fmi3GetClock", vrs.len(), values.len())?;
        let guard = Guard::new("fmi3GetClock", legal::DISCRETE_UPDATE);
        self.call(guard, self.binding().fmi3GetClock, |f, c| unsafe {
            f(c, vrs.as_ptr(), vrs.len(), values.as_mut_ptr())
        })
    }

    fn set_clock(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        values: &[binding::fmi3Clock],
    ) -> Result<Status, Error> {
        check_len("fmi3SetClock", vrs.len(), values.len())?;
        let guard = Guard::new("fmi3SetClock", legal::DISCRETE_UPDATE);
        self.call(guard, self.binding().fmi3SetClock, |f, c| unsafe {
            f(c, vrs.as_ptr(), vrs.len(), values.as_ptr())
        })
    }

    fn get_fmu_state(&mut self) -> Result<Option<FmuState>, Error> {
        let mut native: binding::fmi3FMUState = std::ptr::null_mut();
        let guard = Guard::new("fmi3GetFMUState", legal::ANY);
        self.call(guard, self.binding().fmi3GetFMUState, |f, c| unsafe {
            f(c, &mut native)
        })?;
        Ok(self.track_state(native))
    }

    fn set_fmu_state(&mut self, state: &FmuState) -> Result<Status, Error> {
        let saved = self.saved_state(state)?;
        let (native, restored, time) = (saved.native, saved.state, saved.time);

        let guard = Guard::new("fmi3SetFMUState", legal::ANY).transition(restored);
        let status = self.call(guard, self.binding().fmi3SetFMUState, |f, c| unsafe {
            f(c, native)
        })?;
        if status.is_success() {
            self.lifecycle.set_time(time);
        }
        Ok(status)
    }

    fn free_fmu_state(&mut self, state: FmuState) -> Result<Status, Error> {
        let mut native = self.saved_state(&state)?.native;
        let guard = Guard::new("fmi3FreeFMUState", legal::ANY);
        let status = self.call(guard, self.binding().fmi3FreeFMUState, |f, c| unsafe {
            f(c, &mut native)
        })?;
        self.forget_state(&state);
        Ok(status)
    }

    fn serialize_fmu_state(&mut self, state: &FmuState) -> Result<Vec<u8>, Error> {
        let native = self.saved_state(state)?.native;

        let mut size: usize = 0;
        let guard = Guard::new("fmi3SerializedFMUStateSize", legal::ANY);
        self.call(guard, self.binding().fmi3SerializedFMUStateSize, |f, c| unsafe {
            f(c, native, &mut size)
        })?;

        let mut buffer = vec![0u8; size];
        let guard = Guard::new("fmi3SerializeFMUState", legal::ANY);
        self.call(guard, self.binding().fmi3SerializeFMUState, |f, c| unsafe {
            f(c, native, buffer.as_mut_ptr(), buffer.len())
        })?;
        Ok(buffer)
    }

    fn deserialize_fmu_state(&mut self, serialized: &[u8]) -> Result<Option<FmuState>, Error> {
        let mut native: binding::fmi3FMUState = std::ptr::null_mut();
        let guard = Guard::new("fmi3DeserializeFMUState", legal::ANY);
        self.call(guard, self.binding().fmi3DeserializeFMUState, |f, c| unsafe {
            f(c, serialized.as_ptr(), serialized.len(), &mut native)
        })?;
        Ok(self.track_state(native))
    }

    fn get_directional_derivative(
        &mut self,
        unknowns: &[binding::fmi3ValueReference],
        knowns: &[binding::fmi3ValueReference],
        seed: &[f64],
        sensitivity: &mut [f64],
    ) -> Result<Status, Error> {
        let guard = Guard::new("fmi3GetDirectionalDerivative", legal::GET);
        self.call(guard, self.binding().fmi3GetDirectionalDerivative, |f, c| unsafe {
            f(
                c,
                unknowns.as_ptr(),
                unknowns.len(),
                knowns.as_ptr(),
                knowns.len(),
                seed.as_ptr(),
                seed.len(),
                sensitivity.as_mut_ptr(),
                sensitivity.len(),
            )
        })
    }

    fn get_adjoint_derivative(
        &mut self,
        unknowns: &[binding::fmi3ValueReference],
        knowns: &[binding::fmi3ValueReference],
        seed: &[f64],
        sensitivity: &mut [f64],
    ) -> Result<Status, Error> {
        let guard = Guard::new("fmi3GetAdjointDerivative", legal::GET);
        self.call(guard, self.binding().fmi3GetAdjointDerivative, |f, c| unsafe {
            f(
                c,
                unknowns.as_ptr(),
                unknowns.len(),
                knowns.as_ptr(),
                knowns.len(),
                seed.as_ptr(),
                seed.len(),
                sensitivity.as_mut_ptr(),
                sensitivity.len(),
            )
        })
    }
}
