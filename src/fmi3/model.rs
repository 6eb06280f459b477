use std::{
    ffi::{c_void, CStr, CString, OsStr},
    path::Path,
    sync::Arc,
};

use super::{binding, callbacks, instance::Instance};
use crate::{
    gateway, Error, InstanceOptions, InterfaceType, ModelDescription, NativeHandle, Registry,
    StatusPolicy, CS, ME, SE,
};

/// A loaded FMI 3.0 shared library together with its metadata.
#[derive(Debug)]
pub struct Model {
    binding: binding::Fmi3Binding,
    description: ModelDescription,
    /// Absolute path of the unzipped `resources` directory, with a trailing separator
    resource_path: String,
    registry: Arc<Registry>,
    policy: StatusPolicy,
}

fn instantiate_function(interface: InterfaceType) -> &'static str {
    match interface {
        InterfaceType::ModelExchange => "fmi3InstantiateModelExchange",
        InterfaceType::CoSimulation => "fmi3InstantiateCoSimulation",
        InterfaceType::ScheduledExecution => "fmi3InstantiateScheduledExecution",
    }
}

impl Model {
    /// Create a model from a resolved entry-point table.
    ///
    /// Every interface the description declares must have its instantiate function, and
    /// `fmi3FreeInstance` must exist.
    pub fn new(
        binding: binding::Fmi3Binding,
        description: ModelDescription,
        resource_path: impl Into<String>,
    ) -> Result<Self, Error> {
        if binding.fmi3FreeInstance.is_none() {
            return Err(Error::MissingEntryPoint("fmi3FreeInstance"));
        }
        for (supported, present, interface) in [
            (
                description.supports_model_exchange(),
                binding.fmi3InstantiateModelExchange.is_some(),
                InterfaceType::ModelExchange,
            ),
            (
                description.supports_co_simulation(),
                binding.fmi3InstantiateCoSimulation.is_some(),
                InterfaceType::CoSimulation,
            ),
            (
                description.supports_scheduled_execution(),
                binding.fmi3InstantiateScheduledExecution.is_some(),
                InterfaceType::ScheduledExecution,
            ),
        ] {
            if supported && !present {
                return Err(Error::MissingEntryPoint(instantiate_function(interface)));
            }
        }

        Ok(Self {
            binding,
            description,
            resource_path: resource_path.into(),
            registry: Arc::default(),
            policy: StatusPolicy::default(),
        })
    }

    /// Load the shared library at `library` and resolve its entry points.
    ///
    /// # Safety
    /// The library is trusted to implement the FMI 3.0 C API.
    pub unsafe fn load(
        library: impl AsRef<OsStr>,
        description: ModelDescription,
        resource_dir: impl AsRef<Path>,
    ) -> Result<Self, Error> {
        log::trace!("Loading shared library {:?}", library.as_ref());
        let binding = binding::Fmi3Binding::new(library)?;
        let resource_dir = std::path::absolute(resource_dir)?;
        let resource_path = resource_dir
            .to_str()
            .ok_or_else(|| Error::ResourcePath(resource_dir.clone()))?;
        let resource_path = if resource_path.ends_with(std::path::MAIN_SEPARATOR) {
            resource_path.to_owned()
        } else {
            format!("{resource_path}{}", std::path::MAIN_SEPARATOR)
        };
        Self::new(binding, description, resource_path)
    }

    /// Default policy for instances created after this call.
    pub fn with_policy(mut self, policy: StatusPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn binding(&self) -> &binding::Fmi3Binding {
        &self.binding
    }

    pub fn description(&self) -> &ModelDescription {
        &self.description
    }

    pub fn resource_path(&self) -> &str {
        &self.resource_path
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn policy(&self) -> StatusPolicy {
        self.policy
    }

    /// The FMI-standard version string
    pub fn get_version(&self) -> Result<&str, Error> {
        let get_version = gateway::entry(self.binding.fmi3GetVersion, "fmi3GetVersion")?;
        Ok(unsafe { CStr::from_ptr(get_version()) }.to_str()?)
    }

    /// Check that the library implements FMI 3.x.
    pub fn check_consistency(&self) -> Result<(), Error> {
        let version = self.get_version()?;
        if version.split('.').next() != Some("3") {
            return Err(Error::FmiVersionMismatch {
                found: version.to_owned(),
                expected: binding::fmi3Version.to_owned(),
            });
        }
        Ok(())
    }

    /// Create a new instance of the FMU for Model-Exchange
    pub fn instantiate_me(
        &self,
        instance_name: &str,
        options: InstanceOptions,
    ) -> Result<Instance<'_, ME>, Error> {
        Instance::new(self, instance_name, options)
    }

    /// Create a new instance of the FMU for Co-Simulation
    pub fn instantiate_cs(
        &self,
        instance_name: &str,
        options: InstanceOptions,
    ) -> Result<Instance<'_, CS>, Error> {
        Instance::new(self, instance_name, options)
    }

    /// Create a new instance of the FMU for Scheduled Execution
    pub fn instantiate_se(
        &self,
        instance_name: &str,
        options: InstanceOptions,
    ) -> Result<Instance<'_, SE>, Error> {
        Instance::new(self, instance_name, options)
    }

    /// Call the instantiate function of `interface`. Also used to re-create the native instance
    /// of an emulated reset.
    pub(crate) fn instantiate_native(
        &self,
        instance_name: &str,
        interface: InterfaceType,
        options: &InstanceOptions,
        environment: *mut c_void,
    ) -> Result<NativeHandle, Error> {
        let capabilities = self
            .description
            .capabilities(interface)
            .ok_or_else(|| Error::UnsupportedFmuType(interface.to_string()))?;
        if capabilities.can_be_instantiated_only_once_per_process && !self.registry.is_empty() {
            log::error!("{interface} FMU can only be instantiated once per process");
            return Err(Error::Instantiation);
        }

        let name = CString::new(instance_name)?;
        let token = CString::new(self.description.instantiation_token.as_str())?;
        let resource_path = CString::new(self.resource_path.as_str())?;

        log::debug!(
            "Instantiating {interface} instance '{instance_name}', resources at {}",
            self.resource_path
        );

        let instance = match interface {
            InterfaceType::ModelExchange => {
                let instantiate = gateway::entry(
                    self.binding.fmi3InstantiateModelExchange,
                    instantiate_function(interface),
                )?;
                unsafe {
                    instantiate(
                        name.as_ptr(),
                        token.as_ptr(),
                        resource_path.as_ptr(),
                        options.visible,
                        options.logging_on,
                        environment,
                        Some(callbacks::log_message),
                    )
                }
            }
            InterfaceType::CoSimulation => {
                let instantiate = gateway::entry(
                    self.binding.fmi3InstantiateCoSimulation,
                    instantiate_function(interface),
                )?;
                let required = &options.required_intermediate_variables;
                unsafe {
                    instantiate(
                        name.as_ptr(),
                        token.as_ptr(),
                        resource_path.as_ptr(),
                        options.visible,
                        options.logging_on,
                        options.event_mode_used,
                        options.early_return_allowed,
                        required.as_ptr(),
                        required.len(),
                        environment,
                        Some(callbacks::log_message),
                        Some(callbacks::intermediate_update),
                    )
                }
            }
            InterfaceType::ScheduledExecution => {
                let instantiate = gateway::entry(
                    self.binding.fmi3InstantiateScheduledExecution,
                    instantiate_function(interface),
                )?;
                unsafe {
                    instantiate(
                        name.as_ptr(),
                        token.as_ptr(),
                        resource_path.as_ptr(),
                        options.visible,
                        options.logging_on,
                        environment,
                        Some(callbacks::log_message),
                        Some(callbacks::clock_update),
                        Some(callbacks::lock_preemption),
                        Some(callbacks::unlock_preemption),
                    )
                }
            }
        };

        NativeHandle::from_ptr(instance).ok_or_else(|| {
            log::error!(
                "{} returned null for instance '{instance_name}'",
                instantiate_function(interface)
            );
            Error::Instantiation
        })
    }
}
