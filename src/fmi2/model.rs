use std::{
    ffi::{CStr, CString, OsStr},
    path::Path,
    sync::Arc,
};

use super::{binding, instance::Instance};
use crate::{
    gateway, Error, InstanceOptions, InterfaceType, ModelDescription, NativeHandle, Registry,
    StatusPolicy, CS, ME,
};

/// A loaded FMI 2.0 shared library together with its metadata.
#[derive(Debug)]
pub struct Model {
    binding: binding::Fmi2Binding,
    description: ModelDescription,
    /// IETF URI of the unzipped `resources` directory
    resource_location: String,
    registry: Arc<Registry>,
    policy: StatusPolicy,
}

impl Model {
    /// Create a model from a resolved entry-point table.
    ///
    /// Fails with [`Error::MissingEntryPoint`] if the table cannot instantiate or free an
    /// instance.
    pub fn new(
        binding: binding::Fmi2Binding,
        description: ModelDescription,
        resource_location: impl Into<String>,
    ) -> Result<Self, Error> {
        if binding.fmi2Instantiate.is_none() {
            return Err(Error::MissingEntryPoint("fmi2Instantiate"));
        }
        if binding.fmi2FreeInstance.is_none() {
            return Err(Error::MissingEntryPoint("fmi2FreeInstance"));
        }
        Ok(Self {
            binding,
            description,
            resource_location: resource_location.into(),
            registry: Arc::default(),
            policy: StatusPolicy::default(),
        })
    }

    /// Load the shared library at `library` and resolve its entry points.
    ///
    /// # Safety
    /// The library is trusted to implement the FMI 2.0 C API.
    pub unsafe fn load(
        library: impl AsRef<OsStr>,
        description: ModelDescription,
        resource_dir: impl AsRef<Path>,
    ) -> Result<Self, Error> {
        log::trace!("Loading shared library {:?}", library.as_ref());
        let binding = binding::Fmi2Binding::new(library)?;
        let resource_dir = std::path::absolute(resource_dir)?;
        let url = url::Url::from_directory_path(&resource_dir)
            .map_err(|_| Error::ResourcePath(resource_dir.clone()))?;
        Self::new(binding, description, url.as_str())
    }

    /// Default policy for instances created after this call.
    pub fn with_policy(mut self, policy: StatusPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn binding(&self) -> &binding::Fmi2Binding {
        &self.binding
    }

    pub fn description(&self) -> &ModelDescription {
        &self.description
    }

    pub fn resource_location(&self) -> &str {
        &self.resource_location
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn policy(&self) -> StatusPolicy {
        self.policy
    }

    /// The FMI-standard version string
    pub fn get_version(&self) -> Result<&str, Error> {
        let get_version = gateway::entry(self.binding.fmi2GetVersion, "fmi2GetVersion")?;
        Ok(unsafe { CStr::from_ptr(get_version()) }.to_str()?)
    }

    pub fn get_types_platform(&self) -> Result<&str, Error> {
        let get_types_platform =
            gateway::entry(self.binding.fmi2GetTypesPlatform, "fmi2GetTypesPlatform")?;
        Ok(unsafe { CStr::from_ptr(get_types_platform()) }.to_str()?)
    }

    /// Check that the library was compiled for the FMI 2.0 default platform types.
    pub fn check_consistency(&self) -> Result<(), Error> {
        let types_platform = self.get_types_platform()?;
        if types_platform != binding::fmi2TypesPlatform {
            return Err(Error::TypesPlatformMismatch(types_platform.to_owned()));
        }
        let version = self.get_version()?;
        if !version.starts_with(binding::fmi2Version) {
            return Err(Error::FmiVersionMismatch {
                found: version.to_owned(),
                expected: binding::fmi2Version.to_owned(),
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

    /// Call `fmi2Instantiate`. Also used to re-create the native instance of an emulated reset.
    pub(crate) fn instantiate_native(
        &self,
        instance_name: &str,
        interface: InterfaceType,
        options: &InstanceOptions,
        callbacks: &binding::fmi2CallbackFunctions,
    ) -> Result<NativeHandle, Error> {
        let fmu_type = match interface {
            InterfaceType::ModelExchange => binding::fmi2Type_fmi2ModelExchange,
            InterfaceType::CoSimulation => binding::fmi2Type_fmi2CoSimulation,
            InterfaceType::ScheduledExecution => {
                return Err(Error::UnsupportedFmuType(interface.to_string()))
            }
        };
        let capabilities = self
            .description
            .capabilities(interface)
            .ok_or_else(|| Error::UnsupportedFmuType(interface.to_string()))?;
        if capabilities.can_be_instantiated_only_once_per_process && !self.registry.is_empty() {
            log::error!("{interface} FMU can only be instantiated once per process");
            return Err(Error::Instantiation);
        }

        let instantiate = gateway::entry(self.binding.fmi2Instantiate, "fmi2Instantiate")?;
        let name = CString::new(instance_name)?;
        let guid = CString::new(self.description.instantiation_token.as_str())?;
        let resource_location = CString::new(self.resource_location.as_str())?;

        log::debug!(
            "Instantiating {interface} instance '{instance_name}', resources at {}",
            self.resource_location
        );

        let component = unsafe {
            instantiate(
                name.as_ptr(),
                fmu_type,
                guid.as_ptr(),
                resource_location.as_ptr(),
                callbacks,
                options.visible as binding::fmi2Boolean,
                options.logging_on as binding::fmi2Boolean,
            )
        };

        NativeHandle::from_ptr(component).ok_or_else(|| {
            log::error!("fmi2Instantiate returned null for instance '{instance_name}'");
            Error::Instantiation
        })
    }
}
