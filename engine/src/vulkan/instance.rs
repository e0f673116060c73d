use log::*;
use vulkanalia::vk::{self, Handle};

use super::config::ContextConfig;
use super::driver::{InstanceDriver, InstanceRequest, Loader, PresentationTarget};
use super::error::{ContextError, DriverCall, PlatformError};
use super::extensions::{Diagnostics, ExtensionNegotiator};

/// Owns the instance together with the objects released through it. Drop
/// releases the surface, then the messenger, then the instance.
#[derive(Debug)]
pub struct VulkanInstance<I: InstanceDriver> {
    vk_instance: I,
    diagnostics: Option<Diagnostics>,
    portability: bool,
    messenger: vk::DebugUtilsMessengerEXT,
    surface: vk::SurfaceKHR,
}

impl<I: InstanceDriver> VulkanInstance<I> {
    pub fn new<L: Loader<Instance = I>>(
        loader: &L,
        negotiator: &ExtensionNegotiator,
        config: &ContextConfig,
        platform_extensions: &[vk::ExtensionName],
    ) -> Result<Self, ContextError> {
        // Layers
        if negotiator.validation_enabled() {
            let missing = negotiator
                .missing_layers(loader)
                .map_err(|e| ContextError::driver(DriverCall::EnumerateLayers, e))?;
            if !missing.is_empty() {
                return Err(ContextError::Configuration {
                    missing: missing.iter().map(|l| l.to_string()).collect(),
                });
            }
        }

        if platform_extensions.is_empty() {
            return Err(PlatformError::NoSurfaceExtensions.into());
        }

        // Extensions
        let available = loader
            .instance_extension_names()
            .map_err(|e| ContextError::driver(DriverCall::EnumerateInstanceExtensions, e))?;
        let diagnostics = negotiator.probe_diagnostics(&available);

        let version = loader
            .version()
            .map_err(|e| ContextError::driver(DriverCall::LoaderVersion, e))?;
        let portability = ExtensionNegotiator::portability_required(version);

        let extensions =
            negotiator.required_instance_extensions(platform_extensions, diagnostics, portability);
        negotiator.report_instance_extensions(&available, &extensions);

        let flags = if portability {
            vk::InstanceCreateFlags::ENUMERATE_PORTABILITY_KHR
        } else {
            vk::InstanceCreateFlags::empty()
        };

        // Create
        let request = InstanceRequest {
            application_name: config.application_name.clone(),
            application_version: config.application_version,
            engine_name: config.engine_name.clone(),
            engine_version: config.engine_version,
            api_version: config.api_version,
            layers: negotiator.layers(),
            extensions,
            flags,
            diagnostics: diagnostics.is_some(),
        };
        debug!("Creating instance: {:?}", request);

        let vk_instance = loader
            .create_instance(&request)
            .map_err(|e| ContextError::driver(DriverCall::CreateInstance, e))?;

        Ok(Self {
            vk_instance,
            diagnostics,
            portability,
            messenger: vk::DebugUtilsMessengerEXT::null(),
            surface: vk::SurfaceKHR::null(),
        })
    }

    /// Installs the debug messenger. Does nothing when diagnostics are off
    /// or the messenger already exists.
    pub(super) fn setup_diagnostics(&mut self) -> Result<(), ContextError> {
        if self.diagnostics.is_none() || !self.messenger.is_null() {
            return Ok(());
        }

        self.messenger = self
            .vk_instance
            .create_debug_messenger()
            .map_err(|e| ContextError::driver(DriverCall::CreateDebugMessenger, e))?;

        Ok(())
    }

    /// Creates the window surface once; later calls return the same handle.
    pub(super) fn create_surface<W: PresentationTarget<I> + ?Sized>(
        &mut self,
        window: &W,
    ) -> Result<vk::SurfaceKHR, ContextError> {
        if !self.surface.is_null() {
            return Ok(self.surface);
        }

        self.surface = window
            .create_surface(&self.vk_instance)
            .map_err(|e| ContextError::driver(DriverCall::CreateSurface, e))?;

        Ok(self.surface)
    }

    pub fn raw(&self) -> &I {
        &self.vk_instance
    }

    pub fn surface(&self) -> vk::SurfaceKHR {
        self.surface
    }

    pub fn diagnostics_enabled(&self) -> bool {
        !self.messenger.is_null()
    }

    pub fn portability(&self) -> bool {
        self.portability
    }
}

impl<I: InstanceDriver> Drop for VulkanInstance<I> {
    fn drop(&mut self) {
        if !self.surface.is_null() {
            self.vk_instance.destroy_surface(self.surface);
        }
        if !self.messenger.is_null() {
            self.vk_instance.destroy_debug_messenger(self.messenger);
        }
        debug!("Destroying instance.");
        self.vk_instance.destroy_instance();
    }
}
