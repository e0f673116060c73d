use std::collections::HashSet;

use log::*;
use vulkanalia::{vk, Version, VkResult};

use super::config::ContextConfig;
use super::constants;
use super::driver::Loader;

/// Marker that the runtime exposes the diagnostics extension and
/// validation was requested.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Diagnostics;

/// Decides which layers and extensions the instance and device are created
/// with.
#[derive(Clone, Debug)]
pub struct ExtensionNegotiator {
    validation: bool,
    validation_layers: Vec<vk::ExtensionName>,
    device_extensions: Vec<vk::ExtensionName>,
}

impl ExtensionNegotiator {
    pub fn new(config: &ContextConfig) -> Self {
        Self {
            validation: config.validation_enabled(),
            validation_layers: config.validation_layers.clone(),
            device_extensions: config.device_extensions.clone(),
        }
    }

    pub fn validation_enabled(&self) -> bool {
        self.validation
    }

    /// Layers enabled on the instance and the device.
    pub fn layers(&self) -> Vec<vk::ExtensionName> {
        if self.validation {
            self.validation_layers.clone()
        } else {
            Vec::new()
        }
    }

    pub fn missing_layers<L: Loader>(&self, loader: &L) -> VkResult<Vec<vk::ExtensionName>> {
        let available = loader.layer_names()?.into_iter().collect::<HashSet<_>>();

        Ok(self
            .validation_layers
            .iter()
            .filter(|l| !available.contains(*l))
            .copied()
            .collect())
    }

    /// True only if every requested validation layer is exposed by the
    /// runtime.
    pub fn validation_layers_available<L: Loader>(&self, loader: &L) -> VkResult<bool> {
        Ok(self.missing_layers(loader)?.is_empty())
    }

    /// Diagnostics run only when validation is on and `available` lists
    /// `VK_EXT_debug_utils`. Without it, validation layers still load but
    /// their messages are not routed to the log.
    pub fn probe_diagnostics(&self, available: &[vk::ExtensionName]) -> Option<Diagnostics> {
        if !self.validation {
            return None;
        }

        let extension = vk::EXT_DEBUG_UTILS_EXTENSION.name;
        if available.contains(&extension) {
            Some(Diagnostics)
        } else {
            warn!("`{}` is not available, diagnostics disabled.", extension);
            None
        }
    }

    /// Required by the Vulkan SDK on macOS since 1.3.216.
    pub fn portability_required(version: Version) -> bool {
        cfg!(target_os = "macos") && version >= constants::PORTABILITY_MACOS_VERSION
    }

    pub fn required_instance_extensions(
        &self,
        platform: &[vk::ExtensionName],
        diagnostics: Option<Diagnostics>,
        portability: bool,
    ) -> Vec<vk::ExtensionName> {
        let mut extensions = platform.to_vec();

        if portability {
            info!("Enabling extensions for macOS portability.");
            extensions.push(vk::KHR_GET_PHYSICAL_DEVICE_PROPERTIES2_EXTENSION.name);
            extensions.push(vk::KHR_PORTABILITY_ENUMERATION_EXTENSION.name);
        }

        if diagnostics.is_some() {
            extensions.push(vk::EXT_DEBUG_UTILS_EXTENSION.name);
        }

        extensions
    }

    /// Logs what the runtime offers and warns about required extensions it
    /// does not list. Instance creation reports the actual failure.
    pub fn report_instance_extensions(
        &self,
        available: &[vk::ExtensionName],
        required: &[vk::ExtensionName],
    ) {
        for extension in available {
            debug!("Available instance extension `{}`.", extension);
        }

        for extension in required.iter().filter(|e| !available.contains(*e)) {
            warn!("Unsupported instance extension required: `{}`.", extension);
        }
    }

    pub fn device_extensions(&self) -> &[vk::ExtensionName] {
        &self.device_extensions
    }

    /// Device extensions to enable on the logical device.
    pub fn enabled_device_extensions(&self, portability: bool) -> Vec<vk::ExtensionName> {
        let mut extensions = self.device_extensions.clone();
        if portability {
            extensions.push(vk::KHR_PORTABILITY_SUBSET_EXTENSION.name);
        }
        extensions
    }
}
