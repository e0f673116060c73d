use vulkanalia::vk;

use super::constants;

/// How a physical device is chosen once several pass the suitability check.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DeviceSelection {
    /// The first suitable device in enumeration order.
    #[default]
    FirstSuitable,
    /// Rank suitable devices by type, discrete GPUs first. Ties keep
    /// enumeration order.
    PreferDiscrete,
}

/// Requirements and metadata a [`VulkanContext`](super::VulkanContext) is
/// built from.
#[derive(Clone, Debug)]
pub struct ContextConfig {
    pub application_name: String,
    pub application_version: u32,
    pub engine_name: String,
    pub engine_version: u32,
    pub api_version: u32,
    pub validation_layers: Vec<vk::ExtensionName>,
    pub device_extensions: Vec<vk::ExtensionName>,
    pub device_selection: DeviceSelection,
    // Follows the build mode so a checked and a validated instance never
    // disagree. Only tests flip it.
    pub(crate) validation: bool,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            application_name: constants::APPLICATION_NAME.to_owned(),
            application_version: vk::make_version(1, 0, 0),
            engine_name: constants::ENGINE_NAME.to_owned(),
            engine_version: vk::make_version(1, 0, 0),
            api_version: vk::make_version(1, 0, 0),
            validation_layers: vec![constants::VALIDATION_LAYER],
            device_extensions: vec![vk::KHR_SWAPCHAIN_EXTENSION.name],
            device_selection: DeviceSelection::default(),
            validation: constants::VALIDATION_ENABLED,
        }
    }
}

impl ContextConfig {
    pub fn with_application(mut self, name: impl Into<String>, version: u32) -> Self {
        self.application_name = name.into();
        self.application_version = version;
        self
    }

    pub fn with_validation_layers(mut self, layers: Vec<vk::ExtensionName>) -> Self {
        self.validation_layers = layers;
        self
    }

    pub fn with_device_extensions(mut self, extensions: Vec<vk::ExtensionName>) -> Self {
        self.device_extensions = extensions;
        self
    }

    pub fn with_device_selection(mut self, selection: DeviceSelection) -> Self {
        self.device_selection = selection;
        self
    }

    #[cfg(test)]
    pub(crate) fn with_validation(mut self, enabled: bool) -> Self {
        self.validation = enabled;
        self
    }

    /// Whether validation layers and diagnostics are requested.
    pub fn validation_enabled(&self) -> bool {
        self.validation
    }
}
