//! The driver entry points the bootstrap calls into.
//!
//! The native implementations live in [`super::native`]. Keeping the core
//! behind these traits lets the selection logic run against synthetic device
//! tables.

use vulkanalia::{vk, Version, VkResult};

/// Instance-level objects the bootstrap asks the loader to create.
#[derive(Clone, Debug, PartialEq)]
pub struct InstanceRequest {
    pub application_name: String,
    pub application_version: u32,
    pub engine_name: String,
    pub engine_version: u32,
    pub api_version: u32,
    pub layers: Vec<vk::ExtensionName>,
    pub extensions: Vec<vk::ExtensionName>,
    pub flags: vk::InstanceCreateFlags,
    /// Chains a messenger create info so instance creation itself is
    /// validated.
    pub diagnostics: bool,
}

/// One queue creation request: a single queue from `family`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct QueueRequest {
    pub family: u32,
    pub priority: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DeviceRequest {
    pub queues: Vec<QueueRequest>,
    pub layers: Vec<vk::ExtensionName>,
    pub extensions: Vec<vk::ExtensionName>,
}

/// Entry points available before an instance exists.
pub trait Loader {
    type Instance: InstanceDriver;

    fn version(&self) -> VkResult<Version>;

    fn layer_names(&self) -> VkResult<Vec<vk::ExtensionName>>;

    fn instance_extension_names(&self) -> VkResult<Vec<vk::ExtensionName>>;

    fn create_instance(&self, request: &InstanceRequest) -> VkResult<Self::Instance>;
}

/// Queries and creation calls made through an instance.
pub trait InstanceDriver {
    type Device: DeviceDriver;

    fn enumerate_physical_devices(&self) -> VkResult<Vec<vk::PhysicalDevice>>;

    fn device_name(&self, physical_device: vk::PhysicalDevice) -> String;

    fn device_type(&self, physical_device: vk::PhysicalDevice) -> vk::PhysicalDeviceType;

    fn queue_family_properties(
        &self,
        physical_device: vk::PhysicalDevice,
    ) -> Vec<vk::QueueFamilyProperties>;

    fn surface_support(
        &self,
        physical_device: vk::PhysicalDevice,
        family: u32,
        surface: vk::SurfaceKHR,
    ) -> VkResult<bool>;

    fn device_extension_names(
        &self,
        physical_device: vk::PhysicalDevice,
    ) -> VkResult<Vec<vk::ExtensionName>>;

    fn surface_capabilities(
        &self,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> VkResult<vk::SurfaceCapabilitiesKHR>;

    fn surface_formats(
        &self,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> VkResult<Vec<vk::SurfaceFormatKHR>>;

    fn surface_present_modes(
        &self,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> VkResult<Vec<vk::PresentModeKHR>>;

    fn create_debug_messenger(&self) -> VkResult<vk::DebugUtilsMessengerEXT>;

    fn create_device(
        &self,
        physical_device: vk::PhysicalDevice,
        request: &DeviceRequest,
    ) -> VkResult<Self::Device>;

    fn destroy_debug_messenger(&self, messenger: vk::DebugUtilsMessengerEXT);

    fn destroy_surface(&self, surface: vk::SurfaceKHR);

    /// Every child object must already be released.
    fn destroy_instance(&self);
}

pub trait DeviceDriver {
    fn queue(&self, family: u32, index: u32) -> vk::Queue;

    /// Every queue handle obtained from this device becomes invalid.
    fn destroy_device(&self);
}

/// The window side of the bootstrap: which instance extensions the platform
/// needs and how a surface is made for it.
pub trait PresentationTarget<I: InstanceDriver> {
    fn required_extensions(&self) -> Vec<vk::ExtensionName>;

    fn create_surface(&self, instance: &I) -> VkResult<vk::SurfaceKHR>;

    /// Drawable size in pixels, which may differ from the logical window
    /// size on high-DPI displays.
    fn framebuffer_size(&self) -> (u32, u32);
}
