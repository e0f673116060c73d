//! Vulkan context bootstrap: instance, surface, physical device selection,
//! logical device and queues.

mod config;
mod constants;
mod context;
mod device;
mod driver;
mod error;
mod extensions;
mod instance;
mod native;
mod queue_family;
mod swapchain;
#[cfg(test)]
mod testing;

pub use config::{ContextConfig, DeviceSelection};
pub use context::VulkanContext;
pub use device::{
    pick_physical_device, DeviceRequirements, Queues, SelectedDevice, SuitabilityError,
    VulkanDevice,
};
pub use driver::{
    DeviceDriver, DeviceRequest, InstanceDriver, InstanceRequest, Loader, PresentationTarget,
    QueueRequest,
};
pub use error::{ContextError, DriverCall, DriverFailure, EnumerationError, PlatformError};
pub use extensions::{Diagnostics, ExtensionNegotiator};
pub use instance::VulkanInstance;
pub use queue_family::{QueueFamilyIndices, QueueRole};
pub use swapchain::SwapchainSupport;
