use std::fmt;

use thiserror::Error;
use vulkanalia::vk;

use super::queue_family::QueueFamilyIndices;

/// Everything that can stop a [`VulkanContext`](super::VulkanContext) from
/// being built. None of these are retried.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Validation layers requested, but not available: {}.", .missing.join(", "))]
    Configuration { missing: Vec<String> },

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Enumeration(#[from] EnumerationError),

    #[error("Queue family indices not complete for the selected device ({0:?}).")]
    IncompleteQueueFamilies(QueueFamilyIndices),

    #[error("{call} failed: {failure}.")]
    Driver {
        call: DriverCall,
        failure: DriverFailure,
    },
}

impl ContextError {
    /// Translates a failed driver status into the error for `call`.
    pub fn driver(call: DriverCall, code: vk::ErrorCode) -> Self {
        match (call, code) {
            (
                DriverCall::CreateSurface,
                vk::ErrorCode::SURFACE_LOST_KHR | vk::ErrorCode::NATIVE_WINDOW_IN_USE_KHR,
            ) => PlatformError::SurfaceUnavailable(code).into(),
            (DriverCall::CreateSurface, _) => PlatformError::SurfaceCreation(code).into(),
            _ => ContextError::Driver {
                call,
                failure: code.into(),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Failed to load the Vulkan library: {0}")]
    Loader(String),

    #[error("The window does not expose any Vulkan surface extensions.")]
    NoSurfaceExtensions,

    #[error("The window surface is unavailable: {0}.")]
    SurfaceUnavailable(vk::ErrorCode),

    #[error("Failed to create window surface: {0}.")]
    SurfaceCreation(vk::ErrorCode),
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EnumerationError {
    #[error("Failed to find GPUs with Vulkan support.")]
    NoDevices,

    #[error("Failed to find a suitable GPU.")]
    NoSuitableDevice,
}

/// The driver entry point that reported a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverCall {
    EnumerateLayers,
    EnumerateInstanceExtensions,
    LoaderVersion,
    CreateInstance,
    CreateDebugMessenger,
    CreateSurface,
    EnumeratePhysicalDevices,
    CreateDevice,
    QuerySurfaceSupport,
}

impl fmt::Display for DriverCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DriverCall::EnumerateLayers => "vkEnumerateInstanceLayerProperties",
            DriverCall::EnumerateInstanceExtensions => "vkEnumerateInstanceExtensionProperties",
            DriverCall::LoaderVersion => "vkEnumerateInstanceVersion",
            DriverCall::CreateInstance => "vkCreateInstance",
            DriverCall::CreateDebugMessenger => "vkCreateDebugUtilsMessengerEXT",
            DriverCall::CreateSurface => "surface creation",
            DriverCall::EnumeratePhysicalDevices => "vkEnumeratePhysicalDevices",
            DriverCall::CreateDevice => "vkCreateDevice",
            DriverCall::QuerySurfaceSupport => "surface support query",
        };
        f.write_str(name)
    }
}

/// Driver statuses the bootstrap distinguishes.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DriverFailure {
    #[error("out of host memory")]
    OutOfHostMemory,
    #[error("out of device memory")]
    OutOfDeviceMemory,
    #[error("initialization failed")]
    InitializationFailed,
    #[error("layer not present")]
    LayerNotPresent,
    #[error("extension not present")]
    ExtensionNotPresent,
    #[error("feature not present")]
    FeatureNotPresent,
    #[error("incompatible driver")]
    IncompatibleDriver,
    #[error("too many objects")]
    TooManyObjects,
    #[error("device lost")]
    DeviceLost,
    #[error("{0}")]
    Other(vk::ErrorCode),
}

impl From<vk::ErrorCode> for DriverFailure {
    fn from(code: vk::ErrorCode) -> Self {
        match code {
            vk::ErrorCode::OUT_OF_HOST_MEMORY => DriverFailure::OutOfHostMemory,
            vk::ErrorCode::OUT_OF_DEVICE_MEMORY => DriverFailure::OutOfDeviceMemory,
            vk::ErrorCode::INITIALIZATION_FAILED => DriverFailure::InitializationFailed,
            vk::ErrorCode::LAYER_NOT_PRESENT => DriverFailure::LayerNotPresent,
            vk::ErrorCode::EXTENSION_NOT_PRESENT => DriverFailure::ExtensionNotPresent,
            vk::ErrorCode::FEATURE_NOT_PRESENT => DriverFailure::FeatureNotPresent,
            vk::ErrorCode::INCOMPATIBLE_DRIVER => DriverFailure::IncompatibleDriver,
            vk::ErrorCode::TOO_MANY_OBJECTS => DriverFailure::TooManyObjects,
            vk::ErrorCode::DEVICE_LOST => DriverFailure::DeviceLost,
            other => DriverFailure::Other(other),
        }
    }
}
