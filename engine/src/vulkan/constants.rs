use vulkanalia::{vk, Version};

pub const PORTABILITY_MACOS_VERSION: Version = Version::new(1, 3, 216);
pub const VALIDATION_ENABLED: bool = cfg!(debug_assertions);
pub const VALIDATION_LAYER: vk::ExtensionName =
    vk::ExtensionName::from_bytes(b"VK_LAYER_KHRONOS_validation");

pub const APPLICATION_NAME: &str = "Alaska Engine";
pub const ENGINE_NAME: &str = "Alaska";

/// Priority given to every queue the logical device creates.
pub const QUEUE_PRIORITY: f32 = 1.0;
