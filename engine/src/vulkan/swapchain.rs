use vulkanalia::{vk, VkResult};

use super::driver::InstanceDriver;

/// What a (physical device, surface) pair can present with. Swapchain
/// construction itself happens downstream.
#[derive(Clone, Debug)]
pub struct SwapchainSupport {
    pub capabilities: vk::SurfaceCapabilitiesKHR,
    pub formats: Vec<vk::SurfaceFormatKHR>,
    pub present_modes: Vec<vk::PresentModeKHR>,
}

impl SwapchainSupport {
    /// Empty format or present mode lists are a valid answer for a device
    /// that cannot present to `surface`.
    pub fn query<I: InstanceDriver>(
        instance: &I,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> VkResult<Self> {
        Ok(Self {
            capabilities: instance.surface_capabilities(physical_device, surface)?,
            formats: instance.surface_formats(physical_device, surface)?,
            present_modes: instance.surface_present_modes(physical_device, surface)?,
        })
    }

    pub fn is_adequate(&self) -> bool {
        !self.formats.is_empty() && !self.present_modes.is_empty()
    }

    /// The surface's current extent, or the framebuffer size clamped to the
    /// supported range when the surface reports `u32::MAX`.
    pub fn extent(&self, framebuffer_size: (u32, u32)) -> vk::Extent2D {
        let capabilities = &self.capabilities;
        if capabilities.current_extent.width != u32::MAX {
            return capabilities.current_extent;
        }

        let (width, height) = framebuffer_size;
        vk::Extent2D {
            width: width.clamp(
                capabilities.min_image_extent.width,
                capabilities.max_image_extent.width,
            ),
            height: height.clamp(
                capabilities.min_image_extent.height,
                capabilities.max_image_extent.height,
            ),
        }
    }
}
