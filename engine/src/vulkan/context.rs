use log::*;
use vulkanalia::loader::{LibloadingLoader, LIBRARY};
use vulkanalia::{vk, Entry};
use winit::window::Window;

use super::config::ContextConfig;
use super::device::{pick_physical_device, DeviceRequirements, Queues, SelectedDevice, VulkanDevice};
use super::driver::{DeviceRequest, InstanceDriver, Loader, PresentationTarget};
use super::error::{ContextError, DriverCall, PlatformError};
use super::extensions::ExtensionNegotiator;
use super::instance::VulkanInstance;
use super::queue_family::{QueueFamilyIndices, QueueRole};
use super::swapchain::SwapchainSupport;

type DeviceOf<L> = <<L as Loader>::Instance as InstanceDriver>::Device;

/// The instance, surface, logical device and queues a renderer runs on.
///
/// Built once per window. Fields drop in declaration order: the logical
/// device goes first, then the surface, messenger and instance, and the
/// loader last.
pub struct VulkanContext<L: Loader = Entry> {
    device: VulkanDevice<DeviceOf<L>>,
    queues: Queues,
    queue_family_indices: QueueFamilyIndices,
    physical_device: SelectedDevice,
    instance: VulkanInstance<L::Instance>,
    loader: L,
}

impl VulkanContext {
    /// Loads the system Vulkan library and builds a context for `window`.
    pub fn create(window: &Window, config: ContextConfig) -> Result<Self, ContextError> {
        let loader = unsafe { LibloadingLoader::new(LIBRARY) }
            .map_err(|e| PlatformError::Loader(e.to_string()))?;
        let entry =
            unsafe { Entry::new(loader) }.map_err(|e| PlatformError::Loader(e.to_string()))?;

        Self::new(entry, window, config)
    }
}

impl<L: Loader> VulkanContext<L> {
    /// Runs the whole bootstrap. Whatever was created before a failing step
    /// is released, in reverse order, before the error is returned.
    pub fn new<W>(loader: L, window: &W, config: ContextConfig) -> Result<Self, ContextError>
    where
        W: PresentationTarget<L::Instance> + ?Sized,
    {
        let negotiator = ExtensionNegotiator::new(&config);

        let mut instance = VulkanInstance::new(
            &loader,
            &negotiator,
            &config,
            &window.required_extensions(),
        )?;
        instance.setup_diagnostics()?;
        let surface = instance.create_surface(window)?;

        let requirements = DeviceRequirements::new(negotiator.device_extensions());
        let physical_device = pick_physical_device(
            instance.raw(),
            surface,
            &requirements,
            config.device_selection,
        )?;

        // Indices belong to the chosen device; never reuse a candidate's.
        let queue_family_indices =
            QueueFamilyIndices::find(instance.raw(), physical_device.handle, surface);
        if !queue_family_indices.is_complete() {
            return Err(ContextError::IncompleteQueueFamilies(queue_family_indices));
        }
        debug!("Queue family indices: {:?}", queue_family_indices);

        let request = DeviceRequest::new(
            &queue_family_indices,
            negotiator.layers(),
            negotiator.enabled_device_extensions(instance.portability()),
        );
        let device = VulkanDevice::new(instance.raw(), physical_device.handle, &request)?;
        let queues = device.queues(&queue_family_indices)?;

        info!("GPU context ready on `{}`.", physical_device.name);

        Ok(Self {
            device,
            queues,
            queue_family_indices,
            physical_device,
            instance,
            loader,
        })
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn instance(&self) -> &L::Instance {
        self.instance.raw()
    }

    pub fn device(&self) -> &DeviceOf<L> {
        self.device.raw()
    }

    /// For memory type and format queries made after bootstrap.
    pub fn physical_device(&self) -> vk::PhysicalDevice {
        self.physical_device.handle
    }

    pub fn device_name(&self) -> &str {
        &self.physical_device.name
    }

    pub fn surface(&self) -> vk::SurfaceKHR {
        self.instance.surface()
    }

    pub fn queue(&self, role: QueueRole) -> vk::Queue {
        self.queues.get(role)
    }

    pub fn queues(&self) -> &Queues {
        &self.queues
    }

    pub fn queue_family_indices(&self) -> &QueueFamilyIndices {
        &self.queue_family_indices
    }

    pub fn diagnostics_enabled(&self) -> bool {
        self.instance.diagnostics_enabled()
    }

    /// Current swapchain support of the selected device for the context's
    /// surface.
    pub fn swapchain_support(&self) -> Result<SwapchainSupport, ContextError> {
        SwapchainSupport::query(self.instance(), self.physical_device(), self.surface())
            .map_err(|e| ContextError::driver(DriverCall::QuerySurfaceSupport, e))
    }

    /// Extent a swapchain for `window` should use right now.
    pub fn swapchain_extent<W>(&self, window: &W) -> Result<vk::Extent2D, ContextError>
    where
        W: PresentationTarget<L::Instance> + ?Sized,
    {
        Ok(self.swapchain_support()?.extent(window.framebuffer_size()))
    }
}
