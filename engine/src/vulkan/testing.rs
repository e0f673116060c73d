//! A recording fake of the driver traits for unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use vulkanalia::vk::{self, Handle};
use vulkanalia::{Version, VkResult};

use super::driver::{
    DeviceDriver, DeviceRequest, InstanceDriver, InstanceRequest, Loader, PresentationTarget,
};
use super::error::DriverCall;

pub const SURFACE_EXTENSION: vk::ExtensionName = vk::KHR_SURFACE_EXTENSION.name;
pub const SWAPCHAIN: vk::ExtensionName = vk::KHR_SWAPCHAIN_EXTENSION.name;

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    EnumerateLayers,
    EnumerateInstanceExtensions,
    CreateInstance(InstanceRequest),
    CreateDebugMessenger,
    CreateSurface,
    EnumeratePhysicalDevices,
    QueueFamilies(usize),
    SurfaceSupport(usize, u32),
    DeviceExtensions(usize),
    SurfaceCapabilities(usize),
    SurfaceFormats(usize),
    SurfacePresentModes(usize),
    CreateDevice(usize, DeviceRequest),
    DestroyDevice,
    DestroySurface,
    DestroyDebugMessenger,
    DestroyInstance,
}

#[derive(Clone, Debug, Default)]
pub struct CallLog(Rc<RefCell<Vec<Call>>>);

impl CallLog {
    fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.0.borrow().iter().filter(|c| predicate(c)).count()
    }

    /// Release calls in the order they happened.
    pub fn releases(&self) -> Vec<Call> {
        self.0
            .borrow()
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    Call::DestroyDevice
                        | Call::DestroySurface
                        | Call::DestroyDebugMessenger
                        | Call::DestroyInstance
                )
            })
            .cloned()
            .collect()
    }

    pub fn device_requests(&self) -> Vec<DeviceRequest> {
        self.0
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::CreateDevice(_, request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn instance_requests(&self) -> Vec<InstanceRequest> {
        self.0
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::CreateInstance(request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Copy, Clone, Debug)]
pub struct FakeFamily {
    pub flags: vk::QueueFlags,
    pub count: u32,
    pub present: bool,
}

#[derive(Clone, Debug)]
pub struct FakeGpu {
    pub name: String,
    pub device_type: vk::PhysicalDeviceType,
    pub families: Vec<FakeFamily>,
    pub extensions: Vec<vk::ExtensionName>,
    pub formats: Vec<vk::SurfaceFormatKHR>,
    pub present_modes: Vec<vk::PresentModeKHR>,
    pub extension_failure: Option<vk::ErrorCode>,
    pub format_failure: Option<vk::ErrorCode>,
}

impl FakeGpu {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            device_type: vk::PhysicalDeviceType::INTEGRATED_GPU,
            families: Vec::new(),
            extensions: Vec::new(),
            formats: Vec::new(),
            present_modes: Vec::new(),
            extension_failure: None,
            format_failure: None,
        }
    }

    /// One family doing graphics, compute and present, the swapchain
    /// extension, two formats and two present modes.
    pub fn complete(name: &str) -> Self {
        Self::new(name)
            .family(vk::QueueFlags::GRAPHICS | vk::QueueFlags::COMPUTE, 1, true)
            .extension(SWAPCHAIN)
            .formats(2)
            .present_modes(2)
    }

    pub fn device_type(mut self, device_type: vk::PhysicalDeviceType) -> Self {
        self.device_type = device_type;
        self
    }

    pub fn family(mut self, flags: vk::QueueFlags, count: u32, present: bool) -> Self {
        self.families.push(FakeFamily {
            flags,
            count,
            present,
        });
        self
    }

    pub fn extension(mut self, name: vk::ExtensionName) -> Self {
        self.extensions.push(name);
        self
    }

    pub fn formats(mut self, count: usize) -> Self {
        let formats = [vk::Format::B8G8R8A8_SRGB, vk::Format::R8G8B8A8_UNORM];
        self.formats = formats
            .iter()
            .cycle()
            .take(count)
            .map(|&format| vk::SurfaceFormatKHR {
                format,
                color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
            })
            .collect();
        self
    }

    pub fn failing_extension_query(mut self) -> Self {
        self.extension_failure = Some(vk::ErrorCode::OUT_OF_HOST_MEMORY);
        self
    }

    pub fn failing_format_query(mut self) -> Self {
        self.format_failure = Some(vk::ErrorCode::SURFACE_LOST_KHR);
        self
    }

    pub fn present_modes(mut self, count: usize) -> Self {
        let modes = [vk::PresentModeKHR::FIFO, vk::PresentModeKHR::MAILBOX];
        self.present_modes = modes.iter().cycle().take(count).copied().collect();
        self
    }
}

pub fn physical_device(index: usize) -> vk::PhysicalDevice {
    vk::PhysicalDevice::from_raw((index + 1) as _)
}

fn gpu_index(physical_device: vk::PhysicalDevice) -> usize {
    physical_device.as_raw() as usize - 1
}

/// Splits a fake queue handle back into (family, queue index).
pub fn queue_location(queue: vk::Queue) -> (u32, u32) {
    let raw = queue.as_raw() as u64;
    (((raw >> 8) - 1) as u32, (raw & 0xff) as u32)
}

pub fn surface() -> vk::SurfaceKHR {
    vk::SurfaceKHR::from_raw(0x5)
}

#[derive(Clone, Debug, Default)]
pub struct FakeLoader {
    pub layers: Vec<vk::ExtensionName>,
    pub instance_extensions: Vec<vk::ExtensionName>,
    pub gpus: Vec<FakeGpu>,
    pub failures: Vec<(DriverCall, vk::ErrorCode)>,
    pub log: CallLog,
}

impl FakeLoader {
    pub fn new(gpus: Vec<FakeGpu>) -> Self {
        Self {
            layers: Vec::new(),
            instance_extensions: vec![SURFACE_EXTENSION, vk::EXT_DEBUG_UTILS_EXTENSION.name],
            gpus,
            failures: Vec::new(),
            log: CallLog::default(),
        }
    }

    pub fn layer(mut self, name: vk::ExtensionName) -> Self {
        self.layers.push(name);
        self
    }

    pub fn failing(mut self, call: DriverCall) -> Self {
        self.failures
            .push((call, vk::ErrorCode::INITIALIZATION_FAILED));
        self
    }

    pub fn instance(&self) -> FakeInstance {
        FakeInstance {
            gpus: self.gpus.clone(),
            failures: self.failures.clone(),
            log: self.log.clone(),
        }
    }
}

fn check(failures: &[(DriverCall, vk::ErrorCode)], call: DriverCall) -> VkResult<()> {
    match failures.iter().find(|(c, _)| *c == call) {
        Some((_, code)) => Err(*code),
        None => Ok(()),
    }
}

impl Loader for FakeLoader {
    type Instance = FakeInstance;

    fn version(&self) -> VkResult<Version> {
        Ok(Version::new(1, 2, 0))
    }

    fn layer_names(&self) -> VkResult<Vec<vk::ExtensionName>> {
        self.log.push(Call::EnumerateLayers);
        check(&self.failures, DriverCall::EnumerateLayers)?;
        Ok(self.layers.clone())
    }

    fn instance_extension_names(&self) -> VkResult<Vec<vk::ExtensionName>> {
        self.log.push(Call::EnumerateInstanceExtensions);
        Ok(self.instance_extensions.clone())
    }

    fn create_instance(&self, request: &InstanceRequest) -> VkResult<FakeInstance> {
        self.log.push(Call::CreateInstance(request.clone()));
        check(&self.failures, DriverCall::CreateInstance)?;
        Ok(self.instance())
    }
}

#[derive(Clone, Debug)]
pub struct FakeInstance {
    gpus: Vec<FakeGpu>,
    failures: Vec<(DriverCall, vk::ErrorCode)>,
    pub log: CallLog,
}

impl FakeInstance {
    fn gpu(&self, physical_device: vk::PhysicalDevice) -> &FakeGpu {
        &self.gpus[gpu_index(physical_device)]
    }
}

impl InstanceDriver for FakeInstance {
    type Device = FakeDevice;

    fn enumerate_physical_devices(&self) -> VkResult<Vec<vk::PhysicalDevice>> {
        self.log.push(Call::EnumeratePhysicalDevices);
        check(&self.failures, DriverCall::EnumeratePhysicalDevices)?;
        Ok((0..self.gpus.len()).map(physical_device).collect())
    }

    fn device_name(&self, physical_device: vk::PhysicalDevice) -> String {
        self.gpu(physical_device).name.clone()
    }

    fn device_type(&self, physical_device: vk::PhysicalDevice) -> vk::PhysicalDeviceType {
        self.gpu(physical_device).device_type
    }

    fn queue_family_properties(
        &self,
        physical_device: vk::PhysicalDevice,
    ) -> Vec<vk::QueueFamilyProperties> {
        self.log.push(Call::QueueFamilies(gpu_index(physical_device)));
        self.gpu(physical_device)
            .families
            .iter()
            .map(|f| vk::QueueFamilyProperties {
                queue_flags: f.flags,
                queue_count: f.count,
                ..Default::default()
            })
            .collect()
    }

    fn surface_support(
        &self,
        physical_device: vk::PhysicalDevice,
        family: u32,
        _surface: vk::SurfaceKHR,
    ) -> VkResult<bool> {
        self.log
            .push(Call::SurfaceSupport(gpu_index(physical_device), family));
        check(&self.failures, DriverCall::QuerySurfaceSupport)?;
        Ok(self.gpu(physical_device).families[family as usize].present)
    }

    fn device_extension_names(
        &self,
        physical_device: vk::PhysicalDevice,
    ) -> VkResult<Vec<vk::ExtensionName>> {
        self.log.push(Call::DeviceExtensions(gpu_index(physical_device)));
        let gpu = self.gpu(physical_device);
        match gpu.extension_failure {
            Some(code) => Err(code),
            None => Ok(gpu.extensions.clone()),
        }
    }

    fn surface_capabilities(
        &self,
        physical_device: vk::PhysicalDevice,
        _surface: vk::SurfaceKHR,
    ) -> VkResult<vk::SurfaceCapabilitiesKHR> {
        self.log
            .push(Call::SurfaceCapabilities(gpu_index(physical_device)));
        // The surface leaves the extent to the swapchain.
        Ok(vk::SurfaceCapabilitiesKHR {
            min_image_count: 2,
            max_image_count: 8,
            current_extent: vk::Extent2D {
                width: u32::MAX,
                height: u32::MAX,
            },
            min_image_extent: vk::Extent2D {
                width: 1,
                height: 1,
            },
            max_image_extent: vk::Extent2D {
                width: 4096,
                height: 4096,
            },
            ..Default::default()
        })
    }

    fn surface_formats(
        &self,
        physical_device: vk::PhysicalDevice,
        _surface: vk::SurfaceKHR,
    ) -> VkResult<Vec<vk::SurfaceFormatKHR>> {
        self.log.push(Call::SurfaceFormats(gpu_index(physical_device)));
        let gpu = self.gpu(physical_device);
        match gpu.format_failure {
            Some(code) => Err(code),
            None => Ok(gpu.formats.clone()),
        }
    }

    fn surface_present_modes(
        &self,
        physical_device: vk::PhysicalDevice,
        _surface: vk::SurfaceKHR,
    ) -> VkResult<Vec<vk::PresentModeKHR>> {
        self.log
            .push(Call::SurfacePresentModes(gpu_index(physical_device)));
        Ok(self.gpu(physical_device).present_modes.clone())
    }

    fn create_debug_messenger(&self) -> VkResult<vk::DebugUtilsMessengerEXT> {
        self.log.push(Call::CreateDebugMessenger);
        check(&self.failures, DriverCall::CreateDebugMessenger)?;
        Ok(vk::DebugUtilsMessengerEXT::from_raw(0x7))
    }

    fn create_device(
        &self,
        physical_device: vk::PhysicalDevice,
        request: &DeviceRequest,
    ) -> VkResult<FakeDevice> {
        self.log
            .push(Call::CreateDevice(gpu_index(physical_device), request.clone()));
        check(&self.failures, DriverCall::CreateDevice)?;
        Ok(FakeDevice {
            log: self.log.clone(),
        })
    }

    fn destroy_debug_messenger(&self, _messenger: vk::DebugUtilsMessengerEXT) {
        self.log.push(Call::DestroyDebugMessenger);
    }

    fn destroy_surface(&self, _surface: vk::SurfaceKHR) {
        self.log.push(Call::DestroySurface);
    }

    fn destroy_instance(&self) {
        self.log.push(Call::DestroyInstance);
    }
}

#[derive(Debug)]
pub struct FakeDevice {
    log: CallLog,
}

impl DeviceDriver for FakeDevice {
    fn queue(&self, family: u32, index: u32) -> vk::Queue {
        vk::Queue::from_raw((((family as u64 + 1) << 8) | index as u64) as _)
    }

    fn destroy_device(&self) {
        self.log.push(Call::DestroyDevice);
    }
}

#[derive(Clone, Debug)]
pub struct FakeWindow {
    pub extensions: Vec<vk::ExtensionName>,
    pub failure: Option<vk::ErrorCode>,
    pub size: (u32, u32),
}

impl Default for FakeWindow {
    fn default() -> Self {
        Self {
            extensions: vec![SURFACE_EXTENSION],
            failure: None,
            size: (1024, 768),
        }
    }
}

impl PresentationTarget<FakeInstance> for FakeWindow {
    fn required_extensions(&self) -> Vec<vk::ExtensionName> {
        self.extensions.clone()
    }

    fn create_surface(&self, instance: &FakeInstance) -> VkResult<vk::SurfaceKHR> {
        instance.log.push(Call::CreateSurface);
        match self.failure {
            Some(code) => Err(code),
            None => Ok(surface()),
        }
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        self.size
    }
}
