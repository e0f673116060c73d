use std::ffi::{CStr, CString};
use std::os::raw::c_void;

use log::*;
use vulkanalia::prelude::v1_0::*;
use vulkanalia::vk::{ExtDebugUtilsExtension, KhrSurfaceExtension};
use vulkanalia::window as vk_window;
use vulkanalia::{Version, VkResult};
use winit::window::Window;

use super::driver::{
    DeviceDriver, DeviceRequest, InstanceDriver, InstanceRequest, Loader, PresentationTarget,
};

// Every handle passed into these calls was obtained from the same entry,
// instance or device, which is what the unsafe vulkanalia calls require.

impl Loader for Entry {
    type Instance = Instance;

    fn version(&self) -> VkResult<Version> {
        Entry::version(self)
    }

    fn layer_names(&self) -> VkResult<Vec<vk::ExtensionName>> {
        let layers = unsafe { self.enumerate_instance_layer_properties() }?;
        Ok(layers.iter().map(|l| l.layer_name).collect())
    }

    fn instance_extension_names(&self) -> VkResult<Vec<vk::ExtensionName>> {
        let extensions = unsafe { self.enumerate_instance_extension_properties(None) }?;
        Ok(extensions.iter().map(|e| e.extension_name).collect())
    }

    fn create_instance(&self, request: &InstanceRequest) -> VkResult<Instance> {
        // Names with interior NULs are sent empty.
        let application_name = CString::new(request.application_name.as_str()).unwrap_or_default();
        let engine_name = CString::new(request.engine_name.as_str()).unwrap_or_default();

        // Application Info
        let application_info = vk::ApplicationInfo::builder()
            .application_name(application_name.as_bytes_with_nul())
            .application_version(request.application_version)
            .engine_name(engine_name.as_bytes_with_nul())
            .engine_version(request.engine_version)
            .api_version(request.api_version);

        let layers = request.layers.iter().map(|l| l.as_ptr()).collect::<Vec<_>>();
        let extensions = request
            .extensions
            .iter()
            .map(|e| e.as_ptr())
            .collect::<Vec<_>>();

        // Create
        let mut info = vk::InstanceCreateInfo::builder()
            .application_info(&application_info)
            .enabled_layer_names(&layers)
            .enabled_extension_names(&extensions)
            .flags(request.flags);

        let mut debug_info = debug_messenger_info();
        if request.diagnostics {
            info = info.push_next(&mut debug_info);
        }

        unsafe { Entry::create_instance(self, &info, None) }
    }
}

fn debug_messenger_info() -> vk::DebugUtilsMessengerCreateInfoEXTBuilder<'static> {
    vk::DebugUtilsMessengerCreateInfoEXT::builder()
        .message_severity(vk::DebugUtilsMessageSeverityFlagsEXT::all())
        .message_type(
            vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
        )
        .user_callback(Some(debug_callback))
}

impl InstanceDriver for Instance {
    type Device = Device;

    fn enumerate_physical_devices(&self) -> VkResult<Vec<vk::PhysicalDevice>> {
        unsafe { InstanceV1_0::enumerate_physical_devices(self) }
    }

    fn device_name(&self, physical_device: vk::PhysicalDevice) -> String {
        let properties = unsafe { self.get_physical_device_properties(physical_device) };
        properties.device_name.to_string()
    }

    fn device_type(&self, physical_device: vk::PhysicalDevice) -> vk::PhysicalDeviceType {
        unsafe { self.get_physical_device_properties(physical_device) }.device_type
    }

    fn queue_family_properties(
        &self,
        physical_device: vk::PhysicalDevice,
    ) -> Vec<vk::QueueFamilyProperties> {
        unsafe { self.get_physical_device_queue_family_properties(physical_device) }
    }

    fn surface_support(
        &self,
        physical_device: vk::PhysicalDevice,
        family: u32,
        surface: vk::SurfaceKHR,
    ) -> VkResult<bool> {
        unsafe { self.get_physical_device_surface_support_khr(physical_device, family, surface) }
    }

    fn device_extension_names(
        &self,
        physical_device: vk::PhysicalDevice,
    ) -> VkResult<Vec<vk::ExtensionName>> {
        let extensions =
            unsafe { self.enumerate_device_extension_properties(physical_device, None) }?;
        Ok(extensions.iter().map(|e| e.extension_name).collect())
    }

    fn surface_capabilities(
        &self,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> VkResult<vk::SurfaceCapabilitiesKHR> {
        unsafe { self.get_physical_device_surface_capabilities_khr(physical_device, surface) }
    }

    fn surface_formats(
        &self,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> VkResult<Vec<vk::SurfaceFormatKHR>> {
        unsafe { self.get_physical_device_surface_formats_khr(physical_device, surface) }
    }

    fn surface_present_modes(
        &self,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> VkResult<Vec<vk::PresentModeKHR>> {
        unsafe { self.get_physical_device_surface_present_modes_khr(physical_device, surface) }
    }

    fn create_debug_messenger(&self) -> VkResult<vk::DebugUtilsMessengerEXT> {
        let info = debug_messenger_info();
        unsafe { self.create_debug_utils_messenger_ext(&info, None) }
    }

    fn create_device(
        &self,
        physical_device: vk::PhysicalDevice,
        request: &DeviceRequest,
    ) -> VkResult<Device> {
        let priorities = request
            .queues
            .iter()
            .map(|q| [q.priority])
            .collect::<Vec<_>>();
        let queue_infos = request
            .queues
            .iter()
            .zip(&priorities)
            .map(|(q, priority)| {
                vk::DeviceQueueCreateInfo::builder()
                    .queue_family_index(q.family)
                    .queue_priorities(priority)
            })
            .collect::<Vec<_>>();

        let layers = request.layers.iter().map(|l| l.as_ptr()).collect::<Vec<_>>();
        let extensions = request
            .extensions
            .iter()
            .map(|e| e.as_ptr())
            .collect::<Vec<_>>();

        let features = vk::PhysicalDeviceFeatures::builder();

        let info = vk::DeviceCreateInfo::builder()
            .queue_create_infos(&queue_infos)
            .enabled_layer_names(&layers)
            .enabled_extension_names(&extensions)
            .enabled_features(&features);

        unsafe { Instance::create_device(self, physical_device, &info, None) }
    }

    fn destroy_debug_messenger(&self, messenger: vk::DebugUtilsMessengerEXT) {
        unsafe { self.destroy_debug_utils_messenger_ext(messenger, None) }
    }

    fn destroy_surface(&self, surface: vk::SurfaceKHR) {
        unsafe { self.destroy_surface_khr(surface, None) }
    }

    fn destroy_instance(&self) {
        unsafe { InstanceV1_0::destroy_instance(self, None) }
    }
}

impl DeviceDriver for Device {
    fn queue(&self, family: u32, index: u32) -> vk::Queue {
        unsafe { self.get_device_queue(family, index) }
    }

    fn destroy_device(&self) {
        unsafe { DeviceV1_0::destroy_device(self, None) }
    }
}

impl PresentationTarget<Instance> for Window {
    fn required_extensions(&self) -> Vec<vk::ExtensionName> {
        vk_window::get_required_instance_extensions(self)
            .iter()
            .map(|e| **e)
            .collect()
    }

    fn create_surface(&self, instance: &Instance) -> VkResult<vk::SurfaceKHR> {
        unsafe { vk_window::create_surface(instance, self, self) }
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        let size = self.inner_size();
        (size.width, size.height)
    }
}

extern "system" fn debug_callback(
    severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    type_: vk::DebugUtilsMessageTypeFlagsEXT,
    data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _: *mut c_void,
) -> vk::Bool32 {
    let data = unsafe { *data };
    let message = unsafe { CStr::from_ptr(data.message) }.to_string_lossy();

    if severity >= vk::DebugUtilsMessageSeverityFlagsEXT::ERROR {
        error!("({:?}) {}", type_, message);
    } else if severity >= vk::DebugUtilsMessageSeverityFlagsEXT::WARNING {
        warn!("({:?}) {}", type_, message);
    } else if severity >= vk::DebugUtilsMessageSeverityFlagsEXT::INFO {
        debug!("({:?}) {}", type_, message);
    } else {
        trace!("({:?}) {}", type_, message);
    }

    vk::FALSE
}
