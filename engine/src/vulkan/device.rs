use std::collections::HashSet;

use log::*;
use thiserror::Error;
use vulkanalia::vk;

use super::config::DeviceSelection;
use super::constants;
use super::driver::{DeviceDriver, DeviceRequest, InstanceDriver, QueueRequest};
use super::error::{ContextError, DriverCall, EnumerationError};
use super::queue_family::{QueueFamilyIndices, QueueRole};
use super::swapchain::SwapchainSupport;

/// Why a physical device was skipped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SuitabilityError {
    #[error("Missing required queue families ({0:?}).")]
    QueueFamilies(QueueFamilyIndices),
    #[error("Missing required device extensions ({}).", .0.join(", "))]
    Extensions(Vec<String>),
    #[error("Insufficient swapchain support ({formats} formats, {present_modes} present modes).")]
    Swapchain {
        formats: usize,
        present_modes: usize,
    },
    #[error("Failed to query device: {0}.")]
    Query(vk::ErrorCode),
}

/// What a physical device must offer to be used.
#[derive(Clone, Debug)]
pub struct DeviceRequirements {
    extensions: Vec<vk::ExtensionName>,
}

impl DeviceRequirements {
    pub fn new(extensions: &[vk::ExtensionName]) -> Self {
        Self {
            extensions: extensions.to_vec(),
        }
    }

    /// Queue families, then device extensions, then swapchain support. The
    /// surface is only queried once the extensions are known to be there.
    pub fn check<I: InstanceDriver>(
        &self,
        instance: &I,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> Result<(), SuitabilityError> {
        let indices = QueueFamilyIndices::find(instance, physical_device, surface);
        if !indices.is_complete() {
            return Err(SuitabilityError::QueueFamilies(indices));
        }

        self.check_extensions(instance, physical_device)?;

        let support = SwapchainSupport::query(instance, physical_device, surface)
            .map_err(SuitabilityError::Query)?;
        if !support.is_adequate() {
            return Err(SuitabilityError::Swapchain {
                formats: support.formats.len(),
                present_modes: support.present_modes.len(),
            });
        }

        Ok(())
    }

    pub fn is_suitable<I: InstanceDriver>(
        &self,
        instance: &I,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> bool {
        self.check(instance, physical_device, surface).is_ok()
    }

    fn check_extensions<I: InstanceDriver>(
        &self,
        instance: &I,
        physical_device: vk::PhysicalDevice,
    ) -> Result<(), SuitabilityError> {
        let available = instance
            .device_extension_names(physical_device)
            .map_err(SuitabilityError::Query)?
            .into_iter()
            .collect::<HashSet<_>>();

        let missing = self
            .extensions
            .iter()
            .filter(|e| !available.contains(*e))
            .map(|e| e.to_string())
            .collect::<Vec<_>>();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SuitabilityError::Extensions(missing))
        }
    }
}

/// The physical device the context runs on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedDevice {
    pub handle: vk::PhysicalDevice,
    pub name: String,
    pub device_type: vk::PhysicalDeviceType,
}

fn device_type_rank(device_type: vk::PhysicalDeviceType) -> u32 {
    match device_type {
        vk::PhysicalDeviceType::DISCRETE_GPU => 3,
        vk::PhysicalDeviceType::INTEGRATED_GPU => 2,
        vk::PhysicalDeviceType::VIRTUAL_GPU => 1,
        _ => 0,
    }
}

pub fn pick_physical_device<I: InstanceDriver>(
    instance: &I,
    surface: vk::SurfaceKHR,
    requirements: &DeviceRequirements,
    selection: DeviceSelection,
) -> Result<SelectedDevice, ContextError> {
    let physical_devices = instance
        .enumerate_physical_devices()
        .map_err(|e| ContextError::driver(DriverCall::EnumeratePhysicalDevices, e))?;

    if physical_devices.is_empty() {
        return Err(EnumerationError::NoDevices.into());
    }

    let mut best: Option<SelectedDevice> = None;
    for physical_device in physical_devices {
        let name = instance.device_name(physical_device);

        if let Err(error) = requirements.check(instance, physical_device, surface) {
            warn!("Skipping physical device (`{}`): {}", name, error);
            continue;
        }

        let candidate = SelectedDevice {
            handle: physical_device,
            name,
            device_type: instance.device_type(physical_device),
        };

        match selection {
            DeviceSelection::FirstSuitable => {
                best = Some(candidate);
                break;
            }
            DeviceSelection::PreferDiscrete => {
                let better = best.as_ref().map_or(true, |b| {
                    device_type_rank(candidate.device_type) > device_type_rank(b.device_type)
                });
                if better {
                    best = Some(candidate);
                }
            }
        }
    }

    let selected = best.ok_or(EnumerationError::NoSuitableDevice)?;
    info!(
        "Selected physical device (`{}`, {:?}).",
        selected.name, selected.device_type
    );
    Ok(selected)
}

/// Queue handles of the logical device, one per role. Roles sharing a family
/// share the single queue created for it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Queues {
    pub graphics: vk::Queue,
    pub compute: vk::Queue,
    pub present: vk::Queue,
}

impl Queues {
    pub fn get(&self, role: QueueRole) -> vk::Queue {
        match role {
            QueueRole::Graphics => self.graphics,
            QueueRole::Compute => self.compute,
            QueueRole::Present => self.present,
        }
    }
}

impl DeviceRequest {
    /// One queue request per distinct family, each a single queue.
    pub fn new(
        indices: &QueueFamilyIndices,
        layers: Vec<vk::ExtensionName>,
        extensions: Vec<vk::ExtensionName>,
    ) -> DeviceRequest {
        let queues = indices
            .unique()
            .into_iter()
            .map(|family| QueueRequest {
                family,
                priority: constants::QUEUE_PRIORITY,
            })
            .collect();

        DeviceRequest {
            queues,
            layers,
            extensions,
        }
    }
}

/// Owns a logical device and releases it on drop.
#[derive(Debug)]
pub struct VulkanDevice<D: DeviceDriver> {
    vk_device: D,
}

impl<D: DeviceDriver> VulkanDevice<D> {
    pub fn new<I: InstanceDriver<Device = D>>(
        instance: &I,
        physical_device: vk::PhysicalDevice,
        request: &DeviceRequest,
    ) -> Result<Self, ContextError> {
        let vk_device = instance
            .create_device(physical_device, request)
            .map_err(|e| ContextError::driver(DriverCall::CreateDevice, e))?;

        Ok(Self { vk_device })
    }

    /// Queue 0 of each role's own family.
    pub fn queues(&self, indices: &QueueFamilyIndices) -> Result<Queues, ContextError> {
        let family = |role| {
            indices
                .get(role)
                .ok_or(ContextError::IncompleteQueueFamilies(*indices))
        };

        Ok(Queues {
            graphics: self.vk_device.queue(family(QueueRole::Graphics)?, 0),
            compute: self.vk_device.queue(family(QueueRole::Compute)?, 0),
            present: self.vk_device.queue(family(QueueRole::Present)?, 0),
        })
    }

    pub fn raw(&self) -> &D {
        &self.vk_device
    }
}

impl<D: DeviceDriver> Drop for VulkanDevice<D> {
    fn drop(&mut self) {
        debug!("Destroying logical device.");
        self.vk_device.destroy_device();
    }
}
