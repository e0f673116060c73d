use std::collections::BTreeSet;

use log::*;
use vulkanalia::vk;

use super::driver::InstanceDriver;

/// What a queue is used for. A single family may serve several roles.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum QueueRole {
    Graphics,
    Compute,
    Present,
}

impl QueueRole {
    pub const ALL: [QueueRole; 3] = [QueueRole::Graphics, QueueRole::Compute, QueueRole::Present];
}

/// Queue family indices of one physical device, resolved per role.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct QueueFamilyIndices {
    pub graphics: Option<u32>,
    pub compute: Option<u32>,
    pub present: Option<u32>,
}

impl QueueFamilyIndices {
    /// Scans the family table in order. For each role the lowest-indexed
    /// family that qualifies wins; families without queues never qualify.
    pub fn find<I: InstanceDriver>(
        instance: &I,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> Self {
        let mut indices = Self::default();
        let properties = instance.queue_family_properties(physical_device);

        for (index, family) in properties.iter().enumerate() {
            let index = index as u32;
            if family.queue_count == 0 {
                continue;
            }

            if indices.graphics.is_none() && family.queue_flags.contains(vk::QueueFlags::GRAPHICS) {
                indices.graphics = Some(index);
            }

            if indices.compute.is_none() && family.queue_flags.contains(vk::QueueFlags::COMPUTE) {
                indices.compute = Some(index);
            }

            if indices.present.is_none() {
                match instance.surface_support(physical_device, index, surface) {
                    Ok(true) => indices.present = Some(index),
                    Ok(false) => {}
                    Err(error) => warn!(
                        "Presentation support query failed for queue family {}: {}",
                        index, error
                    ),
                }
            }

            if indices.is_complete() {
                break;
            }
        }

        indices
    }

    pub fn is_complete(&self) -> bool {
        self.graphics.is_some() && self.compute.is_some() && self.present.is_some()
    }

    pub fn get(&self, role: QueueRole) -> Option<u32> {
        match role {
            QueueRole::Graphics => self.graphics,
            QueueRole::Compute => self.compute,
            QueueRole::Present => self.present,
        }
    }

    /// The distinct family indices among the resolved roles, ascending.
    pub fn unique(&self) -> Vec<u32> {
        [self.graphics, self.present, self.compute]
            .into_iter()
            .flatten()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
