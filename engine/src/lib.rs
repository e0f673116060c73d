use anyhow::Result;
use log::*;
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::EventLoop;
use winit::window::{Window, WindowBuilder};

pub mod vulkan;

use vulkan::{ContextConfig, QueueRole, VulkanContext};

/// Hosts a window and the GPU context bootstrapped for it.
pub struct Engine {
    // Dropped before the window it presents to.
    context: VulkanContext,
    window: Window,
    event_loop: EventLoop<()>,
}

impl Engine {
    pub fn new(config: ContextConfig) -> Result<Engine> {
        // Window
        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(config.application_name.as_str())
            .with_inner_size(LogicalSize::new(1024, 768))
            .build(&event_loop)?;

        let context = VulkanContext::create(&window, config)?;

        Ok(Engine {
            context,
            window,
            event_loop,
        })
    }

    pub fn context(&self) -> &VulkanContext {
        &self.context
    }

    pub fn run(self) -> Result<()> {
        let Engine {
            context,
            window,
            event_loop,
        } = self;

        for role in QueueRole::ALL {
            debug!(
                "{:?} queue from family {:?}.",
                role,
                context.queue_family_indices().get(role)
            );
        }
        let extent = context.swapchain_extent(&window)?;
        debug!("Swapchain extent {}x{}.", extent.width, extent.height);

        let mut host = Host::new(context, window);
        event_loop.run(move |event, elwt| {
            if let Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                window_id,
            } = event
            {
                if window_id == host.window.id() {
                    host.release();
                    elwt.exit();
                }
            }
        })?;

        Ok(())
    }
}

/// What the event loop keeps alive. Fields drop in declaration order, so the
/// context is released while the window still exists however the loop ends.
struct Host<C, W> {
    context: Option<C>,
    window: W,
}

impl<C, W> Host<C, W> {
    fn new(context: C, window: W) -> Self {
        Self {
            context: Some(context),
            window,
        }
    }

    fn release(&mut self) {
        self.context.take();
    }
}
