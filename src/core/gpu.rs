use std::sync::Arc;
use wgpu::{Adapter, Device, DeviceDescriptor, Features, Instance, Limits, Queue, Surface};

use crate::error::{Error, Result};

/// Shared GPU context: adapter, device and queue.
///
/// Cheap to clone (Arc) so the device can outlive any one borrower during
/// teardown.
#[derive(Clone)]
pub struct GpuContext {
    adapter: Arc<Adapter>,
    device: Arc<Device>,
    queue: Arc<Queue>,
}

impl GpuContext {
    /// Create a GPU context compatible with the given presentation surface.
    pub async fn new_with_surface(instance: &Instance, surface: &Surface<'_>) -> Result<Self> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| Error::Initialization(format!("no suitable adapter: {e:?}")))?;

        let (device, queue) = Self::request_device(&adapter).await?;

        // Resource-creation failures in wgpu surface here rather than as
        // return values; the demo has no recovery path, so log and move on —
        // the next queue operation will report the device as lost.
        device.on_uncaptured_error(Arc::new(|error| {
            log::error!("uncaptured device error: {error}");
        }));

        Ok(Self {
            adapter: Arc::new(adapter),
            device: Arc::new(device),
            queue: Arc::new(queue),
        })
    }

    pub fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// One blocking maintenance step: parks the thread in the driver until
    /// some submitted work completes, firing completion callbacks. Not a
    /// spin — callers loop on this only until their target frame signals.
    pub fn poll_wait(&self) -> Result<wgpu::PollStatus> {
        self.device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: None,
            })
            .map_err(|e| Error::DeviceLost(format!("device poll failed: {e}")))
    }

    async fn request_device(adapter: &Adapter) -> Result<(Device, Queue)> {
        adapter
            .request_device(&DeviceDescriptor {
                label: Some("Cube Device"),
                required_features: Features::empty(),
                required_limits: Limits::default(),
                memory_hints: Default::default(),
                experimental_features: Default::default(),
                trace: Default::default(),
            })
            .await
            .map_err(|e| Error::Initialization(format!("failed to create device: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_is_cheaply_cloneable() {
        // Compile-time check; creating a real context needs GPU hardware and
        // lives in manual testing.
        fn assert_clone<T: Clone>() {}
        assert_clone::<GpuContext>();
    }
}
