//! Device enumeration and selection.

use opencl3::device::{Device, CL_DEVICE_TYPE_GPU};
use opencl3::platform::{get_platforms, Platform};
use tracing::{debug, info};

use crate::error::{ClError, Result};

/// An OpenCL GPU device with its parent platform.
#[derive(Debug)]
pub struct GpuDevice {
    /// The raw opencl3 device handle.
    pub(crate) device: Device,
    /// The platform this device belongs to.
    #[allow(dead_code)]
    pub(crate) platform: Platform,
    /// Human-readable device name.
    pub device_name: String,
    /// Human-readable platform name.
    pub platform_name: String,
}

impl GpuDevice {
    /// Enumerate all GPU devices across all OpenCL platforms.
    pub fn enumerate() -> Result<Vec<GpuDevice>> {
        let platforms = get_platforms().map_err(|_e| ClError::NoPlatform)?;
        if platforms.is_empty() {
            return Err(ClError::NoPlatform);
        }

        let mut devices = Vec::new();
        for platform in platforms {
            let platform_name = platform.name().unwrap_or_default();
            debug!("scanning OpenCL platform: {}", platform_name);

            let device_ids = platform.get_devices(CL_DEVICE_TYPE_GPU).unwrap_or_default();
            for device_id in device_ids {
                let device = Device::new(device_id);
                let device_name = device.name().unwrap_or_default();
                debug!("found GPU: {}", device_name);
                devices.push(GpuDevice {
                    device,
                    platform,
                    device_name,
                    platform_name: platform_name.clone(),
                });
            }
        }

        Ok(devices)
    }

    /// Select the first available GPU device.
    pub fn first_gpu() -> Result<GpuDevice> {
        let mut gpus = Self::enumerate()?;
        if gpus.is_empty() {
            return Err(ClError::NoDevice { reason: "no GPU device on any platform".into() });
        }
        let gpu = gpus.remove(0);
        info!("selected GPU: {} ({})", gpu.device_name, gpu.platform_name);
        Ok(gpu)
    }

    /// The device's maximum work-group size, if the query succeeds.
    ///
    /// The dispatch sequence queries this, logs it, and deliberately
    /// does not constrain the launch with it.
    pub fn max_work_group_size(&self) -> Option<usize> {
        self.device.max_work_group_size().ok()
    }
}
