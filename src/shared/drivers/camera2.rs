// This is free and unencumbered software released into the public domain.

use super::android::{CameraDevice, CameraManager};
use crate::shared::{
    CameraBackend, CameraDriver, CameraError, CameraEvent, DeviceDescriptor, DeviceId,
    send_event,
};
use alloc::borrow::Cow;
use ndk_sys::android_get_device_api_level;
use std::{any::Any, sync::mpsc::Sender};

/// Camera driver on top of the NDK Camera2 API.
#[derive(Debug)]
pub struct Camera2CameraDriver {
    manager: CameraManager,
    device: Option<CameraDevice>,
    pub api_level: u32,
}

// The NDK camera manager and device handles may be used from any thread.
unsafe impl Send for Camera2CameraDriver {}

impl Camera2CameraDriver {
    pub fn open(_input_url: impl AsRef<str>) -> Result<Self, CameraError> {
        let api_level = unsafe { android_get_device_api_level() }.max(0) as u32;
        if api_level < 24 {
            return Err(CameraError::unsupported(format!(
                "camera2 NDK requires API level 24, device has {api_level}"
            )));
        }
        #[cfg(feature = "tracing")]
        asimov_module::tracing::debug!(target: "asimov_camera_preview", api_level, "camera2 driver opened");

        Ok(Self {
            manager: CameraManager::new(),
            device: None,
            api_level,
        })
    }
}

impl dogma::Named for Camera2CameraDriver {
    fn name(&self) -> Cow<'_, str> {
        "camera2".into()
    }
}

impl CameraDriver for Camera2CameraDriver {
    fn backend(&self) -> CameraBackend {
        CameraBackend::Android
    }

    fn devices(&self) -> Result<Vec<DeviceDescriptor>, CameraError> {
        let ids = self.manager.get_camera_ids()?;
        if ids.is_empty() {
            return Err(CameraError::NoCamera);
        }
        ids.iter().map(|id| self.manager.describe(id)).collect()
    }

    fn open_device(
        &mut self,
        id: &DeviceId,
        events_tx: Sender<CameraEvent>,
    ) -> Result<(), CameraError> {
        self.close_device()?;
        let device = self.manager.open_camera(id, events_tx.clone())?;
        self.device = Some(device);
        send_event(
            &events_tx,
            CameraEvent::Opened {
                backend: CameraBackend::Android,
                device: id.clone(),
            },
        );
        Ok(())
    }

    fn close_device(&mut self) -> Result<(), CameraError> {
        if let Some(mut device) = self.device.take() {
            device.close()?;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
