// This is free and unencumbered software released into the public domain.

use super::{
    AIMAGE_FORMAT_PRIVATE, CameraDevice, CameraMetadata, CameraResult, CameraStatus,
};
use crate::shared::{CameraError, CameraEvent, DeviceDescriptor, DeviceId};
use alloc::ffi::CString;
use core::{ffi::CStr, ptr::null_mut};
use ndk_sys::{
    ACameraManager, ACameraManager_create, ACameraManager_delete,
    ACameraManager_deleteCameraIdList, ACameraManager_getCameraCharacteristics,
    ACameraManager_getCameraIdList, ACameraManager_openCamera,
};
use scopeguard::defer;
use std::sync::mpsc::Sender;

#[derive(Debug)]
pub struct CameraManager {
    pub(crate) handle: *mut ACameraManager,
}

impl Default for CameraManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CameraManager {
    fn drop(&mut self) {
        unsafe {
            ACameraManager_delete(self.handle);
            self.handle = null_mut();
        }
    }
}

fn c_id(id: &DeviceId) -> Result<CString, CameraError> {
    CString::new(id.as_str())
        .map_err(|e| CameraError::invalid_config(format!("camera id {id:?}: {e}")))
}

impl CameraManager {
    pub fn new() -> Self {
        Self {
            handle: unsafe { ACameraManager_create() },
        }
    }

    pub fn get_camera_ids(&self) -> CameraResult<Vec<DeviceId>> {
        let mut list_ptr = null_mut();
        let status = unsafe { ACameraManager_getCameraIdList(self.handle, &mut list_ptr) };
        CameraStatus::check(status)?;

        defer! {
            unsafe { ACameraManager_deleteCameraIdList(list_ptr); }
        }

        let list = unsafe { &*list_ptr };
        if list.numCameras < 1 {
            return Ok(Vec::new()); // no devices
        }

        let ids = unsafe { core::slice::from_raw_parts(list.cameraIds, list.numCameras as usize) };

        Ok(ids
            .iter()
            .map(|p| unsafe { CStr::from_ptr(*p) }.to_string_lossy().into_owned())
            .map(DeviceId::from)
            .collect())
    }

    /// See: https://developer.android.com/ndk/reference/group/camera#acameramanager_getcameracharacteristics
    pub fn get_characteristics(&self, id: &DeviceId) -> Result<CameraMetadata, CameraError> {
        let c_id = c_id(id)?;
        let mut result = CameraMetadata::default();
        let status = unsafe {
            ACameraManager_getCameraCharacteristics(self.handle, c_id.as_ptr(), &mut result.handle)
        };
        CameraStatus::check(status)?;
        Ok(result)
    }

    pub fn describe(&self, id: &DeviceId) -> Result<DeviceDescriptor, CameraError> {
        let metadata = self.get_characteristics(id)?;
        Ok(DeviceDescriptor {
            id: id.clone(),
            facing: metadata.lens_facing()?,
            sensor_orientation: metadata.sensor_orientation()?,
            output_sizes: metadata.output_sizes(AIMAGE_FORMAT_PRIVATE)?,
        })
    }

    /// See: https://developer.android.com/ndk/reference/group/camera#acameramanager_opencamera
    pub fn open_camera(
        &self,
        id: &DeviceId,
        events_tx: Sender<CameraEvent>,
    ) -> Result<CameraDevice, CameraError> {
        let c_id = c_id(id)?;
        let mut device = CameraDevice::new(id.clone(), events_tx);
        let status = unsafe {
            ACameraManager_openCamera(
                self.handle,
                c_id.as_ptr(),
                &mut *device.state_callbacks,
                &mut device.handle,
            )
        };
        #[cfg(feature = "tracing")]
        asimov_module::tracing::debug!(
            target: "asimov_camera_preview",
            device = %id,
            status = status.0,
            "ACameraManager_openCamera"
        );
        CameraStatus::check(status)?;
        Ok(device)
    }
}
