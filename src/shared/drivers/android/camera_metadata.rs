// This is free and unencumbered software released into the public domain.

use super::{CameraResult, CameraStatus};
use crate::shared::{LensFacing, Size};
use core::{mem::zeroed, ptr::null_mut, slice};
use ndk_sys::{
    ACameraMetadata, ACameraMetadata_const_entry, ACameraMetadata_free,
    ACameraMetadata_getConstEntry, AIMAGE_FORMATS, acamera_metadata_tag,
};

const LENS_FACING_FRONT: u8 = 0;
const LENS_FACING_BACK: u8 = 1;

const STREAM_CONFIGURATION_OUTPUT: i32 = 0;

/// `AIMAGE_FORMAT_PRIVATE`, the format a SurfaceTexture preview consumes.
pub const AIMAGE_FORMAT_PRIVATE: i32 = AIMAGE_FORMATS::AIMAGE_FORMAT_PRIVATE.0 as i32;

/// Static characteristics of one camera.
#[derive(Debug)]
pub struct CameraMetadata {
    pub(crate) handle: *mut ACameraMetadata,
}

impl Default for CameraMetadata {
    fn default() -> Self {
        Self { handle: null_mut() }
    }
}

impl Drop for CameraMetadata {
    fn drop(&mut self) {
        if !self.handle.is_null() {
            unsafe { ACameraMetadata_free(self.handle) };
            self.handle = null_mut();
        }
    }
}

impl CameraMetadata {
    /// See: https://developer.android.com/ndk/reference/group/camera#acamerametadata_getconstentry
    fn const_entry(&self, tag: acamera_metadata_tag) -> CameraResult<ACameraMetadata_const_entry> {
        let mut entry: ACameraMetadata_const_entry = unsafe { zeroed() };
        let status =
            unsafe { ACameraMetadata_getConstEntry(self.handle, tag.0 as _, &mut entry) };
        CameraStatus::check(status)?;
        Ok(entry)
    }

    pub fn lens_facing(&self) -> CameraResult<LensFacing> {
        let entry = self.const_entry(acamera_metadata_tag::ACAMERA_LENS_FACING)?;
        let value = if entry.count > 0 {
            unsafe { *entry.data.u8_ }
        } else {
            LENS_FACING_BACK
        };
        Ok(match value {
            LENS_FACING_FRONT => LensFacing::Front,
            LENS_FACING_BACK => LensFacing::Back,
            _ => LensFacing::External,
        })
    }

    pub fn sensor_orientation(&self) -> CameraResult<u32> {
        let entry = self.const_entry(acamera_metadata_tag::ACAMERA_SENSOR_ORIENTATION)?;
        if entry.count == 0 {
            return Ok(0);
        }
        let degrees = unsafe { *entry.data.i32_ };
        Ok(degrees.rem_euclid(360) as u32)
    }

    /// Output sizes for `format`, in the order the HAL lists them.
    pub fn output_sizes(&self, format: i32) -> CameraResult<Vec<Size>> {
        let entry =
            self.const_entry(acamera_metadata_tag::ACAMERA_SCALER_AVAILABLE_STREAM_CONFIGURATIONS)?;
        if entry.count == 0 {
            return Ok(Vec::new());
        }
        // (format, width, height, direction) quadruples.
        let values = unsafe { slice::from_raw_parts(entry.data.i32_, entry.count as usize) };
        Ok(values
            .chunks_exact(4)
            .filter(|c| c[0] == format && c[3] == STREAM_CONFIGURATION_OUTPUT)
            .filter(|c| c[1] > 0 && c[2] > 0)
            .map(|c| Size::new(c[1] as u32, c[2] as u32))
            .collect())
    }
}
