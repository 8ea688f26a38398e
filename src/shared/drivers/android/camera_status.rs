// This is free and unencumbered software released into the public domain.

use crate::shared::CameraError;
use derive_more::Display;
use ndk_sys::camera_status_t;

pub type CameraResult<T = ()> = core::result::Result<T, CameraStatus>;

#[derive(Clone, Copy, Debug, Display, PartialEq)]
#[display("{}", _0.0)]
pub struct CameraStatus(pub(crate) camera_status_t);

impl core::error::Error for CameraStatus {}

impl Default for CameraStatus {
    fn default() -> Self {
        CameraStatus(camera_status_t::ACAMERA_OK)
    }
}

impl From<camera_status_t> for CameraStatus {
    fn from(input: camera_status_t) -> Self {
        Self(input)
    }
}

impl CameraStatus {
    /// Turns an NDK return code into a `Result`.
    pub fn check(status: camera_status_t) -> CameraResult {
        if status == camera_status_t::ACAMERA_OK {
            Ok(())
        } else {
            Err(status.into())
        }
    }
}

impl From<CameraStatus> for CameraError {
    fn from(status: CameraStatus) -> Self {
        CameraError::access_denied(format!("camera2 status {status}"))
    }
}
