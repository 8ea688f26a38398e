// This is free and unencumbered software released into the public domain.

use super::{CameraDriver, CameraError, drivers::catalog::CatalogCameraDriver};

/// Opens the camera backend named by `input_url`.
///
/// - `catalog:<path>`, `file:<path>` or a path ending in `.json`: a JSON
///   device catalog.
/// - empty or `camera2:`: the platform camera (Android with the `android`
///   feature).
pub fn open_driver(input_url: impl AsRef<str>) -> Result<Box<dyn CameraDriver>, CameraError> {
    let input_url = input_url.as_ref().trim();

    if let Some(path) = input_url
        .strip_prefix("catalog:")
        .or_else(|| input_url.strip_prefix("file:"))
    {
        return Ok(Box::new(CatalogCameraDriver::open(path)?));
    }
    if input_url.ends_with(".json") {
        return Ok(Box::new(CatalogCameraDriver::open(input_url)?));
    }
    if !input_url.is_empty() && !input_url.starts_with("camera2:") {
        return Err(CameraError::unsupported(format!(
            "unrecognized camera input {input_url:?}"
        )));
    }

    cfg_if::cfg_if! {
        if #[cfg(all(feature = "android", target_os = "android"))] {
            Ok(Box::new(super::drivers::camera2::Camera2CameraDriver::open(input_url)?))
        } else {
            Err(CameraError::NoDriver)
        }
    }
}
