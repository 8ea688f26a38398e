// This is free and unencumbered software released into the public domain.

//! Thin RAII wrappers over the NDK camera API (`libcamera2ndk`).

#[link(name = "camera2ndk")]
unsafe extern "C" {}

mod camera_device;
pub use camera_device::*;

mod camera_manager;
pub use camera_manager::*;

mod camera_metadata;
pub use camera_metadata::*;

mod camera_status;
pub use camera_status::*;
