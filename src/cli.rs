// This is free and unencumbered software released into the public domain.

//! CLI helpers (error reporting, verbosity handling, argument parsing).
//!
//! This module must compile even when the crate feature `cli` is disabled,
//! because the library is built in non-CLI configurations.

use crate::shared::{Rotation, Size};

#[cfg(feature = "cli")]
use crate::shared::{CameraDriver, CameraError};

#[cfg(feature = "cli")]
use asimov_module::SysexitsError::{self, *};

#[cfg(feature = "cli")]
use clientele::StandardOptions;

#[cfg(feature = "cli")]
pub fn handle_error(err: &CameraError, flags: &StandardOptions) -> SysexitsError {
    #[cfg(feature = "tracing")]
    {
        use asimov_module::tracing::{debug, error};

        error!(target: "asimov_camera_preview", %err, "camera command failed");

        if flags.debug || flags.verbose >= 2 {
            debug!(target: "asimov_camera_preview", ?err, "detailed error");
        }
    }

    report_error(err, flags);
    map_error_to_sysexit(err)
}

#[cfg(feature = "cli")]
pub fn info_user(flags: &StandardOptions, msg: &str) {
    if flags.debug || flags.verbose >= 1 {
        eprintln!("INFO: {msg}");
    }

    #[cfg(feature = "tracing")]
    asimov_module::tracing::info!(target: "asimov_camera_preview", "{msg}");
}

#[cfg(feature = "cli")]
pub fn warn_user(flags: &StandardOptions, msg: &str) {
    if flags.debug || flags.verbose >= 1 {
        eprintln!("WARN: {msg}");
    }

    #[cfg(feature = "tracing")]
    asimov_module::tracing::warn!(target: "asimov_camera_preview", "{msg}");
}

/// Opens the camera backend for `input`, telling the user which one.
#[cfg(feature = "cli")]
pub fn open_driver(
    flags: &StandardOptions,
    input: &str,
) -> Result<Box<dyn CameraDriver>, CameraError> {
    let driver = crate::shared::open_driver(input)?;
    info_user(flags, &format!("using {:?} camera backend", driver.backend()));
    Ok(driver)
}

#[cfg(feature = "cli")]
fn report_error(err: &CameraError, flags: &StandardOptions) {
    use std::error::Error as _;
    use std::io::Write;

    let mut stderr = std::io::stderr();
    let _ = writeln!(stderr, "ERROR: {err}");

    if flags.debug || flags.verbose >= 2 {
        let mut source = err.source();
        while let Some(cause) = source {
            let _ = writeln!(stderr, "  Caused by: {}", cause);
            source = cause.source();
        }
    }
}

#[cfg(feature = "cli")]
fn map_error_to_sysexit(err: &CameraError) -> SysexitsError {
    match err {
        CameraError::NoDriver => EX_UNAVAILABLE,
        CameraError::NoCamera => EX_UNAVAILABLE,
        CameraError::NoSuitableDevice => EX_UNAVAILABLE,
        CameraError::NoMatchingResolution => EX_UNAVAILABLE,
        CameraError::AccessDenied(_) => EX_NOPERM,
        CameraError::PermissionDenied => EX_NOPERM,
        CameraError::WorkerStopped => EX_SOFTWARE,
        CameraError::InvalidConfig(_) => EX_USAGE,
        CameraError::Unsupported(_) => EX_UNAVAILABLE,
        CameraError::Closed => EX_IOERR,
        CameraError::DriverError { .. } => EX_SOFTWARE,
        CameraError::Other(_) => EX_SOFTWARE,
    }
}

/// Parses `WxH` (also accepting `×`).
pub fn parse_dimensions(s: &str) -> Result<Size, String> {
    let s = s.trim().replace('×', "x");
    let parts: Vec<&str> = s.split('x').map(|t| t.trim()).collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(format!("Invalid format '{s}'. Use WxH (e.g., 1080x1920)"));
    }

    let width: u32 = parts[0].parse().map_err(|_| format!("Invalid width: {}", parts[0]))?;
    let height: u32 = parts[1].parse().map_err(|_| format!("Invalid height: {}", parts[1]))?;

    if width == 0 || height == 0 {
        return Err(format!("Viewport {width}x{height} must not be empty"));
    }

    Ok(Size::new(width, height))
}

/// Parses a display rotation in degrees (0, 90, 180 or 270).
pub fn parse_rotation(s: &str) -> Result<Rotation, String> {
    let s = s.trim().trim_end_matches('°');
    let degrees: u32 = s.parse().map_err(|_| format!("Invalid rotation: {s}"))?;
    Rotation::from_degrees(degrees)
        .ok_or_else(|| format!("Rotation {degrees} must be one of 0, 90, 180, 270"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_accept_both_separators() {
        assert_eq!(parse_dimensions("1080x1920"), Ok(Size::new(1080, 1920)));
        assert_eq!(parse_dimensions(" 640 × 480 "), Ok(Size::new(640, 480)));
        assert!(parse_dimensions("1080").is_err());
        assert!(parse_dimensions("0x480").is_err());
        assert!(parse_dimensions("wide x tall").is_err());
    }

    #[test]
    fn rotation_accepts_canonical_degrees() {
        assert_eq!(parse_rotation("90"), Ok(Rotation::Deg90));
        assert_eq!(parse_rotation("270°"), Ok(Rotation::Deg270));
        assert!(parse_rotation("45").is_err());
        assert!(parse_rotation("left").is_err());
    }
}
