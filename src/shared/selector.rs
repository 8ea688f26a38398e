// This is free and unencumbered software released into the public domain.

//! Camera selection and preview-size negotiation.
//!
//! Given the enumerated devices, the current display rotation and the size of
//! the rendering surface, pick one device and one of its output sizes.

use crate::shared::{
    CameraError, DeviceDescriptor, DeviceId, DeviceSelectionPolicy, FallbackPolicy,
    PreviewConfig, Rotation, Size,
};
use core::cmp::Ordering;

/// Whether a chosen size satisfied the viewport or came from a fallback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizeMatch {
    Exact,
    Fallback(FallbackPolicy),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizeChoice {
    pub size: Size,
    pub matched: SizeMatch,
}

impl SizeChoice {
    pub fn is_fallback(&self) -> bool {
        matches!(self.matched, SizeMatch::Fallback(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    pub device_id: DeviceId,
    pub preview_size: Size,
    pub size_match: SizeMatch,
    /// Angle in degrees aligning sensor output with the display.
    pub total_rotation: u32,
}

/// Picks one non-front-facing device according to `policy`.
pub fn select_device(
    devices: &[DeviceDescriptor],
    policy: DeviceSelectionPolicy,
) -> Result<&DeviceDescriptor, CameraError> {
    let mut candidates = devices.iter().filter(|d| !d.is_front_facing());
    let chosen = match policy {
        DeviceSelectionPolicy::FirstMatch => candidates.next(),
        DeviceSelectionPolicy::LastMatch => candidates.last(),
    };
    chosen.ok_or(CameraError::NoSuitableDevice)
}

pub fn find_device<'a>(
    devices: &'a [DeviceDescriptor],
    id: &DeviceId,
) -> Result<&'a DeviceDescriptor, CameraError> {
    devices
        .iter()
        .find(|d| &d.id == id)
        .ok_or(CameraError::NoSuitableDevice)
}

/// Combined sensor and display rotation, always in `0..360`.
pub fn compute_total_rotation(sensor_orientation: u32, display: Rotation) -> u32 {
    (sensor_orientation % 360 + display.degrees() + 360) % 360
}

/// Sensor and display axes disagree at quarter turns.
pub fn swaps_axes(total_rotation: u32) -> bool {
    matches!(total_rotation, 90 | 270)
}

/// Chooses the smallest candidate that has the target's aspect ratio and is at
/// least as large in both dimensions; otherwise applies `fallback`.
///
/// The aspect test is `height == width * target.height / target.width` in
/// integer arithmetic, so it is order-sensitive rather than a symmetric
/// ratio comparison.
pub fn choose_optimal_size(
    candidates: &[Size],
    target: Size,
    fallback: FallbackPolicy,
) -> Result<SizeChoice, CameraError> {
    if target.is_empty() {
        return Err(CameraError::invalid_config(format!(
            "preview target {target} has a zero dimension"
        )));
    }
    let first = *candidates.first().ok_or(CameraError::NoMatchingResolution)?;

    let best = candidates
        .iter()
        .copied()
        .filter(|c| fits_viewport(*c, target))
        .min_by_key(Size::area);
    if let Some(size) = best {
        return Ok(SizeChoice {
            size,
            matched: SizeMatch::Exact,
        });
    }

    let size = match fallback {
        FallbackPolicy::FirstCandidate => first,
        FallbackPolicy::ClosestAspectRatio => closest_aspect_ratio(candidates, target).unwrap_or(first),
    };
    Ok(SizeChoice {
        size,
        matched: SizeMatch::Fallback(fallback),
    })
}

fn fits_viewport(candidate: Size, target: Size) -> bool {
    let expected_height = candidate.width as u64 * target.height as u64 / target.width as u64;
    candidate.height as u64 == expected_height
        && candidate.width >= target.width
        && candidate.height >= target.height
}

fn closest_aspect_ratio(candidates: &[Size], target: Size) -> Option<Size> {
    candidates
        .iter()
        .copied()
        .filter(|c| c.height != 0)
        .fold(None, |best, c| match best {
            None => Some(c),
            Some(b) => match compare_aspect_error(c, b, target) {
                Ordering::Less => Some(c),
                Ordering::Equal if c.area() > b.area() => Some(c),
                _ => Some(b),
            },
        })
}

/// Orders `a` and `b` by `|w/h - tw/th|` without division.
///
/// The error of `s` is `|s.w*th - tw*s.h| / (s.h*th)`; `th` is common to both
/// sides, so comparing `err_a * b.h` against `err_b * a.h` suffices.
fn compare_aspect_error(a: Size, b: Size, target: Size) -> Ordering {
    let error = |s: Size| -> u128 {
        let lhs = s.width as u128 * target.height as u128;
        let rhs = target.width as u128 * s.height as u128;
        lhs.abs_diff(rhs)
    };
    (error(a) * b.height as u128).cmp(&(error(b) * a.height as u128))
}

/// Selects a device and a preview size for a viewport.
///
/// An explicit `config.device` overrides the facing filter.
pub fn select(
    devices: &[DeviceDescriptor],
    display: Rotation,
    viewport: Size,
    config: &PreviewConfig,
) -> Result<Selection, CameraError> {
    let device = match &config.device {
        Some(id) => find_device(devices, id)?,
        None => select_device(devices, config.selection_policy)?,
    };

    let total_rotation = compute_total_rotation(device.sensor_orientation, display);
    let target = if swaps_axes(total_rotation) {
        viewport.transposed()
    } else {
        viewport
    };

    let choice = choose_optimal_size(&device.output_sizes, target, config.fallback_policy)?;

    #[cfg(feature = "tracing")]
    {
        use asimov_module::tracing::{debug, warn};
        if choice.is_fallback() {
            warn!(
                target: "asimov_camera_preview",
                device = %device.id, viewport = %target, size = %choice.size, policy = ?config.fallback_policy,
                "no output size matches the viewport; using fallback"
            );
        }
        debug!(
            target: "asimov_camera_preview",
            device = %device.id, facing = %device.facing, total_rotation, size = %choice.size,
            "camera selected"
        );
    }

    Ok(Selection {
        device_id: device.id.clone(),
        preview_size: choice.size,
        size_match: choice.matched,
        total_rotation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::LensFacing;

    fn sizes(list: &[(u32, u32)]) -> Vec<Size> {
        list.iter().copied().map(Size::from).collect()
    }

    fn device(id: &str, facing: LensFacing) -> DeviceDescriptor {
        DeviceDescriptor::new(id, facing, 90).with_output_sizes(sizes(&[(1920, 1080), (1280, 720)]))
    }

    #[test]
    fn total_rotation_known_values() {
        assert_eq!(compute_total_rotation(90, Rotation::Deg90), 180);
        assert_eq!(compute_total_rotation(0, Rotation::Deg0), 0);
        assert_eq!(compute_total_rotation(270, Rotation::Deg180), 90);
        assert_eq!(compute_total_rotation(270, Rotation::Deg90), 0);
    }

    #[test]
    fn total_rotation_stays_in_range() {
        for rotation in [Rotation::Deg0, Rotation::Deg90, Rotation::Deg180, Rotation::Deg270] {
            for sensor in 0..360 {
                let total = compute_total_rotation(sensor, rotation);
                assert!(total < 360, "sensor={sensor} rotation={rotation} total={total}");
                assert_eq!(total, (sensor + rotation.degrees()) % 360);
            }
        }
        assert!(compute_total_rotation(u32::MAX, Rotation::Deg270) < 360);
    }

    #[test]
    fn optimal_size_picks_smallest_matching_area() {
        let candidates = sizes(&[(640, 480), (1280, 720), (1920, 1080)]);
        let choice =
            choose_optimal_size(&candidates, Size::new(1280, 720), FallbackPolicy::default()).unwrap();
        assert_eq!(choice.size, Size::new(1280, 720));
        assert_eq!(choice.matched, SizeMatch::Exact);
    }

    #[test]
    fn optimal_size_compares_true_area() {
        // A divide-first comparator ranks 1920x1080 above 2560x1440.
        let candidates = sizes(&[(2560, 1440), (1920, 1080)]);
        let choice =
            choose_optimal_size(&candidates, Size::new(1280, 720), FallbackPolicy::default()).unwrap();
        assert_eq!(choice.size, Size::new(1920, 1080));
    }

    #[test]
    fn optimal_size_aspect_test_is_order_sensitive() {
        // Only the candidate in the target's orientation fits.
        let candidates = sizes(&[(720, 1280), (1280, 720)]);
        let choice =
            choose_optimal_size(&candidates, Size::new(720, 1280), FallbackPolicy::default()).unwrap();
        assert_eq!(choice.size, Size::new(720, 1280));
        assert!(!choice.is_fallback());
    }

    #[test]
    fn first_candidate_fallback_when_nothing_fits() {
        let candidates = sizes(&[(64, 48), (32, 24), (80, 60)]);
        let choice =
            choose_optimal_size(&candidates, Size::new(100, 100), FallbackPolicy::FirstCandidate)
                .unwrap();
        assert_eq!(choice.size, candidates[0]);
        assert_eq!(choice.matched, SizeMatch::Fallback(FallbackPolicy::FirstCandidate));
    }

    #[test]
    fn closest_aspect_fallback_prefers_nearest_shape() {
        let candidates = sizes(&[(640, 480), (1280, 720), (800, 800), (1024, 1024)]);
        let choice = choose_optimal_size(
            &candidates,
            Size::new(4000, 4000),
            FallbackPolicy::ClosestAspectRatio,
        )
        .unwrap();
        assert_eq!(choice.size, Size::new(1024, 1024));
        assert!(choice.is_fallback());
    }

    #[test]
    fn closest_aspect_fallback_ties_keep_first_of_equal_area() {
        let candidates = sizes(&[(64, 48), (64, 48)]);
        let choice =
            choose_optimal_size(&candidates, Size::new(100, 100), FallbackPolicy::ClosestAspectRatio)
                .unwrap();
        assert_eq!(choice.size, Size::new(64, 48));
    }

    #[test]
    fn optimal_size_result_is_always_a_candidate() {
        let candidates = sizes(&[(176, 144), (320, 240), (1280, 960), (1600, 1200), (3000, 1000)]);
        let targets = [(100, 100), (320, 240), (1200, 900), (5000, 1), (1, 5000), (1600, 1200)];
        for (w, h) in targets {
            for fallback in [FallbackPolicy::ClosestAspectRatio, FallbackPolicy::FirstCandidate] {
                let choice = choose_optimal_size(&candidates, Size::new(w, h), fallback).unwrap();
                assert!(candidates.contains(&choice.size), "{w}x{h} -> {}", choice.size);
            }
        }
    }

    #[test]
    fn optimal_size_rejects_empty_input() {
        let result = choose_optimal_size(&[], Size::new(100, 100), FallbackPolicy::default());
        assert!(matches!(result, Err(CameraError::NoMatchingResolution)));

        let result = choose_optimal_size(&sizes(&[(10, 10)]), Size::new(0, 100), FallbackPolicy::default());
        assert!(matches!(result, Err(CameraError::InvalidConfig(_))));
    }

    #[test]
    fn only_front_facing_devices_yield_no_selection() {
        let devices = [device("1", LensFacing::Front), device("2", LensFacing::Front)];
        for policy in [DeviceSelectionPolicy::FirstMatch, DeviceSelectionPolicy::LastMatch] {
            assert!(matches!(
                select_device(&devices, policy),
                Err(CameraError::NoSuitableDevice)
            ));
        }
        assert!(matches!(
            select_device(&[], DeviceSelectionPolicy::FirstMatch),
            Err(CameraError::NoSuitableDevice)
        ));
    }

    #[test]
    fn selection_policy_decides_between_rear_devices() {
        let devices = [
            device("front", LensFacing::Front),
            device("back1", LensFacing::Back),
            device("back2", LensFacing::Back),
        ];
        let first = select_device(&devices, DeviceSelectionPolicy::FirstMatch).unwrap();
        assert_eq!(first.id.as_str(), "back1");
        let last = select_device(&devices, DeviceSelectionPolicy::LastMatch).unwrap();
        assert_eq!(last.id.as_str(), "back2");
    }

    #[test]
    fn external_devices_are_eligible() {
        let devices = [device("front", LensFacing::Front), device("usb", LensFacing::External)];
        let chosen = select_device(&devices, DeviceSelectionPolicy::default()).unwrap();
        assert_eq!(chosen.id.as_str(), "usb");
    }

    #[test]
    fn select_swaps_viewport_on_quarter_turns() {
        let devices = [DeviceDescriptor::new("0", LensFacing::Back, 90)
            .with_output_sizes(sizes(&[(640, 480), (1920, 1080), (1280, 720)]))];

        // Portrait surface, sensor at 90°: the target becomes 1280x720.
        let selection =
            select(&devices, Rotation::Deg0, Size::new(720, 1280), &PreviewConfig::default())
                .unwrap();
        assert_eq!(selection.device_id.as_str(), "0");
        assert_eq!(selection.total_rotation, 90);
        assert_eq!(selection.preview_size, Size::new(1280, 720));
        assert_eq!(selection.size_match, SizeMatch::Exact);

        // Landscape surface with the device turned: total rotation 180, no swap.
        let selection =
            select(&devices, Rotation::Deg90, Size::new(1280, 720), &PreviewConfig::default())
                .unwrap();
        assert_eq!(selection.total_rotation, 180);
        assert_eq!(selection.preview_size, Size::new(1280, 720));
    }

    #[test]
    fn explicit_device_overrides_facing_filter() {
        let devices = [device("front", LensFacing::Front), device("back", LensFacing::Back)];
        let config = PreviewConfig::default().with_device("front");
        let selection = select(&devices, Rotation::Deg0, Size::new(1080, 1920), &config).unwrap();
        assert_eq!(selection.device_id.as_str(), "front");

        let config = PreviewConfig::default().with_device("missing");
        let result = select(&devices, Rotation::Deg0, Size::new(1080, 1920), &config);
        assert!(matches!(result, Err(CameraError::NoSuitableDevice)));
    }

    #[test]
    fn select_reports_device_without_sizes() {
        let devices = [DeviceDescriptor::new("0", LensFacing::Back, 0)];
        let result = select(&devices, Rotation::Deg0, Size::new(640, 480), &PreviewConfig::default());
        assert!(matches!(result, Err(CameraError::NoMatchingResolution)));
    }
}
