// This is free and unencumbered software released into the public domain.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// A width×height pair in pixels.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[display("{width}x{height}")]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Pixel area, wide enough that no `u32` pair overflows it.
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub const fn transposed(&self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Rotation of the display surface relative to the device's natural
/// orientation.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq, Hash)]
pub enum Rotation {
    #[default]
    #[display("0°")]
    Deg0,
    #[display("90°")]
    Deg90,
    #[display("180°")]
    Deg180,
    #[display("270°")]
    Deg270,
}

impl Rotation {
    /// Maps an Android `Surface.ROTATION_*` constant (0..=3).
    pub fn from_surface_rotation(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Deg0),
            1 => Some(Self::Deg90),
            2 => Some(Self::Deg180),
            3 => Some(Self::Deg270),
            _ => None,
        }
    }

    /// Accepts only the four canonical angles.
    pub fn from_degrees(degrees: u32) -> Option<Self> {
        match degrees {
            0 => Some(Self::Deg0),
            90 => Some(Self::Deg90),
            180 => Some(Self::Deg180),
            270 => Some(Self::Deg270),
            _ => None,
        }
    }

    pub const fn degrees(&self) -> u32 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_area_does_not_overflow() {
        let size = Size::new(u32::MAX, u32::MAX);
        assert_eq!(size.area(), u32::MAX as u64 * u32::MAX as u64);
    }

    #[test]
    fn size_displays_as_w_x_h() {
        assert_eq!(Size::new(1920, 1080).to_string(), "1920x1080");
        assert_eq!(Size::new(1920, 1080).transposed(), Size::new(1080, 1920));
    }

    #[test]
    fn surface_rotation_constants() {
        assert_eq!(Rotation::from_surface_rotation(0), Some(Rotation::Deg0));
        assert_eq!(Rotation::from_surface_rotation(1), Some(Rotation::Deg90));
        assert_eq!(Rotation::from_surface_rotation(2), Some(Rotation::Deg180));
        assert_eq!(Rotation::from_surface_rotation(3), Some(Rotation::Deg270));
        assert_eq!(Rotation::from_surface_rotation(4), None);
        assert_eq!(Rotation::from_surface_rotation(-1), None);
    }

    #[test]
    fn degrees_round_trip_for_canonical_angles() {
        for degrees in [0, 90, 180, 270] {
            assert_eq!(Rotation::from_degrees(degrees).map(|r| r.degrees()), Some(degrees));
        }
        assert_eq!(Rotation::from_degrees(45), None);
        assert_eq!(Rotation::Deg270.to_string(), "270°");
    }
}
