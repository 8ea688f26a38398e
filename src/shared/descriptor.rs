// This is free and unencumbered software released into the public domain.

use crate::shared::Size;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Opaque device identifier as handed out by the host camera framework.
#[derive(Clone, Debug, Default, Display, From, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for DeviceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Which way a sensor points relative to the device body.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LensFacing {
    #[display("front")]
    Front,
    #[display("back")]
    Back,
    #[display("external")]
    External,
}

/// Static metadata about one capture device.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    pub id: DeviceId,
    pub facing: LensFacing,
    /// Mounting angle in degrees; one of 0, 90, 180, 270.
    #[serde(default)]
    pub sensor_orientation: u32,
    /// Supported preview output sizes, in platform order.
    #[serde(default)]
    pub output_sizes: Vec<Size>,
}

impl DeviceDescriptor {
    pub fn new(id: impl Into<DeviceId>, facing: LensFacing, sensor_orientation: u32) -> Self {
        Self {
            id: id.into(),
            facing,
            sensor_orientation,
            output_sizes: Vec::new(),
        }
    }

    pub fn with_output_sizes(mut self, sizes: impl IntoIterator<Item = Size>) -> Self {
        self.output_sizes = sizes.into_iter().collect();
        self
    }

    pub fn is_front_facing(&self) -> bool {
        self.facing == LensFacing::Front
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_deserializes_from_catalog_json() {
        let json = r#"{
            "id": "0",
            "facing": "back",
            "sensor_orientation": 90,
            "output_sizes": [{"width": 1920, "height": 1080}, {"width": 640, "height": 480}]
        }"#;
        let descriptor: DeviceDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(descriptor.id.as_str(), "0");
        assert_eq!(descriptor.facing, LensFacing::Back);
        assert_eq!(descriptor.sensor_orientation, 90);
        assert_eq!(descriptor.output_sizes, vec![Size::new(1920, 1080), Size::new(640, 480)]);
    }

    #[test]
    fn orientation_and_sizes_default_when_missing() {
        let descriptor: DeviceDescriptor =
            serde_json::from_str(r#"{"id": "usb-1", "facing": "external"}"#).unwrap();
        assert_eq!(descriptor.sensor_orientation, 0);
        assert!(descriptor.output_sizes.is_empty());
        assert!(!descriptor.is_front_facing());
    }
}
