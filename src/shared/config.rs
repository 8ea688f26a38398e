// This is free and unencumbered software released into the public domain.

use crate::shared::DeviceId;

/// How to choose among several non-front-facing devices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeviceSelectionPolicy {
    /// The first non-front device in enumeration order.
    #[default]
    FirstMatch,
    /// The last non-front device in enumeration order.
    LastMatch,
}

/// What to return when no output size matches the viewport's aspect ratio
/// while being at least as large.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// The candidate whose aspect ratio is nearest the viewport's.
    #[default]
    ClosestAspectRatio,
    /// The first candidate as reported by the platform.
    FirstCandidate,
}

#[derive(Clone, Debug)]
pub struct PreviewConfig {
    pub device: Option<DeviceId>,
    pub selection_policy: DeviceSelectionPolicy,
    pub fallback_policy: FallbackPolicy,
    pub worker_name: String,
    pub permission_request_code: i32,
    /// Runtime permission checks start at this platform API level.
    pub runtime_permission_api_level: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            device: None,
            selection_policy: DeviceSelectionPolicy::default(),
            fallback_policy: FallbackPolicy::default(),
            worker_name: "camera-background".into(),
            permission_request_code: 0,
            runtime_permission_api_level: 23,
        }
    }
}

impl PreviewConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_device(mut self, device: impl Into<DeviceId>) -> Self {
        self.device = Some(device.into());
        self
    }

    pub fn with_selection_policy(mut self, policy: DeviceSelectionPolicy) -> Self {
        self.selection_policy = policy;
        self
    }

    pub fn with_fallback_policy(mut self, policy: FallbackPolicy) -> Self {
        self.fallback_policy = policy;
        self
    }

    pub fn with_worker_name(mut self, name: impl Into<String>) -> Self {
        self.worker_name = name.into();
        self
    }

    pub fn with_permission_request_code(mut self, code: i32) -> Self {
        self.permission_request_code = code;
        self
    }

    pub fn with_runtime_permission_api_level(mut self, level: u32) -> Self {
        self.runtime_permission_api_level = level;
        self
    }
}
