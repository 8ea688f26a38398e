// This is free and unencumbered software released into the public domain.

use crate::shared::Rotation;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

bitflags::bitflags! {
    /// System UI visibility bits, with the values of Android's
    /// `View.SYSTEM_UI_FLAG_*` constants.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SystemUiFlags: u32 {
        const HIDE_NAVIGATION = 0x0000_0002;
        const FULLSCREEN = 0x0000_0004;
        const LAYOUT_STABLE = 0x0000_0100;
        const LAYOUT_HIDE_NAVIGATION = 0x0000_0200;
        const LAYOUT_FULLSCREEN = 0x0000_0400;
        const IMMERSIVE_STICKY = 0x0000_1000;

        /// Sticky immersive fullscreen with stable layout.
        const IMMERSIVE_FULLSCREEN = Self::LAYOUT_STABLE.bits()
            | Self::IMMERSIVE_STICKY.bits()
            | Self::LAYOUT_FULLSCREEN.bits()
            | Self::LAYOUT_HIDE_NAVIGATION.bits()
            | Self::FULLSCREEN.bits()
            | Self::HIDE_NAVIGATION.bits();
    }
}

/// The UI side of the platform: display, runtime permissions, and user
/// notices.
pub trait PreviewHost: Send + Sync {
    fn display_rotation(&self) -> Rotation;

    fn api_level(&self) -> u32;

    fn camera_permission(&self) -> PermissionStatus;

    fn should_show_permission_rationale(&self) -> bool {
        false
    }

    /// Asks the user for camera access; the answer arrives later through
    /// `PreviewController::on_request_permissions_result`.
    fn request_camera_permission(&self, request_code: i32);

    /// A short, transient message to the user.
    fn notify(&self, message: &str);

    fn set_system_ui_visibility(&self, flags: SystemUiFlags);
}
