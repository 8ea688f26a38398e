// This is free and unencumbered software released into the public domain.

//! Preview lifecycle: reacts to the host's resume, pause, surface, permission
//! and focus callbacks, and drives selection and device open/close.

use crate::shared::{
    BackgroundWorker, CameraDriver, CameraError, CameraEvent, DeviceId, PermissionStatus,
    PreviewConfig, PreviewHost, Selection, Size, SystemUiFlags, select,
};
use std::{
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        mpsc::{Receiver, RecvTimeoutError, Sender, channel},
    },
    time::Duration,
};

pub const MSG_CONNECTED: &str = "Camera Connection Successful!";
pub const MSG_PERMISSION_RATIONALE: &str = "Video app requires access to camera";
pub const MSG_PERMISSION_REQUIRED: &str = "App won't run without camera permission";

pub type SharedDriver = Arc<Mutex<Box<dyn CameraDriver>>>;

/// Result of a connect attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// The open request is queued on the background worker.
    Opening,
    /// Camera permission is missing and has been requested from the user.
    PermissionRequested,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DeviceState {
    #[default]
    Idle,
    Opening(DeviceId),
    Open(DeviceId),
}

pub struct PreviewController<H: PreviewHost> {
    driver: SharedDriver,
    host: H,
    config: PreviewConfig,
    worker: BackgroundWorker,
    events_tx: Sender<CameraEvent>,
    events_rx: Receiver<CameraEvent>,
    selection: Option<Selection>,
    state: DeviceState,
    awaiting_surface: bool,
}

impl<H: PreviewHost> PreviewController<H> {
    pub fn new(driver: Box<dyn CameraDriver>, host: H, config: PreviewConfig) -> Self {
        let (events_tx, events_rx) = channel();
        Self {
            driver: Arc::new(Mutex::new(driver)),
            host,
            config,
            worker: BackgroundWorker::default(),
            events_tx,
            events_rx,
            selection: None,
            state: DeviceState::Idle,
            awaiting_surface: false,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    pub fn driver(&self) -> SharedDriver {
        Arc::clone(&self.driver)
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn open_device(&self) -> Option<&DeviceId> {
        match &self.state {
            DeviceState::Open(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_awaiting_surface(&self) -> bool {
        self.awaiting_surface
    }

    pub fn is_worker_running(&self) -> bool {
        self.worker.is_running()
    }

    /// Starts the background worker, then either starts the preview on the
    /// already-available surface or waits for `on_surface_available`.
    pub fn on_resume(&mut self, surface: Option<Size>) -> Result<Option<ConnectOutcome>, CameraError> {
        if !self.worker.is_running() {
            self.worker = BackgroundWorker::start(self.config.worker_name.clone())?;
        }
        match surface {
            Some(size) => self.start_preview(size).map(Some),
            None => {
                self.awaiting_surface = true;
                Ok(None)
            },
        }
    }

    pub fn on_surface_available(&mut self, size: Size) -> Result<ConnectOutcome, CameraError> {
        self.awaiting_surface = false;
        self.start_preview(size)
    }

    /// Closes the camera, then stops the worker once every queued job ran.
    pub fn on_pause(&mut self) -> Result<(), CameraError> {
        let result = self.close_camera();
        self.worker.stop();
        self.selection = None;
        result
    }

    /// Returns the status reported for our request code, or `None` when the
    /// result belongs to another request.
    pub fn on_request_permissions_result(
        &mut self,
        request_code: i32,
        results: &[PermissionStatus],
    ) -> Option<PermissionStatus> {
        if request_code != self.config.permission_request_code {
            return None;
        }
        let status = match results.first() {
            Some(PermissionStatus::Granted) => PermissionStatus::Granted,
            _ => PermissionStatus::Denied,
        };
        if status != PermissionStatus::Granted {
            self.host.notify(MSG_PERMISSION_REQUIRED);
        }
        Some(status)
    }

    pub fn on_window_focus_changed(&mut self, has_focus: bool) {
        if has_focus {
            self.host
                .set_system_ui_visibility(SystemUiFlags::IMMERSIVE_FULLSCREEN);
        }
    }

    fn start_preview(&mut self, viewport: Size) -> Result<ConnectOutcome, CameraError> {
        self.setup_camera(viewport)?;
        self.connect_camera()
    }

    /// Enumerates devices and stores a fresh selection for `viewport`. On
    /// failure no selection is left behind.
    pub fn setup_camera(&mut self, viewport: Size) -> Result<&Selection, CameraError> {
        self.selection = None;
        let devices = lock(&self.driver).devices().inspect_err(|_err| {
            #[cfg(feature = "tracing")]
            asimov_module::tracing::error!(
                target: "asimov_camera_preview",
                error = %_err,
                "camera enumeration failed"
            );
        })?;

        let selection = select(
            &devices,
            self.host.display_rotation(),
            viewport,
            &self.config,
        )?;

        #[cfg(feature = "tracing")]
        asimov_module::tracing::info!(
            target: "asimov_camera_preview",
            device = %selection.device_id,
            size = %selection.preview_size,
            total_rotation = selection.total_rotation,
            "preview configured"
        );

        Ok(&*self.selection.insert(selection))
    }

    /// Opens the selected device, asking for permission first when the
    /// platform requires runtime permissions.
    pub fn connect_camera(&mut self) -> Result<ConnectOutcome, CameraError> {
        let id = self
            .selection
            .as_ref()
            .map(|s| s.device_id.clone())
            .ok_or(CameraError::NoSuitableDevice)?;

        if self.host.api_level() >= self.config.runtime_permission_api_level
            && self.host.camera_permission() != PermissionStatus::Granted
        {
            if self.host.should_show_permission_rationale() {
                self.host.notify(MSG_PERMISSION_RATIONALE);
            }
            self.host
                .request_camera_permission(self.config.permission_request_code);
            return Ok(ConnectOutcome::PermissionRequested);
        }

        self.open_on_worker(id)?;
        Ok(ConnectOutcome::Opening)
    }

    fn open_on_worker(&mut self, id: DeviceId) -> Result<(), CameraError> {
        let driver = Arc::clone(&self.driver);
        let events_tx = self.events_tx.clone();
        let job_id = id.clone();
        self.worker.post(move || {
            if let Err(_err) = lock(&driver).open_device(&job_id, events_tx) {
                #[cfg(feature = "tracing")]
                asimov_module::tracing::error!(
                    target: "asimov_camera_preview",
                    device = %job_id,
                    error = %_err,
                    "camera open failed"
                );
            }
        })?;
        self.state = DeviceState::Opening(id);
        Ok(())
    }

    /// Releases the device. Runs behind any pending open on the worker.
    pub fn close_camera(&mut self) -> Result<(), CameraError> {
        if self.state == DeviceState::Idle {
            return Ok(());
        }
        self.state = DeviceState::Idle;

        if self.worker.is_running() {
            let driver = Arc::clone(&self.driver);
            return self.worker.post(move || {
                if let Err(_err) = lock(&driver).close_device() {
                    #[cfg(feature = "tracing")]
                    asimov_module::tracing::warn!(
                        target: "asimov_camera_preview",
                        error = %_err,
                        "camera close failed"
                    );
                }
            });
        }
        lock(&self.driver).close_device()
    }

    /// Handles every event already delivered; returns how many there were.
    pub fn pump_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(&event);
            handled += 1;
        }
        handled
    }

    /// Waits up to `timeout` for one event and handles it.
    pub fn wait_event(&mut self, timeout: Duration) -> Option<CameraEvent> {
        match self.events_rx.recv_timeout(timeout) {
            Ok(event) => {
                self.handle_event(&event);
                Some(event)
            },
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    fn handle_event(&mut self, event: &CameraEvent) {
        if !self.is_current(event.device()) {
            #[cfg(feature = "tracing")]
            asimov_module::tracing::debug!(
                target: "asimov_camera_preview",
                event = ?event,
                state = ?self.state,
                "ignoring event for another session"
            );
            return;
        }
        match event {
            CameraEvent::Opened { device, .. } => {
                self.state = DeviceState::Open(device.clone());
                self.host.notify(MSG_CONNECTED);
            },
            CameraEvent::Disconnected { device: _device, .. } => {
                #[cfg(feature = "tracing")]
                asimov_module::tracing::warn!(
                    target: "asimov_camera_preview",
                    device = %_device,
                    "camera disconnected"
                );
                self.release_after_failure();
            },
            CameraEvent::Error { device: _device, code: _code, .. } => {
                #[cfg(feature = "tracing")]
                asimov_module::tracing::error!(
                    target: "asimov_camera_preview",
                    device = %_device,
                    code = _code,
                    "camera device error"
                );
                self.release_after_failure();
            },
            CameraEvent::Closed { .. } => {},
        }
    }

    /// Whether `device` is the one being opened or held open. Events for
    /// anything else, including any event while idle, are stale.
    fn is_current(&self, device: &DeviceId) -> bool {
        match &self.state {
            DeviceState::Idle => false,
            DeviceState::Opening(id) | DeviceState::Open(id) => id == device,
        }
    }

    fn release_after_failure(&mut self) {
        self.state = DeviceState::Idle;
        if let Err(_err) = lock(&self.driver).close_device() {
            #[cfg(feature = "tracing")]
            asimov_module::tracing::warn!(
                target: "asimov_camera_preview",
                error = %_err,
                "camera close after failure failed"
            );
        }
    }
}

impl<H: PreviewHost> Drop for PreviewController<H> {
    fn drop(&mut self) {
        let _ = self.on_pause();
    }
}

fn lock(driver: &SharedDriver) -> MutexGuard<'_, Box<dyn CameraDriver>> {
    driver.lock().unwrap_or_else(PoisonError::into_inner)
}
