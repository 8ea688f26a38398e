// This is free and unencumbered software released into the public domain.

use crate::shared::{CameraError, DeviceDescriptor, DeviceId};
use std::{
    any::Any,
    sync::mpsc::Sender,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraBackend {
    Android,
    Catalog,
}

/// Asynchronous outcome of a device-open request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CameraEvent {
    Opened {
        backend: CameraBackend,
        device: DeviceId,
    },
    Disconnected {
        backend: CameraBackend,
        device: DeviceId,
    },
    Error {
        backend: CameraBackend,
        device: DeviceId,
        code: i32,
    },
    Closed {
        backend: CameraBackend,
        device: DeviceId,
    },
}

impl CameraEvent {
    pub fn device(&self) -> &DeviceId {
        match self {
            Self::Opened { device, .. }
            | Self::Disconnected { device, .. }
            | Self::Error { device, .. }
            | Self::Closed { device, .. } => device,
        }
    }
}

/// The host camera framework: enumeration and device lifecycle.
pub trait CameraDriver: Send {
    fn backend(&self) -> CameraBackend;

    fn devices(&self) -> Result<Vec<DeviceDescriptor>, CameraError>;

    /// Requests the device be opened. Completion is reported on `events_tx`
    /// as `Opened`, `Disconnected` or `Error`.
    fn open_device(
        &mut self,
        id: &DeviceId,
        events_tx: Sender<CameraEvent>,
    ) -> Result<(), CameraError>;

    fn close_device(&mut self) -> Result<(), CameraError> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Delivers an event without blocking the caller. Lifecycle events are
/// never dropped; a controller that has gone away simply misses them.
pub fn send_event(events_tx: &Sender<CameraEvent>, event: CameraEvent) {
    if let Err(_err) = events_tx.send(event) {
        #[cfg(feature = "tracing")]
        asimov_module::tracing::debug!(
            target: "asimov_camera_preview",
            event = ?_err.0,
            "camera event receiver gone"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    #[test]
    fn send_event_keeps_every_event_in_order() {
        let (tx, rx) = channel();
        for i in 0..32 {
            send_event(
                &tx,
                CameraEvent::Closed {
                    backend: CameraBackend::Catalog,
                    device: i.to_string().into(),
                },
            );
        }
        let opened = CameraEvent::Opened {
            backend: CameraBackend::Catalog,
            device: "0".into(),
        };
        send_event(&tx, opened.clone());

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events.len(), 33);
        assert_eq!(events[0].device().as_str(), "0");
        assert_eq!(events.last(), Some(&opened));
    }

    #[test]
    fn send_event_ignores_dropped_receiver() {
        let (tx, rx) = channel();
        drop(rx);
        send_event(
            &tx,
            CameraEvent::Disconnected {
                backend: CameraBackend::Android,
                device: "1".into(),
            },
        );
    }

    #[test]
    fn event_exposes_device() {
        let event = CameraEvent::Error {
            backend: CameraBackend::Android,
            device: "2".into(),
            code: 4,
        };
        assert_eq!(event.device().as_str(), "2");
    }
}
