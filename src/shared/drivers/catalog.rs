// This is free and unencumbered software released into the public domain.

//! A driver backed by a JSON device catalog instead of camera hardware.
//!
//! Accepted shapes are `{"devices": [...]}` or a bare array of entries. Each
//! entry is a device descriptor, optionally with `"open_error": <code>` to make
//! opening that device fail with the given error code.

use crate::shared::{
    CameraBackend, CameraDriver, CameraError, CameraEvent, DeviceDescriptor, DeviceId,
    send_event,
};
use alloc::borrow::Cow;
use serde::{Deserialize, Serialize};
use std::{any::Any, path::Path, sync::mpsc::Sender};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub descriptor: DeviceDescriptor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_error: Option<i32>,
}

impl From<DeviceDescriptor> for CatalogEntry {
    fn from(descriptor: DeviceDescriptor) -> Self {
        Self {
            descriptor,
            open_error: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Wrapped { devices: Vec<CatalogEntry> },
    Bare(Vec<CatalogEntry>),
}

#[derive(Debug, Default)]
pub struct CatalogCameraDriver {
    entries: Vec<CatalogEntry>,
    open: Option<DeviceId>,
    events_tx: Option<Sender<CameraEvent>>,
}

impl CatalogCameraDriver {
    pub fn new(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn from_descriptors(descriptors: impl IntoIterator<Item = DeviceDescriptor>) -> Self {
        Self::new(descriptors.into_iter().map(CatalogEntry::from))
    }

    pub fn from_json(json: &str) -> Result<Self, CameraError> {
        let file: CatalogFile = serde_json::from_str(json)
            .map_err(|e| CameraError::driver("parsing the device catalog", e))?;
        let entries = match file {
            CatalogFile::Wrapped { devices } => devices,
            CatalogFile::Bare(devices) => devices,
        };
        Ok(Self::new(entries))
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, CameraError> {
        let json = std::fs::read_to_string(path.as_ref())
            .map_err(|e| CameraError::driver("reading the device catalog", e))?;
        Self::from_json(&json)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn open_device_id(&self) -> Option<&DeviceId> {
        self.open.as_ref()
    }
}

impl dogma::Named for CatalogCameraDriver {
    fn name(&self) -> Cow<'_, str> {
        "catalog".into()
    }
}

impl CameraDriver for CatalogCameraDriver {
    fn backend(&self) -> CameraBackend {
        CameraBackend::Catalog
    }

    fn devices(&self) -> Result<Vec<DeviceDescriptor>, CameraError> {
        Ok(self.entries.iter().map(|e| e.descriptor.clone()).collect())
    }

    fn open_device(
        &mut self,
        id: &DeviceId,
        events_tx: Sender<CameraEvent>,
    ) -> Result<(), CameraError> {
        let entry = self
            .entries
            .iter()
            .find(|e| &e.descriptor.id == id)
            .cloned()
            .ok_or_else(|| CameraError::access_denied(format!("unknown camera id {id:?}")))?;

        if self.open.is_some() {
            self.close_device()?;
        }

        if let Some(code) = entry.open_error {
            send_event(
                &events_tx,
                CameraEvent::Error {
                    backend: CameraBackend::Catalog,
                    device: id.clone(),
                    code,
                },
            );
            return Ok(());
        }

        self.open = Some(id.clone());
        send_event(
            &events_tx,
            CameraEvent::Opened {
                backend: CameraBackend::Catalog,
                device: id.clone(),
            },
        );
        self.events_tx = Some(events_tx);
        Ok(())
    }

    fn close_device(&mut self) -> Result<(), CameraError> {
        if let Some(device) = self.open.take() {
            if let Some(tx) = self.events_tx.take() {
                send_event(
                    &tx,
                    CameraEvent::Closed {
                        backend: CameraBackend::Catalog,
                        device,
                    },
                );
            }
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
