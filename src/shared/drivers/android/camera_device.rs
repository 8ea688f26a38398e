// This is free and unencumbered software released into the public domain.

use super::{CameraResult, CameraStatus};
use crate::shared::{CameraBackend, CameraEvent, DeviceId, send_event};
use alloc::boxed::Box;
use core::{
    ffi::{c_int, c_void},
    ptr::null_mut,
};
use ndk_sys::{ACameraDevice, ACameraDevice_StateCallbacks, ACameraDevice_close};
use std::sync::mpsc::Sender;

/// Shared with the NDK through the callbacks' `context` pointer.
#[derive(Debug)]
pub(crate) struct DeviceContext {
    pub(crate) device_id: DeviceId,
    pub(crate) events_tx: Sender<CameraEvent>,
}

/// An open camera. Closing happens on drop.
#[derive(Debug)]
pub struct CameraDevice {
    pub(crate) handle: *mut ACameraDevice,
    // Both boxes must outlive `handle`; the NDK keeps pointers to them.
    pub(crate) state_callbacks: Box<ACameraDevice_StateCallbacks>,
    pub(crate) context: Box<DeviceContext>,
}

impl Drop for CameraDevice {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

impl CameraDevice {
    pub(crate) fn new(device_id: DeviceId, events_tx: Sender<CameraEvent>) -> Self {
        let context = Box::new(DeviceContext {
            device_id,
            events_tx,
        });
        let state_callbacks = Box::new(ACameraDevice_StateCallbacks {
            context: (&*context as *const DeviceContext) as *mut c_void,
            onDisconnected: Some(on_disconnected),
            onError: Some(on_error),
        });
        Self {
            handle: null_mut(),
            state_callbacks,
            context,
        }
    }

    pub fn id(&self) -> &DeviceId {
        &self.context.device_id
    }

    /// See: https://developer.android.com/ndk/reference/group/camera#acameradevice_close
    pub fn close(&mut self) -> CameraResult {
        if self.handle.is_null() {
            return Ok(());
        }
        let status = unsafe { ACameraDevice_close(self.handle) };
        self.handle = null_mut();
        CameraStatus::check(status)?;
        send_event(
            &self.context.events_tx,
            CameraEvent::Closed {
                backend: CameraBackend::Android,
                device: self.context.device_id.clone(),
            },
        );
        Ok(())
    }
}

unsafe extern "C" fn on_disconnected(context: *mut c_void, _device: *mut ACameraDevice) {
    let Some(ctx) = (unsafe { (context as *const DeviceContext).as_ref() }) else {
        return;
    };
    send_event(
        &ctx.events_tx,
        CameraEvent::Disconnected {
            backend: CameraBackend::Android,
            device: ctx.device_id.clone(),
        },
    );
}

unsafe extern "C" fn on_error(context: *mut c_void, _device: *mut ACameraDevice, error: c_int) {
    let Some(ctx) = (unsafe { (context as *const DeviceContext).as_ref() }) else {
        return;
    };
    send_event(
        &ctx.events_tx,
        CameraEvent::Error {
            backend: CameraBackend::Android,
            device: ctx.device_id.clone(),
            code: error as i32,
        },
    );
}
