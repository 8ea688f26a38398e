// This is free and unencumbered software released into the public domain.

use crate::shared::CameraError;
use std::{
    sync::mpsc::{Receiver, Sender, channel},
    thread::JoinHandle,
};

pub type Job = Box<dyn FnOnce() + Send + 'static>;

enum WorkerMsg {
    Run(Job),
    Quit,
}

/// A single named thread running posted jobs in order.
///
/// Camera open and close callbacks run here so they never block the thread
/// that owns the preview surface.
#[derive(Debug, Default)]
pub struct BackgroundWorker {
    tx: Option<Sender<WorkerMsg>>,
    join: Option<JoinHandle<()>>,
}

impl BackgroundWorker {
    pub fn start(name: impl Into<String>) -> Result<Self, CameraError> {
        let (tx, rx) = channel::<WorkerMsg>();
        let join = std::thread::Builder::new()
            .name(name.into())
            .spawn(move || run(rx))
            .map_err(|e| CameraError::driver("spawning the background worker", e))?;

        Ok(Self {
            tx: Some(tx),
            join: Some(join),
        })
    }

    pub fn is_running(&self) -> bool {
        self.tx.is_some()
    }

    pub fn post(&self, job: impl FnOnce() + Send + 'static) -> Result<(), CameraError> {
        let tx = self.tx.as_ref().ok_or(CameraError::WorkerStopped)?;
        tx.send(WorkerMsg::Run(Box::new(job)))
            .map_err(|_| CameraError::WorkerStopped)
    }

    /// Lets already-queued jobs finish, then joins the thread.
    pub fn stop(&mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(WorkerMsg::Quit);
        }
        if let Some(j) = self.join.take() {
            if j.join().is_err() {
                #[cfg(feature = "tracing")]
                asimov_module::tracing::error!(
                    target: "asimov_camera_preview",
                    "background worker panicked"
                );
            }
        }
    }
}

impl Drop for BackgroundWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run(rx: Receiver<WorkerMsg>) {
    while let Ok(msg) = rx.recv() {
        match msg {
            WorkerMsg::Run(job) => job(),
            WorkerMsg::Quit => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    };
    use std::time::Duration;

    #[test]
    fn queued_jobs_finish_before_stop_returns() {
        let mut worker = BackgroundWorker::start("test-worker").unwrap();
        let done = Arc::new(AtomicUsize::new(0));
        for _ in 0..16 {
            let done = Arc::clone(&done);
            worker
                .post(move || {
                    std::thread::sleep(Duration::from_millis(1));
                    done.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
        }
        worker.stop();
        assert_eq!(done.load(Ordering::SeqCst), 16);
        assert!(!worker.is_running());
    }

    #[test]
    fn jobs_run_in_order_on_the_named_thread() {
        let mut worker = BackgroundWorker::start("camera-bg").unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for i in 0..4 {
            let seen = Arc::clone(&seen);
            worker
                .post(move || {
                    let name = std::thread::current().name().map(str::to_string);
                    seen.lock().unwrap().push((i, name));
                })
                .unwrap();
        }
        worker.stop();
        let seen = seen.lock().unwrap();
        assert_eq!(seen.iter().map(|(i, _)| *i).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert!(seen.iter().all(|(_, n)| n.as_deref() == Some("camera-bg")));
    }

    #[test]
    fn post_after_stop_fails() {
        let mut worker = BackgroundWorker::start("stopped").unwrap();
        worker.stop();
        worker.stop();
        assert!(matches!(worker.post(|| {}), Err(CameraError::WorkerStopped)));
        assert!(matches!(
            BackgroundWorker::default().post(|| {}),
            Err(CameraError::WorkerStopped)
        ));
    }

    #[test]
    fn debug_shows_whether_running() {
        let mut worker = BackgroundWorker::start("debug").unwrap();
        assert!(format!("{worker:?}").contains("tx: Some"));
        worker.stop();
        assert!(format!("{worker:?}").contains("tx: None"));
    }
}
