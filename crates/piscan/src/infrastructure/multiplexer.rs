//! Device multiplexer: one reader thread per device, one merged queue.
//!
//! ```text
//!  DeviceSource ─► reader thread ─┐
//!  DeviceSource ─► reader thread ─┼─► unbounded mpsc ─► RunningMultiplexer::next_event()
//!  DeviceSource ─► reader thread ─┘
//! ```
//!
//! # Two-phase lifecycle (for beginners)
//!
//! A [`DeviceMultiplexer`] is a plain collection of sources.  Devices can be
//! added or withdrawn freely while it is in this state.  Calling
//! [`DeviceMultiplexer::start`] *consumes* it: every source is grabbed, moved
//! into its own reader thread, and a [`RunningMultiplexer`] comes back.  The
//! running type has no way to add or remove devices, so "remove a device after
//! reading started" is not something the compiler will let you write.
//!
//! # Ordering
//!
//! Each reader pushes its events in the order it read them, so per-device
//! order survives the merge.  Across devices the interleaving is whatever
//! order the reads completed in.
//!
//! # Failure
//!
//! When a read fails the reader queues one [`DeviceMessage::Failed`] after all
//! the events it already read, then exits.  The consumer sees it as
//! [`MultiplexError::DeviceLost`], which is fatal for the whole session.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use piscan_core::{DeviceId, DeviceInfo, RawKeyEvent};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::infrastructure::device::{DeviceError, DeviceSource};

/// Error type for multiplexer operations.
#[derive(Debug, Error)]
pub enum MultiplexError {
    #[error("failed to grab {device_id}: {source}")]
    GrabFailed {
        device_id: DeviceId,
        #[source]
        source: DeviceError,
    },

    #[error("failed to spawn reader thread for {device_id}: {source}")]
    SpawnFailed {
        device_id: DeviceId,
        #[source]
        source: std::io::Error,
    },

    #[error("lost device {device_id}: {source}")]
    DeviceLost {
        device_id: DeviceId,
        #[source]
        source: DeviceError,
    },

    #[error("all device sources closed")]
    AllSourcesClosed,
}

/// An item on the merged queue.
#[derive(Debug)]
pub enum DeviceMessage {
    Event(RawKeyEvent),
    /// The reader for `device_id` hit a read error and has exited.
    Failed {
        device_id: DeviceId,
        error: DeviceError,
    },
}

// ── Not yet started ───────────────────────────────────────────────────────────

/// A set of device sources that have not started reading yet.
#[derive(Default)]
pub struct DeviceMultiplexer {
    sources: Vec<Box<dyn DeviceSource>>,
}

impl DeviceMultiplexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_source(&mut self, source: impl DeviceSource) {
        self.add_boxed(Box::new(source));
    }

    pub fn add_boxed(&mut self, source: Box<dyn DeviceSource>) {
        debug!(device = %source.id(), "adding device source");
        self.sources.push(source);
    }

    /// Withdraws a device before reading starts.
    ///
    /// Returns the source if it was present.  No reader thread is ever
    /// created for a withdrawn source.
    pub fn remove_device(&mut self, device_id: &DeviceId) -> Option<Box<dyn DeviceSource>> {
        let index = self.sources.iter().position(|s| s.id() == device_id)?;
        Some(self.sources.remove(index))
    }

    pub fn device_ids(&self) -> Vec<DeviceId> {
        self.sources.iter().map(|s| s.id().clone()).collect()
    }

    pub fn device_infos(&self) -> Vec<DeviceInfo> {
        self.sources.iter().map(|s| s.info().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Grabs every source and starts one reader thread per source.
    ///
    /// All grabs happen before any thread is spawned, so a grab failure leaves
    /// no reader running.  Readers stop after their current read once
    /// `running` is cleared.
    ///
    /// # Errors
    ///
    /// - [`MultiplexError::GrabFailed`] if any source refuses the grab.
    /// - [`MultiplexError::SpawnFailed`] if the OS refuses a new thread; the
    ///   readers already started are told to stop.
    pub fn start(self, running: Arc<AtomicBool>) -> Result<RunningMultiplexer, MultiplexError> {
        let mut sources = self.sources;

        for source in sources.iter_mut() {
            source
                .grab()
                .map_err(|source_err| MultiplexError::GrabFailed {
                    device_id: source.id().clone(),
                    source: source_err,
                })?;
            debug!(device = %source.id(), "grabbed for exclusive use");
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let mut device_ids = Vec::with_capacity(sources.len());

        for (n, source) in sources.into_iter().enumerate() {
            let device_id = source.id().clone();
            let tx = tx.clone();
            let running_reader = Arc::clone(&running);

            let spawned = std::thread::Builder::new()
                .name(format!("piscan-reader-{n}"))
                .spawn(move || reader_loop(source, tx, running_reader));

            if let Err(source) = spawned {
                running.store(false, Ordering::Relaxed);
                return Err(MultiplexError::SpawnFailed { device_id, source });
            }
            device_ids.push(device_id);
        }

        info!(devices = device_ids.len(), "device readers started");
        Ok(RunningMultiplexer {
            rx,
            running,
            device_ids,
        })
    }
}

impl FromIterator<Box<dyn DeviceSource>> for DeviceMultiplexer {
    fn from_iter<I: IntoIterator<Item = Box<dyn DeviceSource>>>(iter: I) -> Self {
        Self {
            sources: iter.into_iter().collect(),
        }
    }
}

/// Body of one reader thread.
fn reader_loop(
    mut source: Box<dyn DeviceSource>,
    tx: mpsc::UnboundedSender<DeviceMessage>,
    running: Arc<AtomicBool>,
) {
    let device_id = source.id().clone();

    while running.load(Ordering::Relaxed) {
        match source.read_event() {
            Ok(event) => {
                if tx.send(DeviceMessage::Event(event)).is_err() {
                    debug!(device = %device_id, "merged queue closed; reader exiting");
                    break;
                }
            }
            Err(DeviceError::Closed) => {
                debug!(device = %device_id, "device source closed");
                break;
            }
            Err(error) => {
                warn!(device = %device_id, "device read failed: {error}");
                let _ = tx.send(DeviceMessage::Failed { device_id, error });
                return;
            }
        }
    }
}

// ── Running ───────────────────────────────────────────────────────────────────

/// The consumer end of a started multiplexer.
pub struct RunningMultiplexer {
    rx: mpsc::UnboundedReceiver<DeviceMessage>,
    running: Arc<AtomicBool>,
    device_ids: Vec<DeviceId>,
}

impl RunningMultiplexer {
    /// Waits for the next event from any device.
    ///
    /// # Errors
    ///
    /// - [`MultiplexError::DeviceLost`] when a reader reports a read failure.
    /// - [`MultiplexError::AllSourcesClosed`] when every reader has exited
    ///   without failing.
    pub async fn next_event(&mut self) -> Result<RawKeyEvent, MultiplexError> {
        match self.rx.recv().await {
            Some(DeviceMessage::Event(event)) => Ok(event),
            Some(DeviceMessage::Failed { device_id, error }) => Err(MultiplexError::DeviceLost {
                device_id,
                source: error,
            }),
            None => Err(MultiplexError::AllSourcesClosed),
        }
    }

    /// Tells every reader to exit after its current read.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    pub fn device_ids(&self) -> &[DeviceId] {
        &self.device_ids
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
