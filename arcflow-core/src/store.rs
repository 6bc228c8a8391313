// arcflow-core store
// Copyright (C) 2021-2026  Daniel Lambert. Licensed under GPL-3.0-or-later, see /COPYING file for details
//! Owns the mutable `State` reference, serializes actions through an unbounded FIFO
//! channel, and orchestrates effects (§4.4, §5).

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, watch, Notify};
use tokio::task::JoinHandle;
use tracing::{trace, warn};

use crate::effects::{self, Collaborators};
use crate::reducer::reduce;
use crate::types::{Action, RootState};

type Listener = Box<dyn Fn(&RootState) + Send + Sync>;

/// Handle returned by [`Store::on_state_changed`], used to unsubscribe via
/// [`Store::off`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerHandle(u64);

struct ListenerEntry {
    handle: ListenerHandle,
    listener: Listener,
}

static LISTENER_IDS: AtomicU64 = AtomicU64::new(0);

impl ListenerHandle {
    fn next() -> Self {
        Self(LISTENER_IDS.fetch_add(1, Ordering::Relaxed))
    }
}

/// A single-writer, many-reader state container (§4.4).
///
/// One worker task, spawned by [`Store::spawn`], drains the action channel in FIFO
/// order; reduction, listener notification, and effect dispatch all happen on that
/// worker. Callers only ever see immutable snapshots.
pub struct Store {
    action_tx: mpsc::UnboundedSender<Action>,
    state_rx: watch::Receiver<RootState>,
    listeners: Arc<Mutex<Vec<ListenerEntry>>>,
    disposed: Arc<AtomicBool>,
    dispose_notify: Arc<Notify>,
    worker: Option<JoinHandle<()>>,
}

struct Worker {
    state: RootState,
    action_rx: mpsc::UnboundedReceiver<Action>,
    action_tx: mpsc::UnboundedSender<Action>,
    state_tx: watch::Sender<RootState>,
    listeners: Arc<Mutex<Vec<ListenerEntry>>>,
    collaborators: Collaborators,
    disposed: Arc<AtomicBool>,
    dispose_notify: Arc<Notify>,
}

impl Store {
    /// Spawns the processing loop on the current Tokio runtime and returns the handle
    /// used to drive it.
    #[must_use]
    pub fn spawn(collaborators: Collaborators) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(RootState::default());
        let listeners = Arc::new(Mutex::new(Vec::new()));
        let disposed = Arc::new(AtomicBool::new(false));
        let dispose_notify = Arc::new(Notify::new());

        let mut worker = Worker {
            state: RootState::default(),
            action_rx,
            action_tx: action_tx.clone(),
            state_tx,
            listeners: Arc::clone(&listeners),
            collaborators,
            disposed: Arc::clone(&disposed),
            dispose_notify: Arc::clone(&dispose_notify),
        };
        let handle = tokio::spawn(async move {
            worker.run().await;
        });

        Self {
            action_tx,
            state_rx,
            listeners,
            disposed,
            dispose_notify,
            worker: Some(handle),
        }
    }

    /// Enqueues `action` onto the FIFO channel. Returns once enqueued; silently dropped
    /// once [`Store::dispose`] has run (§4.4).
    pub fn dispatch(&self, action: Action) {
        if self.disposed.load(Ordering::Acquire) {
            warn!(?action, "dispatch after dispose: dropped");
            return;
        }
        if self.action_tx.send(action).is_err() {
            warn!("dispatch failed: worker already stopped");
        }
    }

    /// The current state snapshot.
    #[must_use]
    pub fn state(&self) -> RootState {
        self.state_rx.borrow().clone()
    }

    /// Registers `listener` to be called, in registration order, synchronously after
    /// every reduction.
    ///
    /// # Panics
    /// Panics if the listener registry's mutex is poisoned by a prior panicking listener.
    pub fn on_state_changed(&self, listener: impl Fn(&RootState) + Send + Sync + 'static) -> ListenerHandle {
        let handle = ListenerHandle::next();
        self.listeners
            .lock()
            .expect("listener mutex poisoned")
            .push(ListenerEntry {
                handle,
                listener: Box::new(listener),
            });
        handle
    }

    /// Unsubscribes a listener previously registered with [`Store::on_state_changed`].
    ///
    /// # Panics
    /// Panics if the listener registry's mutex is poisoned by a prior panicking listener.
    pub fn off(&self, handle: ListenerHandle) {
        self.listeners
            .lock()
            .expect("listener mutex poisoned")
            .retain(|entry| entry.handle != handle);
    }

    /// Stops the processing task once its current iteration finishes and closes the
    /// channel. Subsequent `dispatch` calls are silently dropped. Cancellation is
    /// cooperative (§5): any effect already in flight runs to completion, only its
    /// subsequent dispatches are dropped.
    pub async fn dispose(&mut self) {
        self.disposed.store(true, Ordering::Release);
        self.dispose_notify.notify_one();
        if let Some(handle) = self.worker.take() {
            let _ = handle.await;
        }
    }
}

impl Worker {
    async fn run(&mut self) {
        loop {
            let action = tokio::select! {
                biased;
                () = self.dispose_notify.notified() => {
                    trace!("store disposed while idle, worker exiting");
                    self.action_rx.close();
                    return;
                }
                action = self.action_rx.recv() => action,
            };
            let Some(action) = action else {
                trace!("action channel closed, worker exiting");
                return;
            };

            let old_state = std::mem::take(&mut self.state);
            self.state = reduce(old_state, action.clone());
            let _ = self.state_tx.send(self.state.clone());

            {
                let listeners = self.listeners.lock().expect("listener mutex poisoned");
                for entry in listeners.iter() {
                    (entry.listener)(&self.state);
                }
            }

            effects::run_effects(&action, &self.state, &self.action_tx, &self.collaborators).await;

            if self.disposed.load(Ordering::Acquire) {
                trace!("store disposed, worker exiting after completing its in-flight effect");
                self.action_rx.close();
                return;
            }
        }
    }
}
