//! Action queue that serializes work onto the UI thread
//!
//! Producers on any thread post closures; the main loop applies at most one
//! per iteration through [`UiQueue::drain_one`], so state owned by the UI
//! thread is never touched from two threads at once.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

/// A unit of work applied to the UI-owned state
pub type UiAction<S> = Box<dyn FnOnce(&mut S) + Send + 'static>;

/// Consumer side, owned by the main loop
pub struct UiQueue<S> {
    tx: Sender<UiAction<S>>,
    rx: Receiver<UiAction<S>>,
}

impl<S> UiQueue<S> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    /// Returns a producer handle that can be moved to other threads
    pub fn sender(&self) -> UiSender<S> {
        UiSender {
            tx: self.tx.clone(),
        }
    }

    /// Applies the oldest queued action, if any
    ///
    /// Returns true when an action ran.
    pub fn drain_one(&self, state: &mut S) -> bool {
        match self.rx.try_recv() {
            Ok(action) => {
                action(state);
                true
            }
            Err(_) => false,
        }
    }

    /// Runs `work` on a worker thread and queues `on_complete` with its result
    pub fn run_async<T, W, C>(&self, work: W, on_complete: C) -> JoinHandle<()>
    where
        T: Send + 'static,
        W: FnOnce() -> T + Send + 'static,
        C: FnOnce(&mut S, T) + Send + 'static,
        S: 'static,
    {
        let sender = self.sender();
        thread::spawn(move || {
            let result = work();
            sender.post(move |state| on_complete(state, result));
        })
    }
}

impl<S> Default for UiQueue<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer side of a [`UiQueue`]
pub struct UiSender<S> {
    tx: Sender<UiAction<S>>,
}

impl<S> UiSender<S> {
    /// Queues an action; returns false once the queue has been dropped
    pub fn post(&self, action: impl FnOnce(&mut S) + Send + 'static) -> bool {
        self.tx.send(Box::new(action)).is_ok()
    }
}

impl<S> Clone for UiSender<S> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}
