//! Host page location.
//!
//! Stands in for the browser's `window.location.hash` plus its `hashchange`
//! event. The host side owns a [`PageLocation`] and navigates it; the notifier
//! holds [`LocationObserver`]s that read the current fragment and wait for
//! change notifications. Dropping the `PageLocation` is the page context going
//! away.

use tokio::sync::watch;

/// Anything the detector can read the current fragment from.
pub trait FragmentSource {
    /// Current URL fragment, including the leading `#`, or `""` when none.
    fn current_fragment(&self) -> String;
}

/// Writer half: the page whose fragment changes as the presenter navigates.
#[derive(Debug)]
pub struct PageLocation {
    tx: watch::Sender<String>,
}

/// Reader half: ambient fragment reads plus fragment-changed notifications.
#[derive(Clone, Debug)]
pub struct LocationObserver {
    rx: watch::Receiver<String>,
}

impl PageLocation {
    /// A fresh page with an empty fragment.
    pub fn new() -> (Self, LocationObserver) {
        Self::with_fragment("")
    }

    pub fn with_fragment(initial: impl Into<String>) -> (Self, LocationObserver) {
        let (tx, rx) = watch::channel(initial.into());
        (Self { tx }, LocationObserver { rx })
    }

    /// Navigate to a new fragment.
    ///
    /// Observers are notified only when the value actually differs, like
    /// `hashchange` which does not fire when the same hash is assigned again.
    /// Returns whether a change notification was raised.
    pub fn set_fragment(&self, fragment: impl Into<String>) -> bool {
        let fragment = fragment.into();
        self.tx.send_if_modified(|current| {
            if *current == fragment {
                false
            } else {
                *current = fragment;
                true
            }
        })
    }

    pub fn fragment(&self) -> String {
        self.tx.borrow().clone()
    }

    /// Another observer of this page.
    pub fn observe(&self) -> LocationObserver {
        LocationObserver {
            rx: self.tx.subscribe(),
        }
    }
}

impl LocationObserver {
    /// Wait for the next fragment change.
    ///
    /// Returns `false` once the page is gone and no change is pending.
    /// Cancel safe, so it can sit in a `tokio::select!` next to a timer.
    pub async fn fragment_changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

impl FragmentSource for LocationObserver {
    fn current_fragment(&self) -> String {
        self.rx.borrow().clone()
    }
}
