use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace};

use crate::config::NotifierConfig;
use crate::dispatch::Dispatch;
use crate::gate::FragmentState;
use crate::location::{FragmentSource, LocationObserver};

/// What woke the detector up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// Recurring poll timer
    Tick,
    /// The page reported a fragment change
    FragmentChanged,
}

/// Detector, dedup gate and dispatcher composed into one check path.
pub struct SlideChangeNotifier<S, D> {
    source: S,
    state: FragmentState,
    dispatcher: D,
}

impl<S: FragmentSource, D: Dispatch> SlideChangeNotifier<S, D> {
    pub fn new(source: S, dispatcher: D) -> Self {
        Self {
            source,
            state: FragmentState::new(),
            dispatcher,
        }
    }

    pub fn state(&self) -> &FragmentState {
        &self.state
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Read the current fragment and dispatch it if it is a new slide.
    ///
    /// Safe to call at any time and from any trigger; repeated calls without
    /// a fragment change do nothing. Returns whether a notification went out.
    /// The gate is committed before the dispatcher runs and delivery outcome
    /// never reaches this path.
    pub fn check_for_change(&mut self) -> bool {
        let observed = self.source.current_fragment();
        match self.state.admit(&observed) {
            Some(fragment) => {
                debug!("Slide fragment changed to {}", fragment);
                self.dispatcher.dispatch(fragment);
                true
            }
            None => false,
        }
    }

    /// Handle one trigger. Both triggers take the same path.
    pub fn on_trigger(&mut self, trigger: Trigger) -> bool {
        trace!("Checking fragment on {:?}", trigger);
        self.check_for_change()
    }
}

/// Spawn the notifier loop for a page.
///
/// One task owns the gate and `select!`s between the poll timer and the
/// page's fragment-changed notification, so every check against the gate is
/// serialized. The task ends when the [`PageLocation`](crate::PageLocation)
/// is dropped.
pub fn spawn_notifier<D>(
    observer: LocationObserver,
    dispatcher: D,
    config: &NotifierConfig,
) -> tokio::task::JoinHandle<()>
where
    D: Dispatch + Send + 'static,
{
    let poll_interval = config.poll_interval;
    tokio::spawn(run_notifier(observer, dispatcher, poll_interval))
}

async fn run_notifier<D: Dispatch>(
    mut observer: LocationObserver,
    dispatcher: D,
    poll_interval: Duration,
) {
    info!(
        "Watching slide fragment (poll interval: {:?})",
        poll_interval
    );

    let mut notifier = SlideChangeNotifier::new(observer.clone(), dispatcher);
    let mut tick_interval = tokio::time::interval(poll_interval);
    tick_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let trigger = tokio::select! {
            _ = tick_interval.tick() => Trigger::Tick,
            changed = observer.fragment_changed() => {
                if !changed {
                    break;
                }
                Trigger::FragmentChanged
            }
        };
        notifier.on_trigger(trigger);
    }

    info!("Page location closed, slide notifier stopped");
}
