use crate::fragment::SlideFragment;

/// The dedup gate: remembers the last fragment that was dispatched.
///
/// Observations that fail the format gate never touch `last_notified`, so it
/// tracks the most recently *dispatched* fragment rather than the most
/// recently observed one. Mutation goes through `&mut self`; whoever owns the
/// gate serializes every check against it.
#[derive(Clone, Debug, Default)]
pub struct FragmentState {
    last_notified: String,
}

impl FragmentState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_notified(&self) -> &str {
        &self.last_notified
    }

    /// Decide whether `observed` should be dispatched.
    ///
    /// Returns the fragment to send when it is a slide fragment that differs
    /// from the last dispatched one. The gate is committed here, before any
    /// network activity, so a slow or failed delivery is never retried by a
    /// later check.
    pub fn admit(&mut self, observed: &str) -> Option<SlideFragment> {
        let fragment = SlideFragment::parse(observed)?;
        if fragment.as_str() == self.last_notified {
            return None;
        }
        self.last_notified.clear();
        self.last_notified.push_str(fragment.as_str());
        Some(fragment)
    }
}
