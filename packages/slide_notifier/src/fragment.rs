use std::fmt;

/// Literal prefix every slide fragment starts with.
pub const SLIDE_PREFIX: &str = "#slide=";

/// A URL fragment that names a slide, e.g. `#slide=id.g12345`.
///
/// Only constructible through [`SlideFragment::parse`], so holding one means
/// the value already passed the format gate.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SlideFragment(String);

impl SlideFragment {
    /// Accept a raw fragment if it is non-empty and starts with `#slide=`.
    ///
    /// Anything else (`""`, `#overview`, `#slide`, `slide=3`) is treated as
    /// absent.
    pub fn parse(raw: &str) -> Option<Self> {
        if !raw.is_empty() && raw.starts_with(SLIDE_PREFIX) {
            Some(Self(raw.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Text after the `#slide=` marker (may be empty for a bare `#slide=`).
    pub fn slide_ref(&self) -> &str {
        &self.0[SLIDE_PREFIX.len()..]
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SlideFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SlideFragment {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
