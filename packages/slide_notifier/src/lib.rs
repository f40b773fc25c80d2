//! Slide Notifier - report presentation slide changes to a local listener
//!
//! A presentation page encodes its visible slide in the URL fragment
//! (`#slide=...`). This crate watches that fragment from two trigger sources,
//! a fixed-interval poll and the fragment-changed notification, and sends each
//! new slide fragment to `http://127.0.0.1:8765/slide-change?hash=...` as a
//! fire-and-forget GET.
//!
//! # Example
//!
//! ```no_run
//! use slide_notifier::{HttpDispatcher, NotifierConfig, PageLocation, spawn_notifier};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = NotifierConfig::default();
//!     let dispatcher = HttpDispatcher::new(config.target.clone()).unwrap();
//!
//!     let (location, observer) = PageLocation::new();
//!     let handle = spawn_notifier(observer, dispatcher, &config);
//!
//!     location.set_fragment("#slide=id.g12345");
//!
//!     // Dropping the location tears down the page context and ends the loop.
//!     drop(location);
//!     handle.await.unwrap();
//! }
//! ```

pub mod config;
mod dispatch;
mod error;
pub mod fragment;
mod gate;
pub mod location;
mod notifier;

pub use config::NotifierConfig;
pub use dispatch::{DEFAULT_BASE_URL, Dispatch, HttpDispatcher, NotificationTarget};
pub use error::{DeliveryFailure, NotifierError};
pub use fragment::{SLIDE_PREFIX, SlideFragment};
pub use gate::FragmentState;
pub use location::{FragmentSource, LocationObserver, PageLocation};
pub use notifier::{SlideChangeNotifier, Trigger, spawn_notifier};
