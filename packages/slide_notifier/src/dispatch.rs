use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{DeliveryFailure, NotifierError};
use crate::fragment::SlideFragment;

/// Where the local slide listener lives unless configured otherwise.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8765";

const SLIDE_CHANGE_PATH: &str = "/slide-change";

/// Fixed destination for slide-change notifications.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationTarget {
    base_url: String,
}

impl NotificationTarget {
    /// Validate an `http`/`https` base URL. A trailing `/` is dropped.
    pub fn new(base_url: &str) -> Result<Self, NotifierError> {
        let invalid = |reason: String| NotifierError::InvalidTarget {
            url: base_url.to_string(),
            reason,
        };

        let parsed = reqwest::Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {:?}", parsed.scheme())));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(invalid("base URL must not carry a query or fragment".into()));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `<base>/slide-change?hash=<percent-encoded fragment>`
    pub fn request_url(&self, fragment: &SlideFragment) -> String {
        format!(
            "{}{}?hash={}",
            self.base_url,
            SLIDE_CHANGE_PATH,
            urlencoding::encode(fragment.as_str())
        )
    }
}

impl Default for NotificationTarget {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Delivery side of the notifier. Implementations must not block the caller
/// on the outcome.
pub trait Dispatch {
    fn dispatch(&self, fragment: SlideFragment);
}

/// Fire-and-forget HTTP GET to the [`NotificationTarget`].
///
/// Each notification runs in its own detached tokio task, so `dispatch` must
/// be called from within a runtime.
#[derive(Clone, Debug)]
pub struct HttpDispatcher {
    client: reqwest::Client,
    target: NotificationTarget,
}

impl HttpDispatcher {
    pub fn new(target: NotificationTarget) -> Result<Self, NotifierError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(NotifierError::Client)?;
        Ok(Self { client, target })
    }

    pub fn target(&self) -> &NotificationTarget {
        &self.target
    }

    /// Start delivering `fragment` and hand back the task.
    ///
    /// The task logs its own outcome; the returned handle only exists so
    /// callers that care (tests, mostly) can observe it.
    pub fn send(&self, fragment: SlideFragment) -> JoinHandle<Result<(), DeliveryFailure>> {
        let client = self.client.clone();
        let url = self.target.request_url(&fragment);

        tokio::spawn(async move {
            debug!("GET {}", url);
            match client.get(&url).send().await {
                Ok(response) => {
                    // Status, headers and body carry no meaning for us.
                    debug!("Listener answered {} for {}", response.status(), fragment);
                    info!(fragment = %fragment, "sent");
                    Ok(())
                }
                Err(e) => {
                    let failure = DeliveryFailure::from_reqwest(e);
                    warn!(fragment = %fragment, error = %failure, "error");
                    Err(failure)
                }
            }
        })
    }
}

impl Dispatch for HttpDispatcher {
    fn dispatch(&self, fragment: SlideFragment) {
        drop(self.send(fragment));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    fn slide(raw: &str) -> SlideFragment {
        SlideFragment::parse(raw).unwrap()
    }

    /// Spawn a server that records the `hash` query parameter of every
    /// /slide-change request. Returns its base URL and the record.
    async fn spawn_recording_server() -> (String, Arc<Mutex<Vec<String>>>) {
        use axum::{Router, extract::Query, routing::get};

        let seen = Arc::new(Mutex::new(Vec::new()));
        let record = seen.clone();
        let app = Router::new().route(
            "/slide-change",
            get(move |Query(params): Query<HashMap<String, String>>| {
                let record = record.clone();
                async move {
                    record
                        .lock()
                        .unwrap()
                        .push(params.get("hash").cloned().unwrap_or_default());
                    "ok"
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://127.0.0.1:{}", port), seen)
    }

    // -- NotificationTarget --

    #[test]
    fn test_default_target() {
        let target = NotificationTarget::default();
        assert_eq!(target.base_url(), "http://127.0.0.1:8765");
        assert_eq!(
            target.request_url(&slide("#slide=1")),
            "http://127.0.0.1:8765/slide-change?hash=%23slide%3D1"
        );
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let target = NotificationTarget::new("http://localhost:9000/").unwrap();
        assert_eq!(target.base_url(), "http://localhost:9000");
    }

    #[test]
    fn test_invalid_targets_rejected() {
        for url in ["not a url", "ftp://127.0.0.1", "http://h/?x=1", "http://h/#frag"] {
            assert!(
                matches!(
                    NotificationTarget::new(url),
                    Err(NotifierError::InvalidTarget { .. })
                ),
                "accepted {url:?}"
            );
        }
    }

    #[test]
    fn test_reserved_characters_round_trip() {
        let target = NotificationTarget::default();
        let fragment = slide("#slide=3&x=1 y/z?q#r");
        let url = target.request_url(&fragment);

        let encoded = url.split_once("?hash=").unwrap().1;
        assert!(!encoded.contains('&'));
        assert!(!encoded.contains('#'));
        assert_eq!(urlencoding::decode(encoded).unwrap(), fragment.as_str());
    }

    #[test]
    fn test_request_url_parses_back_to_fragment() {
        let target = NotificationTarget::default();
        let fragment = slide("#slide=3&x=1");
        let url = reqwest::Url::parse(&target.request_url(&fragment)).unwrap();

        assert_eq!(url.path(), "/slide-change");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs, vec![("hash".to_string(), "#slide=3&x=1".to_string())]);
    }

    // -- HttpDispatcher --

    #[tokio::test]
    async fn test_send_delivers_fragment() {
        let (base, seen) = spawn_recording_server().await;
        let dispatcher = HttpDispatcher::new(NotificationTarget::new(&base).unwrap()).unwrap();

        let result = dispatcher.send(slide("#slide=id.g42")).await.unwrap();
        assert!(result.is_ok());
        assert_eq!(*seen.lock().unwrap(), vec!["#slide=id.g42"]);
    }

    #[tokio::test]
    async fn test_send_reports_unreachable_listener() {
        let dispatcher =
            HttpDispatcher::new(NotificationTarget::new("http://127.0.0.1:1").unwrap()).unwrap();

        let result = dispatcher.send(slide("#slide=2")).await.unwrap();
        assert!(matches!(result, Err(DeliveryFailure::Unreachable(_))));
    }

    #[tokio::test]
    async fn test_error_status_still_counts_as_sent() {
        use axum::{Router, http::StatusCode, routing::get};

        let app = Router::new().route(
            "/slide-change",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let target = NotificationTarget::new(&format!("http://127.0.0.1:{}", port)).unwrap();
        let dispatcher = HttpDispatcher::new(target).unwrap();
        assert!(dispatcher.send(slide("#slide=1")).await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_dispatch_returns_without_waiting() {
        let dispatcher =
            HttpDispatcher::new(NotificationTarget::new("http://127.0.0.1:1").unwrap()).unwrap();
        // Must not panic or surface the failure.
        dispatcher.dispatch(slide("#slide=1"));
        dispatcher.dispatch(slide("#slide=2"));
    }
}
