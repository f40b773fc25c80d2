//! Notifier and listener talking over real HTTP on an ephemeral port.

use std::time::Duration;

use slide_listener::{ListenerState, SlideEvent, SlideMapping};
use slide_notifier::{
    HttpDispatcher, NotificationTarget, NotifierConfig, PageLocation, SlideFragment,
    spawn_notifier,
};
use tokio::sync::broadcast;

async fn spawn_listener(
    mapping: SlideMapping,
) -> (String, ListenerState, tokio::sync::oneshot::Sender<()>) {
    let state = ListenerState::new(mapping);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let served = state.clone();
    tokio::spawn(async move {
        slide_listener::serve(listener, served, async move {
            let _ = rx.await;
        })
        .await
        .unwrap();
    });
    (format!("http://127.0.0.1:{}", port), state, tx)
}

fn config_for(base_url: &str) -> NotifierConfig {
    NotifierConfig {
        target: NotificationTarget::new(base_url).unwrap(),
        poll_interval: Duration::from_millis(50),
    }
}

async fn next_event(rx: &mut broadcast::Receiver<SlideEvent>) -> SlideEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("no slide event arrived")
        .unwrap()
}

#[tokio::test]
async fn slide_transitions_reach_listener_once_each() {
    let (base_url, state, _shutdown) =
        spawn_listener(SlideMapping::from_ordered_ids(["intro", "g1", "g2"])).await;
    let mut events = state.subscribe();

    let config = config_for(&base_url);
    let dispatcher = HttpDispatcher::new(config.target.clone()).unwrap();
    let (location, observer) = PageLocation::new();
    let notifier = spawn_notifier(observer, dispatcher, &config);

    location.set_fragment("#slide=id.g1");
    assert_eq!(
        next_event(&mut events).await,
        SlideEvent {
            slide_id: "g1".into(),
            index: 2
        }
    );

    // Leaving the slide format and coming back to the same slide is a repeat.
    location.set_fragment("#overview");
    tokio::time::sleep(Duration::from_millis(200)).await;
    location.set_fragment("#slide=id.g1");
    tokio::time::sleep(Duration::from_millis(200)).await;

    location.set_fragment("#slide=id.g2");
    assert_eq!(next_event(&mut events).await.slide_id, "g2");

    location.set_fragment("#slide=id.g1");
    assert_eq!(next_event(&mut events).await.slide_id, "g1");

    drop(location);
    notifier.await.unwrap();

    // Nothing else was delivered.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(matches!(
        events.try_recv(),
        Err(broadcast::error::TryRecvError::Empty)
    ));
    assert_eq!(state.mapping.read().await.current_slide_index(), 2);
}

#[tokio::test]
async fn reserved_characters_survive_the_wire() {
    let (base_url, state, _shutdown) = spawn_listener(SlideMapping::new()).await;
    let mut events = state.subscribe();

    let dispatcher = HttpDispatcher::new(NotificationTarget::new(&base_url).unwrap()).unwrap();
    let fragment = SlideFragment::parse("#slide=id.g3&x=1 y#z").unwrap();
    dispatcher.send(fragment).await.unwrap().unwrap();

    let event = next_event(&mut events).await;
    assert_eq!(event.slide_id, "g3&x=1 y#z");
    assert_eq!(event.index, 1);
}

#[tokio::test]
async fn notifier_survives_listener_going_away() {
    let (base_url, state, shutdown) =
        spawn_listener(SlideMapping::from_ordered_ids(["a", "b"])).await;
    let mut events = state.subscribe();

    let config = config_for(&base_url);
    let dispatcher = HttpDispatcher::new(config.target.clone()).unwrap();
    let (location, observer) = PageLocation::new();
    let notifier = spawn_notifier(observer, dispatcher, &config);

    location.set_fragment("#slide=id.a");
    assert_eq!(next_event(&mut events).await.slide_id, "a");

    shutdown.send(()).unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    // Delivery now fails; the notifier keeps running and does not panic.
    location.set_fragment("#slide=id.b");
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(!notifier.is_finished());

    drop(location);
    notifier.await.unwrap();
}
