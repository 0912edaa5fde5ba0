//! Simple verb drivers: queries, updates, close, and the two-step focus.

use std::sync::Arc;

use extwin::{Error, FakePlatform, Platform, Windowing};
use extwin_protocol::{
    ItemId, ItemKind, PlatformRequest, Status, TabData, TabGroupUpdate, TabUpdate, WindowData,
};
use serde_json::Value;

fn api_over(fake: &Arc<FakePlatform>) -> Windowing {
    Windowing::new(Arc::clone(fake) as Arc<dyn Platform>)
}

#[tokio::test]
async fn focus_is_two_distinct_requests_in_order() {
    let fake = FakePlatform::new();
    fake.respond_with(|request, notify| match request {
        PlatformRequest::QueryWindow {
            id,
            include_contents: false,
        } => {
            let data = WindowData {
                id: *id,
                active_tab: ItemId(20),
                ..WindowData::default()
            };
            notify.notify_window(Status::Ok, Some(&data));
        }
        PlatformRequest::UpdateTab { id, update } => {
            assert_eq!(*id, ItemId(20));
            assert_eq!(update.focus, Some(true));
            notify.notify_tab_updated(Status::Ok);
        }
        other => panic!("unexpected request: {other:?}"),
    });
    let api = api_over(&fake);

    api.focus_window(ItemId(1)).await.unwrap();

    let requests = fake.requests();
    assert_eq!(requests.len(), 2);
    assert!(matches!(requests[0], PlatformRequest::QueryWindow { .. }));
    assert!(matches!(requests[1], PlatformRequest::UpdateTab { .. }));
}

#[tokio::test]
async fn focus_on_an_empty_window_stops_after_the_query() {
    let fake = FakePlatform::new();
    fake.respond_with(|request, notify| match request {
        PlatformRequest::QueryWindow { id, .. } => {
            let data = WindowData {
                id: *id,
                active_tab: ItemId::NONE,
                ..WindowData::default()
            };
            notify.notify_window(Status::Ok, Some(&data));
        }
        other => panic!("unexpected request: {other:?}"),
    });
    let api = api_over(&fake);

    let err = api.focus_window(ItemId(1)).await.unwrap_err();
    assert!(matches!(err, Error::InvalidState(_)));
    assert_eq!(fake.request_count(), 1);
}

#[tokio::test]
async fn empty_url_update_is_rejected_before_the_platform() {
    let fake = FakePlatform::new();
    let api = api_over(&fake);

    let err = api
        .update_tab(
            ItemId(10),
            TabUpdate {
                url: Some(String::new()),
                ..TabUpdate::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidArgument(_)));
    assert_eq!(fake.request_count(), 0);
}

#[tokio::test]
async fn zero_ids_are_rejected_for_mutations_but_allowed_for_queries() {
    let fake = FakePlatform::new();
    fake.respond_with(|request, notify| match request {
        PlatformRequest::QueryTab { id } => {
            assert!(id.is_none());
            let data = TabData {
                id: ItemId(42),
                window: ItemId(1),
                ..TabData::default()
            };
            notify.notify_tab(Status::Ok, Some(&data));
        }
        other => panic!("unexpected request: {other:?}"),
    });
    let api = api_over(&fake);

    // "Current tab" resolves to a concrete id.
    let current = api.tab(ItemId::NONE).await.unwrap();
    assert_eq!(current.id(), ItemId(42));

    let err = api.close_tab(ItemId::NONE).await.unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));

    let err = api
        .update_tab_group(ItemId::NONE, TabGroupUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[tokio::test]
async fn closed_item_status_maps_to_the_closed_error() {
    let fake = FakePlatform::new();
    fake.respond_with(|request, notify| match request {
        PlatformRequest::CloseTab { .. } => notify.notify_tab_closed(Status::ItemClosed),
        other => panic!("unexpected request: {other:?}"),
    });
    let api = api_over(&fake);

    let err = api.close_tab(ItemId(10)).await.unwrap_err();
    assert_eq!(err, Error::Closed(ItemId(10)));
}

#[tokio::test]
async fn query_results_are_owned_and_seeded_onto_objects() -> anyhow::Result<()> {
    let fake = FakePlatform::new();
    fake.respond_with(|request, notify| match request {
        PlatformRequest::QueryTab { id } => {
            let data = TabData {
                id: *id,
                window: ItemId(1),
                url: "https://example.test/".into(),
                title: "Example".into(),
                index: 3,
                ..TabData::default()
            };
            notify.notify_tab(Status::Ok, Some(&data));
        }
        other => panic!("unexpected request: {other:?}"),
    });
    let api = api_over(&fake);

    let tab = api.tab(ItemId(10)).await?;
    assert_eq!(
        tab.property("url")?,
        Some(Value::from("https://example.test/"))
    );
    assert_eq!(tab.property("title")?, Some(Value::from("Example")));
    assert_eq!(tab.property("index")?, Some(Value::from(3u32)));
    Ok(())
}

#[tokio::test]
async fn emptied_window_contents_overwrite_the_earlier_seed() {
    let fake = FakePlatform::new();
    let remaining: Arc<parking_lot::Mutex<Vec<ItemId>>> =
        Arc::new(parking_lot::Mutex::new(vec![ItemId(10), ItemId(20)]));
    let world = Arc::clone(&remaining);
    fake.respond_with(move |request, notify| match request {
        PlatformRequest::QueryWindow {
            id,
            include_contents: true,
        } => {
            let data = WindowData {
                id: *id,
                tab_ids: world.lock().clone(),
                ..WindowData::default()
            };
            notify.notify_window(Status::Ok, Some(&data));
        }
        other => panic!("unexpected request: {other:?}"),
    });
    let api = api_over(&fake);

    let window = api.window(ItemId(1), true).await.unwrap();
    assert_eq!(
        window.property("tabIds").unwrap(),
        Some(serde_json::json!([10u64, 20u64]))
    );

    // All tabs have since left the window; a fresh contents query must not
    // leave the old list behind.
    remaining.lock().clear();
    let window = api.window(ItemId(1), true).await.unwrap();
    assert_eq!(
        window.property("tabIds").unwrap(),
        Some(serde_json::json!([])),
    );
    assert_eq!(
        window.property("tabGroupIds").unwrap(),
        Some(serde_json::json!([])),
    );
}

#[tokio::test]
async fn operations_left_in_flight_resolve_later_without_blocking_others() {
    let fake = FakePlatform::new();
    let platform = Arc::clone(&fake) as Arc<dyn Platform>;
    let api = Arc::new(Windowing::new(platform));

    // No responder installed: the close stays suspended.
    let waiter = {
        let api = Arc::clone(&api);
        tokio::spawn(async move { api.close_tab(ItemId(10)).await })
    };
    tokio::task::yield_now().await;
    assert!(!waiter.is_finished());

    let parked = fake.take_parked();
    assert_eq!(parked.len(), 1);
    parked[0].1.notify_tab_closed(Status::Ok);

    waiter.await.unwrap().unwrap();
}
