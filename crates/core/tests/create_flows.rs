//! Composite create drivers: window-with-content and tab-group-from-tabs.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use extwin::{Error, FakePlatform, InitialEntry, Platform, Windowing};
use extwin_protocol::{
    InsertDest, ItemId, ItemKind, PlatformRequest, Status, TabCreateProps, TabGroupCreateParams,
    WindowCreateParams, WindowData,
};
use parking_lot::Mutex;
use serde_json::json;

fn api_over(fake: &Arc<FakePlatform>) -> Windowing {
    Windowing::new(Arc::clone(fake) as Arc<dyn Platform>)
}

fn blank_tab() -> InitialEntry {
    InitialEntry::Tab(TabCreateProps {
        url: "about:blank".into(),
        ..TabCreateProps::default()
    })
}

#[tokio::test]
async fn tab_group_below_minimum_size_never_reaches_the_platform() {
    let fake = FakePlatform::new();
    let api = api_over(&fake);

    let err = api
        .create_tab_group(TabGroupCreateParams::default(), vec![blank_tab()], None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidArgument(_)));
    assert_eq!(fake.request_count(), 0);
}

#[tokio::test]
async fn window_with_two_property_bags_issues_exactly_three_calls() {
    let fake = FakePlatform::new();
    let next_tab = AtomicU64::new(100);
    fake.respond_with(move |request, notify| match request {
        PlatformRequest::CreateWindow { params } => {
            assert!(params.bounds.is_none());
            notify.notify_window_created(Status::Ok, ItemId(7));
        }
        PlatformRequest::CreateTab { props, target } => {
            assert_eq!(props.url, "about:blank");
            // The container is concrete before any insertion proceeds.
            assert_eq!(target.dest, InsertDest::Window(ItemId(7)));
            let id = ItemId(next_tab.fetch_add(1, Ordering::SeqCst));
            notify.notify_tab_created(Status::Ok, id, ItemId(7));
        }
        other => panic!("unexpected request: {other:?}"),
    });
    let api = api_over(&fake);

    let window = api
        .create_window(WindowCreateParams::default(), vec![blank_tab(), blank_tab()])
        .await
        .unwrap();

    assert_eq!(window.id(), ItemId(7));
    assert_eq!(window.kind(), ItemKind::Window);

    let requests = fake.requests();
    assert_eq!(requests.len(), 3);
    assert!(matches!(requests[0], PlatformRequest::CreateWindow { .. }));
    // Plain property bags need no query-before-insert.
    assert!(matches!(requests[1], PlatformRequest::CreateTab { .. }));
    assert!(matches!(requests[2], PlatformRequest::CreateTab { .. }));
}

#[tokio::test]
async fn failing_step_aborts_the_rest_without_rolling_back() {
    let fake = FakePlatform::new();
    let moved: Arc<Mutex<Vec<ItemId>>> = Arc::new(Mutex::new(Vec::new()));
    let world = Arc::clone(&moved);
    fake.respond_with(move |request, notify| match request {
        PlatformRequest::CreateWindow { .. } => {
            notify.notify_window_created(Status::Ok, ItemId(7));
        }
        PlatformRequest::MoveTab { id, .. } => {
            if *id == ItemId(30) {
                notify.notify_tab_moved(Status::CapacityExceeded, *id, ItemId::NONE, 0);
            } else {
                let mut tabs = world.lock();
                tabs.push(*id);
                let index = (tabs.len() - 1) as u32;
                notify.notify_tab_moved(Status::Ok, *id, ItemId(7), index);
            }
        }
        PlatformRequest::QueryWindow {
            id,
            include_contents: true,
        } => {
            assert_eq!(*id, ItemId(7));
            let data = WindowData {
                id: ItemId(7),
                tab_ids: world.lock().clone(),
                ..WindowData::default()
            };
            notify.notify_window(Status::Ok, Some(&data));
        }
        other => panic!("unexpected request: {other:?}"),
    });
    let api = api_over(&fake);

    let initial = [10u64, 20, 30, 40]
        .into_iter()
        .map(|id| {
            InitialEntry::Existing(api.get_or_create_object(ItemKind::Tab, ItemId(id)).unwrap())
        })
        .collect();

    let err = api
        .create_window(WindowCreateParams::default(), initial)
        .await
        .unwrap_err();

    // The failing step's specific error surfaces; the remaining step (tab
    // 40) is never attempted.
    assert_eq!(err, Error::CapacityExceeded);
    let move_targets: Vec<ItemId> = fake
        .requests()
        .iter()
        .filter_map(|request| match request {
            PlatformRequest::MoveTab { id, .. } => Some(*id),
            _ => None,
        })
        .collect();
    assert_eq!(move_targets, vec![ItemId(10), ItemId(20), ItemId(30)]);

    // A follow-up query shows the completed steps intact.
    let window = api.window(ItemId(7), true).await.unwrap();
    assert_eq!(
        window.property("tabIds").unwrap(),
        Some(json!([10u64, 20u64]))
    );
}

#[tokio::test]
async fn tab_group_container_is_created_once_then_reused() {
    let fake = FakePlatform::new();
    fake.respond_with(|request, notify| match request {
        PlatformRequest::MoveTab { id, target } => {
            let parent = match &target.dest {
                InsertDest::NewTabGroup(params) => {
                    assert!(params.collapsed);
                    ItemId(99)
                }
                InsertDest::TabGroup(group) => *group,
                other => panic!("unexpected destination: {other:?}"),
            };
            notify.notify_tab_moved(Status::Ok, *id, parent, 0);
        }
        other => panic!("unexpected request: {other:?}"),
    });
    let api = api_over(&fake);

    let initial = [10u64, 20, 30]
        .into_iter()
        .map(|id| {
            InitialEntry::Existing(api.get_or_create_object(ItemKind::Tab, ItemId(id)).unwrap())
        })
        .collect();

    let group = api
        .create_tab_group(
            TabGroupCreateParams { collapsed: true },
            initial,
            Some(ItemId(10)),
        )
        .await
        .unwrap();

    assert_eq!(group.id(), ItemId(99));
    assert_eq!(group.kind(), ItemKind::TabGroup);

    let targets: Vec<_> = fake
        .requests()
        .iter()
        .map(|request| match request {
            PlatformRequest::MoveTab { target, .. } => (target.dest.clone(), target.before),
            other => panic!("unexpected request: {other:?}"),
        })
        .collect();

    // First step creates the group and consumes the insert-before position;
    // later steps target the concrete container and append.
    assert_eq!(targets.len(), 3);
    assert!(matches!(targets[0].0, InsertDest::NewTabGroup(_)));
    assert_eq!(targets[0].1, Some(ItemId(10)));
    assert_eq!(targets[1], (InsertDest::TabGroup(ItemId(99)), None));
    assert_eq!(targets[2], (InsertDest::TabGroup(ItemId(99)), None));
}
