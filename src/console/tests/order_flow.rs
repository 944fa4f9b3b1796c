//! Order create/edit/delete/status scenarios.

use serde_json::json;

use super::*;
use crate::drawing::DrawingKind;
use crate::model::OrderStatus;
use crate::notice::NoticeLevel;
use crate::test_support::sample_order;

#[test]
fn test_supervisor_cannot_create_order() {
    let Harness {
        mut console,
        storage,
        ..
    } = local_console();
    login(&mut console, "sup1");
    let writes = storage.write_count();

    let outcome = run(&mut console, Command::SaveOrder { form: form("Dam") });

    assert_eq!(outcome, Outcome::Denied);
    assert!(console.visible_orders().is_empty());
    assert_eq!(storage.write_count(), writes);
    let notice = console.notices().latest().unwrap();
    assert_eq!(notice.level, NoticeLevel::Warning);
    assert!(notice.message.contains("create"), "{}", notice.message);
}

#[test]
fn test_operator_saves_drawn_area_closed() {
    let Harness { mut console, .. } = local_console();
    login(&mut console, "op1");
    run(&mut console, Command::NewOrder);
    run(
        &mut console,
        Command::StartDrawing {
            kind: DrawingKind::Area,
        },
    );
    for (lon, lat) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)] {
        assert_eq!(click(&mut console, lon, lat), Outcome::Applied);
    }

    assert_eq!(
        run(&mut console, Command::SaveOrder { form: form("Field") }),
        Outcome::Applied
    );

    let orders = console.visible_orders();
    assert_eq!(orders.len(), 1);
    let area = serde_json::to_value(orders[0].area.as_ref().unwrap()).unwrap();
    assert_eq!(
        area,
        json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
        })
    );
    assert_eq!(console.editor().active_id(), Some(&orders[0].id));
    assert_eq!(latest_notice(&console), "Order saved");
}

#[test]
fn test_supervisor_edits_existing_order() {
    let Harness {
        mut console,
        storage,
        ..
    } = local_console();
    login(&mut console, "op1");
    run(&mut console, Command::SaveOrder { form: form("Before") });
    let id = console.visible_orders()[0].id.clone();

    login(&mut console, "sup1");
    assert_eq!(storage.raw("orders").map(|s| s.contains("Before")), Some(true));
    run(&mut console, Command::OpenOrder { id: id.clone() });
    let mut edited = console.editor().form().clone();
    edited.title = "After".to_string();

    assert_eq!(run(&mut console, Command::SaveOrder { form: edited }), Outcome::Applied);
    assert_eq!(console.visible_orders().len(), 1);
    assert_eq!(console.visible_orders()[0].title, "After");
}

#[test]
fn test_only_admin_deletes() {
    let Harness { mut console, .. } = local_console();
    login(&mut console, "op1");
    run(&mut console, Command::SaveOrder { form: form("Old") });
    assert_eq!(run(&mut console, Command::DeleteOrder), Outcome::Denied);

    login(&mut console, "admin");
    let id = console.visible_orders()[0].id.clone();
    assert_eq!(run(&mut console, Command::DeleteOrder), Outcome::Ignored);
    run(&mut console, Command::OpenOrder { id });
    assert_eq!(run(&mut console, Command::DeleteOrder), Outcome::Applied);
    assert!(console.visible_orders().is_empty());
    assert!(console.editor().active_id().is_none());
}

#[test]
fn test_open_unknown_order_ignored() {
    let Harness { mut console, .. } = local_console();
    login(&mut console, "admin");
    let outcome = run(
        &mut console,
        Command::OpenOrder {
            id: "nope".into(),
        },
    );
    assert_eq!(outcome, Outcome::Ignored);
}

#[test]
fn test_filter_limits_visible_orders() {
    let storage = MemoryStorage::new();
    let mut done = sample_order("done", Some("2025-01-02T00:00"));
    done.status = OrderStatus::Completed;
    let orders = vec![sample_order("todo", Some("2025-01-01T00:00")), done];
    let mut writer = storage.clone();
    crate::store::save_json(&mut writer, "orders", &orders).unwrap();

    let Harness { mut console, .. } = local_console_over(storage);
    login(&mut console, "sup1");
    assert_eq!(console.visible_orders().len(), 2);

    run(
        &mut console,
        Command::SetFilter {
            status: Some(OrderStatus::Completed),
        },
    );
    let ids: Vec<&str> = console.visible_orders().iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["done"]);

    run(&mut console, Command::SetFilter { status: None });
    assert_eq!(console.visible_orders().len(), 2);
}

#[test]
fn test_remote_create_failure_keeps_list() {
    let server = FakeServer::new();
    let (mut console, _) = remote_console(&server);
    login(&mut console, "admin");
    run(&mut console, Command::SaveOrder { form: form("First") });
    assert_eq!(console.visible_orders().len(), 1);

    server.fail_next_post(500);
    run(&mut console, Command::NewOrder);
    let outcome = run(&mut console, Command::SaveOrder { form: form("Second") });

    assert_eq!(outcome, Outcome::Failed);
    let titles: Vec<&str> = console.visible_orders().iter().map(|o| o.title.as_str()).collect();
    assert_eq!(titles, vec!["First"]);
    let notice = console.notices().latest().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert!(notice.message.contains("HTTP 500"), "{}", notice.message);
    assert_eq!(server.orders().len(), 1);
}

#[test]
fn test_remote_status_change_posts_update() {
    let server = FakeServer::new();
    let (mut console, _) = remote_console(&server);
    login(&mut console, "op1");
    run(&mut console, Command::SaveOrder { form: form("Status") });

    let outcome = run(
        &mut console,
        Command::ChangeStatus {
            status: OrderStatus::InProgress,
        },
    );

    assert_eq!(outcome, Outcome::Applied);
    assert_eq!(
        server.requests(),
        vec!["GET", "POST create", "GET", "POST update", "GET"]
    );
    assert_eq!(server.orders()[0].status, OrderStatus::InProgress);
    assert_eq!(console.editor().form().status, OrderStatus::InProgress);
}
