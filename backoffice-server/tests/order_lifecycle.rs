//! Order fulfilment lifecycle integration tests
//!
//! Orders move WAITING -> CONFIRMED -> PREPARING -> READY, then diverge by
//! order type: dine-in goes through SERVED before COMPLETED, takeaway
//! completes straight from READY.

mod common;

use backoffice_server::db::models::{OrderCreate, ReasonType};
use backoffice_server::db::repository::OrderRepository;
use shared::ErrorCode;
use shared::lifecycle::{OrderStatus, OrderType, StatusChange};

async fn place_order(
    controller: &backoffice_server::LifecycleController,
    order_type: OrderType,
) -> (String, String) {
    let order = controller
        .create_order(OrderCreate {
            user_id: "user:guest-7".into(),
            order_type,
            payment_method: None,
            items: common::cart(),
        })
        .await
        .unwrap();
    (order.id.unwrap().to_string(), order.order_number)
}

#[tokio::test]
async fn test_create_order_starts_waiting() {
    let (_state, controller) = common::controller().await;
    let (id, number) = place_order(&controller, OrderType::DineIn).await;

    let order = controller.get_order(&id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Waiting);
    assert!((order.total_amount - 22.5).abs() < f64::EPSILON);

    let by_number = controller.get_order_by_number(&number).await.unwrap();
    assert_eq!(by_number.id, order.id);
}

#[tokio::test]
async fn test_dine_in_full_flow() {
    let (state, controller) = common::controller().await;
    let mut events = state.hub().subscribe();
    let (id, _) = place_order(&controller, OrderType::DineIn).await;

    let order = controller.confirm_order(&id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Confirmed);

    let order = controller.start_preparing(&id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Preparing);

    let order = controller.mark_ready(&id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Ready);

    let order = controller.mark_served(&id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Served);

    let order = controller.complete_order(&id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Completed);

    // One event per committed transition, in commit order
    let expected = [
        (OrderStatus::Waiting, OrderStatus::Confirmed),
        (OrderStatus::Confirmed, OrderStatus::Preparing),
        (OrderStatus::Preparing, OrderStatus::Ready),
        (OrderStatus::Ready, OrderStatus::Served),
        (OrderStatus::Served, OrderStatus::Completed),
    ];
    for (previous, new) in expected {
        let event = events.recv().await.unwrap();
        assert_eq!(event.change, StatusChange::Order { previous, new });
    }
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_transition_result_mirrors_the_write() {
    let (state, controller) = common::controller().await;
    let reason_id = common::seed_reason(&state, ReasonType::Cancelled, "Kitchen fire").await;
    let (id, _) = place_order(&controller, OrderType::DineIn).await;

    let repo = OrderRepository::new(state.get_db(), common::RESTAURANT);

    // The returned pair comes straight from the update, not a refetch, so
    // it must agree with what is actually stored
    let (before, after) = repo.confirm(&id, common::RESTAURANT).await.unwrap().unwrap();
    assert_eq!(before.status, OrderStatus::Waiting);
    assert_eq!(after.status, OrderStatus::Confirmed);
    let stored = repo.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(after.status, stored.status);
    assert_eq!(after.status_updated_by, stored.status_updated_by);
    assert_eq!(after.updated_at, stored.updated_at);
    assert_eq!(after.order_number, stored.order_number);

    let reason = reason_id.parse::<surrealdb::RecordId>().unwrap();
    let (before, after) = repo
        .cancel(&id, common::RESTAURANT, Some(reason))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(before.status, OrderStatus::Confirmed);
    assert_eq!(after.status, OrderStatus::Cancelled);
    let stored = repo.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(after.reason, stored.reason);
    assert_eq!(after.cancelled_by, stored.cancelled_by);
    assert_eq!(after.updated_at, stored.updated_at);
}

#[tokio::test]
async fn test_takeaway_completes_from_ready() {
    let (_state, controller) = common::controller().await;
    let (id, _) = place_order(&controller, OrderType::Takeaway).await;

    controller.confirm_order(&id).await.unwrap();
    controller.start_preparing(&id).await.unwrap();
    controller.mark_ready(&id).await.unwrap();

    // Serving is a dine-in step; takeaway must skip it
    let err = controller.mark_served(&id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderNotFound);

    let order = controller.complete_order(&id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Completed);
}

#[tokio::test]
async fn test_dine_in_cannot_skip_served() {
    let (_state, controller) = common::controller().await;
    let (id, _) = place_order(&controller, OrderType::DineIn).await;

    controller.confirm_order(&id).await.unwrap();
    controller.start_preparing(&id).await.unwrap();
    controller.mark_ready(&id).await.unwrap();

    // READY -> COMPLETED is takeaway-only
    let err = controller.complete_order(&id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderNotFound);

    let order = controller.get_order(&id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Ready);
}

#[tokio::test]
async fn test_out_of_order_transitions_conflict() {
    let (_state, controller) = common::controller().await;
    let (id, _) = place_order(&controller, OrderType::DineIn).await;

    // Still WAITING, preparing requires CONFIRMED
    let err = controller.start_preparing(&id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderNotFound);

    controller.confirm_order(&id).await.unwrap();
    let err = controller.confirm_order(&id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderNotFound);
}

#[tokio::test]
async fn test_cancel_order_with_reason() {
    let (state, controller) = common::controller().await;
    let reason = common::seed_reason(&state, ReasonType::Cancelled, "Kitchen fault").await;
    let (id, _) = place_order(&controller, OrderType::DineIn).await;

    controller.confirm_order(&id).await.unwrap();
    controller.start_preparing(&id).await.unwrap();

    let order = controller.cancel_order(&id, Some(reason)).await.unwrap();
    assert_eq!(order.status, OrderStatus::Cancelled);
    assert_eq!(order.cancelled_by.as_deref(), Some(common::RESTAURANT));
    assert!(order.reason.is_some());
}

#[tokio::test]
async fn test_cancel_order_rules() {
    let (state, controller) = common::controller().await;
    let reason = common::seed_reason(&state, ReasonType::Cancelled, "Closing early").await;
    let (id, _) = place_order(&controller, OrderType::Takeaway).await;

    // WAITING is not cancellable; only CONFIRMED and PREPARING are
    let err = controller
        .cancel_order(&id, Some(reason.clone()))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderNotFound);

    controller.confirm_order(&id).await.unwrap();
    controller.start_preparing(&id).await.unwrap();
    controller.mark_ready(&id).await.unwrap();

    // Too late once READY
    let err = controller.cancel_order(&id, Some(reason)).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderNotFound);

    // A reason is optional when cancelling an order
    let (second, _) = place_order(&controller, OrderType::Takeaway).await;
    controller.confirm_order(&second).await.unwrap();
    let cancelled = controller.cancel_order(&second, None).await.unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert!(cancelled.reason.is_none());
}

#[tokio::test]
async fn test_next_statuses_depend_on_order_type() {
    let (_state, controller) = common::controller().await;

    let (dine_in, _) = place_order(&controller, OrderType::DineIn).await;
    let (takeaway, _) = place_order(&controller, OrderType::Takeaway).await;

    for id in [&dine_in, &takeaway] {
        controller.confirm_order(id).await.unwrap();
        controller.start_preparing(id).await.unwrap();
        controller.mark_ready(id).await.unwrap();
    }

    assert_eq!(
        controller.order_next_statuses(&dine_in).await.unwrap(),
        vec![OrderStatus::Ready, OrderStatus::Served]
    );
    assert_eq!(
        controller.order_next_statuses(&takeaway).await.unwrap(),
        vec![OrderStatus::Ready, OrderStatus::Completed]
    );

    controller.mark_served(&dine_in).await.unwrap();
    controller.complete_order(&dine_in).await.unwrap();
    assert_eq!(
        controller.order_next_statuses(&dine_in).await.unwrap(),
        vec![OrderStatus::Completed]
    );
}

#[tokio::test]
async fn test_concurrent_preparing_single_winner() {
    let (_state, controller) = common::controller().await;
    let (id, _) = place_order(&controller, OrderType::DineIn).await;
    controller.confirm_order(&id).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..5 {
        let controller = controller.clone();
        let id = id.clone();
        handles.push(tokio::spawn(
            async move { controller.start_preparing(&id).await },
        ));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }
    assert_eq!(successes, 1);
}

#[tokio::test]
async fn test_failed_transition_publishes_nothing() {
    let (state, controller) = common::controller().await;
    let (id, _) = place_order(&controller, OrderType::DineIn).await;

    let mut events = state.hub().subscribe();
    let _ = controller.mark_ready(&id).await.unwrap_err();
    assert!(events.try_recv().is_err());
}
