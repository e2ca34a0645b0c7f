//! Purchase transaction tests: exactly one order per request, typed
//! failure reasons, and no partial effects.

use warung_server::{AppError, Config, ServerState};
use shared::{ConflictCode, OrderStatus, RequestStatus, ResourceKind};
use std::time::Duration;

fn test_config() -> Config {
    Config {
        work_dir: "/tmp/warung-test".into(),
        http_port: 0,
        log_level: "warn".into(),
        environment: "development".into(),
        claim_window: 20,
    }
}

async fn setup_with_row() -> ServerState {
    let state = ServerState::initialize_in_memory(&test_config())
        .await
        .expect("in-memory state");
    state
        .lifecycle
        .create_request("req-1", "nasi padang")
        .await
        .unwrap();
    state
        .offers
        .fill_first_empty_row("req-1", "rendang", "Warung A", 20000, 4.5)
        .await
        .unwrap();
    state
}

#[tokio::test]
async fn successful_buy_lands_the_full_effect() {
    let state = setup_with_row().await;
    let order = state
        .purchases
        .buy("req-1", 0, "Budi", "Jl. Merdeka 1")
        .await
        .unwrap();

    assert!(order.order_id.starts_with("ord_"));
    assert_eq!(order.status, OrderStatus::Paid);
    assert_eq!(order.menu, "rendang");
    assert_eq!(order.vendor, "Warung A");
    assert_eq!(order.price, 20000);

    let request = state.lifecycle.get_request("req-1").await.unwrap();
    assert_eq!(request.status, RequestStatus::Bought);
    assert_eq!(request.bought_row_index, Some(0));
    assert_eq!(request.bought_order_id.as_deref(), Some(order.order_id.as_str()));
    assert!(request.bought_at.is_some());

    let rows = state.offers.list_rows("req-1").await.unwrap();
    assert!(rows[0].is_bought);

    let fetched = state.purchases.get_order(&order.order_id).await.unwrap();
    assert_eq!(fetched.request_id, "req-1");
}

#[tokio::test]
async fn second_buy_is_already_bought() {
    let state = setup_with_row().await;
    state
        .purchases
        .buy("req-1", 0, "Budi", "Jl. Merdeka 1")
        .await
        .unwrap();

    let err = state
        .purchases
        .buy("req-1", 0, "Siti", "Jl. Sudirman 2")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Conflict(ConflictCode::AlreadyBought)
    ));

    // Still exactly one order
    let orders = state.purchases.orders_for_request("req-1").await.unwrap();
    assert_eq!(orders.len(), 1);
}

#[tokio::test]
async fn failed_buys_leave_no_trace() {
    let state = setup_with_row().await;

    let err = state
        .purchases
        .buy("req-missing", 0, "Budi", "Jl. Merdeka 1")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(ResourceKind::Request)));

    // Row 1 was never filled
    let err = state
        .purchases
        .buy("req-1", 1, "Budi", "Jl. Merdeka 1")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(ResourceKind::Row)));

    let request = state.lifecycle.get_request("req-1").await.unwrap();
    assert_eq!(request.status, RequestStatus::New);
    assert!(request.bought_order_id.is_none());
    assert!(state
        .purchases
        .orders_for_request("req-1")
        .await
        .unwrap()
        .is_empty());
    assert!(state
        .purchases
        .orders_for_request("req-missing")
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_buyers_produce_exactly_one_order() {
    let state = setup_with_row().await;

    let mut handles = Vec::new();
    for i in 0..6 {
        let st = state.clone();
        handles.push(tokio::spawn(async move {
            let name = format!("buyer-{i}");
            for _ in 0..50 {
                match st.purchases.buy("req-1", 0, &name, "Jl. Raya 1").await {
                    Ok(order) => return Some(order.order_id),
                    Err(e) if e.is_transient() => {
                        tokio::time::sleep(Duration::from_millis(5)).await;
                    }
                    Err(AppError::Conflict(ConflictCode::AlreadyBought)) => return None,
                    Err(e) => panic!("unexpected buy error: {e}"),
                }
            }
            None
        }));
    }

    let mut winners = Vec::new();
    for h in handles {
        if let Some(id) = h.await.unwrap() {
            winners.push(id);
        }
    }
    assert_eq!(winners.len(), 1, "exactly one buyer must win");

    let orders = state.purchases.orders_for_request("req-1").await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].order_id, winners[0]);

    let request = state.lifecycle.get_request("req-1").await.unwrap();
    assert_eq!(request.bought_order_id.as_deref(), Some(winners[0].as_str()));
}

#[tokio::test]
async fn standalone_order_intake() {
    let state = setup_with_row().await;
    let order = state
        .purchases
        .create_order("req-1", 0, "es campur", "Warung Manis", 8000, "Budi", "Jl. Raya 1")
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::NewOrder);

    // Direct intake does not advance the request lifecycle
    let request = state.lifecycle.get_request("req-1").await.unwrap();
    assert_eq!(request.status, RequestStatus::New);
}

#[tokio::test]
async fn buy_input_validation() {
    let state = setup_with_row().await;
    assert!(matches!(
        state.purchases.buy("req-1", 5, "Budi", "Jl. Raya 1").await,
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        state.purchases.buy("req-1", 0, " ", "Jl. Raya 1").await,
        Err(AppError::Validation(_))
    ));
}
