//! Catalog query tests: category normalization, availability filtering
//! and the rating/price ranking.

use warung_server::{AppError, Config, ServerState};

fn test_config() -> Config {
    Config {
        work_dir: "/tmp/warung-test".into(),
        http_port: 0,
        log_level: "warn".into(),
        environment: "development".into(),
        claim_window: 20,
    }
}

async fn setup() -> ServerState {
    let state = ServerState::initialize_in_memory(&test_config())
        .await
        .expect("in-memory state");
    for (name, price, rating, category, available) in [
        ("Rendang Spesial", 25000, 4.8, "Nasi Padang", true),
        ("Rendang Hemat", 18000, 4.8, "nasi padang", true),
        ("Ayam Pop", 20000, 4.5, " NASI PADANG ", true),
        ("Dendeng Balado", 30000, 4.9, "nasi padang", false),
        ("Mie Ayam", 12000, 4.7, "mie ayam", true),
    ] {
        state
            .catalog
            .create_menu(name, price, "seller-1", "Warung Uni", 15, rating, category, available)
            .await
            .unwrap();
    }
    state
}

#[tokio::test]
async fn query_normalizes_and_filters_availability() {
    let state = setup().await;

    // Raw request text with stray casing and whitespace
    let menus = state.catalog.find_available("  Nasi PADANG ").await.unwrap();
    let names: Vec<&str> = menus.iter().map(|m| m.name.as_str()).collect();

    // Dendeng Balado is unavailable, Mie Ayam is another category;
    // equal ratings break on price
    assert_eq!(names, vec!["Rendang Hemat", "Rendang Spesial", "Ayam Pop"]);
}

#[tokio::test]
async fn query_is_idempotent_under_renormalization() {
    let state = setup().await;
    let raw = state.catalog.find_available(" Nasi Padang ").await.unwrap();
    let normalized = state.catalog.find_available("nasi padang").await.unwrap();
    assert_eq!(raw.len(), normalized.len());
}

#[tokio::test]
async fn empty_category_and_bad_menus_are_rejected() {
    let state = setup().await;
    assert!(matches!(
        state.catalog.find_available("   ").await,
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        state
            .catalog
            .create_menu("X", -1, "s", "v", 1, 4.0, "cat", true)
            .await,
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        state
            .catalog
            .create_menu("X", 1000, "s", "v", 1, 9.9, "cat", true)
            .await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn pick_fills_a_row_with_the_best_menu() {
    let state = setup().await;
    state
        .lifecycle
        .create_request("req-1", " Nasi Padang ")
        .await
        .unwrap();

    let row = state.offers.pick_and_fill_row("req-1", None).await.unwrap();
    assert_eq!(row.row_index, 0);
    assert_eq!(row.content, "Rendang Hemat");
    assert_eq!(row.price, 18000);

    // No catalog match for this category
    state
        .lifecycle
        .create_request("req-2", "sushi")
        .await
        .unwrap();
    assert!(matches!(
        state.offers.pick_and_fill_row("req-2", None).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn pick_honors_the_sellers_chosen_menu() {
    let state = setup().await;
    state
        .lifecycle
        .create_request("req-1", "nasi padang")
        .await
        .unwrap();

    // Not the top-ranked entry, matched case-insensitively
    let row = state
        .offers
        .pick_and_fill_row("req-1", Some(" ayam POP "))
        .await
        .unwrap();
    assert_eq!(row.content, "Ayam Pop");
    assert_eq!(row.price, 20000);

    // Unavailable and out-of-category menus cannot be chosen
    assert!(matches!(
        state
            .offers
            .pick_and_fill_row("req-1", Some("Dendeng Balado"))
            .await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        state.offers.pick_and_fill_row("req-1", Some("Mie Ayam")).await,
        Err(AppError::NotFound(_))
    ));
}
