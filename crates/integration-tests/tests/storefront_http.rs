//! Integration tests for the storefront HTTP surface.
//!
//! Each test builds a fresh router with its own in-memory session store and
//! drives it with form posts, following redirects by hand.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use techstore_core::Catalog;
use techstore_integration_tests::{TestClient, test_app, test_app_with};

fn product_names_shown(body: &str) -> Vec<&'static str> {
    [
        "MacBook Pro 14",
        "iPhone 15 Pro",
        "Nike Air Max",
        "Casque Sony WH-1000XM5",
        "Montre Apple Watch",
        "Sac à dos Leather",
    ]
    .into_iter()
    .filter(|name| body.contains(&format!("<h2>{name}")))
    .collect()
}

// =============================================================================
// Page and Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let mut client = TestClient::new(test_app());
    let response = client.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "ok");
}

#[tokio::test]
async fn test_initial_page() {
    let mut client = TestClient::new(test_app());
    let response = client.get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Découvrez nos produits"));
    assert_eq!(product_names_shown(&response.body).len(), 6);
    assert!(!response.body.contains("cart-badge"));
    assert!(!response.body.contains("cart-panel"));
    // Viewing the page alone does not start a session
    assert!(client.cookie().is_none());
}

#[tokio::test]
async fn test_security_and_request_id_headers() {
    let mut client = TestClient::new(test_app());
    let response = client.get("/").await;

    assert_eq!(response.header("x-frame-options"), Some("DENY"));
    assert_eq!(response.header("x-content-type-options"), Some("nosniff"));
    let csp = response.header("content-security-policy").unwrap_or_default();
    assert!(csp.contains("img-src 'self' https://images.unsplash.com;"));
    assert!(response.header("x-request-id").is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn test_upstream_request_id_is_echoed() {
    let mut client = TestClient::new(test_app());
    let request = axum::http::Request::builder()
        .uri("/health")
        .header("x-request-id", "req-42")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = client.send(request).await;
    assert_eq!(response.header("x-request-id"), Some("req-42"));
}

// =============================================================================
// Cart Actions
// =============================================================================

#[tokio::test]
async fn test_add_to_cart_redirects_and_updates_badge() {
    let mut client = TestClient::new(test_app());

    let response = client.post_form("/cart/add", "product_id=1").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));
    assert!(client.cookie().is_some_and(|c| c.starts_with("techstore_session=")));

    client.post_form("/cart/add", "product_id=1").await;
    client.post_form("/cart/add", "product_id=2").await;

    let page = client.get("/").await;
    assert!(page.body.contains(r#"<span class="cart-badge">3</span>"#));
}

#[tokio::test]
async fn test_add_unknown_product_is_not_found() {
    let mut client = TestClient::new(test_app());

    let response = client.post_form("/cart/add", "product_id=999").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let page = client.get("/").await;
    assert!(!page.body.contains("cart-badge"));
}

#[tokio::test]
async fn test_malformed_form_is_bad_request() {
    let mut client = TestClient::new(test_app());

    let response = client.post_form("/cart/add", "product_id=abc").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = client.post_form("/cart/update", "product_id=1").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cart_panel_contents_and_totals() {
    let mut client = TestClient::new(test_app());
    client.post_form("/cart/add", "product_id=1").await;
    client.post_form("/cart/add", "product_id=1").await;
    client.post_form("/cart/add", "product_id=2").await;

    let response = client.post_form("/cart/open", "").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);

    let page = client.get("/").await;
    assert!(page.body.contains("Panier (3)"));
    assert!(page.body.contains("5997€"));
    assert!(page.body.contains("Procéder au paiement"));

    // "-" on the MacBook posts quantity 1
    client
        .post_form("/cart/update", "product_id=1&quantity=1")
        .await;
    let page = client.get("/").await;
    assert!(page.body.contains("Panier (2)"));
    assert!(page.body.contains("3598€"));
}

#[tokio::test]
async fn test_update_to_zero_and_remove_empty_the_cart() {
    let mut client = TestClient::new(test_app());
    client.post_form("/cart/add", "product_id=3").await;
    client.post_form("/cart/add", "product_id=4").await;
    client.post_form("/cart/open", "").await;

    client
        .post_form("/cart/update", "product_id=3&quantity=0")
        .await;
    client.post_form("/cart/remove", "product_id=4").await;

    let page = client.get("/").await;
    assert!(page.body.contains("Panier (0)"));
    assert!(page.body.contains("Votre panier est vide"));
    assert!(!page.body.contains("Procéder au paiement"));
}

#[tokio::test]
async fn test_close_panel_keeps_cart() {
    let mut client = TestClient::new(test_app());
    client.post_form("/cart/add", "product_id=6").await;
    client.post_form("/cart/open", "").await;
    client.post_form("/cart/close", "").await;

    let page = client.get("/").await;
    assert!(!page.body.contains("cart-panel"));
    assert!(page.body.contains(r#"<span class="cart-badge">1</span>"#));
}

#[tokio::test]
async fn test_checkout_leaves_cart_untouched() {
    let mut client = TestClient::new(test_app());
    client.post_form("/cart/add", "product_id=5").await;
    client.post_form("/cart/open", "").await;

    let response = client.post_form("/checkout", "").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);

    let page = client.get("/").await;
    assert!(page.body.contains("Panier (1)"));
    assert!(page.body.contains("449€"));
}

#[tokio::test]
async fn test_huge_totals_render_instead_of_failing() {
    let catalog = Catalog::from_json_str(
        r#"{"products": [
            {"id": 1, "name": "Vault", "price": "50000000000000000000000000000",
             "image": "", "category": "Luxe", "rating": "5", "description": ""}
        ]}"#,
    )
    .unwrap();
    let mut client = TestClient::new(test_app_with(catalog));
    client.post_form("/cart/add", "product_id=1").await;
    client
        .post_form("/cart/update", "product_id=1&quantity=2")
        .await;
    client.post_form("/cart/open", "").await;

    let page = client.get("/").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Panier (2)"));
    assert!(page.body.contains("79228162514264337593543950335€"));

    let response = client.post_form("/checkout", "").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
}

// =============================================================================
// Category Filter
// =============================================================================

#[tokio::test]
async fn test_select_category() {
    let mut client = TestClient::new(test_app());

    let response = client.post_form("/category", "category=Audio").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);

    let page = client.get("/").await;
    assert_eq!(product_names_shown(&page.body), ["Casque Sony WH-1000XM5"]);
    assert!(page.body.contains(r#"aria-pressed="true">Audio</button>"#));
}

#[tokio::test]
async fn test_select_all_after_category() {
    let mut client = TestClient::new(test_app());
    client
        .post_form("/category", "category=%C3%89lectronique")
        .await;

    let page = client.get("/").await;
    assert_eq!(
        product_names_shown(&page.body),
        ["MacBook Pro 14", "iPhone 15 Pro", "Montre Apple Watch"]
    );

    client.post_form("/category", "category=").await;
    let page = client.get("/").await;
    assert_eq!(product_names_shown(&page.body).len(), 6);
}

#[tokio::test]
async fn test_unknown_category_shows_empty_grid() {
    let mut client = TestClient::new(test_app());
    client.post_form("/category", "category=Jardin").await;

    let page = client.get("/").await;
    assert!(product_names_shown(&page.body).is_empty());
    assert!(page.body.contains("Aucun produit dans cette catégorie."));
}

// =============================================================================
// Sessions
// =============================================================================

#[tokio::test]
async fn test_sessions_are_isolated() {
    let app = test_app();
    let mut alice = TestClient::new(app.clone());
    let mut bob = TestClient::new(app);

    alice.post_form("/cart/add", "product_id=1").await;
    alice.post_form("/category", "category=Mode").await;

    let page = bob.get("/").await;
    assert!(!page.body.contains("cart-badge"));
    assert_eq!(product_names_shown(&page.body).len(), 6);

    let page = alice.get("/").await;
    assert!(page.body.contains(r#"<span class="cart-badge">1</span>"#));
    assert_eq!(product_names_shown(&page.body), ["Nike Air Max"]);
}

#[tokio::test]
async fn test_new_session_starts_fresh() {
    let app = test_app();
    let mut first = TestClient::new(app.clone());
    first.post_form("/cart/add", "product_id=2").await;

    // Dropping the cookie is a reload in a new browser session
    let mut reloaded = TestClient::new(app);
    let page = reloaded.get("/").await;
    assert!(!page.body.contains("cart-badge"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_on_one_session_are_all_kept() {
    let mut client = TestClient::new(test_app());
    client.post_form("/cart/add", "product_id=1").await;
    assert!(client.cookie().is_some());

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..50 {
        let mut tab = client.clone();
        tasks.spawn(async move { tab.post_form("/cart/add", "product_id=1").await.status });
    }
    while let Some(status) = tasks.join_next().await {
        assert_eq!(status.unwrap(), StatusCode::SEE_OTHER);
    }

    client.post_form("/cart/open", "").await;
    let page = client.get("/").await;
    assert!(page.body.contains("Panier (51)"));
}
