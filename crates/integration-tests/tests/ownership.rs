//! End-to-end tests that one user cannot reach another user's records.
//!
//! These tests require a migrated database and a running server
//! (cargo run -p salesbook-web). Run with: cargo test -- --ignored

#![allow(clippy::unwrap_used)]

use serde_json::Value;
use uuid::Uuid;

use salesbook_core::AccessDenied;
use salesbook_integration_tests::{Session, id_after, location};

const NOTICE: &str = AccessDenied::NOTICE;

/// Products are a shared catalog, so their names must not collide across runs.
fn product_name(prefix: &str) -> String {
    format!("{prefix}{}", &Uuid::new_v4().simple().to_string()[..8])
}

#[tokio::test]
#[ignore = "Requires running salesbook server"]
async fn test_other_users_customer_is_denied() {
    let owner = Session::new("owner").await;
    let intruder = Session::new("intruder").await;
    let customer_id = owner.create_customer("Soylent").await;

    for path in [
        format!("/customers/{customer_id}"),
        format!("/customers/{customer_id}/update"),
        format!("/customers/{customer_id}/delete"),
        format!("/customers/{customer_id}/orders/new"),
    ] {
        let resp = intruder.get(&path).await;
        assert_eq!(location(&resp), "/", "GET {path}");
    }

    let resp = intruder.post(&format!("/customers/{customer_id}/delete"), &[]).await;
    assert_eq!(location(&resp), "/");
    assert!(intruder.page("/").await.contains(NOTICE));

    // Still there for its owner.
    owner.page(&format!("/customers/{customer_id}")).await;
}

#[tokio::test]
#[ignore = "Requires running salesbook server"]
async fn test_other_users_profile_is_denied() {
    let owner = Session::new("profowner").await;
    let intruder = Session::new("profintruder").await;
    let profile_id = id_after(&owner.page("/").await, "/profile/").unwrap();

    let resp = intruder.get(&format!("/profile/{profile_id}/update")).await;
    assert_eq!(location(&resp), "/");
    assert!(intruder.page("/").await.contains(NOTICE));
}

#[tokio::test]
#[ignore = "Requires running salesbook server"]
async fn test_order_under_another_customer_path_is_not_found() {
    let owner = Session::new("orderpath").await;
    let first = owner.create_customer("Oceanic").await;
    let second = owner.create_customer("Dharma").await;
    let product_id = owner.create_product(&product_name("Numbers"), "4.80", 15).await.to_string();

    let resp = owner
        .post(
            &format!("/customers/{first}/orders/new"),
            &[("product_0", product_id.as_str()), ("quantity_0", "1"), ("status_0", "Pending")],
        )
        .await;
    assert_eq!(location(&resp), format!("/customers/{first}"));
    let body = owner.page(&format!("/customers/{first}")).await;
    let order_id = id_after(&body, "/orders/").unwrap();

    for path in [
        format!("/customers/{second}/orders/{order_id}/update"),
        format!("/customers/{second}/orders/{order_id}/delete"),
    ] {
        let resp = owner.get(&path).await;
        assert_eq!(location(&resp), format!("/customers/{second}"), "GET {path}");
    }
    let resp = owner
        .post(&format!("/customers/{second}/orders/{order_id}/delete"), &[])
        .await;
    assert_eq!(location(&resp), format!("/customers/{second}"));
    assert!(owner.page(&format!("/customers/{second}")).await.contains("Order not found."));

    // Untouched under its own customer.
    owner
        .page(&format!("/customers/{first}/orders/{order_id}/update"))
        .await;
}

#[tokio::test]
#[ignore = "Requires running salesbook server"]
async fn test_report_is_scoped_to_its_owner() {
    let seller = Session::new("reportowner").await;
    let customer_id = seller.create_customer("Monsters").await;
    let product_id = seller.create_product(&product_name("Scream"), "1.25", 8).await.to_string();
    let resp = seller
        .post(
            &format!("/customers/{customer_id}/orders/new"),
            &[("product_0", product_id.as_str()), ("quantity_0", "2"), ("status_0", "Shipped")],
        )
        .await;
    assert_eq!(location(&resp), format!("/customers/{customer_id}"));

    let other = Session::new("reportother").await;
    let report: Value = other.get("/data").await.json().await.unwrap();
    for key in ["data_1", "data_2", "data_3"] {
        assert_eq!(report[key], Value::Array(Vec::new()), "{key}");
    }
}
