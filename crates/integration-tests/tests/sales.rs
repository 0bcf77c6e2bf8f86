//! End-to-end tests for customers, products, orders and the sales report.
//!
//! These tests require a migrated database and a running server
//! (cargo run -p salesbook-web). Run with: cargo test -- --ignored

#![allow(clippy::unwrap_used)]

use chrono::{Days, NaiveDate};
use reqwest::StatusCode;
use serde_json::Value;
use uuid::Uuid;

use salesbook_integration_tests::{Session, id_after, location};

fn unique(prefix: &str) -> String {
    format!("{prefix}{}", &Uuid::new_v4().simple().to_string()[..8])
}

#[tokio::test]
#[ignore = "Requires running salesbook server"]
async fn test_customer_lifecycle() {
    let session = Session::new("customers").await;
    let name = unique("Acme");
    let customer_id = session.create_customer(&name).await;

    let body = session.page(&format!("/customers/{customer_id}")).await;
    assert!(body.contains(&name));
    assert!(body.contains("buyer@example.com"));

    let renamed = unique("Globex");
    let resp = session
        .post(
            &format!("/customers/{customer_id}/update"),
            &[
                ("name", renamed.as_str()),
                ("phone", "555-0199"),
                ("email", "buyer@example.com"),
                ("address", "2 Harbor Rd"),
            ],
        )
        .await;
    assert_eq!(location(&resp), format!("/customers/{customer_id}"));
    let body = session.page(&format!("/customers/{customer_id}")).await;
    assert!(body.contains(&format!("Successfully updated customer:  {renamed}")));

    let resp = session.post(&format!("/customers/{customer_id}/delete"), &[]).await;
    assert_eq!(location(&resp), "/");
    let body = session.page("/").await;
    assert!(body.contains(&format!("{renamed} has been deleted.")));

    let resp = session.get(&format!("/customers/{customer_id}")).await;
    assert_eq!(location(&resp), "/");
    assert!(session.page("/").await.contains("Customer not found."));
}

#[tokio::test]
#[ignore = "Requires running salesbook server"]
async fn test_customer_form_reports_invalid_email() {
    let session = Session::new("badmail").await;
    let resp = session
        .post(
            "/customers/new",
            &[("name", "Initech"), ("email", "not-an-email")],
        )
        .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Enter a valid email address."));
}

#[tokio::test]
#[ignore = "Requires running salesbook server"]
async fn test_product_form_rejects_bad_price() {
    let session = Session::new("badprice").await;
    let resp = session
        .post(
            "/products/new",
            &[("name", "Widget"), ("price", "1.234"), ("inventory", "3")],
        )
        .await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running salesbook server"]
async fn test_orders_move_inventory() {
    let session = Session::new("orders").await;
    let customer_id = session.create_customer(&unique("Umbrella")).await;
    let product = unique("Gadget");
    let product_id = session.create_product(&product, "2.50", 5).await;
    let product_id = product_id.to_string();

    // Asking for more than is on hand writes nothing.
    let resp = session
        .post(
            &format!("/customers/{customer_id}/orders/new"),
            &[("product_0", product_id.as_str()), ("quantity_0", "9"), ("status_0", "Pending")],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains(&format!("Not enough {product} in stock: 5 available.")));

    let resp = session
        .post(
            &format!("/customers/{customer_id}/orders/new"),
            &[("product_0", product_id.as_str()), ("quantity_0", "5"), ("status_0", "Pending")],
        )
        .await;
    assert_eq!(location(&resp), format!("/customers/{customer_id}"));

    let body = session.page(&format!("/products?name={product}")).await;
    assert!(body.contains("Out of Stock"));

    let body = session.page(&format!("/customers/{customer_id}")).await;
    assert!(body.contains("Successfully created order."));
    assert!(body.contains("$12.50"));
    let order_id = id_after(&body, "/orders/").unwrap();

    let resp = session
        .post(
            &format!("/customers/{customer_id}/orders/{order_id}/update"),
            &[("status", "Delivered")],
        )
        .await;
    assert_eq!(location(&resp), format!("/customers/{customer_id}"));
    let body = session.page(&format!("/customers/{customer_id}")).await;
    assert!(body.contains("Successfully updated order!"));
    assert!(body.contains("Delivered"));

    let resp = session
        .post(&format!("/customers/{customer_id}/orders/{order_id}/delete"), &[])
        .await;
    assert_eq!(location(&resp), format!("/customers/{customer_id}"));

    let body = session.page(&format!("/products?name={product}")).await;
    assert!(body.contains("<td>5</td>"));
    assert!(body.contains("In Stock"));
}

#[tokio::test]
#[ignore = "Requires running salesbook server"]
async fn test_empty_order_is_rejected() {
    let session = Session::new("emptyorder").await;
    let customer_id = session.create_customer(&unique("Hooli")).await;

    let resp = session
        .post(&format!("/customers/{customer_id}/orders/new"), &[])
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Add at least one order line."));
}

#[tokio::test]
#[ignore = "Requires running salesbook server"]
async fn test_sales_report_shape() {
    let session = Session::new("report").await;
    let customer = unique("Vandelay");
    let customer_id = session.create_customer(&customer).await;
    let product = unique("Latex");
    let product_id = session.create_product(&product, "4.00", 10).await.to_string();

    let resp = session
        .post(
            &format!("/customers/{customer_id}/orders/new"),
            &[("product_0", product_id.as_str()), ("quantity_0", "3"), ("status_0", "Shipped")],
        )
        .await;
    assert_eq!(location(&resp), format!("/customers/{customer_id}"));

    let resp = session.get("/data").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let report: Value = resp.json().await.unwrap();

    assert_eq!(report["data_1"].as_array().unwrap().len(), 1);
    let customers = report["data_2"].as_array().unwrap();
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0]["customer_name"], customer.as_str());
    assert_eq!(customers[0]["sales_sum"], "12.00");
    let products = report["data_3"].as_array().unwrap();
    assert_eq!(products[0]["product_name"], product.as_str());
    assert_eq!(products[0]["quantity_sum"], 3);
}

#[tokio::test]
#[ignore = "Requires running salesbook server"]
async fn test_short_line_rolls_back_whole_order() {
    let session = Session::new("rollback").await;
    let customer_id = session.create_customer(&unique("Wonka")).await;
    let plenty = unique("Bolt");
    let plenty_id = session.create_product(&plenty, "1.00", 5).await.to_string();
    let scarce = unique("Nut");
    let scarce_id = session.create_product(&scarce, "1.00", 1).await.to_string();

    let resp = session
        .post(
            &format!("/customers/{customer_id}/orders/new"),
            &[
                ("product_0", plenty_id.as_str()),
                ("quantity_0", "2"),
                ("status_0", "Pending"),
                ("product_1", scarce_id.as_str()),
                ("quantity_1", "3"),
                ("status_1", "Pending"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains(&format!("Not enough {scarce} in stock: 1 available.")));

    // The first line's decrement was undone with the rest.
    let body = session.page(&format!("/products?name={plenty}")).await;
    assert!(body.contains("<td>5</td>"));
    let body = session.page(&format!("/customers/{customer_id}")).await;
    assert_eq!(id_after(&body, "/orders/"), None);
}

#[tokio::test]
#[ignore = "Requires running salesbook server"]
async fn test_report_handles_large_totals() {
    let session = Session::new("bigspender").await;
    let customer = unique("Tyrell");
    let customer_id = session.create_customer(&customer).await;
    let product_id = session
        .create_product(&unique("Replicant"), "99999999.99", 200)
        .await
        .to_string();

    let resp = session
        .post(
            &format!("/customers/{customer_id}/orders/new"),
            &[("product_0", product_id.as_str()), ("quantity_0", "200"), ("status_0", "Pending")],
        )
        .await;
    assert_eq!(location(&resp), format!("/customers/{customer_id}"));

    let body = session.page(&format!("/customers/{customer_id}")).await;
    assert!(body.contains(&customer));

    let resp = session.get("/data").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let report: Value = resp.json().await.unwrap();
    assert_eq!(report["data_1"][0]["daily_sales"], "19999999998.00");
    assert_eq!(report["data_2"][0]["sales_sum"], "19999999998.00");
}

#[tokio::test]
#[ignore = "Requires running salesbook server"]
async fn test_order_date_filter_bounds_are_exclusive() {
    let session = Session::new("datefilter").await;
    let customer_id = session.create_customer(&unique("Cyberdyne")).await;
    let product_id = session.create_product(&unique("Chip"), "3.00", 4).await.to_string();

    let resp = session
        .post(
            &format!("/customers/{customer_id}/orders/new"),
            &[("product_0", product_id.as_str()), ("quantity_0", "1"), ("status_0", "Pending")],
        )
        .await;
    assert_eq!(location(&resp), format!("/customers/{customer_id}"));

    // The server's idea of the order date, as reported for the chart.
    let report: Value = session.get("/data").await.json().await.unwrap();
    let ordered: NaiveDate = report["data_1"][0]["date"].as_str().unwrap().parse().unwrap();
    let before = ordered.checked_sub_days(Days::new(1)).unwrap();
    let after = ordered.checked_add_days(Days::new(1)).unwrap();

    let listed = |query: String| {
        let session = &session;
        async move {
            let body = session.page(&format!("/customers/{customer_id}?{query}")).await;
            id_after(&body, "/orders/").is_some()
        }
    };

    assert!(!listed(format!("start_date={ordered}")).await);
    assert!(!listed(format!("end_date={ordered}")).await);
    assert!(listed(format!("start_date={before}")).await);
    assert!(listed(format!("end_date={after}")).await);
    assert!(listed(format!("start_date={before}&end_date={after}")).await);
}

#[tokio::test]
#[ignore = "Requires running salesbook server"]
async fn test_product_price_filter_bounds_are_exclusive() {
    let session = Session::new("pricefilter").await;
    let name = unique("Sprocket");
    let product_id = session.create_product(&name, "2.50", 3).await;

    let listed = |query: &'static str| {
        let session = &session;
        let name = &name;
        async move {
            let body = session.page(&format!("/products?name={name}&{query}")).await;
            id_after(&body, "/products/") == Some(product_id)
        }
    };

    assert!(!listed("price__gt=2.50").await);
    assert!(!listed("price__lt=2.50").await);
    assert!(listed("price__gt=2.49").await);
    assert!(listed("price__lt=2.51").await);
}

#[tokio::test]
#[ignore = "Requires running salesbook server"]
async fn test_flash_waits_for_next_rendered_page() {
    let session = Session::new("flashes").await;
    let customer = unique("Initrode");
    let product = unique("Stapler");

    let resp = session
        .post(
            "/customers/new",
            &[
                ("name", customer.as_str()),
                ("phone", "555-0199"),
                ("email", "buyer@example.com"),
                ("address", "2 Harbor Rd"),
            ],
        )
        .await;
    assert_eq!(location(&resp), "/");

    // A second submission that redirects must not swallow the first message.
    let resp = session
        .post(
            "/products/new",
            &[("name", product.as_str()), ("price", "7.00"), ("inventory", "2")],
        )
        .await;
    assert_eq!(location(&resp), "/products");

    let body = session.page("/products").await;
    assert!(body.contains(&format!("Successfully created customer:  {customer}")));
    assert!(body.contains(&format!("Successfully created product:  {product}")));
}
