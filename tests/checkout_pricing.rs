use farmgate_api::{
    currency::format_naira,
    dto::checkout::{CheckoutItem, CheckoutResponse, CustomerInfo, VerifyPaymentRequest},
    models::OrderStatus,
    services::checkout_service::{compute_total_major, compute_total_minor, session_request},
};
use uuid::Uuid;

fn sample_items() -> Vec<CheckoutItem> {
    vec![
        CheckoutItem {
            id: Uuid::new_v4(),
            name: "Organic Tomatoes".into(),
            description: Some("Vine-ripened".into()),
            price: 500,
            quantity: 2,
        },
        CheckoutItem {
            id: Uuid::new_v4(),
            name: "Raw Honey".into(),
            description: None,
            price: 1200,
            quantity: 1,
        },
    ]
}

#[test]
fn totals_sum_line_prices() {
    let items = sample_items();
    assert_eq!(compute_total_major(&items), 2200);
    assert_eq!(compute_total_minor(&items), 220_000);

    assert_eq!(compute_total_major(&[]), 0);
}

#[test]
fn session_form_quotes_lines_in_kobo() {
    let items = sample_items();
    let user_id = Uuid::new_v4();
    let request = session_request(
        "cus_123",
        "ngn",
        "https://shop.example",
        user_id,
        &items,
        "{\"firstName\":\"Ada\"}".to_string(),
    );

    let form = request.to_form();
    let get = |key: &str| -> &str {
        form.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .unwrap_or_else(|| panic!("missing form key {key}"))
    };

    assert_eq!(get("customer"), "cus_123");
    assert_eq!(get("mode"), "payment");
    assert_eq!(
        get("success_url"),
        "https://shop.example/checkout/success?session_id={CHECKOUT_SESSION_ID}"
    );
    assert_eq!(get("cancel_url"), "https://shop.example/checkout/cancel");
    assert_eq!(get("metadata[user_id]"), user_id.to_string());
    assert_eq!(get("metadata[customer_info]"), "{\"firstName\":\"Ada\"}");

    assert_eq!(get("line_items[0][price_data][currency]"), "ngn");
    assert_eq!(
        get("line_items[0][price_data][product_data][name]"),
        "Organic Tomatoes"
    );
    assert_eq!(
        get("line_items[0][price_data][product_data][description]"),
        "Vine-ripened"
    );
    assert_eq!(get("line_items[0][price_data][unit_amount]"), "50000");
    assert_eq!(get("line_items[0][quantity]"), "2");

    assert_eq!(get("line_items[1][price_data][unit_amount]"), "120000");
    assert_eq!(get("line_items[1][quantity]"), "1");

    // A line without a description sends no description key.
    assert!(
        !form
            .iter()
            .any(|(k, _)| k == "line_items[1][price_data][product_data][description]")
    );
}

#[test]
fn settlement_status_maps_onto_order_status() {
    assert_eq!(OrderStatus::from_payment_status("paid"), OrderStatus::Paid);
    assert_eq!(
        OrderStatus::from_payment_status("unpaid"),
        OrderStatus::Failed
    );
    assert_eq!(
        OrderStatus::from_payment_status("no_payment_required"),
        OrderStatus::Pending
    );
    assert_eq!(OrderStatus::from_payment_status(""), OrderStatus::Pending);

    assert_eq!(OrderStatus::Paid.as_str(), "paid");
    assert_eq!(OrderStatus::Failed.as_str(), "failed");
    assert_eq!(OrderStatus::Pending.as_str(), "pending");
}

#[test]
fn naira_amounts_group_thousands_without_decimals() {
    assert_eq!(format_naira(0), "₦0");
    assert_eq!(format_naira(500), "₦500");
    assert_eq!(format_naira(2200), "₦2,200");
    assert_eq!(format_naira(220_000), "₦220,000");
    assert_eq!(format_naira(1_234_567), "₦1,234,567");
    assert_eq!(format_naira(-2200), "-₦2,200");
}

#[test]
fn checkout_wire_shapes_use_camel_case() {
    let order_id = Uuid::new_v4();
    let response = CheckoutResponse {
        url: "https://pay.example/cs_1".into(),
        order_id,
    };
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["url"], "https://pay.example/cs_1");
    assert_eq!(value["orderId"], order_id.to_string());

    let request: VerifyPaymentRequest =
        serde_json::from_str(r#"{"sessionId": "cs_test_1"}"#).unwrap();
    assert_eq!(request.session_id, "cs_test_1");

    // zipCode may be omitted by the storefront form.
    let info: CustomerInfo = serde_json::from_str(
        r#"{
            "firstName": "Ada",
            "lastName": "Obi",
            "email": "ada@example.com",
            "phone": "0801",
            "address": "1 Farm Road",
            "city": "Enugu",
            "state": "Enugu"
        }"#,
    )
    .unwrap();
    assert_eq!(info.zip_code, "");
    assert_eq!(info.full_name(), "Ada Obi");
}
