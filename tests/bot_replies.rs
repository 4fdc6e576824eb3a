use chrono::Utc;
use farmgate_api::{
    models::Product,
    services::bot_service::{WELCOME, advice_for, price_reply},
};
use uuid::Uuid;

fn product(name: &str, price: i64, unit: &str) -> Product {
    Product {
        id: Uuid::new_v4(),
        name: name.into(),
        description: None,
        price,
        category_id: None,
        image_url: None,
        stock: 10,
        unit: unit.into(),
        created_at: Utc::now(),
    }
}

#[test]
fn advice_matches_farming_topics() {
    let pest = advice_for("How do I deal with pests on my tomatoes?").expect("pest advice");
    assert!(pest.contains("pest") || pest.contains("Neem"));

    let soil = advice_for("what fertilizer should I use").expect("soil advice");
    assert!(soil.to_lowercase().contains("soil"));

    let watering = advice_for("When should I water my maize?").expect("irrigation advice");
    assert!(watering.to_lowercase().contains("water"));

    let delivery = advice_for("Do you deliver to Lagos?").expect("delivery advice");
    assert!(delivery.to_lowercase().contains("deliver"));

    assert!(advice_for("PEST problem").is_some(), "matching is case insensitive");
    assert!(advice_for("tell me a joke").is_none());
}

#[test]
fn bare_greeting_gets_the_welcome_message() {
    assert_eq!(advice_for("Hello!"), Some(WELCOME));
    assert_eq!(advice_for("hi"), Some(WELCOME));

    // A greeting with a topical question answers the question.
    let reply = advice_for("Hi, how do I handle a pest outbreak?").expect("pest advice");
    assert_ne!(reply, WELCOME);
}

#[test]
fn welcome_introduces_the_assistant() {
    assert!(WELCOME.contains("agricultural assistant"));
}

#[test]
fn price_reply_quotes_the_named_product() {
    let products = vec![
        product("Organic Tomatoes", 1200, "lb"),
        product("Raw Honey", 5500, "jar"),
    ];

    let reply =
        price_reply(&products, "How much do your tomatoes cost?").expect("price reply");
    assert!(reply.contains("Organic Tomatoes"));
    assert!(reply.contains("₦1,200"));
    assert!(reply.contains("per lb"));
    assert!(!reply.contains("Raw Honey"));
}

#[test]
fn price_reply_samples_catalog_without_a_match() {
    let products = vec![
        product("Organic Tomatoes", 1200, "lb"),
        product("Raw Honey", 5500, "jar"),
    ];

    let reply = price_reply(&products, "what are your prices?").expect("price reply");
    assert!(reply.contains("Organic Tomatoes"));
    assert!(reply.contains("Raw Honey"));
}

#[test]
fn price_reply_requires_price_intent() {
    let products = vec![product("Organic Tomatoes", 1200, "lb")];
    assert!(price_reply(&products, "do you sell tomatoes?").is_none());
}
