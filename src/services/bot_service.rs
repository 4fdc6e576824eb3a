use crate::{
    currency::format_naira,
    dto::bot::{BotRequest, BotResponse},
    error::{AppError, AppResult},
    models::Product,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const WELCOME: &str = "Hello! I'm your agricultural assistant. I can help you with farming advice, crop management, pest control, and more. What would you like to know?";

const FALLBACK: &str = "I can help with crop management, pest control, soil health, livestock care, and prices for our produce. Could you tell me a bit more about your farm question?";

/// Canned advice keyed on farming topics. First matching topic wins, in
/// the order listed here.
pub fn advice_for(message: &str) -> Option<&'static str> {
    let lower = message.to_lowercase();

    if lower.contains("pest") || lower.contains("insect") || lower.contains("weevil") {
        return Some(
            "For pest control, start with prevention: rotate crops each season, remove crop residue after harvest, and inspect leaves weekly. Neem-based sprays handle most soft-bodied insects without harming pollinators. Escalate to targeted pesticides only when you can name the pest.",
        );
    }
    if lower.contains("fertilizer") || lower.contains("soil") || lower.contains("compost") {
        return Some(
            "Healthy soil beats heavy fertilizing. Test your soil before amending, work in composted manure ahead of planting, and side-dress nitrogen-hungry crops like maize about four weeks after emergence. Mulching keeps moisture in and suppresses weeds.",
        );
    }
    if lower.contains("irrigat") || lower.contains("water") {
        return Some(
            "Water deeply and less often rather than a little every day; shallow watering trains shallow roots. Early morning is the best time, and drip lines or perforated bottles at the root zone waste far less than overhead spraying.",
        );
    }
    if lower.contains("plant") || lower.contains("crop") || lower.contains("seed") {
        return Some(
            "Match the crop to the season: plant at the onset of reliable rains, use certified seed, and space rows for airflow to cut fungal pressure. Staggering plantings two weeks apart smooths out your harvest and your income.",
        );
    }
    if lower.contains("harvest") || lower.contains("storage") || lower.contains("ripe") {
        return Some(
            "Harvest in the cool of the morning and get produce out of the sun immediately. Cure onions and tubers before storing, keep grains below 13 percent moisture, and never store bruised produce with sound stock.",
        );
    }
    if lower.contains("livestock") || lower.contains("poultry") || lower.contains("chicken")
        || lower.contains("goat")
    {
        return Some(
            "Keep livestock housing dry and ventilated, deworm on a fixed schedule, and quarantine new animals for two weeks before mixing them with the herd. For poultry, clean water and a consistent feed routine matter more than any supplement.",
        );
    }
    if lower.contains("weather") || lower.contains("rain") || lower.contains("season")
        || lower.contains("drought")
    {
        return Some(
            "Plan around the rains rather than against them: harvest rainwater where you can, mulch to hold soil moisture through dry spells, and keep drainage channels clear before the wet season peaks.",
        );
    }
    if lower.contains("deliver") || lower.contains("shipping") || lower.contains("order") {
        return Some(
            "Orders placed before noon leave the farm the same day. Deliveries within Enugu usually arrive within 24 hours; other states go through courier partners and take two to three days. Leafy greens travel in the refrigerated van, so they arrive as cut.",
        );
    }
    if is_greeting(&lower) {
        return Some(WELCOME);
    }

    None
}

// Greetings match on whole words; substring matching would fire on words
// like "shipping" or "chicken".
fn is_greeting(lower: &str) -> bool {
    lower
        .split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
        .any(|word| matches!(word, "hello" | "hi" | "hey" | "greetings"))
}

/// Answer a price question from the current catalog. Matches product names
/// against words in the message; with no specific match, quotes a short
/// sample of current prices.
pub fn price_reply(products: &[Product], message: &str) -> Option<String> {
    let lower = message.to_lowercase();
    let asks_price =
        lower.contains("price") || lower.contains("cost") || lower.contains("how much");
    if !asks_price {
        return None;
    }

    let matches: Vec<&Product> = products
        .iter()
        .filter(|p| {
            let name = p.name.to_lowercase();
            name.split_whitespace().any(|word| lower.contains(word))
        })
        .collect();

    let specific = !matches.is_empty();
    let quoted: Vec<&Product> = if specific {
        matches
    } else {
        products.iter().take(5).collect()
    };

    if quoted.is_empty() {
        return Some(
            "Our shop has no products listed at the moment. Please check back soon.".to_string(),
        );
    }

    let intro = if specific {
        "Here are our current prices:"
    } else {
        "Here are some of our current prices:"
    };

    let mut lines: Vec<String> = Vec::with_capacity(quoted.len() + 1);
    lines.push(intro.to_string());
    for product in &quoted {
        lines.push(format!(
            "{} sells for {} per {}.",
            product.name,
            format_naira(product.price),
            product.unit
        ));
    }
    Some(lines.join("\n"))
}

pub async fn respond(
    state: &AppState,
    payload: BotRequest,
) -> AppResult<ApiResponse<BotResponse>> {
    let message = payload.message.trim();
    if message.is_empty() {
        return Err(AppError::BadRequest("message is empty".to_string()));
    }

    let reply = if looks_like_price_question(message) {
        let products: Vec<Product> = sqlx::query_as("SELECT * FROM products ORDER BY name")
            .fetch_all(&state.pool)
            .await?;
        price_reply(&products, message)
    } else {
        None
    };

    let reply = reply
        .or_else(|| advice_for(message).map(str::to_string))
        .unwrap_or_else(|| FALLBACK.to_string());

    Ok(ApiResponse::success(
        "OK",
        BotResponse { response: reply },
        Some(Meta::empty()),
    ))
}

fn looks_like_price_question(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("price") || lower.contains("cost") || lower.contains("how much")
}
