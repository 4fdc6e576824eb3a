use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Origin the payment processor redirects back to after checkout.
    pub public_origin: String,
    pub payment_api_base: String,
    pub payment_secret_key: String,
    pub currency: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let public_origin =
            env::var("PUBLIC_ORIGIN").unwrap_or_else(|_| "http://localhost:5173".to_string());
        let payment_api_base =
            env::var("PAYMENT_API_BASE").unwrap_or_else(|_| "https://api.stripe.com".to_string());
        let payment_secret_key = env::var("PAYMENT_SECRET_KEY")?;
        let currency = env::var("CHECKOUT_CURRENCY").unwrap_or_else(|_| "ngn".to_string());
        Ok(Self {
            database_url,
            host,
            port,
            public_origin,
            payment_api_base,
            payment_secret_key,
            currency,
        })
    }
}
