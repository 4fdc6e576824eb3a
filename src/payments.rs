//! Typed client for the hosted payment processor (Stripe-style REST API:
//! form-encoded writes, JSON reads, bearer secret key). Each call gets an
//! explicit request/response record; nothing leaves this module untyped.

use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Substituted by the processor when it redirects back to the success URL.
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

#[derive(Clone)]
pub struct PaymentClient {
    http: reqwest::Client,
    api_base: String,
    secret_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CustomerList {
    data: Vec<Customer>,
}

#[derive(Debug, Clone)]
pub struct CustomerAddress {
    pub line1: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Clone)]
pub struct CreateCustomerRequest {
    pub email: String,
    pub name: String,
    pub phone: String,
    pub address: CustomerAddress,
}

impl CreateCustomerRequest {
    pub fn to_form(&self) -> Vec<(String, String)> {
        vec![
            ("email".into(), self.email.clone()),
            ("name".into(), self.name.clone()),
            ("phone".into(), self.phone.clone()),
            ("address[line1]".into(), self.address.line1.clone()),
            ("address[city]".into(), self.address.city.clone()),
            ("address[state]".into(), self.address.state.clone()),
            ("address[postal_code]".into(), self.address.postal_code.clone()),
            ("address[country]".into(), self.address.country.clone()),
        ]
    }
}

/// One cart line as the processor sees it: display fields plus the unit
/// amount in minor units (kobo).
#[derive(Debug, Clone)]
pub struct SessionLineItem {
    pub name: String,
    pub description: Option<String>,
    pub unit_amount: i64,
    pub quantity: i32,
}

#[derive(Debug, Clone)]
pub struct CreateSessionRequest {
    pub customer_id: String,
    pub currency: String,
    pub line_items: Vec<SessionLineItem>,
    pub success_url: String,
    pub cancel_url: String,
    pub metadata_user_id: String,
    pub metadata_customer_info: String,
}

impl CreateSessionRequest {
    pub fn to_form(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("customer".into(), self.customer_id.clone()),
            ("mode".into(), "payment".into()),
            ("success_url".into(), self.success_url.clone()),
            ("cancel_url".into(), self.cancel_url.clone()),
            ("metadata[user_id]".into(), self.metadata_user_id.clone()),
            (
                "metadata[customer_info]".into(),
                self.metadata_customer_info.clone(),
            ),
        ];

        for (i, line) in self.line_items.iter().enumerate() {
            params.push((
                format!("line_items[{i}][price_data][currency]"),
                self.currency.clone(),
            ));
            params.push((
                format!("line_items[{i}][price_data][product_data][name]"),
                line.name.clone(),
            ));
            if let Some(description) = line.description.as_ref().filter(|d| !d.is_empty()) {
                params.push((
                    format!("line_items[{i}][price_data][product_data][description]"),
                    description.clone(),
                ));
            }
            params.push((
                format!("line_items[{i}][price_data][unit_amount]"),
                line.unit_amount.to_string(),
            ));
            params.push((format!("line_items[{i}][quantity]"), line.quantity.to_string()));
        }

        params
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// Hosted payment page; absent once the session completes.
    #[serde(default)]
    pub url: Option<String>,
    pub payment_status: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl PaymentClient {
    pub fn new(api_base: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into(),
            secret_key: secret_key.into(),
        }
    }

    /// First customer whose email matches, if any. Multiple matches are not
    /// disambiguated; the processor returns newest first and we take it.
    pub async fn find_customer(&self, email: &str) -> AppResult<Option<Customer>> {
        let url = format!("{}/v1/customers", self.api_base);
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.secret_key)
            .query(&[("email", email), ("limit", "1")])
            .send()
            .await?;
        let list: CustomerList = Self::parse(response).await?;
        Ok(list.data.into_iter().next())
    }

    pub async fn create_customer(&self, request: &CreateCustomerRequest) -> AppResult<Customer> {
        let url = format!("{}/v1/customers", self.api_base);
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.secret_key)
            .form(&request.to_form())
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn create_checkout_session(
        &self,
        request: &CreateSessionRequest,
    ) -> AppResult<CheckoutSession> {
        let url = format!("{}/v1/checkout/sessions", self.api_base);
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.secret_key)
            .form(&request.to_form())
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn retrieve_checkout_session(&self, session_id: &str) -> AppResult<CheckoutSession> {
        let url = format!("{}/v1/checkout/sessions/{session_id}", self.api_base);
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.secret_key)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Decode a processor response, turning non-2xx answers into
    /// `AppError::Payment` carrying the processor's own message.
    async fn parse<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> AppResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let message = match response.json::<ApiErrorEnvelope>().await {
            Ok(envelope) => envelope
                .error
                .message
                .unwrap_or_else(|| format!("request rejected with status {status}")),
            Err(_) => format!("request rejected with status {status}"),
        };
        Err(AppError::Payment(message))
    }
}
