use crate::db::{DbPool, OrmConn};
use crate::payments::PaymentClient;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub payments: PaymentClient,
    /// Origin the processor redirect URLs are built from.
    pub public_origin: String,
    /// ISO currency code sent to the processor (lowercase).
    pub currency: String,
}
