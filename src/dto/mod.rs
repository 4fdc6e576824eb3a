pub mod auth;
pub mod bot;
pub mod cart;
pub mod checkout;
pub mod news;
pub mod orders;
pub mod products;
