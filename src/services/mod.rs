pub mod admin_service;
pub mod auth_service;
pub mod bot_service;
pub mod cart_service;
pub mod checkout_service;
pub mod news_service;
pub mod order_service;
