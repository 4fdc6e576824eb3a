use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        bot::{BotRequest, BotResponse},
        cart::{AddToCartRequest, CartLine, CartView, SetQuantityRequest},
        checkout::{
            CheckoutItem, CheckoutRequest, CheckoutResponse, CustomerInfo, VerifyPaymentRequest,
            VerifyPaymentResponse,
        },
        news::{CreateNewsPostRequest, NewsList},
        orders::{OrderList, OrderWithItems},
        products::{
            CreateCategoryRequest, CreateProductRequest, ProductList, UpdateProductRequest,
        },
    },
    models::{Category, NewsPost, Order, OrderItem, Product, User},
    response::{ApiResponse, Meta},
    routes::{
        admin, auth, bot, cart, categories, checkout, health, news, orders, params,
        products as product_routes,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        product_routes::list_products,
        product_routes::get_product,
        categories::list_categories,
        cart::get_cart,
        cart::add_to_cart,
        cart::remove_from_cart,
        cart::set_quantity,
        checkout::create_checkout,
        checkout::verify_payment,
        orders::list_orders,
        orders::get_order,
        news::list_posts,
        news::get_post,
        bot::welcome,
        bot::chat,
        admin::create_product,
        admin::update_product,
        admin::delete_product,
        admin::create_category,
        admin::create_news_post,
        admin::list_all_orders,
        admin::get_order_admin,
        admin::list_users,
        admin::grant_role
    ),
    components(
        schemas(
            User,
            Product,
            Category,
            Order,
            OrderItem,
            NewsPost,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            AddToCartRequest,
            SetQuantityRequest,
            CartLine,
            CartView,
            CheckoutItem,
            CustomerInfo,
            CheckoutRequest,
            CheckoutResponse,
            VerifyPaymentRequest,
            VerifyPaymentResponse,
            OrderList,
            OrderWithItems,
            NewsList,
            CreateNewsPostRequest,
            CreateProductRequest,
            UpdateProductRequest,
            CreateCategoryRequest,
            ProductList,
            BotRequest,
            BotResponse,
            admin::GrantRoleRequest,
            admin::UserSummary,
            admin::UserList,
            params::Pagination,
            params::ProductQuery,
            params::OrderListQuery,
            params::NewsQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<CartView>,
            ApiResponse<OrderList>,
            ApiResponse<OrderWithItems>,
            ApiResponse<NewsList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "auth", description = "Registration and login"),
        (name = "products", description = "Public catalog reads"),
        (name = "cart", description = "Per-user cart state"),
        (name = "checkout", description = "Payment session creation and verification"),
        (name = "orders", description = "Order history for the current user"),
        (name = "news", description = "Editorial posts with view counters"),
        (name = "farm-bot", description = "Farm assistant chat"),
        (name = "admin", description = "Role-gated catalog, news and order management"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
