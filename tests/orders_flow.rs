use farmgate_api::{
    db::{create_orm_conn, create_pool},
    dto::checkout::CheckoutItem,
    entity::users::ActiveModel as UserActive,
    error::AppError,
    middleware::auth::{AuthUser, ensure_admin, has_role},
    payments::PaymentClient,
    routes::admin::GrantRoleRequest,
    routes::params::{OrderListQuery, Pagination},
    services::{admin_service, cart_service, checkout_service, news_service, order_service},
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

// Integration flow: cart mutations -> order recording -> settlement
// transitions -> cart clearing, plus the admin role gate. Everything runs
// against a real database; the payment client points at a dead endpoint
// because no step here talks to the processor.
#[tokio::test]
async fn checkout_verification_and_admin_gate_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let buyer_id = create_user(&state, "buyer@example.com").await?;
    let admin_id = create_user(&state, "admin@example.com").await?;
    let buyer = AuthUser {
        user_id: buyer_id,
        email: "buyer@example.com".into(),
    };
    let admin = AuthUser {
        user_id: admin_id,
        email: "admin@example.com".into(),
    };

    let tomatoes = seed_product(&state, "Organic Tomatoes", 500, "lb").await?;
    let honey = seed_product(&state, "Raw Honey", 1200, "jar").await?;

    // Cart: two adds accumulate on one line, a third add opens a second line.
    cart_service::add_item(&state, &buyer, tomatoes).await?;
    cart_service::add_item(&state, &buyer, tomatoes).await?;
    let view = cart_service::add_item(&state, &buyer, honey)
        .await?
        .data
        .unwrap();
    assert_eq!(view.total_items, 3);
    assert_eq!(view.total_price, 2200);

    let cart = cart_service::load_cart(&state, buyer_id).await?;
    assert_eq!(cart.quantity(tomatoes), 2);
    assert_eq!(cart.quantity(honey), 1);

    // Record the pending order from the cart snapshot.
    let items = vec![
        CheckoutItem {
            id: tomatoes,
            name: "Organic Tomatoes".into(),
            description: None,
            price: 500,
            quantity: 2,
        },
        CheckoutItem {
            id: honey,
            name: "Raw Honey".into(),
            description: None,
            price: 1200,
            quantity: 1,
        },
    ];
    let (order, order_items) =
        checkout_service::record_order(&state, buyer_id, "cs_test_flow", &items).await?;
    assert_eq!(order.status, "pending");
    assert_eq!(order.total_amount, 2200);
    assert_eq!(order_items.len(), 2);
    assert!(order_items.iter().any(|i| i.product_id == tomatoes && i.price == 500));
    assert!(order_items.iter().any(|i| i.product_id == honey && i.price == 1200));

    // The owner can read the order back with its lines.
    let fetched = order_service::get_order(&state, &buyer, order.id)
        .await?
        .data
        .unwrap();
    assert_eq!(fetched.items.len(), 2);

    // Settlement: paid transitions the order and clears the buyer's cart.
    let paid = checkout_service::apply_session_status(&state, "cs_test_flow", "paid").await?;
    assert_eq!(paid.status, "paid");
    assert!(cart_service::load_cart(&state, buyer_id).await?.is_empty());

    // Re-verifying the same paid session is idempotent.
    let paid_again =
        checkout_service::apply_session_status(&state, "cs_test_flow", "paid").await?;
    assert_eq!(paid_again.status, "paid");

    let (order_count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM orders WHERE user_id = $1")
            .bind(buyer_id)
            .fetch_one(&state.pool)
            .await?;
    assert_eq!(order_count, 1, "one checkout produces exactly one order");

    // An unpaid settlement marks the order failed and leaves the cart alone.
    cart_service::add_item(&state, &buyer, honey).await?;
    let retry_items = vec![CheckoutItem {
        id: honey,
        name: "Raw Honey".into(),
        description: None,
        price: 1200,
        quantity: 1,
    }];
    checkout_service::record_order(&state, buyer_id, "cs_test_retry", &retry_items).await?;
    let failed =
        checkout_service::apply_session_status(&state, "cs_test_retry", "unpaid").await?;
    assert_eq!(failed.status, "failed");
    assert_eq!(
        cart_service::load_cart(&state, buyer_id).await?.quantity(honey),
        1
    );

    // A session nobody checked out with is a not-found, with no writes.
    let missing = checkout_service::apply_session_status(&state, "cs_missing", "paid").await;
    assert!(matches!(missing, Err(AppError::NotFound)));

    // Role gate: no row in user_roles means no admin access.
    assert!(matches!(
        ensure_admin(&state.pool, &buyer).await,
        Err(AppError::Forbidden)
    ));
    let denied = admin_service::list_all_orders(
        &state,
        &buyer,
        OrderListQuery {
            pagination: Pagination {
                page: None,
                per_page: None,
            },
            status: None,
            sort_order: None,
        },
    )
    .await;
    assert!(matches!(denied, Err(AppError::Forbidden)));

    // Granting the role row flips the gate without touching the token.
    sqlx::query("INSERT INTO user_roles (id, user_id, role) VALUES ($1, $2, 'admin')")
        .bind(Uuid::new_v4())
        .bind(admin_id)
        .execute(&state.pool)
        .await?;
    ensure_admin(&state.pool, &admin).await?;

    let all_orders = admin_service::list_all_orders(
        &state,
        &admin,
        OrderListQuery {
            pagination: Pagination {
                page: None,
                per_page: None,
            },
            status: None,
            sort_order: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(all_orders.items.len(), 2);

    // Admins can promote other users by email.
    admin_service::grant_role(
        &state,
        &admin,
        GrantRoleRequest {
            email: "buyer@example.com".into(),
            role: "admin".into(),
        },
    )
    .await?;
    assert!(has_role(&state.pool, buyer_id, "admin").await?);

    // Each detail read bumps the news view counter.
    let post_id = seed_news_post(&state, "Harvest Week Recap").await?;
    let first = news_service::get_post(&state.pool, post_id).await?.data.unwrap();
    assert_eq!(first.views, 1);
    let second = news_service::get_post(&state.pool, post_id).await?.data.unwrap();
    assert_eq!(second.views, 2);

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    let orm = create_orm_conn(database_url).await?;

    // Clean tables between runs.
    sqlx::query(
        "TRUNCATE TABLE order_items, orders, cart_items, user_roles, audit_logs, news_posts, products, categories, users RESTART IDENTITY CASCADE",
    )
    .execute(&pool)
    .await?;

    Ok(AppState {
        pool,
        orm,
        payments: PaymentClient::new("http://127.0.0.1:9", "sk_test_dummy"),
        public_origin: "http://localhost:5173".into(),
        currency: "ngn".into(),
    })
}

async fn create_user(state: &AppState, email: &str) -> anyhow::Result<Uuid> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}

async fn seed_product(
    state: &AppState,
    name: &str,
    price: i64,
    unit: &str,
) -> anyhow::Result<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO products (id, name, price, stock, unit)
        VALUES ($1, $2, $3, 25, $4)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(price)
    .bind(unit)
    .fetch_one(&state.pool)
    .await?;

    Ok(id)
}

async fn seed_news_post(state: &AppState, title: &str) -> anyhow::Result<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO news_posts (id, title, content, category, author_name)
        VALUES ($1, $2, 'Full story text.', 'announcements', 'Ngozi Okafor')
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(title)
    .fetch_one(&state.pool)
    .await?;

    Ok(id)
}
