use anyhow::Context;
use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use farmgate_api::{currency::format_naira, db::create_pool};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = create_pool(&database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_user(&pool, "admin@farmgate.example", "admin123").await?;
    grant_role(&pool, admin_id, "admin").await?;
    let user_id = ensure_user(&pool, "buyer@farmgate.example", "buyer123").await?;

    seed_catalog(&pool).await?;
    seed_news(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, Buyer ID: {user_id}");
    Ok(())
}

async fn ensure_user(pool: &sqlx::PgPool, email: &str, password: &str) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash)
        VALUES ($1, $2, $3)
        ON CONFLICT (email) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .fetch_optional(pool)
    .await?;

    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email}");
    Ok(user_id)
}

async fn grant_role(pool: &sqlx::PgPool, user_id: Uuid, role: &str) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_roles (id, user_id, role)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, role) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(role)
    .execute(pool)
    .await?;

    println!("Granted role {role} to {user_id}");
    Ok(())
}

async fn ensure_category(
    pool: &sqlx::PgPool,
    name: &str,
    description: &str,
) -> anyhow::Result<Uuid> {
    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO categories (id, name, description)
        VALUES ($1, $2, $3)
        ON CONFLICT (name) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(description)
    .fetch_optional(pool)
    .await?;

    let id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM categories WHERE name = $1")
                .bind(name)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };
    Ok(id)
}

async fn seed_catalog(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let vegetables = ensure_category(pool, "vegetables", "Fresh vegetables from the farm").await?;
    let dairy = ensure_category(pool, "dairy", "Eggs and dairy produce").await?;
    let pantry = ensure_category(pool, "pantry", "Honey, preserves and staples").await?;
    let herbs = ensure_category(pool, "herbs", "Fresh cut herbs").await?;

    let products = vec![
        ("Organic Tomatoes", "Vine-ripened and pesticide free", 1200_i64, vegetables, 50, "lb"),
        ("Free-Range Eggs", "Collected daily from pastured hens", 2500, dairy, 40, "dozen"),
        ("Fresh Spinach", "Cut the same morning it ships", 800, vegetables, 60, "bunch"),
        ("Raw Honey", "Unfiltered honey from our own hives", 5500, pantry, 25, "jar"),
        ("Organic Carrots", "Sweet and crunchy, grown in sandy loam", 900, vegetables, 45, "lb"),
        ("Fresh Basil", "Aromatic sweet basil", 700, herbs, 30, "bunch"),
    ];

    for (name, desc, price, category_id, stock, unit) in products {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price, category_id, stock, unit)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(desc)
        .bind(price)
        .bind(category_id)
        .bind(stock)
        .bind(unit)
        .execute(pool)
        .await?;

        println!("Seeded product {name} at {}", format_naira(price));
    }

    Ok(())
}

async fn seed_news(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let posts = vec![
        (
            "Dry-Season Irrigation Clinic Opens to Members",
            "Our agronomy team walks through drip-line setup, borehole scheduling and mulching strategies that carried last season's tomato beds through the harmattan.",
            "Drip-line setup and scheduling tips from the farm's agronomy team.",
            "farm-practice",
            "Ngozi Okafor",
            true,
        ),
        (
            "New Cold Chain Brings Same-Day Spinach to the Shop",
            "A refrigerated van now runs the morning harvest straight from the beds to the storefront, so leafy greens reach you within hours of cutting.",
            "Morning-harvest greens now reach the storefront within hours.",
            "announcements",
            "Emeka Obi",
            false,
        ),
        (
            "Youth Apprentice Cohort Graduates",
            "Twelve apprentices completed the season-long program covering poultry husbandry, crop rotation planning and farm bookkeeping.",
            "Twelve apprentices completed this season's training program.",
            "community",
            "Ngozi Okafor",
            false,
        ),
    ];

    for (title, content, excerpt, category, author, featured) in posts {
        sqlx::query(
            r#"
            INSERT INTO news_posts (id, title, content, excerpt, category, author_name, featured)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (title) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(content)
        .bind(excerpt)
        .bind(category)
        .bind(author)
        .bind(featured)
        .execute(pool)
        .await?;
    }

    println!("Seeded news posts");
    Ok(())
}
