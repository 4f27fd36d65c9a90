use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use deckntools_api::{config::AppConfig, db::create_pool};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_admin(&pool, "admin@deckntools.local", "admin123").await?;
    seed_products(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}");
    Ok(())
}

async fn ensure_admin(pool: &sqlx::PgPool, email: &str, password: &str) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO admins (id, email, password_hash)
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

    let admin_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM admins WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured admin {email}");
    Ok(admin_id)
}

async fn seed_products(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let products: Vec<(&str, &str, Decimal, i32, &str)> = vec![
        (
            "Composite Decking Board 3.6m",
            "Decking Boards",
            dec!(34.99),
            240,
            "Low-maintenance composite board with woodgrain finish",
        ),
        (
            "Hardwood Decking Board 2.4m",
            "Decking Boards",
            dec!(28.50),
            180,
            "Smooth-planed hardwood board, weather-treated",
        ),
        (
            "Decking Joist 47x100mm 3.0m",
            "Subframe",
            dec!(12.75),
            320,
            "Pressure-treated structural joist for deck subframes",
        ),
        (
            "Stainless Decking Screws 500 pack",
            "Fixings",
            dec!(21.99),
            95,
            "Countersunk A2 stainless screws with torx drive",
        ),
        (
            "Decking Oil 2.5L",
            "Finishing",
            dec!(24.00),
            60,
            "Penetrating oil for hardwood and softwood decks",
        ),
    ];

    for (name, category, price, stock, desc) in products {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, category, price, stock, images, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(category)
        .bind(price)
        .bind(stock)
        .bind(serde_json::json!(["/placeholder.svg"]))
        .bind(desc)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}
