use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use crate::auth::password;

/// Upsert the admin identity. Keyed on username so re-running rotates the
/// password instead of failing.
pub async fn handle(username: &str, email: &str, password: &str) -> anyhow::Result<()> {
    if password.len() < 6 {
        anyhow::bail!("password must be at least 6 characters");
    }

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?)
        .await
        .context("failed to connect to the database")?;

    let password_hash = password::hash_password(password)?;

    sqlx::query(
        "INSERT INTO users (id, username, email, password_hash, role, first_name, last_name)
         VALUES ($1, $2, $3, $4, 'admin', 'Admin', 'User')
         ON CONFLICT (username) DO UPDATE
         SET email = EXCLUDED.email,
             password_hash = EXCLUDED.password_hash,
             updated_at = now()",
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(email)
    .bind(&password_hash)
    .execute(&pool)
    .await?;

    pool.close().await;
    println!("Admin user '{}' created or updated", username);
    Ok(())
}
