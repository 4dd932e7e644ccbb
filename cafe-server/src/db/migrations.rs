//! Schema migrations for the cafe table

use sqlx::SqlitePool;

/// Create the cafe table if it does not exist. Safe to run on every start.
pub async fn run(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    tracing::debug!("Running cafe migrations");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS cafe (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            map_url TEXT NOT NULL,
            img_url TEXT NOT NULL,
            location TEXT NOT NULL,
            seats TEXT NOT NULL,
            has_toilet BOOLEAN NOT NULL,
            has_wifi BOOLEAN NOT NULL,
            has_sockets BOOLEAN NOT NULL,
            can_take_calls BOOLEAN NOT NULL,
            coffee_price TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_cafe_location ON cafe (location)")
        .execute(pool)
        .await?;

    Ok(())
}
