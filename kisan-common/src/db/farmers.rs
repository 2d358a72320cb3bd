//! Farmer account queries

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::{Pool, Row, Sqlite};
use uuid::Uuid;

/// A farmer account row
#[derive(Debug, Clone)]
pub struct Farmer {
    pub farmer_id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub city: String,
    pub created_at: DateTime<Utc>,
}

/// Insert a new farmer account
///
/// Fails with `Error::InvalidInput` when the email is already registered
/// (UNIQUE constraint).
pub async fn insert_farmer(
    db: &Pool<Sqlite>,
    name: &str,
    email: &str,
    password_hash: &str,
    city: &str,
) -> Result<Uuid> {
    let farmer_id = Uuid::new_v4();
    let created_at = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO farmers (farmer_id, name, email, password_hash, city, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(farmer_id.to_string())
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(city)
    .bind(created_at.to_rfc3339())
    .execute(db)
    .await;

    match result {
        Ok(_) => Ok(farmer_id),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(Error::InvalidInput(
            format!("Email already registered: {}", email),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Look up a farmer by email (sign-in path)
pub async fn get_farmer_by_email(db: &Pool<Sqlite>, email: &str) -> Result<Option<Farmer>> {
    let row = sqlx::query(
        r#"
        SELECT farmer_id, name, email, password_hash, city, created_at
        FROM farmers WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await?;

    row.map(row_to_farmer).transpose()
}

/// Look up a farmer by id
pub async fn get_farmer_by_id(db: &Pool<Sqlite>, farmer_id: Uuid) -> Result<Option<Farmer>> {
    let row = sqlx::query(
        r#"
        SELECT farmer_id, name, email, password_hash, city, created_at
        FROM farmers WHERE farmer_id = ?
        "#,
    )
    .bind(farmer_id.to_string())
    .fetch_optional(db)
    .await?;

    row.map(row_to_farmer).transpose()
}

fn row_to_farmer(row: sqlx::sqlite::SqliteRow) -> Result<Farmer> {
    let farmer_id: String = row.try_get("farmer_id")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(Farmer {
        farmer_id: Uuid::parse_str(&farmer_id)
            .map_err(|e| Error::Internal(format!("Bad farmer_id in database: {}", e)))?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        city: row.try_get("city")?,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| Error::Internal(format!("Bad created_at in database: {}", e)))?
            .with_timezone(&Utc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init::create_schema;
    use sqlx::SqlitePool;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        create_schema(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn insert_and_lookup_by_email() {
        let pool = test_pool().await;
        let id = insert_farmer(&pool, "Asha", "asha@example.com", "deadbeef", "Nagpur")
            .await
            .unwrap();

        let farmer = get_farmer_by_email(&pool, "asha@example.com")
            .await
            .unwrap()
            .expect("farmer should exist");
        assert_eq!(farmer.farmer_id, id);
        assert_eq!(farmer.city, "Nagpur");

        assert!(get_farmer_by_email(&pool, "nobody@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let pool = test_pool().await;
        insert_farmer(&pool, "Asha", "asha@example.com", "deadbeef", "Nagpur")
            .await
            .unwrap();

        let err = insert_farmer(&pool, "Other", "asha@example.com", "cafebabe", "Pune")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn lookup_by_id() {
        let pool = test_pool().await;
        let id = insert_farmer(&pool, "Ravi", "ravi@example.com", "deadbeef", "Pune")
            .await
            .unwrap();

        let farmer = get_farmer_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(farmer.name, "Ravi");
        assert!(get_farmer_by_id(&pool, Uuid::new_v4()).await.unwrap().is_none());
    }
}
