//! PostgreSQL store.
//!
//! Schema is created on connect. `car.brand_id` references `brand(id)` with
//! `ON DELETE CASCADE`; `delete_brand_cascade` still deletes owned cars
//! explicitly, inside the same transaction as the brand row.

use crate::domain::model::{Brand, BrandDraft, Car, CarDraft};
use crate::domain::query::{CarClause, CarFilter, PageRequest};
use crate::storage::{InventoryStore, StoreError, StoreResult};
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

const FOREIGN_KEY_VIOLATION: &str = "23503";
const UNIQUE_VIOLATION: &str = "23505";

const CAR_COLUMNS: &str = "c.id, c.model, c.year, c.color, c.price, \
     b.id AS brand_id, b.name AS brand_name, b.country AS brand_country";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS brand (
                id BIGSERIAL PRIMARY KEY,
                name VARCHAR(50) NOT NULL UNIQUE,
                country VARCHAR(50) NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS car (
                id BIGSERIAL PRIMARY KEY,
                model TEXT NOT NULL,
                year INTEGER NOT NULL,
                color TEXT NOT NULL,
                price DOUBLE PRECISION NOT NULL,
                brand_id BIGINT NULL REFERENCES brand(id) ON DELETE CASCADE
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS car_brand_id_idx ON car (brand_id)")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn brand_from_row(row: &PgRow) -> StoreResult<Brand> {
    Ok(Brand {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        country: row.try_get("country")?,
    })
}

fn car_from_row(row: &PgRow) -> StoreResult<Car> {
    let brand_id: Option<i64> = row.try_get("brand_id")?;
    let brand = match brand_id {
        Some(id) => Some(Brand {
            id,
            name: row.try_get("brand_name")?,
            country: row.try_get("brand_country")?,
        }),
        None => None,
    };
    Ok(Car {
        id: row.try_get("id")?,
        model: row.try_get("model")?,
        year: row.try_get("year")?,
        color: row.try_get("color")?,
        price: row.try_get("price")?,
        brand,
    })
}

/// Renders the filter as `WHERE a AND b ...`. Nothing is pushed for match-all.
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &CarFilter) {
    for (idx, clause) in filter.clauses().iter().enumerate() {
        builder.push(if idx == 0 { " WHERE " } else { " AND " });
        match *clause {
            CarClause::BrandIs(id) => builder.push("b.id = ").push_bind(id),
            CarClause::PriceAtLeast(min) => builder.push("c.price >= ").push_bind(min),
            CarClause::PriceAtMost(max) => builder.push("c.price <= ").push_bind(max),
        };
    }
}

fn sql_code(err: &sqlx::Error) -> Option<String> {
    err.as_database_error()
        .and_then(|e| e.code())
        .map(|c| c.into_owned())
}

fn map_car_write_error(err: sqlx::Error, brand_id: Option<i64>) -> StoreError {
    match (sql_code(&err).as_deref(), brand_id) {
        (Some(FOREIGN_KEY_VIOLATION), Some(id)) => StoreError::MissingBrand(id),
        _ => StoreError::Database(err),
    }
}

fn map_brand_write_error(err: sqlx::Error, name: &str) -> StoreError {
    match sql_code(&err).as_deref() {
        Some(UNIQUE_VIOLATION) => StoreError::DuplicateBrandName(name.to_string()),
        _ => StoreError::Database(err),
    }
}

fn to_count(n: i64) -> StoreResult<u64> {
    u64::try_from(n).map_err(|_| StoreError::Corrupt(format!("negative count {}", n)))
}

#[async_trait]
impl InventoryStore for PgStore {
    async fn list_brands(&self) -> StoreResult<Vec<Brand>> {
        let rows = sqlx::query("SELECT id, name, country FROM brand ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(brand_from_row).collect()
    }

    async fn find_brand(&self, id: i64) -> StoreResult<Option<Brand>> {
        let row = sqlx::query("SELECT id, name, country FROM brand WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(brand_from_row).transpose()
    }

    async fn find_brand_by_name(&self, name: &str) -> StoreResult<Option<Brand>> {
        let row = sqlx::query("SELECT id, name, country FROM brand WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(brand_from_row).transpose()
    }

    async fn brand_exists(&self, id: i64) -> StoreResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM brand WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn brand_name_exists(&self, name: &str) -> StoreResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM brand WHERE name = $1)")
                .bind(name)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn insert_brand(&self, draft: BrandDraft) -> StoreResult<Brand> {
        let row = sqlx::query(
            "INSERT INTO brand (name, country) VALUES ($1, $2) RETURNING id, name, country",
        )
        .bind(&draft.name)
        .bind(&draft.country)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_brand_write_error(e, &draft.name))?;
        brand_from_row(&row)
    }

    async fn update_brand(&self, id: i64, draft: BrandDraft) -> StoreResult<Option<Brand>> {
        let row = sqlx::query(
            "UPDATE brand SET name = $1, country = $2 WHERE id = $3 RETURNING id, name, country",
        )
        .bind(&draft.name)
        .bind(&draft.country)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_brand_write_error(e, &draft.name))?;
        row.as_ref().map(brand_from_row).transpose()
    }

    async fn delete_brand_cascade(&self, id: i64) -> StoreResult<Option<u64>> {
        let mut transaction = self.pool.begin().await?;

        let cars = sqlx::query("DELETE FROM car WHERE brand_id = $1")
            .bind(id)
            .execute(&mut *transaction)
            .await?
            .rows_affected();
        let brands = sqlx::query("DELETE FROM brand WHERE id = $1")
            .bind(id)
            .execute(&mut *transaction)
            .await?
            .rows_affected();

        if brands == 0 {
            transaction.rollback().await?;
            return Ok(None);
        }
        transaction.commit().await?;
        Ok(Some(cars))
    }

    async fn find_car(&self, id: i64) -> StoreResult<Option<Car>> {
        let sql = format!(
            "SELECT {} FROM car c LEFT JOIN brand b ON b.id = c.brand_id WHERE c.id = $1",
            CAR_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(car_from_row).transpose()
    }

    async fn car_exists(&self, id: i64) -> StoreResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM car WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn insert_car(&self, draft: CarDraft) -> StoreResult<Car> {
        // Insert and join in one statement so the returned row matches what was written.
        let sql = format!(
            "WITH c AS (
                INSERT INTO car (model, year, color, price, brand_id)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
             )
             SELECT {} FROM c LEFT JOIN brand b ON b.id = c.brand_id",
            CAR_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(&draft.model)
            .bind(draft.year)
            .bind(&draft.color)
            .bind(draft.price)
            .bind(draft.brand_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_car_write_error(e, draft.brand_id))?;
        car_from_row(&row)
    }

    async fn update_car(&self, id: i64, draft: CarDraft) -> StoreResult<Option<Car>> {
        let sql = format!(
            "WITH c AS (
                UPDATE car SET model = $1, year = $2, color = $3, price = $4, brand_id = $5
                WHERE id = $6
                RETURNING *
             )
             SELECT {} FROM c LEFT JOIN brand b ON b.id = c.brand_id",
            CAR_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(&draft.model)
            .bind(draft.year)
            .bind(&draft.color)
            .bind(draft.price)
            .bind(draft.brand_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_car_write_error(e, draft.brand_id))?;
        row.as_ref().map(car_from_row).transpose()
    }

    async fn delete_car(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM car WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_cars(
        &self,
        filter: &CarFilter,
        page: Option<PageRequest>,
    ) -> StoreResult<(Vec<Car>, u64)> {
        let mut count_query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM car c LEFT JOIN brand b ON b.id = c.brand_id");
        push_filter(&mut count_query, filter);
        let total = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {} FROM car c LEFT JOIN brand b ON b.id = c.brand_id",
            CAR_COLUMNS
        ));
        push_filter(&mut query, filter);
        query.push(" ORDER BY c.id ASC");
        if let Some(request) = page {
            let limit = i64::try_from(request.limit()).unwrap_or(i64::MAX);
            let offset = i64::try_from(request.offset()).unwrap_or(i64::MAX);
            query.push(" LIMIT ").push_bind(limit);
            query.push(" OFFSET ").push_bind(offset);
        }
        let rows = query.build().fetch_all(&self.pool).await?;
        let cars = rows.iter().map(car_from_row).collect::<StoreResult<Vec<_>>>()?;
        Ok((cars, to_count(total)?))
    }

    async fn count_cars(&self) -> StoreResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM car")
            .fetch_one(&self.pool)
            .await?;
        to_count(total)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
