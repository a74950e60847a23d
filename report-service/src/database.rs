use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_async::pooled_connection::deadpool::{Object, Pool};
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::info;

use crate::catalog::{DatasetCatalog, DatasetRecord};
use crate::error::ReportError;
use crate::models::{Dataset, NewDataset};
use crate::schema::datasets;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Upload catalog stored in PostgreSQL.
#[derive(Clone)]
pub struct PostgresCatalog {
    pool: Pool<AsyncPgConnection>,
}

impl PostgresCatalog {
    pub async fn new(database_url: &str) -> Result<Self, ReportError> {
        let config = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
        let pool = Pool::builder(config)
            .build()
            .map_err(|e| ReportError::DatabaseError {
                message: format!("Failed to create database pool: {}", e),
            })?;

        Self::run_migrations(database_url).await?;

        Ok(Self { pool })
    }

    /// Migrations go through a blocking connection wrapper, so they run on
    /// the blocking thread pool.
    pub async fn run_migrations(database_url: &str) -> Result<(), ReportError> {
        let database_url = database_url.to_string();

        tokio::task::spawn_blocking(move || -> Result<(), ReportError> {
            let mut connection =
                AsyncConnectionWrapper::<AsyncPgConnection>::establish(&database_url).map_err(
                    |e| ReportError::DatabaseError {
                        message: format!("Failed to establish connection for migrations: {}", e),
                    },
                )?;

            let applied = connection.run_pending_migrations(MIGRATIONS).map_err(|e| {
                ReportError::DatabaseError {
                    message: format!("Failed to run migrations: {}", e),
                }
            })?;

            info!("Applied {} pending migration(s)", applied.len());
            Ok(())
        })
        .await
        .map_err(|e| ReportError::InternalError {
            message: format!("Migration task failed: {}", e),
        })?
    }

    async fn connection(&self) -> Result<Object<AsyncPgConnection>, ReportError> {
        self.pool
            .get()
            .await
            .map_err(|e| ReportError::DatabaseError {
                message: format!("Failed to get database connection: {}", e),
            })
    }
}

#[async_trait]
impl DatasetCatalog for PostgresCatalog {
    async fn add(&self, record: &DatasetRecord) -> Result<(), ReportError> {
        info!("Adding dataset {} ({}) to catalog", record.id, record.filename);
        let mut conn = self.connection().await?;

        diesel::insert_into(datasets::table)
            .values(NewDataset::from(record))
            .execute(&mut conn)
            .await?;

        Ok(())
    }

    async fn remove(&self, dataset_id: &str) -> Result<bool, ReportError> {
        let mut conn = self.connection().await?;

        let deleted = diesel::delete(datasets::table.filter(datasets::id.eq(dataset_id)))
            .execute(&mut conn)
            .await?;

        Ok(deleted > 0)
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<DatasetRecord>, ReportError> {
        let mut conn = self.connection().await?;

        let rows = datasets::table
            .order((datasets::uploaded_at.desc(), datasets::seq.desc()))
            .limit(limit as i64)
            .select(Dataset::as_select())
            .load::<Dataset>(&mut conn)
            .await?;

        Ok(rows.into_iter().map(DatasetRecord::from).collect())
    }

    async fn health_check(&self) -> Result<(), ReportError> {
        let mut conn = self.connection().await?;
        diesel::sql_query("SELECT 1").execute(&mut conn).await?;
        Ok(())
    }
}
