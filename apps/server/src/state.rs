//! Shared application state handed to every handler

use crate::{
    config::{Config, DatabaseConfig, StoreBackend},
    db::{InMemoryRecordStore, PostgresRecordStore, RecordStore},
    services::{ExamService, PatientService},
};
use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, Executor, PgPool};
use std::{sync::Arc, time::Duration};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn RecordStore>,
    pub patients: Arc<PatientService>,
    pub exams: Arc<ExamService>,
}

impl AppState {
    /// Build the configured store and the services on top of it.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store: Arc<dyn RecordStore> = match config.database.backend {
            StoreBackend::Postgres => {
                let pool = create_pool(&config.database).await?;
                let store = PostgresRecordStore::new(pool);
                if config.database.bootstrap_schema {
                    store
                        .ensure_schema()
                        .await
                        .context("Failed to create database schema")?;
                    tracing::info!("Database schema ready");
                }
                Arc::new(store)
            }
            StoreBackend::Memory => {
                tracing::warn!("Using the in-memory store; records are lost on restart");
                Arc::new(InMemoryRecordStore::new())
            }
        };

        Ok(Self::with_store(config, store))
    }

    /// State over an already constructed store.
    pub fn with_store(config: Config, store: Arc<dyn RecordStore>) -> Self {
        Self {
            config: Arc::new(config),
            patients: Arc::new(PatientService::new(store.clone())),
            exams: Arc::new(ExamService::new(store.clone())),
            store,
        }
    }
}

async fn create_pool(config: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let statement_timeout = format!(
        "SET statement_timeout = '{}s'",
        config.statement_timeout_seconds
    );

    let pool = PgPoolOptions::new()
        .min_connections(config.pool_min_size)
        .max_connections(config.pool_max_size)
        .acquire_timeout(Duration::from_secs(config.pool_timeout_seconds))
        .after_connect(move |conn, _meta| {
            let statement_timeout = statement_timeout.clone();
            Box::pin(async move {
                conn.execute(statement_timeout.as_str()).await?;
                Ok(())
            })
        })
        .connect(&config.url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    tracing::info!(
        min_connections = config.pool_min_size,
        max_connections = config.pool_max_size,
        "Database pool created"
    );

    Ok(pool)
}
