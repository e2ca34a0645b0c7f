//! Database Module
//!
//! Embedded SurrealDB store. The engine provides what the core relies on:
//! per-document CRUD, multi-statement `BEGIN .. COMMIT` transactions with
//! abort on conflicting concurrent writes, and ordered/filtered queries.

pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "warung";
const DATABASE: &str = "marketplace";

/// Database service owning the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database at `db_path`
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::store(format!("Failed to open database: {e}")))?;
        Self::init(db).await
    }

    /// Open a throwaway in-memory database (tests)
    pub async fn new_mem() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::store(format!("Failed to open in-memory database: {e}")))?;
        Self::init(db).await
    }

    async fn init(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::store(format!("Failed to select namespace: {e}")))?;

        define_schema(&db).await?;
        tracing::info!("Database ready (ns={NAMESPACE}, db={DATABASE})");

        Ok(Self { db })
    }
}

/// Define tables and indexes (idempotent).
///
/// Tables stay schemaless; documents carry the verbatim contract field
/// names. Composite record ids give `offer` and `request_row` their
/// per-document creation uniqueness.
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        "
        DEFINE TABLE IF NOT EXISTS request SCHEMALESS;
        DEFINE TABLE IF NOT EXISTS message SCHEMALESS;
        DEFINE TABLE IF NOT EXISTS offer SCHEMALESS;
        DEFINE TABLE IF NOT EXISTS request_row SCHEMALESS;
        DEFINE TABLE IF NOT EXISTS menu SCHEMALESS;
        DEFINE TABLE IF NOT EXISTS order SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS menu_category ON menu FIELDS category;
        DEFINE INDEX IF NOT EXISTS message_request ON message FIELDS requestId;
        DEFINE INDEX IF NOT EXISTS offer_pair ON offer FIELDS requestId, buyerMessageId;
        ",
    )
    .await
    .map_err(|e| AppError::store(format!("Failed to define schema: {e}")))?;
    Ok(())
}
