//! One-shot database initialization latch.
//!
//! The first request that needs persistence connects, pings and creates
//! indexes. The outcome is cached for the life of the process: later
//! callers either share the connected repositories or receive the same
//! error text, without a retry.

use std::sync::Arc;
use std::time::Duration;

use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::Client;
use tokio::sync::OnceCell;

use crate::error::{DbError, DbResult};
use crate::repositories::{mongo, Repositories};

/// Server selection and connect timeout for the first connection.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
enum Target {
    Mongo { uri: String, db_name: String },
    Missing,
}

struct Inner {
    target: Target,
    cell: OnceCell<Result<Repositories, String>>,
}

/// Cheaply cloneable handle to the lazily connected repositories.
#[derive(Clone)]
pub struct DbHandle {
    inner: Arc<Inner>,
}

impl DbHandle {
    /// Connect on first use. A `None` URI makes every use fail with a
    /// misconfiguration error.
    pub fn lazy(uri: Option<String>, db_name: impl Into<String>) -> Self {
        let target = match uri.filter(|u| !u.trim().is_empty()) {
            Some(uri) => Target::Mongo {
                uri,
                db_name: db_name.into(),
            },
            None => Target::Missing,
        };
        Self {
            inner: Arc::new(Inner {
                target,
                cell: OnceCell::new(),
            }),
        }
    }

    /// Handle that is already initialized with `repos`.
    pub fn ready(repos: Repositories) -> Self {
        Self {
            inner: Arc::new(Inner {
                target: Target::Missing,
                cell: OnceCell::new_with(Some(Ok(repos))),
            }),
        }
    }

    /// Repositories, connecting on the first call.
    pub async fn repos(&self) -> DbResult<Repositories> {
        let outcome = self
            .inner
            .cell
            .get_or_init(|| async {
                connect(&self.inner.target).await.map_err(|e| {
                    tracing::error!(error = %e, "Database initialization failed");
                    e.to_string()
                })
            })
            .await;
        outcome.clone().map_err(DbError::Init)
    }

    /// Whether initialization has run (successfully or not).
    pub fn is_initialized(&self) -> bool {
        self.inner.cell.initialized()
    }
}

async fn connect(target: &Target) -> DbResult<Repositories> {
    let Target::Mongo { uri, db_name } = target else {
        return Err(DbError::Init(
            "Server misconfiguration: MONGO_URI missing".to_string(),
        ));
    };

    let mut options = ClientOptions::parse(uri).await?;
    options.connect_timeout = Some(CONNECT_TIMEOUT);
    options.server_selection_timeout = Some(CONNECT_TIMEOUT);
    let client = Client::with_options(options)?;
    let db = client.database(db_name);

    db.run_command(doc! { "ping": 1 }).await?;
    mongo::ensure_indexes(&db).await?;
    tracing::info!(database = %db_name, "Connected to MongoDB");

    Ok(Repositories::mongo(&db))
}
