use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::executor::{QueryExecutor, QueryResponse};
use crate::session::types::{SessionId, SessionInfo};
use crate::sparql::GraphQueryClient;

struct Entry {
    info: SessionInfo,
    executor: Arc<Mutex<QueryExecutor>>,
}

/// Isolates conversation state per session.
///
/// Every session gets its own [`QueryExecutor`]; the graph client is
/// shared. Turns within one session are serialized by the executor's lock.
pub struct SessionRegistry {
    client: Arc<dyn GraphQueryClient>,
    namespace: String,
    sessions: RwLock<HashMap<SessionId, Entry>>,
}

impl SessionRegistry {
    pub fn new(client: Arc<dyn GraphQueryClient>, namespace: impl Into<String>) -> Self {
        Self {
            client,
            namespace: namespace.into(),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a new session and returns its id
    pub async fn open(&self) -> SessionId {
        let id = SessionId::new();
        let entry = Entry {
            info: SessionInfo::new(id.clone()),
            executor: Arc::new(Mutex::new(QueryExecutor::new(
                self.client.clone(),
                self.namespace.clone(),
            ))),
        };
        self.sessions.write().await.insert(id.clone(), entry);
        info!(session = %id, "session opened");
        id
    }

    /// Runs one turn in a session, opening it on first use
    pub async fn submit(&self, id: &SessionId, text: &str) -> QueryResponse {
        let executor = {
            let mut sessions = self.sessions.write().await;
            let entry = sessions.entry(id.clone()).or_insert_with(|| {
                debug!(session = %id, "session created on first turn");
                Entry {
                    info: SessionInfo::new(id.clone()),
                    executor: Arc::new(Mutex::new(QueryExecutor::new(
                        self.client.clone(),
                        self.namespace.clone(),
                    ))),
                }
            });
            entry.info.touch();
            entry.executor.clone()
        };

        let mut executor = executor.lock().await;
        executor.submit(text).await
    }

    /// Removes a session; returns whether it existed
    pub async fn close(&self, id: &SessionId) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            info!(session = %id, "session closed");
        }
        removed
    }

    /// Bookkeeping for a session
    pub async fn info(&self, id: &SessionId) -> Option<SessionInfo> {
        self.sessions.read().await.get(id).map(|e| e.info.clone())
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drops sessions idle for longer than `idle_timeout`; pending
    /// disambiguations go with them
    pub async fn purge_idle(&self, idle_timeout: Duration) -> usize {
        let cutoff = Utc::now() - idle_timeout;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.info.last_active > cutoff);
        let purged = before - sessions.len();
        if purged > 0 {
            info!(purged, "purged idle sessions");
        }
        purged
    }
}
