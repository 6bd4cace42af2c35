//! Registry of live sessions.

use super::Session;
use crate::config::{KnowledgeBaseConfig, Prompts, Settings};
use crate::error::{Result, TubeQaError};
use crate::rag::RagKnowledgeBase;
use crate::transcript::TranscriptFetcher;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// Shared handle to one session. Requests on the same session are serialized.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Builds a new session from a user-supplied API key.
pub trait SessionFactory: Send + Sync {
    fn create(&self, api_key: &str) -> Result<Session>;
}

/// Sessions backed by OpenAI models and YouTube captions.
pub struct OpenAISessionFactory {
    settings: Settings,
    prompts: Prompts,
    fetcher: TranscriptFetcher,
}

impl OpenAISessionFactory {
    pub fn new(settings: Settings, prompts: Prompts, fetcher: TranscriptFetcher) -> Self {
        Self {
            settings,
            prompts,
            fetcher,
        }
    }
}

impl SessionFactory for OpenAISessionFactory {
    fn create(&self, api_key: &str) -> Result<Session> {
        let config = KnowledgeBaseConfig::new(api_key, &self.settings)?;
        let knowledge_base =
            RagKnowledgeBase::initialize(&config, &self.settings, self.prompts.clone())?;

        Ok(Session::new(
            self.fetcher.clone(),
            Box::new(knowledge_base),
            self.prompts.summary.label.clone(),
        ))
    }
}

/// All live sessions, keyed by id.
pub struct SessionStore {
    factory: Arc<dyn SessionFactory>,
    sessions: RwLock<HashMap<Uuid, SessionHandle>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(factory: Arc<dyn SessionFactory>, idle_minutes: u64) -> Self {
        Self {
            factory,
            sessions: RwLock::new(HashMap::new()),
            idle_timeout: i64::try_from(idle_minutes)
                .ok()
                .and_then(Duration::try_minutes)
                .unwrap_or(Duration::MAX),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<Uuid, SessionHandle>>> {
        self.sessions
            .read()
            .map_err(|e| TubeQaError::Internal(format!("Session registry poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<Uuid, SessionHandle>>> {
        self.sessions
            .write()
            .map_err(|e| TubeQaError::Internal(format!("Session registry poisoned: {}", e)))
    }

    /// Create a session for `api_key` and return its id.
    ///
    /// Idle sessions are pruned first.
    pub fn create(&self, api_key: &str) -> Result<Uuid> {
        self.prune_idle()?;

        let session = self.factory.create(api_key)?;
        let id = session.id();
        self.write()?.insert(id, Arc::new(Mutex::new(session)));

        info!("Created session {}", id);
        Ok(id)
    }

    pub fn get(&self, id: Uuid) -> Result<SessionHandle> {
        self.read()?
            .get(&id)
            .cloned()
            .ok_or_else(|| TubeQaError::SessionNotFound(id.to_string()))
    }

    /// End a session, dropping its knowledge base and any on-disk index.
    pub fn remove(&self, id: Uuid) -> Result<()> {
        self.write()?
            .remove(&id)
            .map(|_| info!("Ended session {}", id))
            .ok_or_else(|| TubeQaError::SessionNotFound(id.to_string()))
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    /// Drop sessions idle for longer than the timeout. Sessions busy with a
    /// request are kept. A timeout reaching past the earliest representable
    /// time never expires anything.
    pub fn prune_idle(&self) -> Result<usize> {
        let Some(cutoff) = Utc::now().checked_sub_signed(self.idle_timeout) else {
            return Ok(0);
        };
        let mut sessions = self.write()?;
        let before = sessions.len();

        sessions.retain(|_, handle| match handle.try_lock() {
            Ok(session) => session.last_active() >= cutoff,
            Err(_) => true,
        });

        let pruned = before - sessions.len();
        if pruned > 0 {
            debug!("Pruned {} idle sessions", pruned);
        }
        Ok(pruned)
    }
}
