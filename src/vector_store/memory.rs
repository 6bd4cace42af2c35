//! In-memory vector store implementation.
//!
//! The default backend: a session's index lives and dies with the session.

use super::{rank, Document, SearchResult, VectorStore};
use crate::error::{Result, TubeQaError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// In-memory vector store.
pub struct MemoryVectorStore {
    documents: RwLock<HashMap<Uuid, Document>>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<Uuid, Document>>> {
        self.documents
            .read()
            .map_err(|e| TubeQaError::VectorStore(format!("Failed to acquire lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<Uuid, Document>>> {
        self.documents
            .write()
            .map_err(|e| TubeQaError::VectorStore(format!("Failed to acquire lock: {}", e)))
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn search_with_threshold(
        &self,
        query_embedding: &[f32],
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<SearchResult>> {
        let docs = self.read()?;
        Ok(rank(docs.values().cloned(), query_embedding, limit, min_score))
    }

    async fn replace_source(&self, source_id: &str, docs: &[Document]) -> Result<usize> {
        let mut store = self.write()?;
        store.retain(|_, doc| doc.source_id != source_id);
        for doc in docs {
            store.insert(doc.id, doc.clone());
        }
        Ok(docs.len())
    }

    async fn get_by_source(&self, source_id: &str) -> Result<Vec<Document>> {
        let docs = self.read()?;
        let mut result: Vec<Document> = docs
            .values()
            .filter(|d| d.source_id == source_id)
            .cloned()
            .collect();
        result.sort_by_key(|d| d.chunk_order);
        Ok(result)
    }

    async fn document_count(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }
}
