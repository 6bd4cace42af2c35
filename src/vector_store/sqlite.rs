//! SQLite-based vector store implementation.
//!
//! Uses SQLite with cosine similarity computed in Rust. Each session gets its
//! own database file inside a temporary directory that is removed on teardown.

use super::{rank, Document, SearchResult, VectorStore};
use crate::error::{Result, TubeQaError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS documents (
        id TEXT PRIMARY KEY,
        source_id TEXT NOT NULL,
        title TEXT NOT NULL,
        url TEXT NOT NULL,
        content TEXT NOT NULL,
        start_seconds REAL NOT NULL,
        end_seconds REAL NOT NULL,
        chunk_order INTEGER NOT NULL,
        embedding BLOB NOT NULL,
        indexed_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_documents_source_id ON documents(source_id);
"#;

const SELECT_DOCUMENT: &str = r#"
    SELECT id, source_id, title, url, content, start_seconds, end_seconds,
           chunk_order, embedding, indexed_at
    FROM documents
"#;

/// SQLite-based vector store.
pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
}

impl SqliteVectorStore {
    /// Open (or create) a SQLite vector store at `path`.
    #[instrument(skip_all)]
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Initialized SQLite vector store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite vector store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| TubeQaError::VectorStore(format!("Failed to acquire lock: {}", e)))
    }

    /// Serialize embedding to bytes.
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize embedding from bytes.
    fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| {
                let arr: [u8; 4] = chunk.try_into().unwrap_or_default();
                f32::from_le_bytes(arr)
            })
            .collect()
    }

    fn parse_timestamp(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now())
    }

    fn row_to_document(row: &Row<'_>) -> rusqlite::Result<Document> {
        let id_str: String = row.get(0)?;
        let embedding_bytes: Vec<u8> = row.get(8)?;
        let indexed_at_str: String = row.get(9)?;

        Ok(Document {
            id: uuid::Uuid::parse_str(&id_str).unwrap_or_default(),
            source_id: row.get(1)?,
            title: row.get(2)?,
            url: row.get(3)?,
            content: row.get(4)?,
            start_seconds: row.get(5)?,
            end_seconds: row.get(6)?,
            chunk_order: row.get(7)?,
            embedding: Self::bytes_to_embedding(&embedding_bytes),
            indexed_at: Self::parse_timestamp(&indexed_at_str),
        })
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    #[instrument(skip(self, query_embedding))]
    async fn search_with_threshold(
        &self,
        query_embedding: &[f32],
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<SearchResult>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(SELECT_DOCUMENT)?;
        let docs: Vec<Document> = stmt
            .query_map([], Self::row_to_document)?
            .filter_map(|d| d.ok())
            .collect();

        let results = rank(docs.into_iter(), query_embedding, limit, min_score);
        debug!("Found {} matching documents", results.len());
        Ok(results)
    }

    #[instrument(skip(self, docs), fields(count = docs.len()))]
    async fn replace_source(&self, source_id: &str, docs: &[Document]) -> Result<usize> {
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction()?;
        let deleted = tx.execute(
            "DELETE FROM documents WHERE source_id = ?1",
            params![source_id],
        )?;
        insert_documents(&tx, docs)?;
        tx.commit()?;

        debug!(
            "Replaced {} documents with {} for video {}",
            deleted,
            docs.len(),
            source_id
        );
        Ok(docs.len())
    }

    #[instrument(skip(self))]
    async fn get_by_source(&self, source_id: &str) -> Result<Vec<Document>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE source_id = ?1 ORDER BY chunk_order",
            SELECT_DOCUMENT
        ))?;

        let result: Vec<Document> = stmt
            .query_map(params![source_id], Self::row_to_document)?
            .filter_map(|d| d.ok())
            .collect();
        Ok(result)
    }

    async fn document_count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn insert_documents(conn: &Connection, docs: &[Document]) -> Result<()> {
    let mut stmt = conn.prepare(
        r#"
        INSERT OR REPLACE INTO documents
        (id, source_id, title, url, content, start_seconds, end_seconds,
         chunk_order, embedding, indexed_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#,
    )?;

    for doc in docs {
        stmt.execute(params![
            doc.id.to_string(),
            doc.source_id,
            doc.title,
            doc.url,
            doc.content,
            doc.start_seconds,
            doc.end_seconds,
            doc.chunk_order,
            SqliteVectorStore::embedding_to_bytes(&doc.embedding),
            doc.indexed_at.to_rfc3339(),
        ])?;
    }
    Ok(())
}
