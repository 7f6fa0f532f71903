//! Persistent PRD storage using redb.
//!
//! # Table design
//!
//! A single `PRDS` table uses a 24-byte composite key:
//! ```text
//! [ created_at_ms: u64 big-endian (8 bytes) | uuid: 16 bytes ]
//! ```
//!
//! With the timestamp in the high bytes, byte ordering equals creation
//! ordering, so newest-first listing is a reverse iteration with no sort.
//! Values are whole JSON-encoded records; there are no partial updates.

use std::path::Path;

use chrono::{DateTime, Utc};
use redb::{Database, ReadableTable, TableDefinition};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{RalphError, Result};
use crate::prd::PrdDocument;

/// Key: 24-byte composite (created_at_ms big-endian ++ uuid bytes)
/// Value: JSON-encoded StoredPrd
const PRDS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("prds");

// ---------------------------------------------------------------------------
// StoredPrd
// ---------------------------------------------------------------------------

/// A generated document plus its storage identity. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPrd {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub doc: PrdDocument,
}

impl StoredPrd {
    pub fn new(doc: PrdDocument) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            doc,
        }
    }
}

fn record_key(ts: DateTime<Utc>, id: Uuid) -> [u8; 24] {
    let mut key = [0u8; 24];
    let ms = ts.timestamp_millis().max(0) as u64;
    key[..8].copy_from_slice(&ms.to_be_bytes());
    key[8..].copy_from_slice(id.as_bytes());
    key
}

// ---------------------------------------------------------------------------
// PrdStore
// ---------------------------------------------------------------------------

/// Keyed store for [`StoredPrd`] records: put / get / list / delete over
/// whole JSON blobs.
pub struct PrdStore {
    db: Database,
}

impl PrdStore {
    /// Open or create the redb database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path).map_err(|e| RalphError::Store(e.to_string()))?;
        // Ensure the table exists before any reads
        let wt = db
            .begin_write()
            .map_err(|e| RalphError::Store(e.to_string()))?;
        wt.open_table(PRDS)
            .map_err(|e| RalphError::Store(e.to_string()))?;
        wt.commit().map_err(|e| RalphError::Store(e.to_string()))?;
        Ok(Self { db })
    }

    /// Insert a record. The key is derived from its creation timestamp and id.
    pub fn put(&self, record: &StoredPrd) -> Result<()> {
        let key = record_key(record.created_at, record.id);
        let value = serde_json::to_vec(record)?;
        let wt = self
            .db
            .begin_write()
            .map_err(|e| RalphError::Store(e.to_string()))?;
        {
            let mut table = wt
                .open_table(PRDS)
                .map_err(|e| RalphError::Store(e.to_string()))?;
            table
                .insert(key.as_slice(), value.as_slice())
                .map_err(|e| RalphError::Store(e.to_string()))?;
        }
        wt.commit().map_err(|e| RalphError::Store(e.to_string()))?;
        Ok(())
    }

    /// Fetch one record by id.
    pub fn get(&self, id: Uuid) -> Result<StoredPrd> {
        self.find(id)?
            .map(|(_, record)| record)
            .ok_or_else(|| RalphError::PrdNotFound(id.to_string()))
    }

    /// List records newest first. Pages are 1-based; returns the page plus
    /// the total record count.
    pub fn list(&self, page: usize, per_page: usize) -> Result<(Vec<StoredPrd>, usize)> {
        let all = self.list_all()?;
        let total = all.len();
        let page = page.max(1);
        let per_page = per_page.max(1);
        // page comes straight off the query string; the offset must not
        // overflow for absurd page numbers.
        let start = (page - 1).saturating_mul(per_page);
        let items = all.into_iter().skip(start).take(per_page).collect();
        Ok((items, total))
    }

    /// Delete one record by id. Missing ids report not-found.
    pub fn delete(&self, id: Uuid) -> Result<()> {
        let (key, _) = self
            .find(id)?
            .ok_or_else(|| RalphError::PrdNotFound(id.to_string()))?;
        let wt = self
            .db
            .begin_write()
            .map_err(|e| RalphError::Store(e.to_string()))?;
        {
            let mut table = wt
                .open_table(PRDS)
                .map_err(|e| RalphError::Store(e.to_string()))?;
            table
                .remove(key.as_slice())
                .map_err(|e| RalphError::Store(e.to_string()))?;
        }
        wt.commit().map_err(|e| RalphError::Store(e.to_string()))?;
        Ok(())
    }

    /// All records, newest first (reverse key order).
    fn list_all(&self) -> Result<Vec<StoredPrd>> {
        let rt = self
            .db
            .begin_read()
            .map_err(|e| RalphError::Store(e.to_string()))?;
        let table = rt
            .open_table(PRDS)
            .map_err(|e| RalphError::Store(e.to_string()))?;

        let mut result = Vec::new();
        for entry in table
            .iter()
            .map_err(|e| RalphError::Store(e.to_string()))?
            .rev()
        {
            let (_, v) = entry.map_err(|e| RalphError::Store(e.to_string()))?;
            result.push(serde_json::from_slice(v.value())?);
        }
        Ok(result)
    }

    /// Locate a record and its key by id. The uuid tail of the key is not
    /// range-scannable, so this walks the table.
    fn find(&self, id: Uuid) -> Result<Option<([u8; 24], StoredPrd)>> {
        let rt = self
            .db
            .begin_read()
            .map_err(|e| RalphError::Store(e.to_string()))?;
        let table = rt
            .open_table(PRDS)
            .map_err(|e| RalphError::Store(e.to_string()))?;

        for entry in table.iter().map_err(|e| RalphError::Store(e.to_string()))? {
            let (k, v) = entry.map_err(|e| RalphError::Store(e.to_string()))?;
            if k.value().len() == 24 && &k.value()[8..] == id.as_bytes() {
                let mut key = [0u8; 24];
                key.copy_from_slice(k.value());
                return Ok(Some((key, serde_json::from_slice(v.value())?)));
            }
        }
        Ok(None)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
