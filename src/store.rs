//! Metadata store backed by redb.
//!
//! Persists one [`EnrichmentMetadata`] record per symbol so enrichment can
//! run without the remote registries. The store is an explicit handle owned
//! by the caller; every operation runs in its own transaction.

use std::path::Path;

use redb::{Database, ReadableTable, TableDefinition};

use crate::enrich::lookup::{EnrichmentMetadata, IdentifierLookup, LookupResult};
use crate::error::{LookupError, StoreError};

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Symbol → bincode-encoded metadata.
const METADATA_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("metadata");

fn redb_err(context: &str, e: impl std::fmt::Display) -> StoreError {
    StoreError::Redb {
        message: format!("{context}: {e}"),
    }
}

/// ACID-durable metadata store.
pub struct MetadataStore {
    db: Database,
}

impl MetadataStore {
    /// Open or create the store at `path`, creating parent directories.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Io { source: e })?;
        }
        let db = Database::create(path).map_err(|e| StoreError::Redb {
            message: format!("failed to open redb at {}: {e}", path.display()),
        })?;

        // Create the table up front so read transactions never miss it.
        let txn = db.begin_write().map_err(|e| redb_err("begin_write failed", e))?;
        txn.open_table(METADATA_TABLE)
            .map_err(|e| redb_err("open_table failed", e))?;
        txn.commit().map_err(|e| redb_err("commit failed", e))?;

        tracing::debug!(path = %path.display(), "opened metadata store");
        Ok(Self { db })
    }

    /// Insert or replace the record of `metadata.symbol`.
    pub fn put(&self, metadata: &EnrichmentMetadata) -> StoreResult<()> {
        let value = bincode::serialize(metadata).map_err(|e| StoreError::Serialization {
            message: format!("encode {}: {e}", metadata.symbol),
        })?;
        let txn = self
            .db
            .begin_write()
            .map_err(|e| redb_err("begin_write failed", e))?;
        {
            let mut table = txn
                .open_table(METADATA_TABLE)
                .map_err(|e| redb_err("open_table failed", e))?;
            table
                .insert(metadata.symbol.as_str(), value.as_slice())
                .map_err(|e| redb_err("insert failed", e))?;
        }
        txn.commit().map_err(|e| redb_err("commit failed", e))?;
        Ok(())
    }

    /// Read the record of a symbol. `Ok(None)` if it was never stored.
    pub fn get(&self, symbol: &str) -> StoreResult<Option<EnrichmentMetadata>> {
        let txn = self
            .db
            .begin_read()
            .map_err(|e| redb_err("begin_read failed", e))?;
        let table = txn
            .open_table(METADATA_TABLE)
            .map_err(|e| redb_err("open_table failed", e))?;
        let Some(guard) = table
            .get(symbol)
            .map_err(|e| redb_err("get failed", e))?
        else {
            return Ok(None);
        };
        bincode::deserialize(guard.value())
            .map(Some)
            .map_err(|e| StoreError::Serialization {
                message: format!("decode {symbol}: {e}"),
            })
    }

    /// All stored symbols, in key order.
    pub fn symbols(&self) -> StoreResult<Vec<String>> {
        let txn = self
            .db
            .begin_read()
            .map_err(|e| redb_err("begin_read failed", e))?;
        let table = txn
            .open_table(METADATA_TABLE)
            .map_err(|e| redb_err("open_table failed", e))?;
        let mut symbols = Vec::new();
        for entry in table.iter().map_err(|e| redb_err("iter failed", e))? {
            let (key, _) = entry.map_err(|e| redb_err("iter failed", e))?;
            symbols.push(key.value().to_string());
        }
        Ok(symbols)
    }

    /// Number of stored records.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.symbols()?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl IdentifierLookup for MetadataStore {
    fn lookup(&self, symbol: &str) -> LookupResult<Option<EnrichmentMetadata>> {
        self.get(symbol).map_err(|e| LookupError::Request {
            url: "metadata store".into(),
            message: e.to_string(),
        })
    }
}

impl std::fmt::Debug for MetadataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::lookup::{HgncRecord, UniprotRecord};

    fn ar() -> EnrichmentMetadata {
        EnrichmentMetadata::new(
            "AR",
            HgncRecord {
                hgnc_id: Some("HGNC:644".into()),
                ensembl_gene_id: Some("ENSG00000169083".into()),
                uniprot_ids: vec!["P10275".into()],
            },
        )
        .with_proteins(vec![UniprotRecord {
            accession: "P10275".into(),
            primary_gene_symbol: Some("AR".into()),
            taxonomy_id: Some("9606".into()),
            protein_name: Some("ANDR_HUMAN".into()),
            full_protein_name: Some("Androgen receptor".into()),
        }])
    }

    #[test]
    fn put_get() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = MetadataStore::open(&dir.path().join("meta.redb")).unwrap();
        assert!(store.get("AR").unwrap().is_none());
        store.put(&ar()).unwrap();
        assert_eq!(store.get("AR").unwrap(), Some(ar()));
        assert_eq!(store.symbols().unwrap(), vec!["AR".to_string()]);
    }

    #[test]
    fn overwrite_record() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = MetadataStore::open(&dir.path().join("meta.redb")).unwrap();
        store.put(&ar()).unwrap();
        let replaced = EnrichmentMetadata::new("AR", HgncRecord::default());
        store.put(&replaced).unwrap();
        assert_eq!(store.get("AR").unwrap(), Some(replaced));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn store_is_a_lookup() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = MetadataStore::open(&dir.path().join("db/meta.redb")).unwrap();
        store.put(&ar()).unwrap();
        let found = store.lookup("AR").unwrap().unwrap();
        assert_eq!(found.primary_accession(), Some("P10275"));
        assert!(store.lookup("TP53").unwrap().is_none());
    }
}
