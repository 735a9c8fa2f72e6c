//! Remote identifier registries behind an on-disk response cache.
//!
//! Uses `ureq` for synchronous HTTP requests. Each request is preceded by a
//! fixed delay so bulk enrichment stays within the registries' rate limits.
//! Responses are cached verbatim (`hgnc/<symbol>.json`, `uniprot/<acc>.fasta`)
//! and reused across sessions.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::RegistryConfig;
use crate::error::LookupError;

use super::lookup::{
    EnrichmentMetadata, IdentifierLookup, LookupResult, hgnc_num_found, parse_hgnc,
    parse_uniprot_fasta,
};

/// File-system safe cache key for a symbol or accession.
fn cache_key(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// On-disk cache of raw registry responses.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    hgnc_dir: PathBuf,
    uniprot_dir: PathBuf,
}

impl ResponseCache {
    /// Cache rooted at `root`, with `hgnc/` and `uniprot/` subdirectories.
    pub fn new(root: &Path) -> Self {
        Self {
            hgnc_dir: root.join("hgnc"),
            uniprot_dir: root.join("uniprot"),
        }
    }

    /// Create the cache directories. Idempotent.
    pub fn ensure_dirs(&self) -> LookupResult<()> {
        for dir in [&self.hgnc_dir, &self.uniprot_dir] {
            std::fs::create_dir_all(dir).map_err(|e| LookupError::CacheIo {
                path: dir.display().to_string(),
                source: e,
            })?;
        }
        Ok(())
    }

    pub fn hgnc_path(&self, symbol: &str) -> PathBuf {
        self.hgnc_dir.join(format!("{}.json", cache_key(symbol)))
    }

    pub fn uniprot_path(&self, accession: &str) -> PathBuf {
        self.uniprot_dir.join(format!("{}.fasta", cache_key(accession)))
    }

    fn read(path: &Path) -> LookupResult<Option<String>> {
        match std::fs::read_to_string(path) {
            Ok(body) => Ok(Some(body)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LookupError::CacheIo {
                path: path.display().to_string(),
                source: e,
            }),
        }
    }

    fn write(path: &Path, body: &str) -> LookupResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| LookupError::CacheIo {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, body).map_err(|e| LookupError::CacheIo {
            path: path.display().to_string(),
            source: e,
        })
    }

    pub fn read_hgnc(&self, symbol: &str) -> LookupResult<Option<String>> {
        Self::read(&self.hgnc_path(symbol))
    }

    pub fn store_hgnc(&self, symbol: &str, body: &str) -> LookupResult<()> {
        Self::write(&self.hgnc_path(symbol), body)
    }

    pub fn read_uniprot(&self, accession: &str) -> LookupResult<Option<String>> {
        Self::read(&self.uniprot_path(accession))
    }

    pub fn store_uniprot(&self, accession: &str, body: &str) -> LookupResult<()> {
        Self::write(&self.uniprot_path(accession), body)
    }
}

/// Blocking HTTP client for the HGNC and UniProt REST services.
pub struct RegistryClient {
    agent: ureq::Agent,
    hgnc_url: String,
    uniprot_url: String,
    delay: Duration,
}

impl RegistryClient {
    pub fn new(config: &RegistryConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Self {
            agent,
            hgnc_url: config.hgnc_url.clone(),
            uniprot_url: config.uniprot_url.clone(),
            delay: Duration::from_millis(config.request_delay_ms),
        }
    }

    /// GET a URL. `Ok(None)` for 4xx answers, which the registries use for
    /// unknown symbols and accessions.
    fn get(&self, url: &str, accept: &str) -> LookupResult<Option<String>> {
        std::thread::sleep(self.delay);
        match self.agent.get(url).set("Accept", accept).call() {
            Ok(response) => response.into_string().map(Some).map_err(|e| LookupError::Request {
                url: url.to_string(),
                message: format!("read body: {e}"),
            }),
            Err(ureq::Error::Status(code, _)) if (400..500).contains(&code) => {
                tracing::warn!(url, code, "registry has no entry");
                Ok(None)
            }
            Err(ureq::Error::Status(code, _)) => Err(LookupError::Request {
                url: url.to_string(),
                message: format!("HTTP {code}"),
            }),
            Err(e) => Err(LookupError::Request {
                url: url.to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// Raw HGNC JSON for a symbol.
    pub fn fetch_hgnc(&self, symbol: &str) -> LookupResult<Option<String>> {
        let url = format!("{}{}", self.hgnc_url, symbol);
        self.get(&url, "application/json")
    }

    /// Raw UniProt FASTA for an accession.
    pub fn fetch_uniprot(&self, accession: &str) -> LookupResult<Option<String>> {
        let url = format!("{}{}.fasta", self.uniprot_url, accession);
        self.get(&url, "text/plain")
    }
}

/// Identifier lookup reading from the cache and, unless offline, filling
/// cache misses from the registries.
pub struct CachedRegistry {
    cache: ResponseCache,
    client: Option<RegistryClient>,
}

impl CachedRegistry {
    /// Online lookup: cache misses are fetched and stored.
    pub fn new(cache: ResponseCache, client: RegistryClient) -> Self {
        Self {
            cache,
            client: Some(client),
        }
    }

    /// Cache-only lookup: misses are reported as "no metadata".
    pub fn offline(cache: ResponseCache) -> Self {
        Self {
            cache,
            client: None,
        }
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    fn hgnc_body(&self, symbol: &str) -> LookupResult<Option<String>> {
        if let Some(body) = self.cache.read_hgnc(symbol)? {
            tracing::debug!(symbol, "HGNC cache hit");
            return Ok(Some(body));
        }
        let Some(client) = &self.client else {
            return Ok(None);
        };
        let Some(body) = client.fetch_hgnc(symbol)? else {
            return Ok(None);
        };
        // Only responses with at least one document are worth caching.
        if hgnc_num_found(symbol, &body)? > 0 {
            self.cache.store_hgnc(symbol, &body)?;
            tracing::info!(symbol, "fetched HGNC record");
        } else {
            tracing::warn!(symbol, "no HGNC results");
        }
        Ok(Some(body))
    }

    fn uniprot_body(&self, accession: &str) -> LookupResult<Option<String>> {
        if let Some(body) = self.cache.read_uniprot(accession)? {
            return Ok(Some(body));
        }
        let Some(client) = &self.client else {
            return Ok(None);
        };
        let body = client.fetch_uniprot(accession)?;
        if let Some(body) = &body {
            self.cache.store_uniprot(accession, body)?;
            tracing::info!(accession, "fetched UniProt entry");
        }
        Ok(body)
    }
}

impl IdentifierLookup for CachedRegistry {
    fn lookup(&self, symbol: &str) -> LookupResult<Option<EnrichmentMetadata>> {
        let Some(body) = self.hgnc_body(symbol)? else {
            return Ok(None);
        };
        let Some(hgnc) = parse_hgnc(symbol, &body)? else {
            return Ok(None);
        };

        let mut proteins = Vec::new();
        for accession in &hgnc.uniprot_ids {
            match self.uniprot_body(accession) {
                Ok(Some(fasta)) => match parse_uniprot_fasta(accession, &fasta) {
                    Ok(record) => proteins.push(record),
                    Err(e) => tracing::warn!(accession, error = %e, "unreadable UniProt entry"),
                },
                Ok(None) => {}
                Err(e) => tracing::warn!(accession, error = %e, "UniProt lookup failed"),
            }
        }
        Ok(Some(EnrichmentMetadata::new(symbol, hgnc).with_proteins(proteins)))
    }
}
