//! Identifier metadata and the lookup collaborator contract.
//!
//! Metadata comes from two registries: HGNC (gene nomenclature, JSON) and
//! UniProt (protein accessions, FASTA). Fields that a registry omits are
//! `None` rather than missing dictionary keys.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::LookupError;
use crate::node::Category;

/// Result type for lookup operations.
pub type LookupResult<T> = std::result::Result<T, LookupError>;

/// Gathered metadata keyed by symbol.
pub type MetadataMap = HashMap<String, EnrichmentMetadata>;

/// Gene-level identifiers from HGNC.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HgncRecord {
    pub hgnc_id: Option<String>,
    pub ensembl_gene_id: Option<String>,
    pub uniprot_ids: Vec<String>,
}

/// Protein-level details from a UniProt FASTA header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniprotRecord {
    pub accession: String,
    pub primary_gene_symbol: Option<String>,
    pub taxonomy_id: Option<String>,
    /// Entry name, e.g. `ANDR_HUMAN`.
    pub protein_name: Option<String>,
    /// Recommended full name, e.g. `Androgen receptor`.
    pub full_protein_name: Option<String>,
}

/// Everything known about one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentMetadata {
    pub symbol: String,
    pub hgnc: HgncRecord,
    /// One record per UniProt accession that could be resolved.
    pub proteins: Vec<UniprotRecord>,
}

impl EnrichmentMetadata {
    pub fn new(symbol: impl Into<String>, hgnc: HgncRecord) -> Self {
        Self {
            symbol: symbol.into(),
            hgnc,
            proteins: Vec::new(),
        }
    }

    pub fn with_proteins(mut self, proteins: Vec<UniprotRecord>) -> Self {
        self.proteins = proteins;
        self
    }

    /// The first UniProt accession, which names the Protein node.
    pub fn primary_accession(&self) -> Option<&str> {
        self.hgnc.uniprot_ids.first().map(String::as_str)
    }

    /// Details of the primary accession, if fetched.
    pub fn primary_protein(&self) -> Option<&UniprotRecord> {
        let accession = self.primary_accession()?;
        self.proteins.iter().find(|p| p.accession == accession)
    }

    /// Annotation appended to the category tag of a node label.
    ///
    /// DNA: `HGNC:644/ENSG00000169083`; Protein: `P10275`, with
    /// `/Taxonomy:9606` when the UniProt entry is known; RNA: none.
    pub fn annotation(&self, category: Category) -> Option<String> {
        match category {
            Category::Dna => match (&self.hgnc.hgnc_id, &self.hgnc.ensembl_gene_id) {
                (Some(hgnc), Some(ensembl)) => Some(format!("{hgnc}/{ensembl}")),
                (Some(only), None) | (None, Some(only)) => Some(only.clone()),
                (None, None) => None,
            },
            Category::Rna => None,
            Category::Protein => {
                let accession = self.primary_accession()?;
                match self.primary_protein().and_then(|p| p.taxonomy_id.as_deref()) {
                    Some(taxonomy) => Some(format!("{accession}/Taxonomy:{taxonomy}")),
                    None => Some(accession.to_string()),
                }
            }
        }
    }
}

/// Source of identifier metadata for a symbol.
///
/// `Ok(None)` means "no annotation available"; enrichment degrades to bare
/// category labels in that case.
pub trait IdentifierLookup {
    fn lookup(&self, symbol: &str) -> LookupResult<Option<EnrichmentMetadata>>;
}

impl<T: IdentifierLookup + ?Sized> IdentifierLookup for &T {
    fn lookup(&self, symbol: &str) -> LookupResult<Option<EnrichmentMetadata>> {
        (**self).lookup(symbol)
    }
}

impl IdentifierLookup for MetadataMap {
    fn lookup(&self, symbol: &str) -> LookupResult<Option<EnrichmentMetadata>> {
        Ok(self.get(symbol).cloned())
    }
}

// ---------------------------------------------------------------------------
// HGNC JSON
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct HgncEnvelope {
    response: HgncResponse,
}

#[derive(Deserialize)]
struct HgncResponse {
    #[serde(rename = "numFound", default)]
    num_found: u64,
    #[serde(default)]
    docs: Vec<HgncDoc>,
}

#[derive(Deserialize)]
struct HgncDoc {
    #[serde(default)]
    hgnc_id: Option<String>,
    #[serde(default)]
    ensembl_gene_id: Option<String>,
    #[serde(default)]
    uniprot_ids: Vec<String>,
}

/// Number of documents an HGNC `fetch` response reports.
pub fn hgnc_num_found(symbol: &str, json: &str) -> LookupResult<u64> {
    let envelope: HgncEnvelope = serde_json::from_str(json).map_err(|e| LookupError::Parse {
        key: symbol.to_string(),
        message: e.to_string(),
    })?;
    Ok(envelope.response.num_found)
}

/// Parse an HGNC `fetch/symbol` response. Returns `None` when nothing was found.
pub fn parse_hgnc(symbol: &str, json: &str) -> LookupResult<Option<HgncRecord>> {
    let envelope: HgncEnvelope = serde_json::from_str(json).map_err(|e| LookupError::Parse {
        key: symbol.to_string(),
        message: e.to_string(),
    })?;
    if envelope.response.num_found == 0 {
        return Ok(None);
    }
    Ok(envelope.response.docs.into_iter().next().map(|doc| HgncRecord {
        hgnc_id: doc.hgnc_id,
        ensembl_gene_id: doc.ensembl_gene_id,
        uniprot_ids: doc.uniprot_ids,
    }))
}

// ---------------------------------------------------------------------------
// UniProt FASTA
// ---------------------------------------------------------------------------

/// Parse the header line of a UniProt FASTA entry:
///
/// `>sp|P10275|ANDR_HUMAN Androgen receptor OS=Homo sapiens OX=9606 GN=AR PE=1 SV=3`
pub fn parse_uniprot_fasta(accession: &str, fasta: &str) -> LookupResult<UniprotRecord> {
    let parse_err = |message: &str| LookupError::Parse {
        key: accession.to_string(),
        message: message.to_string(),
    };
    let header = fasta
        .lines()
        .next()
        .and_then(|l| l.strip_prefix('>'))
        .ok_or_else(|| parse_err("missing FASTA header"))?;

    let mut parts = header.splitn(3, '|');
    let _db = parts.next();
    let first_accession = parts
        .next()
        .filter(|a| !a.is_empty())
        .ok_or_else(|| parse_err("missing accession field"))?;
    let description = parts.next().ok_or_else(|| parse_err("missing description"))?;

    let tokens: Vec<&str> = description.split_whitespace().collect();
    let protein_name = tokens.first().map(|s| s.to_string());
    let os_at = tokens
        .iter()
        .position(|t| t.starts_with("OS="))
        .unwrap_or(tokens.len());
    let full_name = tokens.get(1..os_at).map(|t| t.join(" ")).filter(|s| !s.is_empty());
    let field = |prefix: &str| {
        tokens
            .iter()
            .find_map(|t| t.strip_prefix(prefix))
            .map(str::to_string)
    };

    Ok(UniprotRecord {
        accession: first_accession.to_string(),
        primary_gene_symbol: field("GN="),
        taxonomy_id: field("OX="),
        protein_name,
        full_protein_name: full_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const AR_JSON: &str = r#"{
        "responseHeader": {"status": 0},
        "response": {"numFound": 1, "start": 0, "docs": [{
            "hgnc_id": "HGNC:644",
            "symbol": "AR",
            "ensembl_gene_id": "ENSG00000169083",
            "uniprot_ids": ["P10275"]
        }]}
    }"#;

    const AR_FASTA: &str = ">sp|P10275|ANDR_HUMAN Androgen receptor OS=Homo sapiens OX=9606 GN=AR PE=1 SV=3\nMEVQLGLGRVYPRPPSKTYRGAFQNLFQSVREVIQNPGPRHPEAASAAPPGASLLLLQQQQ\n";

    #[test]
    fn hgnc_document_parsed() {
        let record = parse_hgnc("AR", AR_JSON).unwrap().unwrap();
        assert_eq!(record.hgnc_id.as_deref(), Some("HGNC:644"));
        assert_eq!(record.ensembl_gene_id.as_deref(), Some("ENSG00000169083"));
        assert_eq!(record.uniprot_ids, vec!["P10275".to_string()]);
    }

    #[test]
    fn hgnc_missing_fields_are_none() {
        let json = r#"{"response": {"numFound": 1, "docs": [{"hgnc_id": "HGNC:1"}]}}"#;
        let record = parse_hgnc("X", json).unwrap().unwrap();
        assert!(record.ensembl_gene_id.is_none());
        assert!(record.uniprot_ids.is_empty());
    }

    #[test]
    fn hgnc_not_found() {
        let json = r#"{"response": {"numFound": 0, "docs": []}}"#;
        assert!(parse_hgnc("NOPE", json).unwrap().is_none());
        assert_eq!(hgnc_num_found("NOPE", json).unwrap(), 0);
        assert!(parse_hgnc("NOPE", "not json").is_err());
    }

    #[test]
    fn uniprot_header_parsed() {
        let record = parse_uniprot_fasta("P10275", AR_FASTA).unwrap();
        assert_eq!(record.accession, "P10275");
        assert_eq!(record.protein_name.as_deref(), Some("ANDR_HUMAN"));
        assert_eq!(record.full_protein_name.as_deref(), Some("Androgen receptor"));
        assert_eq!(record.taxonomy_id.as_deref(), Some("9606"));
        assert_eq!(record.primary_gene_symbol.as_deref(), Some("AR"));
    }

    #[test]
    fn uniprot_without_header_fails() {
        assert!(parse_uniprot_fasta("P1", "MEVQ\n").is_err());
    }

    #[test]
    fn annotations_per_category() {
        let hgnc = parse_hgnc("AR", AR_JSON).unwrap().unwrap();
        let meta = EnrichmentMetadata::new("AR", hgnc.clone());
        assert_eq!(
            meta.annotation(Category::Dna).as_deref(),
            Some("HGNC:644/ENSG00000169083")
        );
        assert_eq!(meta.annotation(Category::Rna), None);
        assert_eq!(meta.annotation(Category::Protein).as_deref(), Some("P10275"));

        let protein = parse_uniprot_fasta("P10275", AR_FASTA).unwrap();
        let meta = meta.with_proteins(vec![protein]);
        assert_eq!(
            meta.annotation(Category::Protein).as_deref(),
            Some("P10275/Taxonomy:9606")
        );

        let empty = EnrichmentMetadata::new("X", HgncRecord::default());
        assert_eq!(empty.annotation(Category::Dna), None);
        assert_eq!(empty.annotation(Category::Protein), None);
    }
}
