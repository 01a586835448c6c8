//! Research request types.

use serde::{Deserialize, Serialize};

/// A paper supplied by the caller to seed literature collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperRef {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

/// Parameters of a research job, snapshotted at submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchRequest {
    /// Research domain, e.g. "graph neural networks".
    pub domain: String,
    /// Papers to seed literature collection with.
    #[serde(default)]
    pub seed_papers: Vec<PaperRef>,
    /// Optional narrower focus within the domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub research_focus: Option<String>,
    /// Generative model to use, overriding the server default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_preference: Option<String>,
}

/// A paper record produced by literature collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperRecord {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<String>,
    #[serde(rename = "abstract", default)]
    pub abstract_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Where the record came from, e.g. "arXiv" or "seed".
    pub source: String,
    /// Model-generated topical summary, filled in during collection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enriched_metadata: Option<String>,
}

impl From<PaperRef> for PaperRecord {
    fn from(seed: PaperRef) -> Self {
        Self {
            title: seed.title,
            authors: seed.authors,
            abstract_text: String::new(),
            year: seed.year,
            url: seed.url,
            source: "seed".to_string(),
            enriched_metadata: None,
        }
    }
}
