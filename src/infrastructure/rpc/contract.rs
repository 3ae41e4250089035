//! Wire types shared by the services and the gateway's clients.

use serde::{Deserialize, Serialize};

use crate::domain::{Dependency, EvidenceItem, Provenance};

pub mod kinds {
    pub const INVALID_REQUEST: &str = "invalid_request";
    pub const RETRIEVAL_UNAVAILABLE: &str = "retrieval_unavailable";
    pub const GENERATION_FAILED: &str = "generation_failed";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default)]
    pub sheet: Option<String>,
    #[serde(default)]
    pub row_idx: Option<String>,
    #[serde(default)]
    pub table_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    #[serde(default)]
    pub metadata: DocumentMetadata,
}

impl From<EvidenceItem> for Document {
    fn from(item: EvidenceItem) -> Self {
        Self {
            content: item.content,
            metadata: DocumentMetadata {
                sheet: item.provenance.sheet,
                row_idx: item.provenance.row,
                table_title: item.provenance.title,
            },
        }
    }
}

impl From<Document> for EvidenceItem {
    fn from(doc: Document) -> Self {
        EvidenceItem::new(
            doc.content,
            Provenance {
                sheet: doc.metadata.sheet,
                row: doc.metadata.row_idx,
                title: doc.metadata.table_title,
            },
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub documents: Vec<Document>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub query: String,
    #[serde(default)]
    pub contexts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub kind: String,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency: Option<Dependency>,
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

impl ErrorBody {
    pub fn new(kind: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                kind: kind.into(),
                detail: detail.into(),
                dependency: None,
            },
        }
    }

    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.error.dependency = Some(dependency);
        self
    }
}
