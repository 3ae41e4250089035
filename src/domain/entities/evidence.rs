use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Citation metadata attached to a piece of evidence.
///
/// Table rows carry `sheet`/`row_idx`/`table_title`, free-text chunks carry
/// `source`/`page`. Both shapes collapse onto the same three optional fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub sheet: Option<String>,
    pub row: Option<String>,
    pub title: Option<String>,
}

impl Provenance {
    pub fn new(
        sheet: impl Into<String>,
        row: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            sheet: Some(sheet.into()),
            row: Some(row.into()),
            title: Some(title.into()),
        }
    }

    /// Reads provenance out of an indexer metadata object.
    ///
    /// Missing keys, nulls and values of an unexpected type become `None`.
    pub fn from_metadata(metadata: &Value) -> Self {
        Self {
            sheet: field(metadata, "sheet").or_else(|| field(metadata, "source")),
            row: field(metadata, "row_idx").or_else(|| field(metadata, "page")),
            title: field(metadata, "table_title"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sheet.is_none() && self.row.is_none() && self.title.is_none()
    }
}

fn field(metadata: &Value, key: &str) -> Option<String> {
    match metadata.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// One retrieved text unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub content: String,
    pub provenance: Provenance,
}

impl EvidenceItem {
    pub fn new(content: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            content: content.into(),
            provenance,
        }
    }

    /// Builds an item from a stored point payload (`page_content` + `metadata`).
    pub fn from_payload(payload: &Value) -> Self {
        let content = payload
            .get("page_content")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let provenance = payload
            .get("metadata")
            .map(Provenance::from_metadata)
            .unwrap_or_default();
        Self::new(content, provenance)
    }
}

/// Evidence ordered by relevance, rank 0 first.
pub type EvidenceSet = Vec<EvidenceItem>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredEvidence {
    pub item: EvidenceItem,
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_table_row_metadata() {
        let payload = json!({
            "page_content": "졸업 요건: 140학점",
            "metadata": {
                "table_file": "realTable.xlsx",
                "sheet": "교과과정",
                "table_title": "졸업요건표",
                "row_idx": 12
            }
        });

        let item = EvidenceItem::from_payload(&payload);
        assert_eq!(item.content, "졸업 요건: 140학점");
        assert_eq!(item.provenance, Provenance::new("교과과정", "12", "졸업요건표"));
    }

    #[test]
    fn test_text_chunk_metadata() {
        let metadata = json!({ "source": "학칙.pdf", "page": 3 });
        let provenance = Provenance::from_metadata(&metadata);

        assert_eq!(provenance.sheet.as_deref(), Some("학칙.pdf"));
        assert_eq!(provenance.row.as_deref(), Some("3"));
        assert_eq!(provenance.title, None);
    }

    #[test]
    fn test_missing_or_odd_metadata_defaults_to_absent() {
        let item = EvidenceItem::from_payload(&json!({
            "page_content": "text",
            "metadata": { "sheet": null, "row_idx": [1, 2], "table_title": true }
        }));
        assert!(item.provenance.is_empty());

        let bare = EvidenceItem::from_payload(&json!({}));
        assert_eq!(bare.content, "");
        assert!(bare.provenance.is_empty());
    }
}
