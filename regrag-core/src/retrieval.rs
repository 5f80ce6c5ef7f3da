//! Retrieval hit shapes shared by the gateway, prompt assembler, and
//! answer result.

use serde::{Deserialize, Serialize};

/// What kind of content a chunk's text represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// Extracted document text.
    Text,
    /// OCR output from a scanned image or figure.
    ImageOcr,
}

/// One retrieval hit returned by the vector index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// Source document identifier.
    pub document: String,
    /// Page number within the document.
    pub page: u32,
    /// Paragraph index within the page, when the index tracks it.
    #[serde(default)]
    pub paragraph: Option<u32>,
    /// Section title, when the index tracks it.
    #[serde(default)]
    pub title: Option<String>,
    /// The chunk's text.
    pub content: String,
    /// Whether the chunk is native text or OCR output.
    pub content_type: ContentType,
    /// Relevance score in `[0, 1]`, higher is more relevant.
    pub score: f64,
    /// Set when the LLM later marks this chunk as the one actually used
    /// to ground the answer. Absent on the raw retrieval response.
    #[serde(default)]
    pub selected: Option<bool>,
}

impl RetrievedChunk {
    /// A short citation marker: `[document, p.page]` or with a title.
    pub fn marker(&self) -> String {
        match &self.title {
            Some(title) => format!("[{}, p.{}, \"{}\"]", self.document, self.page, title),
            None => format!("[{}, p.{}]", self.document, self.page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(score: f64) -> RetrievedChunk {
        RetrievedChunk {
            document: "doc".into(),
            page: 1,
            paragraph: None,
            title: None,
            content: "text".into(),
            content_type: ContentType::Text,
            score,
            selected: None,
        }
    }

    #[test]
    fn marker_without_title() {
        assert_eq!(chunk(0.9).marker(), "[doc, p.1]");
    }

    #[test]
    fn marker_with_title() {
        let mut c = chunk(0.9);
        c.title = Some("Extensions".into());
        assert_eq!(c.marker(), "[doc, p.1, \"Extensions\"]");
    }
}
