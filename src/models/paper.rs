// src/models/paper.rs

use serde::Serialize;

/// One entry returned by the paper metadata search.
#[derive(Debug, Clone, PartialEq)]
pub struct PaperEntry {
    /// arXiv identifier, e.g. `2101.00001v1`.
    pub id: String,
    pub title: String,
    pub abstract_text: String,
    pub authors: Vec<String>,
    pub year: i32,
    /// Canonical abstract page URL.
    pub url: String,
}

impl PaperEntry {
    /// APA-style citation: first author (plus "et al."), year, title, arXiv id.
    pub fn citation(&self) -> String {
        let authors = match self.authors.as_slice() {
            [] => "Unknown".to_string(),
            [only] => only.clone(),
            [first, ..] => format!("{}, et al.", first),
        };
        format!(
            "{} ({}). {}. arXiv preprint arXiv:{}.",
            authors, self.year, self.title, self.id
        )
    }
}

/// A search result as returned to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchPaper {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub published: i32,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub ai_summary: String,
    pub citation: String,
    pub url: String,
}

impl ResearchPaper {
    pub fn new(entry: PaperEntry, ai_summary: String) -> Self {
        let citation = entry.citation();
        ResearchPaper {
            id: entry.id,
            title: entry.title,
            authors: entry.authors,
            published: entry.year,
            abstract_text: entry.abstract_text,
            ai_summary,
            citation,
            url: entry.url,
        }
    }
}

/// Response body of the paper search endpoint.
#[derive(Debug, Serialize)]
pub struct SearchPapersResponse {
    pub papers: Vec<ResearchPaper>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
