use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(rename = "tag_name")]
    pub name: String,
    /// Absolute link to the tag page.
    #[serde(rename = "tag_url")]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    /// Absolute link to the author page.
    pub url: String,
}

/// A single quote as it appears on a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub author: Author,
    /// In the order they appear on the page.
    pub tags: Vec<Tag>,
}

/// What a single page produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Quotes(Vec<Quote>),
    /// The page exists but holds no quotes: we are past the end of the data.
    Empty,
    /// Transport or extraction failure, scoped to this page.
    Failed(String),
}

impl PageOutcome {
    /// Empty extraction results become `Empty`.
    pub fn from_quotes(quotes: Vec<Quote>) -> Self {
        if quotes.is_empty() {
            PageOutcome::Empty
        } else {
            PageOutcome::Quotes(quotes)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, PageOutcome::Empty)
    }

    /// Quotes of the page, nothing for `Empty` and `Failed`.
    pub fn into_quotes(self) -> Vec<Quote> {
        match self {
            PageOutcome::Quotes(quotes) => quotes,
            PageOutcome::Empty | PageOutcome::Failed(_) => Vec::new(),
        }
    }
}
