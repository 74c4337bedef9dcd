use crate::utils::error::SafariError;

/// Title and site name split out of a page's `<title>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedPost {
    pub thread_title: Option<String>,
    pub site_name: Option<String>,
}

/// A rendered markdown document together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub source_url: String,
    pub title: String,
    pub document: String,
}

/// What a note sink receives: the document text plus the title/URL used
/// by launch targets that want them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPayload {
    pub text: String,
    pub title: String,
    pub source_url: String,
}

impl From<Note> for LaunchPayload {
    fn from(note: Note) -> Self {
        Self {
            text: note.document,
            title: note.title,
            source_url: note.source_url,
        }
    }
}

#[derive(Debug)]
pub struct ItemFailure {
    pub url: String,
    pub error: SafariError,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub delivered: usize,
    pub failures: Vec<ItemFailure>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct ShareOutcome {
    /// `None` 代表沒有任何成功的筆記，因此沒有送出
    pub payload: Option<LaunchPayload>,
    pub note_count: usize,
    pub failures: Vec<ItemFailure>,
}

#[derive(Debug, Default)]
pub struct DryRunReport {
    pub resolved: Vec<(String, ResolvedPost)>,
    pub failures: Vec<ItemFailure>,
}
