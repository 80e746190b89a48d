use crate::core::SourceDocument;

/// State for each open document
#[derive(Debug, Clone)]
pub struct DocumentState {
    pub document: SourceDocument,
    /// Language id sent by the client on open, used to pick checkers
    pub language_id: String,
}
