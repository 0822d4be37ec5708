//! Response schemas, one per endpoint.

use serde::Serialize;

use crate::nlp::sentiment::SentenceSentiment;

/// Body of `GET /` and of every error response.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub file_name: String,
    pub id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileSummaryDto {
    pub id: i64,
    pub file_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileListResponse {
    pub nr_files: usize,
    pub files: Vec<FileSummaryDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileContentsResponse {
    pub file_name: String,
    pub contents: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokensResponse {
    pub word_count: usize,
    pub unique_words: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SentimentResponse {
    pub sentiment: Vec<SentenceSentiment>,
}

/// Entities as `[token, label]` pairs in text order.
#[derive(Debug, Clone, Serialize)]
pub struct NamedEntitiesResponse {
    pub named_entities: Vec<(String, String)>,
}
