//! HTTP route handlers for Axum.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use tracing::info;

use crate::{
    api::{
        extract::FileId,
        types::{
            FileContentsResponse, FileListResponse, FileSummaryDto, MessageResponse,
            NamedEntitiesResponse, SentimentResponse, TokensResponse, UploadResponse,
        },
    },
    error::ServiceError,
    nlp::{sentiment, tokens},
};

use super::AppState;

type ApiResult<T> = Result<Json<T>, ServiceError>;

pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "docsense is running".to_string(),
    })
}

/// Store the multipart field `file` as UTF-8 text.
pub async fn upload_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<UploadResponse> {
    let mut multipart = multipart?;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        let contents = String::from_utf8(bytes.to_vec())?;
        let id = state.store.add_entry(&file_name, &contents).await?;
        info!(id, %file_name, bytes = contents.len(), "stored upload");
        return Ok(Json(UploadResponse {
            message: "file successfully uploaded".to_string(),
            file_name,
            id,
        }));
    }
    Err(ServiceError::InvalidUpload(
        "multipart field `file` is missing".to_string(),
    ))
}

pub async fn list_files(State(state): State<AppState>) -> ApiResult<FileListResponse> {
    let files: Vec<FileSummaryDto> = state
        .store
        .get_all_entries()
        .await?
        .into_iter()
        .map(|record| FileSummaryDto {
            id: record.id,
            file_name: record.file_name,
        })
        .collect();
    Ok(Json(FileListResponse {
        nr_files: files.len(),
        files,
    }))
}

pub async fn get_file(
    FileId(file_id): FileId,
    State(state): State<AppState>,
) -> ApiResult<FileContentsResponse> {
    let record = state.store.get_entry_by_id(file_id).await?;
    Ok(Json(FileContentsResponse {
        file_name: record.file_name,
        contents: record.contents,
    }))
}

pub async fn get_tokens(
    FileId(file_id): FileId,
    State(state): State<AppState>,
) -> ApiResult<TokensResponse> {
    let record = state.store.get_entry_by_id(file_id).await?;
    let unique_words = tokens::unique_words(&record.contents);
    Ok(Json(TokensResponse {
        word_count: unique_words.len(),
        unique_words,
    }))
}

pub async fn get_sentiment(
    FileId(file_id): FileId,
    State(state): State<AppState>,
) -> ApiResult<SentimentResponse> {
    let record = state.store.get_entry_by_id(file_id).await?;
    Ok(Json(SentimentResponse {
        sentiment: sentiment::analyze(&record.contents),
    }))
}

pub async fn get_named_entities(
    FileId(file_id): FileId,
    State(state): State<AppState>,
) -> ApiResult<NamedEntitiesResponse> {
    let record = state.store.get_entry_by_id(file_id).await?;
    let named_entities = state
        .ner
        .extract(&record.contents)?
        .into_iter()
        .map(|span| (span.text, span.label))
        .collect();
    Ok(Json(NamedEntitiesResponse { named_entities }))
}
