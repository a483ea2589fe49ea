use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::errors::AppError;
use crate::models::ParsedResume;
use crate::state::AppState;

const FILE_FIELD: &str = "file";

/// POST /parse-resume
/// Multipart upload with the document in the `file` field. The file type is
/// taken from the filename extension.
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ParsedResume>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            return Err(AppError::Validation("No file selected".to_string()));
        }

        let bytes = field.bytes().await?;
        let declared_type = file_extension(&filename);
        let resume = state.parser.parse(bytes, declared_type).await?;
        return Ok(Json(resume));
    }

    Err(AppError::Validation("No file uploaded".to_string()))
}

/// Text after the last '.', or "" when the name has no extension.
fn file_extension(filename: &str) -> &str {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .unwrap_or_default()
}
