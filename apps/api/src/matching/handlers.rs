use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::errors::AppError;
use crate::models::{JobRequirements, MatchResult, ParsedResume};
use crate::state::AppState;

const MISSING_DATA: &str = "Both resume_data and job_data are required";

/// Both halves are taken as raw JSON so an absent, null or empty object can
/// be told apart from a malformed one.
#[derive(Debug, Default, Deserialize)]
pub struct MatchRequest {
    #[serde(default)]
    pub resume_data: Option<Value>,
    #[serde(default)]
    pub job_data: Option<Value>,
}

/// POST /match-resume
pub async fn handle_match_resume(
    State(state): State<AppState>,
    payload: Result<Json<MatchRequest>, JsonRejection>,
) -> Result<Json<MatchResult>, AppError> {
    // A body that is not a JSON object carries neither record.
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            debug!("Unreadable match request body: {rejection}");
            MatchRequest::default()
        }
    };

    let (Some(resume_data), Some(job_data)) = (present(req.resume_data), present(req.job_data))
    else {
        return Err(AppError::Validation(MISSING_DATA.to_string()));
    };

    let resume: ParsedResume = decode("resume_data", resume_data)?;
    let job: JobRequirements = decode("job_data", job_data)?;

    let result = state.matcher.match_resume(&resume, &job).await?;
    Ok(Json(result))
}

/// Null and `{}` count as missing.
fn present(value: Option<Value>) -> Option<Value> {
    value.filter(|v| match v {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        _ => true,
    })
}

fn decode<T: DeserializeOwned>(field: &str, value: Value) -> Result<T, AppError> {
    serde_json::from_value(value)
        .map_err(|e| AppError::Validation(format!("Invalid {field}: {e}")))
}
