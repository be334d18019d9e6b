use axum::extract::{Path, Query, State};
use serde::Deserialize;

use backend_application::commands::{event_commands, prezo_commands, suggestion_commands};
use backend_application::AppState;

use super::parse_event_id;
use crate::error::HttpError;

const SUCCESS: &str = "success";

#[derive(Debug, Default, Deserialize)]
pub struct SuggestionParams {
    #[serde(default)]
    pub force: Option<String>,
}

impl SuggestionParams {
    /// Any `force` value counts except an explicit `false` or `0`, so a bare
    /// `?force` forces too.
    pub fn forced(&self) -> bool {
        match self.force.as_deref().map(str::trim) {
            None => false,
            Some(value) => !(value.eq_ignore_ascii_case("false") || value == "0"),
        }
    }
}

pub async fn generate_event(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<&'static str, HttpError> {
    event_commands::generate_event(&state, &date).await?;
    Ok(SUCCESS)
}

pub async fn generate_event_type_suggestions(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<SuggestionParams>,
) -> Result<&'static str, HttpError> {
    let id = parse_event_id(&id)?;
    suggestion_commands::generate_event_type_suggestions(&state, id, params.forced()).await?;
    Ok(SUCCESS)
}

pub async fn generate_prezo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<&'static str, HttpError> {
    let id = parse_event_id(&id)?;
    prezo_commands::generate_prezo(&state, id).await?;
    Ok(SUCCESS)
}
