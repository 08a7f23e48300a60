//! Equipment handlers.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use gearbase::{
    backend::UpdateOutcome,
    document::{DocumentId, Record},
    query::Filter,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    config::OWNER_FIELD,
    error::{ApiError, Operation},
    state::AppState,
};

type Fields = Map<String, Value>;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(rename = "userEmail")]
    pub user_email: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Inserted {
    pub inserted_id: DocumentId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Modified {
    pub modified_count: u64,
}

impl From<UpdateOutcome> for Modified {
    fn from(outcome: UpdateOutcome) -> Self {
        Self {
            modified_count: outcome.modified,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub message: &'static str,
}

pub async fn create_equipment(
    State(state): State<AppState>,
    body: Result<Json<Fields>, JsonRejection>,
) -> Result<(StatusCode, Json<Inserted>), ApiError> {
    let Json(fields) = body?;

    let id = state
        .equipments()
        .insert(fields)
        .await
        .map_err(ApiError::during(Operation::Add))?;

    tracing::info!(id = %id, "equipment added");

    Ok((StatusCode::CREATED, Json(Inserted { inserted_id: id })))
}

/// Lists equipment, restricted to one owner when `userEmail` is given and
/// non-empty.
pub async fn list_equipment(
    State(state): State<AppState>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let Query(params) = query?;

    let filter = params
        .user_email
        .filter(|email| !email.is_empty())
        .map(|email| Filter::eq(OWNER_FIELD, email));

    let records = state
        .equipments()
        .find(filter)
        .await
        .map_err(ApiError::during(Operation::Fetch))?;

    Ok(Json(records))
}

pub async fn get_equipment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Record>, ApiError> {
    state
        .equipments()
        .get(&id)
        .await
        .map(Json)
        .map_err(ApiError::during(Operation::Fetch))
}

pub async fn update_equipment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Fields>, JsonRejection>,
) -> Result<Json<Modified>, ApiError> {
    let Json(fields) = body?;

    let outcome = state
        .equipments()
        .update(&id, fields)
        .await
        .map_err(ApiError::during(Operation::Update))?;

    tracing::info!(id = %id, modified = outcome.modified, "equipment updated");

    Ok(Json(outcome.into()))
}

pub async fn delete_equipment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, ApiError> {
    state
        .equipments()
        .delete(&id)
        .await
        .map_err(ApiError::during(Operation::Delete))?;

    tracing::info!(id = %id, "equipment deleted");

    Ok(Json(Deleted {
        message: "Equipment deleted successfully",
    }))
}
