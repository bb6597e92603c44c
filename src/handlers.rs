use crate::errors::AppError;
use crate::inventory::{allocate_id, apply_patch, spend};
use crate::models::{Ack, Filament, FilamentPatch, UseRequest};
use crate::state::AppState;
use crate::storage::persist_filaments;
use crate::ui::render_index;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    Json,
};
use serde_json::{Number, Value};

const NOT_FOUND_MESSAGE: &str = "Filament not found";

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let records = state.filaments.lock().await;
    Html(render_index(&records))
}

pub async fn list_filaments(State(state): State<AppState>) -> Json<Vec<Filament>> {
    let records = state.filaments.lock().await;
    Json(records.clone())
}

pub async fn create_filament(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Filament>), AppError> {
    let mut records = state.filaments.lock().await;
    let mut record = Filament::from(payload);
    record.id = Some(allocate_id(&records));
    records.insert(0, record.clone());

    persist_filaments(&state.data_path, &records).await?;

    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_filament(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<FilamentPatch>,
) -> Result<Json<Filament>, AppError> {
    let mut records = state.filaments.lock().await;
    let record = records
        .iter_mut()
        .find(|f| f.id == Some(id))
        .ok_or_else(|| AppError::not_found(NOT_FOUND_MESSAGE))?;
    apply_patch(record, patch);
    let updated = record.clone();

    persist_filaments(&state.data_path, &records).await?;

    Ok(Json(updated))
}

pub async fn use_filament(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UseRequest>,
) -> Result<Json<Filament>, AppError> {
    let mut records = state.filaments.lock().await;
    let record = records
        .iter_mut()
        .find(|f| f.id == Some(id))
        .ok_or_else(|| AppError::not_found(NOT_FOUND_MESSAGE))?;

    // Invalid amounts are a no-op, the record is returned unchanged.
    let Some(new_mass) = spend(record.current_grams().unwrap_or(0.0), request.grams) else {
        return Ok(Json(record.clone()));
    };
    record.current_mass = Number::from_f64(new_mass);
    let updated = record.clone();

    persist_filaments(&state.data_path, &records).await?;

    Ok(Json(updated))
}

pub async fn delete_filament(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Ack>, AppError> {
    let mut records = state.filaments.lock().await;
    let idx = records
        .iter()
        .position(|f| f.id == Some(id))
        .ok_or_else(|| AppError::not_found(NOT_FOUND_MESSAGE))?;
    records.remove(idx);

    persist_filaments(&state.data_path, &records).await?;

    Ok(Json(Ack::ok()))
}

pub async fn import_filaments(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<Ack>, AppError> {
    // The only validation: the payload must be a sequence. Elements are
    // stored as given and round-trip verbatim.
    let Value::Array(items) = payload else {
        return Err(AppError::bad_request("Invalid data"));
    };
    let imported: Vec<Filament> = items.into_iter().map(Filament::from).collect();

    let mut records = state.filaments.lock().await;
    *records = imported;

    persist_filaments(&state.data_path, &records).await?;

    Ok(Json(Ack::ok()))
}
