//! Syllabus endpoints
//!
//! - `GET /syllabus/`, `POST /syllabus/`
//! - `GET|PUT|PATCH|DELETE /syllabus/:pk/`

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use tracing::{info, instrument};
use training_common::api::{ContentResponse, ListResponse};

use super::{list_response, parse_pk};
use crate::controllers::syllabus::LIST_META;
use crate::controllers::{is_valid, ListController, RawInput, SyllabusController};
use crate::db;
use crate::directory::Caller;
use crate::error::{ApiError, ApiResult};
use crate::permissions;
use crate::presenters::SyllabusOut;
use crate::AppState;

/// Build Syllabus routes
pub fn syllabus_routes() -> Router<AppState> {
    Router::new()
        .route("/syllabus/", get(list_syllabus).post(create_syllabus))
        .route(
            "/syllabus/:pk/",
            get(read_syllabus)
                .put(update_syllabus)
                .patch(partial_update_syllabus)
                .delete(delete_syllabus),
        )
}

/// GET /syllabus/
#[instrument(skip_all)]
pub async fn list_syllabus(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Json<ListResponse<SyllabusOut>>> {
    let controller = ListController::validate(&LIST_META, &params, state.pagination)?;
    let (records, total) =
        db::syllabus::list(&state.db, caller.member_id, &controller.query).await?;

    let content = records.iter().map(SyllabusOut::from).collect();
    Ok(Json(list_response(content, total, controller)))
}

/// POST /syllabus/
///
/// Only self-managed Members may create; this is checked before the body.
#[instrument(skip_all)]
pub async fn create_syllabus(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    body: Result<Json<RawInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ContentResponse<SyllabusOut>>)> {
    permissions::syllabus::create(&caller)?;
    let Json(data) = body?;

    let mut controller = SyllabusController::create(&state.db, caller.member_id);
    is_valid(&mut controller, &data, false).await?;

    let new = controller.cleaned.into_new(caller.member_id)?;
    let syllabus = db::syllabus::insert(&state.db, &new).await?;
    info!(
        syllabus_id = syllabus.id,
        member_id = syllabus.member_id,
        "Created syllabus"
    );

    Ok((
        StatusCode::CREATED,
        Json(ContentResponse::new(SyllabusOut::from(&syllabus))),
    ))
}

/// GET /syllabus/:pk/
#[instrument(skip_all, fields(pk = %pk))]
pub async fn read_syllabus(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(pk): Path<String>,
) -> ApiResult<Json<ContentResponse<SyllabusOut>>> {
    let code = "training_syllabus_read_001";
    let syllabus = db::syllabus::get_live(&state.db, parse_pk(&pk, code)?)
        .await?
        .ok_or(ApiError::NotFound(code))?;

    permissions::syllabus::read(&caller, &syllabus)?;

    Ok(Json(ContentResponse::new(SyllabusOut::from(&syllabus))))
}

/// PUT /syllabus/:pk/
pub async fn update_syllabus(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(pk): Path<String>,
    body: Result<Json<RawInput>, JsonRejection>,
) -> ApiResult<Json<ContentResponse<SyllabusOut>>> {
    update(state, caller, pk, body, false).await
}

/// PATCH /syllabus/:pk/
pub async fn partial_update_syllabus(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(pk): Path<String>,
    body: Result<Json<RawInput>, JsonRejection>,
) -> ApiResult<Json<ContentResponse<SyllabusOut>>> {
    update(state, caller, pk, body, true).await
}

#[instrument(skip(state, caller, body))]
async fn update(
    state: AppState,
    caller: Caller,
    pk: String,
    body: Result<Json<RawInput>, JsonRejection>,
    partial: bool,
) -> ApiResult<Json<ContentResponse<SyllabusOut>>> {
    let code = "training_syllabus_update_001";
    let mut syllabus = db::syllabus::get_live(&state.db, parse_pk(&pk, code)?)
        .await?
        .ok_or(ApiError::NotFound(code))?;

    permissions::syllabus::update(&caller, &syllabus)?;
    let Json(data) = body?;

    let mut controller = SyllabusController::update(&state.db, caller.member_id, &syllabus);
    is_valid(&mut controller, &data, partial).await?;

    controller.cleaned.apply(&mut syllabus);
    db::syllabus::save(&state.db, &mut syllabus).await?;
    info!(syllabus_id = syllabus.id, "Updated syllabus");

    Ok(Json(ContentResponse::new(SyllabusOut::from(&syllabus))))
}

/// DELETE /syllabus/:pk/
///
/// Soft deletes the Syllabus together with its Classes.
#[instrument(skip_all, fields(pk = %pk))]
pub async fn delete_syllabus(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(pk): Path<String>,
) -> ApiResult<StatusCode> {
    let code = "training_syllabus_delete_001";
    let mut syllabus = db::syllabus::get_live(&state.db, parse_pk(&pk, code)?)
        .await?
        .ok_or(ApiError::NotFound(code))?;

    permissions::syllabus::delete(&state.db, &caller, &syllabus).await?;

    let classes = db::syllabus::cascade_delete(&state.db, &mut syllabus).await?;
    info!(syllabus_id = syllabus.id, classes, "Deleted syllabus");

    Ok(StatusCode::NO_CONTENT)
}
