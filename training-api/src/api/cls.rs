//! Class endpoints
//!
//! - `GET /class/`, `POST /class/`
//! - `GET|PUT|PATCH|DELETE /class/:pk/`

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use tracing::{info, instrument};
use training_common::api::{ContentResponse, ListResponse};

use super::{list_response, parse_pk};
use crate::controllers::cls::LIST_META;
use crate::controllers::{is_valid, ClsController, ListController, RawInput};
use crate::db;
use crate::directory::Caller;
use crate::error::{ApiError, ApiResult};
use crate::permissions;
use crate::presenters::ClsOut;
use crate::AppState;

/// Build Class routes
pub fn cls_routes() -> Router<AppState> {
    Router::new()
        .route("/class/", get(list_cls).post(create_cls))
        .route(
            "/class/:pk/",
            get(read_cls)
                .put(update_cls)
                .patch(partial_update_cls)
                .delete(delete_cls),
        )
}

/// GET /class/
#[instrument(skip_all)]
pub async fn list_cls(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Json<ListResponse<ClsOut>>> {
    let controller = ListController::validate(&LIST_META, &params, state.pagination)?;
    let (records, total) = db::cls::list(&state.db, caller.member_id, &controller.query).await?;

    let content = records.iter().map(ClsOut::from).collect();
    Ok(Json(list_response(content, total, controller)))
}

/// POST /class/
#[instrument(skip_all)]
pub async fn create_cls(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    body: Result<Json<RawInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ContentResponse<ClsOut>>)> {
    let Json(data) = body?;

    let mut controller = ClsController::create(&state.db);
    is_valid(&mut controller, &data, false).await?;
    let new = controller.cleaned.into_new()?;

    permissions::cls::create(&caller, &new)?;

    let cls = db::cls::insert(&state.db, &new).await?;
    info!(
        cls_id = cls.id,
        syllabus_id = cls.syllabus.id,
        "Created class"
    );

    Ok((StatusCode::CREATED, Json(ContentResponse::new(ClsOut::from(&cls)))))
}

/// GET /class/:pk/
#[instrument(skip_all, fields(pk = %pk))]
pub async fn read_cls(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(pk): Path<String>,
) -> ApiResult<Json<ContentResponse<ClsOut>>> {
    let code = "training_cls_read_001";
    let cls = db::cls::get_live(&state.db, parse_pk(&pk, code)?)
        .await?
        .ok_or(ApiError::NotFound(code))?;

    permissions::cls::read(&caller, &cls)?;

    Ok(Json(ContentResponse::new(ClsOut::from(&cls))))
}

/// PUT /class/:pk/
pub async fn update_cls(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(pk): Path<String>,
    body: Result<Json<RawInput>, JsonRejection>,
) -> ApiResult<Json<ContentResponse<ClsOut>>> {
    update(state, caller, pk, body, false).await
}

/// PATCH /class/:pk/
pub async fn partial_update_cls(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(pk): Path<String>,
    body: Result<Json<RawInput>, JsonRejection>,
) -> ApiResult<Json<ContentResponse<ClsOut>>> {
    update(state, caller, pk, body, true).await
}

/// A Class can only be moved to a Syllabus of the caller's own Member
#[instrument(skip(state, caller, body))]
async fn update(
    state: AppState,
    caller: Caller,
    pk: String,
    body: Result<Json<RawInput>, JsonRejection>,
    partial: bool,
) -> ApiResult<Json<ContentResponse<ClsOut>>> {
    let code = "training_cls_update_001";
    let mut cls = db::cls::get_live(&state.db, parse_pk(&pk, code)?)
        .await?
        .ok_or(ApiError::NotFound(code))?;

    permissions::cls::update(&caller, &cls)?;
    let Json(data) = body?;

    let mut controller = ClsController::update(&state.db, &cls);
    is_valid(&mut controller, &data, partial).await?;
    controller.cleaned.apply(&mut cls);

    permissions::cls::update(&caller, &cls)?;

    db::cls::save(&state.db, &mut cls).await?;
    info!(cls_id = cls.id, "Updated class");

    Ok(Json(ContentResponse::new(ClsOut::from(&cls))))
}

/// DELETE /class/:pk/
///
/// Refused while the Class has Students.
#[instrument(skip_all, fields(pk = %pk))]
pub async fn delete_cls(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(pk): Path<String>,
) -> ApiResult<StatusCode> {
    let code = "training_cls_delete_001";
    let mut cls = db::cls::get_live(&state.db, parse_pk(&pk, code)?)
        .await?
        .ok_or(ApiError::NotFound(code))?;

    permissions::cls::delete(&state.db, &caller, &cls).await?;

    db::cls::soft_delete(&state.db, &mut cls).await?;
    info!(cls_id = cls.id, "Deleted class");

    Ok(StatusCode::NO_CONTENT)
}
