//! Student endpoints
//!
//! - `GET /student/`, `POST /student/`
//! - `GET|PUT|PATCH|DELETE /student/:pk/`

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use tracing::{info, instrument};
use training_common::api::{ContentResponse, ListResponse};

use super::{list_response, parse_pk};
use crate::controllers::student::LIST_META;
use crate::controllers::{is_valid, ListController, RawInput, StudentController};
use crate::db;
use crate::directory::Caller;
use crate::error::{ApiError, ApiResult};
use crate::permissions;
use crate::presenters::StudentOut;
use crate::AppState;

/// Build Student routes
pub fn student_routes() -> Router<AppState> {
    Router::new()
        .route("/student/", get(list_student).post(create_student))
        .route(
            "/student/:pk/",
            get(read_student)
                .put(update_student)
                .patch(partial_update_student)
                .delete(delete_student),
        )
}

/// GET /student/
#[instrument(skip_all)]
pub async fn list_student(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Json<ListResponse<StudentOut>>> {
    let controller = ListController::validate(&LIST_META, &params, state.pagination)?;
    let (records, total) =
        db::student::list(&state.db, caller.member_id, &controller.query).await?;

    let content = records.iter().map(StudentOut::from).collect();
    Ok(Json(list_response(content, total, controller)))
}

/// POST /student/
#[instrument(skip_all)]
pub async fn create_student(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    body: Result<Json<RawInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ContentResponse<StudentOut>>)> {
    let Json(data) = body?;

    let mut controller = StudentController::create(&state.db, state.directory.as_ref(), &caller);
    is_valid(&mut controller, &data, false).await?;
    let new = controller.cleaned.into_new()?;

    permissions::student::create(&caller, &new)?;

    let student = db::student::insert(&state.db, &new).await?;
    info!(
        student_id = student.id,
        cls_id = student.cls.id,
        user_id = student.user_id,
        "Created student"
    );

    Ok((
        StatusCode::CREATED,
        Json(ContentResponse::new(StudentOut::from(&student))),
    ))
}

/// GET /student/:pk/
#[instrument(skip_all, fields(pk = %pk))]
pub async fn read_student(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(pk): Path<String>,
) -> ApiResult<Json<ContentResponse<StudentOut>>> {
    let code = "training_student_read_001";
    let student = db::student::get_live(&state.db, parse_pk(&pk, code)?)
        .await?
        .ok_or(ApiError::NotFound(code))?;

    permissions::student::read(&caller, &student)?;

    Ok(Json(ContentResponse::new(StudentOut::from(&student))))
}

/// PUT /student/:pk/
pub async fn update_student(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(pk): Path<String>,
    body: Result<Json<RawInput>, JsonRejection>,
) -> ApiResult<Json<ContentResponse<StudentOut>>> {
    update(state, caller, pk, body, false).await
}

/// PATCH /student/:pk/
pub async fn partial_update_student(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(pk): Path<String>,
    body: Result<Json<RawInput>, JsonRejection>,
) -> ApiResult<Json<ContentResponse<StudentOut>>> {
    update(state, caller, pk, body, true).await
}

/// A Student can only be moved to a Class of the caller's own Member
#[instrument(skip(state, caller, body))]
async fn update(
    state: AppState,
    caller: Caller,
    pk: String,
    body: Result<Json<RawInput>, JsonRejection>,
    partial: bool,
) -> ApiResult<Json<ContentResponse<StudentOut>>> {
    let code = "training_student_update_001";
    let mut student = db::student::get_live(&state.db, parse_pk(&pk, code)?)
        .await?
        .ok_or(ApiError::NotFound(code))?;

    permissions::student::update(&caller, &student)?;
    let Json(data) = body?;

    let mut controller = StudentController::update(&state.db, state.directory.as_ref(), &caller);
    is_valid(&mut controller, &data, partial).await?;
    controller.cleaned.apply(&mut student);

    permissions::student::update(&caller, &student)?;

    db::student::save(&state.db, &mut student).await?;
    info!(student_id = student.id, "Updated student");

    Ok(Json(ContentResponse::new(StudentOut::from(&student))))
}

/// DELETE /student/:pk/
#[instrument(skip_all, fields(pk = %pk))]
pub async fn delete_student(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(pk): Path<String>,
) -> ApiResult<StatusCode> {
    let code = "training_student_delete_001";
    let mut student = db::student::get_live(&state.db, parse_pk(&pk, code)?)
        .await?
        .ok_or(ApiError::NotFound(code))?;

    permissions::student::delete(&caller, &student)?;

    db::student::soft_delete(&state.db, &mut student).await?;
    info!(student_id = student.id, "Deleted student");

    Ok(StatusCode::NO_CONTENT)
}
