use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use activecenter_core::AppError;
use activecenter_models::{CreateSpaceDto, NameQuery, Space, SpaceFilterParams, UpdateSpaceDto};

use crate::extract::{Path, Query};
use crate::multipart::MultipartForm;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::SpaceService;

/// Multipart body of `POST /api/spaces`.
#[derive(ToSchema)]
pub struct SpaceUploadForm {
    pub title: String,
    pub description: Option<String>,
    pub price_hour: f64,
    pub max_people: Option<i32>,
    pub details: Option<String>,
    /// Comma-separated feature tags
    pub characteristics: Option<String>,
    /// jpg, jpeg, png or webp image, at most 1.5 MB
    #[schema(value_type = Option<String>, format = Binary)]
    pub file: Option<Vec<u8>>,
}

fn space_from_form(form: &MultipartForm) -> Result<CreateSpaceDto, AppError> {
    Ok(CreateSpaceDto {
        title: form.required("title")?,
        description: form.text("description").unwrap_or_default().to_string(),
        price_hour: form.parse_required("price_hour")?,
        max_people: form.parse("max_people")?,
        details: form.text("details").map(str::to_string),
        characteristics: form.list("characteristics"),
    })
}

#[utoipa::path(
    get,
    path = "/api/spaces",
    params(SpaceFilterParams),
    responses(
        (status = 200, description = "One page of spaces", body = Vec<Space>)
    ),
    tag = "Spaces"
)]
#[instrument(skip(state))]
pub async fn get_spaces(
    State(state): State<AppState>,
    Query(filters): Query<SpaceFilterParams>,
) -> Result<Json<Vec<Space>>, AppError> {
    let spaces = SpaceService::list_spaces(state.spaces.as_ref(), &filters).await?;
    Ok(Json(spaces))
}

#[utoipa::path(
    get,
    path = "/api/spaces/by-name",
    params(NameQuery),
    responses(
        (status = 200, description = "Space details", body = Space),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No space with this title")
    ),
    tag = "Spaces",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_space_by_name(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> Result<Json<Space>, AppError> {
    let space = SpaceService::get_space_by_name(state.spaces.as_ref(), &query.name).await?;
    Ok(Json(space))
}

#[utoipa::path(
    get,
    path = "/api/spaces/{id}",
    params(
        ("id" = Uuid, Path, description = "Space ID")
    ),
    responses(
        (status = 200, description = "Space details", body = Space),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Space not found")
    ),
    tag = "Spaces",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_space(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Space>, AppError> {
    let space = SpaceService::get_space_by_id(state.spaces.as_ref(), id).await?;
    Ok(Json(space))
}

#[utoipa::path(
    post,
    path = "/api/spaces",
    request_body(content = SpaceUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Space created", body = Space),
        (status = 400, description = "Invalid field, image, or title already taken"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 422, description = "Validation error")
    ),
    tag = "Spaces",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, multipart))]
pub async fn create_space(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Space>), AppError> {
    let mut form = MultipartForm::from_multipart(multipart).await?;
    let dto = space_from_form(&form)?;
    dto.validate()?;

    let space = SpaceService::create_space(
        state.spaces.as_ref(),
        state.files.as_ref(),
        dto,
        form.take_image(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(space)))
}

#[utoipa::path(
    put,
    path = "/api/spaces/{id}",
    params(
        ("id" = Uuid, Path, description = "Space ID")
    ),
    request_body = UpdateSpaceDto,
    responses(
        (status = 200, description = "Updated space", body = Space),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "Space not found")
    ),
    tag = "Spaces",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_space(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateSpaceDto>,
) -> Result<Json<Space>, AppError> {
    let space = SpaceService::update_space(state.spaces.as_ref(), id, dto).await?;
    Ok(Json(space))
}

/// Retire a space, or reinstate it if already retired
#[utoipa::path(
    delete,
    path = "/api/spaces/{id}",
    params(
        ("id" = Uuid, Path, description = "Space ID")
    ),
    responses(
        (status = 200, description = "Space with its new active flag", body = Space),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "Space not found")
    ),
    tag = "Spaces",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn retire_space(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Space>, AppError> {
    let space = SpaceService::retire_space(state.spaces.as_ref(), id).await?;
    Ok(Json(space))
}
