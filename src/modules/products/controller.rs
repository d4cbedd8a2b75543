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
use activecenter_models::{
    CreateProductDto, NameQuery, Product, ProductFilterParams, UpdateProductDto,
};

use crate::extract::{Path, Query};
use crate::multipart::MultipartForm;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::ProductService;

/// Multipart body of `POST /api/products`.
#[derive(ToSchema)]
pub struct ProductUploadForm {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price: f64,
    pub stock: Option<i32>,
    /// jpg, jpeg, png or webp image, at most 1.5 MB
    #[schema(value_type = Option<String>, format = Binary)]
    pub file: Option<Vec<u8>>,
}

fn product_from_form(form: &MultipartForm) -> Result<CreateProductDto, AppError> {
    Ok(CreateProductDto {
        name: form.required("name")?,
        description: form.text("description").unwrap_or_default().to_string(),
        category: form.required("category")?,
        price: form.parse_required("price")?,
        stock: form.parse("stock")?.unwrap_or(0),
    })
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductFilterParams),
    responses(
        (status = 200, description = "One page of products", body = Vec<Product>)
    ),
    tag = "Products"
)]
#[instrument(skip(state))]
pub async fn get_products(
    State(state): State<AppState>,
    Query(filters): Query<ProductFilterParams>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = ProductService::list_products(state.products.as_ref(), &filters).await?;
    Ok(Json(products))
}

#[utoipa::path(
    get,
    path = "/api/products/by-name",
    params(NameQuery),
    responses(
        (status = 200, description = "Product details", body = Product),
        (status = 404, description = "No product with this name")
    ),
    tag = "Products"
)]
#[instrument(skip(state))]
pub async fn get_product_by_name(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> Result<Json<Product>, AppError> {
    let product = ProductService::get_product_by_name(state.products.as_ref(), &query.name).await?;
    Ok(Json(product))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product details", body = Product),
        (status = 404, description = "Product not found")
    ),
    tag = "Products"
)]
#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, AppError> {
    let product = ProductService::get_product_by_id(state.products.as_ref(), id).await?;
    Ok(Json(product))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body(content = ProductUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Invalid field or image"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 422, description = "Validation error")
    ),
    tag = "Products",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, multipart))]
pub async fn create_product(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let mut form = MultipartForm::from_multipart(multipart).await?;
    let dto = product_from_form(&form)?;
    dto.validate()?;

    let product = ProductService::create_product(
        state.products.as_ref(),
        state.files.as_ref(),
        dto,
        form.take_image(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateProductDto,
    responses(
        (status = 200, description = "Updated product", body = Product),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "Product not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Products",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateProductDto>,
) -> Result<Json<Product>, AppError> {
    let product = ProductService::update_product(state.ledger.as_ref(), id, dto).await?;
    Ok(Json(product))
}

/// Retire a product, or reinstate it if already retired
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product with its new active flag", body = Product),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "Product not found")
    ),
    tag = "Products",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn retire_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, AppError> {
    let product = ProductService::retire_product(state.ledger.as_ref(), id).await?;
    Ok(Json(product))
}
