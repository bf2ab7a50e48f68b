//! Product handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, patch},
    Router,
};

use common::AppResult;
use domain::{
    CreateProduct, PageRequest, Paginated, PaginatedProducts, PaginationParams, Product,
    StockUpdate, UpdateProduct,
};

use super::parse_id;
use crate::http::extractors::{JsonBody, ValidatedJson};
use crate::http::state::AppState;

/// Create product routes
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/:id/stock", patch(update_stock))
}

#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of products", body = PaginatedProducts),
        (status = 503, description = "Store unavailable")
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Product>>> {
    let page = PageRequest::from(params);
    let products = state.products.list_products(page).await?;
    let total = state.products.count_products().await?;

    Ok(Json(Paginated::new(products, page, total)))
}

#[utoipa::path(
    post,
    path = "/products",
    tag = "Products",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Validation error")
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateProduct>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let product = state.products.create_product(payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, description = "Invalid product ID"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let id = parse_id(&id, "product")?;
    let product = state.products.get_product(id).await?;
    Ok(Json(product))
}

/// Update product fields; a zero price or negative stock is ignored
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 404, description = "Product not found")
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateProduct>,
) -> AppResult<Json<Product>> {
    let id = parse_id(&id, "product")?;
    let product = state.products.update_product(id, payload).await?;
    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id, "product")?;
    state.products.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Take units from stock
#[utoipa::path(
    patch,
    path = "/products/{id}/stock",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    request_body = StockUpdate,
    responses(
        (status = 200, description = "Stock decremented", body = Product),
        (status = 400, description = "Quantity must be positive"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Insufficient stock")
    )
)]
pub async fn update_stock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<StockUpdate>,
) -> AppResult<Json<Product>> {
    let id = parse_id(&id, "product")?;
    let product = state.products.update_stock(id, payload).await?;
    Ok(Json(product))
}
