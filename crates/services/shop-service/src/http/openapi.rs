//! OpenAPI documentation.

use utoipa::OpenApi;

use domain::{
    CreateProduct, CreateUser, PaginatedProducts, PaginatedUsers, Product, StockUpdate,
    UpdateProduct, UpdateUser, User,
};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::http::handlers::health_handler::health_check,
        crate::http::handlers::user_handler::list_users,
        crate::http::handlers::user_handler::create_user,
        crate::http::handlers::user_handler::get_user,
        crate::http::handlers::user_handler::update_user,
        crate::http::handlers::user_handler::delete_user,
        crate::http::handlers::product_handler::list_products,
        crate::http::handlers::product_handler::create_product,
        crate::http::handlers::product_handler::get_product,
        crate::http::handlers::product_handler::update_product,
        crate::http::handlers::product_handler::delete_product,
        crate::http::handlers::product_handler::update_stock,
    ),
    components(
        schemas(
            User,
            CreateUser,
            UpdateUser,
            PaginatedUsers,
            Product,
            CreateProduct,
            UpdateProduct,
            StockUpdate,
            PaginatedProducts,
        )
    ),
    tags(
        (name = "Health", description = "Dependency health"),
        (name = "Users", description = "User management endpoints"),
        (name = "Products", description = "Product catalogue and stock endpoints"),
    )
)]
pub struct ApiDoc;
