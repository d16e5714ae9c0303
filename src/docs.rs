use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use letsplay_core::{ErrorEnvelope, PaginationParams};
use letsplay_models::{
    CreateProductDto, LoginRequest, LoginResponse, PatchProductDto, Product, RegisterRequest,
    Role, UpdateUserDto, User,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::router::health,
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::products::controller::list_products,
        crate::modules::products::controller::get_product,
        crate::modules::products::controller::create_product,
        crate::modules::products::controller::replace_product,
        crate::modules::products::controller::patch_product,
        crate::modules::products::controller::delete_product,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_me,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
    ),
    components(
        schemas(
            User,
            Role,
            UpdateUserDto,
            Product,
            CreateProductDto,
            PatchProductDto,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            ErrorEnvelope,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness probe"),
        (name = "Authentication", description = "Registration and login"),
        (name = "Products", description = "Product catalogue; reads are public"),
        (name = "Users", description = "Account management")
    ),
    info(
        title = "Let's Play API",
        version = "0.1.0",
        description = "Users and products REST API with JWT authentication and role-based access control.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
