//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, health, loans, resources};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ludotheca API",
        version = "1.0.0",
        description = "Library & Board Game Lending System REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::profile,
        auth::update_profile,
        // Resources
        resources::list_resources,
        resources::get_resource,
        resources::create_resource,
        resources::enable_resource,
        resources::disable_resource,
        resources::fill_resources,
        // Loans
        loans::create_loan,
        loans::list_loans,
        loans::return_loan,
    ),
    components(
        schemas(
            // Auth
            auth::RegisterResponse,
            auth::LoginResponse,
            crate::models::user::User,
            crate::models::user::RegisterRequest,
            crate::models::user::LoginRequest,
            crate::models::user::UpdateProfile,
            // Resources
            resources::FillResponse,
            crate::models::resource::Resource,
            crate::models::resource::CreateResource,
            crate::models::resource::ResourceKind,
            crate::models::resource::ResourceStatus,
            // Loans
            crate::models::loan::Loan,
            crate::models::loan::CreateLoan,
            crate::models::loan::BorrowType,
            crate::models::loan::LoanStatus,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication and profile endpoints"),
        (name = "resources", description = "Catalog resource management"),
        (name = "loans", description = "Loan management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
