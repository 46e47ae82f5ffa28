use utoipa::OpenApi;

use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HomeBite",
        description = "Marketplace API connecting home cooks with customers"
    ),
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::cooks::register_cook,
        handlers::cooks::list_cooks,
        handlers::cooks::nearby_cooks,
        handlers::cooks::cooks_by_pincode,
        handlers::cooks::get_cook,
        handlers::cooks::update_cook,
        handlers::cooks::payment_details,
        handlers::cooks::cook_analytics,
        handlers::meals::create_meal,
        handlers::meals::list_meals,
        handlers::meals::get_meal,
        handlers::meals::update_stock,
        handlers::orders::create_order,
        handlers::orders::create_batch,
        handlers::orders::get_order,
        handlers::orders::orders_by_user,
        handlers::orders::orders_by_cook,
        handlers::orders::update_status,
        handlers::orders::rate_order,
        handlers::checkout::preview,
        handlers::checkout::place,
    ),
    components(schemas(handlers::ErrorResponse)),
    tags(
        (name = "auth", description = "Customer accounts"),
        (name = "cooks", description = "Cook profiles, discovery and dashboards"),
        (name = "meals", description = "Meal listings"),
        (name = "orders", description = "Order placement and lifecycle"),
        (name = "checkout", description = "Multi-cook cart checkout"),
    )
)]
pub struct ApiDoc;
