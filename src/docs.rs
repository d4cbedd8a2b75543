use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use activecenter_auth::{Role, UserStatus};
use activecenter_core::PaginationParams;
use activecenter_models::{
    BanStatusResponse, CreateOrderDto, CreateProductDto, CreateSpaceDto, LoginRequest,
    CreateReservationDto, LoginResponse, Order, OrderItem, OrderLineDto, OrderStatus, Product,
    RegisterRequest, Reservation, ReservationStatus, RoleResponse, Space, UpdateProductDto,
    UpdateProfileDto, UpdateSpaceDto, UserResponse,
};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::products::controller::ProductUploadForm;
use crate::modules::spaces::controller::SpaceUploadForm;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::get_me,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_profile,
        crate::modules::users::controller::toggle_ban,
        crate::modules::users::controller::toggle_admin,
        crate::modules::products::controller::get_products,
        crate::modules::products::controller::get_product_by_name,
        crate::modules::products::controller::get_product,
        crate::modules::products::controller::create_product,
        crate::modules::products::controller::update_product,
        crate::modules::products::controller::retire_product,
        crate::modules::spaces::controller::get_spaces,
        crate::modules::spaces::controller::get_space_by_name,
        crate::modules::spaces::controller::get_space,
        crate::modules::spaces::controller::create_space,
        crate::modules::spaces::controller::update_space,
        crate::modules::spaces::controller::retire_space,
        crate::modules::orders::controller::create_order,
        crate::modules::orders::controller::get_orders,
        crate::modules::orders::controller::get_order,
        crate::modules::orders::controller::cancel_order,
        crate::modules::reservations::controller::create_reservation,
        crate::modules::reservations::controller::get_reservations,
        crate::modules::reservations::controller::get_my_reservations,
        crate::modules::reservations::controller::get_reservation,
        crate::modules::reservations::controller::cancel_reservation,
    ),
    components(
        schemas(
            Role,
            UserStatus,
            UserResponse,
            BanStatusResponse,
            RoleResponse,
            UpdateProfileDto,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            Product,
            CreateProductDto,
            UpdateProductDto,
            ProductUploadForm,
            Space,
            CreateSpaceDto,
            UpdateSpaceDto,
            SpaceUploadForm,
            Order,
            OrderItem,
            OrderStatus,
            OrderLineDto,
            CreateOrderDto,
            Reservation,
            ReservationStatus,
            CreateReservationDto,
            PaginationParams,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and the current user"),
        (name = "Users", description = "Member administration and profiles"),
        (name = "Products", description = "Club shop catalogue"),
        (name = "Spaces", description = "Bookable club facilities"),
        (name = "Orders", description = "Club shop orders"),
        (name = "Reservations", description = "Space bookings")
    ),
    info(
        title = "Active Center API",
        version = "0.1.0",
        description = "REST API for a sports club: members, shop products, facilities, orders and bookings.",
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
