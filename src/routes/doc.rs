use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    domain::{OrderStatus, OrderType, pricing::LineCustomization},
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        dashboard::{AdminDashboard, CustomerDashboard, EmployeeDashboard},
        menu::{CategoryList, CreateMenuItemRequest, MenuItemList, UpdateMenuItemRequest},
        orders::{
            CreateOrderRequest, OrderLineInput, OrderList, OrderWithItems, RateOrderRequest,
            UpdateOrderStatusRequest,
        },
        reservations::{CreateReservationRequest, ReservationList, UpdateReservationStatusRequest},
        users::{SetActiveRequest, UpdateProfileRequest, UpdateRoleRequest, UserList},
    },
    models::{
        Address, Allergen, CustomizationOption, MenuCategory, MenuItem, Occasion, Order, OrderItem,
        PaymentMethod, PaymentStatus, Reservation, ReservationStatus, Role, User,
    },
    response::{ApiResponse, FieldError, Meta, ResponseStatus},
    routes::{auth, dashboard, health, menu, orders, params, reservations, users},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Restaurant API", description = "Menu, orders, reservations and staff tooling"),
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::me,
        menu::list_menu_items,
        menu::list_categories,
        menu::get_menu_item,
        menu::create_menu_item,
        menu::update_menu_item,
        menu::toggle_availability,
        menu::delete_menu_item,
        orders::create_order,
        orders::list_orders,
        orders::list_all_orders,
        orders::get_order,
        orders::update_order_status,
        orders::rate_order,
        reservations::create_reservation,
        reservations::list_my_reservations,
        reservations::list_all_reservations,
        reservations::get_by_code,
        reservations::update_status,
        reservations::cancel_reservation,
        users::list_users,
        users::update_role,
        users::set_active,
        users::update_profile,
        dashboard::admin,
        dashboard::employee,
        dashboard::customer
    ),
    components(
        schemas(
            User,
            Role,
            Address,
            MenuItem,
            MenuCategory,
            Allergen,
            CustomizationOption,
            Order,
            OrderItem,
            OrderStatus,
            OrderType,
            PaymentMethod,
            PaymentStatus,
            LineCustomization,
            Reservation,
            ReservationStatus,
            Occasion,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            CreateMenuItemRequest,
            UpdateMenuItemRequest,
            MenuItemList,
            CategoryList,
            CreateOrderRequest,
            OrderLineInput,
            UpdateOrderStatusRequest,
            RateOrderRequest,
            OrderWithItems,
            OrderList,
            CreateReservationRequest,
            UpdateReservationStatusRequest,
            ReservationList,
            UpdateRoleRequest,
            SetActiveRequest,
            UpdateProfileRequest,
            UserList,
            AdminDashboard,
            EmployeeDashboard,
            CustomerDashboard,
            params::Pagination,
            health::HealthData,
            ResponseStatus,
            FieldError,
            Meta,
            ApiResponse<User>,
            ApiResponse<MenuItem>,
            ApiResponse<MenuItemList>,
            ApiResponse<Order>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>,
            ApiResponse<Reservation>,
            ApiResponse<ReservationList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, login and the current user"),
        (name = "Menu", description = "Menu catalog"),
        (name = "Orders", description = "Order placement and lifecycle"),
        (name = "Reservations", description = "Table reservations"),
        (name = "Users", description = "User administration and profile"),
        (name = "Dashboard", description = "Role specific summaries"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_order_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/orders",
            "/api/orders/admin/all",
            "/api/orders/{id}",
            "/api/orders/{id}/status",
            "/api/orders/{id}/rate",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
