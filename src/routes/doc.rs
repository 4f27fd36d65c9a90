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
    analytics::{AnalyticsSummary, DailyPoint, ProductPerformance, RankedProduct, TimeRange, WindowTotals},
    cart::{Cart, CartItem},
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        cart::{QuoteRequest, QuoteResponse},
        orders::{CreateOrderRequest, CreateOrderResponse, OrderItemInput, OrderList, UpdateOrderStatusRequest},
        products::{CreateProductRequest, ProductList, UpdateProductRequest},
        settings::{SaveBankDetailsRequest, SaveContactDetailsRequest},
    },
    models::{Admin, BankDetails, ContactDetails, Order, OrderItem, OrderStatus, Product},
    pricing::Quote,
    response::{ApiResponse, Meta},
    routes::{admin, auth, cart, health, orders, products as product_routes, settings},
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
    paths(
        health::health_check,
        auth::login,
        auth::register,
        cart::quote_cart,
        product_routes::list_products,
        product_routes::get_product,
        product_routes::create_product,
        product_routes::update_product,
        product_routes::delete_product,
        orders::create_order,
        orders::track_order,
        admin::list_orders,
        admin::get_order,
        admin::update_order_status,
        admin::analytics_summary,
        settings::get_bank_details,
        settings::save_bank_details,
        settings::delete_bank_details,
        settings::get_contact_details,
        settings::save_contact_details,
        settings::delete_contact_details
    ),
    components(
        schemas(
            Admin,
            Product,
            Order,
            OrderItem,
            OrderStatus,
            BankDetails,
            ContactDetails,
            Cart,
            CartItem,
            Quote,
            QuoteRequest,
            QuoteResponse,
            CreateOrderRequest,
            CreateOrderResponse,
            OrderItemInput,
            OrderList,
            UpdateOrderStatusRequest,
            CreateProductRequest,
            UpdateProductRequest,
            ProductList,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            SaveBankDetailsRequest,
            SaveContactDetailsRequest,
            TimeRange,
            AnalyticsSummary,
            WindowTotals,
            DailyPoint,
            ProductPerformance,
            RankedProduct,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<QuoteResponse>,
            ApiResponse<AnalyticsSummary>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Product catalogue endpoints"),
        (name = "Cart", description = "Cart pricing endpoints"),
        (name = "Orders", description = "Storefront order endpoints"),
        (name = "Admin", description = "Admin order and analytics endpoints"),
        (name = "Settings", description = "Bank and contact details endpoints"),
        (name = "Auth", description = "Admin authentication endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
