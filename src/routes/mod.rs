//! HTTP routes for relief-gateway

pub mod auth_routes;
pub mod donations;
pub mod health;
pub mod respond;
pub mod supplies;

pub use auth_routes::{handle_login, handle_register};
pub use donations::{handle_add as handle_add_donation, handle_by_email as handle_donations_by_email};
pub use health::{health_check, server_status, version_info};
pub use respond::{cors_preflight, error_response, method_not_allowed, not_found};
pub use supplies::{
    handle_create as handle_create_supply, handle_delete as handle_delete_supply,
    handle_get as handle_get_supply, handle_list as handle_list_supplies,
    handle_preview as handle_preview_supplies, handle_update as handle_update_supply,
};
