pub mod auth_service;
pub mod home_service;

pub use auth_service::AuthService;
pub use home_service::HomeService;
