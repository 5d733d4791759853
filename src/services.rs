pub mod auth;
pub mod cliente_service;
pub mod historial_service;

pub use auth::AuthService;
pub use cliente_service::ClienteService;
pub use historial_service::HistorialService;
