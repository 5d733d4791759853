pub mod user_repo;
pub use user_repo::UserRepository;
pub mod cliente_repo;
pub use cliente_repo::ClienteRepository;
pub mod historial_repo;
pub use historial_repo::HistorialRepository;
