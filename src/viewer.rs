// src/viewer.rs

// Visor do historial de entradas de estoque.
//
// Fluxo: texto de busca (debounce) -> fetch na API -> linhas normalizadas
// -> filtro -> ordenação -> fatia da página -> render. O CSV exporta o
// conjunto filtrado inteiro.

pub mod config;
pub mod debounce;
pub mod export;
pub mod pipeline;
pub mod render;
pub mod session;
pub mod source;
pub mod view;

pub use config::ViewerConfig;
pub use debounce::Debouncer;
pub use pipeline::{FilaHistorial, PaginaVista, RangoFechas, SortConfig, SortDirection, SortKey};
pub use session::{Navegacion, Sesion, SesionStore};
pub use source::{HistorialError, HistorialRequest, HistorialSource, HttpHistorialClient, LoteHistorial};
pub use view::{EstadoRender, ExportBloqueado, HistorialView};
