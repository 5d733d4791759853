// src/services/historial_service.rs

use validator::{ValidationError, ValidationErrors};

use crate::{
    common::{
        error::AppError,
        pagination::{total_pages, PageParams},
    },
    db::{historial_repo::FiltroHistorial, HistorialRepository},
    models::historial::{HistorialQuery, HistorialResponse, MovimientoHistorial},
};

// O visor pede uma janela grande de uma vez e pagina localmente
pub const HISTORIAL_MAX_LIMIT: i64 = 1_000;

#[derive(Clone)]
pub struct HistorialService {
    repo: HistorialRepository,
}

impl HistorialService {
    pub fn new(repo: HistorialRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self, query: &HistorialQuery) -> Result<HistorialResponse, AppError> {
        let filtro = resolve_filtro(query)?;
        let page = PageParams { page: query.page, limit: query.limit }
            .resolve_with_max(HISTORIAL_MAX_LIMIT);

        let (rows, total) = self.repo.list(&filtro, page).await?;
        tracing::debug!(
            "Historial: {} de {} movimentos (página {})",
            rows.len(),
            total,
            page.page
        );

        Ok(HistorialResponse {
            historial: rows.into_iter().map(MovimientoHistorial::from).collect(),
            total,
            pagina: page.page,
            limite: page.limit,
            total_paginas: total_pages(total, page.limit),
        })
    }
}

fn resolve_filtro(query: &HistorialQuery) -> Result<FiltroHistorial, AppError> {
    if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
        if start > end {
            let mut errors = ValidationErrors::new();
            let mut err = ValidationError::new("range");
            err.message = Some("invalid_date_range".into());
            errors.add("startDate", err);
            return Err(AppError::ValidationError(errors));
        }
    }

    let non_blank = |v: &Option<String>| {
        v.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    Ok(FiltroHistorial {
        search: non_blank(&query.search),
        start_date: query.start_date,
        end_date: query.end_date,
        tipo: non_blank(&query.tipo),
    })
}
