// src/db/historial_repo.rs

use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    common::{error::AppError, pagination::Page},
    db::cliente_repo::escape_like,
    models::historial::MovimientoRow,
};

// Filtro já resolvido pelo serviço
#[derive(Debug, Clone, Default)]
pub struct FiltroHistorial {
    pub search: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub tipo: Option<String>,
}

#[derive(Clone)]
pub struct HistorialRepository {
    pool: PgPool,
}

impl HistorialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Página de movimentos, do mais recente para o mais antigo.
    pub async fn list(
        &self,
        filtro: &FiltroHistorial,
        page: Page,
    ) -> Result<(Vec<MovimientoRow>, i64), AppError> {
        let mut count_qb =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM historial_movimientos");
        push_filtros(&mut count_qb, filtro);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut qb = QueryBuilder::<Postgres>::new(
            r#"SELECT nombre_producto, codigo_producto, cantidad, stock_anterior,
                      stock_nuevo, costo_final, fecha, operacion
               FROM historial_movimientos"#,
        );
        push_filtros(&mut qb, filtro);
        qb.push(" ORDER BY fecha DESC, codigo_producto ASC LIMIT ")
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows = qb
            .build_query_as::<MovimientoRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total))
    }
}

fn push_filtros(qb: &mut QueryBuilder<'_, Postgres>, filtro: &FiltroHistorial) {
    let mut separator = " WHERE ";

    if let Some(search) = filtro.search.as_deref() {
        qb.push(separator)
            .push("codigo_producto ILIKE ")
            .push_bind(format!("%{}%", escape_like(search)));
        separator = " AND ";
    }
    if let Some(start) = filtro.start_date {
        qb.push(separator).push("fecha >= ").push_bind(start).push("::date");
        separator = " AND ";
    }
    if let Some(end) = filtro.end_date {
        // Dia final inteiro: < (fim + 1 dia)
        qb.push(separator)
            .push("fecha < (")
            .push_bind(end)
            .push("::date + INTERVAL '1 day')");
        separator = " AND ";
    }
    if let Some(tipo) = filtro.tipo.as_deref() {
        qb.push(separator).push("operacion = ").push_bind(tipo.to_string());
    }
}
