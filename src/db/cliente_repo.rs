// src/db/cliente_repo.rs

use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination::Page},
    models::cliente::{ClienteFiltro, ClientePayload, ClienteRow},
};

const RIF_UNIQUE_CONSTRAINT: &str = "clientes_rif_key";

#[derive(Clone)]
pub struct ClienteRepository {
    pool: PgPool,
}

impl ClienteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  ESCRITA
    // =========================================================================

    /// Insere um cliente já normalizado e validado.
    pub async fn create<'e, E>(
        &self,
        executor: E,
        payload: &ClientePayload,
    ) -> Result<ClienteRow, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, ClienteRow>(
            r#"
            INSERT INTO clientes (
                nombre, telefono, email, direccion, municipio, rif, categorias, municipio_color
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&payload.nombre)
        .bind(&payload.telefono)
        .bind(payload.email.as_deref())
        .bind(payload.direccion.as_deref())
        .bind(&payload.municipio)
        .bind(&payload.rif)
        .bind(&payload.categorias)
        .bind(payload.color_or_default())
        .fetch_one(executor)
        .await
        .map_err(|e| map_rif_violation(e, &payload.rif))
    }

    /// Substitui todos os campos editáveis e incrementa a versão.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &ClientePayload,
    ) -> Result<Option<ClienteRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, ClienteRow>(
            r#"
            UPDATE clientes SET
                nombre = $2,
                telefono = $3,
                email = $4,
                direccion = $5,
                municipio = $6,
                rif = $7,
                categorias = $8,
                municipio_color = $9,
                version = version + 1
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.nombre)
        .bind(&payload.telefono)
        .bind(payload.email.as_deref())
        .bind(payload.direccion.as_deref())
        .bind(&payload.municipio)
        .bind(&payload.rif)
        .bind(&payload.categorias)
        .bind(payload.color_or_default())
        .fetch_optional(executor)
        .await
        .map_err(|e| map_rif_violation(e, &payload.rif))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM clientes WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ClienteRow>, AppError> {
        let row = sqlx::query_as::<_, ClienteRow>("SELECT * FROM clientes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Listagem paginada com filtros opcionais pelos campos indexados.
    /// Retorna (página, total de documentos que batem com o filtro).
    pub async fn list(
        &self,
        filtro: &ClienteFiltro,
        page: Page,
    ) -> Result<(Vec<ClienteRow>, i64), AppError> {
        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM clientes");
        push_filtros(&mut count_qb, filtro);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM clientes");
        push_filtros(&mut qb, filtro);
        qb.push(" ORDER BY nombre ASC, fecha_registro ASC LIMIT ")
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows = qb
            .build_query_as::<ClienteRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total))
    }
}

fn push_filtros(qb: &mut QueryBuilder<'_, Postgres>, filtro: &ClienteFiltro) {
    let mut separator = " WHERE ";

    if let Some(nombre) = non_blank(&filtro.nombre) {
        qb.push(separator)
            .push("nombre ILIKE ")
            .push_bind(format!("%{}%", escape_like(nombre)));
        separator = " AND ";
    }
    if let Some(rif) = non_blank(&filtro.rif) {
        qb.push(separator).push("rif = ").push_bind(rif.to_uppercase());
        separator = " AND ";
    }
    if let Some(municipio) = non_blank(&filtro.municipio) {
        qb.push(separator)
            .push("municipio ILIKE ")
            .push_bind(escape_like(municipio));
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

// Escapa os curingas do LIKE para que a busca seja literal
pub(crate) fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn map_rif_violation(e: sqlx::Error, rif: &str) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() && db_err.constraint() == Some(RIF_UNIQUE_CONSTRAINT) {
            return AppError::RifAlreadyExists(rif.to_string());
        }
    }
    e.into()
}
