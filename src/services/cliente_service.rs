// src/services/cliente_service.rs

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        pagination::{PageParams, Paginated},
    },
    db::ClienteRepository,
    models::cliente::{ClienteFiltro, ClientePayload, ClienteResponse},
};

#[derive(Clone)]
pub struct ClienteService {
    repo: ClienteRepository,
    pool: PgPool,
}

impl ClienteService {
    pub fn new(repo: ClienteRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    /// Normaliza e valida o payload. Os erros nomeiam o campo e a regra.
    pub fn prepare(payload: ClientePayload) -> Result<ClientePayload, AppError> {
        let payload = payload.normalized();
        payload.validate()?;
        Ok(payload)
    }

    pub async fn create(&self, payload: ClientePayload) -> Result<ClienteResponse, AppError> {
        let payload = Self::prepare(payload)?;
        let row = self.repo.create(&self.pool, &payload).await?;

        tracing::info!("🧾 Cliente {} criado (RIF {})", row.id, row.rif);
        Ok(row.into())
    }

    pub async fn update(&self, id: Uuid, payload: ClientePayload) -> Result<ClienteResponse, AppError> {
        let payload = Self::prepare(payload)?;
        let row = self.repo
            .update(&self.pool, id, &payload)
            .await?
            .ok_or(AppError::ClienteNotFound)?;

        tracing::info!("✏️ Cliente {} atualizado (versão {})", row.id, row.version);
        Ok(row.into())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(&self.pool, id).await? {
            return Err(AppError::ClienteNotFound);
        }
        tracing::info!("🗑️ Cliente {} removido", id);
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<ClienteResponse, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .map(ClienteResponse::from)
            .ok_or(AppError::ClienteNotFound)
    }

    pub async fn list(
        &self,
        filtro: &ClienteFiltro,
        params: &PageParams,
    ) -> Result<Paginated<ClienteResponse>, AppError> {
        let page = params.resolve();
        let (rows, total) = self.repo.list(filtro, page).await?;
        Ok(Paginated::new(rows, total, page).map(ClienteResponse::from))
    }
}
