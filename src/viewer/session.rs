// src/viewer/session.rs

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::models::auth::AuthResponse;

// Sessão única: token + expiração, gravada como um arquivo JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sesion {
    pub token: String,
    pub email: String,
    pub expira_em: DateTime<Utc>,
}

impl Sesion {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.token.is_empty() && self.expira_em > now
    }
}

/// Para onde a navegação vai depois de uma ação de sessão.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navegacion {
    /// Volta para a raiz; o estado do visor é descartado
    Raiz,
}

#[derive(Debug, Error)]
pub enum SesionError {
    #[error("erro de E/S no arquivo de sessão: {0}")]
    Io(#[from] std::io::Error),

    #[error("arquivo de sessão corrompido: {0}")]
    Formato(#[from] serde_json::Error),

    #[error("falha ao contatar a API: {0}")]
    Http(#[from] reqwest::Error),

    #[error("login recusado: {0}")]
    Recusado(String),
}

#[derive(Debug, Clone)]
pub struct SesionStore {
    path: PathBuf,
}

impl SesionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Arquivo inexistente = sem sessão.
    pub async fn load(&self) -> Result<Option<Sesion>, SesionError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn save(&self, sesion: &Sesion) -> Result<(), SesionError> {
        let bytes = serde_json::to_vec_pretty(sesion)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }

    /// Sessão válida (existe e não expirou), ou None.
    pub async fn current(&self) -> Result<Option<Sesion>, SesionError> {
        Ok(self.load().await?.filter(|s| s.is_valid_at(Utc::now())))
    }

    pub async fn is_authenticated(&self) -> Result<bool, SesionError> {
        Ok(self.current().await?.is_some())
    }

    /// Remove a sessão inteira (não existe logout parcial).
    pub async fn logout(&self) -> Result<Navegacion, SesionError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => tracing::info!("👋 Sessão encerrada"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        Ok(Navegacion::Raiz)
    }
}

/// POST {api}/auth/login e monta a sessão a partir da resposta.
pub async fn login(
    api_url: &str,
    email: &str,
    password: &str,
    timeout: Duration,
) -> Result<Sesion, SesionError> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    let url = format!("{}/auth/login", api_url.trim_end_matches('/'));
    let email = email.trim().to_lowercase();

    let response = client
        .post(&url)
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body: serde_json::Value = response.json().await.unwrap_or_default();
        let mensaje = body
            .get("error")
            .or_else(|| body.get("message"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| status.to_string());
        return Err(SesionError::Recusado(mensaje));
    }

    let auth: AuthResponse = response.json().await?;
    Ok(Sesion {
        token: auth.token,
        email,
        expira_em: auth.expires_at,
    })
}
