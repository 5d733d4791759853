// src/viewer/source.rs

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::historial::MovimientoHistorial;

pub const GENERIC_ERROR: &str = "Error al cargar el historial";
pub const TIPO_ENTRADA: &str = "entrada";

// ---
// Parâmetros do GET {api}/historial
// ---
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorialRequest {
    pub page: u32,
    pub limit: u32,
    pub search: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub tipo: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistorialError {
    #[error("falha ao consultar o historial: {}", .mensaje.as_deref().unwrap_or("sem resposta do servidor"))]
    Transporte { mensaje: Option<String> },

    #[error("resposta do historial sem a lista 'historial'")]
    RespuestaInvalida,
}

impl HistorialError {
    /// Mensagem que vai para a tela: a do servidor, ou a genérica.
    pub fn user_message(&self) -> String {
        match self {
            HistorialError::Transporte { mensaje: Some(mensaje) } => mensaje.clone(),
            _ => GENERIC_ERROR.to_string(),
        }
    }
}

/// Uma página de movimentos e o total que o servidor diz ter (se disser).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoteHistorial {
    pub historial: Vec<MovimientoHistorial>,
    pub total: Option<u64>,
}

/// De onde vêm os movimentos. O visor só depende disto.
#[async_trait]
pub trait HistorialSource: Send + Sync + 'static {
    async fn fetch(&self, request: &HistorialRequest) -> Result<LoteHistorial, HistorialError>;
}

/// Valida o formato do corpo: precisa ser um objeto com a lista `historial`.
pub fn parse_historial(body: Value) -> Result<LoteHistorial, HistorialError> {
    let Value::Object(mut obj) = body else {
        return Err(HistorialError::RespuestaInvalida);
    };
    let total = obj.get("total").and_then(Value::as_u64);
    match obj.remove("historial") {
        Some(lista @ Value::Array(_)) => {
            let historial = serde_json::from_value(lista).map_err(|e| {
                tracing::warn!("Movimento com formato inesperado: {}", e);
                HistorialError::RespuestaInvalida
            })?;
            Ok(LoteHistorial { historial, total })
        }
        _ => Err(HistorialError::RespuestaInvalida),
    }
}

// Mensagem de erro vinda do servidor ("message" ou "error")
fn server_message(body: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .find_map(|k| body.get(*k).and_then(Value::as_str))
        .map(str::to_string)
}

// ---
// Cliente HTTP da API
// ---
#[derive(Clone)]
pub struct HttpHistorialClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpHistorialClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }
}

#[async_trait]
impl HistorialSource for HttpHistorialClient {
    async fn fetch(&self, request: &HistorialRequest) -> Result<LoteHistorial, HistorialError> {
        let url = format!("{}/historial", self.base_url);
        tracing::debug!("GET {} {:?}", url, request);

        let mut builder = self.client.get(&url).query(request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!("❌ Falha de rede ao buscar historial: {}", e);
            HistorialError::Transporte { mensaje: None }
        })?;

        let status = response.status();
        let body = response.json::<Value>().await.ok();

        if !status.is_success() {
            let mensaje = body.as_ref().and_then(server_message);
            tracing::error!("❌ Historial respondeu {}: {:?}", status, mensaje);
            return Err(HistorialError::Transporte { mensaje });
        }

        parse_historial(body.ok_or(HistorialError::RespuestaInvalida)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn body_without_historial_list_is_invalid() {
        assert_eq!(parse_historial(json!({ "total": 3 })), Err(HistorialError::RespuestaInvalida));
        assert_eq!(parse_historial(json!({ "historial": "x" })), Err(HistorialError::RespuestaInvalida));
        assert_eq!(parse_historial(json!([])), Err(HistorialError::RespuestaInvalida));
        assert_eq!(parse_historial(json!({ "historial": [] })), Ok(LoteHistorial::default()));
    }

    #[test]
    fn total_is_kept_when_the_server_sends_it() {
        let lote = parse_historial(json!({ "historial": [], "total": 1500 })).unwrap();
        assert_eq!(lote.total, Some(1500));
    }

    #[test]
    fn malformed_item_invalidates_the_whole_response() {
        let body = json!({ "historial": [{ "codigoProducto": "A" }] });
        assert_eq!(parse_historial(body), Err(HistorialError::RespuestaInvalida));
    }

    #[test]
    fn user_message_prefers_server_text() {
        let err = HistorialError::Transporte { mensaje: Some("Token inválido".into()) };
        assert_eq!(err.user_message(), "Token inválido");
        assert_eq!(HistorialError::Transporte { mensaje: None }.user_message(), GENERIC_ERROR);
        assert_eq!(HistorialError::RespuestaInvalida.user_message(), GENERIC_ERROR);
    }

    #[test]
    fn server_message_reads_message_then_error() {
        assert_eq!(server_message(&json!({ "message": "a", "error": "b" })).as_deref(), Some("a"));
        assert_eq!(server_message(&json!({ "error": "b" })).as_deref(), Some("b"));
        assert_eq!(server_message(&json!({ "details": {} })), None);
    }
}
