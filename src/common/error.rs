// src/common/error.rs

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// Nosso tipo de erro interno. Os serviços e repositórios só conhecem ele.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("RIF já cadastrado: {0}")]
    RifAlreadyExists(String),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Cliente não encontrado")]
    ClienteNotFound,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// O erro que sai pela API, já traduzido para o idioma do cliente.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self { status, error: error.into(), details: None }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

impl AppError {
    /// Converte o erro interno em uma resposta localizada.
    /// As mensagens do `validator` são códigos (ex: "invalid_rif") e passam pelo catálogo.
    pub fn to_api_error(self, locale: &Locale, store: &I18nStore) -> ApiError {
        let lang = locale.0.as_str();

        match self {
            AppError::ValidationError(errors) => {
                let details = validation_details(&errors, lang, store);
                ApiError {
                    status: StatusCode::BAD_REQUEST,
                    error: store.translate(lang, "validation_failed"),
                    details: Some(details),
                }
            }
            AppError::RifAlreadyExists(rif) => {
                let message = store.translate(lang, "rif_already_exists");
                ApiError {
                    status: StatusCode::CONFLICT,
                    error: message.clone(),
                    details: Some(json!({ "rif": [format!("{} ({})", message, rif)] })),
                }
            }
            AppError::EmailAlreadyExists => {
                ApiError::new(StatusCode::CONFLICT, store.translate(lang, "email_already_exists"))
            }
            AppError::InvalidCredentials => {
                ApiError::new(StatusCode::UNAUTHORIZED, store.translate(lang, "invalid_credentials"))
            }
            AppError::InvalidToken => {
                ApiError::new(StatusCode::UNAUTHORIZED, store.translate(lang, "invalid_token"))
            }
            AppError::ClienteNotFound => {
                ApiError::new(StatusCode::NOT_FOUND, store.translate(lang, "cliente_not_found"))
            }

            // Todos os outros erros (DatabaseError, InternalServerError...) viram 500.
            // O detalhe fica só no log.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, store.translate(lang, "internal_error"))
            }
        }
    }
}

fn validation_details(
    errors: &validator::ValidationErrors,
    lang: &str,
    store: &I18nStore,
) -> Value {
    let mut details: HashMap<String, Vec<String>> = HashMap::new();
    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                let code = e.message.as_deref().unwrap_or(e.code.as_ref());
                store.translate(lang, code)
            })
            .collect();
        details.insert(wire_name(&field), messages);
    }
    json!(details)
}

// Os payloads usam `rename_all = "camelCase"`: o detalhe cita o campo como veio no JSON
fn wire_name(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

// Usado quando não temos o idioma em mãos (ex: rejeições de middleware).
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default(), &I18nStore::shared())
            .into_response()
    }
}
