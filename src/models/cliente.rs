// src/models/cliente.rs

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

// --- FORMATOS ---

// Formato: 04121234567
pub static TELEFONO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{11}$").expect("regex de telefone válida"));

// Formato: V123456789
pub static RIF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[VEJG][0-9]{8,9}$").expect("regex de RIF válida"));

// Validação básica de e-mail
pub static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("regex de e-mail válida"));

pub static COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$").expect("regex de cor válida")
});

pub const DEFAULT_COLOR: &str = "#ffffff";

// --- CATEGORIAS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Categoria {
    #[serde(rename = "Alto Riesgo")]
    AltoRiesgo,
    #[serde(rename = "Agente Retención")]
    AgenteRetencion,
}

impl Categoria {
    pub fn as_str(&self) -> &'static str {
        match self {
            Categoria::AltoRiesgo => "Alto Riesgo",
            Categoria::AgenteRetencion => "Agente Retención",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Alto Riesgo" => Some(Categoria::AltoRiesgo),
            "Agente Retención" => Some(Categoria::AgenteRetencion),
            _ => None,
        }
    }
}

fn validate_categorias(values: &Vec<String>) -> Result<(), ValidationError> {
    if let Some(invalid) = values.iter().find(|v| Categoria::parse(v).is_none()) {
        let mut err = ValidationError::new("enum");
        err.add_param("value".into(), invalid);
        err.message = Some("invalid_categoria".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payload de criação/edição
// ---
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientePayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Ferretería El Tornillo")]
    pub nombre: String,

    #[validate(regex(path = *TELEFONO_RE, message = "invalid_phone"))]
    #[schema(example = "04121234567")]
    pub telefono: String,

    #[validate(regex(path = *EMAIL_RE, message = "invalid_email"))]
    #[schema(example = "compras@eltornillo.com")]
    pub email: Option<String>,

    pub direccion: Option<String>,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Libertador")]
    pub municipio: String,

    #[validate(regex(path = *RIF_RE, message = "invalid_rif"))]
    #[schema(example = "J123456789")]
    pub rif: String,

    #[serde(default)]
    #[validate(custom(function = "validate_categorias"))]
    #[schema(example = json!(["Agente Retención"]))]
    pub categorias: Vec<String>,

    #[validate(regex(path = *COLOR_RE, message = "invalid_color"))]
    #[schema(example = "#ffcc00")]
    pub municipio_color: Option<String>,
}

impl ClientePayload {
    /// Aplica as transformações do cadastro (trim, e-mail minúsculo, campos vazios viram None).
    /// Deve rodar ANTES do `validate()`.
    pub fn normalized(mut self) -> Self {
        self.nombre = self.nombre.trim().to_string();
        self.telefono = self.telefono.trim().to_string();
        self.municipio = self.municipio.trim().to_string();
        self.rif = self.rif.trim().to_string();
        self.email = self
            .email
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty());
        self.direccion = self
            .direccion
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        self.municipio_color = self
            .municipio_color
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        // Lista com cara de conjunto: remove repetidas mantendo a ordem
        let mut categorias: Vec<String> = Vec::with_capacity(self.categorias.len());
        for c in self.categorias {
            if !categorias.contains(&c) {
                categorias.push(c);
            }
        }
        self.categorias = categorias;
        self
    }

    pub fn color_or_default(&self) -> &str {
        self.municipio_color.as_deref().unwrap_or(DEFAULT_COLOR)
    }
}

// ---
// Linha do banco (inclui o contador de versão interno)
// ---
#[derive(Debug, Clone, FromRow)]
pub struct ClienteRow {
    pub id: Uuid,
    pub nombre: String,
    pub telefono: String,
    pub email: Option<String>,
    pub direccion: Option<String>,
    pub municipio: String,
    pub rif: String,
    pub categorias: Vec<String>,
    pub municipio_color: String,
    pub fecha_registro: DateTime<Utc>,
    pub version: i32,
}

// ---
// Projeção pública: `id` como string e sem metadados de versão
// ---
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClienteResponse {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: String,
    pub nombre: String,
    pub telefono: String,
    pub email: Option<String>,
    pub direccion: Option<String>,
    pub municipio: String,
    pub rif: String,
    pub categorias: Vec<Categoria>,
    pub municipio_color: String,
    pub fecha_registro: DateTime<Utc>,
}

impl From<ClienteRow> for ClienteResponse {
    fn from(row: ClienteRow) -> Self {
        Self {
            id: row.id.to_string(),
            nombre: row.nombre,
            telefono: row.telefono,
            email: row.email,
            direccion: row.direccion,
            municipio: row.municipio,
            rif: row.rif,
            // O banco só aceita as categorias conhecidas (CHECK), o filtro é só por garantia
            categorias: row.categorias.iter().filter_map(|c| Categoria::parse(c)).collect(),
            municipio_color: row.municipio_color,
            fecha_registro: row.fecha_registro,
        }
    }
}

// --- Filtros da listagem (campos indexados) ---
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ClienteFiltro {
    /// Busca parcial por nome (sem diferenciar maiúsculas)
    pub nombre: Option<String>,
    /// RIF exato
    pub rif: Option<String>,
    /// Município exato (sem diferenciar maiúsculas)
    pub municipio: Option<String>,
}
