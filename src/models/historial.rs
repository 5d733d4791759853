// src/models/historial.rs

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

// --- Tipo de operação ---
// Valores conhecidos: "creacion" e "entrada". Qualquer outro é um ajuste,
// mas o valor original é preservado (o CSV exporta ele em maiúsculas).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TipoOperacion {
    Creacion,
    Entrada,
    Ajuste(String),
}

impl TipoOperacion {
    pub fn as_str(&self) -> &str {
        match self {
            TipoOperacion::Creacion => "creacion",
            TipoOperacion::Entrada => "entrada",
            TipoOperacion::Ajuste(raw) => raw,
        }
    }

    /// Rótulo mostrado na tabela
    pub fn label(&self) -> &'static str {
        match self {
            TipoOperacion::Creacion => "Creación",
            TipoOperacion::Entrada => "Entrada",
            TipoOperacion::Ajuste(_) => "Ajuste",
        }
    }
}

impl From<String> for TipoOperacion {
    fn from(value: String) -> Self {
        match value.as_str() {
            "creacion" => TipoOperacion::Creacion,
            "entrada" => TipoOperacion::Entrada,
            _ => TipoOperacion::Ajuste(value),
        }
    }
}

impl From<TipoOperacion> for String {
    fn from(value: TipoOperacion) -> Self {
        match value {
            TipoOperacion::Ajuste(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for TipoOperacion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- MOVIMENTO (uma linha do historial) ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovimientoHistorial {
    #[schema(example = "Tornillo 1/4")]
    pub nombre_producto: String,
    #[schema(example = "TOR-001")]
    pub codigo_producto: String,
    #[schema(value_type = f64, example = 50)]
    pub cantidad: Decimal,
    #[schema(value_type = f64, example = 10)]
    pub stock_anterior: Decimal,
    #[schema(value_type = f64, example = 60)]
    pub stock_nuevo: Decimal,
    #[serde(default)]
    #[schema(value_type = Option<f64>, example = 125.5)]
    pub costo_final: Option<Decimal>,
    pub fecha: DateTime<Utc>,
    #[schema(value_type = String, example = "entrada")]
    pub operacion: TipoOperacion,
}

// Linha crua do banco; `operacion` é TEXT livre.
#[derive(Debug, Clone, FromRow)]
pub struct MovimientoRow {
    pub nombre_producto: String,
    pub codigo_producto: String,
    pub cantidad: Decimal,
    pub stock_anterior: Decimal,
    pub stock_nuevo: Decimal,
    pub costo_final: Option<Decimal>,
    pub fecha: DateTime<Utc>,
    pub operacion: String,
}

impl From<MovimientoRow> for MovimientoHistorial {
    fn from(row: MovimientoRow) -> Self {
        Self {
            nombre_producto: row.nombre_producto,
            codigo_producto: row.codigo_producto,
            cantidad: row.cantidad,
            stock_anterior: row.stock_anterior,
            stock_nuevo: row.stock_nuevo,
            costo_final: row.costo_final,
            fecha: row.fecha,
            operacion: TipoOperacion::from(row.operacion),
        }
    }
}

// ---
// Query string do GET /api/historial
// ---
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct HistorialQuery {
    /// Página (começa em 1)
    pub page: Option<i64>,
    /// Itens por página
    pub limit: Option<i64>,
    /// Busca parcial pelo código do produto
    pub search: Option<String>,
    /// Data inicial (YYYY-MM-DD), inclusive
    #[param(value_type = Option<String>, format = Date)]
    pub start_date: Option<NaiveDate>,
    /// Data final (YYYY-MM-DD), inclusive (o dia inteiro)
    #[param(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,
    /// Tipo de operação (ex: "entrada")
    pub tipo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistorialResponse {
    pub historial: Vec<MovimientoHistorial>,
    pub total: i64,
    pub pagina: i64,
    pub limite: i64,
    pub total_paginas: i64,
}
