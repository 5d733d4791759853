// src/viewer/config.rs

use std::{env, path::PathBuf, time::Duration};

use anyhow::Context;
use chrono::{FixedOffset, Offset, Utc};

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_SESSION_FILE: &str = ".ferreteria_sesion.json";
pub const PAGE_SIZE: usize = 10;
pub const FETCH_LIMIT: u32 = 1_000;
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub api_url: String,
    pub session_file: PathBuf,
    /// Fuso usado para mostrar as datas e para os limites do filtro de datas
    pub utc_offset: FixedOffset,
    pub page_size: usize,
    /// Tamanho da janela pedida à API; a paginação é local
    pub fetch_limit: u32,
    pub debounce: Duration,
    pub request_timeout: Duration,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            utc_offset: Utc.fix(),
            page_size: PAGE_SIZE,
            fetch_limit: FETCH_LIMIT,
            debounce: SEARCH_DEBOUNCE,
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}

impl ViewerConfig {
    /// Lê FERRETERIA_API_URL, FERRETERIA_SESSION_FILE e FERRETERIA_UTC_OFFSET
    /// (ex: "-04:00"). Variáveis ausentes ficam com o padrão.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();
        if let Ok(url) = env::var("FERRETERIA_API_URL") {
            config.api_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(path) = env::var("FERRETERIA_SESSION_FILE") {
            config.session_file = PathBuf::from(path);
        }
        if let Ok(offset) = env::var("FERRETERIA_UTC_OFFSET") {
            config.utc_offset = parse_offset(&offset)
                .with_context(|| format!("FERRETERIA_UTC_OFFSET inválido: {offset}"))?;
        }
        Ok(config)
    }
}

/// Aceita "+HH:MM", "-HH:MM", "Z" ou "UTC".
pub fn parse_offset(raw: &str) -> anyhow::Result<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix());
    }

    let (sign, rest) = match raw.split_at_checked(1) {
        Some(("+", rest)) => (1, rest),
        Some(("-", rest)) => (-1, rest),
        _ => anyhow::bail!("o offset deve começar com + ou -"),
    };
    let (hours, minutes) = rest.split_once(':').unwrap_or((rest, "0"));
    let hours: i32 = hours.parse().context("horas inválidas")?;
    let minutes: i32 = minutes.parse().context("minutos inválidos")?;

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .context("offset fora do intervalo")
}
