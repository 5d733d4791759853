// src/common/i18n.rs

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

pub const DEFAULT_LANG: &str = "es";

// Catálogos embutidos no binário; a chave é o código do erro.
const CATALOGS: [(&str, &str); 2] = [
    ("es", include_str!("../../locales/es.json")),
    ("en", include_str!("../../locales/en.json")),
];

static SHARED: LazyLock<Arc<I18nStore>> = LazyLock::new(|| {
    Arc::new(I18nStore::load().unwrap_or_else(|e| {
        tracing::error!("🔥 Falha ao carregar catálogos de mensagens: {}", e);
        I18nStore::empty()
    }))
});

#[derive(Debug, Clone, Default)]
pub struct I18nStore {
    catalogs: HashMap<String, HashMap<String, String>>,
}

impl I18nStore {
    pub fn load() -> anyhow::Result<Self> {
        let mut catalogs = HashMap::new();
        for (lang, raw) in CATALOGS {
            let messages: HashMap<String, String> = serde_json::from_str(raw)?;
            catalogs.insert(lang.to_string(), messages);
        }
        Ok(Self { catalogs })
    }

    fn empty() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<I18nStore> {
        SHARED.clone()
    }

    pub fn supports(&self, lang: &str) -> bool {
        self.catalogs.contains_key(lang)
    }

    /// Idioma pedido -> idioma padrão -> a própria chave.
    pub fn translate(&self, lang: &str, key: &str) -> String {
        self.catalogs
            .get(lang)
            .and_then(|messages| messages.get(key))
            .or_else(|| {
                self.catalogs
                    .get(DEFAULT_LANG)
                    .and_then(|messages| messages.get(key))
            })
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}
