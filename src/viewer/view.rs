// src/viewer/view.rs

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, MutexGuard,
};

use thiserror::Error;
use tokio::sync::watch;

use super::{
    config::ViewerConfig,
    debounce::Debouncer,
    export,
    pipeline::{procesar, FilaHistorial, PaginaVista, RangoFechas, SortConfig, SortKey},
    source::{HistorialError, HistorialRequest, HistorialSource, TIPO_ENTRADA},
};
use crate::models::historial::MovimientoHistorial;

pub const SIN_RESULTADOS: &str = "No se encontraron resultados";
pub const SIN_REGISTROS: &str = "No hay registros disponibles";

// ---
// O que a tela deve mostrar agora
// ---
#[derive(Debug, Clone, PartialEq)]
pub enum EstadoRender {
    Cargando,
    Error(String),
    Vacio(&'static str),
    Tabla { pagina: PaginaVista, resumen: String },
}

/// Por que não dá para exportar agora.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportBloqueado {
    #[error("o historial ainda está carregando")]
    Cargando,

    #[error("{0}")]
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Carga {
    Cargando,
    Lista,
    Error(HistorialError),
}

#[derive(Debug, Clone)]
struct Estado {
    /// Texto digitado (ainda sem debounce)
    search_text: String,
    /// Termo efetivo, usado no fetch e no filtro
    search: String,
    rango: RangoFechas,
    sort: SortConfig,
    pagina: usize,
    filas: Vec<FilaHistorial>,
    carga: Carga,
}

impl Default for Estado {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            search: String::new(),
            rango: RangoFechas::default(),
            sort: SortConfig::default(),
            pagina: 1,
            filas: Vec::new(),
            carga: Carga::Cargando,
        }
    }
}

struct Inner<S> {
    source: S,
    config: ViewerConfig,
    estado: Mutex<Estado>,
    /// Última requisição emitida; respostas com outro número são descartadas
    secuencia: AtomicU64,
    revision: watch::Sender<u64>,
}

impl<S: HistorialSource> Inner<S> {
    fn estado(&self) -> MutexGuard<'_, Estado> {
        self.estado.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn bump(&self) {
        self.revision.send_modify(|r| *r += 1);
    }

    fn is_current(&self, seq: u64) -> bool {
        self.secuencia.load(Ordering::SeqCst) == seq
    }

    // O servidor corta os dias no fuso dele; pedimos um dia a mais de cada
    // lado e o filtro local (no fuso do visor) decide.
    fn request_for(&self, estado: &Estado) -> HistorialRequest {
        HistorialRequest {
            page: 1,
            limit: self.config.fetch_limit,
            search: estado.search.clone(),
            start_date: estado.rango.start.and_then(|d| d.pred_opt()),
            end_date: estado.rango.end.and_then(|d| d.succ_opt()),
            tipo: TIPO_ENTRADA.to_string(),
        }
    }

    /// Busca página após página até esgotar o total do servidor.
    /// Para cedo (None) se uma requisição mais nova já foi emitida.
    async fn fetch_todo(
        &self,
        mut request: HistorialRequest,
        seq: u64,
    ) -> Option<Result<Vec<MovimientoHistorial>, HistorialError>> {
        let mut movimientos = Vec::new();
        loop {
            let lote = match self.source.fetch(&request).await {
                Ok(lote) => lote,
                Err(e) => return Some(Err(e)),
            };
            if !self.is_current(seq) {
                return None;
            }

            let recebidos = lote.historial.len();
            movimientos.extend(lote.historial);
            let esgotado = recebidos == 0
                || recebidos < request.limit as usize
                || lote.total.is_some_and(|t| movimientos.len() as u64 >= t);
            if esgotado {
                if let Some(total) = lote.total.filter(|t| (movimientos.len() as u64) < *t) {
                    tracing::warn!(
                        "⚠️ Servidor anunciou {} movimentos, vieram {}",
                        total,
                        movimientos.len()
                    );
                }
                return Some(Ok(movimientos));
            }
            request.page += 1;
        }
    }

    async fn refresh(&self) {
        let seq = self.secuencia.fetch_add(1, Ordering::SeqCst) + 1;
        let (request, anterior) = {
            let mut estado = self.estado();
            let anterior = std::mem::replace(&mut estado.carga, Carga::Cargando);
            (self.request_for(&estado), anterior)
        };
        self.bump();

        let mut guarda = RestauraCarga { inner: self, seq, anterior: Some(anterior) };
        let result = self.fetch_todo(request, seq).await;
        guarda.anterior = None;

        let Some(result) = result else {
            tracing::debug!("Resposta {} descartada (obsoleta)", seq);
            return;
        };
        {
            let mut estado = self.estado();
            if !self.is_current(seq) {
                tracing::debug!("Resposta {} descartada (obsoleta)", seq);
                return;
            }
            match result {
                Ok(movimientos) => {
                    tracing::debug!("Historial carregado: {} movimentos", movimientos.len());
                    let offset = self.config.utc_offset;
                    estado.filas = movimientos
                        .into_iter()
                        .map(|m| FilaHistorial::normalize(m, offset))
                        .collect();
                    estado.carga = Carga::Lista;
                }
                Err(e) => {
                    tracing::error!("❌ Erro ao carregar historial: {}", e);
                    estado.filas.clear();
                    estado.carga = Carga::Error(e);
                }
            }
        }
        self.bump();
    }
}

// Se o refresh for abortado no meio do fetch, a carga volta ao que era
struct RestauraCarga<'a, S: HistorialSource> {
    inner: &'a Inner<S>,
    seq: u64,
    anterior: Option<Carga>,
}

impl<S: HistorialSource> Drop for RestauraCarga<'_, S> {
    fn drop(&mut self) {
        let Some(anterior) = self.anterior.take() else {
            return;
        };
        if self.inner.is_current(self.seq) {
            self.inner.estado().carga = anterior;
            self.inner.bump();
        }
    }
}

// ---
// Controlador do visor
// ---
pub struct HistorialView<S> {
    inner: Arc<Inner<S>>,
    debouncer: Debouncer,
}

impl<S: HistorialSource> HistorialView<S> {
    pub fn new(source: S, config: ViewerConfig) -> Self {
        let (revision, _) = watch::channel(0);
        let debouncer = Debouncer::new(config.debounce);
        Self {
            inner: Arc::new(Inner {
                source,
                config,
                estado: Mutex::new(Estado::default()),
                secuencia: AtomicU64::new(0),
                revision,
            }),
            debouncer,
        }
    }

    /// Recebe um valor novo a cada mudança de estado.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    pub async fn refresh(&self) {
        self.inner.refresh().await;
    }

    /// Cada tecla reinicia o debounce; quando dispara, volta para a
    /// página 1 e busca de novo.
    pub fn set_search_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.inner.estado().search_text = text.clone();
        self.inner.bump();

        let inner = self.inner.clone();
        self.debouncer.schedule(async move {
            {
                let mut estado = inner.estado();
                estado.search = text;
                estado.pagina = 1;
            }
            inner.refresh().await;
        });
    }

    /// Aplica busca e intervalo na hora, sem debounce (modo não interativo).
    pub async fn apply_filters(&self, search: impl Into<String>, rango: RangoFechas) {
        self.debouncer.cancel();
        {
            let mut estado = self.inner.estado();
            let search = search.into();
            estado.search_text = search.clone();
            estado.search = search;
            estado.rango = rango;
            estado.pagina = 1;
        }
        self.inner.refresh().await;
    }

    pub async fn set_date_range(&self, rango: RangoFechas) {
        {
            let mut estado = self.inner.estado();
            estado.rango = rango;
            estado.pagina = 1;
        }
        self.inner.refresh().await;
    }

    pub async fn clear_date_range(&self) {
        self.set_date_range(RangoFechas::default()).await;
    }

    /// Reordena localmente, sem nova busca.
    pub fn request_sort(&self, key: SortKey) -> SortConfig {
        let sort = {
            let mut estado = self.inner.estado();
            estado.sort = estado.sort.request(key);
            estado.sort
        };
        self.inner.bump();
        sort
    }

    pub fn set_sort(&self, sort: SortConfig) {
        self.inner.estado().sort = sort;
        self.inner.bump();
    }

    pub fn set_page(&self, pagina: usize) {
        self.inner.estado().pagina = pagina.max(1);
        self.inner.bump();
    }

    pub fn sort(&self) -> SortConfig {
        self.inner.estado().sort
    }

    pub fn search_text(&self) -> String {
        self.inner.estado().search_text.clone()
    }

    pub fn date_range(&self) -> RangoFechas {
        self.inner.estado().rango
    }

    /// Conjunto filtrado e ordenado inteiro (não só a página).
    pub fn filtradas(&self) -> Vec<FilaHistorial> {
        let estado = self.inner.estado();
        procesar(&estado.filas, &estado.search, &estado.rango, &estado.sort)
    }

    pub fn snapshot(&self) -> EstadoRender {
        let estado = self.inner.estado();
        match &estado.carga {
            Carga::Cargando => return EstadoRender::Cargando,
            Carga::Error(e) => return EstadoRender::Error(e.user_message()),
            Carga::Lista => {}
        }

        let filtradas = procesar(&estado.filas, &estado.search, &estado.rango, &estado.sort);
        if filtradas.is_empty() {
            let filtro_ativo = !estado.search_text.is_empty() || estado.rango.is_active();
            return EstadoRender::Vacio(if filtro_ativo { SIN_RESULTADOS } else { SIN_REGISTROS });
        }

        let pagina = PaginaVista::slice(&filtradas, estado.pagina, self.inner.config.page_size);
        let resumen = pagina.resumen();
        EstadoRender::Tabla { pagina, resumen }
    }

    /// O mesmo que `filtradas`, mas só com a lista carregada: em erro ou
    /// carregando não há conjunto confiável para exportar.
    pub fn exportables(&self) -> Result<Vec<FilaHistorial>, ExportBloqueado> {
        let estado = self.inner.estado();
        match &estado.carga {
            Carga::Cargando => Err(ExportBloqueado::Cargando),
            Carga::Error(e) => Err(ExportBloqueado::Error(e.user_message())),
            Carga::Lista => Ok(procesar(&estado.filas, &estado.search, &estado.rango, &estado.sort)),
        }
    }

    pub fn export_csv(&self) -> Result<String, ExportBloqueado> {
        Ok(export::to_csv(&self.exportables()?))
    }

    /// Encerra o visor: cancela o debounce pendente (mesmo com o fetch já em
    /// andamento) e nada mais dispara depois disto. Uma busca abortada no meio
    /// devolve a carga ao estado anterior.
    pub fn teardown(&self) {
        self.debouncer.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewer::pipeline::tests::movimiento;
    use crate::viewer::source::LoteHistorial;
    use async_trait::async_trait;
    use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
    use std::{collections::VecDeque, time::Duration};

    type Respuesta = (Duration, Result<LoteHistorial, HistorialError>);

    // Fonte falsa: cada chamada consome a próxima resposta (com atraso opcional)
    #[derive(Default)]
    struct FakeSource {
        respuestas: Mutex<VecDeque<Respuesta>>,
        pedidos: Mutex<Vec<HistorialRequest>>,
    }

    impl FakeSource {
        // Respostas sem total (uma página só)
        fn with(respuestas: Vec<(u64, Result<Vec<MovimientoHistorial>, HistorialError>)>) -> Self {
            Self::with_lotes(
                respuestas
                    .into_iter()
                    .map(|(ms, r)| (ms, r.map(|historial| LoteHistorial { historial, total: None })))
                    .collect(),
            )
        }

        fn with_lotes(respuestas: Vec<(u64, Result<LoteHistorial, HistorialError>)>) -> Self {
            Self {
                respuestas: Mutex::new(
                    respuestas
                        .into_iter()
                        .map(|(ms, r)| (Duration::from_millis(ms), r))
                        .collect(),
                ),
                pedidos: Mutex::default(),
            }
        }
    }

    #[async_trait]
    impl HistorialSource for FakeSource {
        async fn fetch(&self, request: &HistorialRequest) -> Result<LoteHistorial, HistorialError> {
            self.pedidos.lock().unwrap().push(request.clone());
            let siguiente = self.respuestas.lock().unwrap().pop_front();
            let (delay, result) = siguiente.unwrap_or((Duration::ZERO, Ok(LoteHistorial::default())));
            tokio::time::sleep(delay).await;
            result
        }
    }

    impl<S: HistorialSource> HistorialView<S> {
        fn source(&self) -> &S {
            &self.inner.source
        }
    }

    fn veinticinco() -> Vec<MovimientoHistorial> {
        (1..=25)
            .map(|i| movimiento(&format!("P-{i:02}"), 2024, 1, i))
            .collect()
    }

    fn tabla(estado: EstadoRender) -> PaginaVista {
        match estado {
            EstadoRender::Tabla { pagina, .. } => pagina,
            other => panic!("esperava tabla, veio {:?}", other),
        }
    }

    #[tokio::test]
    async fn starts_loading_then_shows_newest_first() {
        let view = HistorialView::new(FakeSource::with(vec![(0, Ok(veinticinco()))]), ViewerConfig::default());
        assert_eq!(view.snapshot(), EstadoRender::Cargando);

        view.refresh().await;
        let pagina = tabla(view.snapshot());
        assert_eq!(pagina.filas[0].movimiento.codigo_producto, "P-25");
        assert_eq!(pagina.total_paginas, 3);

        let pedido = view.source().pedidos.lock().unwrap()[0].clone();
        assert_eq!(pedido.tipo, "entrada");
        assert_eq!(pedido.page, 1);
        assert_eq!(pedido.search, "");
    }

    #[tokio::test]
    async fn second_page_and_summary() {
        let view = HistorialView::new(FakeSource::with(vec![(0, Ok(veinticinco()))]), ViewerConfig::default());
        view.refresh().await;
        view.request_sort(SortKey::CodigoProducto);
        view.set_page(2);

        match view.snapshot() {
            EstadoRender::Tabla { pagina, resumen } => {
                assert_eq!(pagina.filas.first().unwrap().movimiento.codigo_producto, "P-11");
                assert_eq!(pagina.filas.last().unwrap().movimiento.codigo_producto, "P-20");
                assert_eq!(resumen, "Mostrando 11-20 de 25");
            }
            other => panic!("esperava tabla, veio {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_historial_field_is_an_error_state() {
        let view = HistorialView::new(
            FakeSource::with(vec![(0, Err(HistorialError::RespuestaInvalida))]),
            ViewerConfig::default(),
        );
        view.refresh().await;
        assert_eq!(view.snapshot(), EstadoRender::Error("Error al cargar el historial".into()));
        assert!(view.filtradas().is_empty());
    }

    #[tokio::test]
    async fn empty_messages_depend_on_active_filters() {
        let view = HistorialView::new(
            FakeSource::with(vec![(0, Ok(vec![])), (0, Ok(vec![]))]),
            ViewerConfig::default(),
        );
        view.refresh().await;
        assert_eq!(view.snapshot(), EstadoRender::Vacio(SIN_REGISTROS));

        view.set_date_range(RangoFechas::new(NaiveDate::from_ymd_opt(2024, 1, 1), None))
            .await;
        assert_eq!(view.snapshot(), EstadoRender::Vacio(SIN_RESULTADOS));
    }

    #[tokio::test]
    async fn date_range_excludes_records_outside_even_if_server_sends_them() {
        let movs = vec![movimiento("A", 2024, 1, 10), movimiento("B", 2024, 2, 1)];
        let view = HistorialView::new(FakeSource::with(vec![(0, Ok(movs))]), ViewerConfig::default());

        view.set_date_range(RangoFechas::new(
            NaiveDate::from_ymd_opt(2024, 1, 1),
            NaiveDate::from_ymd_opt(2024, 1, 31),
        ))
        .await;

        let pagina = tabla(view.snapshot());
        assert_eq!(pagina.total_filtrado, 1);
        assert_eq!(pagina.filas[0].movimiento.codigo_producto, "A");

        let pedido = view.source().pedidos.lock().unwrap()[0].clone();
        assert_eq!(pedido.start_date, NaiveDate::from_ymd_opt(2023, 12, 31));
        assert_eq!(pedido.end_date, NaiveDate::from_ymd_opt(2024, 2, 1));
    }

    #[tokio::test]
    async fn end_day_evening_in_local_offset_is_kept() {
        // 2024-01-31 23:30 em -04:00 já é 2024-02-01 no servidor (UTC)
        let mut noite = movimiento("NOCHE", 2024, 1, 31);
        noite.fecha = Utc.with_ymd_and_hms(2024, 2, 1, 3, 30, 0).unwrap();
        let mut madrugada = movimiento("TEMPRANO", 2024, 1, 1);
        madrugada.fecha = Utc.with_ymd_and_hms(2024, 1, 1, 3, 30, 0).unwrap();

        let config = ViewerConfig {
            utc_offset: FixedOffset::west_opt(4 * 3600).unwrap(),
            ..ViewerConfig::default()
        };
        let view = HistorialView::new(FakeSource::with(vec![(0, Ok(vec![noite, madrugada]))]), config);
        view.set_date_range(RangoFechas::new(
            NaiveDate::from_ymd_opt(2024, 1, 1),
            NaiveDate::from_ymd_opt(2024, 1, 31),
        ))
        .await;

        let pedido = view.source().pedidos.lock().unwrap()[0].clone();
        assert_eq!(pedido.end_date, NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(pedido.start_date, NaiveDate::from_ymd_opt(2023, 12, 31));

        // 23:30 do dia 31 entra; 23:30 do dia 31/12 (local) fica fora
        let pagina = tabla(view.snapshot());
        assert_eq!(pagina.total_filtrado, 1);
        assert_eq!(pagina.filas[0].movimiento.codigo_producto, "NOCHE");
    }

    #[tokio::test]
    async fn follows_server_pages_until_the_total() {
        let lote = |desde: u32, n: u32| LoteHistorial {
            historial: (desde..desde + n).map(|i| movimiento(&format!("P-{i:02}"), 2024, 1, i)).collect(),
            total: Some(25),
        };
        let config = ViewerConfig { fetch_limit: 10, ..ViewerConfig::default() };
        let view = HistorialView::new(
            FakeSource::with_lotes(vec![(0, Ok(lote(1, 10))), (0, Ok(lote(11, 10))), (0, Ok(lote(21, 5)))]),
            config,
        );
        view.refresh().await;

        let paginas: Vec<u32> = view.source().pedidos.lock().unwrap().iter().map(|p| p.page).collect();
        assert_eq!(paginas, vec![1, 2, 3]);

        match view.snapshot() {
            EstadoRender::Tabla { resumen, .. } => assert_eq!(resumen, "Mostrando 1-10 de 25"),
            other => panic!("esperava tabla, veio {:?}", other),
        }
        assert_eq!(view.export_csv().unwrap().lines().count(), 26);
    }

    #[tokio::test]
    async fn error_on_a_later_page_is_an_error_state() {
        let lote = LoteHistorial {
            historial: (1..=10).map(|i| movimiento(&format!("P-{i:02}"), 2024, 1, i)).collect(),
            total: Some(30),
        };
        let view = HistorialView::new(
            FakeSource::with_lotes(vec![(0, Ok(lote)), (0, Err(HistorialError::RespuestaInvalida))]),
            ViewerConfig { fetch_limit: 10, ..ViewerConfig::default() },
        );
        view.refresh().await;
        assert_eq!(view.snapshot(), EstadoRender::Error("Error al cargar el historial".into()));
    }

    #[tokio::test(start_paused = true)]
    async fn stale_response_is_discarded() {
        // 1ª resposta (lenta) chega depois da 2ª
        let view = Arc::new(HistorialView::new(
            FakeSource::with(vec![
                (500, Ok(vec![movimiento("VIEJO", 2024, 1, 1)])),
                (10, Ok(vec![movimiento("NUEVO", 2024, 1, 2)])),
            ]),
            ViewerConfig::default(),
        ));

        let lenta = {
            let view = view.clone();
            tokio::spawn(async move { view.refresh().await })
        };
        tokio::time::sleep(Duration::from_millis(1)).await;
        view.refresh().await;
        lenta.await.unwrap();

        let pagina = tabla(view.snapshot());
        assert_eq!(pagina.filas.len(), 1);
        assert_eq!(pagina.filas[0].movimiento.codigo_producto, "NUEVO");
    }

    #[tokio::test(start_paused = true)]
    async fn debounced_search_fetches_once_with_last_term_and_resets_page() {
        let view = HistorialView::new(
            FakeSource::with(vec![(0, Ok(veinticinco())), (0, Ok(vec![movimiento("abc-123", 2024, 1, 1)]))]),
            ViewerConfig::default(),
        );
        view.refresh().await;
        view.set_page(3);

        for texto in ["a", "ab", "ABC"] {
            view.set_search_text(texto);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(view.source().pedidos.lock().unwrap().len(), 1);

        tokio::time::sleep(Duration::from_millis(300)).await;
        let pedidos = view.source().pedidos.lock().unwrap().clone();
        assert_eq!(pedidos.len(), 2);
        assert_eq!(pedidos[1].search, "ABC");

        let pagina = tabla(view.snapshot());
        assert_eq!(pagina.pagina, 1);
        assert_eq!(pagina.filas[0].movimiento.codigo_producto, "abc-123");
    }

    #[tokio::test]
    async fn apply_filters_fetches_once_with_both_filters() {
        let view = HistorialView::new(
            FakeSource::with(vec![(0, Ok(vec![movimiento("abc-123", 2024, 1, 5)]))]),
            ViewerConfig::default(),
        );
        let rango = RangoFechas::new(NaiveDate::from_ymd_opt(2024, 1, 1), None);
        view.apply_filters("ABC", rango).await;

        let pedidos = view.source().pedidos.lock().unwrap().clone();
        assert_eq!(pedidos.len(), 1);
        assert_eq!(pedidos[0].search, "ABC");
        assert_eq!(pedidos[0].start_date, rango.start);
        assert_eq!(tabla(view.snapshot()).total_filtrado, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_cancels_pending_search() {
        let view = HistorialView::new(FakeSource::default(), ViewerConfig::default());
        view.set_search_text("x");
        view.teardown();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(view.source().pedidos.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_during_fetch_restores_the_loaded_list() {
        let view = HistorialView::new(
            FakeSource::with(vec![(0, Ok(veinticinco())), (500, Ok(vec![]))]),
            ViewerConfig::default(),
        );
        view.refresh().await;

        view.set_search_text("P-");
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(view.source().pedidos.lock().unwrap().len(), 2);
        assert_eq!(view.snapshot(), EstadoRender::Cargando);

        view.teardown();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(tabla(view.snapshot()).total_filtrado, 25);
    }

    #[tokio::test]
    async fn export_uses_the_whole_filtered_set() {
        let view = HistorialView::new(FakeSource::with(vec![(0, Ok(veinticinco()))]), ViewerConfig::default());
        view.refresh().await;

        let csv = view.export_csv().unwrap();
        assert_eq!(csv.lines().count(), 26);
        assert_eq!(csv, view.export_csv().unwrap());
    }

    #[tokio::test]
    async fn export_is_refused_while_loading_or_failed() {
        let view = HistorialView::new(
            FakeSource::with(vec![(0, Err(HistorialError::Transporte { mensaje: Some("Sin conexión".into()) }))]),
            ViewerConfig::default(),
        );
        assert_eq!(view.exportables(), Err(ExportBloqueado::Cargando));

        view.refresh().await;
        assert_eq!(view.exportables(), Err(ExportBloqueado::Error("Sin conexión".into())));
        assert!(view.export_csv().is_err());
    }

    #[tokio::test]
    async fn watchers_see_state_changes() {
        let view = HistorialView::new(FakeSource::with(vec![(0, Ok(veinticinco()))]), ViewerConfig::default());
        let mut rx = view.subscribe();
        view.refresh().await;
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();

        view.request_sort(SortKey::Cantidad);
        assert!(rx.has_changed().unwrap());
    }
}
