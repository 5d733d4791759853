// src/viewer/pipeline.rs

use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::models::historial::MovimientoHistorial;

// ---
// Linha normalizada: o movimento + data de exibição + chave de ordenação
// ---
#[derive(Debug, Clone, PartialEq)]
pub struct FilaHistorial {
    pub movimiento: MovimientoHistorial,
    /// Data já no fuso de exibição
    pub fecha: DateTime<FixedOffset>,
    /// Milissegundos desde a época, usado só para ordenar
    pub orden_fecha: i64,
}

impl FilaHistorial {
    pub fn normalize(movimiento: MovimientoHistorial, offset: FixedOffset) -> Self {
        let fecha = movimiento.fecha.with_timezone(&offset);
        let orden_fecha = movimiento.fecha.timestamp_millis();
        Self { movimiento, fecha, orden_fecha }
    }

    /// Chave estável de renderização: (data, código)
    pub fn key(&self) -> (i64, &str) {
        (self.orden_fecha, &self.movimiento.codigo_producto)
    }
}

// ---
// Ordenação
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    NombreProducto,
    CodigoProducto,
    Cantidad,
    StockAnterior,
    StockNuevo,
    CostoFinal,
    Fecha,
    Operacion,
}

impl SortKey {
    pub const ALL: [SortKey; 8] = [
        SortKey::NombreProducto,
        SortKey::CodigoProducto,
        SortKey::Cantidad,
        SortKey::StockAnterior,
        SortKey::StockNuevo,
        SortKey::CostoFinal,
        SortKey::Fecha,
        SortKey::Operacion,
    ];

    /// Nome curto usado na linha de comando
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::NombreProducto => "producto",
            SortKey::CodigoProducto => "codigo",
            SortKey::Cantidad => "cantidad",
            SortKey::StockAnterior => "stock_anterior",
            SortKey::StockNuevo => "stock_nuevo",
            SortKey::CostoFinal => "costo",
            SortKey::Fecha => "fecha",
            SortKey::Operacion => "operacion",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_lowercase();
        Self::ALL.into_iter().find(|k| k.as_str() == value)
    }

    fn compare(&self, a: &FilaHistorial, b: &FilaHistorial) -> Ordering {
        let (ma, mb) = (&a.movimiento, &b.movimiento);
        match self {
            SortKey::NombreProducto => ma.nombre_producto.cmp(&mb.nombre_producto),
            SortKey::CodigoProducto => ma.codigo_producto.cmp(&mb.codigo_producto),
            SortKey::Cantidad => ma.cantidad.cmp(&mb.cantidad),
            SortKey::StockAnterior => ma.stock_anterior.cmp(&mb.stock_anterior),
            SortKey::StockNuevo => ma.stock_nuevo.cmp(&mb.stock_nuevo),
            // None < Some: sem custo vem primeiro no ascendente
            SortKey::CostoFinal => ma.costo_final.cmp(&mb.costo_final),
            SortKey::Fecha => a.orden_fecha.cmp(&b.orden_fecha),
            SortKey::Operacion => ma.operacion.as_str().cmp(mb.operacion.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortConfig {
    // Mais recentes primeiro
    fn default() -> Self {
        Self { key: SortKey::Fecha, direction: SortDirection::Desc }
    }
}

impl SortConfig {
    /// Mesma coluna inverte a direção; coluna nova começa ascendente.
    pub fn request(self, key: SortKey) -> Self {
        if self.key == key {
            Self { key, direction: self.direction.toggled() }
        } else {
            Self { key, direction: SortDirection::Asc }
        }
    }

    /// Ordenação estável: empates mantêm a ordem de chegada.
    pub fn apply(&self, filas: &mut [FilaHistorial]) {
        filas.sort_by(|a, b| {
            let ord = self.key.compare(a, b);
            match self.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
    }
}

// ---
// Filtros
// ---

/// Intervalo de dias inteiros, os dois extremos inclusivos.
/// Os dias são avaliados no fuso de exibição da linha.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangoFechas {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl RangoFechas {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn is_active(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    pub fn contains(&self, fila: &FilaHistorial) -> bool {
        let dia = fila.fecha.date_naive();
        self.start.is_none_or(|start| dia >= start) && self.end.is_none_or(|end| dia <= end)
    }
}

pub fn matches_search(fila: &FilaHistorial, search: &str) -> bool {
    search.is_empty()
        || fila
            .movimiento
            .codigo_producto
            .to_lowercase()
            .contains(&search.to_lowercase())
}

/// Filtra e ordena. Devolve o conjunto completo (é o que o CSV exporta).
pub fn procesar(
    filas: &[FilaHistorial],
    search: &str,
    rango: &RangoFechas,
    sort: &SortConfig,
) -> Vec<FilaHistorial> {
    let mut resultado: Vec<FilaHistorial> = filas
        .iter()
        .filter(|f| matches_search(f, search) && rango.contains(f))
        .cloned()
        .collect();
    sort.apply(&mut resultado);
    resultado
}

// ---
// Paginação local
// ---
#[derive(Debug, Clone, PartialEq)]
pub struct PaginaVista {
    pub filas: Vec<FilaHistorial>,
    /// Página pedida (1-based)
    pub pagina: usize,
    pub total_filtrado: usize,
    pub total_paginas: usize,
    /// Posição (1-based) da primeira linha da página
    pub desde: usize,
    /// Posição da última linha da página (limitada ao total)
    pub hasta: usize,
}

impl PaginaVista {
    /// Fatiar além do fim devolve página vazia, nunca erro.
    pub fn slice(filtradas: &[FilaHistorial], pagina: usize, page_size: usize) -> Self {
        let pagina = pagina.max(1);
        let page_size = page_size.max(1);
        let total = filtradas.len();

        let inicio = (pagina - 1).saturating_mul(page_size);
        let fim = inicio.saturating_add(page_size).min(total);
        let filas = filtradas.get(inicio..fim).map(<[_]>::to_vec).unwrap_or_default();

        Self {
            filas,
            pagina,
            total_filtrado: total,
            total_paginas: total.div_ceil(page_size),
            desde: inicio + 1,
            hasta: fim.max(inicio),
        }
    }

    pub fn resumen(&self) -> String {
        format!("Mostrando {}-{} de {}", self.desde, self.hasta, self.total_filtrado)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::historial::TipoOperacion;
    use chrono::{Offset, TimeZone, Utc};
    use rust_decimal::Decimal;

    pub(crate) fn movimiento(codigo: &str, y: i32, m: u32, d: u32) -> MovimientoHistorial {
        MovimientoHistorial {
            nombre_producto: format!("Producto {codigo}"),
            codigo_producto: codigo.to_string(),
            cantidad: Decimal::from(5),
            stock_anterior: Decimal::from(10),
            stock_nuevo: Decimal::from(15),
            costo_final: None,
            fecha: Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(),
            operacion: TipoOperacion::Entrada,
        }
    }

    pub(crate) fn fila(mov: MovimientoHistorial) -> FilaHistorial {
        FilaHistorial::normalize(mov, Utc.fix())
    }

    fn codigos(filas: &[FilaHistorial]) -> Vec<String> {
        filas.iter().map(|f| f.movimiento.codigo_producto.clone()).collect()
    }

    #[test]
    fn page_two_of_twenty_five_holds_rows_eleven_to_twenty() {
        let filas: Vec<_> = (1..=25)
            .map(|i| fila(movimiento(&format!("P-{i:02}"), 2024, 1, 1)))
            .collect();

        let pagina = PaginaVista::slice(&filas, 2, 10);
        assert_eq!(pagina.total_paginas, 3);
        assert_eq!(pagina.filas.len(), 10);
        assert_eq!(pagina.filas[0].movimiento.codigo_producto, "P-11");
        assert_eq!(pagina.filas[9].movimiento.codigo_producto, "P-20");
        assert_eq!(pagina.resumen(), "Mostrando 11-20 de 25");

        let ultima = PaginaVista::slice(&filas, 3, 10);
        assert_eq!(ultima.resumen(), "Mostrando 21-25 de 25");
    }

    #[test]
    fn slicing_past_the_end_is_an_empty_page() {
        let filas: Vec<_> = (1..=3).map(|i| fila(movimiento(&format!("P-{i}"), 2024, 1, 1))).collect();
        let pagina = PaginaVista::slice(&filas, 7, 10);
        assert!(pagina.filas.is_empty());
        assert_eq!(pagina.total_paginas, 1);
    }

    #[test]
    fn search_is_case_insensitive_on_product_code() {
        let f = fila(movimiento("abc-123", 2024, 1, 1));
        assert!(matches_search(&f, "ABC"));
        assert!(matches_search(&f, ""));
        assert!(!matches_search(&f, "xyz"));
        // o nome do produto não entra na busca
        assert!(!matches_search(&f, "Producto"));
    }

    #[test]
    fn date_range_is_inclusive_and_excludes_next_month() {
        let rango = RangoFechas::new(
            NaiveDate::from_ymd_opt(2024, 1, 1),
            NaiveDate::from_ymd_opt(2024, 1, 31),
        );
        assert!(rango.contains(&fila(movimiento("A", 2024, 1, 1))));
        assert!(rango.contains(&fila(movimiento("A", 2024, 1, 31))));
        assert!(!rango.contains(&fila(movimiento("A", 2024, 2, 1))));
        assert!(!rango.contains(&fila(movimiento("A", 2023, 12, 31))));
    }

    #[test]
    fn search_and_date_filters_commute() {
        let filas = vec![
            fila(movimiento("abc-1", 2024, 1, 5)),
            fila(movimiento("abc-2", 2024, 2, 5)),
            fila(movimiento("zzz-3", 2024, 1, 6)),
            fila(movimiento("ABC-4", 2024, 1, 7)),
        ];
        let rango = RangoFechas::new(NaiveDate::from_ymd_opt(2024, 1, 1), NaiveDate::from_ymd_opt(2024, 1, 31));

        let busca_primeiro: Vec<_> = filas
            .iter()
            .filter(|f| matches_search(f, "abc"))
            .filter(|f| rango.contains(f))
            .cloned()
            .collect();
        let data_primeiro: Vec<_> = filas
            .iter()
            .filter(|f| rango.contains(f))
            .filter(|f| matches_search(f, "abc"))
            .cloned()
            .collect();

        assert_eq!(codigos(&busca_primeiro), codigos(&data_primeiro));
        assert_eq!(codigos(&busca_primeiro), vec!["abc-1", "ABC-4"]);
    }

    #[test]
    fn filtering_commutes_with_sorting() {
        let filas = vec![
            fila(movimiento("c-1", 2024, 1, 3)),
            fila(movimiento("a-1", 2024, 1, 9)),
            fila(movimiento("x-9", 2024, 1, 1)),
            fila(movimiento("b-1", 2024, 1, 2)),
        ];
        let sort = SortConfig { key: SortKey::CodigoProducto, direction: SortDirection::Asc };
        let rango = RangoFechas::default();

        let filtra_depois = {
            let mut todas = filas.clone();
            sort.apply(&mut todas);
            todas.into_iter().filter(|f| matches_search(f, "-1")).collect::<Vec<_>>()
        };
        let filtra_antes = procesar(&filas, "-1", &rango, &sort);

        assert_eq!(codigos(&filtra_antes), codigos(&filtra_depois));
        assert_eq!(codigos(&filtra_antes), vec!["a-1", "b-1", "c-1"]);
    }

    #[test]
    fn toggling_the_same_key_alternates_direction() {
        let mut sort = SortConfig::default();
        assert_eq!(sort.key, SortKey::Fecha);
        assert_eq!(sort.direction, SortDirection::Desc);

        sort = sort.request(SortKey::Cantidad);
        assert_eq!(sort.direction, SortDirection::Asc);

        let mut vistos = Vec::new();
        for _ in 0..4 {
            sort = sort.request(SortKey::Cantidad);
            vistos.push(sort.direction);
        }
        assert_eq!(
            vistos,
            vec![SortDirection::Desc, SortDirection::Asc, SortDirection::Desc, SortDirection::Asc]
        );
    }

    #[test]
    fn sort_is_stable_and_missing_cost_goes_first() {
        let mut a = movimiento("A", 2024, 1, 1);
        a.costo_final = Some(Decimal::new(1250, 2));
        let b = movimiento("B", 2024, 1, 1);
        let mut c = movimiento("C", 2024, 1, 1);
        c.costo_final = Some(Decimal::new(1250, 2));

        let mut filas = vec![fila(a), fila(b), fila(c)];
        SortConfig { key: SortKey::CostoFinal, direction: SortDirection::Asc }.apply(&mut filas);
        assert_eq!(codigos(&filas), vec!["B", "A", "C"]);

        // empates mantêm a ordem relativa também no descendente
        SortConfig { key: SortKey::CostoFinal, direction: SortDirection::Desc }.apply(&mut filas);
        assert_eq!(codigos(&filas), vec!["A", "C", "B"]);
    }

    #[test]
    fn date_column_sorts_by_timestamp_not_display_text() {
        let mut filas = vec![
            fila(movimiento("dez", 2023, 12, 2)),
            fila(movimiento("jan", 2024, 1, 1)),
            fila(movimiento("nov", 2023, 11, 30)),
        ];
        SortConfig::default().apply(&mut filas);
        assert_eq!(codigos(&filas), vec!["jan", "dez", "nov"]);
    }

    #[test]
    fn sort_keys_parse_from_cli_names() {
        for key in SortKey::ALL {
            assert_eq!(SortKey::parse(key.as_str()), Some(key));
        }
        assert_eq!(SortKey::parse(" Fecha "), Some(SortKey::Fecha));
        assert_eq!(SortKey::parse("precio"), None);
    }
}
