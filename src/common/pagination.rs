// src/common/pagination.rs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

// ---
// Parâmetros de página vindos da query string (?page=2&limit=10)
// ---
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
pub struct PageParams {
    /// Página (começa em 1)
    pub page: Option<i64>,
    /// Itens por página (máx. 100)
    pub limit: Option<i64>,
}

impl PageParams {
    pub fn new(page: i64, limit: i64) -> Self {
        Self { page: Some(page), limit: Some(limit) }
    }

    /// Resolve com o limite padrão da API (máx. 100 por página).
    pub fn resolve(&self) -> Page {
        self.resolve_with_max(MAX_LIMIT)
    }

    /// Valores ausentes ou < 1 viram os padrões; o limite é cortado em `max`.
    pub fn resolve_with_max(&self, max: i64) -> Page {
        Page {
            page: self.page.filter(|p| *p >= 1).unwrap_or(1),
            limit: self
                .limit
                .filter(|l| *l >= 1)
                .map(|l| l.min(max))
                .unwrap_or(DEFAULT_LIMIT),
        }
    }
}

// Página já normalizada
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub limit: i64,
}

impl Page {
    /// Satura em vez de estourar (?page=i64::MAX só devolve uma página vazia).
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

pub fn total_pages(total: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

// ---
// Resultado paginado, no mesmo formato que o frontend já consome
// (docs, totalDocs, hasNextPage...).
// ---
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub docs: Vec<T>,
    pub total_docs: i64,
    pub limit: i64,
    pub page: i64,
    pub total_pages: i64,
    /// Posição (1-based) do primeiro documento desta página
    pub paging_counter: i64,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_page: Option<i64>,
    pub next_page: Option<i64>,
}

impl<T> Paginated<T> {
    pub fn new(docs: Vec<T>, total_docs: i64, resolved: Page) -> Self {
        let Page { page, limit } = resolved;
        let total_pages = total_pages(total_docs, limit);
        let has_prev_page = page > 1;
        let has_next_page = page < total_pages;

        Self {
            docs,
            total_docs,
            limit,
            page,
            total_pages,
            paging_counter: resolved.offset().saturating_add(1),
            has_prev_page,
            has_next_page,
            prev_page: has_prev_page.then(|| page - 1),
            next_page: has_next_page.then(|| page + 1),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            docs: self.docs.into_iter().map(f).collect(),
            total_docs: self.total_docs,
            limit: self.limit,
            page: self.page,
            total_pages: self.total_pages,
            paging_counter: self.paging_counter,
            has_prev_page: self.has_prev_page,
            has_next_page: self.has_next_page,
            prev_page: self.prev_page,
            next_page: self.next_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_are_clamped() {
        let p = PageParams { page: Some(0), limit: Some(1_000) }.resolve();
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, MAX_LIMIT);

        let p = PageParams { page: None, limit: Some(-3) }.resolve();
        assert_eq!(p.limit, DEFAULT_LIMIT);
        assert_eq!(p.offset(), 0);

        let p = PageParams::new(3, 500).resolve_with_max(1_000);
        assert_eq!(p.limit, 500);
        assert_eq!(p.offset(), 1_000);
    }

    #[test]
    fn huge_page_does_not_overflow() {
        let p = PageParams { page: Some(i64::MAX), limit: None }.resolve();
        assert_eq!(p.page, i64::MAX);
        assert_eq!(p.offset(), i64::MAX);

        let page: Paginated<i32> = Paginated::new(vec![], 3, p);
        assert_eq!(page.paging_counter, i64::MAX);
        assert!(!page.has_next_page);
        assert_eq!(page.next_page, None);
        assert_eq!(page.prev_page, Some(i64::MAX - 1));
    }

    #[test]
    fn middle_page_has_both_neighbours() {
        let page = Paginated::new(vec![11, 12], 25, PageParams::new(2, 10).resolve());
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.paging_counter, 11);
        assert_eq!(page.prev_page, Some(1));
        assert_eq!(page.next_page, Some(3));
    }

    #[test]
    fn empty_result_has_no_pages() {
        let page: Paginated<i32> = Paginated::new(vec![], 0, PageParams::new(1, 10).resolve());
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next_page);
        assert!(!page.has_prev_page);
    }
}
