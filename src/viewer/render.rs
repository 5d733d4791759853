// src/viewer/render.rs

use super::{
    export::{decimal, CSV_HEADER, FECHA_FORMATO},
    pipeline::{FilaHistorial, SortConfig, SortDirection, SortKey},
    view::EstadoRender,
};

/// Desenha o estado do visor como texto (tabela com colunas alinhadas).
pub fn render(estado: &EstadoRender, sort: &SortConfig) -> String {
    match estado {
        EstadoRender::Cargando => "Cargando historial...".to_string(),
        EstadoRender::Error(mensaje) => format!("⚠️  {mensaje}"),
        EstadoRender::Vacio(mensaje) => (*mensaje).to_string(),
        EstadoRender::Tabla { pagina, resumen } => {
            let mut out = tabla(&pagina.filas, sort);
            out.push('\n');
            out.push_str(&format!(
                "{resumen}  (página {} de {})",
                pagina.pagina, pagina.total_paginas
            ));
            out
        }
    }
}

fn tabla(filas: &[FilaHistorial], sort: &SortConfig) -> String {
    let header: Vec<String> = CSV_HEADER
        .iter()
        .zip(SortKey::ALL)
        .map(|(titulo, key)| {
            if key != sort.key {
                return titulo.to_string();
            }
            let seta = match sort.direction {
                SortDirection::Asc => "↑",
                SortDirection::Desc => "↓",
            };
            format!("{titulo} {seta}")
        })
        .collect();

    let cuerpo: Vec<[String; 8]> = filas.iter().map(celdas).collect();

    let mut anchos: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for linha in &cuerpo {
        for (ancho, celda) in anchos.iter_mut().zip(linha) {
            *ancho = (*ancho).max(celda.chars().count());
        }
    }

    let mut out = String::new();
    push_linha(&mut out, &header, &anchos);
    let separador: Vec<String> = anchos.iter().map(|a| "-".repeat(*a)).collect();
    push_linha(&mut out, &separador, &anchos);
    for linha in &cuerpo {
        push_linha(&mut out, linha, &anchos);
    }
    out.pop();
    out
}

fn celdas(fila: &FilaHistorial) -> [String; 8] {
    let mov = &fila.movimiento;
    [
        mov.nombre_producto.clone(),
        mov.codigo_producto.clone(),
        format!("+{}", decimal(mov.cantidad)),
        decimal(mov.stock_anterior),
        decimal(mov.stock_nuevo),
        mov.costo_final.map(decimal).unwrap_or_else(|| "-".to_string()),
        fila.fecha.format(FECHA_FORMATO).to_string(),
        mov.operacion.label().to_string(),
    ]
}

fn push_linha(out: &mut String, celdas: &[String], anchos: &[usize]) {
    let linha: Vec<String> = celdas
        .iter()
        .zip(anchos)
        .map(|(c, &a)| format!("{c:<a$}"))
        .collect();
    out.push_str(linha.join(" | ").trim_end());
    out.push('\n');
}
