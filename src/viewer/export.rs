// src/viewer/export.rs

use std::path::Path;

use rust_decimal::Decimal;

use super::pipeline::FilaHistorial;

pub const CSV_FILE_NAME: &str = "historial_entradas.csv";

/// Mesmas colunas, na mesma ordem, que a tabela.
pub const CSV_HEADER: [&str; 8] = [
    "Producto",
    "Código",
    "Cantidad",
    "Stock Anterior",
    "Stock Nuevo",
    "Costo Final",
    "Fecha y Hora",
    "Operación",
];

pub const FECHA_FORMATO: &str = "%d/%m/%Y %H:%M";

/// Serializa o conjunto inteiro. Linhas separadas por "\n", sem "\n" final.
pub fn to_csv(filas: &[FilaHistorial]) -> String {
    let mut lineas = Vec::with_capacity(filas.len() + 1);
    lineas.push(CSV_HEADER.join(","));

    for fila in filas {
        let mov = &fila.movimiento;
        let campos = [
            quote(&mov.nombre_producto),
            field(&mov.codigo_producto),
            format!("+{}", decimal(mov.cantidad)),
            decimal(mov.stock_anterior),
            decimal(mov.stock_nuevo),
            mov.costo_final.map(decimal).unwrap_or_default(),
            quote(&fila.fecha.format(FECHA_FORMATO).to_string()),
            field(&mov.operacion.as_str().to_uppercase()),
        ];
        lineas.push(campos.join(","));
    }

    lineas.join("\n")
}

pub async fn write_csv(path: &Path, filas: &[FilaHistorial]) -> std::io::Result<usize> {
    let csv = to_csv(filas);
    tokio::fs::write(path, csv.as_bytes()).await?;
    tracing::info!("📄 {} movimentos exportados para {}", filas.len(), path.display());
    Ok(filas.len())
}

// 5.000 -> "5", 12.50 -> "12.5"
pub fn decimal(value: Decimal) -> String {
    value.normalize().to_string()
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

// Só cita quando o valor quebraria a linha
fn field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        quote(value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::historial::TipoOperacion;
    use crate::viewer::pipeline::tests::{fila, movimiento};

    #[test]
    fn header_has_eight_columns_including_final_cost() {
        let csv = to_csv(&[]);
        assert_eq!(
            csv,
            "Producto,Código,Cantidad,Stock Anterior,Stock Nuevo,Costo Final,Fecha y Hora,Operación"
        );
    }

    #[test]
    fn rows_follow_the_table_format() {
        let mut mov = movimiento("TOR-001", 2024, 1, 15);
        mov.nombre_producto = "Tornillo 1/4\" \"grande\"".into();
        mov.costo_final = Some(Decimal::new(12550, 2));

        let mut ajuste = movimiento("CLA,002", 2024, 1, 16);
        ajuste.operacion = TipoOperacion::Ajuste("ajuste_manual".into());

        let csv = to_csv(&[fila(mov), fila(ajuste)]);
        let lineas: Vec<&str> = csv.split('\n').collect();

        assert_eq!(lineas.len(), 3);
        assert_eq!(
            lineas[1],
            r#""Tornillo 1/4"" ""grande""",TOR-001,+5,10,15,125.5,"15/01/2024 12:00",ENTRADA"#
        );
        assert_eq!(
            lineas[2],
            r#""Producto CLA,002","CLA,002",+5,10,15,,"16/01/2024 12:00",AJUSTE_MANUAL"#
        );
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn exporting_twice_is_byte_identical() {
        let filas: Vec<_> = (1..=12)
            .map(|i| fila(movimiento(&format!("P-{i}"), 2024, 1, i)))
            .collect();
        assert_eq!(to_csv(&filas).into_bytes(), to_csv(&filas).into_bytes());
    }

    #[tokio::test]
    async fn write_csv_creates_the_file() {
        let dir = std::env::temp_dir().join(format!("ferreteria-export-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join(CSV_FILE_NAME);

        let filas = vec![fila(movimiento("A-1", 2024, 3, 1))];
        let escritos = write_csv(&path, &filas).await.unwrap();

        assert_eq!(escritos, 1);
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), to_csv(&filas));
        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
