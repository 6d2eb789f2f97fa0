//! `stock critical`.

use std::io::Write;

use jfa_core::reports::CriticalStock;

use super::CliError;
use super::session::Session;

/// Print the products at or below `minimum` units as a table on stdout.
///
/// # Errors
///
/// Returns an error if the API call or the write to stdout fails.
pub async fn critical(session: &Session, minimum: u32) -> Result<(), CliError> {
    let products = session.api().critical_stock(minimum).await?;
    let mut stdout = std::io::stdout().lock();
    write_table(&mut stdout, &products)?;
    tracing::info!(count = products.len(), minimum, "Critical stock listed");
    Ok(())
}

fn write_table(out: &mut impl Write, products: &[CriticalStock]) -> std::io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "Sin productos en stock crítico");
    }

    let width = products
        .iter()
        .map(|p| p.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Producto".len());

    writeln!(out, "{:<width$}  {:>5}  {:>14}", "Producto", "Stock", "Precio")?;
    for product in products {
        writeln!(
            out,
            "{:<width$}  {:>5}  {:>14}",
            product.name,
            product.stock,
            product.price.to_string()
        )?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_table_columns() {
        let products: Vec<CriticalStock> = serde_json::from_str(
            r#"[{"nombre": "Toma doble", "stock": 2, "precio": "950.5"},
                {"nombre": "Cable", "stock": "0", "precio": 120}]"#,
        )
        .unwrap();
        let mut out = Vec::new();
        write_table(&mut out, &products).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Producto  "));
        assert!(lines[1].starts_with("Toma doble"));
        assert!(lines[1].ends_with("$950,50"));
        assert!(lines[2].contains("    0"));
    }

    #[test]
    fn test_empty_list() {
        let mut out = Vec::new();
        write_table(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Sin productos en stock crítico\n");
    }
}
