use crate::core::table::{Column, DataTable, TableRow};
use crate::core::Storage;
use crate::utils::error::{AdminError, Result};

/// Serializes `rows` to CSV, one column per table column, with a header row.
pub fn rows_to_csv<T>(columns: &[Column<T>], rows: &[&T]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(columns.iter().map(|c| c.header.as_str()))?;
    for row in rows {
        writer.write_record(columns.iter().map(|c| c.value(row)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AdminError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| AdminError::ConfigError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

/// Writes every row that passes the table's filter, in its sort order, and
/// returns how many were written.
pub async fn export_table<S, T>(storage: &S, file_name: &str, table: &DataTable<T>) -> Result<usize>
where
    S: Storage,
    T: TableRow,
{
    let rows = table.filtered_rows();
    let csv = rows_to_csv(table.columns(), &rows)?;

    tracing::debug!("Writing {} rows ({} bytes) to {}", rows.len(), csv.len(), file_name);
    storage.write_file(file_name, csv.as_bytes()).await?;
    tracing::info!("Exported {} rows to {}", rows.len(), file_name);
    Ok(rows.len())
}
