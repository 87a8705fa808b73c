use crate::domain::model::NormalizedRecord;
use crate::utils::error::{ChecklistError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ExportFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

const ID_NAME_HEADER: &str = "idName";
const CHECK_LIST_HEADER: &str = "checkList";

/// Renders the checklist in `format`.
///
/// Delimited output has an `idName` column, every retained column
/// (first-seen order) and a trailing `checkList` column with Yes/No. The
/// fixed columns use the stored field names, which never clash with the
/// lowercase retained columns.
pub fn export_records(records: &[NormalizedRecord], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Csv => write_delimited(records, b','),
        ExportFormat::Tsv => write_delimited(records, b'\t'),
        ExportFormat::Json => Ok(serde_json::to_string_pretty(records)?),
    }
}

fn write_delimited(records: &[NormalizedRecord], delimiter: u8) -> Result<String> {
    let mut columns: Vec<&str> = Vec::new();
    for record in records {
        for key in record.retained.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    let mut header = vec![ID_NAME_HEADER];
    header.extend(columns.iter().copied());
    header.push(CHECK_LIST_HEADER);
    writer.write_record(&header)?;

    for record in records {
        let mut row = vec![record.id_name.clone()];
        for column in &columns {
            let value = record
                .retained_columns()
                .find(|(key, _)| key == column)
                .map(|(_, value)| value)
                .unwrap_or_default();
            row.push(value);
        }
        row.push(if record.check_list { "Yes" } else { "No" }.to_string());
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ChecklistError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| ChecklistError::ConfigError {
        message: format!("export produced invalid UTF-8: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::RowId;

    fn sample() -> Vec<NormalizedRecord> {
        let mut checked = NormalizedRecord::new(RowId(1), "Doe, Jane").with_column("team", "Red");
        checked.check_list = true;
        vec![
            NormalizedRecord::new(RowId(0), "Ada").with_column("age", "36"),
            checked,
        ]
    }

    #[test]
    fn test_export_csv_quotes_and_fills_columns() {
        let csv = export_records(&sample(), ExportFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "idName,age,team,checkList");
        assert_eq!(lines[1], "Ada,36,,No");
        assert_eq!(lines[2], "\"Doe, Jane\",,Red,Yes");
    }

    #[test]
    fn test_export_tsv() {
        let tsv = export_records(&sample(), ExportFormat::Tsv).unwrap();
        assert!(tsv.starts_with("idName\tage\tteam\tcheckList\n"));
        assert!(tsv.contains("Doe, Jane\t\tRed\tYes"));
    }

    #[test]
    fn test_export_json() {
        let json = export_records(&sample(), ExportFormat::Json).unwrap();
        let parsed: Vec<NormalizedRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_export_empty_checklist() {
        let csv = export_records(&[], ExportFormat::Csv).unwrap();
        assert_eq!(csv, "idName,checkList\n");
    }

    #[test]
    fn test_export_keeps_retained_name_and_checked_columns_apart() {
        // 分拆姓名時，保留的欄位可能就叫 name 或 checked
        let record = NormalizedRecord::new(RowId(0), "Jane Doe")
            .with_column("name", "JD")
            .with_column("checked", "TRUE");
        let csv = export_records(&[record], ExportFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "idName,name,checked,checkList");
        assert_eq!(lines[1], "Jane Doe,JD,TRUE,No");
    }
}
