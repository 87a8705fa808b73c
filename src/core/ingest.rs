use crate::domain::model::RawRecord;
use crate::domain::ports::SheetSource;

/// Parses exported sheet text into header-keyed records.
///
/// The first line is the header row. Every later line becomes one record,
/// split on each literal comma (quoted fields are not recognised). Headers
/// and values are trimmed and headers lowercased. Missing trailing fields
/// stay absent; extra fields beyond the header row are dropped.
pub fn parse(raw_text: &str) -> Vec<RawRecord> {
    let mut lines = raw_text.split('\n');

    let headers: Vec<String> = match lines.next() {
        Some(line) => line
            .split(',')
            .map(|header| header.trim().to_lowercase())
            .collect(),
        None => return Vec::new(),
    };

    lines
        .map(|line| -> RawRecord {
            headers
                .iter()
                .zip(line.split(','))
                .map(|(header, value)| (header.clone(), value.trim().to_string()))
                .collect()
        })
        .collect()
}

/// Lowercase column names across `records`, in first-seen order.
pub fn headers(records: &[RawRecord]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !headers.iter().any(|h| h == key) {
                headers.push(key.to_string());
            }
        }
    }
    headers
}

/// Fetches and parses the sheet at `url`.
///
/// A failed fetch yields an empty list, the same as a sheet with no data
/// rows. Callers cannot tell the two apart.
pub async fn ingest<H: SheetSource + ?Sized>(source: &H, url: &str) -> Vec<RawRecord> {
    tracing::debug!("Fetching sheet data from: {}", url);
    match source.fetch_text(url).await {
        Ok(text) => {
            let records = parse(&text);
            tracing::info!("📥 Parsed {} rows from sheet", records.len());
            records
        }
        Err(e) => {
            tracing::error!("Error fetching Google Sheets data: {}", e);
            Vec::new()
        }
    }
}
