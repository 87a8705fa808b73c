use crate::domain::model::NormalizedRecord;

const UNNAMED: &str = "Unnamed";
const NOT_AVAILABLE: &str = "N/A";

pub fn display_name(record: &NormalizedRecord) -> &str {
    if record.id_name.is_empty() {
        UNNAMED
    } else {
        &record.id_name
    }
}

/// Label/value pairs for a row's detail view: the name first (labelled
/// "name"), then retained columns. The check flag is not listed.
pub fn detail_fields(record: &NormalizedRecord) -> Vec<(String, String)> {
    std::iter::once(("name".to_string(), record.id_name.clone()))
        .chain(
            record
                .retained_columns()
                .map(|(label, value)| (label.to_string(), value)),
        )
        .map(|(label, value)| {
            let value = if value.is_empty() {
                NOT_AVAILABLE.to_string()
            } else {
                value
            };
            (label, value)
        })
        .collect()
}
