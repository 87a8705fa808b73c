use crate::domain::ports::SheetSource;
use crate::utils::error::{ChecklistError, Result};
use regex::Regex;
use std::sync::LazyLock;

static SHEET_CSV_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://docs\.google\.com/spreadsheets/d/[^/]+/.*output=csv$")
        .expect("sheet link pattern is valid")
});

/// True when `url` looks like a published Google Sheets CSV link.
pub fn validate_shape(url: &str) -> bool {
    SHEET_CSV_LINK.is_match(url)
}

/// Header-only probe of `url`. Any failure is reported as `false`.
pub async fn check_reachable<H: SheetSource + ?Sized>(source: &H, url: &str) -> bool {
    match source.head(url).await {
        Ok(ok) => {
            tracing::debug!("HEAD {} -> success: {}", url, ok);
            ok
        }
        Err(e) => {
            tracing::debug!("HEAD {} failed: {}", url, e);
            false
        }
    }
}

/// Runs the link checks in order: presence, shape, reachability.
/// Returns the link to store on success.
pub async fn validate_submission<H: SheetSource + ?Sized>(source: &H, input: &str) -> Result<String> {
    if input.trim().is_empty() {
        return Err(ChecklistError::MissingInput);
    }

    if !validate_shape(input) {
        tracing::warn!("❌ Rejected link with invalid format: {}", input);
        return Err(ChecklistError::InvalidLinkFormat {
            url: input.to_string(),
        });
    }

    tracing::info!("🔍 Checking link accessibility...");
    if !check_reachable(source, input).await {
        tracing::warn!("❌ Link is not accessible: {}", input);
        return Err(ChecklistError::Unreachable {
            url: input.to_string(),
        });
    }

    Ok(input.to_string())
}
