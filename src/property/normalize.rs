//! Text and number cleanup shared by every listing intake path

/// Normalize property type abbreviations and spellings
///
/// Empty input falls back to `single-family`; unrecognized types are
/// lowercased with spaces replaced by hyphens.
pub fn normalize_property_type(property_type: &str) -> String {
    let normalized = property_type.trim().to_lowercase();

    if normalized.is_empty() {
        return "single-family".to_string();
    }

    match normalized.as_str() {
        "sfr" | "sf" | "single family residential" | "single family" | "singlefamily" => {
            return "single-family".to_string();
        }
        "mfr" | "mf" | "multi family residential" | "multifamily residential" | "multifamily"
        | "multi family" => return "multi-family".to_string(),
        _ => {}
    }

    if normalized.contains("single") && normalized.contains("family") {
        return "single-family".to_string();
    }
    if normalized.contains("multi") && normalized.contains("family") {
        return "multi-family".to_string();
    }

    match normalized.as_str() {
        "townhouse" | "townhome" | "town home" => "townhouse".to_string(),
        "condo" | "condominium" => "condo".to_string(),
        "duplex" => "duplex".to_string(),
        "triplex" => "triplex".to_string(),
        "fourplex" | "4plex" => "fourplex".to_string(),
        other => other.replace(' ', "-"),
    }
}

/// Parse a currency-formatted string ("$1,250.50") into a number
///
/// Returns `None` for empty or unparseable input and for non-finite values.
pub fn clean_numeric(value: &str) -> Option<f64> {
    let cleaned: String = value
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}
