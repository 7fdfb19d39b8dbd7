//! Small pure utilities for cleaning up reported values: GPA rescaling and
//! parsing of textual ranges like "1450-1570" or "4-6%".

/// Rescale a GPA onto the common 4.0 basis. A scale of 4.0 is the
/// identity. A scale that is zero or negative is a data error and falls
/// back to 4.0 rather than producing a division artifact.
pub fn normalize_gpa(gpa: f64, scale: f64) -> f64 {
    let scale = if scale > 0.0 { scale } else { 4.0 };
    (gpa * 4.0 / scale).clamp(0.0, 4.0)
}

/// Parse an "a-b" textual range into (low, high) bounds. Accepts hyphen,
/// en-dash, and em-dash separators, a trailing percent sign, and comma
/// thousands separators. Returns None unless both bounds parse.
pub fn parse_range(text: &str) -> Option<(f64, f64)> {
    let cleaned = clean_numeric_text(text);
    let mut parts = cleaned.split('-').filter(|p| !p.is_empty());
    let low: f64 = parts.next()?.parse().ok()?;
    let high: f64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((low, high))
}

/// Midpoint of a textual range, or the value itself when the text holds a
/// single number ("4.5" and "4-5%" both resolve).
pub fn parse_range_midpoint(text: &str) -> Option<f64> {
    if let Some((low, high)) = parse_range(text) {
        return Some((low + high) / 2.0);
    }
    clean_numeric_text(text).parse().ok()
}

fn clean_numeric_text(text: &str) -> String {
    text.trim()
        .trim_end_matches('%')
        .replace(['–', '—'], "-")
        .replace([',', ' '], "")
}
