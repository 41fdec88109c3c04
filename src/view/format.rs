//! Formatting helpers shared by all renderers

use crate::consts::cli_consts::{
    CACHE_DIR_PREFIX, CACHE_DIR_SEPARATOR, GPU_DANGER_PERCENT, GPU_WARNING_PERCENT,
};

/// Rounds to one decimal, halves away from zero.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Formats a size given in megabytes: `512.0 MB`, `1.5 GB`.
pub fn format_size(size_mb: f64) -> String {
    if size_mb < 1024.0 {
        format!("{:.1} MB", round1(size_mb))
    } else {
        format!("{:.1} GB", round1(size_mb / 1024.0))
    }
}

/// Formats a size given in gigabytes with the same rules as [`format_size`].
pub fn format_size_gb(size_gb: f64) -> String {
    format_size(size_gb * 1024.0)
}

/// Human name for a model.
///
/// An explicit non-empty display name from the server wins. Otherwise the
/// cache prefix is stripped and the cache separator becomes `/`, so
/// `models--intfloat--e5-large` reads `intfloat/e5-large`.
pub fn display_name(name: &str, explicit: Option<&str>) -> String {
    if let Some(explicit) = explicit.filter(|s| !s.trim().is_empty()) {
        return explicit.to_string();
    }
    name.strip_prefix(CACHE_DIR_PREFIX)
        .unwrap_or(name)
        .replace(CACHE_DIR_SEPARATOR, "/")
}

/// Last segment of a path, accepting both separators.
pub fn path_label(path: &str) -> &str {
    path.trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(path)
}

/// Styling bucket for a GPU's free memory.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MemoryPressure {
    Danger,
    Warning,
    Neutral,
}

impl MemoryPressure {
    pub fn from_percent(free_percent: f64) -> Self {
        if free_percent < GPU_DANGER_PERCENT {
            MemoryPressure::Danger
        } else if free_percent < GPU_WARNING_PERCENT {
            MemoryPressure::Warning
        } else {
            MemoryPressure::Neutral
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            MemoryPressure::Danger => "danger",
            MemoryPressure::Warning => "warning",
            MemoryPressure::Neutral => "",
        }
    }
}

/// Joins a base class with optional modifiers, skipping empty ones.
pub fn classes(base: &str, modifiers: &[&str]) -> String {
    let mut out = base.to_string();
    for modifier in modifiers.iter().filter(|m| !m.is_empty()) {
        out.push(' ');
        out.push_str(modifier);
    }
    out
}

/// Escapes text for use in element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Placeholder shown while a request is in flight.
pub fn render_loading(text: &str) -> String {
    format!(r#"<div class="loading">⏳ {}</div>"#, escape_html(text))
}

/// Inline error line written into a panel when its request fails.
pub fn render_error(message: &str) -> String {
    format!(
        r#"<div class="error-message">❌ Ошибка: {}</div>"#,
        escape_html(message)
    )
}

/// One-line empty state.
pub fn render_empty(text: &str) -> String {
    format!(r#"<p class="empty-state">{}</p>"#, escape_html(text))
}
