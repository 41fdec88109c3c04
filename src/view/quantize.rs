//! Quantization job result renderer

use super::format::{escape_html, path_label};
use crate::types::{QuantizeResponse, QuantizeStatus};

const PENDING_FALLBACK: &str = "Квантование выполняется...";

/// Render the outcome of a quantization request.
///
/// `already_exists` shows the server message as is, `completed` adds a check
/// mark and the output path, anything else is shown as still pending.
pub fn render_quantize_result(response: &QuantizeResponse) -> String {
    match response.status() {
        QuantizeStatus::AlreadyExists => format!(
            r#"<div class="quantize-result status-info"><p>{}</p></div>"#,
            escape_html(&response.message)
        ),
        QuantizeStatus::Completed => {
            let path = response
                .quantized_path
                .as_deref()
                .map(|p| {
                    format!(
                        r#"<p class="output-path" title="{full}">Путь: <code>{full}</code> ({label})</p>"#,
                        full = escape_html(p),
                        label = escape_html(path_label(p)),
                    )
                })
                .unwrap_or_default();
            format!(
                r#"<div class="quantize-result status-success"><p>✅ {}</p>{}</div>"#,
                escape_html(&response.message),
                path
            )
        }
        QuantizeStatus::Pending(_) => {
            let message = if response.message.is_empty() {
                PENDING_FALLBACK
            } else {
                response.message.as_str()
            };
            format!(
                r#"<div class="quantize-result status-pending"><p>⏳ {}</p></div>"#,
                escape_html(message)
            )
        }
    }
}
