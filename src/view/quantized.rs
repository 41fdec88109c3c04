//! Quantized model inventory renderer

use super::format::{display_name, escape_html, format_size, path_label, render_empty};
use crate::types::{QuantizedModel, QuantizedModelsResponse};

pub const EMPTY_QUANTIZED: &str = "Квантованные модели не найдены";

pub fn render_quantized_models(response: &QuantizedModelsResponse) -> String {
    if response.total_quantized == 0 {
        return render_empty(EMPTY_QUANTIZED);
    }

    let cards: String = response
        .quantized_models
        .iter()
        .map(render_quantized_card)
        .collect();
    format!(
        r#"<p class="summary">Всего: {}</p><div class="models-grid">{}</div>"#,
        response.total_quantized, cards
    )
}

fn render_quantized_card(model: &QuantizedModel) -> String {
    let size = model
        .size_mb
        .map(format_size)
        .unwrap_or_else(|| "—".to_string());

    format!(
        concat!(
            r#"<div class="model-card quantized">"#,
            r#"<h4>{name}</h4>"#,
            r#"<div>Уровень: <span class="badge">{level}</span></div>"#,
            r#"<div>Размер: {size}</div>"#,
            r#"<div class="model-path" title="{path}">📁 {label}</div>"#,
            r#"</div>"#
        ),
        name = escape_html(&display_name(&model.original_name, None)),
        level = escape_html(&model.quantization_level),
        size = size,
        path = escape_html(&model.path),
        label = escape_html(path_label(&model.path)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_count_renders_empty_state_only() {
        // Entries are ignored when the count says there are none.
        let response = QuantizedModelsResponse {
            quantized_models: vec![QuantizedModel {
                original_name: "should/not-render".to_string(),
                ..Default::default()
            }],
            total_quantized: 0,
        };
        let html = render_quantized_models(&response);
        assert_eq!(html, render_empty(EMPTY_QUANTIZED));
        assert!(!html.contains("should/not-render"));
    }

    #[test]
    fn test_cards_show_short_path_and_size() {
        let response = QuantizedModelsResponse {
            quantized_models: vec![
                QuantizedModel {
                    original_name: "Qwen/Qwen2.5-7B-Instruct".to_string(),
                    quantized_name: Some("Qwen--Qwen2.5-7B-Instruct--4bit".to_string()),
                    quantization_level: "4bit".to_string(),
                    path: r"C:\ai\storage\models\quantized\Qwen--Qwen2.5-7B-Instruct--4bit"
                        .to_string(),
                    size_mb: Some(4812.8),
                },
                QuantizedModel {
                    original_name: "org/small".to_string(),
                    quantization_level: "8bit".to_string(),
                    path: "quantized/org--small--8bit".to_string(),
                    size_mb: None,
                    ..Default::default()
                },
            ],
            total_quantized: 2,
        };
        let html = render_quantized_models(&response);
        assert_eq!(html.matches("model-card quantized").count(), 2);
        assert!(html.contains("📁 Qwen--Qwen2.5-7B-Instruct--4bit</div>"));
        assert!(html.contains("4.7 GB"));
        assert!(html.contains("Размер: —"));
    }
}
