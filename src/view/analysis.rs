//! Recommendation renderers: single-model analysis, the popular models grid
//! and the full option list.

use super::format::{classes, escape_html, format_size_gb, render_empty};
use crate::types::{
    AnalysisResponse, PopularModelEntry, PopularModelsResponse, QuantizationOptions,
    Recommendation,
};

/// How a recommendation card is marked.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CardMark {
    Recommended,
    NotRecommended,
    Plain,
}

impl CardMark {
    /// `Recommended` iff the level string equals the best pick's level;
    /// otherwise `NotRecommended` when the tier does not fit.
    pub fn of(rec: &Recommendation, best_level: Option<&str>) -> Self {
        if best_level == Some(rec.level.as_str()) {
            CardMark::Recommended
        } else if !rec.can_fit {
            CardMark::NotRecommended
        } else {
            CardMark::Plain
        }
    }

    fn css_class(&self) -> &'static str {
        match self {
            CardMark::Recommended => "recommended",
            CardMark::NotRecommended => "not-recommended",
            CardMark::Plain => "",
        }
    }

    fn badge(&self) -> &'static str {
        match self {
            CardMark::Recommended => r#"<span class="badge badge-recommended">⭐ Рекомендуется</span>"#,
            CardMark::NotRecommended => r#"<span class="badge badge-warning">⚠️ Не влезает</span>"#,
            CardMark::Plain => "",
        }
    }
}

pub fn render_recommendation_card(rec: &Recommendation, best_level: Option<&str>) -> String {
    let mark = CardMark::of(rec, best_level);
    let warning = rec
        .warning
        .as_deref()
        .map(|w| format!(r#"<div class="rec-warning">{}</div>"#, escape_html(w)))
        .unwrap_or_default();

    format!(
        concat!(
            r#"<div class="{card_class}" data-level="{level}">"#,
            r#"<div class="rec-header"><span class="rec-level">{level}</span> <span class="rec-bits">{bits}-bit</span>{badge}</div>"#,
            r#"<div class="rec-body">"#,
            r#"<div>Размер: {size}</div>"#,
            r#"<div>Требуется VRAM: {required:.2} GB</div>"#,
            r#"<div>Качество: {quality}</div>"#,
            r#"</div>"#,
            "{warning}",
            r#"</div>"#
        ),
        card_class = classes("recommendation-card", &[mark.css_class()]),
        level = escape_html(&rec.level),
        bits = rec.bits,
        badge = mark.badge(),
        size = format_size_gb(rec.estimated_size_gb),
        required = rec.required_vram_gb,
        quality = escape_html(&rec.quality),
        warning = warning,
    )
}

/// Cards for a set of recommendations; the one matching `best_level` is
/// marked recommended.
pub fn render_recommendation_cards(recs: &[Recommendation], best_level: Option<&str>) -> String {
    recs.iter()
        .map(|rec| render_recommendation_card(rec, best_level))
        .collect()
}

pub fn render_suggestions(suggestions: &[String]) -> String {
    let items: String = suggestions
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| format!("<li>{}</li>", escape_html(s)))
        .collect();
    if items.is_empty() {
        return String::new();
    }
    format!(r#"<ul class="suggestions">{}</ul>"#, items)
}

/// Render a single-model analysis: summary header, recommendation cards,
/// the server's suggestion list and the "show all options" trigger.
pub fn render_analysis(analysis: &AnalysisResponse) -> String {
    let best_level = analysis.best_recommendation.level.as_str();
    let status = if analysis.can_load {
        r#"<span class="status-badge status-success">✅ Можно загрузить</span>"#
    } else {
        r#"<span class="status-badge status-error">⚠️ Не влезает в память</span>"#
    };

    format!(
        concat!(
            r#"<div class="analysis-header"><h3>{model}</h3>{status}"#,
            r#"<span class="model-size">Оценка размера: {size}</span></div>"#,
            r#"<div class="recommendations-grid">{cards}</div>"#,
            "{suggestions}",
            r#"<button class="btn-more" data-model="{model}">Показать все варианты</button>"#
        ),
        model = escape_html(&analysis.model_name),
        status = status,
        size = format_size_gb(analysis.estimated_size_gb),
        cards = render_recommendation_cards(&analysis.recommendation_cards(), Some(best_level)),
        suggestions = render_suggestions(&analysis.suggestions),
    )
}

/// Grid keyed by model name; entries the server marked as errored are skipped.
pub fn render_popular_models(response: &PopularModelsResponse) -> String {
    let cards: String = response
        .popular_models
        .iter()
        .filter_map(|(name, entry)| match entry {
            PopularModelEntry::Failed { .. } => None,
            PopularModelEntry::Analyzed {
                estimated_size_gb,
                can_load,
                best_recommendation,
            } => Some(render_popular_card(
                name,
                *estimated_size_gb,
                *can_load,
                best_recommendation,
            )),
        })
        .collect();

    if cards.is_empty() {
        return render_empty("Нет данных по популярным моделям");
    }
    format!(r#"<div class="popular-grid">{}</div>"#, cards)
}

fn render_popular_card(name: &str, size_gb: f64, can_load: bool, best: &Recommendation) -> String {
    let (class, status) = if can_load {
        ("can-load", "✅ Влезает")
    } else {
        ("cannot-load", "❌ Не влезает")
    };
    format!(
        concat!(
            r#"<div class="{card_class}" data-model="{name}">"#,
            r#"<h4>{name}</h4>"#,
            r#"<div>Размер: {size}</div>"#,
            r#"<div class="load-status">{status}</div>"#,
            r#"<div>Лучший вариант: <strong>{level}</strong> ({bits}-bit, {quality})</div>"#,
            r#"</div>"#
        ),
        card_class = classes("popular-card", &[class]),
        name = escape_html(name),
        size = format_size_gb(size_gb),
        status = status,
        level = escape_html(&best.level),
        bits = best.bits,
        quality = escape_html(&best.quality),
    )
}

/// Full option list for a model. `best_level` comes from a previous analysis
/// when one is known.
pub fn render_quantization_options(options: &QuantizationOptions, best_level: Option<&str>) -> String {
    format!(
        concat!(
            r#"<div class="options-section">"#,
            r#"<h4>Все варианты для {model}</h4>"#,
            r#"<p class="gpu-constraints">Свободно VRAM: {free:.2} GB из {total:.2} GB</p>"#,
            r#"<div class="recommendations-grid">{cards}</div>"#,
            r#"</div>"#
        ),
        model = escape_html(&options.model_name),
        free = options.gpu_constraints.free_vram_gb,
        total = options.gpu_constraints.total_vram_gb,
        cards = render_recommendation_cards(&options.quantization_options, best_level),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn rec(level: &str, bits: u32, can_fit: bool) -> Recommendation {
        Recommendation {
            level: level.to_string(),
            bits,
            estimated_size_gb: 14.5 * bits as f64 / 32.0,
            required_vram_gb: 14.5 * bits as f64 / 32.0 * 1.2,
            can_fit,
            quality: "good".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_exactly_one_card_is_recommended() {
        let recs = vec![
            rec("4bit", 4, true),
            rec("q4", 4, true),
            rec("8bit", 8, true),
            rec("fp16", 16, false),
            rec("fp32", 32, false),
        ];
        let html = render_recommendation_cards(&recs, Some("8bit"));
        assert_eq!(html.matches("recommendation-card recommended").count(), 1);
        assert!(html.contains(r#"class="recommendation-card recommended" data-level="8bit""#));
        assert_eq!(html.matches("recommendation-card not-recommended").count(), 2);
    }

    #[test]
    fn test_best_match_is_by_level_string() {
        // A distinct value with the same level string still matches.
        let best = rec("4bit", 4, false);
        let other = Recommendation {
            quality: "different".to_string(),
            ..best.clone()
        };
        assert_eq!(CardMark::of(&other, Some(best.level.as_str())), CardMark::Recommended);
        assert_eq!(CardMark::of(&rec("fp16", 16, false), Some("4bit")), CardMark::NotRecommended);
        assert_eq!(CardMark::of(&rec("fp16", 16, true), Some("4bit")), CardMark::Plain);
        assert_eq!(CardMark::of(&rec("fp16", 16, true), None), CardMark::Plain);
    }

    #[test]
    fn test_analysis_renders_cards_and_suggestions() {
        let analysis = AnalysisResponse {
            model_name: "Qwen/Qwen2.5-7B-Instruct".to_string(),
            estimated_size_gb: 14.5,
            can_load: true,
            best_recommendation: rec("4bit", 4, true),
            alternative_recommendations: vec![rec("8bit", 8, true)],
            suggestions: vec![
                "💾 Размер модели: 14.5 GB".to_string(),
                "\n🔧 Альтернативные варианты:".to_string(),
            ],
            ..Default::default()
        };
        let html = render_analysis(&analysis);
        assert!(html.contains("Qwen/Qwen2.5-7B-Instruct"));
        assert!(html.contains("✅ Можно загрузить"));
        assert!(html.contains("14.5 GB"));
        assert_eq!(html.matches("<li>").count(), 2);
        assert!(html.contains("<li>🔧 Альтернативные варианты:</li>"));
        assert_eq!(html.matches("recommendation-card recommended").count(), 1);
    }

    #[test]
    fn test_popular_grid_skips_errored_entries() {
        let mut popular_models = IndexMap::new();
        popular_models.insert(
            "google/flan-t5-large".to_string(),
            PopularModelEntry::Failed {
                error: "boom".to_string(),
            },
        );
        popular_models.insert(
            "mistralai/Mistral-7B-Instruct-v0.2".to_string(),
            PopularModelEntry::Analyzed {
                estimated_size_gb: 14.0,
                can_load: false,
                best_recommendation: rec("4bit", 4, false),
            },
        );
        let response = PopularModelsResponse {
            popular_models,
            ..Default::default()
        };
        let html = render_popular_models(&response);
        assert!(html.contains("mistralai/Mistral-7B-Instruct-v0.2"));
        assert!(html.contains("❌ Не влезает"));
        assert!(!html.contains("flan-t5"));
        assert!(!html.contains("boom"));
    }

    #[test]
    fn test_popular_grid_all_errored_is_empty_state() {
        let mut popular_models = IndexMap::new();
        popular_models.insert(
            "a".to_string(),
            PopularModelEntry::Failed {
                error: "x".to_string(),
            },
        );
        let response = PopularModelsResponse {
            popular_models,
            ..Default::default()
        };
        assert!(render_popular_models(&response).contains("empty-state"));
    }

    #[test]
    fn test_suggestions_empty_renders_nothing() {
        assert_eq!(render_suggestions(&[]), "");
        assert_eq!(render_suggestions(&["  ".to_string()]), "");
    }
}
