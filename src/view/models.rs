//! Model cache and memory renderers

use super::format::{display_name, escape_html, format_size, path_label, render_empty, render_error};
use crate::types::{CachedModel, Health, LoadedModels, ModelActionResponse, ModelDiscovery};

pub fn render_model_list(discovery: &ModelDiscovery) -> String {
    if let Some(error) = &discovery.error {
        return render_error(error);
    }
    if discovery.models.is_empty() {
        return render_empty("Модели в кеше не найдены");
    }

    let cards: String = discovery.models.iter().map(render_model_card).collect();
    let cache = discovery
        .cache_path
        .as_deref()
        .map(|p| format!(r#" <span class="cache-path">({})</span>"#, escape_html(p)))
        .unwrap_or_default();
    format!(
        r#"<p class="summary">Моделей в кеше: {}{}</p><div class="models-grid">{}</div>"#,
        discovery.total_models, cache, cards
    )
}

fn render_model_card(model: &CachedModel) -> String {
    let kind = model
        .model_type
        .as_deref()
        .or(model.kind.as_deref())
        .unwrap_or("unknown");
    let architecture = model
        .architecture
        .as_deref()
        .map(|a| format!("<div>Архитектура: {}</div>", escape_html(a)))
        .unwrap_or_default();

    format!(
        concat!(
            r#"<div class="model-card" data-model="{id}">"#,
            r#"<h4>{name}</h4>"#,
            r#"<div>Размер: {size}</div>"#,
            r#"<div>Тип: {kind}</div>"#,
            "{architecture}",
            r#"<div class="model-path" title="{path}">📁 {label}</div>"#,
            r#"<div class="model-actions">"#,
            r#"<button class="btn-load" data-model="{id}">Загрузить</button>"#,
            r#"<button class="btn-unload" data-model="{id}">Выгрузить</button>"#,
            r#"</div>"#,
            r#"</div>"#
        ),
        id = escape_html(&model.name),
        name = escape_html(&display_name(&model.name, model.display_name.as_deref())),
        size = format_size(model.size_mb),
        kind = escape_html(kind),
        architecture = architecture,
        path = escape_html(&model.path),
        label = escape_html(path_label(&model.path)),
    )
}

pub fn render_loaded_models(loaded: &LoadedModels) -> String {
    if loaded.loaded_models.is_empty() {
        return render_empty("Нет загруженных моделей");
    }

    let items: String = loaded
        .loaded_models
        .iter()
        .map(|(name, kind)| {
            format!(
                r#"<li><strong>{}</strong> <span class="badge">{}</span></li>"#,
                escape_html(&display_name(name, None)),
                escape_html(kind)
            )
        })
        .collect();
    format!(
        concat!(
            r#"<p class="summary">Загружено: {total} (эмбеддинги: {embedding}, LLM: {llm})</p>"#,
            r#"<ul class="loaded-models">{items}</ul>"#
        ),
        total = loaded.stats.total_loaded,
        embedding = loaded.stats.embedding_models,
        llm = loaded.stats.llm_models,
        items = items,
    )
}

pub fn render_model_action(response: &ModelActionResponse) -> String {
    let (class, icon) = match response.status.as_str() {
        "success" => ("status-success", "✅"),
        "warning" => ("status-warning", "⚠️"),
        _ => ("status-info", "ℹ️"),
    };
    format!(
        r#"<div class="model-action {}">{} {}</div>"#,
        class,
        icon,
        escape_html(&response.message)
    )
}

pub fn render_health(health: &Health) -> String {
    let (class, icon) = if health.status == "healthy" {
        ("status-success", "🟢")
    } else {
        ("status-error", "🔴")
    };
    format!(
        r#"<span class="server-status {}">{} {} ({})</span>"#,
        class,
        icon,
        escape_html(&health.service),
        escape_html(&health.status)
    )
}
