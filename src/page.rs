//! Dashboard page
//!
//! Named content containers and the document that hosts them. Handlers get
//! the container they own passed in explicitly instead of looking it up.

use crate::consts::cli_consts::NOTIFICATION_TTL_SECS;
use crate::controller::{Panel, TabController};
use crate::events::Notifications;
use crate::view::escape_html;
use std::collections::BTreeMap;
use std::time::Instant;
use strum::IntoEnumIterator;

/// Every container on the page, with its element id.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::EnumIter,
)]
pub enum ContainerId {
    #[strum(serialize = "server-status")]
    ServerStatus,
    #[strum(serialize = "gpu-info")]
    GpuInfo,
    #[strum(serialize = "analysis-result")]
    AnalysisResult,
    #[strum(serialize = "popular-models")]
    PopularModels,
    #[strum(serialize = "quantize-result")]
    QuantizeResult,
    #[strum(serialize = "quantized-models")]
    QuantizedModels,
    #[strum(serialize = "model-list")]
    ModelList,
    #[strum(serialize = "loaded-models")]
    LoadedModels,
    #[strum(serialize = "model-action")]
    ModelAction,
}

impl ContainerId {
    /// Panel hosting the container; `None` for page-level containers.
    pub fn panel(&self) -> Option<Panel> {
        match self {
            ContainerId::ServerStatus => None,
            ContainerId::GpuInfo => Some(Panel::Gpu),
            ContainerId::AnalysisResult => Some(Panel::Analyze),
            ContainerId::PopularModels => Some(Panel::Popular),
            ContainerId::QuantizeResult => Some(Panel::Quantize),
            ContainerId::QuantizedModels => Some(Panel::Quantized),
            ContainerId::ModelList | ContainerId::LoadedModels | ContainerId::ModelAction => {
                Some(Panel::Models)
            }
        }
    }
}

/// An element's inner HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    id: ContainerId,
    html: String,
}

impl Container {
    pub fn new(id: ContainerId) -> Self {
        Self {
            id,
            html: String::new(),
        }
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    /// Replaces the whole content.
    pub fn replace(&mut self, html: impl Into<String>) {
        self.html = html.into();
    }

    /// Adds a fragment after the existing content.
    pub fn append(&mut self, html: &str) {
        self.html.push_str(html);
    }

    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }
}

#[derive(Debug)]
pub struct Page {
    containers: BTreeMap<ContainerId, Container>,
    pub tabs: TabController,
    pub notifications: Notifications,
}

impl Page {
    pub fn new(active: Panel) -> Self {
        let containers = ContainerId::iter()
            .map(|id| (id, Container::new(id)))
            .collect();
        Self {
            containers,
            tabs: TabController::new(active),
            notifications: Notifications::new(),
        }
    }

    pub fn container(&self, id: ContainerId) -> &Container {
        // Every id is inserted in `new` and never removed.
        &self.containers[&id]
    }

    /// Container and notification area, borrowed together for a handler.
    pub fn target(&mut self, id: ContainerId) -> (&mut Container, &mut Notifications) {
        let container = self
            .containers
            .entry(id)
            .or_insert_with(|| Container::new(id));
        (container, &mut self.notifications)
    }

    /// Full standalone HTML document with tabs, panels and visible notifications.
    pub fn render_document(&self, server_url: &str, now: Instant) -> String {
        let mut html = String::from(DOCUMENT_HEAD);
        // Fades each notification out once its lifetime has passed.
        html.push_str(&format!(
            ".notification{{animation:notification-dismiss .3s ease-in {}s forwards}}\
             @keyframes notification-dismiss{{to{{opacity:0;visibility:hidden}}}}",
            NOTIFICATION_TTL_SECS
        ));
        html.push_str("</style></head><body>");

        html.push_str(&format!(
            r#"<header><h1>Квантование моделей</h1><span class="server-url">{}</span> <div id="{}">{}</div></header>"#,
            escape_html(server_url),
            ContainerId::ServerStatus,
            self.container(ContainerId::ServerStatus).html()
        ));

        html.push_str(r#"<nav class="tabs">"#);
        for panel in Panel::iter() {
            let class = if self.tabs.highlighted().panel == panel {
                "tab-button active"
            } else {
                "tab-button"
            };
            html.push_str(&format!(
                r#"<button class="{}" data-tab="{}">{}</button>"#,
                class,
                panel,
                panel.title()
            ));
        }
        html.push_str("</nav>");

        for panel in Panel::iter() {
            let class = if self.tabs.is_active(panel) {
                "tab-content active"
            } else {
                "tab-content"
            };
            html.push_str(&format!(r#"<section id="{}" class="{}">"#, panel, class));
            for container in self
                .containers
                .values()
                .filter(|c| c.id().panel() == Some(panel))
            {
                html.push_str(&format!(
                    r#"<div id="{}">{}</div>"#,
                    container.id(),
                    container.html()
                ));
            }
            html.push_str("</section>");
        }

        html.push_str(r#"<div class="notifications">"#);
        for note in self.notifications.active(now) {
            html.push_str(&format!(
                r#"<div class="{}">{}</div>"#,
                note.css_class(),
                escape_html(&note.msg)
            ));
        }
        html.push_str("</div></body></html>");
        html
    }
}

const DOCUMENT_HEAD: &str = concat!(
    "<!DOCTYPE html><html lang=\"ru\"><head><meta charset=\"utf-8\">",
    "<title>Квантование моделей</title><style>",
    "body{font-family:sans-serif;margin:20px;background:#f5f6fa}",
    ".tab-content{display:none}.tab-content.active{display:block}",
    ".tab-button.active{background:#3498db;color:#fff}",
    ".gpu-card,.recommendation-card,.model-card,.popular-card{background:#fff;border-radius:8px;padding:12px;margin:8px;display:inline-block;vertical-align:top}",
    ".progress-bar{background:#ecf0f1;height:8px;border-radius:4px}",
    ".progress-fill{background:#2ecc71;height:8px;border-radius:4px}",
    ".progress-fill.warning{background:#f39c12}.progress-fill.danger{background:#e74c3c}",
    ".recommended{border:2px solid #2ecc71}.not-recommended{opacity:.6}",
    ".error-message,.status-error{color:#e74c3c}.status-success{color:#27ae60}",
    ".empty-state{color:#7f8c8d;font-style:italic}",
    ".notification{position:fixed;right:20px;padding:10px;border-radius:6px;color:#fff}",
    ".notification-info{background:#3498db}.notification-success{background:#27ae60}",
    ".notification-error{background:#e74c3c}",
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_and_append_are_distinct() {
        let mut container = Container::new(ContainerId::AnalysisResult);
        container.replace("<p>a</p>");
        container.replace("<p>b</p>");
        assert_eq!(container.html(), "<p>b</p>");
        container.append("<p>c</p>");
        assert_eq!(container.html(), "<p>b</p><p>c</p>");
    }

    #[test]
    fn test_every_container_exists() {
        let page = Page::new(Panel::Gpu);
        for id in ContainerId::iter() {
            assert!(page.container(id).is_empty());
        }
    }

    #[test]
    fn test_document_marks_single_active_panel() {
        let mut page = Page::new(Panel::Quantized);
        let (container, notes) = page.target(ContainerId::QuantizedModels);
        container.replace("<p>inventory</p>");
        notes.error("boom");

        let html = page.render_document("http://localhost:8000", Instant::now());
        assert_eq!(html.matches("tab-content active").count(), 1);
        assert!(html.contains(r#"<section id="quantized" class="tab-content active">"#));
        assert!(html.contains(r#"<div id="quantized-models"><p>inventory</p></div>"#));
        assert!(html.contains(r#"<div class="notification notification-error">boom</div>"#));
    }

    #[test]
    fn test_notifications_dismiss_after_their_lifetime() {
        let mut page = Page::new(Panel::Gpu);
        page.notifications.info("loaded");

        let html = page.render_document("http://localhost:8000", Instant::now());
        let (head, body) = html.split_once("<body>").unwrap();
        assert!(head.contains("animation:notification-dismiss .3s ease-in 5s forwards"));
        assert!(head.contains("@keyframes notification-dismiss{to{opacity:0;visibility:hidden}}"));
        assert!(head.ends_with("</style></head>"));
        assert!(body.contains(r#"<div class="notification notification-info">loaded</div>"#));
    }
}
