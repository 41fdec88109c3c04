//! Tab controller
//!
//! Mutually exclusive panels, the load action tied to each, and per-panel
//! cancellation of in-flight loads.

use std::collections::HashMap;
use tokio_util::sync::CancellationToken;

/// Dashboard panels. Exactly one is active at a time.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
pub enum Panel {
    Gpu,
    Analyze,
    Popular,
    Quantize,
    Quantized,
    Models,
}

impl Panel {
    pub fn title(&self) -> &'static str {
        match self {
            Panel::Gpu => "🎮 GPU",
            Panel::Analyze => "🔍 Анализ модели",
            Panel::Popular => "⭐ Популярные модели",
            Panel::Quantize => "⚙️ Квантование",
            Panel::Quantized => "📦 Квантованные модели",
            Panel::Models => "🗂️ Модели",
        }
    }

    /// Data load triggered when this panel becomes active, if any.
    pub fn load_action(&self) -> Option<LoadAction> {
        match self {
            Panel::Gpu => Some(LoadAction::GpuAnalysis),
            Panel::Quantized => Some(LoadAction::QuantizedModels),
            _ => None,
        }
    }
}

/// Fetch-and-render actions that run without user input.
#[derive(Debug, Copy, Clone, PartialEq, Eq, strum::Display)]
pub enum LoadAction {
    GpuAnalysis,
    QuantizedModels,
}

/// The control that triggered a tab switch. It becomes the highlighted tab
/// button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveElement {
    pub panel: Panel,
    pub label: String,
}

impl ActiveElement {
    pub fn tab_button(panel: Panel) -> Self {
        Self {
            panel,
            label: panel.title().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TabController {
    active: Panel,
    highlighted: ActiveElement,
}

impl TabController {
    /// Starts with `active` marked active, as the document does on load.
    pub fn new(active: Panel) -> Self {
        Self {
            active,
            highlighted: ActiveElement::tab_button(active),
        }
    }

    pub fn is_active(&self, panel: Panel) -> bool {
        self.active == panel
    }

    pub fn highlighted(&self) -> &ActiveElement {
        &self.highlighted
    }

    /// Activates `panel`, highlights the element that triggered the switch and
    /// returns the load action the panel needs.
    pub fn switch_tab(&mut self, panel: Panel, active_element: ActiveElement) -> Option<LoadAction> {
        log::debug!("Switching to panel {} via '{}'", panel, active_element.label);
        self.active = panel;
        self.highlighted = active_element;
        panel.load_action()
    }

    /// Load action for the panel active at page load.
    pub fn initial_load(&self) -> Option<LoadAction> {
        self.active.load_action()
    }
}

impl Default for TabController {
    fn default() -> Self {
        Self::new(Panel::Gpu)
    }
}

/// In-flight load per panel. Starting a new load for a panel cancels the
/// previous one so a stale response never overwrites a newer render.
#[derive(Debug, Default)]
pub struct PanelLoads {
    parent: CancellationToken,
    tokens: HashMap<Panel, CancellationToken>,
}

impl PanelLoads {
    /// Every load token is a child of `parent`, so cancelling it stops all loads.
    pub fn with_parent(parent: CancellationToken) -> Self {
        Self {
            parent,
            tokens: HashMap::new(),
        }
    }

    pub fn begin(&mut self, panel: Panel) -> CancellationToken {
        let token = self.parent.child_token();
        if let Some(previous) = self.tokens.insert(panel, token.clone()) {
            previous.cancel();
        }
        token
    }

    pub fn cancel_all(&mut self) {
        for (_, token) in self.tokens.drain() {
            token.cancel();
        }
    }
}

/// Runs `fut` unless `token` is cancelled first.
pub async fn unless_cancelled<F, T>(token: &CancellationToken, fut: F) -> Option<T>
where
    F: std::future::Future<Output = T>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => None,
        value = fut => Some(value),
    }
}
