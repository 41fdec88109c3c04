//! Action handlers
//!
//! Each handler makes at most one API call, renders the result into the
//! container it was given and raises notifications. Failures are logged,
//! rendered inline and never returned to the caller, so one failed panel
//! leaves the others untouched.

use crate::api::{ApiError, DashboardApi};
use crate::controller::LoadAction;
use crate::events::Notifications;
use crate::page::{Container, ContainerId, Page};
use crate::types::{AnalysisResponse, QuantizeStatus};
use crate::view;
use thiserror::Error;

/// Input rejected before any request is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Введите название модели")]
    EmptyModelName,
}

/// Trimmed model name, or an error when nothing was entered.
pub fn require_model_name(input: &str) -> Result<&str, ValidationError> {
    let name = input.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyModelName);
    }
    Ok(name)
}

/// Value of the "custom model" entry in the model picker.
pub const CUSTOM_MODEL_OPTION: &str = "custom";

/// A model picked from the list, or typed in when the custom entry is selected.
pub fn selected_model<'a>(selected: &'a str, custom_input: &'a str) -> &'a str {
    if selected == CUSTOM_MODEL_OPTION {
        custom_input
    } else {
        selected
    }
}

fn report_failure(action: &str, error: &ApiError, target: &mut Container) {
    log::error!("{} failed: {}", action, error);
    target.replace(view::render_error(&error.display_message()));
}

/// GPU panel auto-load. Errors are only shown inline; returns whether data
/// was rendered.
pub async fn load_gpu_info(api: &dyn DashboardApi, target: &mut Container) -> bool {
    target.replace(view::render_loading("Загрузка информации о GPU..."));
    match api.gpu_info().await {
        Ok(inventory) => {
            target.replace(view::render_gpu_info(&inventory));
            true
        }
        Err(e) => {
            report_failure("GPU info", &e, target);
            false
        }
    }
}

/// Analyzes one model. Returns the analysis so the caller can remember the
/// best pick for a later "show all options".
pub async fn analyze_model(
    api: &dyn DashboardApi,
    model_name: &str,
    target: &mut Container,
    notes: &mut Notifications,
) -> Option<AnalysisResponse> {
    let model_name = match require_model_name(model_name) {
        Ok(name) => name,
        Err(e) => {
            notes.error(e.to_string());
            return None;
        }
    };

    target.replace(view::render_loading(&format!("Анализ {}...", model_name)));
    match api.analyze(model_name).await {
        Ok(analysis) => {
            target.replace(view::render_analysis(&analysis));
            notes.success(format!("Анализ {} завершен", analysis.model_name));
            Some(analysis)
        }
        Err(e) => {
            report_failure("Model analysis", &e, target);
            notes.error(format!("Ошибка анализа: {}", e.display_message()));
            None
        }
    }
}

/// Batch analysis of the server's popular models list.
pub async fn analyze_popular_models(
    api: &dyn DashboardApi,
    target: &mut Container,
    notes: &mut Notifications,
) {
    target.replace(view::render_loading("Анализ популярных моделей..."));
    match api.popular_models().await {
        Ok(response) => target.replace(view::render_popular_models(&response)),
        Err(e) => {
            report_failure("Popular models analysis", &e, target);
            notes.error(format!("Ошибка анализа: {}", e.display_message()));
        }
    }
}

/// Starts quantization and shows the job outcome.
pub async fn start_quantization(
    api: &dyn DashboardApi,
    model_name: &str,
    level: &str,
    target: &mut Container,
    notes: &mut Notifications,
) {
    let model_name = match require_model_name(model_name) {
        Ok(name) => name,
        Err(e) => {
            notes.error(e.to_string());
            return;
        }
    };

    target.replace(view::render_loading(&format!(
        "Запуск квантования {} ({})...",
        model_name, level
    )));
    match api.quantize(model_name, level).await {
        Ok(response) => {
            target.replace(view::render_quantize_result(&response));
            match response.status() {
                QuantizeStatus::AlreadyExists | QuantizeStatus::Completed => {
                    notes.success(response.message.clone())
                }
                QuantizeStatus::Pending(_) => {
                    notes.info(format!("Квантование {} ({}) запущено", model_name, level))
                }
            };
        }
        Err(e) => {
            report_failure("Quantization", &e, target);
            notes.error(format!("Ошибка квантования: {}", e.display_message()));
        }
    }
}

/// Appends the full option list after whatever the container already shows.
pub async fn append_more_options(
    api: &dyn DashboardApi,
    model_name: &str,
    best_level: Option<&str>,
    target: &mut Container,
    notes: &mut Notifications,
) {
    let model_name = match require_model_name(model_name) {
        Ok(name) => name,
        Err(e) => {
            notes.error(e.to_string());
            return;
        }
    };

    match api.quantization_options(model_name).await {
        Ok(options) => {
            target.append(&view::render_quantization_options(&options, best_level));
        }
        Err(e) => {
            log::error!("Quantization options failed: {}", e);
            target.append(&view::render_error(&e.display_message()));
            notes.error(format!("Ошибка загрузки вариантов: {}", e.display_message()));
        }
    }
}

/// Quantized models auto-load. Errors are only shown inline.
pub async fn load_quantized_models(api: &dyn DashboardApi, target: &mut Container) -> bool {
    target.replace(view::render_loading("Загрузка квантованных моделей..."));
    match api.quantized_models().await {
        Ok(response) => {
            target.replace(view::render_quantized_models(&response));
            true
        }
        Err(e) => {
            report_failure("Quantized models", &e, target);
            false
        }
    }
}

pub async fn load_model_list(
    api: &dyn DashboardApi,
    target: &mut Container,
    notes: &mut Notifications,
) {
    target.replace(view::render_loading("Сканирование кеша моделей..."));
    match api.discover_models().await {
        Ok(discovery) => target.replace(view::render_model_list(&discovery)),
        Err(e) => {
            report_failure("Model discovery", &e, target);
            notes.error(format!("Ошибка сканирования: {}", e.display_message()));
        }
    }
}

pub async fn load_loaded_models(api: &dyn DashboardApi, target: &mut Container) -> bool {
    target.replace(view::render_loading("Загрузка списка..."));
    match api.loaded_models().await {
        Ok(loaded) => {
            target.replace(view::render_loaded_models(&loaded));
            true
        }
        Err(e) => {
            report_failure("Loaded models", &e, target);
            false
        }
    }
}

pub async fn load_model_into_memory(
    api: &dyn DashboardApi,
    model_name: &str,
    target: &mut Container,
    notes: &mut Notifications,
) {
    let model_name = match require_model_name(model_name) {
        Ok(name) => name,
        Err(e) => {
            notes.error(e.to_string());
            return;
        }
    };

    target.replace(view::render_loading(&format!("Загрузка {}...", model_name)));
    match api.load_model(model_name).await {
        Ok(response) => {
            target.replace(view::render_model_action(&response));
            notes.success(response.message);
        }
        Err(e) => {
            report_failure("Model load", &e, target);
            notes.error(format!("Ошибка загрузки: {}", e.display_message()));
        }
    }
}

pub async fn unload_model_from_memory(
    api: &dyn DashboardApi,
    model_name: &str,
    target: &mut Container,
    notes: &mut Notifications,
) {
    let model_name = match require_model_name(model_name) {
        Ok(name) => name,
        Err(e) => {
            notes.error(e.to_string());
            return;
        }
    };

    target.replace(view::render_loading(&format!("Выгрузка {}...", model_name)));
    match api.unload_model(model_name).await {
        Ok(response) => {
            target.replace(view::render_model_action(&response));
            if response.status == "success" {
                notes.success(response.message);
            } else {
                notes.info(response.message);
            }
        }
        Err(e) => {
            report_failure("Model unload", &e, target);
            notes.error(format!("Ошибка выгрузки: {}", e.display_message()));
        }
    }
}

/// Outcome of a health check, after it has been rendered.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HealthCheck {
    Healthy,
    /// The server answered, with an error status or a non-healthy report.
    Unhealthy,
    /// No HTTP response at all.
    Unreachable,
}

pub async fn check_health(api: &dyn DashboardApi, target: &mut Container) -> HealthCheck {
    match api.health().await {
        Ok(health) => {
            target.replace(view::render_health(&health));
            if health.status == "healthy" {
                HealthCheck::Healthy
            } else {
                HealthCheck::Unhealthy
            }
        }
        Err(e) => {
            log::warn!("Health check against {} failed: {}", api.base_url(), e);
            target.replace(r#"<span class="server-status status-error">🔴 Сервер недоступен</span>"#);
            match e.status() {
                Some(_) => HealthCheck::Unhealthy,
                None => HealthCheck::Unreachable,
            }
        }
    }
}

/// Runs a panel's automatic load into its container on `page`.
pub async fn run_load_action(api: &dyn DashboardApi, action: LoadAction, page: &mut Page) -> bool {
    match action {
        LoadAction::GpuAnalysis => {
            let (target, _) = page.target(ContainerId::GpuInfo);
            load_gpu_info(api, target).await
        }
        LoadAction::QuantizedModels => {
            let (target, _) = page.target(ContainerId::QuantizedModels);
            load_quantized_models(api, target).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockDashboardApi;
    use crate::events::Severity;
    use crate::types::{
        GpuInventory, QuantizationOptions, QuantizeResponse, QuantizedModelsResponse,
        Recommendation,
    };

    fn http_error(status: u16) -> ApiError {
        ApiError::Http {
            status,
            message: r#"{"detail":"boom"}"#.to_string(),
        }
    }

    fn quantize_response(status: &str, message: &str) -> QuantizeResponse {
        QuantizeResponse {
            status: status.to_string(),
            message: message.to_string(),
            quantized_path: Some("storage/models/quantized/org--m--4bit".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_require_model_name() {
        assert_eq!(require_model_name("  org/m "), Ok("org/m"));
        assert_eq!(require_model_name("   "), Err(ValidationError::EmptyModelName));
    }

    #[test]
    fn test_selected_model_uses_custom_input() {
        assert_eq!(selected_model("custom", "my/model"), "my/model");
        assert_eq!(selected_model("org/listed", "ignored"), "org/listed");
    }

    #[tokio::test]
    /// An empty model name makes no request and raises exactly one error.
    async fn test_empty_model_name_short_circuits() {
        let mut mock = MockDashboardApi::new();
        mock.expect_quantize().never();
        let mut target = Container::new(ContainerId::QuantizeResult);
        let mut notes = Notifications::new();

        start_quantization(&mock, "  ", "4bit", &mut target, &mut notes).await;

        assert_eq!(notes.len(), 1);
        assert_eq!(notes.count(Severity::Error), 1);
        assert!(target.is_empty());
    }

    #[tokio::test]
    async fn test_analyze_with_empty_name_makes_no_call() {
        let mut mock = MockDashboardApi::new();
        mock.expect_analyze().never();
        let mut target = Container::new(ContainerId::AnalysisResult);
        let mut notes = Notifications::new();

        let result = analyze_model(&mock, "", &mut target, &mut notes).await;
        assert!(result.is_none());
        assert_eq!(notes.count(Severity::Error), 1);
    }

    #[tokio::test]
    async fn test_already_exists_notifies_success_without_check_mark() {
        let mut mock = MockDashboardApi::new();
        mock.expect_quantize()
            .withf(|name: &str, level: &str| name == "org/m" && level == "8bit")
            .times(1)
            .returning(|_, _| Ok(quantize_response("already_exists", "уже существует")));
        let mut target = Container::new(ContainerId::QuantizeResult);
        let mut notes = Notifications::new();

        start_quantization(&mock, "org/m", "8bit", &mut target, &mut notes).await;

        assert!(target.html().contains("уже существует"));
        assert!(!target.html().contains('✅'));
        assert_eq!(notes.count(Severity::Success), 1);
        assert_eq!(notes.len(), 1);
    }

    #[tokio::test]
    async fn test_completed_renders_path_and_pending_renders_hourglass() {
        let mut mock = MockDashboardApi::new();
        let mut statuses = vec!["queued", "completed"];
        mock.expect_quantize()
            .times(2)
            .returning(move |_, _| Ok(quantize_response(statuses.pop().unwrap_or("queued"), "ok")));
        let mut target = Container::new(ContainerId::QuantizeResult);
        let mut notes = Notifications::new();

        start_quantization(&mock, "org/m", "4bit", &mut target, &mut notes).await;
        assert!(target.html().contains("✅ ok"));
        assert!(target.html().contains("org--m--4bit"));
        assert_eq!(notes.count(Severity::Success), 1);

        start_quantization(&mock, "org/m", "4bit", &mut target, &mut notes).await;
        assert!(target.html().contains("⏳ ok"));
        assert!(!target.html().contains('✅'));
        assert_eq!(notes.count(Severity::Info), 1);
    }

    #[tokio::test]
    async fn test_quantize_failure_renders_inline_and_notifies() {
        let mut mock = MockDashboardApi::new();
        mock.expect_quantize().returning(|_, _| Err(http_error(500)));
        let mut target = Container::new(ContainerId::QuantizeResult);
        let mut notes = Notifications::new();

        start_quantization(&mock, "org/m", "4bit", &mut target, &mut notes).await;

        assert!(target.html().contains("error-message"));
        assert!(target.html().contains("HTTP 500: boom"));
        assert_eq!(notes.count(Severity::Error), 1);
    }

    #[tokio::test]
    async fn test_gpu_unavailable_end_to_end() {
        let mut mock = MockDashboardApi::new();
        mock.expect_gpu_info().times(1).returning(|| {
            Ok(serde_json::from_str::<GpuInventory>(
                r#"{"available": false, "error": "no driver"}"#,
            )
            .unwrap())
        });
        let mut target = Container::new(ContainerId::GpuInfo);

        load_gpu_info(&mock, &mut target).await;

        assert!(target.html().contains("❌ Не доступен"));
        assert!(target.html().contains("no driver"));
        assert!(!target.html().contains("gpu-card"));
    }

    #[tokio::test]
    async fn test_empty_quantized_list_renders_empty_state() {
        let mut mock = MockDashboardApi::new();
        mock.expect_quantized_models()
            .returning(|| Ok(QuantizedModelsResponse::default()));
        let mut target = Container::new(ContainerId::QuantizedModels);

        load_quantized_models(&mock, &mut target).await;

        assert!(target.html().contains("Квантованные модели не найдены"));
        assert!(!target.html().contains("model-card"));
    }

    #[tokio::test]
    async fn test_analysis_then_more_options_appends() {
        let mut mock = MockDashboardApi::new();
        mock.expect_analyze().returning(|name| {
            Ok(AnalysisResponse {
                model_name: name.to_string(),
                can_load: true,
                best_recommendation: Recommendation {
                    level: "4bit".to_string(),
                    bits: 4,
                    can_fit: true,
                    ..Default::default()
                },
                ..Default::default()
            })
        });
        mock.expect_quantization_options().returning(|name| {
            Ok(QuantizationOptions {
                model_name: name.to_string(),
                quantization_options: vec![
                    Recommendation {
                        level: "4bit".to_string(),
                        can_fit: true,
                        ..Default::default()
                    },
                    Recommendation {
                        level: "fp32".to_string(),
                        can_fit: false,
                        ..Default::default()
                    },
                ],
                ..Default::default()
            })
        });
        let mut target = Container::new(ContainerId::AnalysisResult);
        let mut notes = Notifications::new();

        let analysis = analyze_model(&mock, "org/m", &mut target, &mut notes)
            .await
            .expect("analysis");
        let before = target.html().to_string();
        let best = analysis.best_recommendation.level.clone();
        append_more_options(&mock, "org/m", Some(&best), &mut target, &mut notes).await;

        assert!(target.html().starts_with(&before));
        assert!(target.html().contains("Все варианты для org/m"));
        assert!(target.html().contains("recommendation-card not-recommended"));
        assert_eq!(notes.count(Severity::Success), 1);
    }

    #[tokio::test]
    async fn test_health_failure_is_rendered_not_returned() {
        let mut mock = MockDashboardApi::new();
        mock.expect_health().returning(|| Err(http_error(502)));
        mock.expect_base_url().return_const("http://localhost:8000".to_string());
        let mut target = Container::new(ContainerId::ServerStatus);

        let outcome = check_health(&mock, &mut target).await;

        assert_eq!(outcome, HealthCheck::Unhealthy);
        assert!(target.html().contains("🔴 Сервер недоступен"));
    }

    #[tokio::test]
    async fn test_health_reports_healthy_and_degraded() {
        let mut mock = MockDashboardApi::new();
        let mut statuses = vec!["degraded", "healthy"];
        mock.expect_health().times(2).returning(move || {
            Ok(crate::types::Health {
                status: statuses.pop().unwrap_or("degraded").to_string(),
                service: "ai-server".to_string(),
            })
        });
        let mut target = Container::new(ContainerId::ServerStatus);

        assert_eq!(check_health(&mock, &mut target).await, HealthCheck::Healthy);
        assert!(target.html().contains("🟢"));
        assert_eq!(check_health(&mock, &mut target).await, HealthCheck::Unhealthy);
        assert!(target.html().contains("🔴"));
    }

    #[tokio::test]
    async fn test_failed_panel_does_not_touch_other_containers() {
        let mut mock = MockDashboardApi::new();
        mock.expect_popular_models()
            .returning(|| Err(http_error(503)));
        mock.expect_quantized_models()
            .returning(|| Ok(QuantizedModelsResponse::default()));
        let mut page = Page::new(crate::controller::Panel::Popular);

        {
            let (target, notes) = page.target(ContainerId::PopularModels);
            analyze_popular_models(&mock, target, notes).await;
        }
        run_load_action(&mock, LoadAction::QuantizedModels, &mut page).await;

        assert!(page.container(ContainerId::PopularModels).html().contains("HTTP 503"));
        assert!(
            page.container(ContainerId::QuantizedModels)
                .html()
                .contains("empty-state")
        );
        assert!(page.container(ContainerId::GpuInfo).is_empty());
    }
}
