//! GPU panel renderer

use super::format::{MemoryPressure, classes, escape_html, render_empty};
use crate::types::{GpuInfo, GpuInventory};

/// Render the GPU panel: availability header plus one card per device.
pub fn render_gpu_info(inventory: &GpuInventory) -> String {
    if !inventory.available {
        let error = inventory.error.as_deref().unwrap_or("Неизвестная ошибка");
        return format!(
            concat!(
                r#"<div class="gpu-status unavailable">"#,
                r#"<h3>❌ Не доступен</h3>"#,
                r#"<p class="error-text">{}</p>"#,
                r#"</div>"#
            ),
            escape_html(error)
        );
    }

    let mut html = String::from(r#"<div class="gpu-status available"><h3>✅ Доступен</h3></div>"#);
    if inventory.gpus.is_empty() {
        html.push_str(&render_empty("GPU не обнаружены"));
        return html;
    }

    html.push_str(r#"<div class="gpu-grid">"#);
    for (device, gpu) in &inventory.gpus {
        let primary = inventory.primary_gpu.as_deref() == Some(device.as_str());
        html.push_str(&render_gpu_card(device, gpu, primary));
    }
    html.push_str("</div>");
    html
}

pub fn render_gpu_card(device: &str, gpu: &GpuInfo, primary: bool) -> String {
    let free_percent = gpu.free_percent();
    let pressure = MemoryPressure::from_percent(free_percent).css_class();
    let primary_badge = if primary {
        r#"<span class="badge badge-primary">основной</span>"#
    } else {
        ""
    };

    format!(
        concat!(
            r#"<div class="{card_class}">"#,
            r#"<div class="gpu-header"><span class="gpu-id">{device}</span> <strong>{name}</strong>{primary}</div>"#,
            r#"<div class="gpu-stats">"#,
            r#"<div>Всего: {total:.2} GB</div>"#,
            r#"<div>Занято: {allocated:.2} GB</div>"#,
            r#"<div>Свободно: {free:.2} GB ({percent:.1}%)</div>"#,
            r#"<div>Compute: {cc}</div>"#,
            r#"</div>"#,
            r#"<div class="progress-bar"><div class="{fill_class}" style="width: {percent:.1}%"></div></div>"#,
            r#"</div>"#
        ),
        card_class = classes("gpu-card", &[pressure]),
        device = escape_html(device),
        name = escape_html(&gpu.name),
        primary = primary_badge,
        total = gpu.total_gb,
        allocated = gpu.allocated_gb,
        free = gpu.free_gb,
        percent = free_percent,
        cc = escape_html(&gpu.compute_capability),
        fill_class = classes("progress-fill", &[pressure]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn gpu(free: f64, total: f64) -> GpuInfo {
        GpuInfo {
            name: "NVIDIA RTX A6000".to_string(),
            total_gb: total,
            allocated_gb: total - free,
            free_gb: free,
            compute_capability: "8.6".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_unavailable_gpu_renders_error_without_cards() {
        let inventory: GpuInventory =
            serde_json::from_str(r#"{"available": false, "error": "no driver"}"#).unwrap();
        let html = render_gpu_info(&inventory);
        assert!(html.contains("❌ Не доступен"));
        assert!(html.contains("no driver"));
        assert!(!html.contains("gpu-card"));
    }

    #[test]
    fn test_card_styling_follows_free_percentage() {
        assert!(render_gpu_card("cuda:0", &gpu(5.0, 40.0), false).contains(r#"class="gpu-card danger""#));
        assert!(render_gpu_card("cuda:0", &gpu(12.0, 40.0), false).contains(r#"class="gpu-card warning""#));
        let neutral = render_gpu_card("cuda:0", &gpu(30.0, 40.0), false);
        assert!(neutral.contains(r#"class="gpu-card""#));
        assert!(neutral.contains("width: 75.0%"));
    }

    #[test]
    fn test_available_inventory_renders_every_device() {
        let mut gpus = IndexMap::new();
        gpus.insert("cuda:0".to_string(), gpu(30.0, 40.0));
        gpus.insert("cuda:1".to_string(), gpu(5.0, 40.0));
        let inventory = GpuInventory {
            available: true,
            gpus,
            primary_gpu: Some("cuda:0".to_string()),
            ..Default::default()
        };
        let html = render_gpu_info(&inventory);
        assert!(html.contains("✅ Доступен"));
        assert_eq!(html.matches(r#"<div class="gpu-card"#).count(), 2);
        assert_eq!(html.matches("badge-primary").count(), 1);
    }

    #[test]
    fn test_devices_render_in_server_order() {
        let mut gpus = IndexMap::new();
        gpus.insert("cuda:2".to_string(), gpu(30.0, 40.0));
        gpus.insert("cuda:10".to_string(), gpu(30.0, 40.0));
        let inventory = GpuInventory {
            available: true,
            gpus,
            ..Default::default()
        };
        let html = render_gpu_info(&inventory);
        let second = html.find("cuda:2").unwrap();
        let tenth = html.find("cuda:10").unwrap();
        assert!(second < tenth);
    }

    #[test]
    fn test_available_without_devices_shows_empty_state() {
        let inventory = GpuInventory {
            available: true,
            ..Default::default()
        };
        assert!(render_gpu_info(&inventory).contains("GPU не обнаружены"));
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let card = gpu(12.0, 40.0);
        assert_eq!(
            render_gpu_card("cuda:0", &card, true),
            render_gpu_card("cuda:0", &card, true)
        );
    }
}
