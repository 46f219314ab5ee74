//! Metrics panel.

use crate::config::MetricsFormat;
use crate::constants::fraction_digits;
use crate::model::Metrics;
use crate::number_format::format_number;

/// Display strings for the three metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsText {
    pub area_pixels: String,
    pub volume_mm3: String,
    pub volume_ml: String,
}

pub fn format_metrics(metrics: &Metrics, format: &MetricsFormat) -> MetricsText {
    MetricsText {
        area_pixels: format_number(metrics.area_pixels, fraction_digits::AREA, format.area_locale),
        volume_mm3: format_number(
            metrics.volume_mm3,
            fraction_digits::VOLUME_MM3,
            format.volume_locale,
        ),
        volume_ml: format_number(
            metrics.volume_ml,
            fraction_digits::VOLUME_ML,
            format.volume_locale,
        ),
    }
}

pub fn render_metrics(metrics: &Metrics, format: &MetricsFormat) -> Vec<String> {
    let text = format_metrics(metrics, format);
    vec![
        "📊 Метрики сегментации".to_string(),
        format!("  📐 Площадь (пиксели): {}", text.area_pixels),
        format!("  🫘 Объем (мм³):       {}", text.volume_mm3),
        format!("  💧 Объем (мл):        {}", text.volume_ml),
        "  ✅ Сегментация завершена успешно".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::number_format::Locale;

    fn sample() -> Metrics {
        Metrics {
            area_pixels: 15234.0,
            volume_mm3: 482931.0,
            volume_ml: 482.93,
        }
    }

    #[test]
    fn test_default_formats() {
        let text = format_metrics(&sample(), &MetricsFormat::default());
        assert_eq!(text.area_pixels, "15,234");
        assert_eq!(text.volume_mm3, "482\u{a0}931");
        assert_eq!(text.volume_ml, "482,93");
    }

    #[test]
    fn test_custom_locales() {
        let format = MetricsFormat {
            area_locale: Locale::RuRu,
            volume_locale: Locale::EnUs,
        };
        let text = format_metrics(&sample(), &format);
        assert_eq!(text.area_pixels, "15\u{a0}234");
        assert_eq!(text.volume_mm3, "482,931");
        assert_eq!(text.volume_ml, "482.93");
    }

    #[test]
    fn test_render_lines() {
        let lines = render_metrics(&sample(), &MetricsFormat::default());
        assert_eq!(lines.len(), 5);
        assert!(lines[1].ends_with("15,234"));
    }
}
