//! Rainfall severity classification against basin thresholds.
//!
//! The ladder is evaluated from the top: a tier is reached when EITHER the
//! daily depth OR the 3-day accumulation meets its threshold, and the first
//! tier reached wins. There is no scoring or blending between the two
//! measures.

use crate::model::{FloodThreshold, Severity, SeverityClassification, ThresholdLevel};

/// Alert level published for a day with no usable observations.
pub const NOT_ASSESSED_ALERT_LEVEL: u8 = 0;

const DANGER_ACTIONS: &[&str] = &[
    "⛔ NGUY HIỂM: Sơ tán khẩn cấp người dân vùng trũng",
    "Chuẩn bị phương án cứu hộ, cứu nạn",
    "Đóng cửa xả đập nếu có",
    "Cảnh báo toàn bộ dân cư hạ du",
];

const WARNING_ACTIONS: &[&str] = &[
    "⚠️ CẢNH BÁO: Chuẩn bị sơ tán người dân vùng nguy hiểm",
    "Tăng cường quan trắc mực nước",
    "Kiểm tra hệ thống thoát nước",
    "Thông báo rộng rãi cho dân cư",
];

const WATCH_ACTIONS: &[&str] = &[
    "⚡ THEO DÕI: Theo dõi chặt chẽ diễn biến thời tiết",
    "Chuẩn bị phương án ứng phó",
    "Kiểm tra khu vực trũng thấp",
    "Thông báo đến chính quyền địa phương",
];

const SAFE_ACTIONS: &[&str] = &[
    "✅ AN TOÀN: Tình hình bình thường",
    "Tiếp tục theo dõi dự báo thời tiết",
];

/// The fixed, basin-independent actions recommended for a severity.
pub fn recommendations(severity: Severity) -> &'static [&'static str] {
    match severity {
        Severity::Danger => DANGER_ACTIONS,
        Severity::Warning => WARNING_ACTIONS,
        Severity::Watch => WATCH_ACTIONS,
        Severity::Safe => SAFE_ACTIONS,
    }
}

fn reaches(daily_mm: f64, accumulated_3d_mm: f64, level: &ThresholdLevel) -> bool {
    daily_mm >= level.daily_mm || accumulated_3d_mm >= level.accumulated_3d_mm
}

/// Highest tier whose daily OR 3-day threshold is met.
pub fn severity_for(daily_mm: f64, accumulated_3d_mm: f64, thresholds: &FloodThreshold) -> Severity {
    if reaches(daily_mm, accumulated_3d_mm, &thresholds.danger) {
        Severity::Danger
    } else if reaches(daily_mm, accumulated_3d_mm, &thresholds.warning) {
        Severity::Warning
    } else if reaches(daily_mm, accumulated_3d_mm, &thresholds.watch) {
        Severity::Watch
    } else {
        Severity::Safe
    }
}

/// Classifies one day's rainfall and attaches the tier's actions.
pub fn classify(
    daily_mm: f64,
    accumulated_3d_mm: f64,
    thresholds: &FloodThreshold,
) -> SeverityClassification {
    let severity = severity_for(daily_mm, accumulated_3d_mm, thresholds);
    SeverityClassification {
        severity,
        alert_level: severity.alert_level(),
        recommendations: recommendations(severity).iter().map(|s| s.to_string()).collect(),
    }
}

/// Placeholder classification for a day nobody observed.
///
/// Reports `Safe` so it never raises an alarm, but with alert level 0 and
/// no recommendations so consumers can tell it apart from a real all-clear.
pub fn not_assessed() -> SeverityClassification {
    SeverityClassification {
        severity: Severity::Safe,
        alert_level: NOT_ASSESSED_ALERT_LEVEL,
        recommendations: Vec::new(),
    }
}
