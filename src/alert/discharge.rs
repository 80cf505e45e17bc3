//! Reservoir discharge alerts from operator telemetry.
//!
//! A reservoir raises an alert when a spillway gate is open, or when it is
//! both near full and releasing heavily:
//!
//!   spillway open + water >= 90% of normal level  → critical
//!   spillway open                                  → high
//!   water >= 90% and total discharge > 500 m³/s    → medium
//!
//! High water or heavy release on its own does not alert.

use crate::model::{DischargeAlert, DischargeSeverity, ReservoirTelemetry};

pub const HIGH_WATER_PERCENT: f64 = 90.0;
pub const HIGH_DISCHARGE_M3S: f64 = 500.0;

fn reason(t: &ReservoirTelemetry, high_water: bool, high_discharge: bool) -> String {
    let mut reasons = Vec::new();
    if t.spillway_open() {
        let mut gates = Vec::new();
        if t.deep_gates_open > 0 {
            gates.push(format!("{} cửa xả sâu", t.deep_gates_open));
        }
        if t.surface_gates_open > 0 {
            gates.push(format!("{} cửa xả mặt", t.surface_gates_open));
        }
        reasons.push(format!("Đang mở {}", gates.join(", ")));
    }
    if high_water {
        let percent = t.water_level_percent().unwrap_or(0.0);
        reasons.push(format!("Mực nước cao ({:.1}%)", percent));
    }
    if high_discharge {
        reasons.push(format!("Lưu lượng xả lớn ({:.0} m³/s)", t.total_discharge_m3s));
    }
    reasons.join(". ")
}

/// Actions for downstream residents, naming the reservoir.
pub fn recommendations(severity: DischargeSeverity, reservoir: &str) -> Vec<String> {
    match severity {
        DischargeSeverity::Critical => vec![
            format!("KHẨN CẤP: Hồ {} đang xả lũ với lưu lượng lớn", reservoir),
            "Người dân vùng hạ du cần sơ tán ngay lập tức".to_string(),
            "Không được đi lại, đánh bắt cá trên sông".to_string(),
            "Di chuyển gia súc, tài sản lên vùng cao".to_string(),
            "Liên hệ chính quyền địa phương để được hỗ trợ".to_string(),
        ],
        DischargeSeverity::High => vec![
            format!("Hồ {} đang xả lũ - chuẩn bị sẵn sàng sơ tán", reservoir),
            "Theo dõi mực nước sông liên tục".to_string(),
            "Chuẩn bị đồ dùng thiết yếu".to_string(),
            "Cập nhật thông tin từ chính quyền địa phương".to_string(),
        ],
        DischargeSeverity::Medium => vec![
            format!("Theo dõi tình hình hồ {}", reservoir),
            "Cập nhật thông tin thời tiết thường xuyên".to_string(),
            "Kiểm tra hệ thống thoát nước quanh nhà".to_string(),
        ],
    }
}

/// Classifies one reservoir's telemetry. `None` when nothing warrants an
/// alert.
///
/// An unknown water level never counts as high.
pub fn classify(telemetry: &ReservoirTelemetry) -> Option<DischargeAlert> {
    let spillway_open = telemetry.spillway_open();
    let water_level_percent = telemetry.water_level_percent();
    let high_water = water_level_percent.is_some_and(|p| p >= HIGH_WATER_PERCENT);
    let high_discharge = telemetry.total_discharge_m3s > HIGH_DISCHARGE_M3S;

    let severity = match (spillway_open, high_water, high_discharge) {
        (true, true, _) => DischargeSeverity::Critical,
        (true, false, _) => DischargeSeverity::High,
        (false, true, true) => DischargeSeverity::Medium,
        _ => return None,
    };

    Some(DischargeAlert {
        severity,
        spillway_open,
        high_water,
        high_discharge,
        water_level_percent,
        reason: reason(telemetry, high_water, high_discharge),
        recommendations: recommendations(severity, &telemetry.name),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hoa_binh(deep: u32, surface: u32, level: Option<f64>, discharge: f64) -> ReservoirTelemetry {
        ReservoirTelemetry {
            name: "Hòa Bình".to_string(),
            deep_gates_open: deep,
            surface_gates_open: surface,
            water_level_m: level,
            normal_level_m: Some(117.0),
            total_discharge_m3s: discharge,
        }
    }

    #[test]
    fn test_open_gates_near_full_is_critical() {
        let a = classify(&hoa_binh(2, 0, Some(115.0), 4200.0)).expect("should alert");
        assert_eq!(a.severity, DischargeSeverity::Critical);
        assert!(a.spillway_open && a.high_water && a.high_discharge);
        assert_eq!(
            a.reason,
            "Đang mở 2 cửa xả sâu. Mực nước cao (98.3%). Lưu lượng xả lớn (4200 m³/s)"
        );
        assert_eq!(a.recommendations.len(), 5);
        assert!(a.recommendations[0].contains("Hòa Bình"), "got: {}", a.recommendations[0]);
    }

    #[test]
    fn test_open_gates_alone_is_high() {
        let a = classify(&hoa_binh(0, 1, Some(90.0), 300.0)).expect("should alert");
        assert_eq!(a.severity, DischargeSeverity::High);
        assert_eq!(a.reason, "Đang mở 1 cửa xả mặt");
        assert_eq!(a.recommendations.len(), 4);
    }

    #[test]
    fn test_full_and_releasing_without_gates_is_medium() {
        let a = classify(&hoa_binh(0, 0, Some(110.0), 2800.0)).expect("should alert");
        assert_eq!(a.severity, DischargeSeverity::Medium);
        assert!(!a.spillway_open);
        assert_eq!(a.recommendations.len(), 3);
    }

    #[test]
    fn test_one_condition_without_gates_does_not_alert() {
        assert_eq!(classify(&hoa_binh(0, 0, Some(110.0), 400.0)), None, "high water only");
        assert_eq!(classify(&hoa_binh(0, 0, Some(80.0), 2800.0)), None, "heavy release only");
        assert_eq!(classify(&hoa_binh(0, 0, None, 2800.0)), None, "unknown level is not high");
    }

    #[test]
    fn test_thresholds_are_ninety_percent_inclusive_and_discharge_exclusive() {
        // 105.3 / 117 = 90%
        assert!(classify(&hoa_binh(0, 0, Some(105.3), 501.0)).is_some());
        assert_eq!(classify(&hoa_binh(0, 0, Some(105.3), 500.0)), None);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(DischargeSeverity::Medium < DischargeSeverity::High);
        assert!(DischargeSeverity::High < DischargeSeverity::Critical);
    }
}
