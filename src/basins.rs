//! Basin registry for the Vietnamese flood alerting service.
//!
//! Defines the four river basins this service forecasts for, with their
//! catchment areas, rainfall alert thresholds, and default Thiessen
//! station weights. This is the single source of truth for basin codes;
//! `basins.toml` may override weights, thresholds, and model parameters,
//! but never introduces a basin that is not listed here.

use crate::model::{FloodThreshold, StationWeights, ThresholdLevel};

// ---------------------------------------------------------------------------
// Basin metadata
// ---------------------------------------------------------------------------

/// Static metadata for one river basin.
pub struct Basin {
    /// Upper-case basin code used throughout the API ("HONG", "MEKONG", ...).
    pub code: &'static str,
    /// Vietnamese display name.
    pub name: &'static str,
    pub description: &'static str,
    /// Whole-catchment area, including the parts outside Vietnam.
    pub area_km2: f64,
    /// Daily and 3-day accumulated rainfall thresholds.
    pub thresholds: FloodThreshold,
    /// Default Thiessen weights (station id, relative area of influence).
    pub station_weights: &'static [(&'static str, f64)],
}

impl Basin {
    /// The default weights as an owned map.
    pub fn weights(&self) -> StationWeights {
        self.station_weights
            .iter()
            .map(|(id, w)| (id.to_string(), *w))
            .collect()
    }
}

const fn level(daily_mm: f64, accumulated_3d_mm: f64) -> ThresholdLevel {
    ThresholdLevel {
        daily_mm,
        accumulated_3d_mm,
    }
}

/// All basins, north to south, then the central coast.
///
/// Sources:
///   - Areas: Vietnam Disaster and Dyke Management Authority, MRC
///   - Thresholds: operational rainfall alert tables of the forecast service
pub static BASIN_REGISTRY: &[Basin] = &[
    Basin {
        code: "HONG",
        name: "Sông Hồng - Thái Bình",
        description: "Red River and Thai Binh system. Son La and Hoa Binh \
                      dams on the Da river regulate flow reaching Hanoi.",
        area_km2: 169_000.0,
        thresholds: FloodThreshold {
            watch: level(100.0, 250.0),
            warning: level(150.0, 400.0),
            danger: level(200.0, 600.0),
        },
        station_weights: &[
            ("lao_cai", 1.2),
            ("yen_bai", 1.1),
            ("ha_giang", 1.0),
            ("tuyen_quang", 1.0),
            ("phu_tho", 0.9),
            ("viet_tri", 0.8),
            ("son_tay", 0.7),
            ("hanoi", 0.7),
            ("hai_phong", 0.6),
            ("hai_duong", 0.6),
            ("hung_yen", 0.6),
            ("thai_binh", 0.6),
            ("nam_dinh", 0.6),
            ("ninh_binh", 0.6),
            ("ha_nam", 0.6),
            ("hoa_binh_dam", 1.0),
            ("son_la_dam", 1.2),
            ("dien_bien", 1.1),
            ("lai_chau", 1.1),
            ("cao_bang", 0.9),
            ("lang_son", 0.9),
            ("bac_kan", 0.9),
            ("thai_nguyen", 0.8),
            ("bac_giang", 0.7),
            ("quang_ninh", 0.7),
        ],
    },
    Basin {
        code: "MEKONG",
        name: "Sông Mekong",
        description: "Mekong delta. Upstream gauges in Thailand, Laos and \
                      Cambodia give several days of lead time.",
        area_km2: 795_000.0,
        thresholds: FloodThreshold {
            watch: level(80.0, 200.0),
            warning: level(120.0, 350.0),
            danger: level(180.0, 550.0),
        },
        station_weights: &[
            ("chiang_saen", 1.5),
            ("vientiane", 1.4),
            ("stung_treng", 1.2),
            ("tan_chau", 1.0),
            ("chau_doc", 1.0),
            ("long_an", 0.8),
            ("tien_giang", 0.8),
            ("ben_tre", 0.7),
            ("tra_vinh", 0.7),
            ("vinh_long", 0.8),
            ("dong_thap", 0.8),
            ("an_giang", 0.9),
            ("kien_giang", 0.7),
            ("can_tho", 0.8),
            ("hau_giang", 0.7),
            ("soc_trang", 0.7),
            ("bac_lieu", 0.6),
            ("ca_mau", 0.6),
        ],
    },
    Basin {
        code: "DONGNAI",
        name: "Sông Đồng Nai",
        description: "Dong Nai and Saigon rivers. Tri An releases dominate \
                      flood levels around Ho Chi Minh City.",
        area_km2: 44_000.0,
        thresholds: FloodThreshold {
            watch: level(100.0, 250.0),
            warning: level(150.0, 400.0),
            danger: level(200.0, 600.0),
        },
        station_weights: &[
            ("lam_dong", 1.2),
            ("binh_phuoc", 1.0),
            ("tay_ninh", 0.9),
            ("binh_duong", 0.8),
            ("dong_nai", 0.8),
            ("ba_ria_vung_tau", 0.7),
            ("tp_ho_chi_minh", 0.7),
            ("tri_an_dam", 1.0),
            ("dak_lak", 1.1),
            ("dak_nong", 1.0),
        ],
    },
    Basin {
        code: "CENTRAL",
        name: "Miền Trung",
        description: "Short, steep coastal rivers from Thanh Hoa to Binh \
                      Thuan plus the Central Highlands. Floods rise within \
                      hours of heavy rain.",
        area_km2: 50_000.0,
        thresholds: FloodThreshold {
            watch: level(120.0, 300.0),
            warning: level(200.0, 500.0),
            danger: level(300.0, 800.0),
        },
        station_weights: &[
            ("thanh_hoa", 1.0),
            ("nghe_an", 1.1),
            ("ha_tinh", 1.0),
            ("quang_binh", 1.0),
            ("quang_tri", 1.0),
            ("thua_thien_hue", 1.0),
            ("da_nang", 1.0),
            ("quang_nam", 1.1),
            ("quang_ngai", 1.0),
            ("binh_dinh", 1.0),
            ("phu_yen", 1.0),
            ("khanh_hoa", 0.9),
            ("ninh_thuan", 0.8),
            ("binh_thuan", 0.8),
            ("kon_tum", 1.1),
            ("gia_lai", 1.1),
        ],
    },
];

/// Returns the codes of all registered basins.
pub fn all_basin_codes() -> Vec<&'static str> {
    BASIN_REGISTRY.iter().map(|b| b.code).collect()
}

/// Looks up a basin by code, ignoring ASCII case. Returns `None` if not found.
pub fn find_basin(code: &str) -> Option<&'static Basin> {
    BASIN_REGISTRY
        .iter()
        .find(|b| b.code.eq_ignore_ascii_case(code))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
