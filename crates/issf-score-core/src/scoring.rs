//! Ring tables and the decimal scoring function.
//!
//! A [`TargetFace`] is pure domain data: the physical radius of the black
//! aiming disk (the calibration reference) and an ordered list of scoring
//! zones. New target types are new tables, not new code paths.

use serde::Serialize;

/// How the score varies inside one zone.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum ZoneRule {
    /// `top - (d / upper_bound) * span`: the sub-divided center ring.
    DecimalTenRing { top: f64, span: f64 },
    /// `ring + (1 - t)` with `t = (d - lower) / (upper - lower)`.
    Linear,
}

/// One ring of a target face; `upper_bound_mm` is inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScoringZone {
    pub upper_bound_mm: f64,
    pub ring: u8,
    pub rule: ZoneRule,
}

/// Geometry and scoring zones of a printed target.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct TargetFace {
    pub name: &'static str,
    /// Physical radius of the black aiming disk.
    pub black_circle_radius_mm: f64,
    /// Zones ordered by ascending upper bound. Past the last bound the shot misses.
    pub zones: &'static [ScoringZone],
}

const fn linear(upper_bound_mm: f64, ring: u8) -> ScoringZone {
    ScoringZone {
        upper_bound_mm,
        ring,
        rule: ZoneRule::Linear,
    }
}

const ISSF_10M_AIR_RIFLE_ZONES: [ScoringZone; 10] = [
    ScoringZone {
        upper_bound_mm: 11.5,
        ring: 10,
        rule: ZoneRule::DecimalTenRing {
            top: 10.9,
            span: 0.9,
        },
    },
    linear(23.0, 9),
    linear(34.5, 8),
    linear(46.0, 7),
    linear(57.5, 6),
    linear(69.0, 5),
    linear(80.5, 4),
    linear(92.0, 3),
    linear(103.5, 2),
    linear(115.0, 1),
];

/// ISSF 10m air rifle target: 85 mm black-disk radius, ten 11.5 mm rings.
pub static ISSF_10M_AIR_RIFLE: TargetFace = TargetFace {
    name: "ISSF 10m Air Rifle",
    black_circle_radius_mm: 85.0,
    zones: &ISSF_10M_AIR_RIFLE_ZONES,
};

impl TargetFace {
    /// Decimal score of a shot `distance_mm` from the center.
    ///
    /// A distance exactly on a boundary belongs to the inner (higher scoring)
    /// zone. Negative distances score as a center hit, NaN and anything past
    /// the outermost zone score `0.0`.
    pub fn score(&self, distance_mm: f64) -> f64 {
        if distance_mm.is_nan() {
            return 0.0;
        }
        let d = distance_mm.max(0.0);

        let mut lower = 0.0;
        for zone in self.zones {
            if d <= zone.upper_bound_mm {
                return match zone.rule {
                    ZoneRule::DecimalTenRing { top, span } => {
                        top - (d / zone.upper_bound_mm) * span
                    }
                    ZoneRule::Linear => {
                        let t = (d - lower) / (zone.upper_bound_mm - lower);
                        zone.ring as f64 + (1.0 - t)
                    }
                };
            }
            lower = zone.upper_bound_mm;
        }
        0.0
    }

    /// Outermost scoring distance; anything beyond is a miss.
    pub fn miss_boundary_mm(&self) -> f64 {
        self.zones.last().map_or(0.0, |z| z.upper_bound_mm)
    }

    /// Integer ring hit at `distance_mm` (0 for a miss).
    pub fn ring(&self, distance_mm: f64) -> u8 {
        if distance_mm.is_nan() {
            return 0;
        }
        let d = distance_mm.max(0.0);
        self.zones
            .iter()
            .find(|z| d <= z.upper_bound_mm)
            .map_or(0, |z| z.ring)
    }
}

/// Decimal score on the ISSF 10m air rifle face.
pub fn decimal_score(distance_mm: f64) -> f64 {
    ISSF_10M_AIR_RIFLE.score(distance_mm)
}

/// Scores are reported with one decimal place.
pub fn format_score(score: f64) -> String {
    format!("{score:.1}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn center_hit_is_ten_point_nine() {
        assert_eq!(decimal_score(0.0), 10.9);
    }

    #[test]
    fn ten_ring_edge_scores_ten() {
        assert_relative_eq!(decimal_score(11.5), 10.0, epsilon = 1e-12);
        assert!(decimal_score(11.5 - 1e-9) > 10.0);
        let just_outside = decimal_score(11.5 + 1e-9);
        assert!(just_outside < 10.0);
        assert_relative_eq!(just_outside, 10.0, epsilon = 1e-6);
    }

    #[test]
    fn outer_boundary_and_miss() {
        assert_eq!(decimal_score(115.0), 1.0);
        assert_eq!(decimal_score(115.01), 0.0);
        assert_eq!(decimal_score(1_000.0), 0.0);
        assert_eq!(ISSF_10M_AIR_RIFLE.miss_boundary_mm(), 115.0);
    }

    #[test]
    fn boundaries_belong_to_the_inner_zone() {
        assert_eq!(ISSF_10M_AIR_RIFLE.ring(11.5), 10);
        for zone in ISSF_10M_AIR_RIFLE.zones.iter().skip(1) {
            // inner-zone formula at t = 1
            assert_relative_eq!(
                ISSF_10M_AIR_RIFLE.score(zone.upper_bound_mm),
                zone.ring as f64,
                epsilon = 1e-12
            );
            assert_eq!(ISSF_10M_AIR_RIFLE.ring(zone.upper_bound_mm), zone.ring);
        }
    }

    #[test]
    fn mid_ring_values() {
        assert_relative_eq!(decimal_score(5.75), 10.45, epsilon = 1e-12);
        // halfway through the 9 ring
        assert_relative_eq!(decimal_score(17.25), 9.5, epsilon = 1e-12);
        // 20 mm: 9 + (1 - 8.5 / 11.5)
        assert_relative_eq!(decimal_score(20.0), 9.0 + 3.0 / 11.5, epsilon = 1e-12);
        assert_relative_eq!(decimal_score(109.25), 1.5, epsilon = 1e-12);
    }

    #[test]
    fn score_is_monotonically_non_increasing() {
        let mut prev = decimal_score(0.0);
        for step in 1..=12_000 {
            let d = step as f64 * 0.01;
            let s = decimal_score(d);
            assert!(
                s <= prev + 1e-12,
                "score increased at {d} mm: {prev} -> {s}"
            );
            prev = s;
        }
    }

    #[test]
    fn degenerate_inputs_are_total() {
        assert_eq!(decimal_score(f64::NAN), 0.0);
        assert_eq!(decimal_score(f64::INFINITY), 0.0);
        assert_eq!(decimal_score(-3.0), 10.9);
        assert_eq!(ISSF_10M_AIR_RIFLE.ring(f64::NAN), 0);
    }

    #[test]
    fn scores_format_with_one_decimal() {
        assert_eq!(format_score(10.9), "10.9");
        assert_eq!(format_score(9.0 + 3.0 / 11.5), "9.3");
        assert_eq!(format_score(0.0), "0.0");
    }
}
