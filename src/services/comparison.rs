//! Side-by-side metric comparison for the heatmap table and the radar chart.
//!
//! Every metric carries a fixed polarity: for most, a larger value is the
//! better one, but for conceded-goal and discipline metrics the smaller value
//! wins. Both transforms below honor that polarity so "green cell" and
//! "bigger wedge" always mean the favorable side.

use serde::Serialize;

use crate::models::TeamFeatures;

/// Outcome of comparing one metric across the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Comparison {
    Equal,
    HomeBetter,
    AwayBetter,
}

/// One comparable attribute of [`TeamFeatures`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKey {
    Elo,
    EloMomentum,
    XgPer90,
    XgOpenPlayPer90,
    XgSetPiecesPer90,
    XaPer90,
    ShotsPer90,
    ConversionRate,
    Possession,
    HighPressSuccessRate,
    XgaPer90,
    FoulsPerPossessionLost,
    CardsPerGame,
}

impl MetricKey {
    pub fn value(&self, team: &TeamFeatures) -> f64 {
        match self {
            MetricKey::Elo => team.elo,
            MetricKey::EloMomentum => team.elo_momentum,
            MetricKey::XgPer90 => team.xg_per90,
            MetricKey::XgOpenPlayPer90 => team.xg_open_play_per90,
            MetricKey::XgSetPiecesPer90 => team.xg_set_pieces_per90,
            MetricKey::XaPer90 => team.xa_per90,
            MetricKey::ShotsPer90 => team.shots_per90,
            MetricKey::ConversionRate => team.conversion_rate,
            MetricKey::Possession => team.possession,
            MetricKey::HighPressSuccessRate => team.high_press_success_rate,
            MetricKey::XgaPer90 => team.xga_per90,
            MetricKey::FoulsPerPossessionLost => team.fouls_per_possession_lost,
            MetricKey::CardsPerGame => team.cards_per_game,
        }
    }

    /// Polarity flag: xGA, fouls-per-lost-possession and cards are the
    /// metrics where conceding less is the good direction.
    pub fn higher_is_better(&self) -> bool {
        !matches!(
            self,
            MetricKey::XgaPer90 | MetricKey::FoulsPerPossessionLost | MetricKey::CardsPerGame
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            MetricKey::Elo => "ELO rating",
            MetricKey::EloMomentum => "ELO momentum",
            MetricKey::XgPer90 => "xG per 90",
            MetricKey::XgOpenPlayPer90 => "xG open play per 90",
            MetricKey::XgSetPiecesPer90 => "xG set pieces per 90",
            MetricKey::XaPer90 => "xA per 90",
            MetricKey::ShotsPer90 => "Shots per 90",
            MetricKey::ConversionRate => "Conversion rate %",
            MetricKey::Possession => "Possession %",
            MetricKey::HighPressSuccessRate => "High press success %",
            MetricKey::XgaPer90 => "xGA per 90",
            MetricKey::FoulsPerPossessionLost => "Fouls per possession lost",
            MetricKey::CardsPerGame => "Cards per game",
        }
    }
}

/// Metrics shown as rows of the comparison heatmap, in display order.
pub const HEATMAP_METRICS: [MetricKey; 8] = [
    MetricKey::Elo,
    MetricKey::EloMomentum,
    MetricKey::XgPer90,
    MetricKey::XgaPer90,
    MetricKey::ShotsPer90,
    MetricKey::Possession,
    MetricKey::HighPressSuccessRate,
    MetricKey::CardsPerGame,
];

/// Radar chart axes with their display labels, in display order.
pub const RADAR_AXES: [(MetricKey, &str); 6] = [
    (MetricKey::XgPer90, "Attack"),
    (MetricKey::XgaPer90, "Defense"),
    (MetricKey::Possession, "Possession"),
    (MetricKey::HighPressSuccessRate, "Pressing"),
    (MetricKey::ConversionRate, "Efficiency"),
    (MetricKey::CardsPerGame, "Discipline"),
];

/// Decide which side is ahead on one metric. Exact numeric equality is a
/// tie, no epsilon; user-entered floats that differ in the last decimal are
/// taken at face value.
pub fn classify(higher_is_better: bool, home: f64, away: f64) -> Comparison {
    if home == away {
        return Comparison::Equal;
    }
    let home_is_better = if higher_is_better { home > away } else { home < away };
    if home_is_better {
        Comparison::HomeBetter
    } else {
        Comparison::AwayBetter
    }
}

/// Project two raw values onto complementary [0,1] shares of a radar axis.
///
/// A zero total is split evenly. For lower-is-better metrics the shares are
/// swapped after the division, so the larger wedge is always the favorable
/// side. Negative totals (possible when both inputs are negative) pass
/// through the same arithmetic unclamped; none of the radar axes carry
/// sign-flipping metrics.
pub fn normalize_radial(higher_is_better: bool, home: f64, away: f64) -> (f64, f64) {
    let total = home + away;
    if total == 0.0 {
        return (0.5, 0.5);
    }

    let home_share = home / total;
    let away_share = away / total;

    if higher_is_better {
        (home_share, away_share)
    } else {
        (away_share, home_share)
    }
}

// ── View models ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapRow {
    pub metric: &'static str,
    pub home_value: f64,
    pub away_value: f64,
    pub verdict: Comparison,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarAxis {
    pub axis: &'static str,
    pub home_share: f64,
    pub away_share: f64,
}

/// One classified row per heatmap metric.
pub fn heatmap(home: &TeamFeatures, away: &TeamFeatures) -> Vec<HeatmapRow> {
    HEATMAP_METRICS
        .iter()
        .map(|metric| {
            let home_value = metric.value(home);
            let away_value = metric.value(away);
            HeatmapRow {
                metric: metric.label(),
                home_value,
                away_value,
                verdict: classify(metric.higher_is_better(), home_value, away_value),
            }
        })
        .collect()
}

/// Normalized shares for every radar axis.
pub fn radar(home: &TeamFeatures, away: &TeamFeatures) -> Vec<RadarAxis> {
    RADAR_AXES
        .iter()
        .map(|&(metric, axis)| {
            let (home_share, away_share) = normalize_radial(
                metric.higher_is_better(),
                metric.value(home),
                metric.value(away),
            );
            RadarAxis {
                axis,
                home_share,
                away_share,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_follows_polarity() {
        // higher is better: the larger value wins either way round
        assert_eq!(classify(true, 1800.0, 1700.0), Comparison::HomeBetter);
        assert_eq!(classify(true, 1700.0, 1800.0), Comparison::AwayBetter);

        // lower is better: the relation inverts
        assert_eq!(classify(false, 3.0, 1.0), Comparison::AwayBetter);
        assert_eq!(classify(false, 1.0, 3.0), Comparison::HomeBetter);
    }

    #[test]
    fn classify_exact_equality_is_a_tie() {
        assert_eq!(classify(true, 52.5, 52.5), Comparison::Equal);
        assert_eq!(classify(false, 52.5, 52.5), Comparison::Equal);
        assert_eq!(classify(true, 0.0, 0.0), Comparison::Equal);
    }

    #[test]
    fn radial_shares_sum_to_one() {
        for (home, away) in [(1800.0, 1700.0), (0.3, 2.7), (-4.0, 10.0)] {
            let (h, a) = normalize_radial(true, home, away);
            assert!((h + a - 1.0).abs() < 1e-9, "{home} vs {away}");
        }
    }

    #[test]
    fn radial_zero_total_splits_evenly() {
        assert_eq!(normalize_radial(true, 0.0, 0.0), (0.5, 0.5));
        assert_eq!(normalize_radial(false, 0.0, 0.0), (0.5, 0.5));
        // opposite momentum values also cancel to a zero total
        assert_eq!(normalize_radial(true, 5.0, -5.0), (0.5, 0.5));
    }

    #[test]
    fn radial_swaps_shares_for_lower_is_better() {
        // 10 conceded vs 30 conceded: raw shares (0.25, 0.75), swapped so
        // the side conceding less gets the larger wedge
        let (h, a) = normalize_radial(false, 10.0, 30.0);
        assert_eq!((h, a), (0.75, 0.25));
    }

    #[test]
    fn elo_scenario() {
        assert_eq!(classify(true, 1800.0, 1700.0), Comparison::HomeBetter);
        let (h, a) = normalize_radial(true, 1800.0, 1700.0);
        assert!((h - 1800.0 / 3500.0).abs() < 1e-9);
        assert!((a - 1700.0 / 3500.0).abs() < 1e-9);
    }

    #[test]
    fn cards_scenario() {
        assert_eq!(classify(false, 3.0, 1.0), Comparison::AwayBetter);
        let (h, a) = normalize_radial(false, 3.0, 1.0);
        assert_eq!((h, a), (0.25, 0.75));
    }

    #[test]
    fn heatmap_classifies_every_row() {
        let home = TeamFeatures {
            name: "Home".to_string(),
            elo: 1800.0,
            cards_per_game: 3.0,
            ..TeamFeatures::default()
        };
        let away = TeamFeatures {
            name: "Away".to_string(),
            elo: 1700.0,
            cards_per_game: 1.0,
            ..TeamFeatures::default()
        };

        let rows = heatmap(&home, &away);
        assert_eq!(rows.len(), HEATMAP_METRICS.len());

        let elo = rows.iter().find(|r| r.metric == "ELO rating").unwrap();
        assert_eq!(elo.verdict, Comparison::HomeBetter);

        let cards = rows.iter().find(|r| r.metric == "Cards per game").unwrap();
        assert_eq!(cards.verdict, Comparison::AwayBetter);

        // both sides at zero on every untouched metric
        let shots = rows.iter().find(|r| r.metric == "Shots per 90").unwrap();
        assert_eq!(shots.verdict, Comparison::Equal);
    }

    #[test]
    fn radar_covers_all_axes_with_valid_shares() {
        let home = TeamFeatures {
            xg_per90: 2.1,
            xga_per90: 0.9,
            possession: 61.0,
            high_press_success_rate: 31.0,
            conversion_rate: 12.5,
            cards_per_game: 2.2,
            ..TeamFeatures::default()
        };
        let away = TeamFeatures {
            xg_per90: 1.2,
            xga_per90: 1.6,
            possession: 39.0,
            high_press_success_rate: 24.0,
            conversion_rate: 9.0,
            cards_per_game: 1.4,
            ..TeamFeatures::default()
        };

        let axes = radar(&home, &away);
        assert_eq!(axes.len(), RADAR_AXES.len());
        for axis in &axes {
            assert!((axis.home_share + axis.away_share - 1.0).abs() < 1e-9);
        }

        // home concedes less, so the Defense wedge favors home after the swap
        let defense = axes.iter().find(|x| x.axis == "Defense").unwrap();
        assert!(defense.home_share > defense.away_share);
    }
}
