//! HUD and game-over panel text
//!
//! Formats stats for display; the binary writes these strings into the DOM.

use crate::commentary::ANALYSIS_PENDING;
use crate::sim::GameStats;

/// Score with thousands separators
pub fn format_score(score: u64) -> String {
    let digits = score.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Whole distance units with an `m` suffix
pub fn format_distance(distance: f32) -> String {
    format!("{:.0}m", distance)
}

/// Live HUD contents
#[derive(Debug, Clone, PartialEq)]
pub struct HudView {
    pub score: String,
    pub distance: String,
    pub speed: String,
    /// Only shown once there is at least one near miss
    pub near_miss_badge: Option<String>,
}

impl HudView {
    pub fn new(stats: &GameStats, speed: f32) -> Self {
        Self {
            score: format_score(stats.score),
            distance: format_distance(stats.distance),
            speed: format!("{:.1}", speed),
            near_miss_badge: (stats.near_misses > 0)
                .then(|| format!("NEAR MISS x{}", stats.near_misses)),
        }
    }
}

/// Game-over panel contents
#[derive(Debug, Clone, PartialEq)]
pub struct GameOverView {
    pub score: String,
    pub distance: String,
    pub near_misses: String,
    pub top_speed: String,
    pub analysis: String,
}

impl GameOverView {
    pub fn new(stats: &GameStats, analysis: Option<&str>) -> Self {
        Self {
            score: format_score(stats.score),
            distance: format_distance(stats.distance),
            near_misses: stats.near_misses.to_string(),
            top_speed: format!("{:.1}", stats.top_speed),
            analysis: analysis.unwrap_or(ANALYSIS_PENDING).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(0), "0");
        assert_eq!(format_score(999), "999");
        assert_eq!(format_score(1000), "1,000");
        assert_eq!(format_score(1234567), "1,234,567");
    }

    #[test]
    fn test_format_distance_rounds() {
        assert_eq!(format_distance(0.0), "0m");
        assert_eq!(format_distance(5.03), "5m");
        assert_eq!(format_distance(99.6), "100m");
    }

    #[test]
    fn test_near_miss_badge_hidden_at_zero() {
        let mut stats = GameStats::initial();
        assert_eq!(HudView::new(&stats, 5.0).near_miss_badge, None);
        stats.near_misses = 4;
        assert_eq!(
            HudView::new(&stats, 5.0).near_miss_badge.as_deref(),
            Some("NEAR MISS x4")
        );
    }

    #[test]
    fn test_game_over_placeholder_until_analysis() {
        let stats = GameStats {
            score: 2500,
            distance: 240.2,
            near_misses: 2,
            collisions: 1,
            top_speed: 9.04,
        };
        let pending = GameOverView::new(&stats, None);
        assert_eq!(pending.analysis, ANALYSIS_PENDING);
        assert_eq!(pending.score, "2,500");
        assert_eq!(pending.top_speed, "9.0");

        let done = GameOverView::new(&stats, Some("Clean lines."));
        assert_eq!(done.analysis, "Clean lines.");
    }
}
