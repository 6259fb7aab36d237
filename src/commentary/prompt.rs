//! Prompt text for the commentator

use crate::sim::{GameEvent, GameStats};
use crate::theme::TrackTheme;

/// Prompt for a single live comment
pub fn live_prompt(stats: &GameStats, theme: &TrackTheme, event: GameEvent) -> String {
    format!(
        "Event: {event}\n\
         Current Stats: Score {score}, Distance {distance:.0}m, Near Misses {near_misses}.\n\
         Theme: {name} ({vibe}).\n\
         \n\
         You are a high-energy arcade racing commentator. Reply with one punchy line \
         (10 words at most) about this racing event, in a {vibe} tone.",
        event = event.as_str(),
        score = stats.score,
        distance = stats.distance,
        near_misses = stats.near_misses,
        name = theme.name,
        vibe = theme.vibe,
    )
}

/// Prompt for the game-over summary
pub fn analysis_prompt(stats: &GameStats, theme: &TrackTheme) -> String {
    format!(
        "Game Over Analysis:\n\
         Final Score: {score}\n\
         Total Distance: {distance:.0}m\n\
         Near Misses: {near_misses}\n\
         Top Speed: {top_speed:.1} units/sec\n\
         Track: {name}\n\
         \n\
         Write a short, upbeat two-sentence recap of this driver's run. Use gaming slang, \
         stay honest, and call out at least one of the stats above.",
        score = stats.score,
        distance = stats.distance,
        near_misses = stats.near_misses,
        top_speed = stats.top_speed,
        name = theme.name,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::THEMES;

    fn stats() -> GameStats {
        GameStats {
            score: 1234,
            distance: 98.6,
            near_misses: 3,
            collisions: 1,
            top_speed: 7.4,
        }
    }

    #[test]
    fn test_live_prompt_contents() {
        let prompt = live_prompt(&stats(), &THEMES[0], GameEvent::NearMiss);
        assert!(prompt.starts_with("Event: NEAR_MISS\n"));
        assert!(prompt.contains("Score 1234, Distance 99m, Near Misses 3."));
        assert!(prompt.contains("Theme: Neo-Tokyo (futuristic, fast-paced, synthwave)."));
    }

    #[test]
    fn test_analysis_prompt_contents() {
        let prompt = analysis_prompt(&stats(), &THEMES[1]);
        assert!(prompt.contains("Final Score: 1234\n"));
        assert!(prompt.contains("Total Distance: 99m\n"));
        assert!(prompt.contains("Top Speed: 7.4 units/sec\n"));
        assert!(prompt.contains("Track: Dusty Sahara\n"));
    }
}
