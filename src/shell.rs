//! Top-level screen state machine
//!
//! MENU -> PLAYING -> GAMEOVER -> (PLAYING | MENU). Owns the simulation while
//! playing, keeps the latest stats, and queues commentary work for the host
//! to run asynchronously.

use log::info;

use crate::hud::{GameOverView, HudView};
use crate::platform::{LaneInput, apply_input};
use crate::renderer::FrameSink;
use crate::sim::{FrameOutcome, GameEvent, GameStats, SimulationState, tick};
use crate::theme::TrackTheme;

/// How long a live comment stays on screen (host milliseconds)
pub const COMMENTARY_DISPLAY_MS: f64 = 3000.0;

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Theme selection, no simulation
    Menu,
    /// Game loop running
    Playing,
    /// Final stats frozen
    GameOver,
}

/// Commentary work for the host to dispatch
#[derive(Debug, Clone, PartialEq)]
pub enum CommentaryRequest {
    Live {
        stats: GameStats,
        theme: &'static TrackTheme,
        event: GameEvent,
    },
    PostRace {
        stats: GameStats,
        theme: &'static TrackTheme,
    },
}

/// Presentation state shared by the frame pump and the input handlers
#[derive(Debug)]
pub struct Shell {
    screen: Screen,
    theme: &'static TrackTheme,
    sim: Option<SimulationState>,
    /// The run that just ended, kept until it is painted once
    final_frame: Option<SimulationState>,
    stats: GameStats,
    commentary_enabled: bool,
    pending: Vec<CommentaryRequest>,
    /// Latest live comment and when it arrived
    commentary: Option<(String, f64)>,
    analysis: Option<String>,
}

impl Shell {
    pub fn new(theme: &'static TrackTheme, commentary_enabled: bool) -> Self {
        Self {
            screen: Screen::Menu,
            theme,
            sim: None,
            final_frame: None,
            stats: GameStats::default(),
            commentary_enabled,
            pending: Vec::new(),
            commentary: None,
            analysis: None,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn theme(&self) -> &'static TrackTheme {
        self.theme
    }

    /// Latest published stats (final stats once the run is over)
    pub fn stats(&self) -> GameStats {
        self.stats
    }

    /// Active simulation, only while playing
    pub fn simulation(&self) -> Option<&SimulationState> {
        self.sim.as_ref()
    }

    pub fn simulation_mut(&mut self) -> Option<&mut SimulationState> {
        self.sim.as_mut()
    }


    /// Highlight a theme in the menu without starting
    pub fn select_theme(&mut self, theme: &'static TrackTheme) {
        if self.screen == Screen::Menu {
            self.theme = theme;
        }
    }

    /// Begin a fresh run with `theme`. Always builds a new simulation.
    pub fn start(&mut self, theme: &'static TrackTheme, seed: u64) {
        let sim = SimulationState::new(seed);
        self.theme = theme;
        self.stats = sim.snapshot();
        self.sim = Some(sim);
        self.final_frame = None;
        self.analysis = None;
        self.screen = Screen::Playing;
        info!("Run started on {} (seed {})", theme.name, seed);

        self.queue(CommentaryRequest::Live {
            stats: self.stats,
            theme,
            event: GameEvent::Start,
        });
    }

    /// Start over on the same theme from the game-over screen
    pub fn retry(&mut self, seed: u64) {
        if self.screen == Screen::GameOver {
            self.start(self.theme, seed);
        }
    }

    /// Back to theme selection
    pub fn to_menu(&mut self) {
        self.sim = None;
        self.final_frame = None;
        self.screen = Screen::Menu;
        info!("Returned to menu");
    }

    /// Route a lane input to the simulation; ignored unless playing
    pub fn handle_input(&mut self, input: LaneInput) -> bool {
        if self.screen != Screen::Playing {
            return false;
        }
        match self.sim.as_mut() {
            Some(sim) => {
                apply_input(sim, input);
                true
            }
            None => false,
        }
    }

    /// Advance one animation frame. `None` when not playing.
    pub fn frame(&mut self) -> Option<FrameOutcome> {
        if self.screen != Screen::Playing {
            return None;
        }
        let sim = self.sim.as_mut()?;
        let outcome = tick(sim, self.theme);
        self.stats = outcome.stats;

        for &event in &outcome.events {
            // The crash is covered by the post-race analysis below
            if event != GameEvent::Crash {
                self.queue(CommentaryRequest::Live {
                    stats: self.stats,
                    theme: self.theme,
                    event,
                });
            }
        }

        if outcome.game_over {
            self.final_frame = self.sim.take();
            self.screen = Screen::GameOver;
            info!(
                "Game over - score {}, distance {:.0}, near misses {}, top speed {:.1}",
                self.stats.score, self.stats.distance, self.stats.near_misses, self.stats.top_speed
            );
            self.queue(CommentaryRequest::PostRace {
                stats: self.stats,
                theme: self.theme,
            });
        }

        Some(outcome)
    }

    /// Advance one frame and show it on `sink`, including the crash frame.
    ///
    /// With no sink the frame is skipped and the run does not advance.
    pub fn present_frame<S: FrameSink>(&mut self, sink: Option<&mut S>) -> Option<FrameOutcome> {
        let sink = sink?;
        let outcome = self.frame()?;
        match self.final_frame.take() {
            Some(wreck) => sink.present(&wreck, self.theme),
            None => {
                if let Some(sim) = &self.sim {
                    sink.present(sim, self.theme);
                }
            }
        }
        Some(outcome)
    }

    fn queue(&mut self, request: CommentaryRequest) {
        if self.commentary_enabled {
            self.pending.push(request);
        }
    }

    /// Drain queued commentary work
    pub fn take_requests(&mut self) -> Vec<CommentaryRequest> {
        std::mem::take(&mut self.pending)
    }

    /// Show a resolved live comment. Last arrival wins, even if stale.
    pub fn apply_commentary(&mut self, text: String, now_ms: f64) {
        self.commentary = Some((text, now_ms));
    }

    /// Live comment to display at `now_ms`, if any
    pub fn visible_commentary(&self, now_ms: f64) -> Option<&str> {
        if self.screen != Screen::Playing {
            return None;
        }
        match &self.commentary {
            Some((text, shown_at)) if now_ms - shown_at < COMMENTARY_DISPLAY_MS => Some(text),
            _ => None,
        }
    }

    /// Store a resolved post-race analysis
    pub fn apply_analysis(&mut self, text: String) {
        self.analysis = Some(text);
    }

    pub fn hud(&self) -> Option<HudView> {
        let sim = self.sim.as_ref()?;
        Some(HudView::new(&self.stats, sim.speed))
    }

    pub fn game_over_view(&self) -> Option<GameOverView> {
        (self.screen == Screen::GameOver)
            .then(|| GameOverView::new(&self.stats, self.analysis.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commentary::ANALYSIS_PENDING;
    use crate::sim::RunPhase;
    use crate::theme::THEMES;

    /// Records what it was asked to show
    #[derive(Default)]
    struct Recorder {
        frames: Vec<(u64, RunPhase, GameStats)>,
    }

    impl FrameSink for Recorder {
        fn present(&mut self, state: &SimulationState, _theme: &TrackTheme) {
            self.frames.push((state.frame_count, state.phase, state.stats));
        }
    }

    /// Run frames until the player (parked in the middle lane) gets hit
    fn play_until_crash(shell: &mut Shell) -> usize {
        for frame in 0..20_000 {
            shell.frame();
            if shell.screen() == Screen::GameOver {
                return frame;
            }
        }
        panic!("no crash within 20k frames");
    }

    fn assert_fresh(sim: &SimulationState, seed: u64) {
        let fresh = SimulationState::new(seed);
        assert_eq!(sim.player, fresh.player);
        assert_eq!(sim.obstacles, fresh.obstacles);
        assert_eq!(sim.speed, fresh.speed);
        assert_eq!(sim.frame_count, fresh.frame_count);
        assert_eq!(sim.road_offset, fresh.road_offset);
        assert_eq!(sim.lane_index, fresh.lane_index);
        assert_eq!(sim.stats, fresh.stats);
        assert_eq!(sim.phase, fresh.phase);
    }

    #[test]
    fn test_menu_has_no_simulation() {
        let mut shell = Shell::new(&THEMES[0], true);
        assert_eq!(shell.screen(), Screen::Menu);
        assert!(shell.simulation().is_none());
        assert!(shell.frame().is_none());
        assert!(!shell.handle_input(LaneInput::Left));
        assert!(shell.hud().is_none());
        assert!(shell.take_requests().is_empty());
    }

    #[test]
    fn test_select_theme_only_in_menu() {
        let mut shell = Shell::new(&THEMES[0], true);
        shell.select_theme(&THEMES[2]);
        assert_eq!(shell.theme().id, "ARCTIC");
        shell.start(shell.theme(), 1);
        shell.select_theme(&THEMES[1]);
        assert_eq!(shell.theme().id, "ARCTIC");
    }

    #[test]
    fn test_start_queues_start_comment() {
        let mut shell = Shell::new(&THEMES[0], true);
        shell.start(&THEMES[1], 5);
        assert_eq!(shell.screen(), Screen::Playing);
        assert_eq!(
            shell.take_requests(),
            vec![CommentaryRequest::Live {
                stats: GameStats::initial(),
                theme: &THEMES[1],
                event: GameEvent::Start,
            }]
        );
        assert_fresh(shell.simulation().unwrap(), 5);
    }

    #[test]
    fn test_input_reaches_simulation_while_playing() {
        let mut shell = Shell::new(&THEMES[0], true);
        shell.start(&THEMES[0], 1);
        assert!(shell.handle_input(LaneInput::Right));
        assert_eq!(shell.simulation().unwrap().lane_index, 2);
    }

    #[test]
    fn test_events_forwarded_as_live_requests() {
        let mut shell = Shell::new(&THEMES[0], true);
        shell.start(&THEMES[0], 1);
        shell.take_requests();
        shell.simulation_mut().unwrap().speed = 5.9995;
        shell.frame();
        let requests = shell.take_requests();
        assert!(requests.iter().any(|r| matches!(
            r,
            CommentaryRequest::Live { event: GameEvent::SpeedUp, .. }
        )));
    }

    #[test]
    fn test_crash_moves_to_game_over() {
        let mut shell = Shell::new(&THEMES[0], true);
        shell.start(&THEMES[0], 11);
        play_until_crash(&mut shell);

        assert_eq!(shell.screen(), Screen::GameOver);
        assert!(shell.simulation().is_none());
        assert_eq!(shell.stats().collisions, 1);

        let requests = shell.take_requests();
        let post_race: Vec<_> = requests
            .iter()
            .filter(|r| matches!(r, CommentaryRequest::PostRace { .. }))
            .collect();
        assert_eq!(post_race.len(), 1);
        assert!(!requests.iter().any(|r| matches!(
            r,
            CommentaryRequest::Live { event: GameEvent::Crash, .. }
        )));

        // Frozen: no more frames, input ignored
        let frozen = shell.stats();
        assert!(shell.frame().is_none());
        assert!(!shell.handle_input(LaneInput::Left));
        assert_eq!(shell.stats(), frozen);
    }

    #[test]
    fn test_no_sink_skips_the_frame() {
        let mut shell = Shell::new(&THEMES[0], true);
        shell.start(&THEMES[0], 11);
        for _ in 0..600 {
            assert!(shell.present_frame::<Recorder>(None).is_none());
        }
        let sim = shell.simulation().unwrap();
        assert_fresh(sim, 11);
        assert_eq!(shell.screen(), Screen::Playing);
    }

    #[test]
    fn test_sink_sees_every_frame_through_the_crash() {
        let mut shell = Shell::new(&THEMES[0], true);
        shell.start(&THEMES[0], 11);
        let mut sink = Recorder::default();
        let mut ticks = 0;
        while shell.screen() == Screen::Playing {
            assert!(shell.present_frame(Some(&mut sink)).is_some());
            ticks += 1;
            assert!(ticks < 20_000, "no crash within 20k frames");
        }

        assert_eq!(sink.frames.len(), ticks);
        let (last_frame, last_phase, last_stats) = *sink.frames.last().unwrap();
        assert_eq!(last_frame, ticks as u64);
        assert_eq!(last_phase, RunPhase::Terminated);
        assert_eq!(last_stats, shell.stats());

        // Nothing more to paint once the run is over
        assert!(shell.present_frame(Some(&mut sink)).is_none());
        assert_eq!(sink.frames.len(), ticks);
    }

    #[test]
    fn test_retry_is_a_full_reset() {
        let mut shell = Shell::new(&THEMES[0], true);
        shell.start(&THEMES[2], 21);
        play_until_crash(&mut shell);
        shell.apply_analysis("Rough one.".into());

        shell.retry(21);
        assert_eq!(shell.screen(), Screen::Playing);
        assert_eq!(shell.theme().id, "ARCTIC");
        let sim = shell.simulation().unwrap();
        assert_fresh(sim, 21);
        assert_eq!(sim.phase, RunPhase::Running);
        assert_eq!(shell.stats(), GameStats::initial());
    }

    #[test]
    fn test_retry_ignored_while_playing() {
        let mut shell = Shell::new(&THEMES[0], true);
        shell.start(&THEMES[0], 3);
        for _ in 0..10 {
            shell.frame();
        }
        shell.retry(4);
        assert_eq!(shell.simulation().unwrap().frame_count, 10);
    }

    #[test]
    fn test_to_menu_drops_simulation() {
        let mut shell = Shell::new(&THEMES[0], true);
        shell.start(&THEMES[0], 3);
        shell.to_menu();
        assert_eq!(shell.screen(), Screen::Menu);
        assert!(shell.simulation().is_none());
        assert!(shell.frame().is_none());
    }

    #[test]
    fn test_game_over_view_and_analysis() {
        let mut shell = Shell::new(&THEMES[0], true);
        assert!(shell.game_over_view().is_none());
        shell.start(&THEMES[0], 8);
        play_until_crash(&mut shell);

        assert_eq!(shell.game_over_view().unwrap().analysis, ANALYSIS_PENDING);
        shell.apply_analysis("Nice weaving.".into());
        assert_eq!(shell.game_over_view().unwrap().analysis, "Nice weaving.");
    }

    #[test]
    fn test_commentary_display_window() {
        let mut shell = Shell::new(&THEMES[0], true);
        shell.start(&THEMES[0], 3);
        assert_eq!(shell.visible_commentary(0.0), None);

        shell.apply_commentary("Go go go!".into(), 1000.0);
        assert_eq!(shell.visible_commentary(1000.0), Some("Go go go!"));
        assert_eq!(shell.visible_commentary(3999.0), Some("Go go go!"));
        assert_eq!(shell.visible_commentary(4000.0), None);

        // A newer message restarts the timer
        shell.apply_commentary("Close one!".into(), 3500.0);
        assert_eq!(shell.visible_commentary(6000.0), Some("Close one!"));
    }

    #[test]
    fn test_disabled_commentary_queues_nothing() {
        let mut shell = Shell::new(&THEMES[0], false);
        shell.start(&THEMES[0], 3);
        play_until_crash(&mut shell);
        assert!(shell.take_requests().is_empty());
    }
}
