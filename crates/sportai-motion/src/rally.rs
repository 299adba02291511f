//! Rally auto-selection and dead-time skipping.
//!
//! The navigator is driven once per playback tick. It keeps the rally under
//! the playhead selected and, in rallies-only mode, jumps over the gaps
//! between rallies.
//!
//! ```text
//!   lead_in        rally k              gap        lead_in     rally k+1
//! ├────────┼──────────────────────┤ ─ ─ ─ ─ ─ ─ ├────────┼─────────────── ...
//!                               ▲ within end_tolerance:
//!                               └──── seek ────────────►▲
//! ```

use sportai_models::RallyInterval;
use tracing::debug;

use crate::config::RallyNavigatorConfig;
use crate::metrics;

/// The media element the navigator reads time from and seeks.
///
/// Seeks are fire-and-forget: a newer seek overwrites an in-flight one.
pub trait PlaybackClock {
    /// Current playback position in seconds.
    fn current_time(&self) -> f64;

    /// Whether playback is paused.
    fn is_paused(&self) -> bool;

    /// Request a jump to `time` seconds.
    fn seek(&mut self, time: f64);
}

/// Why the navigator asked for a seek.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekReason {
    /// The active rally reached its end; jump to the next one.
    RallyEnded,
    /// Playback sits in dead time before an upcoming rally.
    SkipGap,
    /// The caller asked to jump to a specific rally.
    Jump,
}

impl SeekReason {
    pub fn as_str(self) -> &'static str {
        match self {
            SeekReason::RallyEnded => "rally_ended",
            SeekReason::SkipGap => "skip_gap",
            SeekReason::Jump => "jump",
        }
    }
}

/// A seek the navigator issued.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekRequest {
    pub target: f64,
    pub reason: SeekReason,
}

/// Outcome of one navigator tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NavigationUpdate {
    /// Selected rally after this tick
    pub selected_rally: Option<usize>,
    /// Whether this tick changed the selection
    pub selection_changed: bool,
    /// Seek issued on the clock during this tick
    pub seek: Option<SeekRequest>,
}

/// Tracks the active rally and skips dead time during playback.
#[derive(Debug, Clone)]
pub struct RallyNavigator {
    rallies: Vec<RallyInterval>,
    config: RallyNavigatorConfig,
    selected: Option<usize>,
}

impl RallyNavigator {
    /// Create a navigator over ascending, non-overlapping rallies.
    pub fn new(rallies: Vec<RallyInterval>, config: RallyNavigatorConfig) -> Self {
        Self {
            rallies,
            config,
            selected: None,
        }
    }

    /// Rallies this navigator walks.
    pub fn rallies(&self) -> &[RallyInterval] {
        &self.rallies
    }

    /// Currently selected rally index.
    pub fn selected_rally(&self) -> Option<usize> {
        self.selected
    }

    /// Currently selected rally interval.
    pub fn selected_interval(&self) -> Option<&RallyInterval> {
        self.selected.and_then(|i| self.rallies.get(i))
    }

    /// Whether rallies-only playback is on.
    pub fn rallies_only(&self) -> bool {
        self.config.rallies_only
    }

    /// Toggle rallies-only playback.
    pub fn set_rallies_only(&mut self, enabled: bool) {
        self.config.rallies_only = enabled;
    }

    /// Select a rally explicitly. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.rallies.len() {
            self.selected = Some(index);
            true
        } else {
            false
        }
    }

    /// Called when results first arrive: in rallies-only mode with nothing
    /// selected, select the first rally.
    pub fn on_data_arrival(&mut self) -> Option<usize> {
        if self.config.rallies_only && self.selected.is_none() && !self.rallies.is_empty() {
            self.selected = Some(0);
        }
        self.selected
    }

    /// Index of the rally whose `[start, end]` contains `time`.
    pub fn rally_at(&self, time: f64) -> Option<usize> {
        self.rallies.iter().position(|r| r.contains(time))
    }

    /// Seek the navigator would issue at `time`, without side effects.
    ///
    /// Only ever seeks forward. After the last rally playback continues.
    pub fn plan_seek(&self, time: f64, playing: bool) -> Option<SeekRequest> {
        if !self.config.rallies_only || !playing || !time.is_finite() {
            return None;
        }
        let lead_in = self.config.lead_in;

        let active = self
            .rallies
            .iter()
            .position(|r| time >= r.start_time - lead_in && time <= r.end_time);

        let (target, reason) = match active {
            Some(k) => {
                if self.rallies[k].end_time - time > self.config.end_tolerance {
                    return None;
                }
                let next = self.rallies.get(k + 1)?;
                (next.buffered_start(lead_in), SeekReason::RallyEnded)
            }
            None => {
                let next = self.rallies.iter().find(|r| r.start_time - lead_in > time)?;
                (next.buffered_start(lead_in), SeekReason::SkipGap)
            }
        };

        (target > time).then_some(SeekRequest { target, reason })
    }

    /// Advance the navigator by one playback tick.
    ///
    /// With no clock available nothing is selected and no seek is issued.
    pub fn tick<C: PlaybackClock + ?Sized>(&mut self, clock: Option<&mut C>) -> NavigationUpdate {
        let mut update = NavigationUpdate {
            selected_rally: self.selected,
            ..Default::default()
        };
        let Some(clock) = clock else {
            return update;
        };

        let time = clock.current_time();
        if let Some(k) = self.rally_at(time) {
            if self.selected != Some(k) {
                debug!(rally = k, time, "Entered rally");
                self.selected = Some(k);
                update.selected_rally = Some(k);
                update.selection_changed = true;
            }
        }

        if let Some(request) = self.plan_seek(time, !clock.is_paused()) {
            debug!(
                from = time,
                to = request.target,
                reason = request.reason.as_str(),
                "Rally navigator seek"
            );
            clock.seek(request.target);
            metrics::record_rally_seek(request.reason.as_str());
            update.seek = Some(request);
        }

        update
    }

    /// Select rally `index` and seek to its buffered start.
    pub fn jump_to<C: PlaybackClock + ?Sized>(
        &mut self,
        index: usize,
        clock: Option<&mut C>,
    ) -> Option<SeekRequest> {
        let target = self.rallies.get(index)?.buffered_start(self.config.lead_in);
        self.selected = Some(index);

        let clock = clock?;
        clock.seek(target);
        metrics::record_rally_seek(SeekReason::Jump.as_str());
        Some(SeekRequest {
            target,
            reason: SeekReason::Jump,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Clock that records every seek.
    struct FakeClock {
        time: f64,
        paused: bool,
        seeks: Vec<f64>,
    }

    impl FakeClock {
        fn playing(time: f64) -> Self {
            Self {
                time,
                paused: false,
                seeks: Vec::new(),
            }
        }
    }

    impl PlaybackClock for FakeClock {
        fn current_time(&self) -> f64 {
            self.time
        }

        fn is_paused(&self) -> bool {
            self.paused
        }

        fn seek(&mut self, time: f64) {
            self.seeks.push(time);
            self.time = time;
        }
    }

    fn rallies() -> Vec<RallyInterval> {
        vec![
            RallyInterval::new(5.0, 10.0),
            RallyInterval::new(20.0, 30.0),
            RallyInterval::new(40.0, 45.0),
        ]
    }

    fn navigator(rallies_only: bool) -> RallyNavigator {
        RallyNavigator::new(
            rallies(),
            RallyNavigatorConfig::default().with_rallies_only(rallies_only),
        )
    }

    #[test]
    fn test_first_data_selects_first_rally() {
        let mut nav = navigator(true);
        assert_eq!(nav.on_data_arrival(), Some(0));

        let mut off = navigator(false);
        assert_eq!(off.on_data_arrival(), None);
    }

    #[test]
    fn test_entering_rally_selects_it_and_leaving_keeps_it() {
        let mut nav = navigator(false);
        let mut clock = FakeClock::playing(22.0);

        let update = nav.tick(Some(&mut clock));
        assert_eq!(update.selected_rally, Some(1));
        assert!(update.selection_changed);

        clock.time = 35.0;
        let update = nav.tick(Some(&mut clock));
        assert_eq!(update.selected_rally, Some(1));
        assert!(!update.selection_changed);
        assert!(clock.seeks.is_empty());
    }

    #[test]
    fn test_end_of_rally_jumps_to_next_lead_in() {
        let mut nav = navigator(true);
        let mut clock = FakeClock::playing(9.95);

        let update = nav.tick(Some(&mut clock));
        let seek = update.seek.unwrap();
        assert_eq!(seek.reason, SeekReason::RallyEnded);
        assert!((seek.target - 19.0).abs() < 1e-9);
        assert_eq!(clock.seeks, vec![19.0]);
    }

    #[test]
    fn test_mid_rally_no_seek() {
        let mut nav = navigator(true);
        let mut clock = FakeClock::playing(7.0);
        assert!(nav.tick(Some(&mut clock)).seek.is_none());

        // Inside the lead-in window of rally 1.
        clock.time = 19.5;
        assert!(nav.tick(Some(&mut clock)).seek.is_none());
    }

    #[test]
    fn test_gap_skips_to_upcoming_rally() {
        let mut nav = navigator(true);
        let mut clock = FakeClock::playing(12.0);

        let seek = nav.tick(Some(&mut clock)).seek.unwrap();
        assert_eq!(seek.reason, SeekReason::SkipGap);
        assert!((seek.target - 19.0).abs() < 1e-9);
    }

    #[test]
    fn test_before_first_rally_seeks_to_it() {
        let mut nav = navigator(true);
        let mut clock = FakeClock::playing(0.5);

        let seek = nav.tick(Some(&mut clock)).seek.unwrap();
        assert!((seek.target - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_after_last_rally_playback_continues() {
        let mut nav = navigator(true);
        let mut clock = FakeClock::playing(44.95);
        assert!(nav.tick(Some(&mut clock)).seek.is_none());

        clock.time = 60.0;
        assert!(nav.tick(Some(&mut clock)).seek.is_none());
    }

    #[test]
    fn test_paused_or_disabled_never_seeks() {
        let mut nav = navigator(true);
        let mut clock = FakeClock::playing(12.0);
        clock.paused = true;
        assert!(nav.tick(Some(&mut clock)).seek.is_none());

        let mut off = navigator(false);
        clock.paused = false;
        assert!(off.tick(Some(&mut clock)).seek.is_none());
        assert!(clock.seeks.is_empty());
    }

    #[test]
    fn test_no_clock_or_no_rallies_is_noop() {
        let mut nav = navigator(true);
        let update = nav.tick::<FakeClock>(None);
        assert_eq!(update, NavigationUpdate::default());

        let mut empty = RallyNavigator::new(Vec::new(), RallyNavigatorConfig::default().with_rallies_only(true));
        let mut clock = FakeClock::playing(3.0);
        assert_eq!(empty.on_data_arrival(), None);
        assert_eq!(empty.tick(Some(&mut clock)), NavigationUpdate::default());
        assert!(clock.seeks.is_empty());
    }

    #[test]
    fn test_no_backward_seek_on_overlapping_lead_in() {
        let nav = RallyNavigator::new(
            vec![RallyInterval::new(0.5, 3.0), RallyInterval::new(3.2, 6.0)],
            RallyNavigatorConfig::default().with_rallies_only(true),
        );
        // Overlapping buffered windows: the next lead-in starts behind us.
        assert!(nav.plan_seek(2.95, true).is_none());
    }

    #[test]
    fn test_lead_in_clamped_at_zero() {
        let mut nav = RallyNavigator::new(
            vec![RallyInterval::new(0.5, 3.0)],
            RallyNavigatorConfig::default(),
        );
        let mut clock = FakeClock::playing(2.0);

        let seek = nav.jump_to(0, Some(&mut clock)).unwrap();
        assert_eq!(seek.target, 0.0);
        assert_eq!(clock.seeks, vec![0.0]);
    }

    #[test]
    fn test_toggling_rallies_only_mid_session() {
        let mut nav = navigator(false);
        let mut clock = FakeClock::playing(12.0);
        assert!(nav.tick(Some(&mut clock)).seek.is_none());

        nav.set_rallies_only(true);
        assert!(nav.rallies_only());
        let seek = nav.tick(Some(&mut clock)).seek.unwrap();
        assert_eq!(seek.reason, SeekReason::SkipGap);
        assert!((seek.target - 19.0).abs() < 1e-9);

        nav.set_rallies_only(false);
        clock.time = 32.0;
        assert!(nav.tick(Some(&mut clock)).seek.is_none());
    }

    #[test]
    fn test_jump_to_rally() {
        let mut nav = navigator(false);
        let mut clock = FakeClock::playing(0.0);

        let seek = nav.jump_to(2, Some(&mut clock)).unwrap();
        assert!((seek.target - 39.0).abs() < 1e-9);
        assert_eq!(nav.selected_rally(), Some(2));
        assert!(nav.jump_to(7, Some(&mut clock)).is_none());
        assert!(nav.selected_interval().is_some());
    }
}
