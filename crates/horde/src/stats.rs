//! # Frame Statistics
//!
//! Per-phase timings of [`crate::Simulation::update`]:
//!
//! ```text
//! ┌────────┐   ┌──────────┐   ┌────────┐   ┌────────┐
//! │ INPUT  │──>│ DISPATCH │──>│ MERGE  │──>│ SPAWN  │
//! │ fire   │   │ jobs +   │   │ staged │   │ waves  │
//! │ probes │   │ barrier  │   │ output │   │        │
//! └────────┘   └──────────┘   └────────┘   └────────┘
//! ```

use std::fmt;

/// Timings of one frame, in microseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frame number.
    pub frame: u64,
    /// Whole update.
    pub total_us: u64,
    /// Input, fire timer and probe table.
    pub input_us: u64,
    /// Parallel jobs up to the barrier.
    pub dispatch_us: u64,
    /// Merging staged output.
    pub merge_us: u64,
    /// Wave trigger and escalation.
    pub spawn_us: u64,
    /// Living monsters at the end of the frame.
    pub monsters_alive: u32,
}

/// Running totals over many frames.
#[derive(Clone, Debug)]
pub struct FrameStatsAccumulator {
    /// Frames recorded.
    pub frames_recorded: u64,
    /// Sum of total frame times.
    pub total_us_sum: u64,
    /// Sum of input phase times.
    pub input_us_sum: u64,
    /// Sum of dispatch phase times.
    pub dispatch_us_sum: u64,
    /// Sum of merge phase times.
    pub merge_us_sum: u64,
    /// Sum of spawn phase times.
    pub spawn_us_sum: u64,
    /// Fastest frame.
    pub min_frame_us: u64,
    /// Slowest frame.
    pub max_frame_us: u64,
    /// Frames slower than the budget.
    pub frames_over_budget: u64,
    /// Most monsters alive at once.
    pub peak_monsters: u32,
    budget_us: u64,
}

impl FrameStatsAccumulator {
    /// Creates an accumulator counting frames slower than `budget_ms`.
    #[must_use]
    pub fn new(budget_ms: f32) -> Self {
        Self {
            frames_recorded: 0,
            total_us_sum: 0,
            input_us_sum: 0,
            dispatch_us_sum: 0,
            merge_us_sum: 0,
            spawn_us_sum: 0,
            min_frame_us: u64::MAX,
            max_frame_us: 0,
            frames_over_budget: 0,
            peak_monsters: 0,
            budget_us: (f64::from(budget_ms.max(0.0)) * 1000.0) as u64,
        }
    }

    /// Frame budget in microseconds.
    #[inline]
    #[must_use]
    pub const fn budget_us(&self) -> u64 {
        self.budget_us
    }

    /// Records one frame. Returns true if it went over budget.
    pub fn record(&mut self, stats: FrameStats) -> bool {
        self.frames_recorded += 1;
        self.total_us_sum += stats.total_us;
        self.input_us_sum += stats.input_us;
        self.dispatch_us_sum += stats.dispatch_us;
        self.merge_us_sum += stats.merge_us;
        self.spawn_us_sum += stats.spawn_us;
        self.min_frame_us = self.min_frame_us.min(stats.total_us);
        self.max_frame_us = self.max_frame_us.max(stats.total_us);
        self.peak_monsters = self.peak_monsters.max(stats.monsters_alive);

        let over = stats.total_us > self.budget_us;
        if over {
            self.frames_over_budget += 1;
        }
        over
    }

    fn avg(&self, sum: u64) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        (sum as f64 / self.frames_recorded as f64) / 1000.0
    }

    /// Average frame time in milliseconds.
    #[must_use]
    pub fn avg_frame_ms(&self) -> f64 {
        self.avg(self.total_us_sum)
    }

    /// Share of frames over budget, in `[0, 1]`.
    #[must_use]
    pub fn over_budget_ratio(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        self.frames_over_budget as f64 / self.frames_recorded as f64
    }
}

impl Default for FrameStatsAccumulator {
    fn default() -> Self {
        Self::new(16.666)
    }
}

impl fmt::Display for FrameStatsAccumulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let min = if self.frames_recorded == 0 {
            0
        } else {
            self.min_frame_us
        };
        writeln!(f, "┌─ FRAMES ─────────────────────────────────────┐")?;
        writeln!(f, "│ Recorded:      {}", self.frames_recorded)?;
        writeln!(f, "│ Average:       {:.3} ms", self.avg_frame_ms())?;
        writeln!(f, "│ Min / Max:     {:.3} / {:.3} ms", min as f64 / 1000.0, self.max_frame_us as f64 / 1000.0)?;
        writeln!(
            f,
            "│ Over budget:   {} ({:.1}%)",
            self.frames_over_budget,
            self.over_budget_ratio() * 100.0
        )?;
        writeln!(f, "│ Peak monsters: {}", self.peak_monsters)?;
        writeln!(f, "├─ PHASES ─────────────────────────────────────┤")?;
        writeln!(f, "│ Input:         {:.3} ms", self.avg(self.input_us_sum))?;
        writeln!(f, "│ Dispatch:      {:.3} ms", self.avg(self.dispatch_us_sum))?;
        writeln!(f, "│ Merge:         {:.3} ms", self.avg(self.merge_us_sum))?;
        writeln!(f, "│ Spawn:         {:.3} ms", self.avg(self.spawn_us_sum))?;
        write!(f, "└──────────────────────────────────────────────┘")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulator_tracks_budget() {
        let mut acc = FrameStatsAccumulator::new(10.0);
        assert!(!acc.record(FrameStats {
            total_us: 5_000,
            monsters_alive: 12,
            ..FrameStats::default()
        }));
        assert!(acc.record(FrameStats {
            total_us: 15_000,
            monsters_alive: 4,
            ..FrameStats::default()
        }));

        assert_eq!(acc.frames_recorded, 2);
        assert_eq!(acc.frames_over_budget, 1);
        assert_eq!(acc.min_frame_us, 5_000);
        assert_eq!(acc.max_frame_us, 15_000);
        assert_eq!(acc.peak_monsters, 12);
        assert!((acc.avg_frame_ms() - 10.0).abs() < 1e-9);
        assert!((acc.over_budget_ratio() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_accumulator() {
        let acc = FrameStatsAccumulator::default();
        assert_eq!(acc.avg_frame_ms(), 0.0);
        assert_eq!(acc.over_budget_ratio(), 0.0);
        assert!(acc.to_string().contains("Recorded:      0"));
    }
}
