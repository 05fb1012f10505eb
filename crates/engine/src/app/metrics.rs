use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopMetricsSnapshot {
    pub fps: f32,
    pub frame_time_ms: f32,
    pub worst_frame_time_ms: f32,
}

#[derive(Debug, Clone, Copy, Default)]
struct FrameWindow {
    count: u32,
    total: Duration,
    worst: Duration,
}

impl FrameWindow {
    fn push(&mut self, frame_dt: Duration) {
        self.count = self.count.saturating_add(1);
        self.total = self.total.saturating_add(frame_dt);
        self.worst = self.worst.max(frame_dt);
    }

    fn summarize(&self, elapsed: Duration) -> LoopMetricsSnapshot {
        let mean_ms = match self.count {
            0 => 0.0,
            count => self.total.as_secs_f32() * 1000.0 / count as f32,
        };
        LoopMetricsSnapshot {
            fps: self.count as f32 / elapsed.as_secs_f32().max(f32::EPSILON),
            frame_time_ms: mean_ms,
            worst_frame_time_ms: self.worst.as_secs_f32() * 1000.0,
        }
    }
}

/// Frame statistics over fixed wall-clock intervals; one snapshot per
/// interval, then the window starts over.
#[derive(Debug)]
pub(crate) struct MetricsAccumulator {
    window_start: Instant,
    interval: Duration,
    window: FrameWindow,
}

impl MetricsAccumulator {
    pub(crate) fn new(interval: Duration) -> Self {
        Self::starting_at(Instant::now(), interval)
    }

    pub(crate) fn starting_at(window_start: Instant, interval: Duration) -> Self {
        Self {
            window_start,
            interval,
            window: FrameWindow::default(),
        }
    }

    pub(crate) fn record_frame(&mut self, frame_dt: Duration) {
        self.window.push(frame_dt);
    }

    pub(crate) fn maybe_snapshot(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.interval {
            return None;
        }
        let snapshot = self.window.summarize(elapsed);
        self.window = FrameWindow::default();
        self.window_start = now;
        Some(snapshot)
    }
}
