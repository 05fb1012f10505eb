use std::env;
use std::time::{Duration, Instant};

use tracing::warn;

use super::loop_runner::{LoopConfig, SLOW_FRAME_ENV_VAR};

const FALLBACK_MAX_FRAME_DELTA: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FrameTiming {
    pub(crate) now: Instant,
    /// Wall-clock time since the previous frame.
    pub(crate) raw: Duration,
    /// `raw` capped at the maximum frame delta; this is what the scene sees.
    pub(crate) clamped: Duration,
}

impl FrameTiming {
    pub(crate) fn was_clamped(&self) -> bool {
        self.clamped < self.raw
    }
}

/// Redraw timing: frame delta with an upper clamp, an optional debug delay and
/// an optional render rate cap.
#[derive(Debug)]
pub(crate) struct FramePacer {
    max_frame_delta: Duration,
    slow_frame_delay: Duration,
    render_cap: Option<u32>,
    frame_budget: Option<Duration>,
    last_frame: Instant,
    last_present: Instant,
}

impl FramePacer {
    pub(crate) fn from_config(config: &LoopConfig) -> Self {
        Self::starting_at(
            Instant::now(),
            config.max_frame_delta,
            slow_frame_delay_from_env(config.simulated_slow_frame_ms),
            config.max_render_fps,
        )
    }

    pub(crate) fn starting_at(
        now: Instant,
        max_frame_delta: Duration,
        slow_frame_delay: Duration,
        render_cap: Option<u32>,
    ) -> Self {
        let max_frame_delta = if max_frame_delta.is_zero() {
            FALLBACK_MAX_FRAME_DELTA
        } else {
            max_frame_delta
        };
        let render_cap = render_cap.filter(|fps| *fps > 0);
        Self {
            max_frame_delta,
            slow_frame_delay,
            render_cap,
            frame_budget: render_cap.map(|fps| Duration::from_secs_f64(1.0 / f64::from(fps))),
            last_frame: now,
            last_present: now,
        }
    }

    pub(crate) fn max_frame_delta(&self) -> Duration {
        self.max_frame_delta
    }

    pub(crate) fn slow_frame_delay(&self) -> Duration {
        self.slow_frame_delay
    }

    pub(crate) fn render_cap(&self) -> Option<u32> {
        self.render_cap
    }

    pub(crate) fn begin_frame(&mut self, now: Instant) -> FrameTiming {
        let raw = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        FrameTiming {
            now,
            raw,
            clamped: raw.min(self.max_frame_delta),
        }
    }

    /// How long to wait before presenting so the render cap holds.
    pub(crate) fn present_wait(&self, now: Instant) -> Duration {
        let Some(budget) = self.frame_budget else {
            return Duration::ZERO;
        };
        budget.saturating_sub(now.saturating_duration_since(self.last_present))
    }

    pub(crate) fn mark_presented(&mut self, now: Instant) {
        self.last_present = now;
    }
}

pub(crate) fn describe_render_cap(cap: Option<u32>) -> String {
    cap.map_or_else(|| "off".to_string(), |fps| fps.to_string())
}

fn slow_frame_delay_from_env(configured_ms: u64) -> Duration {
    match env::var(SLOW_FRAME_ENV_VAR) {
        Ok(raw) => parse_delay_ms(&raw, configured_ms),
        Err(env::VarError::NotPresent) => Duration::from_millis(configured_ms),
        Err(error) => {
            warn!(
                env_var = SLOW_FRAME_ENV_VAR,
                error = %error,
                "slow_frame_env_unreadable"
            );
            Duration::from_millis(configured_ms)
        }
    }
}

fn parse_delay_ms(raw: &str, configured_ms: u64) -> Duration {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .unwrap_or_else(|_| {
            warn!(env_var = SLOW_FRAME_ENV_VAR, value = raw, "slow_frame_env_invalid");
            Duration::from_millis(configured_ms)
        })
}
