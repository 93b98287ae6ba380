/*!
Vertical-blank pacing.

The game loop runs one tick per vertical blank and the wait for that pulse is
its only suspension point. The wait sits behind the `VBlank` trait so the
loop body is testable without real timing: production code blocks on a
fixed-rate wall-clock deadline, tests inject a free-running clock that
returns immediately.

`FixedRateVBlank` tracks an absolute deadline rather than sleeping a fixed
amount, so per-tick jitter does not accumulate. If the loop falls more than
one period behind (a debugger pause, a suspended laptop), the deadline is
resynchronized to now instead of fast-forwarding through the backlog.
*/

use std::time::{Duration, Instant};

/// Refresh period of the emulated display (59.7275 Hz).
pub const VBLANK_PERIOD: Duration = Duration::from_nanos(16_742_706);

/// Blocks the caller until the next tick boundary.
pub trait VBlank {
    fn wait(&mut self);
}

/// Wall-clock pacing at a fixed tick rate.
pub struct FixedRateVBlank {
    period: Duration,
    deadline: Instant,
}

impl Default for FixedRateVBlank {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedRateVBlank {
    /// Pace at the display refresh rate.
    pub fn new() -> Self {
        Self::with_period(VBLANK_PERIOD)
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            deadline: Instant::now() + period,
        }
    }
}

impl VBlank for FixedRateVBlank {
    fn wait(&mut self) {
        let now = Instant::now();
        if now < self.deadline {
            std::thread::sleep(self.deadline - now);
            self.deadline += self.period;
        } else if now - self.deadline > self.period {
            // Fell well behind; resync rather than burning ticks to catch up.
            self.deadline = now + self.period;
        } else {
            self.deadline += self.period;
        }
    }
}

/// Test/headless clock: never blocks, counts how many ticks were awaited.
#[derive(Debug, Default)]
pub struct FreeRunningVBlank {
    ticks: u64,
}

impl FreeRunningVBlank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completed waits.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl VBlank for FreeRunningVBlank {
    fn wait(&mut self) {
        self.ticks += 1;
    }
}
