/*!
Opponent paddle controller.

A scripted reactive heuristic, deliberately imperfect:
- Tracking rule: steer toward the ball's vertical center at a fixed speed,
  holding still while the center is within the paddle's vertical span.
- Reaction delay: the direction is only re-decided every
  `REACTION_INTERVAL`th tick; between decisions the previous velocity is
  held, so the paddle keeps gliding the wrong way for a couple of ticks
  after the ball reverses.
- Stochastic miss: each decision has a 1-in-`MISS_DENOM` chance of producing
  no movement for that whole decision window.

The controller only chooses a velocity; the orchestrator runs the chosen
velocity through the same clamp/integrate path as the player paddle.
*/

use rand::Rng;

use crate::entity::Entity;

/// Opponent paddle speed in pixels per tick.
pub const OPPONENT_SPEED: i32 = 2;
/// Ticks between direction decisions.
pub const REACTION_INTERVAL: u32 = 3;
// 1-in-N chance that a decision window is a whiff.
const MISS_DENOM: u32 = 4;

#[derive(Clone, Debug, Default)]
pub struct OpponentController {
    // Ticks until the next decision; 0 means decide now.
    cooldown: u32,
    // Velocity chosen at the last decision, held between decisions.
    decision: i32,
}

impl OpponentController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the held decision and decide afresh on the next tick.
    pub fn reset(&mut self) {
        self.cooldown = 0;
        self.decision = 0;
    }

    /// Choose the paddle's velocity for this tick.
    pub fn update<R: Rng>(&mut self, paddle: &mut Entity, ball: &Entity, rng: &mut R) {
        if self.cooldown == 0 {
            self.cooldown = REACTION_INTERVAL;
            self.decision = if rng.gen_range(0..MISS_DENOM) == 0 {
                0
            } else {
                Self::track(paddle, ball)
            };
        }
        self.cooldown -= 1;
        paddle.velocity_y = self.decision;
    }

    // Deterministic tracking rule: chase the ball's vertical center.
    fn track(paddle: &Entity, ball: &Entity) -> i32 {
        let ball_center = ball.y + ball.height / 2;
        if ball_center < paddle.top() {
            -OPPONENT_SPEED
        } else if ball_center > paddle.bottom() {
            OPPONENT_SPEED
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    // Constant-output generators. An all-zero word samples to 0 (miss) in a
    // 0..4 range; 2^30 widening-multiplies to exactly 1 (no miss) without
    // ever hitting the sampler's rejection zone.
    struct AlwaysMiss;
    struct NeverMiss;

    impl RngCore for AlwaysMiss {
        fn next_u32(&mut self) -> u32 {
            0
        }
        fn next_u64(&mut self) -> u64 {
            0
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            dest.fill(0);
            Ok(())
        }
    }

    impl RngCore for NeverMiss {
        fn next_u32(&mut self) -> u32 {
            1 << 30
        }
        fn next_u64(&mut self) -> u64 {
            1 << 62
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            dest.fill(0);
            Ok(())
        }
    }

    fn paddle() -> Entity {
        Entity::new(231, 64, 8, 32)
    }

    #[test]
    fn tracks_toward_ball_center() {
        let p = paddle();
        let above = Entity::new(120, 10, 8, 10);
        let below = Entity::new(120, 140, 8, 10);
        let inside = Entity::new(120, 70, 8, 10);
        assert_eq!(OpponentController::track(&p, &above), -OPPONENT_SPEED);
        assert_eq!(OpponentController::track(&p, &below), OPPONENT_SPEED);
        assert_eq!(OpponentController::track(&p, &inside), 0);
    }

    #[test]
    fn decision_is_held_between_evaluations() {
        let mut ai = OpponentController::new();
        let mut p = paddle();
        let mut rng = NeverMiss;

        let above = Entity::new(120, 10, 8, 10);
        ai.update(&mut p, &above, &mut rng);
        assert_eq!(p.velocity_y, -OPPONENT_SPEED);

        // Ball jumps below the paddle, but the held decision persists for
        // the rest of the reaction window.
        let below = Entity::new(120, 140, 8, 10);
        for _ in 1..REACTION_INTERVAL {
            ai.update(&mut p, &below, &mut rng);
            assert_eq!(p.velocity_y, -OPPONENT_SPEED);
        }

        // Next tick starts a new window and re-decides.
        ai.update(&mut p, &below, &mut rng);
        assert_eq!(p.velocity_y, OPPONENT_SPEED);
    }

    #[test]
    fn miss_suppresses_the_whole_decision_window() {
        let mut ai = OpponentController::new();
        let mut p = paddle();
        let mut rng = AlwaysMiss;

        let above = Entity::new(120, 10, 8, 10);
        for _ in 0..REACTION_INTERVAL * 2 {
            ai.update(&mut p, &above, &mut rng);
            assert_eq!(p.velocity_y, 0);
        }
    }

    #[test]
    fn reset_forces_a_fresh_decision() {
        let mut ai = OpponentController::new();
        let mut p = paddle();
        let mut rng = NeverMiss;

        let above = Entity::new(120, 10, 8, 10);
        ai.update(&mut p, &above, &mut rng);
        assert_eq!(p.velocity_y, -OPPONENT_SPEED);

        ai.reset();
        let below = Entity::new(120, 140, 8, 10);
        ai.update(&mut p, &below, &mut rng);
        assert_eq!(p.velocity_y, OPPONENT_SPEED);
    }
}
