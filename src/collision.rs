/*!
Collision and scoring resolution.

`resolve` runs once per tick, after every entity has integrated, and applies
these rules in a fixed order:

1. Paddle boundary clamp: a paddle sitting at a wall with its velocity still
   pointing outward has that velocity forced to zero.
2. Ball wall reflection: the ball bounces elastically off the top and bottom
   edges. A simultaneous x/y corner is not special-cased.
3. Miss/scoring: a ball crossing the left or right boundary scores one for
   the opposite side, has its on-screen footprint erased, and is re-served
   from the field center with a fresh random diagonal.
4. Paddle reflection: each paddle is tested independently with an inclusive
   AABB overlap; an overlap negates the ball's horizontal velocity. A ball
   overlapping both paddles in one tick double-reflects; accepted.

Everything here is bounded integer arithmetic over a fixed coordinate space;
there are no failure modes and nothing to return.
*/

use rand::Rng;

use crate::entity::Entity;
use crate::frame_buffer::{FrameBuffer, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::game::Scores;

/// Ball speed per axis in pixels per tick.
pub const BALL_SPEED: i32 = 2;

/// Zero a paddle's velocity if it sits at a wall and is still heading into
/// it. Positions stay in bounds because paddle geometry and speed keep `y`
/// landing exactly on the walls.
#[inline]
pub fn clamp_paddle(paddle: &mut Entity) {
    if (paddle.y <= 0 && paddle.velocity_y < 0)
        || (paddle.y >= SCREEN_HEIGHT as i32 - paddle.height && paddle.velocity_y > 0)
    {
        paddle.velocity_y = 0;
    }
}

/// Center the ball and serve it with an independently random ±`BALL_SPEED`
/// on each axis. Also used for the initial serve.
pub fn reset_ball<R: Rng>(ball: &mut Entity, rng: &mut R) {
    ball.move_to(
        SCREEN_WIDTH as i32 / 2 - ball.width / 2,
        SCREEN_HEIGHT as i32 / 2 - ball.height / 2,
    );
    ball.velocity_x = if rng.gen_range(0..2) == 0 {
        BALL_SPEED
    } else {
        -BALL_SPEED
    };
    ball.velocity_y = if rng.gen_range(0..2) == 0 {
        BALL_SPEED
    } else {
        -BALL_SPEED
    };
}

/// Resolve one tick's interactions between the ball, both paddles, and the
/// playfield boundaries. Mutates velocities, scores, and (on a re-serve) the
/// frame buffer.
pub fn resolve<R: Rng>(
    ball: &mut Entity,
    player: &mut Entity,
    cpu: &mut Entity,
    scores: &mut Scores,
    fb: &mut FrameBuffer,
    rng: &mut R,
) {
    clamp_paddle(player);
    clamp_paddle(cpu);

    // Ball bounces off ceiling and floor while moving further into them.
    if (ball.y <= 0 && ball.velocity_y < 0)
        || (ball.y >= SCREEN_HEIGHT as i32 - ball.height && ball.velocity_y > 0)
    {
        ball.velocity_y = -ball.velocity_y;
    }

    // Past the left wall: point for the cpu side. The footprint still on
    // screen is the one drawn last tick, at the previous position.
    if ball.x <= 0 {
        scores.cpu += 1;
        fb.erase_rect(ball.prev_x, ball.prev_y, ball.width, ball.height);
        reset_ball(ball, rng);
    }

    // Past the right wall: point for the player side.
    if ball.x + ball.width >= SCREEN_WIDTH as i32 {
        scores.player += 1;
        fb.erase_rect(ball.prev_x, ball.prev_y, ball.width, ball.height);
        reset_ball(ball, rng);
    }

    // Paddle faces. Checked independently; a ball overlapping both in the
    // same tick reverses twice.
    if ball.overlaps(cpu) {
        ball.velocity_x = -ball.velocity_x;
    }
    if ball.overlaps(player) {
        ball.velocity_x = -ball.velocity_x;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame_buffer::{BACKGROUND, WHITE};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(0x5EED)
    }

    fn parts() -> (Entity, Entity, Entity, Scores, FrameBuffer) {
        let player = Entity::new(1, 64, 8, 32);
        let cpu = Entity::new(231, 64, 8, 32);
        let ball = Entity::new(116, 75, 8, 10);
        (ball, player, cpu, Scores::default(), FrameBuffer::new())
    }

    #[test]
    fn paddle_clamped_at_top_while_pushing_up() {
        let mut p = Entity::new(1, 0, 8, 32);
        p.velocity_y = -2;
        clamp_paddle(&mut p);
        assert_eq!(p.velocity_y, 0);
        assert_eq!(p.y, 0);
    }

    #[test]
    fn paddle_clamped_at_bottom_while_pushing_down() {
        let mut p = Entity::new(1, 128, 8, 32);
        p.velocity_y = 2;
        clamp_paddle(&mut p);
        assert_eq!(p.velocity_y, 0);
    }

    #[test]
    fn paddle_moving_away_from_wall_is_not_clamped() {
        let mut p = Entity::new(1, 0, 8, 32);
        p.velocity_y = 2;
        clamp_paddle(&mut p);
        assert_eq!(p.velocity_y, 2);
    }

    #[test]
    fn ball_reflects_off_ceiling_and_floor() {
        let (mut ball, mut player, mut cpu, mut scores, mut fb) = parts();
        ball.y = 0;
        ball.velocity_y = -2;
        resolve(&mut ball, &mut player, &mut cpu, &mut scores, &mut fb, &mut rng());
        assert_eq!(ball.velocity_y, 2);

        ball.y = SCREEN_HEIGHT as i32 - ball.height;
        resolve(&mut ball, &mut player, &mut cpu, &mut scores, &mut fb, &mut rng());
        assert_eq!(ball.velocity_y, -2);
    }

    #[test]
    fn ball_moving_away_from_wall_keeps_its_velocity() {
        let (mut ball, mut player, mut cpu, mut scores, mut fb) = parts();
        ball.y = 0;
        ball.velocity_y = 2;
        resolve(&mut ball, &mut player, &mut cpu, &mut scores, &mut fb, &mut rng());
        assert_eq!(ball.velocity_y, 2);
    }

    #[test]
    fn left_exit_scores_for_cpu_and_reserves_from_center() {
        let (mut ball, mut player, mut cpu, mut scores, mut fb) = parts();
        player.y = 120; // out of the ball's path
        ball.move_to(2, 40);
        ball.velocity_x = -2;
        ball.integrate();
        // What last tick's draw pass left on screen.
        fb.fill_rect(ball.prev_x, ball.prev_y, ball.width, ball.height, WHITE);

        resolve(&mut ball, &mut player, &mut cpu, &mut scores, &mut fb, &mut rng());

        assert_eq!(scores.cpu, 1);
        assert_eq!(scores.player, 0);
        assert_eq!((ball.x, ball.y), (116, 75));
        assert_eq!((ball.prev_x, ball.prev_y), (116, 75));
        assert!(ball.velocity_x == 2 || ball.velocity_x == -2);
        assert!(ball.velocity_y == 2 || ball.velocity_y == -2);
        // The drawn footprint was erased.
        assert_eq!(fb.pixel(2, 40), BACKGROUND);
        assert_eq!(fb.pixel(9, 49), BACKGROUND);
    }

    #[test]
    fn right_exit_scores_for_player() {
        let (mut ball, mut player, mut cpu, mut scores, mut fb) = parts();
        cpu.y = 0; // out of the ball's path
        ball.x = SCREEN_WIDTH as i32 - ball.width;
        ball.y = 120;
        ball.velocity_x = 2;

        resolve(&mut ball, &mut player, &mut cpu, &mut scores, &mut fb, &mut rng());

        assert_eq!(scores.player, 1);
        assert_eq!(scores.cpu, 0);
        assert_eq!((ball.x, ball.y), (116, 75));
    }

    #[test]
    fn ball_touching_paddle_face_reverses_horizontally() {
        let (mut ball, mut player, mut cpu, mut scores, mut fb) = parts();
        // Right edge exactly on the cpu paddle's left face.
        ball.x = cpu.x - ball.width;
        ball.y = 70;
        ball.velocity_x = 2;
        ball.velocity_y = 2;

        resolve(&mut ball, &mut player, &mut cpu, &mut scores, &mut fb, &mut rng());

        assert_eq!(ball.velocity_x, -2);
        assert_eq!(ball.velocity_y, 2);
        assert_eq!(scores, Scores::default());
    }

    #[test]
    fn ball_clear_of_both_paddles_is_untouched() {
        let (mut ball, mut player, mut cpu, mut scores, mut fb) = parts();
        ball.velocity_x = 2;
        ball.velocity_y = -2;
        resolve(&mut ball, &mut player, &mut cpu, &mut scores, &mut fb, &mut rng());
        assert_eq!((ball.velocity_x, ball.velocity_y), (2, -2));
        assert_eq!((ball.x, ball.y), (116, 75));
    }
}
