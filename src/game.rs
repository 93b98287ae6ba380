/*!
Game state and per-tick orchestration.

One `Game` owns every piece of mutable state: the frame buffer, the three
entities, the score pair, the phase machine, the input port, the opponent
controller, and the RNG. There are no globals; everything is mutated in
place, once per tick, in a fixed order.

Tick order while playing:
1. draw static scenery (dashed divider)
2. poll input edges and translate them into player paddle velocity
3. clamp + integrate the player paddle
4. integrate the ball
5. opponent decision, clamp + integrate the cpu paddle
6. collision/scoring resolution
7. erase every entity's previous footprint, draw its current one
8. win-condition check (may enter the banner phase)
9. score readout redraw
10. commit previous positions for the next tick

Phase machine: `Playing` flips to `WinBanner` when a side reaches
`WIN_SCORE`; scores and entity layout reset immediately and physics freezes
while the banner counts down `BANNER_TICKS` ticks. On expiry the banner's
exact footprint is erased and the ball is re-served.

The vertical-blank wait deliberately lives outside `tick`: callers pace the
loop through a `VBlank` impl, tests call `tick` back to back.
*/

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::ai::OpponentController;
use crate::collision;
use crate::entity::Entity;
use crate::font::{self, GLYPH_HEIGHT};
use crate::frame_buffer::{FrameBuffer, SCREEN_HEIGHT, SCREEN_WIDTH, WHITE};
use crate::input::{Button, Edges, InputPort};

/// Score a side needs to win the game.
pub const WIN_SCORE: u32 = 5;
/// Ticks the win banner stays on screen.
pub const BANNER_TICKS: u32 = 150;

const PADDLE_WIDTH: i32 = 8;
const PADDLE_HEIGHT: i32 = 32;
const BALL_WIDTH: i32 = 8;
const BALL_HEIGHT: i32 = 10;
/// Player paddle speed in pixels per tick.
const PLAYER_SPEED: i32 = 2;

// Entity colors (15-bit BGR).
const PLAYER_COLOR: u16 = 0x7C00;
const CPU_COLOR: u16 = 0x03E0;
const BALL_COLOR: u16 = WHITE;

// Dashed center divider.
const DIVIDER_X: i32 = SCREEN_WIDTH as i32 / 2;
const DASH_LENGTH: i32 = 6;
const GAP_LENGTH: i32 = 4;

// Score readout anchors.
const PLAYER_SCORE_X: i32 = 20;
const CPU_SCORE_X: i32 = 200;
const SCORE_Y: i32 = 10;

// Win banner baseline.
const BANNER_Y: i32 = 40;

/// Which side of the field.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    Player,
    Cpu,
}

/// Points per side. Reset to zero when a game is won.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Scores {
    pub player: u32,
    pub cpu: u32,
}

/// Loop phase: normal play, or frozen behind the win banner.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Playing,
    WinBanner { winner: Side, frames_remaining: u32 },
}

pub struct Game {
    fb: FrameBuffer,
    player: Entity,
    cpu: Entity,
    ball: Entity,
    scores: Scores,
    phase: Phase,
    input: InputPort,
    ai: OpponentController,
    rng: SmallRng,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// New game with an entropy-seeded RNG.
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    /// New game with a fixed RNG seed; serves and misses are reproducible.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    fn with_rng(mut rng: SmallRng) -> Self {
        let paddle_y = (SCREEN_HEIGHT as i32 - PADDLE_HEIGHT) / 2;
        let player = Entity::new(1, paddle_y, PADDLE_WIDTH, PADDLE_HEIGHT);
        let cpu = Entity::new(
            SCREEN_WIDTH as i32 - PADDLE_WIDTH - 1,
            paddle_y,
            PADDLE_WIDTH,
            PADDLE_HEIGHT,
        );
        let mut ball = Entity::new(0, 0, BALL_WIDTH, BALL_HEIGHT);
        collision::reset_ball(&mut ball, &mut rng);

        Self {
            fb: FrameBuffer::new(),
            player,
            cpu,
            ball,
            scores: Scores::default(),
            phase: Phase::Playing,
            input: InputPort::new(),
            ai: OpponentController::new(),
            rng,
        }
    }

    /// Feed live button state from the frontend.
    pub fn set_button(&mut self, button: Button, held: bool) {
        self.input.set_button(button, held);
    }

    #[inline]
    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.fb
    }

    #[inline]
    pub fn scores(&self) -> Scores {
        self.scores
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn player_paddle(&self) -> &Entity {
        &self.player
    }

    #[inline]
    pub fn cpu_paddle(&self) -> &Entity {
        &self.cpu
    }

    #[inline]
    pub fn ball(&self) -> &Entity {
        &self.ball
    }

    /// Run one tick. The caller has already waited for the vertical blank.
    pub fn tick(&mut self) {
        // Poll in both phases so edges seen during the banner are consumed
        // rather than firing late when play resumes.
        let edges = self.input.poll();
        match self.phase {
            Phase::Playing => self.playing_tick(edges),
            Phase::WinBanner {
                winner,
                frames_remaining,
            } => self.banner_tick(winner, frames_remaining),
        }
    }

    fn playing_tick(&mut self, edges: Edges) {
        self.draw_divider();

        // Edge-driven paddle control: a release of either key stops the
        // paddle, a fresh press starts it moving unless already at the wall.
        if edges.just_released(Button::Up) || edges.just_released(Button::Down) {
            self.player.velocity_y = 0;
        }
        if edges.just_pressed(Button::Up) && self.player.y > 0 {
            self.player.velocity_y = -PLAYER_SPEED;
        }
        if edges.just_pressed(Button::Down)
            && self.player.y < SCREEN_HEIGHT as i32 - self.player.height
        {
            self.player.velocity_y = PLAYER_SPEED;
        }
        collision::clamp_paddle(&mut self.player);
        self.player.integrate();

        self.ball.integrate();

        self.ai.update(&mut self.cpu, &self.ball, &mut self.rng);
        collision::clamp_paddle(&mut self.cpu);
        self.cpu.integrate();

        let before = self.scores;
        collision::resolve(
            &mut self.ball,
            &mut self.player,
            &mut self.cpu,
            &mut self.scores,
            &mut self.fb,
            &mut self.rng,
        );
        if self.scores != before {
            log::debug!("score: player {} cpu {}", self.scores.player, self.scores.cpu);
        }

        self.fb.erase_rect(
            self.player.prev_x,
            self.player.prev_y,
            self.player.width,
            self.player.height,
        );
        self.fb
            .erase_rect(self.cpu.prev_x, self.cpu.prev_y, self.cpu.width, self.cpu.height);
        self.fb
            .erase_rect(self.ball.prev_x, self.ball.prev_y, self.ball.width, self.ball.height);

        self.fb.fill_rect(
            self.player.x,
            self.player.y,
            self.player.width,
            self.player.height,
            PLAYER_COLOR,
        );
        self.fb
            .fill_rect(self.cpu.x, self.cpu.y, self.cpu.width, self.cpu.height, CPU_COLOR);
        self.fb
            .fill_rect(self.ball.x, self.ball.y, self.ball.width, self.ball.height, BALL_COLOR);

        if self.scores.player >= WIN_SCORE {
            self.enter_banner(Side::Player);
        } else if self.scores.cpu >= WIN_SCORE {
            self.enter_banner(Side::Cpu);
        }

        self.draw_scores();

        self.player.commit_prev();
        self.cpu.commit_prev();
        self.ball.commit_prev();
    }

    // Physics is frozen while the banner is up; only scenery repaints and
    // the countdown runs.
    fn banner_tick(&mut self, winner: Side, frames_remaining: u32) {
        self.draw_divider();
        self.draw_banner(winner);
        self.draw_scores();

        if frames_remaining <= 1 {
            self.erase_banner(winner);
            collision::reset_ball(&mut self.ball, &mut self.rng);
            log::debug!(
                "banner down, serving: velocity ({}, {})",
                self.ball.velocity_x,
                self.ball.velocity_y
            );
            self.phase = Phase::Playing;
        } else {
            self.phase = Phase::WinBanner {
                winner,
                frames_remaining: frames_remaining - 1,
            };
        }
    }

    fn enter_banner(&mut self, winner: Side) {
        log::info!(
            "game over: {} side wins at {}-{}",
            match winner {
                Side::Player => "player",
                Side::Cpu => "cpu",
            },
            self.scores.player,
            self.scores.cpu
        );

        // Clear both footprints of everything before teleporting it home;
        // the draw pass above may already have painted the new positions.
        for (px, py, x, y, w, h) in [
            (self.player.prev_x, self.player.prev_y, self.player.x, self.player.y, self.player.width, self.player.height),
            (self.cpu.prev_x, self.cpu.prev_y, self.cpu.x, self.cpu.y, self.cpu.width, self.cpu.height),
            (self.ball.prev_x, self.ball.prev_y, self.ball.x, self.ball.y, self.ball.width, self.ball.height),
        ] {
            self.fb.erase_rect(px, py, w, h);
            self.fb.erase_rect(x, y, w, h);
        }

        self.scores = Scores::default();
        self.reset_layout();

        // Show the frozen field behind the banner.
        self.fb.fill_rect(
            self.player.x,
            self.player.y,
            self.player.width,
            self.player.height,
            PLAYER_COLOR,
        );
        self.fb
            .fill_rect(self.cpu.x, self.cpu.y, self.cpu.width, self.cpu.height, CPU_COLOR);
        self.fb
            .fill_rect(self.ball.x, self.ball.y, self.ball.width, self.ball.height, BALL_COLOR);
        self.draw_banner(winner);

        self.phase = Phase::WinBanner {
            winner,
            frames_remaining: BANNER_TICKS,
        };
    }

    // Paddles back to mid-court, ball held motionless at center until the
    // banner comes down and the next serve randomizes its velocity.
    fn reset_layout(&mut self) {
        let paddle_y = (SCREEN_HEIGHT as i32 - PADDLE_HEIGHT) / 2;
        self.player.move_to(1, paddle_y);
        self.player.velocity_y = 0;
        self.cpu.move_to(SCREEN_WIDTH as i32 - PADDLE_WIDTH - 1, paddle_y);
        self.cpu.velocity_y = 0;
        self.ball.move_to(
            SCREEN_WIDTH as i32 / 2 - BALL_WIDTH / 2,
            SCREEN_HEIGHT as i32 / 2 - BALL_HEIGHT / 2,
        );
        self.ball.velocity_x = 0;
        self.ball.velocity_y = 0;
        self.ai.reset();
    }

    fn draw_divider(&mut self) {
        let mut y = 0;
        while y < SCREEN_HEIGHT as i32 {
            let end = (y + DASH_LENGTH).min(SCREEN_HEIGHT as i32);
            for dy in y..end {
                self.fb.set_pixel(DIVIDER_X, dy, WHITE);
            }
            y += DASH_LENGTH + GAP_LENGTH;
        }
    }

    fn draw_scores(&mut self) {
        self.fb
            .erase_rect(PLAYER_SCORE_X, SCORE_Y, font::score_area_width(), GLYPH_HEIGHT);
        self.fb
            .erase_rect(CPU_SCORE_X, SCORE_Y, font::score_area_width(), GLYPH_HEIGHT);
        font::draw_score(&mut self.fb, self.scores.player, PLAYER_SCORE_X, SCORE_Y, WHITE);
        font::draw_score(&mut self.fb, self.scores.cpu, CPU_SCORE_X, SCORE_Y, WHITE);
    }

    fn banner_text(winner: Side) -> &'static str {
        match winner {
            Side::Player => "PLAYER WINS",
            Side::Cpu => "CPU WINS",
        }
    }

    fn draw_banner(&mut self, winner: Side) {
        let text = Self::banner_text(winner);
        let x = (SCREEN_WIDTH as i32 - font::text_width(text)) / 2;
        font::draw_text(&mut self.fb, x, BANNER_Y, text, WHITE);
    }

    fn erase_banner(&mut self, winner: Side) {
        let text = Self::banner_text(winner);
        let width = font::text_width(text);
        let x = (SCREEN_WIDTH as i32 - width) / 2;
        self.fb.erase_rect(x, BANNER_Y, width, GLYPH_HEIGHT);
    }
}
