use crate::game::GameSnapshot;
use macroquad::prelude::*;
use shared::{Point, SnakeState, LOCAL_PLAYER_ID};

const BACKGROUND: Color = Color::new(0.11, 0.09, 0.26, 1.0); // #1c1743
const LOCAL_SNAKE: Color = Color::new(0.96, 0.15, 0.29, 1.0); // #f62649
const REMOTE_SNAKE: Color = Color::new(0.62, 0.14, 0.23, 1.0);
const DEAD_SNAKE: Color = Color::new(0.35, 0.35, 0.35, 1.0);
const FOOD: Color = Color::new(0.96, 0.95, 0.29, 1.0); // #f6f14b

const SCORE_FONT_SIZE: f32 = 20.0;
const SCORE_X: f32 = 10.0;
const SCORE_LINE_STEP: f32 = 30.0;

pub struct Renderer {
    width: f32,
    height: f32,
    tile_size: f32,
}

impl Renderer {
    pub fn new(width: u32, height: u32, tile_size: u32) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Renderer {
            width: width as f32,
            height: height as f32,
            tile_size: tile_size as f32,
        })
    }

    /// Paints one merged frame: background, every snake as filled tiles, the
    /// food tile, then a score line per player in stable key order.
    pub fn render(&mut self, snapshot: &GameSnapshot) {
        clear_background(BLACK);
        draw_rectangle(0.0, 0.0, self.width, self.height, BACKGROUND);

        for (id, snake) in &snapshot.snakes {
            self.draw_snake(id, snake);
        }

        if let Some(food) = snapshot.food {
            self.draw_tile(food, FOOD);
        }

        self.draw_scores(snapshot);
    }

    fn draw_snake(&mut self, id: &str, snake: &SnakeState) {
        let color = if !snake.alive {
            DEAD_SNAKE
        } else if id == LOCAL_PLAYER_ID {
            LOCAL_SNAKE
        } else {
            REMOTE_SNAKE
        };

        for segment in &snake.body {
            self.draw_tile(*segment, color);
        }
    }

    fn draw_tile(&mut self, p: Point, color: Color) {
        draw_rectangle(
            p.x as f32 * self.tile_size,
            p.y as f32 * self.tile_size,
            self.tile_size,
            self.tile_size,
            color,
        );
    }

    fn draw_scores(&mut self, snapshot: &GameSnapshot) {
        let mut y = SCORE_FONT_SIZE;
        // BTreeMap iteration keeps the lines in stable key order; invalid
        // score values fall back to 0 here at the display boundary.
        for (index, (_, score)) in snapshot.scores.iter().enumerate() {
            let line = format!("Player {}: {}", index + 1, score.for_display());
            draw_text(&line, SCORE_X, y, SCORE_FONT_SIZE, WHITE);
            y += SCORE_LINE_STEP;
        }
    }
}
