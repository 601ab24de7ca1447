use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Spawn tile for a freshly created snake, mirrored by the server.
pub const SPAWN_POSITION: Point = Point { x: 5, y: 5 };
/// Heading a freshly created snake moves in until told otherwise.
pub const SPAWN_DIRECTION: Direction = Direction::Right;
/// Key the local player's predicted snake is merged under.
pub const LOCAL_PLAYER_ID: &str = "local";
/// Food never spawns closer than this many tiles to the grid boundary.
pub const FOOD_BOUNDARY_OFFSET: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighboring tile one step along the given heading.
    pub fn shifted(self, direction: Direction) -> Point {
        let (dx, dy) = direction.offset();
        Point {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Unit tile offset, with y growing downward.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Fixed-size tile grid the session plays on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
}

impl Grid {
    /// Both dimensions must be strictly positive.
    pub fn new(width: i32, height: i32) -> Option<Self> {
        if width > 0 && height > 0 {
            Some(Self { width, height })
        } else {
            None
        }
    }

    /// Grid bounds derived from canvas size over tile size.
    pub fn from_canvas(canvas_width: u32, canvas_height: u32, tile_size: u32) -> Option<Self> {
        if tile_size == 0 {
            return None;
        }
        Grid::new(
            (canvas_width / tile_size) as i32,
            (canvas_height / tile_size) as i32,
        )
    }

    /// True iff the grid has at least one tile strictly inside the boundary,
    /// i.e. food rejection sampling can terminate.
    pub fn has_interior(&self) -> bool {
        self.width > 2 * FOOD_BOUNDARY_OFFSET && self.height > 2 * FOOD_BOUNDARY_OFFSET
    }
}

/// True iff the point lies outside [0, width) x [0, height).
pub fn out_of_bounds(p: Point, grid: Grid) -> bool {
    p.x < 0 || p.x >= grid.width || p.y < 0 || p.y >= grid.height
}

/// True iff the point equals any segment of the body.
pub fn intersects(p: Point, body: &[Point]) -> bool {
    body.iter().any(|segment| *segment == p)
}

/// Candidate head tested against the pre-move body: the tail tile still
/// counts as occupied even though it vacates this tick.
pub fn self_collision(candidate: Point, body: &[Point]) -> bool {
    intersects(candidate, body)
}

/// True iff the candidate head lands on any snake other than the excluded one.
pub fn cross_snake_collision(
    candidate: Point,
    snakes: &HashMap<String, SnakeState>,
    excluding_id: &str,
) -> bool {
    snakes
        .iter()
        .filter(|(id, _)| id.as_str() != excluding_id)
        .any(|(_, snake)| intersects(candidate, &snake.body))
}

/// One player's snake as carried in server snapshots and the merged view.
/// `direction` and `alive` are optional on the wire; older servers send only
/// the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnakeState {
    pub body: Vec<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default = "default_alive", alias = "isAlive")]
    pub alive: bool,
}

fn default_alive() -> bool {
    true
}

impl SnakeState {
    pub fn new(body: Vec<Point>) -> Self {
        Self {
            body,
            direction: None,
            alive: true,
        }
    }
}

/// A score as received from the server. Anything non-numeric is kept as-is
/// instead of being coerced, so display fallback and arithmetic stay separate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoreValue {
    Number(u64),
    Invalid(serde_json::Value),
}

impl ScoreValue {
    /// Display boundary: invalid entries render as 0.
    pub fn for_display(&self) -> u64 {
        match self {
            ScoreValue::Number(n) => *n,
            ScoreValue::Invalid(_) => 0,
        }
    }

    /// Arithmetic boundary: increments the numeric arm; an invalid entry is
    /// repaired to 1 rather than corrupted.
    pub fn incremented(&self) -> ScoreValue {
        match self {
            ScoreValue::Number(n) => ScoreValue::Number(n + 1),
            ScoreValue::Invalid(_) => ScoreValue::Number(1),
        }
    }
}

impl Default for ScoreValue {
    fn default() -> Self {
        ScoreValue::Number(0)
    }
}

/// Client-to-server messages. The `method` tag and field names match the
/// server's JSON vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "camelCase")]
pub enum ClientMessage {
    Play {
        direction: Direction,
    },
    FoodEaten {
        #[serde(rename = "playerId")]
        player_id: String,
    },
    RequestState,
}

/// Server-to-client message. Every field is optional and each present field
/// is dispatched independently; an absent field is a no-op, not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collision: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_eaten: Option<bool>,
    /// Identifies the player a unicast collision/foodEaten notice is about.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snakes: Option<HashMap<String, SnakeState>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_position: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<BTreeMap<String, ScoreValue>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shifted_moves_one_tile() {
        let p = Point::new(5, 5);
        assert_eq!(p.shifted(Direction::Up), Point::new(5, 4));
        assert_eq!(p.shifted(Direction::Down), Point::new(5, 6));
        assert_eq!(p.shifted(Direction::Left), Point::new(4, 5));
        assert_eq!(p.shifted(Direction::Right), Point::new(6, 5));
    }

    #[test]
    fn test_opposite_is_involution() {
        for dir in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            assert_ne!(dir.opposite(), dir);
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }

    #[test]
    fn test_grid_rejects_non_positive_dimensions() {
        assert!(Grid::new(0, 10).is_none());
        assert!(Grid::new(10, 0).is_none());
        assert!(Grid::new(-1, 10).is_none());
        assert!(Grid::new(40, 30).is_some());
    }

    #[test]
    fn test_grid_from_canvas() {
        let grid = Grid::from_canvas(800, 600, 20).unwrap();
        assert_eq!(grid.width, 40);
        assert_eq!(grid.height, 30);
        assert!(Grid::from_canvas(800, 600, 0).is_none());
    }

    #[test]
    fn test_out_of_bounds_each_edge() {
        let grid = Grid::new(40, 30).unwrap();

        assert!(out_of_bounds(Point::new(-1, 5), grid));
        assert!(out_of_bounds(Point::new(40, 5), grid));
        assert!(out_of_bounds(Point::new(5, -1), grid));
        assert!(out_of_bounds(Point::new(5, 30), grid));

        assert!(!out_of_bounds(Point::new(0, 0), grid));
        assert!(!out_of_bounds(Point::new(39, 29), grid));
    }

    #[test]
    fn test_intersects_exact_equality() {
        let body = vec![Point::new(5, 5), Point::new(4, 5), Point::new(3, 5)];
        assert!(intersects(Point::new(4, 5), &body));
        assert!(!intersects(Point::new(4, 6), &body));
        assert!(!intersects(Point::new(6, 5), &body));
    }

    #[test]
    fn test_self_collision_counts_vacating_tail() {
        // Head about to move onto the tail tile; the tail has not popped yet
        // so this counts under the pre-move semantics.
        let body = vec![
            Point::new(5, 5),
            Point::new(5, 6),
            Point::new(4, 6),
            Point::new(4, 5),
        ];
        assert!(self_collision(Point::new(4, 5), &body));
    }

    #[test]
    fn test_cross_snake_collision_excludes_own_id() {
        let mut snakes = HashMap::new();
        snakes.insert("local".to_string(), SnakeState::new(vec![Point::new(5, 5)]));
        snakes.insert(
            "p2".to_string(),
            SnakeState::new(vec![Point::new(6, 5), Point::new(7, 5)]),
        );

        assert!(cross_snake_collision(Point::new(6, 5), &snakes, "local"));
        assert!(!cross_snake_collision(Point::new(5, 5), &snakes, "local"));
        assert!(!cross_snake_collision(Point::new(9, 9), &snakes, "local"));
    }

    #[test]
    fn test_play_message_wire_format() {
        let msg = ClientMessage::Play {
            direction: Direction::Right,
        };
        assert_eq!(
            serde_json::to_string(&msg).unwrap(),
            r#"{"method":"play","direction":"RIGHT"}"#
        );
    }

    #[test]
    fn test_food_eaten_message_wire_format() {
        let msg = ClientMessage::FoodEaten {
            player_id: "local".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&msg).unwrap(),
            r#"{"method":"foodEaten","playerId":"local"}"#
        );
    }

    #[test]
    fn test_request_state_wire_format() {
        assert_eq!(
            serde_json::to_string(&ClientMessage::RequestState).unwrap(),
            r#"{"method":"requestState"}"#
        );
    }

    #[test]
    fn test_server_update_all_fields_optional() {
        let update: ServerUpdate = serde_json::from_str("{}").unwrap();
        assert_eq!(update, ServerUpdate::default());
    }

    #[test]
    fn test_server_update_snapshot_fields() {
        let json = r#"{
            "snakes": {
                "p1": {"body": [{"x": 3, "y": 4}, {"x": 2, "y": 4}], "direction": "RIGHT", "isAlive": true},
                "p2": {"body": [{"x": 10, "y": 10}]}
            },
            "foodPosition": {"x": 7, "y": 8}
        }"#;
        let update: ServerUpdate = serde_json::from_str(json).unwrap();

        let snakes = update.snakes.unwrap();
        assert_eq!(snakes["p1"].body.len(), 2);
        assert_eq!(snakes["p1"].direction, Some(Direction::Right));
        assert!(snakes["p1"].alive);
        // Absent liveness defaults to alive.
        assert!(snakes["p2"].alive);
        assert_eq!(update.food_position, Some(Point::new(7, 8)));
        assert!(update.scores.is_none());
        assert!(update.collision.is_none());
    }

    #[test]
    fn test_server_update_collision_notice() {
        let update: ServerUpdate =
            serde_json::from_str(r#"{"collision": true, "playerId": "p3"}"#).unwrap();
        assert_eq!(update.collision, Some(true));
        assert_eq!(update.player_id.as_deref(), Some("p3"));
    }

    #[test]
    fn test_score_value_non_numeric_parses_as_invalid() {
        let update: ServerUpdate =
            serde_json::from_str(r#"{"scores": {"p1": 5, "p2": "x"}}"#).unwrap();
        let scores = update.scores.unwrap();

        assert_eq!(scores["p1"], ScoreValue::Number(5));
        assert!(matches!(scores["p2"], ScoreValue::Invalid(_)));
        assert_eq!(scores["p1"].for_display(), 5);
        assert_eq!(scores["p2"].for_display(), 0);
    }

    #[test]
    fn test_score_value_negative_is_invalid() {
        let score: ScoreValue = serde_json::from_str("-3").unwrap();
        assert!(matches!(score, ScoreValue::Invalid(_)));
        assert_eq!(score.for_display(), 0);
    }

    #[test]
    fn test_score_value_increment_arms() {
        assert_eq!(ScoreValue::Number(4).incremented(), ScoreValue::Number(5));
        let invalid = ScoreValue::Invalid(serde_json::Value::String("x".to_string()));
        assert_eq!(invalid.incremented(), ScoreValue::Number(1));
    }

    #[test]
    fn test_scores_iterate_in_stable_key_order() {
        let update: ServerUpdate =
            serde_json::from_str(r#"{"scores": {"zed": 1, "amy": 2, "mid": 3}}"#).unwrap();
        let scores = update.scores.unwrap();
        let keys: Vec<&str> = scores.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["amy", "mid", "zed"]);
    }
}
