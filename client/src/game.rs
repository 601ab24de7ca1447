use log::debug;
use rand::Rng;
use shared::{
    cross_snake_collision, intersects, out_of_bounds, self_collision, Direction, Grid, Point,
    ScoreValue, ServerUpdate, SnakeState, FOOD_BOUNDARY_OFFSET, LOCAL_PLAYER_ID, SPAWN_POSITION,
};
use std::collections::{BTreeMap, HashMap};

/// Outcome of advancing the local simulation by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    Moved,
    FoodEaten,
    Collision(CollisionKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    Wall,
    OwnBody,
    OtherSnake,
    /// The server declared the collision; the local simulation did not see it.
    Reported,
}

/// Events raised by an inbound server message, in dispatch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerEvent {
    Collision,
    FoodEaten,
    SnapshotReplaced,
    ScoresReplaced,
}

/// The locally predicted snake: body (head first, length >= 1), the current
/// food target, and the terminal flag. Advances one tile per tick without
/// waiting for server confirmation.
#[derive(Debug, Clone)]
pub struct LocalSnake {
    body: Vec<Point>,
    food: Option<Point>,
    grid: Grid,
    terminal: Option<CollisionKind>,
}

impl LocalSnake {
    pub fn new(grid: Grid) -> Self {
        Self {
            body: vec![SPAWN_POSITION],
            food: None,
            grid,
            terminal: None,
        }
    }

    pub fn body(&self) -> &[Point] {
        &self.body
    }

    pub fn food(&self) -> Option<Point> {
        self.food
    }

    pub fn alive(&self) -> bool {
        self.terminal.is_none()
    }

    /// Overwrites the predicted food target, e.g. when an authoritative
    /// snapshot carries a new food position.
    pub fn set_food_target(&mut self, food: Point) {
        self.food = Some(food);
    }

    /// Enters the terminal state on the server's authority.
    pub fn kill(&mut self) {
        self.terminal.get_or_insert(CollisionKind::Reported);
    }

    /// One simulation step along `heading`. Checks wall, self, and
    /// cross-snake collisions against the pre-move body, then food. A
    /// collision is terminal: the body is not mutated and every later call
    /// reports the same collision without side effects.
    pub fn advance<R: Rng>(
        &mut self,
        heading: Direction,
        others: &HashMap<String, SnakeState>,
        rng: &mut R,
    ) -> TickEvent {
        if let Some(kind) = self.terminal {
            return TickEvent::Collision(kind);
        }

        let candidate = self.body[0].shifted(heading);

        if out_of_bounds(candidate, self.grid) {
            return self.halt(CollisionKind::Wall);
        }
        if self_collision(candidate, &self.body) {
            return self.halt(CollisionKind::OwnBody);
        }
        if cross_snake_collision(candidate, others, LOCAL_PLAYER_ID) {
            return self.halt(CollisionKind::OtherSnake);
        }

        if self.food == Some(candidate) {
            // Grow: keep the tail, regenerate food locally.
            self.body.insert(0, candidate);
            self.food = Some(self.place_food(rng));
            return TickEvent::FoodEaten;
        }

        self.body.insert(0, candidate);
        self.body.pop();
        TickEvent::Moved
    }

    fn halt(&mut self, kind: CollisionKind) -> TickEvent {
        self.terminal = Some(kind);
        TickEvent::Collision(kind)
    }

    /// Rejection sampling over the grid interior; resamples while the
    /// candidate lies on the local body.
    fn place_food<R: Rng>(&self, rng: &mut R) -> Point {
        loop {
            let candidate = Point::new(
                rng.gen_range(FOOD_BOUNDARY_OFFSET..self.grid.width - FOOD_BOUNDARY_OFFSET),
                rng.gen_range(FOOD_BOUNDARY_OFFSET..self.grid.height - FOOD_BOUNDARY_OFFSET),
            );
            if !intersects(candidate, &self.body) {
                return candidate;
            }
        }
    }
}

/// Latest authoritative view received from the server. Updated only by
/// wholesale replacement, so readers never observe a partially applied
/// snapshot.
#[derive(Debug, Default)]
pub struct RemoteStateStore {
    snakes: HashMap<String, SnakeState>,
    food: Option<Point>,
    scores: BTreeMap<String, ScoreValue>,
}

impl RemoteStateStore {
    pub fn snakes(&self) -> &HashMap<String, SnakeState> {
        &self.snakes
    }

    pub fn food(&self) -> Option<Point> {
        self.food
    }

    pub fn scores(&self) -> &BTreeMap<String, ScoreValue> {
        &self.scores
    }

    pub fn replace_snapshot(&mut self, snakes: HashMap<String, SnakeState>, food: Point) {
        self.snakes = snakes;
        self.food = Some(food);
    }

    pub fn replace_scores(&mut self, scores: BTreeMap<String, ScoreValue>) {
        self.scores = scores;
    }

    pub fn increment_local_score(&mut self) {
        let entry = self.scores.entry(LOCAL_PLAYER_ID.to_string()).or_default();
        *entry = entry.incremented();
    }
}

/// Merged view handed to the render sink for one frame. Never persisted.
#[derive(Debug, Clone)]
pub struct GameSnapshot {
    pub snakes: HashMap<String, SnakeState>,
    pub food: Option<Point>,
    pub scores: BTreeMap<String, ScoreValue>,
}

/// Owns the predicted local snake and the authoritative remote store, and
/// merges the two for rendering: local prediction wins for the local id,
/// server truth wins for every other id.
pub struct ClientGameState {
    pub local: LocalSnake,
    pub store: RemoteStateStore,
}

impl ClientGameState {
    pub fn new(grid: Grid) -> Self {
        Self {
            local: LocalSnake::new(grid),
            store: RemoteStateStore::default(),
        }
    }

    /// Advances the local prediction one step and applies its side effects
    /// (score bump on predicted food consumption).
    pub fn tick<R: Rng>(&mut self, heading: Direction, rng: &mut R) -> TickEvent {
        let event = self.local.advance(heading, &self.store.snakes, rng);
        if event == TickEvent::FoodEaten {
            self.store.increment_local_score();
        }
        event
    }

    /// Dispatches each present field of a server message independently.
    /// Returns the raised events in dispatch order.
    pub fn apply_server_update(&mut self, update: ServerUpdate) -> Vec<ServerEvent> {
        let mut events = Vec::new();

        if update.collision == Some(true) {
            self.local.kill();
            events.push(ServerEvent::Collision);
        }

        if update.food_eaten == Some(true) {
            events.push(ServerEvent::FoodEaten);
        }

        match (update.snakes, update.food_position) {
            (Some(snakes), Some(food)) => {
                self.store.replace_snapshot(snakes, food);
                self.local.set_food_target(food);
                events.push(ServerEvent::SnapshotReplaced);
            }
            (Some(_), None) | (None, Some(_)) => {
                debug!("partial snapshot ignored: snakes and foodPosition must arrive together");
            }
            (None, None) => {}
        }

        if let Some(scores) = update.scores {
            self.store.replace_scores(scores);
            events.push(ServerEvent::ScoresReplaced);
        }

        events
    }

    /// Composes the frame: the store's snakes with the local prediction
    /// overlaid under the local key, the predicted food target, and the
    /// score table.
    pub fn merged_snapshot(&self, heading: Direction) -> GameSnapshot {
        let mut snakes = self.store.snakes.clone();
        snakes.insert(
            LOCAL_PLAYER_ID.to_string(),
            SnakeState {
                body: self.local.body.clone(),
                direction: Some(heading),
                alive: self.local.alive(),
            },
        );

        GameSnapshot {
            snakes,
            food: self.local.food,
            scores: self.store.scores.clone(),
        }
    }
}
