use std::collections::VecDeque;

use rand::rngs::ThreadRng;
use rand::Rng;

// ============================================================================
// Configuration
// ============================================================================

pub const BOARD_WIDTH: i32 = 800;
pub const BOARD_HEIGHT: i32 = 600;
pub const SEGMENT_SIZE: i32 = 20;

// Timing (in milliseconds)
pub const TICK_MS: u64 = 150;

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    Stopped,
}

impl Direction {
    fn is_opposite_of(&self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
                | (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
        )
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameStatus {
    Playing,
    Paused,
    GameOver,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SnakeEvent {
    AteFood,
    Paused,
    Unpaused,
    Restarted,
    GameOver,
}

// ============================================================================
// Snake
// ============================================================================

/// The snake body is an ordered sequence of grid-aligned positions with the
/// head at the front. Coordinates are multiples of the segment size.
pub struct Snake {
    body: VecDeque<Position>,
    direction: Direction,
    last_moved: Direction,
    segment_size: i32,
    grow_next_move: bool,
}

impl Snake {
    /// Starts with three segments, head at `(start_x, start_y)` and the
    /// tail extending to the left.
    pub fn new(start_x: i32, start_y: i32, segment_size: i32) -> Self {
        let mut body = VecDeque::new();
        body.push_back(Position {
            x: start_x,
            y: start_y,
        });
        body.push_back(Position {
            x: start_x - segment_size,
            y: start_y,
        });
        body.push_back(Position {
            x: start_x - 2 * segment_size,
            y: start_y,
        });

        Self {
            body,
            direction: Direction::Stopped,
            last_moved: Direction::Stopped,
            segment_size,
            grow_next_move: false,
        }
    }

    /// One step in the current direction: push a new head, then trim the
    /// tail unless a pending growth absorbs the extra segment. Does
    /// nothing while stopped.
    pub fn advance(&mut self) {
        if self.direction == Direction::Stopped {
            return;
        }

        let mut head = self.head();
        match self.direction {
            Direction::Up => head.y -= self.segment_size,
            Direction::Down => head.y += self.segment_size,
            Direction::Left => head.x -= self.segment_size,
            Direction::Right => head.x += self.segment_size,
            Direction::Stopped => {}
        }

        self.body.push_front(head);

        if self.grow_next_move {
            self.grow_next_move = false;
        } else {
            self.body.pop_back();
        }
        self.last_moved = self.direction;
    }

    /// Defers the growth by one step: the next `advance` keeps the tail.
    pub fn grow(&mut self) {
        self.grow_next_move = true;
    }

    /// Latches a new movement intent. A reversal of the last *executed*
    /// direction is ignored while the body is longer than one segment.
    /// The first direction set after `Stopped` also seeds the
    /// last-executed direction, so no separate bootstrap is needed.
    pub fn set_direction(&mut self, new_dir: Direction) {
        if new_dir.is_opposite_of(self.last_moved)
            && self.body.len() > 1
            && self.last_moved != Direction::Stopped
        {
            return;
        }

        self.direction = new_dir;
        if self.last_moved == Direction::Stopped {
            self.last_moved = new_dir;
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn body(&self) -> &VecDeque<Position> {
        &self.body
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// True iff the head occupies the same cell as any other segment.
    /// A body shorter than two segments cannot collide with itself.
    pub fn has_self_collision(&self) -> bool {
        if self.body.len() < 2 {
            return false;
        }
        let head = self.head();
        self.body.iter().skip(1).any(|segment| *segment == head)
    }

    pub fn segment_size(&self) -> i32 {
        self.segment_size
    }
}

// ============================================================================
// Food
// ============================================================================

pub struct Food {
    position: Position,
    board_width: i32,
    board_height: i32,
    segment_size: i32,
}

impl Food {
    pub fn new(board_width: i32, board_height: i32, segment_size: i32) -> Self {
        Self {
            position: Position { x: 0, y: 0 },
            board_width,
            board_height,
            segment_size,
        }
    }

    /// Samples a fresh grid-aligned position, rejecting candidates that
    /// land on the snake body. Terminates as long as a free cell exists;
    /// a board fully covered by the snake is not guarded against.
    pub fn regenerate<R: Rng>(&mut self, rng: &mut R, body: &VecDeque<Position>) {
        let cols = self.board_width / self.segment_size;
        let rows = self.board_height / self.segment_size;

        loop {
            let candidate = Position {
                x: rng.gen_range(0..cols) * self.segment_size,
                y: rng.gen_range(0..rows) * self.segment_size,
            };
            if !body.contains(&candidate) {
                self.position = candidate;
                return;
            }
        }
    }

    /// Pins the food to a fixed cell. Deterministic setups only.
    pub fn place_at(&mut self, position: Position) {
        self.position = position;
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

// ============================================================================
// Game
// ============================================================================

pub struct SnakeGame<R: Rng = ThreadRng> {
    pub snake: Snake,
    pub food: Food,
    pub score: u32,
    pub status: GameStatus,
    rng: R,
    events: Vec<SnakeEvent>,
}

impl SnakeGame<ThreadRng> {
    pub fn new() -> Self {
        Self::with_rng(rand::thread_rng())
    }
}

impl Default for SnakeGame<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> SnakeGame<R> {
    pub fn with_rng(mut rng: R) -> Self {
        let snake = Snake::new(BOARD_WIDTH / 2, BOARD_HEIGHT / 2, SEGMENT_SIZE);
        let mut food = Food::new(BOARD_WIDTH, BOARD_HEIGHT, SEGMENT_SIZE);
        food.regenerate(&mut rng, snake.body());

        Self {
            snake,
            food,
            score: 0,
            status: GameStatus::Playing,
            rng,
            events: Vec::new(),
        }
    }

    /// One simulation step: advance the snake, consume food under the
    /// head, then evaluate the two terminal conditions. Wall collision is
    /// checked here rather than inside the snake itself.
    pub fn tick(&mut self) {
        if self.status != GameStatus::Playing {
            return;
        }

        self.snake.advance();

        let head = self.snake.head();
        if head == self.food.position() {
            self.snake.grow();
            self.score += 1;
            self.food.regenerate(&mut self.rng, self.snake.body());
            self.events.push(SnakeEvent::AteFood);
        }

        if self.snake.has_self_collision() {
            self.status = GameStatus::GameOver;
            self.events.push(SnakeEvent::GameOver);
            return;
        }

        let segment = self.snake.segment_size();
        if head.x < 0
            || head.x + segment > BOARD_WIDTH
            || head.y < 0
            || head.y + segment > BOARD_HEIGHT
        {
            self.status = GameStatus::GameOver;
            self.events.push(SnakeEvent::GameOver);
        }
    }

    pub fn set_direction(&mut self, direction: Direction) {
        if self.status != GameStatus::Playing {
            return;
        }
        self.snake.set_direction(direction);
    }

    pub fn toggle_pause(&mut self) {
        match self.status {
            GameStatus::Playing => {
                self.status = GameStatus::Paused;
                self.events.push(SnakeEvent::Paused);
            }
            GameStatus::Paused => {
                self.status = GameStatus::Playing;
                self.events.push(SnakeEvent::Unpaused);
            }
            GameStatus::GameOver => {
                // Cannot pause when the game is over
            }
        }
    }

    pub fn restart(&mut self) {
        self.snake = Snake::new(BOARD_WIDTH / 2, BOARD_HEIGHT / 2, SEGMENT_SIZE);
        self.food.regenerate(&mut self.rng, self.snake.body());
        self.score = 0;
        self.status = GameStatus::Playing;
        self.events.clear();
        self.events.push(SnakeEvent::Restarted);
    }

    pub fn tick_interval_ms(&self) -> u64 {
        TICK_MS
    }

    /// Takes and clears all pending events
    pub fn take_events(&mut self) -> Vec<SnakeEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }
}
