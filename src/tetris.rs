use rand::rngs::ThreadRng;
use rand::Rng;

// ============================================================================
// Configuration
// ============================================================================

pub const GRID_WIDTH: usize = 10;
pub const GRID_HEIGHT: usize = 20;

// Timing (in milliseconds)
pub const BASE_TICK_MS: u64 = 600;
pub const FAST_TICK_MS: u64 = 50;

// Scoring by lines cleared in a single tick
pub const SCORE_SINGLE: u32 = 40;
pub const SCORE_DOUBLE: u32 = 100;
pub const SCORE_TRIPLE: u32 = 300;
pub const SCORE_TETRIS: u32 = 1200;

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PieceKind {
    I,
    L,
    J,
    S,
    Z,
    T,
    O,
}

// Each piece is a set of four 4x4 occupancy matrices, one per rotation state.
// The matrices are fixed at definition time; rotation is just an index change.
type ShapeGrid = [[u8; 4]; 4];

const I_SHAPES: [ShapeGrid; 4] = [
    [[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]],
    [[0, 1, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0]],
    [[0, 0, 0, 0], [0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0]],
    [[0, 0, 1, 0], [0, 0, 1, 0], [0, 0, 1, 0], [0, 0, 1, 0]],
];

const L_SHAPES: [ShapeGrid; 4] = [
    [[0, 0, 1, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
    [[0, 1, 0, 0], [0, 1, 0, 0], [0, 1, 1, 0], [0, 0, 0, 0]],
    [[0, 0, 0, 0], [1, 1, 1, 0], [1, 0, 0, 0], [0, 0, 0, 0]],
    [[1, 1, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0], [0, 0, 0, 0]],
];

const J_SHAPES: [ShapeGrid; 4] = [
    [[1, 0, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
    [[0, 1, 1, 0], [0, 1, 0, 0], [0, 1, 0, 0], [0, 0, 0, 0]],
    [[0, 0, 0, 0], [1, 1, 1, 0], [0, 0, 1, 0], [0, 0, 0, 0]],
    [[0, 1, 0, 0], [0, 1, 0, 0], [1, 1, 0, 0], [0, 0, 0, 0]],
];

const S_SHAPES: [ShapeGrid; 4] = [
    [[0, 1, 1, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
    [[0, 1, 0, 0], [0, 1, 1, 0], [0, 0, 1, 0], [0, 0, 0, 0]],
    [[0, 0, 0, 0], [0, 1, 1, 0], [1, 1, 0, 0], [0, 0, 0, 0]],
    [[1, 0, 0, 0], [1, 1, 0, 0], [0, 1, 0, 0], [0, 0, 0, 0]],
];

const Z_SHAPES: [ShapeGrid; 4] = [
    [[1, 1, 0, 0], [0, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
    [[0, 0, 1, 0], [0, 1, 1, 0], [0, 1, 0, 0], [0, 0, 0, 0]],
    [[0, 0, 0, 0], [1, 1, 0, 0], [0, 1, 1, 0], [0, 0, 0, 0]],
    [[0, 1, 0, 0], [1, 1, 0, 0], [1, 0, 0, 0], [0, 0, 0, 0]],
];

const T_SHAPES: [ShapeGrid; 4] = [
    [[0, 1, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
    [[0, 1, 0, 0], [0, 1, 1, 0], [0, 1, 0, 0], [0, 0, 0, 0]],
    [[0, 0, 0, 0], [1, 1, 1, 0], [0, 1, 0, 0], [0, 0, 0, 0]],
    [[0, 1, 0, 0], [1, 1, 0, 0], [0, 1, 0, 0], [0, 0, 0, 0]],
];

const O_SHAPES: [ShapeGrid; 4] = [
    [[1, 1, 0, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
    [[1, 1, 0, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
    [[1, 1, 0, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
    [[1, 1, 0, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
];

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::L,
        PieceKind::J,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::T,
        PieceKind::O,
    ];

    /// Returns the 4x4 occupancy matrix for the given rotation state.
    /// The rotation index wraps modulo 4 in both directions.
    pub fn grid(&self, rotation: usize) -> &'static ShapeGrid {
        let shapes: &'static [ShapeGrid; 4] = match self {
            PieceKind::I => &I_SHAPES,
            PieceKind::L => &L_SHAPES,
            PieceKind::J => &J_SHAPES,
            PieceKind::S => &S_SHAPES,
            PieceKind::Z => &Z_SHAPES,
            PieceKind::T => &T_SHAPES,
            PieceKind::O => &O_SHAPES,
        };
        &shapes[rotation % shapes.len()]
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub position: Position,
    pub rotation: usize,
}

impl ActivePiece {
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            position: Position {
                x: (GRID_WIDTH as i16 / 2) - 2,
                y: 0,
            },
            rotation: 0,
        }
    }

    pub fn new_at(kind: PieceKind, x: i16, y: i16) -> Self {
        Self {
            kind,
            position: Position { x, y },
            rotation: 0,
        }
    }

    /// Grid positions of the piece's occupied cells at its current
    /// anchor and rotation.
    pub fn blocks(&self) -> Vec<Position> {
        let grid = self.kind.grid(self.rotation);
        let mut blocks = Vec::with_capacity(4);
        for (row, cols) in grid.iter().enumerate() {
            for (col, &cell) in cols.iter().enumerate() {
                if cell == 1 {
                    blocks.push(Position {
                        x: self.position.x + col as i16,
                        y: self.position.y + row as i16,
                    });
                }
            }
        }
        blocks
    }

    fn rotated(&self, clockwise: bool) -> Self {
        let rotation = if clockwise {
            (self.rotation + 1) % 4
        } else {
            (self.rotation + 3) % 4
        };
        Self {
            kind: self.kind,
            position: self.position,
            rotation,
        }
    }

    fn moved(&self, dx: i16, dy: i16) -> Self {
        Self {
            kind: self.kind,
            position: Position {
                x: self.position.x + dx,
                y: self.position.y + dy,
            },
            rotation: self.rotation,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cell {
    Empty,
    Filled(PieceKind),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameStatus {
    Playing,
    Paused,
    GameOver,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum BoardEvent {
    PieceMoved,
    PieceRotated,
    PieceLocked,
    LinesCleared(u32),
    Paused,
    Unpaused,
    Restarted,
    GameOver,
}

// ============================================================================
// Piece Provider
// ============================================================================

pub trait PieceProvider {
    fn next_piece(&mut self) -> PieceKind;
}

/// Uniform draw among the seven kinds. No bag fairness scheme: each spawn
/// is an independent sample.
pub struct RngPieces<R: Rng> {
    rng: R,
}

impl<R: Rng> RngPieces<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngPieces<ThreadRng> {
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl<R: Rng> PieceProvider for RngPieces<R> {
    fn next_piece(&mut self) -> PieceKind {
        PieceKind::ALL[self.rng.gen_range(0..PieceKind::ALL.len())]
    }
}

pub struct SequencePieces {
    pieces: Vec<PieceKind>,
    index: usize,
}

impl SequencePieces {
    pub fn new(pieces: Vec<PieceKind>) -> Self {
        Self { pieces, index: 0 }
    }
}

impl PieceProvider for SequencePieces {
    fn next_piece(&mut self) -> PieceKind {
        let piece = self.pieces[self.index % self.pieces.len()];
        self.index += 1;
        piece
    }
}

// ============================================================================
// Board
// ============================================================================

pub struct Board {
    pub grid: Vec<Vec<Cell>>,
    pub current_piece: ActivePiece,
    pub score: u32,
    pub lines_cleared: u32,
    pub status: GameStatus,
    fast_drop: bool,
    piece_provider: Box<dyn PieceProvider>,
    events: Vec<BoardEvent>,
}

impl Board {
    pub fn new() -> Self {
        Self::with_provider(Box::new(RngPieces::from_entropy()))
    }

    pub fn with_provider(mut provider: Box<dyn PieceProvider>) -> Self {
        let grid = vec![vec![Cell::Empty; GRID_WIDTH]; GRID_HEIGHT];
        let current_piece = ActivePiece::new(provider.next_piece());

        Self {
            grid,
            current_piece,
            score: 0,
            lines_cleared: 0,
            status: GameStatus::Playing,
            fast_drop: false,
            piece_provider: provider,
            events: Vec::new(),
        }
    }

    pub fn with_grid(grid: Vec<Vec<Cell>>, current_piece: ActivePiece) -> Self {
        Self {
            grid,
            current_piece,
            score: 0,
            lines_cleared: 0,
            status: GameStatus::Playing,
            fast_drop: false,
            piece_provider: Box::new(RngPieces::from_entropy()),
            events: Vec::new(),
        }
    }

    /// Pure placement check: every occupied cell of the piece must land
    /// inside the grid on an empty cell. Cells above the top row are
    /// rejected as well, even transiently.
    pub fn can_place(&self, piece: &ActivePiece) -> bool {
        for block in piece.blocks() {
            if block.x < 0 || block.x >= GRID_WIDTH as i16 {
                return false;
            }
            if block.y < 0 || block.y >= GRID_HEIGHT as i16 {
                return false;
            }
            if self.grid[block.y as usize][block.x as usize] != Cell::Empty {
                return false;
            }
        }
        true
    }

    fn lock_piece(&mut self) {
        let kind = self.current_piece.kind;
        for block in self.current_piece.blocks() {
            if block.y >= 0 && block.y < GRID_HEIGHT as i16 {
                self.grid[block.y as usize][block.x as usize] = Cell::Filled(kind);
            }
        }
        self.events.push(BoardEvent::PieceLocked);
    }

    /// Removes every full row, shifting the rows above it down by one.
    /// Scans bottom-to-top; after a removal the same row index is examined
    /// again, since it now holds the row that was above it. Returns the
    /// number of rows removed.
    pub fn clear_lines(&mut self) -> u32 {
        let mut cleared_count = 0;
        let mut y = GRID_HEIGHT;

        while y > 0 {
            let row = y - 1;
            if self.grid[row].iter().all(|cell| *cell != Cell::Empty) {
                for k in (1..=row).rev() {
                    self.grid[k] = self.grid[k - 1].clone();
                }
                self.grid[0] = vec![Cell::Empty; GRID_WIDTH];
                cleared_count += 1;
                // Same row index is re-examined on the next pass
            } else {
                y -= 1;
            }
        }

        if cleared_count > 0 {
            self.events.push(BoardEvent::LinesCleared(cleared_count));
        }

        cleared_count
    }

    pub fn add_score(&mut self, lines: u32) {
        self.score += match lines {
            1 => SCORE_SINGLE,
            2 => SCORE_DOUBLE,
            3 => SCORE_TRIPLE,
            4 => SCORE_TETRIS,
            _ => 0,
        };
        self.lines_cleared += lines;
    }

    pub fn spawn_next_piece(&mut self) {
        self.current_piece = ActivePiece::new(self.piece_provider.next_piece());

        if !self.can_place(&self.current_piece) {
            self.status = GameStatus::GameOver;
            self.events.push(BoardEvent::GameOver);
        }
    }

    /// Attempts to shift the current piece. A rejected move has no side
    /// effect; in particular it never locks the piece.
    pub fn move_piece(&mut self, dx: i16, dy: i16) -> bool {
        if self.status != GameStatus::Playing {
            return false;
        }
        let moved = self.current_piece.moved(dx, dy);
        if self.can_place(&moved) {
            self.current_piece = moved;
            self.events.push(BoardEvent::PieceMoved);
            true
        } else {
            false
        }
    }

    /// Attempts to rotate the current piece in place. If the rotated
    /// placement is invalid the rotation is reverted; there is no
    /// wall-kick search.
    pub fn rotate_piece(&mut self, clockwise: bool) -> bool {
        if self.status != GameStatus::Playing {
            return false;
        }
        let rotated = self.current_piece.rotated(clockwise);
        if self.can_place(&rotated) {
            self.current_piece = rotated;
            self.events.push(BoardEvent::PieceRotated);
            true
        } else {
            false
        }
    }

    fn lock_and_spawn(&mut self) {
        self.lock_piece();
        let lines = self.clear_lines();
        if lines > 0 {
            self.add_score(lines);
        }
        self.spawn_next_piece();
    }

    /// One gravity step: move the piece down a row, or lock it where it
    /// rests and spawn the next one. Only a failed downward tick locks.
    pub fn tick(&mut self) {
        if self.status != GameStatus::Playing {
            return;
        }

        if !self.move_piece(0, 1) {
            self.lock_and_spawn();
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.status {
            GameStatus::Playing => {
                self.status = GameStatus::Paused;
                self.events.push(BoardEvent::Paused);
            }
            GameStatus::Paused => {
                self.status = GameStatus::Playing;
                self.events.push(BoardEvent::Unpaused);
            }
            GameStatus::GameOver => {
                // Cannot pause when the game is over
            }
        }
    }

    pub fn restart(&mut self) {
        self.grid = vec![vec![Cell::Empty; GRID_WIDTH]; GRID_HEIGHT];
        self.score = 0;
        self.lines_cleared = 0;
        self.status = GameStatus::Playing;
        self.fast_drop = false;
        self.events.clear();
        self.current_piece = ActivePiece::new(self.piece_provider.next_piece());
        self.events.push(BoardEvent::Restarted);
    }

    /// While fast drop is held the tick interval shrinks; releasing the
    /// key restores it.
    pub fn set_fast_drop(&mut self, active: bool) {
        self.fast_drop = active;
    }

    pub fn tick_interval_ms(&self) -> u64 {
        if self.fast_drop {
            FAST_TICK_MS
        } else {
            BASE_TICK_MS
        }
    }

    /// Where the current piece would rest if dropped straight down,
    /// found by probing one row at a time.
    pub fn ghost_piece(&self) -> ActivePiece {
        let mut ghost = self.current_piece.clone();
        while self.can_place(&ghost.moved(0, 1)) {
            ghost = ghost.moved(0, 1);
        }
        ghost
    }

    /// Returns the visual grid state with the current piece overlaid
    pub fn render_grid(&self) -> Vec<Vec<Cell>> {
        let mut visual_grid = self.grid.clone();

        for block in self.current_piece.blocks() {
            if block.y >= 0
                && block.y < GRID_HEIGHT as i16
                && block.x >= 0
                && block.x < GRID_WIDTH as i16
            {
                visual_grid[block.y as usize][block.x as usize] =
                    Cell::Filled(self.current_piece.kind);
            }
        }

        visual_grid
    }

    /// Takes and clears all pending events
    pub fn take_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    /// Check if a specific row is complete (all filled)
    pub fn is_row_complete(&self, y: usize) -> bool {
        self.grid[y].iter().all(|cell| *cell != Cell::Empty)
    }

    /// Count filled cells in a row
    pub fn filled_count_in_row(&self, y: usize) -> usize {
        self.grid[y].iter().filter(|cell| **cell != Cell::Empty).count()
    }

    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    /// Count total filled cells in grid
    pub fn total_filled_cells(&self) -> usize {
        self.grid.iter().flatten().filter(|cell| **cell != Cell::Empty).count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use super::*;

    pub fn empty_grid() -> Vec<Vec<Cell>> {
        vec![vec![Cell::Empty; GRID_WIDTH]; GRID_HEIGHT]
    }

    pub fn fill_row(grid: &mut Vec<Vec<Cell>>, y: usize) {
        for x in 0..GRID_WIDTH {
            grid[y][x] = Cell::Filled(PieceKind::T);
        }
    }

    pub fn fill_row_with_gap(grid: &mut Vec<Vec<Cell>>, y: usize, gap_x: usize) {
        for x in 0..GRID_WIDTH {
            if x != gap_x {
                grid[y][x] = Cell::Filled(PieceKind::T);
            }
        }
    }
}
