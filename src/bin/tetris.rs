use crossterm::{
    event::{
        self, Event, KeyCode, KeyEventKind, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::{
    io::{self, stdout},
    time::{Duration, Instant},
};

use grid_arcade::tetris::{Board, Cell, GameStatus, PieceKind, GRID_HEIGHT, GRID_WIDTH};

// ============================================================================
// Visual Constants
// ============================================================================

const BLOCK_CHAR: &str = "██";
const GHOST_CHAR: &str = "░░";
const EMPTY_CHAR: &str = "  ";

// ============================================================================
// Color Mapping
// ============================================================================

fn piece_color(kind: PieceKind) -> Color {
    match kind {
        PieceKind::I => Color::Rgb(0, 240, 240),
        PieceKind::L => Color::Rgb(240, 160, 0),
        PieceKind::J => Color::Rgb(0, 0, 240),
        PieceKind::S => Color::Rgb(0, 240, 0),
        PieceKind::Z => Color::Rgb(240, 0, 0),
        PieceKind::T => Color::Rgb(160, 0, 240),
        PieceKind::O => Color::Rgb(240, 240, 0),
    }
}

// ============================================================================
// Rendering
// ============================================================================

fn render(frame: &mut Frame, game: &Board) {
    let area = frame.size();

    match game.status {
        GameStatus::Playing => render_game(frame, game, area),
        GameStatus::Paused => render_paused(frame, game, area),
        GameStatus::GameOver => render_game_over(frame, game, area),
    }
}

fn render_game(frame: &mut Frame, game: &Board, area: Rect) {
    let grid_display_width = (GRID_WIDTH as u16 * 2) + 2;
    let grid_display_height = GRID_HEIGHT as u16 + 2;
    let info_width = 14;
    let total_width = grid_display_width + info_width + 2;
    let total_height = grid_display_height + 3;

    let main_area = centered_rect(total_width, total_height, area);

    let vertical = Layout::vertical([
        Constraint::Length(grid_display_height),
        Constraint::Fill(1),
    ])
    .split(main_area);

    let game_row = vertical[0];

    let horizontal = Layout::horizontal([
        Constraint::Length(grid_display_width),
        Constraint::Length(info_width),
    ])
    .split(game_row);

    render_grid(frame, game, horizontal[0]);
    render_info(frame, game, horizontal[1]);

    let controls_area = Rect {
        x: area.x,
        y: game_row.y + game_row.height,
        width: area.width,
        height: 2,
    };

    if controls_area.y + 1 < area.height {
        let controls = Paragraph::new(vec![Line::from(
            "←→: Move | ↑/Space: Rotate | ↓: Fast Drop | P: Pause | R: Restart | Q/ESC: Quit",
        )])
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(controls, controls_area);
    }
}

fn render_grid(frame: &mut Frame, game: &Board, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Tetris ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let visual_grid = game.render_grid();

    // Ghost cells are shown only when the projection is strictly below
    // the active piece.
    let ghost = game.ghost_piece();
    let ghost_blocks = if ghost.position.y > game.current_piece.position.y {
        ghost.blocks()
    } else {
        Vec::new()
    };
    let ghost_color = piece_color(game.current_piece.kind);

    let mut lines: Vec<Line> = Vec::new();

    for y in 0..GRID_HEIGHT {
        let mut spans: Vec<Span> = Vec::new();

        for x in 0..GRID_WIDTH {
            let (symbol, style) = match visual_grid[y][x] {
                Cell::Filled(kind) => (BLOCK_CHAR, Style::default().fg(piece_color(kind))),
                Cell::Empty => {
                    let here = ghost_blocks
                        .iter()
                        .any(|b| b.x == x as i16 && b.y == y as i16);
                    if here {
                        (
                            GHOST_CHAR,
                            Style::default().fg(ghost_color).add_modifier(Modifier::DIM),
                        )
                    } else {
                        (EMPTY_CHAR, Style::default())
                    }
                }
            };

            spans.push(Span::styled(symbol, style));
        }

        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, inner);
}

fn render_info(frame: &mut Frame, game: &Board, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Info ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Score", Style::default().fg(Color::Yellow))),
        Line::from(format!("{}", game.score)),
        Line::from(""),
        Line::from(Span::styled("Lines", Style::default().fg(Color::Cyan))),
        Line::from(format!("{}", game.lines_cleared)),
    ];

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

fn render_game_over(frame: &mut Frame, game: &Board, area: Rect) {
    render_game(frame, game, area);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled("GAME OVER", Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(format!("Score: {}", game.score)),
        Line::from(format!("Lines: {}", game.lines_cleared)),
        Line::from(""),
        Line::from(Span::styled(
            "Press R to restart",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            "Press ESC to quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Game Over ")
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black)),
    );

    let popup_area = centered_rect(24, 12, area);
    frame.render_widget(paragraph, popup_area);
}

fn render_paused(frame: &mut Frame, game: &Board, area: Rect) {
    render_game(frame, game, area);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled("PAUSED", Style::default().fg(Color::Yellow))),
        Line::from(""),
        Line::from(Span::styled(
            "Press P to continue",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            "Press ESC to quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Paused ")
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black)),
    );

    let popup_area = centered_rect(24, 10, area);
    frame.render_widget(paragraph, popup_area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .split(area);

    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .split(horizontal[1]);

    vertical[1]
}

// ============================================================================
// Main Loop
// ============================================================================

fn main() -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;

    // Key-release reporting drives the fast-drop restore; only arm fast
    // drop when the terminal can deliver the release.
    let release_events = matches!(supports_keyboard_enhancement(), Ok(true));
    if release_events {
        stdout().execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))?;
    }

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut game = Board::new();
    let mut last_tick = Instant::now();

    // Main loop
    'outer: loop {
        terminal.draw(|frame| render(frame, &game))?;

        let tick_interval = Duration::from_millis(game.tick_interval_ms());
        let timeout = tick_interval
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                match key.kind {
                    // With release reporting enabled, held movement keys
                    // arrive as Repeat events and must act like presses;
                    // the one-shot controls fire on the initial press only.
                    KeyEventKind::Press | KeyEventKind::Repeat => {
                        let repeat = key.kind == KeyEventKind::Repeat;
                        match key.code {
                            // Always allow quit
                            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') if !repeat => {
                                break 'outer;
                            }
                            // Pause toggle; rejected by the board once the game is over
                            KeyCode::Char('p') | KeyCode::Char('P') if !repeat => {
                                game.toggle_pause();
                            }
                            // Restart only from game-over or paused state
                            KeyCode::Char('r') | KeyCode::Char('R') if !repeat => {
                                if game.status != GameStatus::Playing {
                                    game.restart();
                                }
                            }
                            _ if game.status == GameStatus::Playing => match key.code {
                                KeyCode::Left => {
                                    game.move_piece(-1, 0);
                                }
                                KeyCode::Right => {
                                    game.move_piece(1, 0);
                                }
                                KeyCode::Up | KeyCode::Char(' ') => {
                                    game.rotate_piece(true);
                                }
                                KeyCode::Down => {
                                    if release_events {
                                        game.set_fast_drop(true);
                                    }
                                    game.move_piece(0, 1);
                                }
                                _ => {}
                            },
                            _ => {}
                        }
                    }
                    KeyEventKind::Release => {
                        if key.code == KeyCode::Down {
                            game.set_fast_drop(false);
                        }
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_interval {
            game.tick();
            last_tick = Instant::now();
        }
    }

    // Restore terminal
    if release_events {
        stdout().execute(PopKeyboardEnhancementFlags)?;
    }
    stdout().execute(LeaveAlternateScreen)?;
    disable_raw_mode()?;

    Ok(())
}
