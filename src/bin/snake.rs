use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::{
    io::{self, stdout},
    time::{Duration, Instant},
};

use grid_arcade::snake::{
    Direction, GameStatus, SnakeGame, BOARD_HEIGHT, BOARD_WIDTH, SEGMENT_SIZE,
};

// ============================================================================
// Visual Constants
// ============================================================================

const GRID_COLS: usize = (BOARD_WIDTH / SEGMENT_SIZE) as usize;
const GRID_ROWS: usize = (BOARD_HEIGHT / SEGMENT_SIZE) as usize;

const BLOCK_CHAR: &str = "██";
const EMPTY_CHAR: &str = "  ";

const HEAD_COLOR: Color = Color::Rgb(120, 255, 120);
const BODY_COLOR: Color = Color::Rgb(0, 200, 0);
const FOOD_COLOR: Color = Color::Rgb(240, 0, 0);

// ============================================================================
// Rendering
// ============================================================================

fn render(frame: &mut Frame, game: &SnakeGame) {
    let area = frame.size();

    match game.status {
        GameStatus::Playing => render_game(frame, game, area),
        GameStatus::Paused => render_paused(frame, game, area),
        GameStatus::GameOver => render_game_over(frame, game, area),
    }
}

fn render_game(frame: &mut Frame, game: &SnakeGame, area: Rect) {
    let board_display_width = (GRID_COLS as u16 * 2) + 2;
    let board_display_height = GRID_ROWS as u16 + 2;
    let info_width = 14;
    let total_width = board_display_width + info_width + 2;
    let total_height = board_display_height + 3;

    let main_area = centered_rect(total_width, total_height, area);

    let vertical = Layout::vertical([
        Constraint::Length(board_display_height),
        Constraint::Fill(1),
    ])
    .split(main_area);

    let game_row = vertical[0];

    let horizontal = Layout::horizontal([
        Constraint::Length(board_display_width),
        Constraint::Length(info_width),
    ])
    .split(game_row);

    render_board(frame, game, horizontal[0]);
    render_info(frame, game, horizontal[1]);

    let controls_area = Rect {
        x: area.x,
        y: game_row.y + game_row.height,
        width: area.width,
        height: 2,
    };

    if controls_area.y + 1 < area.height {
        let controls = Paragraph::new(vec![Line::from(
            "WASD/Arrows: Move | P: Pause | R: Restart | Q/ESC: Quit",
        )])
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(controls, controls_area);
    }
}

fn render_board(frame: &mut Frame, game: &SnakeGame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Snake ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Project the pixel-space positions onto terminal cells.
    let mut cells = vec![vec![(EMPTY_CHAR, Style::default()); GRID_COLS]; GRID_ROWS];

    let food = game.food.position();
    let food_col = (food.x / SEGMENT_SIZE) as usize;
    let food_row = (food.y / SEGMENT_SIZE) as usize;
    if food_row < GRID_ROWS && food_col < GRID_COLS {
        cells[food_row][food_col] = (BLOCK_CHAR, Style::default().fg(FOOD_COLOR));
    }

    for (i, segment) in game.snake.body().iter().enumerate() {
        let col = segment.x / SEGMENT_SIZE;
        let row = segment.y / SEGMENT_SIZE;
        if (0..GRID_COLS as i32).contains(&col) && (0..GRID_ROWS as i32).contains(&row) {
            let color = if i == 0 { HEAD_COLOR } else { BODY_COLOR };
            cells[row as usize][col as usize] = (BLOCK_CHAR, Style::default().fg(color));
        }
    }

    let lines: Vec<Line> = cells
        .into_iter()
        .map(|row| {
            Line::from(
                row.into_iter()
                    .map(|(symbol, style)| Span::styled(symbol, style))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, inner);
}

fn render_info(frame: &mut Frame, game: &SnakeGame, area: Rect) {
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
        Line::from(Span::styled("Length", Style::default().fg(Color::Green))),
        Line::from(format!("{}", game.snake.len())),
    ];

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

fn render_game_over(frame: &mut Frame, game: &SnakeGame, area: Rect) {
    render_game(frame, game, area);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled("GAME OVER", Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(format!("Score: {}", game.score)),
        Line::from(format!("Length: {}", game.snake.len())),
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

fn render_paused(frame: &mut Frame, game: &SnakeGame, area: Rect) {
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
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut game = SnakeGame::new();
    let mut last_tick = Instant::now();

    // Main loop
    loop {
        terminal.draw(|frame| render(frame, &game))?;

        let tick_interval = Duration::from_millis(game.tick_interval_ms());
        let timeout = tick_interval
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        // Always allow quit
                        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => break,
                        KeyCode::Char('p') | KeyCode::Char('P') => {
                            game.toggle_pause();
                        }
                        // Restart only from game-over or paused state
                        KeyCode::Char('r') | KeyCode::Char('R') => {
                            if game.status != GameStatus::Playing {
                                game.restart();
                            }
                        }
                        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
                            game.set_direction(Direction::Up);
                        }
                        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
                            game.set_direction(Direction::Down);
                        }
                        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
                            game.set_direction(Direction::Left);
                        }
                        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
                            game.set_direction(Direction::Right);
                        }
                        _ => {}
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
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
}
