//! Tests for the Snake game logic
//!
//! Test categories:
//! - Movement and tail trimming
//! - Direction latching and reversal rejection
//! - Deferred growth
//! - Self- and wall-collision detection
//! - Food placement
//! - Game wrapper state transitions

use std::collections::VecDeque;

use grid_arcade::snake::{
    Direction, Food, GameStatus, Position, Snake, SnakeEvent, SnakeGame, BOARD_HEIGHT,
    BOARD_WIDTH, SEGMENT_SIZE,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn test_snake() -> Snake {
    Snake::new(BOARD_WIDTH / 2, BOARD_HEIGHT / 2, SEGMENT_SIZE)
}

// ============================================================================
// Movement Tests
// ============================================================================

mod movement {
    use super::*;

    #[test]
    fn starts_with_three_segments_head_first() {
        let snake = test_snake();

        assert_eq!(snake.len(), 3);
        assert_eq!(
            snake.head(),
            Position {
                x: BOARD_WIDTH / 2,
                y: BOARD_HEIGHT / 2
            }
        );
        // Tail extends to the left of the head
        assert_eq!(
            snake.body()[2],
            Position {
                x: BOARD_WIDTH / 2 - 2 * SEGMENT_SIZE,
                y: BOARD_HEIGHT / 2
            }
        );
    }

    #[test]
    fn does_not_move_while_stopped() {
        let mut snake = test_snake();
        let head = snake.head();

        snake.advance();

        assert_eq!(snake.head(), head);
        assert_eq!(snake.len(), 3);
    }

    #[test]
    fn advances_one_segment_in_each_direction() {
        let cases = [
            (Direction::Up, 0, -SEGMENT_SIZE),
            (Direction::Down, 0, SEGMENT_SIZE),
            (Direction::Right, SEGMENT_SIZE, 0),
        ];

        for (direction, dx, dy) in cases {
            let mut snake = test_snake();
            let head = snake.head();

            snake.set_direction(direction);
            snake.advance();

            assert_eq!(
                snake.head(),
                Position {
                    x: head.x + dx,
                    y: head.y + dy
                },
                "direction {:?}",
                direction
            );
        }
    }

    #[test]
    fn tail_is_trimmed_on_every_plain_move() {
        let mut snake = test_snake();
        snake.set_direction(Direction::Right);

        snake.advance();
        snake.advance();

        assert_eq!(snake.len(), 3);
    }

    #[test]
    fn old_head_becomes_the_second_segment() {
        let mut snake = test_snake();
        let head = snake.head();
        snake.set_direction(Direction::Right);

        snake.advance();

        assert_eq!(snake.body()[1], head);
    }
}

// ============================================================================
// Direction Tests
// ============================================================================

mod direction {
    use super::*;

    #[test]
    fn first_direction_from_stopped_is_accepted() {
        let mut snake = test_snake();

        snake.set_direction(Direction::Up);

        assert_eq!(snake.direction(), Direction::Up);

        // And it executes immediately, no bootstrap step needed
        let head = snake.head();
        snake.advance();
        assert_eq!(snake.head().y, head.y - SEGMENT_SIZE);
    }

    #[test]
    fn reversal_of_last_executed_direction_is_ignored() {
        let mut snake = test_snake();
        snake.set_direction(Direction::Right);
        snake.advance();

        snake.set_direction(Direction::Left);

        assert_eq!(snake.direction(), Direction::Right);
    }

    #[test]
    fn reversal_rejected_even_before_the_first_move() {
        // Setting the first direction also seeds the last-executed one,
        // so an immediate reversal is caught too.
        let mut snake = test_snake();
        snake.set_direction(Direction::Right);

        snake.set_direction(Direction::Left);

        assert_eq!(snake.direction(), Direction::Right);
    }

    #[test]
    fn perpendicular_turn_is_accepted() {
        let mut snake = test_snake();
        snake.set_direction(Direction::Right);
        snake.advance();

        snake.set_direction(Direction::Down);

        assert_eq!(snake.direction(), Direction::Down);
    }

    #[test]
    fn latched_turn_only_executes_on_advance() {
        let mut snake = test_snake();
        snake.set_direction(Direction::Right);
        snake.advance();
        let head = snake.head();

        snake.set_direction(Direction::Down);

        // Intent recorded, position untouched until the next tick
        assert_eq!(snake.head(), head);

        snake.advance();
        assert_eq!(snake.head().y, head.y + SEGMENT_SIZE);
    }

    #[test]
    fn reversal_keys_off_executed_not_requested_direction() {
        let mut snake = test_snake();
        snake.set_direction(Direction::Right);
        snake.advance();

        // Turn down (latched, not yet executed), then ask for up.
        // Up is opposite of the requested Down but not of the executed
        // Right, so it must be accepted.
        snake.set_direction(Direction::Down);
        snake.set_direction(Direction::Up);

        assert_eq!(snake.direction(), Direction::Up);
    }
}

// ============================================================================
// Growth Tests
// ============================================================================

mod growth {
    use super::*;

    #[test]
    fn grow_adds_exactly_one_segment_on_next_advance() {
        let mut snake = test_snake();
        snake.set_direction(Direction::Right);

        snake.grow();
        snake.advance();

        assert_eq!(snake.len(), 4);
    }

    #[test]
    fn growth_is_consumed_after_one_advance() {
        let mut snake = test_snake();
        snake.set_direction(Direction::Right);

        snake.grow();
        snake.advance();
        snake.advance();

        assert_eq!(snake.len(), 4);
    }
}

// ============================================================================
// Self-Collision Tests
// ============================================================================

mod self_collision {
    use super::*;

    #[test]
    fn fresh_snake_has_no_collision() {
        let snake = test_snake();
        assert!(!snake.has_self_collision());
    }

    #[test]
    fn tight_turn_into_own_body_collides() {
        // Grow to five segments heading right, then loop back onto the body
        let mut snake = test_snake();
        snake.set_direction(Direction::Right);
        snake.grow();
        snake.advance();
        snake.grow();
        snake.advance();
        assert_eq!(snake.len(), 5);

        snake.set_direction(Direction::Down);
        snake.advance();
        snake.set_direction(Direction::Left);
        snake.advance();
        snake.set_direction(Direction::Up);
        snake.advance();

        assert!(snake.has_self_collision());
    }

    #[test]
    fn adjacent_parallel_track_does_not_collide() {
        let mut snake = test_snake();
        snake.set_direction(Direction::Right);
        snake.advance();
        snake.set_direction(Direction::Down);
        snake.advance();
        snake.set_direction(Direction::Left);
        snake.advance();

        // Runs alongside the old track, one row below it
        assert!(!snake.has_self_collision());
    }
}

// ============================================================================
// Food Tests
// ============================================================================

mod food {
    use super::*;

    #[test]
    fn regenerate_lands_on_the_only_free_cell() {
        // 3x2 cell board with five of six cells covered by the body:
        // rejection sampling must settle on the single free cell.
        let mut food = Food::new(60, 40, 20);
        let body: VecDeque<Position> = [
            Position { x: 0, y: 0 },
            Position { x: 20, y: 0 },
            Position { x: 40, y: 0 },
            Position { x: 0, y: 20 },
            Position { x: 20, y: 20 },
        ]
        .into_iter()
        .collect();

        let mut rng = StdRng::seed_from_u64(1);
        food.regenerate(&mut rng, &body);

        assert_eq!(food.position(), Position { x: 40, y: 20 });
    }

    #[test]
    fn regenerate_never_lands_on_the_body() {
        let snake = test_snake();
        let mut food = Food::new(BOARD_WIDTH, BOARD_HEIGHT, SEGMENT_SIZE);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            food.regenerate(&mut rng, snake.body());
            assert!(!snake.body().contains(&food.position()));
        }
    }

    #[test]
    fn regenerated_position_is_grid_aligned() {
        let snake = test_snake();
        let mut food = Food::new(BOARD_WIDTH, BOARD_HEIGHT, SEGMENT_SIZE);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..50 {
            food.regenerate(&mut rng, snake.body());
            let pos = food.position();
            assert_eq!(pos.x % SEGMENT_SIZE, 0);
            assert_eq!(pos.y % SEGMENT_SIZE, 0);
            assert!(pos.x >= 0 && pos.x < BOARD_WIDTH);
            assert!(pos.y >= 0 && pos.y < BOARD_HEIGHT);
        }
    }
}

// ============================================================================
// Game Wrapper Tests
// ============================================================================

mod game {
    use super::*;

    fn test_game() -> SnakeGame<StdRng> {
        SnakeGame::with_rng(StdRng::seed_from_u64(42))
    }

    #[test]
    fn initial_food_is_off_the_body() {
        let game = test_game();
        assert!(!game.snake.body().contains(&game.food.position()));
        assert_eq!(game.status, GameStatus::Playing);
        assert_eq!(game.score, 0);
    }

    #[test]
    fn eating_food_scores_and_grows_one_tick_later() {
        let mut game = test_game();
        let head = game.snake.head();
        game.food.place_at(Position {
            x: head.x + SEGMENT_SIZE,
            y: head.y,
        });

        game.set_direction(Direction::Right);
        game.tick();

        assert_eq!(game.score, 1);
        assert_eq!(game.snake.len(), 3); // growth is deferred by one tick
        assert!(game.take_events().contains(&SnakeEvent::AteFood));
        assert!(!game.snake.body().contains(&game.food.position()));

        game.tick();
        assert_eq!(game.snake.len(), 4);
    }

    #[test]
    fn hitting_the_top_wall_ends_the_game() {
        let mut game = test_game();
        game.set_direction(Direction::Up);

        for _ in 0..40 {
            game.tick();
        }

        assert!(game.is_game_over());
        assert!(game.take_events().contains(&SnakeEvent::GameOver));
    }

    #[test]
    fn ticks_are_ignored_after_game_over() {
        let mut game = test_game();
        game.set_direction(Direction::Up);
        for _ in 0..40 {
            game.tick();
        }
        assert!(game.is_game_over());
        let head = game.snake.head();

        game.tick();

        assert_eq!(game.snake.head(), head);
    }

    #[test]
    fn pause_freezes_the_simulation() {
        let mut game = test_game();
        game.set_direction(Direction::Right);
        game.tick();
        let head = game.snake.head();

        game.toggle_pause();
        game.tick();

        assert_eq!(game.status, GameStatus::Paused);
        assert_eq!(game.snake.head(), head);

        game.toggle_pause();
        assert_eq!(game.status, GameStatus::Playing);
    }

    #[test]
    fn pause_emits_events() {
        let mut game = test_game();
        game.take_events();

        game.toggle_pause();
        game.toggle_pause();

        let events = game.take_events();
        assert!(events.contains(&SnakeEvent::Paused));
        assert!(events.contains(&SnakeEvent::Unpaused));
    }

    #[test]
    fn cannot_pause_after_game_over() {
        let mut game = test_game();
        game.set_direction(Direction::Up);
        for _ in 0..40 {
            game.tick();
        }

        game.toggle_pause();

        assert_eq!(game.status, GameStatus::GameOver);
    }

    #[test]
    fn direction_input_is_ignored_while_paused() {
        let mut game = test_game();
        game.toggle_pause();

        game.set_direction(Direction::Right);

        assert_eq!(game.snake.direction(), Direction::Stopped);
    }

    #[test]
    fn restart_reinitializes_all_state() {
        let mut game = test_game();
        game.set_direction(Direction::Up);
        for _ in 0..40 {
            game.tick();
        }
        assert!(game.is_game_over());

        game.restart();

        assert_eq!(game.status, GameStatus::Playing);
        assert_eq!(game.score, 0);
        assert_eq!(game.snake.len(), 3);
        assert_eq!(
            game.snake.head(),
            Position {
                x: BOARD_WIDTH / 2,
                y: BOARD_HEIGHT / 2
            }
        );
        assert!(!game.snake.body().contains(&game.food.position()));

        let events = game.take_events();
        assert!(events.contains(&SnakeEvent::Restarted));
    }

    #[test]
    fn self_collision_ends_the_game() {
        let mut game = test_game();
        // Feed the snake twice by pinning the food in its path, then turn
        // it back into its own body.
        game.set_direction(Direction::Right);
        for _ in 0..2 {
            let head = game.snake.head();
            game.food.place_at(Position {
                x: head.x + SEGMENT_SIZE,
                y: head.y,
            });
            game.tick();
        }
        game.tick();
        assert_eq!(game.snake.len(), 5);

        game.set_direction(Direction::Down);
        game.tick();
        game.set_direction(Direction::Left);
        game.tick();
        game.set_direction(Direction::Up);
        game.tick();

        assert_eq!(game.status, GameStatus::GameOver);
    }
}
