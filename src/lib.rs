//! Game logic for two grid-based arcade games. The terminal front-ends live
//! in `src/bin/`; everything here is host-agnostic simulation state.

pub mod snake;
pub mod tetris;
