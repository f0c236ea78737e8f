#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Bordered ASCII presentation of a game state for diagnostics.
//!
//! The layout is meant for humans reading terminal output and carries no
//! stability guarantee.

use std::fmt;

use tsp_grid_core::Element;
use tsp_grid_world::{query, GameState};

const HORIZONTAL_BORDER: char = '-';
const VERTICAL_BORDER: char = '|';

/// Printable character used for an element kind.
#[must_use]
pub const fn glyph(element: Element) -> char {
    match element {
        Element::Empty => ' ',
        Element::Agent => '@',
        Element::Wall => '#',
        Element::CityUnvisited => '.',
        Element::CityVisited => '!',
        Element::StartCity => 'S',
        Element::AgentAtCity => '&',
        Element::AgentAtStartCity => '$',
    }
}

/// [`fmt::Display`] adapter that draws the board inside a border.
#[derive(Clone, Copy, Debug)]
pub struct TextBoard<'state> {
    state: &'state GameState,
}

impl<'state> TextBoard<'state> {
    /// Wraps the state for display.
    #[must_use]
    pub const fn new(state: &'state GameState) -> Self {
        Self { state }
    }
}

impl fmt::Display for TextBoard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns = self.state.columns();
        write_horizontal_border(f, columns)?;

        let elements: Vec<Element> = query::elements(self.state).collect();
        for row in elements.chunks(columns) {
            write!(f, "{VERTICAL_BORDER}")?;
            for element in row {
                write!(f, "{}", glyph(*element))?;
            }
            writeln!(f, "{VERTICAL_BORDER}")?;
        }

        write_horizontal_border(f, columns)
    }
}

fn write_horizontal_border(f: &mut fmt::Formatter<'_>, columns: usize) -> fmt::Result {
    for _ in 0..columns + 2 {
        write!(f, "{HORIZONTAL_BORDER}")?;
    }
    writeln!(f)
}

/// Renders the board to an owned string.
#[must_use]
pub fn render_text(state: &GameState) -> String {
    TextBoard::new(state).to_string()
}
