#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the TSP grid environment.
//!
//! This crate defines the vocabulary that connects the authoritative game
//! state with its read-only projections. The world crate mutates state in
//! response to [`Action`] values, and every projection (hash, observation
//! tensor, image, text) classifies cells through the single
//! [`Element::derive`] rule so that all of them agree on what a cell shows.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of distinct element kinds a cell can be classified as.
pub const NUM_ELEMENTS: usize = 8;

/// Number of observation channels, one per element kind.
pub const NUM_CHANNELS: usize = NUM_ELEMENTS;

/// Number of actions available to the agent.
pub const NUM_ACTIONS: usize = 4;

/// Logical category a cell is classified as for a given state.
///
/// The discriminants are stable: they select the observation channel and tag
/// hash contributions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Element {
    /// Open floor with nothing on it.
    Empty = 0,
    /// The agent standing on a cell that is not a city.
    Agent = 1,
    /// Impassable cell.
    Wall = 2,
    /// City the agent has not reached yet.
    CityUnvisited = 3,
    /// City the agent has already passed through.
    CityVisited = 4,
    /// The first city the agent visited, where the tour must end.
    StartCity = 5,
    /// The agent standing on a city other than the start city.
    AgentAtCity = 6,
    /// The agent standing on the start city.
    AgentAtStartCity = 7,
}

impl Element {
    /// Every element kind in channel order.
    pub const ALL: [Element; NUM_ELEMENTS] = [
        Element::Empty,
        Element::Agent,
        Element::Wall,
        Element::CityUnvisited,
        Element::CityVisited,
        Element::StartCity,
        Element::AgentAtCity,
        Element::AgentAtStartCity,
    ];

    /// Zero-based ordinal used as the observation channel and hash tag.
    #[must_use]
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// Classifies a cell from its stored facts.
    ///
    /// Later checks override earlier ones: wall, then city state, then the
    /// start city, then the agent and its composite variants. Exactly one
    /// kind results for every combination of facts.
    #[must_use]
    pub const fn derive(facts: CellFacts) -> Self {
        let mut element = Element::Empty;
        if facts.wall {
            element = Element::Wall;
        }
        if facts.city {
            element = if facts.visited {
                Element::CityVisited
            } else {
                Element::CityUnvisited
            };
        }
        if facts.start_city {
            element = Element::StartCity;
        }
        if facts.agent {
            element = Element::Agent;
            if facts.city {
                element = Element::AgentAtCity;
            }
            if facts.start_city {
                element = Element::AgentAtStartCity;
            }
        }
        element
    }

    /// Reports whether the element marks the agent's position.
    #[must_use]
    pub const fn is_agent(self) -> bool {
        matches!(
            self,
            Element::Agent | Element::AgentAtCity | Element::AgentAtStartCity
        )
    }
}

/// Facts about a single cell from which its [`Element`] is derived.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellFacts {
    /// The cell is a wall.
    pub wall: bool,
    /// The cell is a city.
    pub city: bool,
    /// The cell has been visited. Non-city cells are visited by convention.
    pub visited: bool,
    /// The agent currently occupies the cell.
    pub agent: bool,
    /// The cell is the start city.
    pub start_city: bool,
}

/// Cardinal moves available to the agent.
///
/// The discriminants form the external action encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Action {
    /// Movement toward decreasing row indices.
    Up = 0,
    /// Movement toward increasing column indices.
    Right = 1,
    /// Movement toward increasing row indices.
    Down = 2,
    /// Movement toward decreasing column indices.
    Left = 3,
}

impl Action {
    /// Every action in ordinal order.
    pub const ALL: [Action; NUM_ACTIONS] = [Action::Up, Action::Right, Action::Down, Action::Left];

    /// Zero-based ordinal of the action.
    #[must_use]
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// Column and row offsets applied by the action.
    #[must_use]
    pub const fn offset(self) -> (i64, i64) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }
}

impl TryFrom<u8> for Action {
    type Error = ActionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Action::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(ActionError::Unknown(value))
    }
}

/// Errors raised while decoding an action ordinal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The ordinal does not name one of the four moves.
    #[error("unknown action ordinal {0}; expected 0..={max}", max = NUM_ACTIONS - 1)]
    Unknown(u8),
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: usize,
    row: usize,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }

    /// Decomposes a row-major cell index for a grid with `columns` columns.
    ///
    /// `columns` must be non-zero.
    #[must_use]
    pub const fn from_index(index: usize, columns: usize) -> Self {
        Self {
            column: index % columns,
            row: index / columns,
        }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> usize {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> usize {
        self.row
    }

    /// Row-major index of the cell for a grid with `columns` columns.
    #[must_use]
    pub const fn index(&self, columns: usize) -> usize {
        self.row * columns + self.column
    }

    /// Applies the action offset, returning `None` when the destination
    /// leaves a `columns` × `rows` grid.
    #[must_use]
    pub fn step(self, action: Action, columns: usize, rows: usize) -> Option<Self> {
        let (column_offset, row_offset) = action.offset();
        let column = shift(self.column, column_offset)?;
        let row = shift(self.row, row_offset)?;
        if column < columns && row < rows {
            Some(Self { column, row })
        } else {
            None
        }
    }
}

fn shift(value: usize, offset: i64) -> Option<usize> {
    if offset < 0 {
        value.checked_sub(offset.unsigned_abs() as usize)
    } else {
        value.checked_add(offset as usize)
    }
}
