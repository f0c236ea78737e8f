//! Parsing of serialized board descriptors into immutable grid layouts.

use thiserror::Error;

/// Delimiter separating the fields of a board descriptor.
pub const FIELD_DELIMITER: char = '|';

/// Per-cell code accepted in a board descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellCode {
    /// Open floor.
    Empty,
    /// Initial agent position.
    Agent,
    /// Impassable cell.
    Wall,
    /// City that has not been visited.
    City,
}

impl CellCode {
    /// Decodes the numeric descriptor code.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Empty),
            1 => Some(Self::Agent),
            2 => Some(Self::Wall),
            3 => Some(Self::City),
            _ => None,
        }
    }

    /// Numeric code used in descriptors.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Agent => 1,
            Self::Wall => 2,
            Self::City => 3,
        }
    }
}

/// Static content of a single cell. The agent is not terrain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Terrain {
    /// Open floor.
    Open,
    /// Impassable cell.
    Wall,
    /// City the agent must visit.
    City,
}

/// Immutable grid layout shared by every state derived from one descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Layout {
    rows: usize,
    columns: usize,
    terrain: Vec<Terrain>,
}

impl Layout {
    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.terrain.len()
    }

    /// Reports whether the cell is a wall.
    ///
    /// # Panics
    ///
    /// Panics if `cell` is not below [`Layout::cell_count`].
    #[must_use]
    pub fn is_wall(&self, cell: usize) -> bool {
        self.terrain[cell] == Terrain::Wall
    }

    /// Reports whether the cell is a city.
    ///
    /// # Panics
    ///
    /// Panics if `cell` is not below [`Layout::cell_count`].
    #[must_use]
    pub fn is_city(&self, cell: usize) -> bool {
        self.terrain[cell] == Terrain::City
    }

    /// Number of city cells on the board.
    #[must_use]
    pub fn city_count(&self) -> usize {
        self.terrain
            .iter()
            .filter(|terrain| **terrain == Terrain::City)
            .count()
    }
}

/// Result of parsing a descriptor: the layout and the initial agent cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    layout: Layout,
    agent: usize,
}

impl Board {
    /// Splits the board into its layout and agent cell.
    #[must_use]
    pub fn into_parts(self) -> (Layout, usize) {
        (self.layout, self.agent)
    }
}

/// Reasons a board descriptor is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// Fewer than the two dimension fields were supplied.
    #[error("board descriptor needs at least 2 fields separated by '|', found {found}")]
    TooFewFields {
        /// Number of fields present.
        found: usize,
    },
    /// A dimension field was not a positive integer.
    #[error("board {name} '{value}' is not a positive integer")]
    InvalidDimension {
        /// Which dimension failed to parse.
        name: &'static str,
        /// Raw field contents.
        value: String,
    },
    /// The grid dimensions overflow the addressable cell count.
    #[error("board of {rows}x{columns} cells is too large")]
    DimensionOverflow {
        /// Declared row count.
        rows: usize,
        /// Declared column count.
        columns: usize,
    },
    /// The number of cell fields differs from `rows * columns`.
    #[error("board declares {expected} cells but supplies {found}")]
    CellCountMismatch {
        /// Cell count implied by the dimensions.
        expected: usize,
        /// Cell fields actually present.
        found: usize,
    },
    /// A cell field is not one of the known element codes.
    #[error("cell {index} has unknown element code '{value}'; expected 0..=3")]
    UnknownCellCode {
        /// Row-major index of the offending cell.
        index: usize,
        /// Raw field contents.
        value: String,
    },
    /// No cell carries the agent code.
    #[error("board does not place an agent")]
    MissingAgent,
    /// More than one cell carries the agent code.
    #[error("board places more than one agent (cells {first} and {second})")]
    MultipleAgents {
        /// First agent cell encountered.
        first: usize,
        /// Second agent cell encountered.
        second: usize,
    },
}

/// Parses a `rows|cols|c0|c1|...` descriptor.
///
/// Surrounding whitespace is ignored for the descriptor and each field, so
/// lines read from level files and zero-padded codes such as `03` parse.
pub fn parse(descriptor: &str) -> Result<Board, DescriptorError> {
    let fields: Vec<&str> = descriptor
        .trim()
        .split(FIELD_DELIMITER)
        .map(str::trim)
        .collect();
    if fields.len() < 2 {
        return Err(DescriptorError::TooFewFields {
            found: fields.len(),
        });
    }

    let rows = parse_dimension("rows", fields[0])?;
    let columns = parse_dimension("columns", fields[1])?;
    let expected = rows
        .checked_mul(columns)
        .ok_or(DescriptorError::DimensionOverflow { rows, columns })?;
    let cells = &fields[2..];
    if cells.len() != expected {
        return Err(DescriptorError::CellCountMismatch {
            expected,
            found: cells.len(),
        });
    }

    let mut terrain = Vec::with_capacity(expected);
    let mut agent = None;
    for (index, value) in cells.iter().enumerate() {
        let code = value
            .parse::<u8>()
            .ok()
            .and_then(CellCode::from_code)
            .ok_or_else(|| DescriptorError::UnknownCellCode {
                index,
                value: (*value).to_owned(),
            })?;
        terrain.push(match code {
            CellCode::Empty | CellCode::Agent => Terrain::Open,
            CellCode::Wall => Terrain::Wall,
            CellCode::City => Terrain::City,
        });
        if code == CellCode::Agent {
            if let Some(first) = agent {
                return Err(DescriptorError::MultipleAgents {
                    first,
                    second: index,
                });
            }
            agent = Some(index);
        }
    }

    let agent = agent.ok_or(DescriptorError::MissingAgent)?;
    Ok(Board {
        layout: Layout {
            rows,
            columns,
            terrain,
        },
        agent,
    })
}

fn parse_dimension(name: &'static str, value: &str) -> Result<usize, DescriptorError> {
    match value.parse::<usize>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(DescriptorError::InvalidDimension {
            name,
            value: value.to_owned(),
        }),
    }
}
