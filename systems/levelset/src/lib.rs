#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic generation of board descriptors for training and evaluation.
//!
//! Each board is derived from its own seed, so a level set can be rebuilt
//! board by board without replaying the ones before it.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tsp_grid_world::descriptor::{CellCode, FIELD_DELIMITER};

const DEFAULT_MAP_SIZE: usize = 10;
const DEFAULT_NUM_TRAIN: usize = 10_000;
const DEFAULT_NUM_TEST: usize = 1_000;

/// Largest accepted board side length.
pub const MAX_MAP_SIZE: usize = 1_024;

/// Parameters controlling level set generation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelsetConfig {
    /// Width and height of every square board.
    #[serde(default = "default_map_size")]
    pub map_size: usize,
    /// Number of cities placed on every board.
    pub num_cities: usize,
    /// Whether to place the diagonal corner walls.
    #[serde(default)]
    pub add_walls: bool,
    /// Number of boards in the training split.
    #[serde(default = "default_num_train")]
    pub num_train: usize,
    /// Number of boards in the test split.
    #[serde(default = "default_num_test")]
    pub num_test: usize,
    /// Seed of the first board; board `k` uses `seed + k`.
    #[serde(default)]
    pub seed: u64,
}

fn default_map_size() -> usize {
    DEFAULT_MAP_SIZE
}

fn default_num_train() -> usize {
    DEFAULT_NUM_TRAIN
}

fn default_num_test() -> usize {
    DEFAULT_NUM_TEST
}

impl LevelsetConfig {
    /// Creates a configuration with default sizes for the provided city count.
    #[must_use]
    pub fn new(num_cities: usize) -> Self {
        Self {
            map_size: DEFAULT_MAP_SIZE,
            num_cities,
            add_walls: false,
            num_train: DEFAULT_NUM_TRAIN,
            num_test: DEFAULT_NUM_TEST,
            seed: 0,
        }
    }

    /// Parses and validates a configuration from TOML contents.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).context("failed to parse level set config toml contents")?;
        config
            .validate()
            .context("level set config describes impossible boards")?;
        Ok(config)
    }

    /// Checks that every board can hold the requested cities and the agent.
    pub fn validate(&self) -> Result<(), LevelsetError> {
        if self.map_size == 0 {
            return Err(LevelsetError::EmptyMap);
        }
        let open_cells = self.open_cell_count()?;
        if self.num_cities >= open_cells {
            return Err(LevelsetError::TooManyCities {
                cities: self.num_cities,
                open_cells,
            });
        }
        Ok(())
    }

    fn open_cell_count(&self) -> Result<usize, LevelsetError> {
        let cells = board_cell_count(self.map_size)?;
        let walls = if self.add_walls {
            wall_cells(self.map_size).len()
        } else {
            0
        };
        Ok(cells - walls)
    }

    fn board_count(&self) -> Result<usize, LevelsetError> {
        self.num_train
            .checked_add(self.num_test)
            .ok_or(LevelsetError::TooManyBoards {
                train: self.num_train,
                test: self.num_test,
            })
    }
}

/// Reasons a configuration cannot produce boards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum LevelsetError {
    /// The map has no cells.
    #[error("map size must be at least 1")]
    EmptyMap,
    /// The map is larger than the generator supports.
    #[error("map size {map_size} exceeds the maximum of {max}", max = MAX_MAP_SIZE)]
    MapTooLarge {
        /// Requested side length.
        map_size: usize,
    },
    /// The split sizes do not add up to an addressable board count.
    #[error("{train} training and {test} test boards overflow the board count")]
    TooManyBoards {
        /// Requested training boards.
        train: usize,
        /// Requested test boards.
        test: usize,
    },
    /// Cities and the agent do not fit on the open cells.
    #[error("{cities} cities and the agent do not fit on {open_cells} open cells")]
    TooManyCities {
        /// Requested city count.
        cities: usize,
        /// Cells that are not walls.
        open_cells: usize,
    },
}

/// Generated training and test boards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Levelset {
    train: Vec<String>,
    test: Vec<String>,
}

impl Levelset {
    /// Descriptors of the training split.
    #[must_use]
    pub fn train(&self) -> &[String] {
        &self.train
    }

    /// Descriptors of the test split.
    #[must_use]
    pub fn test(&self) -> &[String] {
        &self.test
    }

    /// Consumes the set, yielding the training and test descriptors.
    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, Vec<String>) {
        (self.train, self.test)
    }
}

/// Generates `num_train` training boards followed by `num_test` test boards.
pub fn generate(config: &LevelsetConfig) -> Result<Levelset, LevelsetError> {
    config.validate()?;

    let total = config.board_count()?;
    let mut boards = (0..total)
        .map(|index| generate_board(config, config.seed.wrapping_add(index as u64)))
        .collect::<Result<Vec<_>, _>>()?;
    let test = boards.split_off(config.num_train);

    tracing::info!(
        map_size = config.map_size,
        num_cities = config.num_cities,
        add_walls = config.add_walls,
        train = boards.len(),
        test = test.len(),
        "generated level set"
    );
    Ok(Levelset {
        train: boards,
        test,
    })
}

/// Generates the single board identified by `seed`.
pub fn generate_board(config: &LevelsetConfig, seed: u64) -> Result<String, LevelsetError> {
    config.validate()?;

    let size = config.map_size;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut cells = vec![CellCode::Empty; board_cell_count(size)?];

    if config.add_walls {
        for cell in wall_cells(size) {
            cells[cell] = CellCode::Wall;
        }
    }

    let open: Vec<usize> = open_cells(&cells);
    for &cell in open.choose_multiple(&mut rng, config.num_cities) {
        cells[cell] = CellCode::City;
    }

    let free = open_cells(&cells);
    let agent = free
        .choose(&mut rng)
        .copied()
        .ok_or(LevelsetError::TooManyCities {
            cities: config.num_cities,
            open_cells: open.len(),
        })?;
    cells[agent] = CellCode::Agent;

    tracing::trace!(seed, agent, "generated board");
    Ok(encode_descriptor(size, &cells))
}

/// Cells turned into walls on a `size` × `size` board: the corners of every
/// concentric ring except the innermost one, in ascending order.
///
/// # Panics
///
/// Panics on overflow if `size * size` does not fit in `usize`.
#[must_use]
pub fn wall_cells(size: usize) -> Vec<usize> {
    let mut walls = BTreeSet::new();
    for ring in 0..(size / 2).saturating_sub(1) {
        let near = ring;
        let far = size - 1 - ring;
        for cell in [
            near * size + near,
            near * size + far,
            far * size + near,
            far * size + far,
        ] {
            let _ = walls.insert(cell);
        }
    }
    walls.into_iter().collect()
}

fn board_cell_count(map_size: usize) -> Result<usize, LevelsetError> {
    if map_size > MAX_MAP_SIZE {
        return Err(LevelsetError::MapTooLarge { map_size });
    }
    map_size
        .checked_mul(map_size)
        .ok_or(LevelsetError::MapTooLarge { map_size })
}

fn open_cells(cells: &[CellCode]) -> Vec<usize> {
    cells
        .iter()
        .enumerate()
        .filter(|(_, code)| **code == CellCode::Empty)
        .map(|(cell, _)| cell)
        .collect()
}

fn encode_descriptor(size: usize, cells: &[CellCode]) -> String {
    let mut fields = Vec::with_capacity(cells.len() + 2);
    fields.push(size.to_string());
    fields.push(size.to_string());
    fields.extend(cells.iter().map(|code| format!("{:02}", code.code())));
    let delimiter = FIELD_DELIMITER.to_string();
    fields.join(delimiter.as_str())
}
