#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state for the TSP grid environment.
//!
//! A [`GameState`] is built from a board descriptor and mutated exclusively
//! through [`GameState::apply_action`]. The state keeps a 64-bit hash in
//! lock-step with every mutation so that transposition tables can key on it
//! without rescanning the grid.

pub mod descriptor;
pub mod hash;

use std::{str::FromStr, sync::Arc};

use tsp_grid_core::{Action, CellCoord, CellFacts, Element, NUM_ACTIONS};

pub use descriptor::{DescriptorError, Layout};

/// One simulation state of the city tour task.
///
/// Cloning produces an independent state. The immutable layout is shared
/// between clones; only the visited flags are copied.
#[derive(Clone, Debug)]
pub struct GameState {
    layout: Arc<Layout>,
    agent: usize,
    start_city: Option<usize>,
    remaining_cities: usize,
    visited: Vec<bool>,
    hash: u64,
    reward: u32,
}

impl GameState {
    /// Builds the initial state described by a `rows|cols|c0|...` descriptor.
    pub fn from_descriptor(descriptor: &str) -> Result<Self, DescriptorError> {
        let board = match descriptor::parse(descriptor) {
            Ok(board) => board,
            Err(error) => {
                tracing::warn!(%error, "rejected board descriptor");
                return Err(error);
            }
        };

        let (layout, agent) = board.into_parts();
        let visited = (0..layout.cell_count())
            .map(|cell| !layout.is_city(cell))
            .collect();
        let remaining_cities = layout.city_count();
        let mut state = Self {
            layout: Arc::new(layout),
            agent,
            start_city: None,
            remaining_cities,
            visited,
            hash: 0,
            reward: 0,
        };
        state.hash = state.recompute_hash();

        tracing::debug!(
            rows = state.rows(),
            columns = state.columns(),
            cities = remaining_cities,
            agent,
            "constructed game state"
        );
        Ok(state)
    }

    /// Applies one move and records the reward it earned.
    ///
    /// Moves that would leave the grid or enter a wall leave the state
    /// untouched apart from clearing the reward.
    pub fn apply_action(&mut self, action: Action) {
        self.reward = 0;

        let Some(target) = self.target_cell(action) else {
            return;
        };

        let grid_size = self.cell_count();
        self.hash ^= self.agent_contribution();
        self.agent = target;

        if self.layout.is_city(target) && !self.visited[target] {
            self.visited[target] = true;
            self.remaining_cities -= 1;
            self.reward = 1;
            self.hash ^= hash::mix(grid_size, Element::CityUnvisited, target);

            if self.start_city.is_none() {
                self.start_city = Some(target);
                self.hash ^= hash::mix(grid_size, Element::StartCity, target);
            }
        }

        self.hash ^= self.agent_contribution();
    }

    /// Reports whether every city was visited and the agent is back on the
    /// start city.
    #[must_use]
    pub fn is_solution(&self) -> bool {
        self.remaining_cities == 0 && Some(self.agent) == self.start_city
    }

    /// Number of actions accepted by [`GameState::apply_action`].
    #[must_use]
    pub const fn action_space_size() -> usize {
        NUM_ACTIONS
    }

    /// Immutable layout backing the state.
    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Number of rows in the grid.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.layout.rows()
    }

    /// Number of columns in the grid.
    #[must_use]
    pub fn columns(&self) -> usize {
        self.layout.columns()
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.layout.cell_count()
    }

    /// Cell currently occupied by the agent.
    #[must_use]
    pub const fn agent_cell(&self) -> usize {
        self.agent
    }

    /// First city the agent visited, if any.
    #[must_use]
    pub const fn start_city_cell(&self) -> Option<usize> {
        self.start_city
    }

    /// Number of cities not yet visited.
    #[must_use]
    pub const fn remaining_cities(&self) -> usize {
        self.remaining_cities
    }

    /// Reward earned by the most recent action: 1 for a newly visited city,
    /// otherwise 0.
    #[must_use]
    pub const fn reward_signal(&self) -> u32 {
        self.reward
    }

    /// Incrementally maintained state hash.
    #[must_use]
    pub const fn hash(&self) -> u64 {
        self.hash
    }

    /// Reports whether the cell has been visited. Non-city cells always are.
    ///
    /// # Panics
    ///
    /// Panics if `cell` is not below [`GameState::cell_count`].
    #[must_use]
    pub fn is_visited(&self, cell: usize) -> bool {
        self.visited[cell]
    }

    /// Computes the state hash from scratch using only the current state.
    #[must_use]
    pub fn recompute_hash(&self) -> u64 {
        let grid_size = self.cell_count();
        let mut hash = 0;
        for cell in 0..grid_size {
            if self.layout.is_city(cell) && !self.visited[cell] {
                hash ^= hash::mix(grid_size, Element::CityUnvisited, cell);
            }
        }
        if let Some(start) = self.start_city {
            hash ^= hash::mix(grid_size, Element::StartCity, start);
        }
        hash ^ self.agent_contribution()
    }

    fn agent_contribution(&self) -> u64 {
        hash::mix(
            self.cell_count(),
            query::element_at(self, self.agent),
            self.agent,
        )
    }

    fn target_cell(&self, action: Action) -> Option<usize> {
        let columns = self.columns();
        let target = CellCoord::from_index(self.agent, columns)
            .step(action, columns, self.rows())?
            .index(columns);
        (!self.layout.is_wall(target)).then_some(target)
    }
}

impl FromStr for GameState {
    type Err = DescriptorError;

    fn from_str(descriptor: &str) -> Result<Self, Self::Err> {
        Self::from_descriptor(descriptor)
    }
}

impl PartialEq for GameState {
    fn eq(&self, other: &Self) -> bool {
        self.agent == other.agent
            && self.start_city == other.start_city
            && self.remaining_cities == other.remaining_cities
            && (Arc::ptr_eq(&self.layout, &other.layout) || self.layout == other.layout)
            && self.visited == other.visited
    }
}

impl Eq for GameState {}

impl std::hash::Hash for GameState {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

/// Query functions that provide read-only access to the game state.
pub mod query {
    use super::GameState;
    use tsp_grid_core::{CellFacts, Element};

    /// Collects the stored facts for a single cell.
    ///
    /// # Panics
    ///
    /// Panics if `cell` is not below [`GameState::cell_count`].
    #[must_use]
    pub fn cell_facts(state: &GameState, cell: usize) -> CellFacts {
        super::facts(state, cell)
    }

    /// Classifies a single cell.
    ///
    /// # Panics
    ///
    /// Panics if `cell` is not below [`GameState::cell_count`].
    #[must_use]
    pub fn element_at(state: &GameState, cell: usize) -> Element {
        Element::derive(super::facts(state, cell))
    }

    /// Iterates over every cell's element kind in row-major order.
    pub fn elements(state: &GameState) -> impl Iterator<Item = Element> + '_ {
        (0..state.cell_count()).map(move |cell| element_at(state, cell))
    }

    /// City cells not yet visited, in ascending row-major order.
    #[must_use]
    pub fn unvisited_city_cells(state: &GameState) -> Vec<usize> {
        city_cells(state, false)
    }

    /// City cells already visited, in ascending row-major order.
    #[must_use]
    pub fn visited_city_cells(state: &GameState) -> Vec<usize> {
        city_cells(state, true)
    }

    fn city_cells(state: &GameState, visited: bool) -> Vec<usize> {
        (0..state.cell_count())
            .filter(|&cell| state.layout.is_city(cell) && state.visited[cell] == visited)
            .collect()
    }
}

fn facts(state: &GameState, cell: usize) -> CellFacts {
    CellFacts {
        wall: state.layout.is_wall(cell),
        city: state.layout.is_city(cell),
        visited: state.visited[cell],
        agent: cell == state.agent,
        start_city: Some(cell) == state.start_city,
    }
}
