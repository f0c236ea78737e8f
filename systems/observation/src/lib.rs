#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! One-hot observation tensors for learning agents.
//!
//! The tensor is logically shaped `(channels, columns, rows)` and stored
//! flat: the entry for cell `c` on channel `k` lives at
//! `k * cell_count + c`, where `k` is the ordinal of the cell's [`Element`].

use thiserror::Error;
use tsp_grid_core::{Element, NUM_CHANNELS};
use tsp_grid_world::{query, GameState};

/// Reasons an observation cannot be written into a caller-provided buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ObservationError {
    /// The buffer length does not match the observation size.
    #[error("observation buffer holds {found} values but the state needs {expected}")]
    BufferSize {
        /// Values required by the state.
        expected: usize,
        /// Values available in the buffer.
        found: usize,
    },
}

/// Shape the flat observation should be viewed as: `[channels, columns, rows]`.
#[must_use]
pub fn observation_shape(state: &GameState) -> [usize; 3] {
    [NUM_CHANNELS, state.columns(), state.rows()]
}

/// Number of values in the flat observation.
#[must_use]
pub fn observation_len(state: &GameState) -> usize {
    NUM_CHANNELS * state.cell_count()
}

/// Encodes the state into a freshly allocated one-hot tensor.
#[must_use]
pub fn encode(state: &GameState) -> Vec<f32> {
    let mut observation = vec![0.0; observation_len(state)];
    write_one_hot(state, &mut observation);
    observation
}

/// Encodes the state into `buffer`, overwriting its contents.
pub fn encode_into(state: &GameState, buffer: &mut [f32]) -> Result<(), ObservationError> {
    let expected = observation_len(state);
    if buffer.len() != expected {
        return Err(ObservationError::BufferSize {
            expected,
            found: buffer.len(),
        });
    }
    buffer.fill(0.0);
    write_one_hot(state, buffer);
    Ok(())
}

fn write_one_hot(state: &GameState, buffer: &mut [f32]) {
    let channel_length = state.cell_count();
    for (cell, element) in query::elements(state).enumerate() {
        buffer[channel_offset(element, channel_length) + cell] = 1.0;
    }
}

fn channel_offset(element: Element, channel_length: usize) -> usize {
    element.ordinal() * channel_length
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsp_grid_core::Action;

    fn state(descriptor: &str) -> GameState {
        GameState::from_descriptor(descriptor).expect("descriptor parses")
    }

    fn hot_channel(observation: &[f32], cell: usize, cell_count: usize) -> usize {
        (0..NUM_CHANNELS)
            .find(|channel| observation[channel * cell_count + cell] == 1.0)
            .expect("cell has a hot channel")
    }

    #[test]
    fn shape_lists_columns_before_rows() {
        let state = state("2|3|1|0|0|0|0|3");
        assert_eq!(observation_shape(&state), [8, 3, 2]);
        assert_eq!(encode(&state).len(), 48);
    }

    #[test]
    fn initial_board_sets_expected_channels() {
        let state = state("1|3|1|2|3");
        let observation = encode(&state);
        assert_eq!(hot_channel(&observation, 0, 3), Element::Agent.ordinal());
        assert_eq!(hot_channel(&observation, 1, 3), Element::Wall.ordinal());
        assert_eq!(
            hot_channel(&observation, 2, 3),
            Element::CityUnvisited.ordinal()
        );
        assert_eq!(observation.iter().filter(|value| **value == 1.0).count(), 3);
    }

    #[test]
    fn agent_on_start_city_uses_composite_channel() {
        let mut state = state("1|2|1|3");
        state.apply_action(Action::Right);
        let observation = encode(&state);
        assert_eq!(hot_channel(&observation, 0, 2), Element::Empty.ordinal());
        assert_eq!(
            hot_channel(&observation, 1, 2),
            Element::AgentAtStartCity.ordinal()
        );
    }

    #[test]
    fn encode_into_overwrites_stale_values() {
        let mut state = state("1|2|1|3");
        let mut buffer = vec![1.0; observation_len(&state)];
        state.apply_action(Action::Right);
        encode_into(&state, &mut buffer).expect("buffer fits");
        assert_eq!(buffer, encode(&state));
    }

    #[test]
    fn encode_into_rejects_wrong_buffer() {
        let state = state("1|2|1|3");
        let mut buffer = vec![0.0; 3];
        assert_eq!(
            encode_into(&state, &mut buffer),
            Err(ObservationError::BufferSize {
                expected: 16,
                found: 3
            })
        );
    }
}
