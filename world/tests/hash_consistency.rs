use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tsp_grid_core::{Action, CellCoord};
use tsp_grid_world::{query, GameState};

const BOARD_COUNT: usize = 128;
const STEPS_PER_BOARD: usize = 400;

fn random_descriptor(rng: &mut ChaCha8Rng) -> String {
    let rows: usize = rng.gen_range(1..=8);
    let columns: usize = rng.gen_range(1..=8);
    let cells = rows * columns;
    let agent = rng.gen_range(0..cells);
    let codes: Vec<&str> = (0..cells)
        .map(|cell| {
            if cell == agent {
                return "1";
            }
            match rng.gen_range(0..10) {
                0 | 1 => "2",
                2..=4 => "03",
                _ => "0",
            }
        })
        .collect();
    format!("{rows}|{columns}|{}", codes.join("|"))
}

fn random_action(rng: &mut ChaCha8Rng) -> Action {
    Action::ALL[rng.gen_range(0..Action::ALL.len())]
}

fn is_blocked(state: &GameState, action: Action) -> bool {
    let columns = state.columns();
    match CellCoord::from_index(state.agent_cell(), columns).step(action, columns, state.rows()) {
        None => true,
        Some(cell) => state.layout().is_wall(cell.index(columns)),
    }
}

#[test]
fn construction_hash_matches_recomputation() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x7359);
    for _ in 0..BOARD_COUNT {
        let descriptor = random_descriptor(&mut rng);
        let state = GameState::from_descriptor(&descriptor).expect("descriptor parses");
        assert_eq!(state.hash(), state.recompute_hash(), "board {descriptor}");
    }
}

#[test]
fn incremental_hash_tracks_recomputation() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
    for _ in 0..BOARD_COUNT {
        let descriptor = random_descriptor(&mut rng);
        let mut state = GameState::from_descriptor(&descriptor).expect("descriptor parses");
        for step in 0..STEPS_PER_BOARD {
            state.apply_action(random_action(&mut rng));
            assert_eq!(
                state.hash(),
                state.recompute_hash(),
                "board {descriptor} diverged at step {step}"
            );
        }
    }
}

#[test]
fn blocked_moves_leave_state_unchanged() {
    let mut rng = ChaCha8Rng::seed_from_u64(0xb10c);
    let mut blocked_moves = 0;
    for _ in 0..BOARD_COUNT {
        let descriptor = random_descriptor(&mut rng);
        let mut state = GameState::from_descriptor(&descriptor).expect("descriptor parses");
        for _ in 0..STEPS_PER_BOARD {
            let action = random_action(&mut rng);
            let before = state.clone();
            state.apply_action(action);
            if is_blocked(&before, action) {
                blocked_moves += 1;
                assert_eq!(state, before, "board {descriptor} moved on {action:?}");
                assert_eq!(state.hash(), before.hash());
                assert_eq!(state.reward_signal(), 0);
            } else {
                assert_ne!(state.agent_cell(), before.agent_cell());
            }
        }
    }
    assert!(blocked_moves > 0, "random boards never blocked a move");
}

#[test]
fn city_bookkeeping_is_monotonic() {
    let mut rng = ChaCha8Rng::seed_from_u64(0xc17e);
    for _ in 0..BOARD_COUNT {
        let descriptor = random_descriptor(&mut rng);
        let mut state = GameState::from_descriptor(&descriptor).expect("descriptor parses");
        for _ in 0..STEPS_PER_BOARD {
            let before = state.clone();
            state.apply_action(random_action(&mut rng));

            let remaining = state.remaining_cities();
            assert!(remaining <= before.remaining_cities());
            assert_eq!(remaining, query::unvisited_city_cells(&state).len());
            assert_eq!(
                state.reward_signal() as usize,
                before.remaining_cities() - remaining
            );
            for cell in 0..state.cell_count() {
                if before.is_visited(cell) {
                    assert!(state.is_visited(cell));
                }
            }

            if let Some(start) = before.start_city_cell() {
                assert_eq!(state.start_city_cell(), Some(start));
            }
            if let Some(start) = state.start_city_cell() {
                assert!(state.layout().is_city(start));
                assert!(state.is_visited(start));
                assert!(query::visited_city_cells(&state).contains(&start));
            }

            assert_eq!(
                state.is_solution(),
                remaining == 0 && Some(state.agent_cell()) == state.start_city_cell()
            );
        }
    }
}

#[test]
fn city_partitions_are_sorted_and_disjoint() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5047);
    for _ in 0..BOARD_COUNT {
        let descriptor = random_descriptor(&mut rng);
        let mut state = GameState::from_descriptor(&descriptor).expect("descriptor parses");
        for _ in 0..STEPS_PER_BOARD / 4 {
            state.apply_action(random_action(&mut rng));
        }
        let unvisited = query::unvisited_city_cells(&state);
        let visited = query::visited_city_cells(&state);
        assert!(unvisited.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(visited.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(unvisited.iter().all(|cell| !visited.contains(cell)));
        assert_eq!(unvisited.len() + visited.len(), state.layout().city_count());
    }
}
