//! Game controller tests - selection, policies, determinism, serialization

use match3::core::{
    Board, BoardConfig, CascadePolicy, GameConfig, GameSnapshot, GameState, Selection, SimpleRng,
    SwapPolicy, TurnOutcome,
};
use match3::types::{GameAction, Position, TileKind};

fn layout(rows: &[&str]) -> Vec<Vec<TileKind>> {
    rows.iter()
        .map(|r| {
            r.chars()
                .map(|c| TileKind::from_str(&c.to_string()).unwrap())
                .collect()
        })
        .collect()
}

/// Swapping (0, 2) with (1, 2) completes a red run in row 0.
const NEAR_MATCH: [&str; 4] = ["RRBG", "YORO", "GBYO", "OYGB"];

fn game(config: GameConfig) -> GameState {
    let board = Board::from_kinds(
        BoardConfig::new(4, 6),
        &layout(&NEAR_MATCH),
        SimpleRng::new(config.seed),
    )
    .unwrap();
    GameState::from_board(config, board)
}

fn play(gs: &mut GameState, swaps: &[(Position, Position)]) -> Vec<TurnOutcome> {
    swaps
        .iter()
        .map(|&(a, b)| gs.try_swap(a, b).unwrap())
        .collect()
}

fn scripted_swaps(size: usize, count: usize) -> Vec<(Position, Position)> {
    (0..count)
        .map(|i| {
            let row = (i * 3) % size;
            let col = (i * 5) % (size - 1);
            (Position::new(row, col), Position::new(row, col + 1))
        })
        .collect()
}

#[test]
fn test_same_seed_same_game() {
    let config = GameConfig {
        seed: 2024,
        cascade: CascadePolicy::UntilStable,
        ..GameConfig::default()
    };
    let swaps = scripted_swaps(8, 40);

    let mut a = GameState::new(config).unwrap();
    let mut b = GameState::new(config).unwrap();
    let oa = play(&mut a, &swaps);
    let ob = play(&mut b, &swaps);

    assert_eq!(oa, ob);
    assert_eq!(a.snapshot(), b.snapshot());
    assert_eq!(a.score(), oa.iter().map(|o| o.score_gained).sum::<u32>());
}

#[test]
fn test_single_policy_resolves_once() {
    let mut gs = game(GameConfig::default());
    let outcome = gs.try_swap(Position::new(0, 2), Position::new(1, 2)).unwrap();
    assert_eq!(outcome.depth(), 1);
    assert_eq!(outcome.score_gained, 300);
    assert_eq!(outcome.tiles_removed(), 3);
    assert_eq!(gs.last_gain(), 300);
}

#[test]
fn test_until_stable_leaves_no_match() {
    let config = GameConfig {
        cascade: CascadePolicy::UntilStable,
        ..GameConfig::default()
    };
    let mut gs = GameState::new(GameConfig {
        board: BoardConfig::new(8, 3),
        ..config
    })
    .unwrap();

    for (a, b) in scripted_swaps(8, 60) {
        let outcome = gs.try_swap(a, b).unwrap();
        assert!(outcome.depth() <= config.max_cascade_rounds as usize);
        assert!(!gs.board().has_matches());
        assert!(gs.board().check_invariants().is_ok());
    }
}

#[test]
fn test_cascade_round_cap_is_respected() {
    let config = GameConfig {
        board: BoardConfig::new(8, 3),
        cascade: CascadePolicy::UntilStable,
        max_cascade_rounds: 1,
        ..GameConfig::default()
    };
    let mut gs = GameState::new(config).unwrap();
    for (a, b) in scripted_swaps(8, 30) {
        assert!(gs.try_swap(a, b).unwrap().depth() <= 1);
    }
}

#[test]
fn test_swap_policies() {
    let keep = GameConfig::default();
    let revert = GameConfig {
        swap_policy: SwapPolicy::RevertUnmatched,
        ..GameConfig::default()
    };
    let a = Position::new(3, 0);
    let b = Position::new(3, 1);

    let mut gs = game(keep);
    let before = gs.board().kinds();
    let outcome = gs.try_swap(a, b).unwrap();
    assert!(!outcome.matched() && !outcome.reverted);
    assert_ne!(gs.board().kinds(), before);
    assert_eq!(gs.moves(), 1);

    let mut gs = game(revert);
    let outcome = gs.try_swap(a, b).unwrap();
    assert!(outcome.reverted);
    assert_eq!(gs.board().kinds(), before);
    assert_eq!(gs.moves(), 0);
}

#[test]
fn test_click_flow_swaps_adjacent_selection() {
    let mut gs = game(GameConfig::default());
    assert_eq!(
        gs.select(Position::new(1, 2)).unwrap(),
        Selection::Selected(Position::new(1, 2))
    );
    let Selection::Swapped(outcome) = gs.select(Position::new(0, 2)).unwrap() else {
        panic!("adjacent click should swap");
    };
    assert_eq!(outcome.a, Position::new(1, 2));
    assert_eq!(outcome.b, Position::new(0, 2));
    assert!(outcome.matched());
    assert_eq!(gs.selected(), None);
}

#[test]
fn test_keyboard_actions_drive_turn() {
    let mut gs = game(GameConfig::default());
    for action in [
        GameAction::CursorRight,
        GameAction::CursorRight,
        GameAction::Select,
        GameAction::CursorDown,
        GameAction::Select,
    ] {
        gs.apply_action(action);
    }
    let outcome = gs.take_last_outcome().expect("turn should be recorded");
    assert!(outcome.matched());
    assert_eq!(gs.score(), 300);

    assert!(gs.apply_action(GameAction::Select));
    assert!(gs.apply_action(GameAction::Deselect));
    assert!(!gs.apply_action(GameAction::Deselect));
}

#[test]
fn test_restart_moves_to_next_seed() {
    let mut gs = GameState::with_seed(11).unwrap();
    let first = gs.board().kinds();
    gs.restart().unwrap();
    assert_ne!(gs.seed(), 11);
    assert_ne!(gs.board().kinds(), first);
    assert!(gs.board().detect_matches().is_empty());
    assert_eq!(gs.episode_id(), 1);
}

#[test]
fn test_outcome_and_snapshot_serialize_to_json() {
    let mut gs = game(GameConfig::default());
    let outcome = gs.try_swap(Position::new(0, 2), Position::new(1, 2)).unwrap();

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["score_gained"], 300);
    assert_eq!(json["a"]["row"], 0);
    let step = &json["steps"][0];
    assert_eq!(step["matches"][0]["orientation"], "horizontal");
    assert_eq!(step["matches"][0]["tiles"][0]["kind"], "red");
    assert_eq!(step["resolution"]["removed"].as_array().unwrap().len(), 3);

    let back: TurnOutcome = serde_json::from_value(json).unwrap();
    assert_eq!(back, outcome);

    let snap = gs.snapshot();
    let text = serde_json::to_string(&snap).unwrap();
    let parsed: GameSnapshot = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, snap);
    assert_eq!(parsed.row(0).len(), 4);
}

#[test]
fn test_config_from_lookup() {
    let config = GameConfig::from_lookup(|key| match key {
        "MATCH3_SEED" => Some("99".into()),
        "MATCH3_BOARD_SIZE" => Some("6".into()),
        "MATCH3_CASCADE" => Some("true".into()),
        "MATCH3_REVERT" => Some("nope".into()),
        _ => None,
    });
    assert_eq!(config.seed, 99);
    assert_eq!(config.board.size, 6);
    assert_eq!(config.cascade, CascadePolicy::UntilStable);
    assert_eq!(config.swap_policy, SwapPolicy::KeepUnmatched);
    assert!(GameState::new(config).is_ok());
}
