use std::thread;
use std::time::{Duration, Instant};

use super::*;
use crate::board::Position;

fn engine() -> (ProtocolEngine, SharedBuffer) {
    let buffer = SharedBuffer::new();
    let options = EngineOptions::default().with_hash_mb(1).with_seed(Some(5));
    (ProtocolEngine::new(options, Output::new(buffer.clone())), buffer)
}

fn position(engine: &ProtocolEngine) -> Position {
    engine.engine().expect("engine is live").position().clone()
}

fn wait_idle(engine: &mut ProtocolEngine) {
    let deadline = Instant::now() + Duration::from_secs(30);
    while engine.state() == ProtocolState::Searching {
        assert!(Instant::now() < deadline, "search did not finish");
        thread::sleep(Duration::from_millis(5));
        engine.reap();
    }
}

#[test]
fn test_isready() {
    let (mut engine, out) = engine();
    assert_eq!(engine.execute_line("isready"), Flow::Continue);
    assert_eq!(out.lines(), vec!["readyok"]);
}

#[test]
fn test_several_verbs_on_one_line() {
    let (mut engine, out) = engine();
    engine.execute_line("isready result isready");
    assert_eq!(out.lines(), vec!["readyok", "result none", "readyok"]);
}

#[test]
fn test_unknown_token_changes_nothing() {
    let (mut engine, out) = engine();
    let before = position(&engine);
    engine.execute_line("frobnicate");
    assert_eq!(out.lines(), vec!["Unknown token (frobnicate)"]);
    assert_eq!(position(&engine), before);
}

#[test]
fn test_stop_while_idle() {
    let (mut engine, out) = engine();
    engine.execute_line("stop stop");
    assert_eq!(engine.state(), ProtocolState::Idle);
    assert!(out.lines().is_empty());
}

#[test]
fn test_go_depth_one_reaches_idle() {
    let (mut engine, out) = engine();
    engine.execute_line("go depth 1");
    wait_idle(&mut engine);

    let lines = out.lines();
    assert!(lines[0].starts_with("info depth 1 "), "{lines:?}");
    let best = lines.last().unwrap();
    let mv = best.strip_prefix("bestmove ").unwrap();
    assert!(position(&engine).parse_move(mv).is_ok());
}

#[test]
fn test_go_arguments_are_not_reinterpreted() {
    let (mut engine, out) = engine();
    engine.execute_line("go depth 2 isready");
    wait_idle(&mut engine);
    let lines = out.lines();
    assert!(lines.contains(&"readyok".to_string()));
    assert!(!lines.iter().any(|l| l.starts_with("Unknown token")));
}

#[test]
fn test_go_takes_every_subcommand() {
    let (mut engine, out) = engine();
    engine.execute_line("go depth 3 movetime 20 isready");
    wait_idle(&mut engine);
    let lines = out.lines();
    assert!(!lines.iter().any(|l| l.starts_with("Unknown token")), "{lines:?}");
    assert!(lines.contains(&"readyok".to_string()));
    assert_eq!(lines.iter().filter(|l| l.starts_with("bestmove ")).count(), 1);
}

#[test]
fn test_go_infinite_until_stop() {
    let (mut engine, out) = engine();
    engine.execute_line("go infinite");
    assert_eq!(engine.state(), ProtocolState::Searching);
    thread::sleep(Duration::from_millis(50));
    engine.execute_line("stop");
    assert_eq!(engine.state(), ProtocolState::Idle);
    assert!(out.lines().last().unwrap().starts_with("bestmove "));
}

#[test]
fn test_movetime_zero_still_answers() {
    let (mut engine, out) = engine();
    engine.execute_line("go movetime 0");
    wait_idle(&mut engine);
    let lines = out.lines();
    assert!(lines.iter().any(|l| l.starts_with("info depth 1 ")));
    assert!(lines.last().unwrap().starts_with("bestmove "));
}

#[test]
fn test_mutation_rejected_while_searching() {
    let (mut engine, out) = engine();
    engine.execute_line("go infinite");
    let before = position(&engine);

    engine.execute_line("moves b6");
    engine.execute_line("position startpos");
    engine.execute_line("uainewgame");
    engine.execute_line("hashtable clear");
    engine.execute_line("perft 2");
    assert_eq!(position(&engine), before);

    engine.execute_line("stop");
    let lines = out.lines();
    for verb in ["moves", "position", "uainewgame", "hashtable clear", "perft"] {
        let warning = format!("WARNING: cannot {verb} while searching");
        assert!(lines.contains(&warning), "missing {warning:?} in {lines:?}");
    }
}

#[test]
fn test_second_go_replaces_first() {
    let (mut engine, out) = engine();
    engine.execute_line("go infinite");
    engine.execute_line("go depth 1");
    wait_idle(&mut engine);
    let bestmoves = out
        .lines()
        .iter()
        .filter(|l| l.starts_with("bestmove "))
        .count();
    assert_eq!(bestmoves, 2);
}

#[test]
fn test_malformed_fen_leaves_position() {
    let (mut engine, out) = engine();
    engine.execute_line("moves b6");
    let before = position(&engine);

    engine.execute_line("position fen x5o/7/7/7 x 0 1");
    assert_eq!(position(&engine), before);
    assert_eq!(
        out.lines(),
        vec!["WARNING: set position error (2) FEN must describe 7 ranks, found 4"]
    );

    out.clear();
    engine.execute_line("position fen x5o/7/7/7/7/7/o5x w");
    assert_eq!(position(&engine), before);
    assert!(out.lines()[0].starts_with("WARNING: set position error (5)"));
}

#[test]
fn test_huge_counters_are_survivable() {
    let (mut engine, out) = engine();
    engine.execute_line("position fen x5o/7/7/7/7/7/o5x x 4294967295 1 perft 2");
    let lines = out.lines();
    assert!(lines[0].starts_with("WARNING: set position error (6)"), "{lines:?}");
    assert_eq!(lines.last().unwrap(), "nodes 256");

    out.clear();
    engine.execute_line("position fen x5o/7/7/7/7/7/o5x o 0 4294967295 moves f6 print");
    assert!(out.contents().contains("FEN: x5o/5o1/7/7/7/7/o5x x 0 4294967295"));
}

#[test]
fn test_position_fen_then_moves() {
    let (mut engine, _) = engine();
    engine.execute_line("position fen x5o/7/7/7/7/7/o5x x 0 1 moves b6 f6");
    let mut expected = Position::new();
    expected.make_move_str("b6").unwrap();
    expected.make_move_str("f6").unwrap();
    assert_eq!(position(&engine), expected);
}

#[test]
fn test_moves_stop_at_first_illegal() {
    let (mut engine, out) = engine();
    engine.execute_line("moves a6 d4 b2");

    let mut expected = Position::new();
    expected.make_move_str("a6").unwrap();
    assert_eq!(position(&engine), expected);
    assert_eq!(out.lines(), vec!["WARNING: illegal move (d4)"]);
}

#[test]
fn test_hashtable_clear_twice() {
    let (mut engine, out) = engine();
    engine.execute_line("perft 3");
    assert!(engine.engine().unwrap().cache().occupancy() > 0);

    engine.execute_line("hashtable clear");
    assert_eq!(engine.engine().unwrap().cache().occupancy(), 0);
    engine.execute_line("hashtable clear");
    assert_eq!(engine.engine().unwrap().cache().occupancy(), 0);

    out.clear();
    engine.execute_line("hashtable print");
    assert!(out.contents().contains("hashtable used 0 "));
}

#[test]
fn test_perft_output() {
    let (mut engine, out) = engine();
    engine.execute_line("perft 3");
    let lines = out.lines();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("info depth 1 nodes 16 "));
    assert!(lines[1].starts_with("info depth 2 nodes 256 "));
    assert!(lines[2].starts_with("info depth 3 nodes 6460 "));
    assert_eq!(lines[3], "nodes 6460");
}

#[test]
fn test_split_output_sums() {
    let (mut engine, out) = engine();
    engine.execute_line("split 2");
    let lines = out.lines();
    assert_eq!(lines.last().unwrap(), "nodes 256");

    let sum: u64 = lines[..lines.len() - 1]
        .iter()
        .map(|l| l.split_whitespace().nth(1).unwrap().parse::<u64>().unwrap())
        .sum();
    assert_eq!(sum, 256);
    assert_eq!(lines.len() - 1, 16);
}

#[test]
fn test_perft_bad_depth() {
    let (mut engine, out) = engine();
    engine.execute_line("perft deep");
    assert_eq!(out.lines(), vec!["WARNING: invalid value for depth (deep)"]);
}

#[test]
fn test_result_scenarios() {
    let (mut engine, out) = engine();
    engine.execute_line(
        "position fen xxxxxxx/xxxxxxx/xxxxxxx/xxx-ooo/ooooooo/ooooooo/ooooooo x 0 1 result",
    );
    engine.execute_line("position fen 7/7/7/7/7/7/o5o x 0 1 result");
    engine.execute_line("position fen 7/7/7/7/ooo4/ooo4/xoo4 x 0 1 result movegen");
    assert_eq!(
        out.lines(),
        vec!["result draw", "result O", "result none", "0000"]
    );
}

#[test]
fn test_mcts_answers_with_legal_move() {
    let (mut engine, out) = engine();
    engine.execute_line("mcts pure simulations 64");
    engine.execute_line("mcts uct simulations 64");
    let lines = out.lines();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("info simulations 64 "));
    for line in [&lines[1], &lines[3]] {
        let mv = line.strip_prefix("bestmove ").unwrap();
        assert!(position(&engine).parse_move(mv).is_ok());
    }
}

#[test]
fn test_mcts_stops_live_search_first() {
    let (mut engine, out) = engine();
    engine.execute_line("go infinite");
    engine.execute_line("mcts simulations 10");
    assert_eq!(engine.state(), ProtocolState::Idle);
    let count = out
        .lines()
        .iter()
        .filter(|l| l.starts_with("bestmove "))
        .count();
    assert_eq!(count, 2);
}

#[test]
fn test_rollout_progress() {
    let (mut engine, out) = engine();
    engine.execute_line("rollout 200");
    let lines = out.lines();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("info wins "));
    assert!(lines[1].starts_with("info wins "));
    assert!(lines[2].starts_with("winrate "));
}

#[test]
fn test_eval_and_print() {
    let (mut engine, out) = engine();
    engine.execute_line("eval");
    assert!(out.contents().contains("total "));

    out.clear();
    engine.execute_line("print");
    assert!(out.contents().contains("FEN: x5o/7/7/7/7/7/o5x x 0 1"));
}

#[test]
fn test_uainewgame_resets() {
    let (mut engine, _) = engine();
    engine.execute_line("moves b6 perft 2");
    engine.execute_line("uainewgame");
    assert_eq!(position(&engine), Position::new());
    assert_eq!(engine.engine().unwrap().cache().occupancy(), 0);
}

#[test]
fn test_quit_releases_engine() {
    let (mut engine, _) = engine();
    engine.execute_line("go infinite");
    assert_eq!(engine.execute_line("quit isready"), Flow::Quit);
    assert_eq!(engine.state(), ProtocolState::Quitting);
    assert!(engine.engine().is_none());
    assert_eq!(engine.execute_line("isready"), Flow::Quit);
}

#[test]
fn test_end_of_input_quits() {
    let (mut engine, out) = engine();
    engine.run("isready\ngo depth 1\n".as_bytes());
    assert_eq!(engine.state(), ProtocolState::Quitting);
    let lines = out.lines();
    assert_eq!(lines[0], "readyok");
    assert!(lines.last().unwrap().starts_with("bestmove "));
}
