use serde::Deserialize;

use chess_core::board::{search, Position, INFINITY, MATE};

#[derive(Deserialize)]
struct ProblemSet {
    problems: Vec<Problem>,
}

#[derive(Deserialize)]
struct Problem {
    #[serde(rename = "type")]
    kind: String,
    fen: String,
    pv: Vec<String>,
}

impl Problem {
    fn mate_in(&self) -> u32 {
        match self.kind.as_str() {
            "Mate in One" => 1,
            "Mate in Two" => 2,
            other => panic!("unknown problem type {other}"),
        }
    }
}

#[test]
fn mate_suite() {
    let data = include_str!("data/mate_problems.json");
    let set: ProblemSet = serde_json::from_str(data).expect("invalid mate_problems.json");

    for problem in &set.problems {
        let plies = problem.mate_in() * 2 - 1;
        let mut pos = Position::from_fen(&problem.fen).unwrap();
        let result = search(&mut pos, plies, -INFINITY, INFINITY);

        assert_eq!(result.score, MATE - plies as i32, "fen: {}", problem.fen);
        let pv: Vec<String> = result.pv.iter().map(ToString::to_string).collect();
        assert_eq!(pv, problem.pv, "fen: {}", problem.fen);

        for mv in &result.pv {
            let _ = pos.make_move(*mv);
        }
        assert!(pos.is_checkmate(), "pv does not mate, fen: {}", problem.fen);
    }
}

#[test]
fn listed_first_moves_give_check() {
    let data = include_str!("data/mate_problems.json");
    let set: ProblemSet = serde_json::from_str(data).expect("invalid mate_problems.json");

    for problem in &set.problems {
        let mut pos = Position::from_fen(&problem.fen).unwrap();
        pos.make_move_uci(&problem.pv[0]).unwrap();
        assert!(pos.in_check(), "fen: {}", problem.fen);
    }
}
