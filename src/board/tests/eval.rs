//! Evaluation term unit tests.

use crate::board::Position;

#[test]
fn test_start_position_is_balanced() {
    let terms = Position::new().eval_terms();
    assert_eq!(terms.material, 0);
    assert_eq!(terms.mobility, 0);
    assert_eq!(terms.placement, 0);
    assert_eq!(terms.total(), 0);
}

#[test]
fn test_eval_is_side_relative() {
    let cross = Position::from_fen("xx4o/7/7/7/7/7/o5x x 0 1");
    let nought = Position::from_fen("xx4o/7/7/7/7/7/o5x o 0 1");
    assert!(cross.evaluate() > 0);
    assert_eq!(cross.evaluate(), -nought.evaluate());
}

#[test]
fn test_material_dominates() {
    let pos = Position::from_fen("xxx3o/7/7/7/7/7/o5x x 0 1");
    let terms = pos.eval_terms();
    assert_eq!(terms.material, 200);
    assert_eq!(
        terms.total(),
        terms.material + terms.mobility + terms.placement
    );
}

#[test]
fn test_terms_display() {
    let text = Position::new().eval_terms().to_string();
    let names: Vec<&str> = text
        .lines()
        .map(|l| l.split_whitespace().next().unwrap())
        .collect();
    assert_eq!(names, ["material", "mobility", "placement", "total"]);
}
