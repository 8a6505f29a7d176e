use super::*;

#[test]
fn proportional_pick_uses_cumulative_weights() {
    let t = SelectionTable::build(&[1.0, 2.0, 1.0], &[]);
    assert_eq!(t.len(), 3);
    assert_eq!(t.total(None), 4.0);
    assert_eq!(t.pick(None, 0.0), Some(0));
    assert_eq!(t.pick(None, 0.24), Some(0));
    assert_eq!(t.pick(None, 0.25), Some(1));
    assert_eq!(t.pick(None, 0.74), Some(1));
    assert_eq!(t.pick(None, 0.75), Some(2));
    assert_eq!(t.pick(None, 0.999), Some(2));
}

#[test]
fn zero_and_invalid_weights_are_never_picked() {
    let t = SelectionTable::build(&[0.0, -1.0, f64::NAN, 2.0], &[]);
    assert_eq!(t.total(None), 2.0);
    for u in [0.0, 0.3, 0.7, 0.999_999] {
        assert_eq!(t.pick(None, u), Some(3));
    }
}

#[test]
fn rounded_up_draw_falls_back_to_last_weighted_entry() {
    let t = SelectionTable::build(&[1.0, 1.0, 0.0], &[]);
    assert_eq!(t.pick(None, 1.0), Some(1));
}

#[test]
fn all_zero_weights_select_nothing() {
    let t = SelectionTable::build(&[0.0, 0.0], &[]);
    assert_eq!(t.pick(None, 0.5), None);
    assert!(SelectionTable::build(&[], &[]).is_empty());
    assert_eq!(SelectionTable::build(&[], &[]).pick(None, 0.1), None);
}

#[test]
fn relative_weights_bias_the_next_pick() {
    let none: &[f64] = &[];
    let t = SelectionTable::build(&[1.0, 1.0], &[&[0.0, 1.0], none]);
    assert_eq!(t.total(Some(0)), 1.0);
    assert_eq!(t.pick(Some(0), 0.0), Some(1));
    assert_eq!(t.pick(Some(0), 0.9), Some(1));
    // transform 1 has no relative weights and uses the plain row
    assert_eq!(t.total(Some(1)), 2.0);
    assert_eq!(t.pick(Some(1), 0.1), Some(0));
}

#[test]
fn default_relative_rows_share_the_plain_row() {
    let t = SelectionTable::build(&[1.0, 3.0], &[&[1.0, 1.0], &[1.0]]);
    assert!(t.biased.iter().all(Option::is_none));
    assert_eq!(t.total(Some(0)), t.total(None));
}

#[test]
fn relative_rows_without_weight_fall_back_to_plain_row() {
    let t = SelectionTable::build(&[1.0, 1.0], &[&[0.0, 0.0]]);
    assert!(t.biased[0].is_none());
    assert_eq!(t.total(Some(0)), 2.0);
    assert_eq!(t.pick(Some(0), 0.1), Some(0));
    assert_eq!(t.pick(Some(0), 0.9), Some(1));
}

#[test]
fn short_relative_rows_default_to_one() {
    let t = SelectionTable::build(&[1.0, 1.0, 2.0], &[&[0.5]]);
    assert_eq!(t.total(Some(0)), 0.5 + 1.0 + 2.0);
}

#[test]
fn unknown_previous_index_uses_plain_row() {
    let t = SelectionTable::build(&[1.0, 1.0], &[&[0.0, 1.0]]);
    assert_eq!(t.total(Some(7)), 2.0);
}
