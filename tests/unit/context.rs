use super::*;

#[test]
fn same_seed_same_stream() {
    let mut a = Context::seeded(11);
    let mut b = Context::seeded(11);
    for _ in 0..16 {
        assert_eq!(a.random(), b.random());
    }
}

#[test]
fn workers_get_distinct_streams() {
    let mut a = Context::for_worker(5, 0);
    let mut b = Context::for_worker(5, 1);
    let sa: Vec<f64> = (0..4).map(|_| a.random()).collect();
    let sb: Vec<f64> = (0..4).map(|_| b.random()).collect();
    assert_ne!(sa, sb);
}

#[test]
fn random_stays_in_unit_interval() {
    let mut ctx = Context::seeded(3);
    for _ in 0..10_000 {
        let u = ctx.random();
        assert!((0.0..1.0).contains(&u));
    }
}

#[test]
fn random_int_bounds_and_single_draw() {
    let mut ctx = Context::seeded(9);
    let mut twin = Context::seeded(9);
    for _ in 0..1000 {
        let v = ctx.random_int(7);
        assert!((0..7).contains(&v));
        twin.random();
    }
    assert_eq!(ctx.random(), twin.random());
    assert_eq!(ctx.random_int(0), 0);
    assert_eq!(ctx.random_int(-3), 0);
}

#[test]
fn preserve_z_and_iteration_counter() {
    let mut ctx = Context::seeded(0).with_preserve_z(true);
    assert!(ctx.is_preserve_z());
    ctx.set_preserve_z(false);
    assert!(!ctx.is_preserve_z());
    assert_eq!(ctx.iteration(), 0);
    ctx.advance();
    ctx.advance();
    assert_eq!(ctx.iteration(), 2);
}
