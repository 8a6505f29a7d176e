use super::*;

#[test]
fn blur_stays_inside_disc_of_amount() {
    let mut ctx = Context::seeded(1);
    let mut f = Blur;
    for _ in 0..1000 {
        let mut input = XyzPoint::new(5.0, 5.0, 0.0);
        let mut out = XyzPoint::default();
        f.transform(&mut ctx, &XFormView::default(), &mut input, &mut out, 0.25);
        assert!(out.x.hypot(out.y) <= 0.25 + 1e-12);
    }
}

#[test]
fn gauss_ring_refresh_cycles_through_slots() {
    let mut ctx = Context::seeded(2);
    let mut ring = GaussRing::<4>::default();
    ring.reseed(&mut ctx);
    let s = ring.sum();
    assert!((0.0..4.0).contains(&s));
    for _ in 0..4 {
        ring.refresh(&mut ctx);
    }
    assert_eq!(ring.next, 0);
    assert_ne!(ring.sum(), s);
}

#[test]
fn gauss_ring_default_is_zeroed() {
    let ring = GaussRing::<6>::default();
    assert_eq!(ring.slots, [0.0; 6]);
    assert_eq!(ring.next, 0);
    assert_eq!(ring.sum(), 0.0);
}

#[test]
fn pre_blur_ring_only_redraws_first_two_slots() {
    let mut ctx = Context::seeded(6);
    let mut f = PreBlur::default();
    f.init(&mut ctx, &LayerView::default(), &XFormView::default(), 1.0);
    let seeded = f.ring.slots;
    let mut cursors = Vec::new();
    for _ in 0..50 {
        let mut input = XyzPoint::new(0.5, 0.5, 0.0);
        let mut out = XyzPoint::default();
        f.transform(&mut ctx, &XFormView::default(), &mut input, &mut out, 1.0);
        cursors.push(f.ring.next);
    }
    assert!(cursors.iter().all(|&n| n < 2));
    assert_eq!(&f.ring.slots[2..], &seeded[2..]);
    assert_ne!(&f.ring.slots[..2], &seeded[..2]);
}

#[test]
fn pre_blur_mutates_input_not_output() {
    let mut ctx = Context::seeded(3);
    let mut f = PreBlur::default();
    f.init(&mut ctx, &LayerView::default(), &XFormView::default(), 1.0);
    let mut input = XyzPoint::new(1.0, 1.0, 0.0);
    let mut out = XyzPoint::default();
    f.transform(&mut ctx, &XFormView::default(), &mut input, &mut out, 1.0);
    assert_eq!(out, XyzPoint::default());
    assert!((input.x - 1.0).abs() <= 3.0 && (input.y - 1.0).abs() <= 3.0);
    assert_eq!(f.priority(), -1);
    assert!(f.stochastic_kernel());
}

#[test]
fn blur3d_is_bounded_by_two_amounts() {
    let mut ctx = Context::seeded(4);
    let mut f = Blur3D::default();
    f.init(&mut ctx, &LayerView::default(), &XFormView::default(), 0.5);
    for _ in 0..1000 {
        let mut input = XyzPoint::default();
        let mut out = XyzPoint::default();
        f.transform(&mut ctx, &XFormView::default(), &mut input, &mut out, 0.5);
        let len = (out.x * out.x + out.y * out.y + out.z * out.z).sqrt();
        assert!(len <= 1.0 + 1e-12);
    }
}

#[test]
fn parabola_at_origin_only_moves_y() {
    let mut ctx = Context::seeded(5);
    let mut f = Parabola::default();
    let mut input = XyzPoint::default();
    let mut out = XyzPoint::default();
    f.transform(&mut ctx, &XFormView::default(), &mut input, &mut out, 1.0);
    assert_eq!(out.x, 0.0);
    assert!((0.0..1.0).contains(&out.y));
}

#[test]
fn stochastic_functions_draw_from_context() {
    let mut a = Context::seeded(6);
    let mut b = Context::seeded(6);
    let mut pa = XyzPoint::default();
    let mut pb = XyzPoint::default();
    Blur.transform(&mut a, &XFormView::default(), &mut XyzPoint::default(), &mut pa, 1.0);
    Blur.transform(&mut b, &XFormView::default(), &mut XyzPoint::default(), &mut pb, 1.0);
    assert_eq!(pa, pb);
}
