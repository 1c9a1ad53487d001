//! Property-based invariant tests for the simulation.
//!
//! Verifies:
//! 1. Particles stay inside the bounds cube after any number of frames,
//!    with or without pointer input.
//! 2. The star opacity envelope stays in `[0, 1]`, is monotonic within each
//!    segment and has the expected endpoints.
//! 3. The arena agrees with a map model under random insert/remove, and
//!    removed keys never resolve again.
//! 4. Floating-object bobbing is a pure, bounded function of time.
//! 5. Scroll progress is always finite and inside `[0, 1]`.

use std::collections::HashMap;

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use stardrift_core::{PointerSample, Sensitivity, Viewport};
use stardrift_scene::{
    Arena, PARTICLE_BOUND, ParticleField, PointerTrail, SlotKey, envelope, float_offset,
    scroll_progress,
};

// ── Strategy helpers ──────────────────────────────────────────────────

fn arb_sample() -> impl Strategy<Value = PointerSample> {
    (-200.0f32..1500.0, -200.0f32..900.0).prop_map(|(x, y)| PointerSample::new(x, y))
}

#[derive(Debug, Clone)]
enum ArenaOp {
    Insert(u32),
    Remove(usize),
}

fn arb_arena_op() -> impl Strategy<Value = ArenaOp> {
    prop_oneof![
        any::<u32>().prop_map(ArenaOp::Insert),
        any::<usize>().prop_map(ArenaOp::Remove),
    ]
}

// ── Particles ─────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn particles_stay_in_bounds(
        seed in any::<u64>(),
        frames in 1usize..120,
        samples in prop::collection::vec(arb_sample(), 0..12),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let (field, mut cloud) = ParticleField::spawn(&mut rng, 64);
        let viewport = Viewport::default();
        let sensitivity = Sensitivity::default();
        let mut trail = PointerTrail::new();

        for frame in 0..frames {
            if let Some(sample) = samples.get(frame % samples.len().max(1)) {
                trail.push(*sample);
            }
            field.update(&mut cloud, &trail, &viewport, &sensitivity);
            for p in cloud.iter_positions() {
                prop_assert!(p.x.abs() <= PARTICLE_BOUND);
                prop_assert!(p.y.abs() <= PARTICLE_BOUND);
                prop_assert!(p.z.abs() <= PARTICLE_BOUND);
            }
        }
    }
}

// ── Envelope ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn envelope_is_bounded(p in -1.0f32..2.0) {
        let o = envelope(p);
        prop_assert!((0.0..=1.0).contains(&o));
    }

    #[test]
    fn envelope_rises_then_falls(a in 0.0f32..1.0, b in 0.0f32..1.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        if hi < 0.2 {
            prop_assert!(envelope(lo) <= envelope(hi));
        }
        if (0.2..=0.8).contains(&lo) && (0.2..=0.8).contains(&hi) {
            prop_assert_eq!(envelope(lo), 1.0);
            prop_assert_eq!(envelope(hi), 1.0);
        }
        if lo > 0.8 {
            prop_assert!(envelope(lo) >= envelope(hi));
        }
    }
}

#[test]
fn envelope_endpoints() {
    assert_eq!(envelope(0.0), 0.0);
    assert_eq!(envelope(0.5), 1.0);
    assert!(envelope(1.0 - f32::EPSILON) < 1e-4);
}

// ── Arena ─────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn arena_matches_model(ops in prop::collection::vec(arb_arena_op(), 1..200)) {
        let mut arena = Arena::new();
        let mut model: HashMap<SlotKey, u32> = HashMap::new();
        let mut live: Vec<SlotKey> = Vec::new();
        let mut dead: Vec<SlotKey> = Vec::new();

        for op in ops {
            match op {
                ArenaOp::Insert(v) => {
                    let key = arena.insert(v);
                    prop_assert!(model.insert(key, v).is_none());
                    live.push(key);
                }
                ArenaOp::Remove(i) => {
                    if live.is_empty() {
                        continue;
                    }
                    let key = live.swap_remove(i % live.len());
                    prop_assert_eq!(arena.remove(key), model.remove(&key));
                    dead.push(key);
                }
            }
            prop_assert_eq!(arena.len(), model.len());
            for key in &dead {
                prop_assert!(arena.get(*key).is_none());
            }
            for (key, v) in &model {
                prop_assert_eq!(arena.get(*key), Some(v));
            }
        }
    }
}

// ── Floating objects ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn float_offset_is_pure_and_bounded(
        t in 0.0f32..10_000.0,
        speed in 0.01f32..0.03,
        amplitude in 2.0f32..7.0,
    ) {
        let a = float_offset(t, speed, amplitude);
        prop_assert_eq!(a, float_offset(t, speed, amplitude));
        prop_assert!(a.abs() <= amplitude);
    }
}

// ── Scroll ────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn scroll_progress_is_unit_interval(current in -1e6f32..1e6, limit in -10.0f32..1e6) {
        let p = scroll_progress(current, limit);
        prop_assert!(p.is_finite());
        prop_assert!((0.0..=1.0).contains(&p));
        if limit <= 0.0 {
            prop_assert_eq!(p, 0.0);
        }
    }
}
