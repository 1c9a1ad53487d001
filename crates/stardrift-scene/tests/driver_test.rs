//! Frame driver behavior driven by a hand-stepped clock.

use rand::SeedableRng;
use rand::rngs::StdRng;
use stardrift_core::{PointerSample, Sensitivity, Settings, StarParams, Vec3, Viewport};
use stardrift_scene::{
    Clock, DriverState, FrameDriver, ManualClock, PARTICLE_BOUND, ParticleField, PointBuffers,
    PointerTrail, Renderer, Scene, StarField, StarSeed, arc_drift,
};

/// Renderer that counts frames and uploads and can be told to fail.
#[derive(Default)]
struct CountingRenderer {
    frames: usize,
    fail: bool,
    last_meshes: usize,
    last_uploads: usize,
    buffers: PointBuffers,
}

impl Renderer for CountingRenderer {
    type Error = String;

    fn render(&mut self, scene: &mut Scene) -> Result<(), Self::Error> {
        if self.fail {
            return Err("device lost".to_string());
        }
        self.frames += 1;
        self.last_meshes = scene.mesh_count();
        self.last_uploads = self.buffers.sync(scene);
        Ok(())
    }
}

fn small_settings() -> Settings {
    let mut settings = Settings::default();
    settings.seed = Some(1234);
    settings.scene.particle_count = 100;
    settings.scene.floating_object_count = 5;
    settings
}

fn driver() -> (FrameDriver<ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let driver = FrameDriver::new(small_settings(), clock.clone(), Viewport::default());
    (driver, clock)
}

#[test]
fn star_is_removed_at_end_of_lifespan_and_never_resolves_again() {
    let (mut driver, clock) = driver();
    clock.set_ms(500);
    let id = driver.spawn_shooting_star().unwrap();

    let mut t = 500;
    while t < 2500 {
        driver.on_frame(t);
        let sim = driver.simulation().unwrap();
        assert!(sim.stars.contains(id), "star gone early at {t}ms");
        t += 16;
    }
    driver.on_frame(2500);
    assert!(!driver.simulation().unwrap().stars.contains(id));

    // Slot reuse must not resurrect the old handle.
    clock.set_ms(2600);
    let next = driver.spawn_shooting_star().unwrap();
    assert_ne!(next, id);
    assert!(driver.simulation().unwrap().stars.get(id).is_none());
}

#[test]
fn seeded_star_follows_linear_path_plus_arc() {
    let mut scene = Scene::new();
    let mut stars = StarField::new(&StarParams::default());
    let start = Vec3::new(10.0, -20.0, -350.0);
    let seed = StarSeed {
        position: start,
        velocity: Vec3::new(0.0, 0.0, 0.5),
        rotation_rate: Vec3::ZERO,
        color_index: 2,
        core_radius: 0.3,
        glow_radius: 0.5,
        trail_radii: vec![0.1; 5],
    };
    let id = stars.spawn_seeded(&seed, &mut scene, 0.0).unwrap();
    stars.update(&mut scene, 1.0, &PointerTrail::new(), &Viewport::default());

    let p = stars.position(&scene, id).unwrap();
    assert!((p.z - (start.z + 0.5)).abs() < 1e-4);
    assert!((p.x - (start.x + 2.0f32.sin() * 0.05)).abs() < 1e-5);
    assert!((p.y - (start.y + 1.5f32.cos() * 0.03)).abs() < 1e-5);
    assert_eq!(arc_drift(1.0).x, 2.0f32.sin() * 0.05);
}

#[test]
fn empty_trail_moves_particles_by_velocity_only() {
    let mut rng = StdRng::seed_from_u64(77);
    let (field, mut cloud) = ParticleField::spawn(&mut rng, 200);
    let mut expected: Vec<Vec3> = cloud.iter_positions().collect();
    let trail = PointerTrail::new();

    for _ in 0..100 {
        field.update(
            &mut cloud,
            &trail,
            &Viewport::default(),
            &Sensitivity::default(),
        );
        for (e, particle) in expected.iter_mut().zip(field.particles()) {
            let mut p = *e + particle.velocity;
            let origin = particle.original_position;
            if p.x.abs() > PARTICLE_BOUND {
                p.x = origin.x;
            }
            if p.y.abs() > PARTICLE_BOUND {
                p.y = origin.y;
            }
            if p.z.abs() > PARTICLE_BOUND {
                p.z = origin.z;
            }
            *e = p;
        }
    }

    let actual: Vec<Vec3> = cloud.iter_positions().collect();
    assert_eq!(actual, expected);
}

#[test]
fn scroll_mapping_stops_after_debounce() {
    let (mut driver, clock) = driver();
    driver.set_scroll_limit(1000.0);
    driver.on_scroll_signal(600.0);
    assert!(driver.scroll().animation_running());

    let mut positions = Vec::new();
    let mut t = 0;
    while t <= 400 {
        clock.set_ms(t);
        let report = driver.on_frame(t).unwrap();
        if t < 150 {
            assert!(report.scroll_progress.is_some(), "scroll idle at {t}ms");
        } else {
            assert!(report.scroll_progress.is_none(), "scroll still running at {t}ms");
        }
        positions.push((t, driver.scene().unwrap().camera.position));
        t += 16;
    }

    let settled: Vec<Vec3> = positions
        .iter()
        .filter(|(t, _)| *t >= 144)
        .map(|(_, p)| *p)
        .collect();
    assert!(settled.windows(2).all(|w| w[0] == w[1]));
    assert!(!driver.scroll().animation_running());
    assert!(!driver.scroll().is_scrolling());
}

#[test]
fn repeated_scroll_signals_extend_the_debounce() {
    let (mut driver, clock) = driver();
    driver.set_scroll_limit(1000.0);
    driver.on_scroll_signal(100.0);
    clock.set_ms(100);
    driver.on_frame(100);
    driver.on_scroll_signal(200.0);

    // The first countdown (due at 150ms) was replaced.
    assert!(driver.on_frame(200).unwrap().scroll_progress.is_some());
    assert!(driver.on_frame(250).unwrap().scroll_progress.is_none());
}

#[test]
fn rapid_spawns_add_exactly_that_many_stars() {
    let (mut driver, _clock) = driver();
    let before = driver.active_stars();
    for _ in 0..5 {
        assert!(driver.spawn_shooting_star().is_some());
    }
    assert_eq!(driver.active_stars(), before + 5);
}

#[test]
fn hover_and_click_bursts_are_additive() {
    let (mut driver, _clock) = driver();
    driver.on_click();
    driver.on_hover_enter();
    driver.on_frame(900);
    assert_eq!(driver.active_stars(), 8);
}

#[test]
fn hover_burst_is_staggered_by_200ms() {
    let (mut driver, _clock) = driver();
    driver.on_hover_enter();
    let counts: Vec<(u64, usize)> = [0, 199, 200, 399, 400]
        .into_iter()
        .map(|t| {
            driver.on_frame(t);
            (t, driver.active_stars())
        })
        .collect();
    assert_eq!(counts, vec![(0, 1), (199, 1), (200, 2), (399, 2), (400, 3)]);
}

#[test]
fn rendered_frame_consumes_upload_flags() {
    let (mut driver, clock) = driver();
    let mut renderer = CountingRenderer::default();

    clock.set_ms(16);
    driver.tick(&mut renderer).unwrap();
    // Particle field plus five section clouds on the first frame.
    assert_eq!(renderer.last_uploads, 6);
    let scene = driver.scene().unwrap();
    assert!(!scene.particles.needs_upload());
    assert!(scene.sections.iter().all(|cloud| !cloud.needs_upload()));
    assert_eq!(renderer.buffers.particles().len(), scene.particles.len());

    // Particles move every frame; the static sections do not.
    clock.set_ms(32);
    driver.tick(&mut renderer).unwrap();
    assert_eq!(renderer.last_uploads, 1);
    assert!(!driver.scene().unwrap().particles.needs_upload());

    // Without a renderer the flag stays raised.
    driver.on_frame(48);
    assert!(driver.scene().unwrap().particles.needs_upload());
}

#[test]
fn pointer_trail_is_bounded() {
    let (mut driver, _clock) = driver();
    for i in 0..25 {
        driver.on_pointer_move(PointerSample::new(i as f32, 0.0));
    }
    assert_eq!(driver.trail().len(), 10);
    assert_eq!(driver.trail().latest(), Some(PointerSample::new(24.0, 0.0)));
}

#[test]
fn tick_renders_and_propagates_renderer_errors() {
    let (mut driver, clock) = driver();
    let mut renderer = CountingRenderer::default();

    clock.set_ms(16);
    let report = driver.tick(&mut renderer).unwrap().unwrap();
    assert_eq!(report.now_ms, 16);
    assert_eq!(renderer.frames, 1);
    assert!(renderer.last_meshes >= 5);

    renderer.fail = true;
    clock.set_ms(32);
    assert_eq!(driver.tick(&mut renderer), Err("device lost".to_string()));
}

#[test]
fn context_loss_halts_and_restore_rebuilds() {
    let (mut driver, clock) = driver();
    let mut renderer = CountingRenderer::default();
    driver.on_pointer_move(PointerSample::new(10.0, 10.0));
    driver.spawn_shooting_star();

    driver.on_context_lost();
    assert_eq!(driver.state(), DriverState::ContextLost);
    clock.set_ms(100);
    assert_eq!(driver.tick(&mut renderer), Ok(None));
    assert_eq!(renderer.frames, 0);

    driver.on_context_restored();
    assert_eq!(driver.state(), DriverState::Running);
    assert_eq!(driver.active_stars(), 0);
    assert_eq!(driver.trail().len(), 1);
    assert!(driver.tick(&mut renderer).unwrap().is_some());
    assert_eq!(renderer.frames, 1);
}

#[test]
fn teardown_releases_exactly_once() {
    let (mut driver, clock) = driver();
    driver.on_click();
    driver.on_scroll_signal(50.0);
    assert!(driver.pending_timers() > 0);

    let report = driver.teardown().unwrap();
    // 5 shapes + 3 labels; section clouds plus the particle field.
    assert_eq!(report.meshes, 8);
    assert_eq!(report.point_clouds, 6);
    assert_eq!(driver.state(), DriverState::Disposed);
    assert_eq!(driver.pending_timers(), 0);

    assert_eq!(driver.teardown(), None);
    driver.on_click();
    driver.on_scroll_signal(80.0);
    assert_eq!(driver.pending_timers(), 0);
    assert_eq!(driver.spawn_shooting_star(), None);
    clock.set_ms(5000);
    assert_eq!(driver.on_frame(clock.elapsed_ms()), None);
}
