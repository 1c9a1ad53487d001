//! Cursor-following lights and camera.

use std::f32::consts::PI;

use stardrift_core::{Rgb, Sensitivity, Vec3, Viewport, hsl_to_rgb};

use crate::pointer::PointerTrail;
use crate::scene::Scene;

const LIGHT_X_GAIN: f32 = 0.6;
const LIGHT_Y_GAIN: f32 = 0.5;
const LIGHT_X_RATE: f32 = 0.06;
const LIGHT_Y_RATE: f32 = 0.05;

const CAMERA_X_GAIN: f32 = 0.06;
const CAMERA_Y_GAIN: f32 = 0.05;
const CAMERA_X_BOOST: f32 = 1.3;

/// Hue cycle of both dynamic lights at `elapsed_secs`. Light 1 runs half a
/// cycle out of phase.
pub fn light_colors(elapsed_secs: f32) -> [Rgb; 2] {
    let hue0 = ((elapsed_secs * 0.2).sin() + 1.0) * 0.5;
    let hue1 = ((elapsed_secs * 0.3 + PI).sin() + 1.0) * 0.5;
    [
        hsl_to_rgb(hue0 * 360.0, 1.0, 0.5),
        hsl_to_rgb(hue1 * 360.0, 1.0, 0.5),
    ]
}

/// Orbit of light 1 as `(x, z)`.
pub fn light1_orbit(elapsed_secs: f32) -> (f32, f32) {
    (
        (elapsed_secs * 0.7).sin() * -50.0,
        (elapsed_secs * 0.4).cos() * 50.0,
    )
}

/// Per-frame light and camera tracking.
///
/// Light 0 and the camera ease toward the latest pointer sample; with an
/// empty trail they hold still. Light 1 orbits on its own and both lights
/// cycle hue. The camera always ends looking at the scene origin.
pub fn track(
    scene: &mut Scene,
    elapsed_secs: f32,
    trail: &PointerTrail,
    viewport: &Viewport,
    sensitivity: &Sensitivity,
    camera_speed: f32,
) {
    let cursor = trail.latest().map(|sample| viewport.centered(sample));

    let [light0, light1] = &mut scene.lights.dynamic;
    if let Some((dx, dy)) = cursor {
        let tx = dx * LIGHT_X_GAIN * sensitivity.horizontal;
        let ty = dy * LIGHT_Y_GAIN * sensitivity.vertical;
        light0.position.x += (tx - light0.position.x) * LIGHT_X_RATE;
        light0.position.y += (ty - light0.position.y) * LIGHT_Y_RATE;
    }
    (light1.position.x, light1.position.z) = light1_orbit(elapsed_secs);
    [light0.color, light1.color] = light_colors(elapsed_secs);

    let camera = &mut scene.camera;
    if let Some((dx, dy)) = cursor {
        let tx = dx * CAMERA_X_GAIN * sensitivity.horizontal;
        let ty = dy * CAMERA_Y_GAIN * sensitivity.vertical;
        camera.position.x += (tx - camera.position.x) * camera_speed * CAMERA_X_BOOST;
        camera.position.y += (-ty - camera.position.y) * camera_speed;
    }
    camera.look_at(Vec3::ZERO);
}
