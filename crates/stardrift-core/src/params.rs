//! Tunable simulation parameters.
//!
//! Every block deserializes with `#[serde(default)]` so a partial config file
//! only overrides the values it names.

use serde::{Deserialize, Serialize};

/// Entity counts and scene-level constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneParams {
    /// Number of drifting particles.
    pub particle_count: usize,
    /// Number of floating shapes (text labels come on top of these).
    pub floating_object_count: usize,
    /// Number of static section point clouds.
    pub section_count: usize,
    /// Whether the floating text labels are added to the floating set.
    pub show_labels: bool,
    /// Easing rate for cursor-driven camera motion.
    pub camera_speed: f32,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            particle_count: 1000,
            floating_object_count: 20,
            section_count: 5,
            show_labels: true,
            camera_speed: 0.02,
        }
    }
}

/// Multipliers applied to pointer interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sensitivity {
    pub horizontal: f32,
    pub vertical: f32,
    pub particle: f32,
    pub object: f32,
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self {
            horizontal: 1.5,
            vertical: 1.0,
            particle: 1.2,
            object: 1.4,
        }
    }
}

/// A staggered group of spawns triggered by one input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurstParams {
    pub count: u32,
    pub stagger_ms: u64,
}

impl Default for BurstParams {
    fn default() -> Self {
        Self {
            count: 5,
            stagger_ms: 100,
        }
    }
}

/// Shooting star lifecycle and scheduling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarParams {
    /// Seconds from spawn to removal.
    pub lifespan_secs: f32,
    /// Delay before the periodic spawner is armed.
    pub spawn_delay_ms: u64,
    /// Period of the spawner once armed.
    pub spawn_interval_ms: u64,
    /// Burst fired by a pointer click.
    pub click_burst: BurstParams,
    /// Burst fired when the pointer enters an interactive element.
    pub hover_burst: BurstParams,
    /// Upper bound on simultaneously active stars, `0` for no bound.
    pub max_active: usize,
}

impl Default for StarParams {
    fn default() -> Self {
        Self {
            lifespan_secs: 2.0,
            spawn_delay_ms: 1000,
            spawn_interval_ms: 3000,
            click_burst: BurstParams {
                count: 5,
                stagger_ms: 100,
            },
            hover_burst: BurstParams {
                count: 3,
                stagger_ms: 200,
            },
            max_active: 64,
        }
    }
}

impl StarParams {
    /// The active-star cap, if any.
    pub fn cap(&self) -> Option<usize> {
        (self.max_active > 0).then_some(self.max_active)
    }
}

/// Scroll smoothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollParams {
    /// Fraction of the remaining distance covered per frame by the eased offset.
    pub ease: f32,
    /// Quiet time after the last scroll signal before the scroll loop stops.
    pub debounce_ms: u64,
    /// Fraction of the remaining distance covered per frame by the camera.
    pub camera_ease: f32,
}

impl Default for ScrollParams {
    fn default() -> Self {
        Self {
            ease: 0.08,
            debounce_ms: 150,
            camera_ease: 0.05,
        }
    }
}

/// Everything the simulation needs to build and run a scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed RNG seed for reproducible scenes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub scene: SceneParams,
    pub sensitivity: Sensitivity,
    pub stars: StarParams,
    pub scroll: ScrollParams,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_keep_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [scene]
            particle_count = 250

            [stars.hover_burst]
            count = 7
            stagger_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(settings.scene.particle_count, 250);
        assert_eq!(settings.scene.floating_object_count, 20);
        assert_eq!(settings.stars.hover_burst.count, 7);
        assert_eq!(settings.stars.hover_burst.stagger_ms, 250);
        assert_eq!(settings.stars.click_burst.count, 5);
        assert_eq!(settings.scroll.debounce_ms, 150);
        assert!(settings.seed.is_none());
    }

    #[test]
    fn test_star_cap() {
        let mut stars = StarParams::default();
        assert_eq!(stars.cap(), Some(64));
        stars.max_active = 0;
        assert_eq!(stars.cap(), None);
    }
}
