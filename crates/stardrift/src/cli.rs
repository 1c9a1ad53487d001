//! Command-line flags.

use std::path::PathBuf;

use clap::Parser;
use stardrift_config::Config;

#[derive(Parser, Debug)]
#[command(author, version, about = "Animated starfield backdrop for the terminal", long_about = None)]
pub struct Cli {
    /// Config file (defaults to the platform config directory).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Fixed RNG seed for a reproducible scene.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Number of drifting particles.
    #[arg(long)]
    pub particles: Option<usize>,
    /// Number of floating shapes.
    #[arg(long)]
    pub objects: Option<usize>,
    /// Cap on simultaneously active shooting stars (0 for no cap).
    #[arg(long)]
    pub max_stars: Option<usize>,
    /// Write logs here instead of the cache directory.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    pub print_config: bool,
}

impl Cli {
    /// Layer the flags over a loaded config.
    pub fn apply(&self, config: &mut Config) {
        let settings = &mut config.settings;
        if let Some(seed) = self.seed {
            settings.seed = Some(seed);
        }
        if let Some(n) = self.particles {
            settings.scene.particle_count = n;
        }
        if let Some(n) = self.objects {
            settings.scene.floating_object_count = n;
        }
        if let Some(n) = self.max_stars {
            settings.stars.max_active = n;
        }
        if let Some(path) = &self.log_file {
            config.log.file = Some(path.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "stardrift",
            "--seed",
            "9",
            "--particles",
            "300",
            "--max-stars",
            "0",
            "--log-file",
            "/tmp/sd.log",
        ])
        .unwrap();
        let mut config = Config::default();
        cli.apply(&mut config);

        assert_eq!(config.settings.seed, Some(9));
        assert_eq!(config.settings.scene.particle_count, 300);
        assert_eq!(config.settings.scene.floating_object_count, 20);
        assert_eq!(config.settings.stars.cap(), None);
        assert_eq!(config.log.file, Some(PathBuf::from("/tmp/sd.log")));
    }

    #[test]
    fn test_no_flags_leave_config_alone() {
        let cli = Cli::try_parse_from(["stardrift"]).unwrap();
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config, Config::default());
        assert!(!cli.print_config);
    }
}
