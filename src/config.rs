use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "particle-field",
    version,
    about = "Section-driven particle silhouettes in the terminal"
)]
pub struct Config {
    #[arg(long, default_value_t = 700)]
    pub particles: usize,

    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    #[arg(long, value_enum, default_value_t = RendererMode::HalfBlock)]
    pub renderer: RendererMode,

    /// Section to start in (about, projects, skills, contact, none).
    #[arg(long)]
    pub section: Option<String>,

    #[arg(long, default_value_t = 40)]
    pub max_links: usize,

    #[arg(long, default_value_t = 10.0)]
    pub link_distance: f32,

    #[arg(long, default_value_t = 14.0)]
    pub repel_radius: f32,

    #[arg(long, default_value_t = 2.0)]
    pub grid_step: f32,

    #[arg(long, value_enum, default_value_t = Integration::PerFrame)]
    pub integration: Integration,

    /// Override the preferences file location.
    #[arg(long)]
    pub prefs: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub no_prefs: bool,

    /// Seed for a reproducible particle pool.
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub sync_updates: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RendererMode {
    #[value(name = "half-block", alias = "halfblock", alias = "half_block", alias = "hb")]
    HalfBlock,
    #[value(alias = "hires", alias = "dots")]
    Braille,
}

/// How per-frame rates relate to wall-clock time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Integration {
    /// Constants apply once per tick, whatever the tick length.
    #[default]
    #[value(name = "per-frame", alias = "frame")]
    PerFrame,
    /// Constants are rescaled by elapsed time against a 60 Hz tick.
    #[value(name = "time-scaled", alias = "dt")]
    TimeScaled,
}

impl Integration {
    pub fn label(self) -> &'static str {
        match self {
            Self::PerFrame => "per-frame",
            Self::TimeScaled => "time-scaled",
        }
    }
}
