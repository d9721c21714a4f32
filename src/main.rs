use anyhow::{Context, Result};
use clap::Parser;
use particle_field::config::Config;

fn main() -> Result<()> {
    let cfg = Config::parse();
    init_logging(&cfg)?;

    particle_field::app::run(cfg)
}

/// The terminal is in raw mode while the page runs, so log lines only go
/// somewhere visible when `--log-file` names a destination.
fn init_logging(cfg: &Config) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    match cfg.log_file.as_deref() {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("create log file {}", path.display()))?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        None => {
            builder.filter_level(log::LevelFilter::Error);
        }
    }
    builder.init();
    Ok(())
}
