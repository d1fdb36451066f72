//! Command line and logging setup.

use std::fs::File;
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "space_odyssey", about = "2021: Space Odyssey - dodge the falling shots")]
pub struct Config {
    /// Directory holding the images and music
    #[arg(long, default_value = "Assets")]
    pub assets: PathBuf,

    /// Frame cap
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    pub fps: u32,

    /// Seed for shot patterns; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Run without opening the audio device
    #[arg(long)]
    pub mute: bool,

    /// Log destination (stderr is covered by the game screen)
    #[arg(long, default_value = "space_odyssey.log")]
    pub log_file: PathBuf,
}

impl Config {
    pub fn frame_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / self.fps as f64)
    }
}

/// Route `log` output to the configured file.  `RUST_LOG` overrides the
/// default `info` filter.
pub fn init_logging(config: &Config) -> std::io::Result<()> {
    let file = File::create(&config.log_file)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}
