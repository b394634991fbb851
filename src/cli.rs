// cli.rs - Command-line interface configuration
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "cube-spin")]
#[command(about = "Spinning cube frame-pacing demo", long_about = None)]
pub struct Cli {
    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 600)]
    pub height: u32,

    /// Cube rotation speed in turns per second
    #[arg(long = "spin-speed", default_value_t = 0.5)]
    pub spin_speed: f32,
}
