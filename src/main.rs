use clap::Parser;
use winit::event_loop::EventLoop;

use cube_spin::app::App;
use cube_spin::cli::Cli;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let options = Cli::parse();

    let event_loop = EventLoop::new()?;
    let mut app = App::new(options);
    event_loop.run_app(&mut app)?;

    if let Some(err) = app.failure() {
        log::error!("exiting after fatal error: {err}");
        std::process::exit(1);
    }
    Ok(())
}
