use clap::Parser;
use knob::config;
use knob::gui::app::AppModel;
use knob::sys::runtime;
use relm4::prelude::*;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config file to load and watch (defaults to the user config directory)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Write the default config file, print its path and exit
    #[arg(long)]
    write_default_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config_path = config::resolve_config_path(args.config.as_deref())?;

    if args.write_default_config {
        let path = config::write_default_config(&config_path)?;
        println!("{}", path.display());
        return Ok(());
    }

    let config = config::load_or_default(&config_path);

    let (tx, rx) = async_channel::bounded(32);

    runtime::start_background_services(tx, config_path.clone());

    // clap owns the command line
    let app = RelmApp::new("org.knob.Knob").with_args(Vec::new());

    app.run::<AppModel>((config, config_path, rx));
    Ok(())
}
