//! Spindle CLI - Interactive playlist manager

mod cli;
mod session;
mod settings;

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing::Level;

use cli::Args;
use session::Session;
use settings::Settings;


/// Installs the stderr log subscriber; stdout belongs to the session.
fn init_logging( verbose: u8 ) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level( level )
        .with_writer( io::stderr )
        .with_target( false )
        .init();
}


fn main() -> Result<()> {
    let args = Args::parse();
    init_logging( args.verbose );

    let mut settings = Settings::load();
    if args.no_controls {
        settings.show_controls = false;
    }
    if args.save_settings {
        settings.save();
        tracing::info!( "Saved settings to {:?}", Settings::settings_path() );
    }

    let stdin = io::stdin();
    let mut session = Session::new( stdin.lock(), io::stdout(), settings );
    session.run( args.tracks )?;
    tracing::debug!( "Final playlist length: {}", session.playlist().len() );

    Ok(())
}
