//! Command-line argument parsing for Spindle.

use clap::Parser;


/// Spindle - An interactive in-memory playlist manager.
#[derive( Parser, Debug )]
#[command( name = "spindle" )]
#[command( version, about, long_about = None )]
pub struct Args {
    /// Track title to start with (repeatable). Skips the song count prompt.
    #[arg( short, long = "track", value_name = "TITLE" )]
    pub tracks: Vec<String>,

    /// Do not print the controls at start-up.
    #[arg( long )]
    pub no_controls: bool,

    /// Write the effective settings to the settings file and continue.
    #[arg( long )]
    pub save_settings: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg( short, long, action = clap::ArgAction::Count )]
    pub verbose: u8,
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_parse_tracks_and_flags() {
        let args = Args::try_parse_from([
            "spindle", "-t", "One", "--track", "Two", "--no-controls", "-vv",
        ]).unwrap();
        assert_eq!( args.tracks, vec![ "One", "Two" ] );
        assert!( args.no_controls );
        assert!( !args.save_settings );
        assert_eq!( args.verbose, 2 );
    }


    #[test]
    fn test_parse_defaults() {
        let args = Args::try_parse_from([ "spindle" ]).unwrap();
        assert!( args.tracks.is_empty() );
        assert!( !args.no_controls );
        assert_eq!( args.verbose, 0 );
    }
}
