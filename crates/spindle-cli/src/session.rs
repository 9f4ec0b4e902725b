//! Interactive session.
//!
//! Reads the initial songs and then runs the command loop, turning
//! playlist results into text. Generic over the input and output so the
//! whole conversation can be driven from memory.

use std::io::{ BufRead, Write };

use anyhow::Result;

use spindle_core::{
    command::{ self, Command, CommandError },
    Playlist, PlaylistError,
};

use crate::settings::Settings;


const INVALID_COUNT: &str = "Invalid input. Please enter a positive integer for the number of songs.";
const INVALID_POSITION_INPUT: &str = "Invalid input. Please enter a whole number for the position.";


/// Whether the command loop should keep going.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub enum Flow {
    Continue,
    Quit,
}


/// One interactive run over an input and an output stream.
pub struct Session<R, W> {
    input: R,
    output: W,
    playlist: Playlist,
    settings: Settings,
}


impl<R: BufRead, W: Write> Session<R, W> {
    /// Creates a session with an empty playlist.
    pub fn new( input: R, output: W, settings: Settings ) -> Self {
        Self {
            input,
            output,
            playlist: Playlist::new(),
            settings,
        }
    }


    /// Gets the playlist.
    pub fn playlist( &self ) -> &Playlist {
        &self.playlist
    }


    /// Consumes the session and returns the output stream.
    #[cfg( test )]
    pub fn into_output( self ) -> W {
        self.output
    }


    /// Runs the whole session.
    ///
    /// If `preload` is empty the song count and titles are read from the
    /// input first. Returns when the user quits or the input ends.
    pub fn run( &mut self, preload: Vec<String> ) -> Result<()> {
        if preload.is_empty() {
            if !self.read_initial_songs()? {
                tracing::info!( "Input ended before the playlist was filled" );
                return Ok(());
            }
        } else {
            for title in preload {
                self.playlist.append( title );
            }
        }

        tracing::info!( "Session started with {} tracks", self.playlist.len() );

        if self.settings.show_controls {
            writeln!( self.output, "{}", command::help_text() )?;
        }
        self.show_playlist()?;
        self.play_current()?;

        loop {
            let Some( line ) = self.prompt( "\nEnter command: " )? else {
                break;
            };

            let flow = match Command::parse( &line ) {
                Ok( cmd ) => self.execute( cmd )?,
                Err( CommandError::Unknown( _ ) ) => {
                    writeln!( self.output, "Invalid command. Please try again." )?;
                    Flow::Continue
                }
                Err( CommandError::InvalidArgument( msg ) ) => {
                    tracing::debug!( "{}", msg );
                    writeln!( self.output, "{}", INVALID_POSITION_INPUT )?;
                    Flow::Continue
                }
            };

            if flow == Flow::Quit {
                break;
            }
        }

        tracing::info!( "Session ended with {} tracks", self.playlist.len() );
        Ok(())
    }


    /// Executes a single command against the playlist.
    pub fn execute( &mut self, cmd: Command ) -> Result<Flow> {
        tracing::debug!( "Executing {:?} ({})", cmd, cmd.description() );

        match cmd {
            Command::Play => self.play_current()?,
            Command::Next => {
                let result = self.playlist.advance().map( str::to_owned );
                self.report_move( result )?;
            }
            Command::Prev => {
                let result = self.playlist.retreat().map( str::to_owned );
                self.report_move( result )?;
            }
            Command::Shuffle => {
                if self.playlist.rotate_forward() {
                    writeln!( self.output, "Playlist shuffled." )?;
                    if self.settings.show_queue_after_shuffle {
                        self.show_queue()?;
                    }
                } else {
                    writeln!( self.output, "Not enough songs to shuffle." )?;
                }
            }
            Command::Insert { position, title } => {
                let position = match position {
                    Some( p ) => p,
                    None => match self.prompt_position( "Enter position to add the song: " )? {
                        Some( p ) => p,
                        None => return Ok( Flow::Continue ),
                    },
                };
                let title = match title {
                    Some( t ) => t,
                    None => match self.prompt( "Enter song title: " )? {
                        Some( t ) => t,
                        None => return Ok( Flow::Quit ),
                    },
                };

                match self.playlist.insert_at( title.as_str(), to_position( position ) ) {
                    Ok( _ ) => writeln!( self.output, "Song added at position {}: {}", position, title )?,
                    Err( e ) => self.report_error( &e )?,
                }
            }
            Command::Remove { position } => {
                let position = match position {
                    Some( p ) => p,
                    None => match self.prompt_position( "Enter position to remove the song: " )? {
                        Some( p ) => p,
                        None => return Ok( Flow::Continue ),
                    },
                };

                match self.playlist.remove_at( to_position( position ) ) {
                    Ok( _ ) => writeln!( self.output, "Song removed from position {}", position )?,
                    Err( e ) => self.report_error( &e )?,
                }
            }
            Command::Show => self.show_playlist()?,
            Command::Help => writeln!( self.output, "{}", command::help_text() )?,
            Command::Quit => {
                writeln!( self.output, "Exiting program." )?;
                return Ok( Flow::Quit );
            }
        }

        Ok( Flow::Continue )
    }


    /// Reads the song count and that many titles.
    ///
    /// @returns false if the input ended first
    fn read_initial_songs( &mut self ) -> Result<bool> {
        let count = loop {
            let Some( line ) = self.prompt( "Enter the number of songs to add: " )? else {
                return Ok( false );
            };

            match line.trim().parse::<i64>() {
                Ok( n ) if n > 0 => break n,
                _ => {
                    tracing::debug!( "Rejected song count {:?}", line );
                    writeln!( self.output, "{}", INVALID_COUNT )?;
                }
            }
        };

        for i in 1..=count {
            let Some( title ) = self.prompt( &format!( "Enter title for song {}: ", i ) )? else {
                return Ok( false );
            };
            self.playlist.append( title );
        }

        Ok( true )
    }


    fn play_current( &mut self ) -> Result<()> {
        match self.playlist.current_title() {
            Some( title ) => writeln!( self.output, "Playing: {}", title )?,
            None => writeln!( self.output, "No song is currently playing." )?,
        }
        Ok(())
    }


    fn report_move( &mut self, result: Result<String, PlaylistError> ) -> Result<()> {
        match result {
            Ok( title ) => writeln!( self.output, "Playing: {}", title )?,
            Err( e ) => self.report_error( &e )?,
        }
        Ok(())
    }


    fn report_error( &mut self, error: &PlaylistError ) -> Result<()> {
        tracing::debug!( "Playlist operation rejected: {}", error );
        let message = match error {
            PlaylistError::InvalidPosition { .. } => "Invalid position.",
            PlaylistError::EmptyPlaylist => "Playlist is empty.",
            PlaylistError::EndOfPlaylist => "End of the playlist reached.",
            PlaylistError::StartOfPlaylist => "This is the first song in the playlist.",
        };
        writeln!( self.output, "{}", message )?;
        Ok(())
    }


    fn show_playlist( &mut self ) -> Result<()> {
        let marker = self.settings.current_marker.as_str();
        let padding = " ".repeat( marker.chars().count() );

        writeln!( self.output, "Current Playlist:" )?;
        for row in self.playlist.snapshot() {
            let prefix = if row.is_current { marker } else { padding.as_str() };
            writeln!( self.output, "{}{}", prefix, row.title )?;
        }

        self.show_queue()
    }


    fn show_queue( &mut self ) -> Result<()> {
        let queue = self.playlist.titles().collect::<Vec<_>>().join( " " );
        writeln!( self.output, "Current queue: {}", queue )?;
        Ok(())
    }


    /// Prompts for a position, reporting non-numeric input.
    ///
    /// Returns `None` both for rejected input and at end of input.
    fn prompt_position( &mut self, text: &str ) -> Result<Option<i64>> {
        let Some( line ) = self.prompt( text )? else {
            return Ok( None );
        };

        match command::parse_position( &line ) {
            Ok( p ) => Ok( Some( p ) ),
            Err( e ) => {
                tracing::debug!( "{}", e );
                writeln!( self.output, "{}", INVALID_POSITION_INPUT )?;
                Ok( None )
            }
        }
    }


    fn prompt( &mut self, text: &str ) -> Result<Option<String>> {
        write!( self.output, "{}", text )?;
        self.output.flush()?;
        self.read_line()
    }


    /// Reads one line without its terminator, or `None` at end of input.
    fn read_line( &mut self ) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line( &mut line )? == 0 {
            return Ok( None );
        }

        let trimmed = line.trim_end_matches( [ '\n', '\r' ] ).len();
        line.truncate( trimmed );
        Ok( Some( line ) )
    }
}


/// Negative positions can never be valid, so they map to 0 and the
/// playlist reports them as out of range.
fn to_position( position: i64 ) -> usize {
    usize::try_from( position ).unwrap_or( 0 )
}


#[cfg( test )]
mod tests {
    use std::io::Cursor;

    use super::*;


    fn run_with( input: &str, preload: &[ &str ], settings: Settings ) -> ( String, Vec<String> ) {
        let mut session = Session::new( Cursor::new( input.to_string() ), Vec::new(), settings );
        session.run( preload.iter().map( |s| s.to_string() ).collect() ).unwrap();

        let titles = session.playlist().titles().map( String::from ).collect();
        let output = String::from_utf8( session.into_output() ).unwrap();
        ( output, titles )
    }


    fn quiet() -> Settings {
        Settings { show_controls: false, ..Settings::default() }
    }


    #[test]
    fn test_initial_songs_are_read_in_order() {
        let ( output, titles ) = run_with( "3\nA\nB\nC\nq\n", &[], quiet() );
        assert_eq!( titles, vec![ "A", "B", "C" ] );
        assert!( output.contains( "Current Playlist:\n> A\n  B\n  C\n" ) );
        assert!( output.contains( "Current queue: A B C\n" ) );
        assert!( output.contains( "Playing: A\n" ) );
        assert!( output.ends_with( "Exiting program.\n" ) );
    }


    #[test]
    fn test_invalid_count_is_reprompted() {
        let ( output, titles ) = run_with( "abc\n0\n-2\n2\nFirst song\nSecond\nq\n", &[], quiet() );
        assert_eq!( output.matches( INVALID_COUNT ).count(), 3 );
        assert_eq!( titles, vec![ "First song", "Second" ] );
    }


    #[test]
    fn test_empty_title_is_kept() {
        let ( _, titles ) = run_with( "2\n\nB\nq\n", &[], quiet() );
        assert_eq!( titles, vec![ "", "B" ] );
    }


    #[test]
    fn test_controls_shown_by_default() {
        let ( output, _ ) = run_with( "q\n", &[ "A" ], Settings::default() );
        assert!( output.starts_with( "Controls:" ) );

        let ( output, _ ) = run_with( "q\n", &[ "A" ], quiet() );
        assert!( !output.contains( "Controls:" ) );
    }


    #[test]
    fn test_navigation_messages() {
        let ( output, _ ) = run_with( "b\nn\nn\nF\n", &[ "A", "B" ], quiet() );
        assert!( output.contains( "This is the first song in the playlist.\n" ) );
        assert!( output.contains( "Playing: B\n" ) );
        assert!( output.contains( "End of the playlist reached.\n" ) );
    }


    #[test]
    fn test_insert_with_prompts() {
        let ( output, titles ) = run_with( "G\n1\nX\nW\nq\n", &[ "A", "B" ], quiet() );
        assert!( output.contains( "Enter position to add the song: Enter song title: Song added at position 1: X\n" ) );
        assert!( output.contains( "Current Playlist:\n  X\n> A\n  B\n" ) );
        assert_eq!( titles, vec![ "X", "A", "B" ] );
    }


    #[test]
    fn test_insert_inline_and_invalid() {
        let ( output, titles ) = run_with( "G 3 Last One\nG 9 Nope\nG -1 Nope\nq\n", &[ "A", "B" ], quiet() );
        assert!( output.contains( "Song added at position 3: Last One\n" ) );
        assert_eq!( output.matches( "Invalid position.\n" ).count(), 2 );
        assert_eq!( titles, vec![ "A", "B", "Last One" ] );
    }


    #[test]
    fn test_remove_relocates_current() {
        let ( output, titles ) = run_with( "n\ng\n2\nF\nq\n", &[ "A", "B", "C" ], quiet() );
        assert!( output.contains( "Song removed from position 2\n" ) );
        assert!( output.ends_with( "Playing: A\n\nEnter command: Exiting program.\n" ) );
        assert_eq!( titles, vec![ "A", "C" ] );
    }


    #[test]
    fn test_remove_errors() {
        let ( output, _ ) = run_with( "g 5\ng 1\ng 1\nF\nq\n", &[ "A" ], quiet() );
        assert!( output.contains( "Invalid position.\n" ) );
        assert!( output.contains( "Song removed from position 1\n" ) );
        assert!( output.contains( "Playlist is empty.\n" ) );
        assert!( output.contains( "No song is currently playing.\n" ) );
    }


    #[test]
    fn test_non_numeric_position_leaves_playlist_alone() {
        let ( output, titles ) = run_with( "g\nabc\nG two Song\nq\n", &[ "A" ], quiet() );
        assert_eq!( output.matches( INVALID_POSITION_INPUT ).count(), 2 );
        assert_eq!( titles, vec![ "A" ] );
    }


    #[test]
    fn test_shuffle_rotates_and_shows_queue() {
        let ( output, titles ) = run_with( "s\nq\n", &[ "A", "B", "C" ], quiet() );
        assert!( output.contains( "Playlist shuffled.\nCurrent queue: B C A\n" ) );
        assert_eq!( titles, vec![ "B", "C", "A" ] );

        let ( output, _ ) = run_with( "s\nq\n", &[ "A" ], quiet() );
        assert!( output.contains( "Not enough songs to shuffle.\n" ) );
    }


    #[test]
    fn test_invalid_command_reprompts() {
        let ( output, titles ) = run_with( "x\nq\n", &[ "A" ], quiet() );
        assert!( output.contains( "Invalid command. Please try again.\n" ) );
        assert_eq!( titles, vec![ "A" ] );
    }


    #[test]
    fn test_custom_marker() {
        let settings = Settings { current_marker: "* ".into(), ..quiet() };
        let ( output, _ ) = run_with( "q\n", &[ "A", "B" ], settings );
        assert!( output.contains( "* A\n  B\n" ) );
    }


    #[test]
    fn test_end_of_input_ends_session() {
        let ( output, titles ) = run_with( "2\nA\n", &[], quiet() );
        assert_eq!( titles, vec![ "A" ] );
        assert!( !output.contains( "Exiting program." ) );

        let ( _, titles ) = run_with( "", &[ "A" ], quiet() );
        assert_eq!( titles, vec![ "A" ] );
    }


    #[test]
    fn test_windows_line_endings() {
        let ( _, titles ) = run_with( "1\r\nSong\r\nq\r\n", &[], quiet() );
        assert_eq!( titles, vec![ "Song" ] );
    }
}
