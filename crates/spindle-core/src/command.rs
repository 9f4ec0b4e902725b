//! Command parsing.
//!
//! Maps a line of user input onto the playlist command set. Single-key
//! commands are case-sensitive (`G` inserts, `g` removes); long names are
//! not. Arguments may follow the command on the same line, anything left
//! out is prompted for by the caller.

use thiserror::Error;


/// Errors that can occur during command parsing.
#[derive( Debug, Clone, PartialEq, Eq, Error )]
pub enum CommandError {
    #[error( "Unknown command: {0}" )]
    Unknown( String ),

    #[error( "Invalid argument: {0}" )]
    InvalidArgument( String ),
}


/// Parsed playlist command.
#[derive( Debug, Clone, PartialEq, Eq )]
pub enum Command {
    /// Show the current track.
    Play,
    /// Rotate the playlist by one.
    Shuffle,
    Next,
    Prev,
    /// Insert a track at a position.
    Insert { position: Option<i64>, title: Option<String> },
    /// Remove the track at a position.
    Remove { position: Option<i64> },
    /// List the playlist.
    Show,
    Help,
    Quit,
}


impl Command {
    /// Parses one line of input.
    ///
    /// @param input - The raw command line
    ///
    /// @returns The parsed command or an error
    pub fn parse( input: &str ) -> Result<Self, CommandError> {
        let input = input.trim();
        let mut parts = input.splitn( 2, char::is_whitespace );
        let cmd = parts.next().unwrap_or( "" );
        let args = parts.next().map( str::trim ).filter( |s| !s.is_empty() );

        let command = match cmd {
            "F" => Command::Play,
            "s" => Command::Shuffle,
            "n" => Command::Next,
            "b" => Command::Prev,
            "G" => Self::parse_insert( args )?,
            "g" => Self::parse_remove( args )?,
            "W" => Command::Show,
            "h" | "?" => Command::Help,
            "q" => Command::Quit,
            "" => return Err( CommandError::Unknown( "empty command".into() ) ),
            other => match other.to_lowercase().as_str() {
                "play" | "p" => Command::Play,
                "shuffle" | "sh" => Command::Shuffle,
                "next" => Command::Next,
                "prev" | "previous" => Command::Prev,
                "insert" | "add" => Self::parse_insert( args )?,
                "remove" | "rm" => Self::parse_remove( args )?,
                "list" | "show" => Command::Show,
                "help" => Command::Help,
                "quit" | "exit" => Command::Quit,
                _ => return Err( CommandError::Unknown( other.to_string() ) ),
            },
        };

        Ok( command )
    }


    /// Returns a brief description of the command for help text.
    pub fn description( &self ) -> &'static str {
        match self {
            Command::Play => "Play current song",
            Command::Shuffle => "Shuffle the playlist",
            Command::Next => "Next song",
            Command::Prev => "Previous song",
            Command::Insert { .. } => "Add a song at a specific position",
            Command::Remove { .. } => "Remove a song from a specific position",
            Command::Show => "Display the playlist",
            Command::Help => "Show controls",
            Command::Quit => "Quit the program",
        }
    }


    fn parse_insert( args: Option<&str> ) -> Result<Self, CommandError> {
        let Some( args ) = args else {
            return Ok( Command::Insert { position: None, title: None } );
        };

        let mut parts = args.splitn( 2, char::is_whitespace );
        let position = parts.next().map( parse_position ).transpose()?;
        let title = parts.next().map( |t| t.trim().to_string() );

        Ok( Command::Insert { position, title } )
    }


    fn parse_remove( args: Option<&str> ) -> Result<Self, CommandError> {
        let position = args.map( parse_position ).transpose()?;
        Ok( Command::Remove { position } )
    }
}


/// Parses a position argument.
///
/// Any integer is accepted here, range checks belong to the playlist.
pub fn parse_position( s: &str ) -> Result<i64, CommandError> {
    let s = s.trim();
    s.parse()
        .map_err( |_| CommandError::InvalidArgument( format!( "Invalid position: '{}'", s ) ) )
}


/// Returns help text listing all available commands.
pub fn help_text() -> &'static str {
    r#"Controls:
  F     - Play current song
  s     - Shuffle the playlist
  n     - Next song
  b     - Previous song
  G     - Add a song at a specific position   [G <pos> <title>]
  g     - Remove a song from a specific position   [g <pos>]
  W     - Display the playlist
  h     - Show these controls
  q     - Quit the program"#
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_parse_single_keys() {
        assert_eq!( Command::parse( "F" ).unwrap(), Command::Play );
        assert_eq!( Command::parse( "s" ).unwrap(), Command::Shuffle );
        assert_eq!( Command::parse( "n" ).unwrap(), Command::Next );
        assert_eq!( Command::parse( "b" ).unwrap(), Command::Prev );
        assert_eq!( Command::parse( "W" ).unwrap(), Command::Show );
        assert_eq!( Command::parse( "q" ).unwrap(), Command::Quit );
    }


    #[test]
    fn test_parse_keys_are_case_sensitive() {
        assert_eq!(
            Command::parse( "G" ).unwrap(),
            Command::Insert { position: None, title: None }
        );
        assert_eq!( Command::parse( "g" ).unwrap(), Command::Remove { position: None } );
        assert!( matches!( Command::parse( "f" ), Err( CommandError::Unknown( _ ) ) ) );
        assert!( matches!( Command::parse( "N" ), Err( CommandError::Unknown( _ ) ) ) );
    }


    #[test]
    fn test_parse_long_names() {
        assert_eq!( Command::parse( "PLAY" ).unwrap(), Command::Play );
        assert_eq!( Command::parse( "previous" ).unwrap(), Command::Prev );
        assert_eq!( Command::parse( "  shuffle  " ).unwrap(), Command::Shuffle );
        assert_eq!( Command::parse( "exit" ).unwrap(), Command::Quit );
    }


    #[test]
    fn test_parse_insert_inline() {
        let cmd = Command::parse( "G 2 Bohemian Rhapsody" ).unwrap();
        assert_eq!( cmd, Command::Insert {
            position: Some( 2 ),
            title: Some( "Bohemian Rhapsody".into() ),
        });
    }


    #[test]
    fn test_parse_insert_position_only() {
        let cmd = Command::parse( "insert 3" ).unwrap();
        assert_eq!( cmd, Command::Insert { position: Some( 3 ), title: None } );
    }


    #[test]
    fn test_parse_remove_inline() {
        assert_eq!( Command::parse( "g 4" ).unwrap(), Command::Remove { position: Some( 4 ) } );
        assert_eq!( Command::parse( "rm -1" ).unwrap(), Command::Remove { position: Some( -1 ) } );
    }


    #[test]
    fn test_parse_bad_position() {
        assert!( matches!( Command::parse( "g two" ), Err( CommandError::InvalidArgument( _ ) ) ) );
        assert!( matches!( Command::parse( "G x Song" ), Err( CommandError::InvalidArgument( _ ) ) ) );
    }


    #[test]
    fn test_parse_unknown() {
        assert!( matches!( Command::parse( "z" ), Err( CommandError::Unknown( _ ) ) ) );
        assert!( matches!( Command::parse( "" ), Err( CommandError::Unknown( _ ) ) ) );
    }


    #[test]
    fn test_help_lists_every_key() {
        let help = help_text();
        for key in [ "F ", "s ", "n ", "b ", "G ", "g ", "W ", "q " ] {
            assert!( help.contains( &format!( "  {}", key ) ), "missing {}", key );
        }
    }
}
