//! Playlist management
//!
//! Keeps tracks in play order, follows the currently playing entry by
//! handle, and supports positional insert/remove, navigation and rotation.

use thiserror::Error;


/// Errors that can occur with playlist operations.
///
/// None of these leave the playlist partially modified.
#[derive( Debug, Clone, PartialEq, Eq, Error )]
pub enum PlaylistError {
    #[error( "Invalid position {position} (playlist has {len} tracks)" )]
    InvalidPosition { position: usize, len: usize },

    #[error( "Playlist is empty" )]
    EmptyPlaylist,

    #[error( "End of the playlist reached" )]
    EndOfPlaylist,

    #[error( "Already at the first track" )]
    StartOfPlaylist,
}


/// Stable handle to one playlist entry.
///
/// Handles are never reused within a playlist, so a handle held across
/// insertions and removals either names the same entry or none at all.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash )]
pub struct EntryId( u64 );


/// A single track record.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct Track {
    pub title: String,
}


impl Track {
    /// Creates a track with the given title.
    pub fn new( title: impl Into<String> ) -> Self {
        Self { title: title.into() }
    }
}


/// One row of a playlist listing.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub struct PlaylistRow<'a> {
    /// 1-based position.
    pub position: usize,
    pub title: &'a str,
    pub is_current: bool,
}


#[derive( Debug )]
struct Entry {
    id: EntryId,
    track: Track,
}


/// Ordered collection of tracks with a current-track cursor.
#[derive( Debug, Default )]
pub struct Playlist {
    entries: Vec<Entry>,
    cursor: Option<EntryId>,
    next_id: u64,
}


impl Playlist {
    /// Creates a new empty playlist.
    pub fn new() -> Self {
        Self::default()
    }


    /// Adds a track to the end of the playlist.
    ///
    /// The first track added to an empty playlist becomes the current track.
    pub fn append( &mut self, title: impl Into<String> ) -> EntryId {
        let id = self.mint_id();
        self.entries.push( Entry { id, track: Track::new( title ) } );

        if self.cursor.is_none() {
            self.cursor = Some( id );
        }

        tracing::debug!( "Appended entry {:?} at position {}", id, self.entries.len() );
        id
    }


    /// Inserts a track so that it occupies the given 1-based position.
    ///
    /// @param title - Title of the new track
    /// @param position - Target position, valid in `1..=len + 1`
    ///
    /// @returns The handle of the new entry
    pub fn insert_at( &mut self, title: impl Into<String>, position: usize ) -> Result<EntryId, PlaylistError> {
        let len = self.entries.len();
        if position == 0 || position > len + 1 {
            return Err( PlaylistError::InvalidPosition { position, len } );
        }

        let id = self.mint_id();
        self.entries.insert( position - 1, Entry { id, track: Track::new( title ) } );

        if self.cursor.is_none() {
            self.cursor = Some( id );
        }

        tracing::debug!( "Inserted entry {:?} at position {}", id, position );
        Ok( id )
    }


    /// Removes the track at the given 1-based position.
    ///
    /// If the removed track was current, the cursor moves to the previous
    /// track, or the next one when the first track was removed.
    pub fn remove_at( &mut self, position: usize ) -> Result<Track, PlaylistError> {
        let len = self.entries.len();
        if len == 0 {
            return Err( PlaylistError::EmptyPlaylist );
        }
        if position == 0 || position > len {
            return Err( PlaylistError::InvalidPosition { position, len } );
        }

        let index = position - 1;
        let removed = self.entries.remove( index );

        if self.cursor == Some( removed.id ) {
            // Predecessor, then successor (which has shifted into `index`)
            self.cursor = index
                .checked_sub( 1 )
                .or( ( index < self.entries.len() ).then_some( index ) )
                .map( |i| self.entries[ i ].id );
            tracing::debug!( "Cursor relocated to {:?}", self.cursor );
        }

        tracing::debug!( "Removed entry {:?} from position {}", removed.id, position );
        Ok( removed.track )
    }


    /// Gets the title of the current track, if any.
    pub fn current_title( &self ) -> Option<&str> {
        self.current_index().map( |i| self.entries[ i ].track.title.as_str() )
    }


    /// Gets the handle of the current track, if any.
    pub fn current_id( &self ) -> Option<EntryId> {
        self.cursor
    }


    /// Gets the 1-based position of the current track.
    pub fn current_position( &self ) -> Option<usize> {
        self.current_index().map( |i| i + 1 )
    }


    /// Advances to the next track.
    ///
    /// Returns the new current title, or `EndOfPlaylist` without moving
    /// when there is no next track.
    pub fn advance( &mut self ) -> Result<&str, PlaylistError> {
        let next = self.current_index()
            .map( |i| i + 1 )
            .filter( |&i| i < self.entries.len() )
            .ok_or( PlaylistError::EndOfPlaylist )?;

        self.move_cursor( next )
    }


    /// Goes back to the previous track.
    ///
    /// Returns the new current title, or `StartOfPlaylist` without moving
    /// when there is no previous track.
    pub fn retreat( &mut self ) -> Result<&str, PlaylistError> {
        let prev = self.current_index()
            .and_then( |i| i.checked_sub( 1 ) )
            .ok_or( PlaylistError::StartOfPlaylist )?;

        self.move_cursor( prev )
    }


    /// Moves the first track to the end of the playlist.
    ///
    /// This is the "shuffle" of the command set: a single left rotation,
    /// deterministic, leaving the current track unchanged.
    ///
    /// @returns true if the playlist was rotated
    pub fn rotate_forward( &mut self ) -> bool {
        if self.entries.len() < 2 {
            return false;
        }

        self.entries.rotate_left( 1 );
        tracing::debug!( "Rotated playlist of {} tracks", self.entries.len() );
        true
    }


    /// Lists every track in order along with its position and whether it
    /// is the current track.
    pub fn snapshot( &self ) -> Vec<PlaylistRow<'_>> {
        self.entries
            .iter()
            .enumerate()
            .map( |( i, entry )| PlaylistRow {
                position: i + 1,
                title: &entry.track.title,
                is_current: self.cursor == Some( entry.id ),
            })
            .collect()
    }


    /// Gets all titles in order.
    pub fn titles( &self ) -> impl Iterator<Item = &str> {
        self.entries.iter().map( |e| e.track.title.as_str() )
    }


    /// Gets the track at a 1-based position.
    pub fn get( &self, position: usize ) -> Option<&Track> {
        position
            .checked_sub( 1 )
            .and_then( |i| self.entries.get( i ) )
            .map( |e| &e.track )
    }


    /// Gets the number of tracks.
    pub fn len( &self ) -> usize {
        self.entries.len()
    }


    /// Returns true if the playlist is empty.
    pub fn is_empty( &self ) -> bool {
        self.entries.is_empty()
    }


    fn current_index( &self ) -> Option<usize> {
        let cursor = self.cursor?;
        self.entries.iter().position( |e| e.id == cursor )
    }


    fn move_cursor( &mut self, index: usize ) -> Result<&str, PlaylistError> {
        let entry = &self.entries[ index ];
        self.cursor = Some( entry.id );
        tracing::debug!( "Cursor moved to position {}", index + 1 );
        Ok( &entry.track.title )
    }


    fn mint_id( &mut self ) -> EntryId {
        let id = EntryId( self.next_id );
        self.next_id += 1;
        id
    }
}


impl<T: Into<String>> FromIterator<T> for Playlist {
    fn from_iter<I: IntoIterator<Item = T>>( iter: I ) -> Self {
        let mut playlist = Self::new();
        for title in iter {
            playlist.append( title );
        }
        playlist
    }
}


#[cfg( test )]
mod tests {
    use super::*;


    type Row<'a> = ( usize, &'a str, bool );


    fn rows( playlist: &Playlist ) -> Vec<Row<'_>> {
        playlist.snapshot()
            .into_iter()
            .map( |r| ( r.position, r.title, r.is_current ) )
            .collect()
    }


    fn titles( playlist: &Playlist ) -> Vec<&str> {
        playlist.titles().collect()
    }


    #[test]
    fn test_new_is_empty() {
        let playlist = Playlist::new();
        assert!( playlist.is_empty() );
        assert_eq!( playlist.current_title(), None );
        assert_eq!( playlist.current_position(), None );
        assert!( playlist.snapshot().is_empty() );
    }


    #[test]
    fn test_append_keeps_order() {
        let playlist: Playlist = [ "A", "B", "C", "D" ].into_iter().collect();
        assert_eq!( titles( &playlist ), vec![ "A", "B", "C", "D" ] );
        assert_eq!( playlist.len(), 4 );
    }


    #[test]
    fn test_first_append_sets_cursor() {
        let mut playlist = Playlist::new();
        let first = playlist.append( "A" );
        playlist.append( "B" );
        assert_eq!( playlist.current_id(), Some( first ) );
        assert_eq!( playlist.current_title(), Some( "A" ) );
    }


    #[test]
    fn test_duplicate_and_empty_titles() {
        let mut playlist = Playlist::new();
        let a = playlist.append( "same" );
        let b = playlist.append( "same" );
        playlist.append( "" );
        assert_ne!( a, b );
        assert_eq!( titles( &playlist ), vec![ "same", "same", "" ] );
    }


    #[test]
    fn test_insert_at_front() {
        let mut playlist: Playlist = [ "A", "B" ].into_iter().collect();
        playlist.insert_at( "X", 1 ).unwrap();
        assert_eq!( titles( &playlist ), vec![ "X", "A", "B" ] );
        assert_eq!( playlist.current_title(), Some( "A" ) );
        assert_eq!( playlist.current_position(), Some( 2 ) );
    }


    #[test]
    fn test_insert_at_end_and_middle() {
        let mut playlist: Playlist = [ "A", "B" ].into_iter().collect();
        playlist.insert_at( "Z", 3 ).unwrap();
        playlist.insert_at( "M", 2 ).unwrap();
        assert_eq!( titles( &playlist ), vec![ "A", "M", "B", "Z" ] );
    }


    #[test]
    fn test_insert_into_empty_sets_cursor() {
        let mut playlist = Playlist::new();
        let id = playlist.insert_at( "A", 1 ).unwrap();
        assert_eq!( playlist.current_id(), Some( id ) );
    }


    #[test]
    fn test_insert_invalid_position() {
        let mut playlist: Playlist = [ "A", "B" ].into_iter().collect();
        let before: Vec<( usize, String, bool )> = rows( &playlist )
            .into_iter()
            .map( |( p, t, c )| ( p, t.to_string(), c ) )
            .collect();

        assert_eq!(
            playlist.insert_at( "X", 0 ),
            Err( PlaylistError::InvalidPosition { position: 0, len: 2 } )
        );
        assert_eq!(
            playlist.insert_at( "X", 4 ),
            Err( PlaylistError::InvalidPosition { position: 4, len: 2 } )
        );
        let after: Vec<( usize, String, bool )> = rows( &playlist )
            .into_iter()
            .map( |( p, t, c )| ( p, t.to_string(), c ) )
            .collect();
        assert_eq!( after, before );

        let mut empty = Playlist::new();
        assert!( empty.insert_at( "X", 2 ).is_err() );
        assert!( empty.is_empty() );
    }


    #[test]
    fn test_remove_errors() {
        let mut empty = Playlist::new();
        assert_eq!( empty.remove_at( 1 ), Err( PlaylistError::EmptyPlaylist ) );

        let mut playlist: Playlist = [ "A", "B" ].into_iter().collect();
        assert_eq!(
            playlist.remove_at( 0 ),
            Err( PlaylistError::InvalidPosition { position: 0, len: 2 } )
        );
        assert_eq!(
            playlist.remove_at( 3 ),
            Err( PlaylistError::InvalidPosition { position: 3, len: 2 } )
        );
        assert_eq!( titles( &playlist ), vec![ "A", "B" ] );
    }


    #[test]
    fn test_remove_then_insert_restores_titles() {
        let mut playlist: Playlist = [ "A", "B", "C" ].into_iter().collect();
        let original: Vec<String> = playlist.titles().map( String::from ).collect();

        for k in 1..=3 {
            let removed = playlist.remove_at( k ).unwrap();
            playlist.insert_at( removed.title, k ).unwrap();
            assert_eq!( playlist.titles().collect::<Vec<_>>(), original );
        }
    }


    #[test]
    fn test_remove_non_current_keeps_cursor() {
        let mut playlist: Playlist = [ "A", "B", "C" ].into_iter().collect();
        playlist.advance().unwrap();
        playlist.remove_at( 1 ).unwrap();
        assert_eq!( playlist.current_title(), Some( "B" ) );
        playlist.remove_at( 2 ).unwrap();
        assert_eq!( playlist.current_title(), Some( "B" ) );
    }


    #[test]
    fn test_remove_current_moves_to_predecessor() {
        let mut playlist: Playlist = [ "A", "B", "C" ].into_iter().collect();
        playlist.advance().unwrap();
        playlist.advance().unwrap();
        playlist.remove_at( 3 ).unwrap();
        assert_eq!( playlist.current_title(), Some( "B" ) );
    }


    #[test]
    fn test_remove_current_head_moves_to_successor() {
        let mut playlist: Playlist = [ "A", "B", "C" ].into_iter().collect();
        playlist.remove_at( 1 ).unwrap();
        assert_eq!( playlist.current_title(), Some( "B" ) );
        assert_eq!( playlist.current_position(), Some( 1 ) );
    }


    #[test]
    fn test_remove_last_entry_unsets_cursor() {
        let mut playlist: Playlist = [ "A" ].into_iter().collect();
        let removed = playlist.remove_at( 1 ).unwrap();
        assert_eq!( removed, Track::new( "A" ) );
        assert!( playlist.is_empty() );
        assert_eq!( playlist.current_id(), None );
        assert_eq!( playlist.advance(), Err( PlaylistError::EndOfPlaylist ) );
        assert_eq!( playlist.retreat(), Err( PlaylistError::StartOfPlaylist ) );

        // Refilling picks up a cursor again
        playlist.append( "B" );
        assert_eq!( playlist.current_title(), Some( "B" ) );
    }


    #[test]
    fn test_advance_and_retreat() {
        let mut playlist: Playlist = [ "A", "B", "C" ].into_iter().collect();
        assert_eq!( playlist.advance(), Ok( "B" ) );
        assert_eq!( playlist.advance(), Ok( "C" ) );
        assert_eq!( playlist.retreat(), Ok( "B" ) );
        assert_eq!( playlist.retreat(), Ok( "A" ) );
    }


    #[test]
    fn test_advance_at_end_is_noop() {
        let mut playlist: Playlist = [ "A", "B" ].into_iter().collect();
        playlist.advance().unwrap();
        let id = playlist.current_id();
        assert_eq!( playlist.advance(), Err( PlaylistError::EndOfPlaylist ) );
        assert_eq!( playlist.current_id(), id );
        assert_eq!( playlist.current_title(), Some( "B" ) );
    }


    #[test]
    fn test_retreat_at_start_is_noop() {
        let mut playlist: Playlist = [ "A", "B" ].into_iter().collect();
        assert_eq!( playlist.retreat(), Err( PlaylistError::StartOfPlaylist ) );
        assert_eq!( playlist.current_title(), Some( "A" ) );
    }


    #[test]
    fn test_rotate_forward() {
        let mut playlist: Playlist = [ "A", "B", "C" ].into_iter().collect();
        assert!( playlist.rotate_forward() );
        assert_eq!( titles( &playlist ), vec![ "B", "C", "A" ] );

        // Cursor follows its entry
        assert_eq!( playlist.current_title(), Some( "A" ) );
        assert_eq!( playlist.current_position(), Some( 3 ) );
    }


    #[test]
    fn test_rotate_forward_short_is_noop() {
        let mut empty = Playlist::new();
        assert!( !empty.rotate_forward() );

        let mut single: Playlist = [ "A" ].into_iter().collect();
        assert!( !single.rotate_forward() );
        assert_eq!( titles( &single ), vec![ "A" ] );
    }


    #[test]
    fn test_rotate_full_cycle() {
        let mut playlist: Playlist = [ "A", "B", "C" ].into_iter().collect();
        for _ in 0..3 {
            playlist.rotate_forward();
        }
        assert_eq!( titles( &playlist ), vec![ "A", "B", "C" ] );
    }


    #[test]
    fn test_get() {
        let playlist: Playlist = [ "A", "B" ].into_iter().collect();
        assert_eq!( playlist.get( 0 ), None );
        assert_eq!( playlist.get( 2 ).map( |t| t.title.as_str() ), Some( "B" ) );
        assert_eq!( playlist.get( 3 ), None );
    }


    #[test]
    fn test_scenario_insert_and_remove_around_cursor() {
        let mut playlist: Playlist = [ "A", "B", "C" ].into_iter().collect();
        let expected: Vec<Row> = vec![ ( 1, "A", true ), ( 2, "B", false ), ( 3, "C", false ) ];
        assert_eq!( rows( &playlist ), expected );

        assert_eq!( playlist.advance(), Ok( "B" ) );

        playlist.insert_at( "X", 1 ).unwrap();
        let expected: Vec<Row> = vec![
            ( 1, "X", false ),
            ( 2, "A", false ),
            ( 3, "B", true ),
            ( 4, "C", false ),
        ];
        assert_eq!( rows( &playlist ), expected );

        playlist.remove_at( 3 ).unwrap();
        assert_eq!( playlist.current_title(), Some( "A" ) );
        let expected: Vec<Row> = vec![ ( 1, "X", false ), ( 2, "A", true ), ( 3, "C", false ) ];
        assert_eq!( rows( &playlist ), expected );
    }
}
