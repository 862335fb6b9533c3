//! Traits shared across the search and grid crates.

use crate::id::PlayerId;

/// The entity on whose behalf a search runs.
///
/// Ownership-aware blocking and search predicates only need the
/// requester's player and whether it is confined to its own territory.
pub trait PathRequester {
    /// Player the requester belongs to.
    fn player(&self) -> PlayerId;

    /// If `true`, tiles not owned by [`player`](Self::player) count as blocked.
    fn needs_players_ground(&self) -> bool;
}

/// Plain-data [`PathRequester`] for callers without a movable at hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Requester {
    /// Requesting player.
    pub player: PlayerId,
    /// Confine the search to the player's territory.
    pub needs_players_ground: bool,
}

impl Requester {
    /// A requester that may walk anywhere.
    pub fn free(player: PlayerId) -> Self {
        Self {
            player,
            needs_players_ground: false,
        }
    }

    /// A requester confined to its own territory.
    pub fn confined(player: PlayerId) -> Self {
        Self {
            player,
            needs_players_ground: true,
        }
    }
}

impl PathRequester for Requester {
    fn player(&self) -> PlayerId {
        self.player
    }

    fn needs_players_ground(&self) -> bool {
        self.needs_players_ground
    }
}

impl<T: PathRequester + ?Sized> PathRequester for &T {
    fn player(&self) -> PlayerId {
        (**self).player()
    }

    fn needs_players_ground(&self) -> bool {
        (**self).needs_players_ground()
    }
}
