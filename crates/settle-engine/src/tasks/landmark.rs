//! Landmark corrector: detects blocked, unowned regions (mountains, lakes)
//! enclosed by a single player's land and hands them to that player.
//!
//! Other players' land and open unowned ground are never corrected.
//!
//! The task never writes owners. It records the enclosing player in the
//! landmark layer and sends an [`OwnerCorrection`] back to the simulation
//! thread, which applies it on the next tick.

use crossbeam_channel::Sender;
use settle_core::{PlayerId, Pos};
use settle_grid::LandmarkWriter;
use tracing::debug;

/// Enclosed tiles to be handed to `player` on the next tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnerCorrection {
    /// Tiles of the enclosed region, in flood order.
    pub tiles: Vec<Pos>,
    /// The enclosing player.
    pub player: PlayerId,
}

/// Messages understood by the landmark task.
pub(crate) enum LandmarkMsg {
    /// The owner of `pos` changed to `player`.
    OwnerChanged {
        pos: Pos,
        player: Option<PlayerId>,
    },
    /// Reply once every earlier message has been handled.
    Flush(Sender<()>),
}

pub(crate) struct LandmarkCorrector {
    writer: LandmarkWriter,
    limit: usize,
    corrections: Sender<OwnerCorrection>,
    visited: Vec<u32>,
    generation: u32,
    frontier: Vec<Pos>,
}

impl LandmarkCorrector {
    pub(crate) fn new(
        writer: LandmarkWriter,
        limit: usize,
        corrections: Sender<OwnerCorrection>,
    ) -> Self {
        let n = writer.layers().space().tile_count();
        Self {
            writer,
            limit,
            corrections,
            visited: vec![0; n],
            generation: 0,
            frontier: Vec::new(),
        }
    }

    pub(crate) fn handle(&mut self, msg: LandmarkMsg) {
        match msg {
            LandmarkMsg::OwnerChanged { pos, player } => self.owner_changed(pos, player),
            LandmarkMsg::Flush(reply) => {
                let _ = reply.send(());
            }
        }
    }

    fn owner_changed(&mut self, pos: Pos, player: Option<PlayerId>) {
        self.writer.set_landmark(pos, None);
        let Some(player) = player else {
            return;
        };

        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            self.visited.fill(0);
            self.generation = 1;
        }

        let space = *self.writer.layers().space();
        for start in space.neighbours(pos) {
            let layers = self.writer.layers();
            if !layers.is_blocked(start)
                || layers.owner(start) == Some(player)
                || self.visited[space.index(start)] == self.generation
            {
                continue;
            }
            if let Some(tiles) = self.enclosed_region(start, player) {
                for &t in &tiles {
                    self.writer.set_landmark(t, Some(player));
                }
                debug!(player = %player, tiles = tiles.len(), "enclosed region found");
                if self.corrections.send(OwnerCorrection { tiles, player }).is_err() {
                    debug!("correction receiver gone; dropping correction");
                }
            }
        }
    }

    /// Flood the region of tiles not owned by `player` around `start`.
    ///
    /// Returns it only if every tile is blocked and unowned, and the region
    /// neither touches the map edge nor exceeds the limit.
    fn enclosed_region(&mut self, start: Pos, player: PlayerId) -> Option<Vec<Pos>> {
        let layers = self.writer.layers();
        let space = *layers.space();
        let mut region = Vec::new();
        self.frontier.clear();
        self.visited[space.index(start)] = self.generation;
        self.frontier.push(start);
        while let Some(pos) = self.frontier.pop() {
            if space.is_edge(pos)
                || region.len() >= self.limit
                || !layers.is_blocked(pos)
                || layers.owner(pos).is_some()
            {
                return None;
            }
            region.push(pos);
            for n in space.neighbours(pos) {
                let i = space.index(n);
                if self.visited[i] != self.generation && layers.owner(n) != Some(player) {
                    self.visited[i] = self.generation;
                    self.frontier.push(n);
                }
            }
        }
        Some(region)
    }
}
