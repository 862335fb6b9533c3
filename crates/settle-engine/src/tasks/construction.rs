//! Construction marker: placement feasibility overlay for the active
//! building tool over the visible viewport.

use crossbeam_channel::Sender;
use settle_core::{BuildingType, PlayerId, Pos};
use settle_grid::{construction_mark, ConstructionMarkWriter};
use tracing::debug;

/// Active placement tool: building type and placing player.
pub type PlacementTool = (BuildingType, PlayerId);

/// Messages understood by the construction task. Every message carries a
/// reply channel; the overlay is fully written before the reply.
pub(crate) enum ConstructionMsg {
    /// Select (or clear) the placement tool.
    SetTool {
        tool: Option<PlacementTool>,
        reply: Sender<()>,
    },
    /// Move the viewport to `tiles`.
    SetScreen { tiles: Vec<Pos>, reply: Sender<()> },
    /// Recompute the current viewport, e.g. after ownership changes.
    Refresh(Sender<()>),
}

pub(crate) struct ConstructionMarker {
    writer: ConstructionMarkWriter,
    tool: Option<PlacementTool>,
    screen: Vec<Pos>,
}

impl ConstructionMarker {
    pub(crate) fn new(writer: ConstructionMarkWriter) -> Self {
        Self {
            writer,
            tool: None,
            screen: Vec::new(),
        }
    }

    pub(crate) fn handle(&mut self, msg: ConstructionMsg) {
        let reply = match msg {
            ConstructionMsg::SetTool { tool, reply } => {
                self.tool = tool;
                reply
            }
            ConstructionMsg::SetScreen { tiles, reply } => {
                for &pos in &self.screen {
                    self.writer.set_mark(pos, None);
                }
                self.screen = tiles;
                reply
            }
            ConstructionMsg::Refresh(reply) => reply,
        };
        self.recompute();
        let _ = reply.send(());
    }

    fn recompute(&self) {
        let layers = self.writer.layers();
        let mut placeable = 0usize;
        for &pos in &self.screen {
            let mark = self
                .tool
                .and_then(|(building, player)| construction_mark(layers, pos, building, player));
            placeable += usize::from(mark.is_some());
            self.writer.set_mark(pos, mark);
        }
        if self.tool.is_some() {
            debug!(tiles = self.screen.len(), placeable, "construction marks recomputed");
        }
    }
}
