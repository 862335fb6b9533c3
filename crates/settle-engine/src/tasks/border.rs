//! Border tracer: keeps the border flag of changed tiles and their ring
//! in sync with the owner layer.

use crossbeam_channel::Sender;
use settle_core::Pos;
use settle_grid::BorderWriter;
use tracing::debug;

/// Messages understood by the border task.
pub(crate) enum BorderMsg {
    /// The owner of this tile changed.
    Check(Pos),
    /// Reply once every earlier message has been handled.
    Flush(Sender<()>),
}

/// Task state: the sole border writer plus a counter for batch logs.
pub(crate) struct BorderTracer {
    writer: BorderWriter,
    since_flush: usize,
}

impl BorderTracer {
    pub(crate) fn new(writer: BorderWriter) -> Self {
        Self {
            writer,
            since_flush: 0,
        }
    }

    pub(crate) fn handle(&mut self, msg: BorderMsg) {
        match msg {
            BorderMsg::Check(pos) => {
                self.writer.refresh(pos);
                self.since_flush += 1;
            }
            BorderMsg::Flush(reply) => {
                if self.since_flush > 0 {
                    debug!(tiles = self.since_flush, "border batch traced");
                }
                self.since_flush = 0;
                let _ = reply.send(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use settle_core::PlayerId;
    use settle_grid::GridLayers;
    use settle_space::HexSpace;

    #[test]
    fn check_refreshes_ring() {
        let (mut layers, writers) = GridLayers::new(HexSpace::new(5, 5).unwrap());
        let mut tracer = BorderTracer::new(writers.border);
        let c = Pos::new(2, 2);
        layers.partitions_mut().change_owner(c, PlayerId(3));
        tracer.handle(BorderMsg::Check(c));
        assert!(layers.partitions().is_border(c));
        for n in layers.space().neighbours(c) {
            assert!(layers.partitions().is_border(n), "{n}");
        }
        assert!(!layers.partitions().is_border(Pos::new(0, 4)));
    }
}
