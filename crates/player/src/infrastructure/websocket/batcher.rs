//! Inbound tick batching.
//!
//! The reader task pushes every decoded frame into an unbounded queue. The
//! batcher waits for the first frame, yields to the scheduler once so frames
//! that arrived in the same tick get queued, then drains the queue into one
//! ordered batch. Frames are never reordered or dropped.

use tokio::sync::mpsc;

use crate::application::events::GameEvent;
use crate::infrastructure::message_translator::{translate_frame, InboundFrame};

pub struct FrameBatcher {
    frames: mpsc::UnboundedReceiver<InboundFrame>,
    pending: Vec<InboundFrame>,
}

impl FrameBatcher {
    pub fn new(frames: mpsc::UnboundedReceiver<InboundFrame>) -> Self {
        Self {
            frames,
            pending: Vec::new(),
        }
    }

    /// Wait for the next batch.
    ///
    /// Returns `None` once the reader has stopped and every queued frame has
    /// been delivered.
    pub async fn next_batch(&mut self) -> Option<Vec<GameEvent>> {
        if self.pending.is_empty() {
            let first = self.frames.recv().await?;
            self.pending.push(first);
        }

        tokio::task::yield_now().await;

        while let Ok(frame) = self.frames.try_recv() {
            self.pending.push(frame);
        }

        let frames = std::mem::take(&mut self.pending);
        tracing::debug!(size = frames.len(), "Inbound batch ready");
        Some(frames.into_iter().map(translate_frame).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeonsync_domain::Position;
    use dungeonsync_shared::decode_server_frame;

    fn moved(x: i32) -> InboundFrame {
        decode_server_frame(&format!(
            r#"{{"type":"player_moved","player_pos":{{"x":{x},"y":0}}}}"#
        ))
    }

    fn moved_event(x: i32) -> GameEvent {
        GameEvent::PlayerMoved {
            player_pos: Some(Position::new(x, 0)),
        }
    }

    #[tokio::test]
    async fn frames_queued_together_form_one_ordered_batch() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut batcher = FrameBatcher::new(rx);

        for x in 1..=3 {
            tx.send(moved(x)).expect("send");
        }

        let batch = batcher.next_batch().await.expect("batch");
        assert_eq!(batch, vec![moved_event(1), moved_event(2), moved_event(3)]);
    }

    #[tokio::test]
    async fn frames_sent_during_the_tick_join_the_batch() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut batcher = FrameBatcher::new(rx);

        tokio::spawn(async move {
            tx.send(moved(1)).expect("send");
            tx.send(moved(2)).expect("send");
        });

        let batch = batcher.next_batch().await.expect("batch");
        assert_eq!(batch, vec![moved_event(1), moved_event(2)]);
    }

    #[tokio::test]
    async fn malformed_frame_keeps_its_position() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut batcher = FrameBatcher::new(rx);

        tx.send(moved(1)).expect("send");
        tx.send(decode_server_frame("{broken")).expect("send");
        tx.send(moved(2)).expect("send");

        let batch = batcher.next_batch().await.expect("batch");
        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0], moved_event(1));
        assert!(matches!(batch[1], GameEvent::ParseError { .. }));
        assert_eq!(batch[2], moved_event(2));
    }

    #[tokio::test]
    async fn losing_a_select_race_keeps_the_frame() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut batcher = FrameBatcher::new(rx);

        tx.send(moved(1)).expect("send");
        let batch_won = tokio::select! {
            biased;
            _ = batcher.next_batch() => true,
            _ = std::future::ready(()) => false,
        };
        assert!(!batch_won);

        tx.send(moved(2)).expect("send");
        drop(tx);
        let batch = batcher.next_batch().await.expect("frames survive cancellation");
        assert_eq!(batch, vec![moved_event(1), moved_event(2)]);
        assert!(batcher.next_batch().await.is_none());
    }

    #[tokio::test]
    async fn later_frames_form_the_next_batch() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut batcher = FrameBatcher::new(rx);

        tx.send(moved(1)).expect("send");
        let first = batcher.next_batch().await.expect("first batch");
        assert_eq!(first, vec![moved_event(1)]);

        tx.send(moved(2)).expect("send");
        drop(tx);
        let second = batcher.next_batch().await.expect("second batch");
        assert_eq!(second, vec![moved_event(2)]);

        assert!(batcher.next_batch().await.is_none());
    }
}
