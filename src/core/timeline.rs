use std::sync::{Arc, Condvar, Mutex};

/// CPU/GPU frame timeline.
///
/// Tracks two counters over the same frame-index space: `next`, the index the
/// next submission will take, and a completion watermark advanced by the GPU
/// (via submission callbacks) as frames finish. Frame indices start at 0 and
/// increase by exactly 1 per rendered frame, never reset across resizes.
///
/// Admission backpressure: before reusing ring slot `f mod depth`, the
/// orchestrator waits for frame `f - depth` (the frame that last used that
/// slot). [`FrameTimeline::reuse_target`] returns `None` for the first
/// `depth` frames, so they never block — guaranteed by checked arithmetic,
/// not by counter wraparound.
pub struct FrameTimeline {
    depth: u64,
    next: u64,
    shared: Arc<TimelineShared>,
}

#[derive(Debug)]
struct TimelineShared {
    /// Highest frame index the GPU has reported complete. `None` until the
    /// first signal arrives.
    completed: Mutex<Option<u64>>,
    signaled: Condvar,
}

impl TimelineShared {
    fn signal(&self, frame: u64) {
        let mut completed = self.completed.lock().unwrap();
        // Signals are monotonic: a late or out-of-order signal never moves
        // the watermark backwards.
        if completed.is_none_or(|c| c < frame) {
            *completed = Some(frame);
            self.signaled.notify_all();
        }
    }
}

impl FrameTimeline {
    pub fn new(depth: usize) -> Self {
        assert!(depth >= 1, "frame timeline needs at least one slot");
        Self {
            depth: depth as u64,
            next: 0,
            shared: Arc::new(TimelineShared {
                completed: Mutex::new(None),
                signaled: Condvar::new(),
            }),
        }
    }

    pub fn depth(&self) -> u64 {
        self.depth
    }

    /// Claim the index for the next submission. Called exactly once per
    /// rendered frame, before recording that frame's commands.
    pub fn advance(&mut self) -> u64 {
        let frame = self.next;
        self.next += 1;
        frame
    }

    /// Index of the most recently admitted frame, i.e. the drain target.
    pub fn last_admitted(&self) -> Option<u64> {
        self.next.checked_sub(1)
    }

    /// The frame that must have completed before `frame` may reuse its ring
    /// slot. `None` means the slot has never been submitted from and the
    /// admission is free of charge.
    pub fn reuse_target(&self, frame: u64) -> Option<u64> {
        frame.checked_sub(self.depth)
    }

    /// Record that the GPU has finished executing `frame` and everything
    /// submitted before it.
    pub fn signal(&self, frame: u64) {
        self.shared.signal(frame);
    }

    /// A `'static + Send` closure recording completion of `frame`, suitable
    /// for `wgpu::Queue::on_submitted_work_done`.
    pub fn signaler(&self, frame: u64) -> impl FnOnce() + Send + 'static {
        let shared = Arc::clone(&self.shared);
        move || shared.signal(frame)
    }

    /// Whether the completion watermark has reached `frame`.
    pub fn is_complete(&self, frame: u64) -> bool {
        self.shared
            .completed
            .lock()
            .unwrap()
            .is_some_and(|c| c >= frame)
    }

    /// Block until the completion watermark reaches `frame`. Returns
    /// immediately if it already has. This is a condvar wait, woken by
    /// whichever thread delivers the completion signal.
    pub fn wait_for(&self, frame: u64) {
        let mut completed = self.shared.completed.lock().unwrap();
        while completed.is_none_or(|c| c < frame) {
            completed = self.shared.signaled.wait(completed).unwrap();
        }
    }
}

impl std::fmt::Debug for FrameTimeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameTimeline")
            .field("depth", &self.depth)
            .field("next", &self.next)
            .field("completed", &*self.shared.completed.lock().unwrap())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn advance_increments_by_exactly_one() {
        let mut timeline = FrameTimeline::new(2);
        for expected in 0..100u64 {
            assert_eq!(timeline.advance(), expected);
        }
    }

    #[test]
    fn first_depth_frames_have_no_reuse_target() {
        let timeline = FrameTimeline::new(3);
        assert_eq!(timeline.reuse_target(0), None);
        assert_eq!(timeline.reuse_target(1), None);
        assert_eq!(timeline.reuse_target(2), None);
        assert_eq!(timeline.reuse_target(3), Some(0));
        assert_eq!(timeline.reuse_target(10), Some(7));
    }

    #[test]
    fn signals_are_monotonic() {
        let timeline = FrameTimeline::new(2);
        timeline.signal(5);
        assert!(timeline.is_complete(5));

        // A straggler signal for an earlier frame must not regress.
        timeline.signal(3);
        assert!(timeline.is_complete(5));
    }

    #[test]
    fn wait_for_completed_frame_returns_immediately() {
        let timeline = FrameTimeline::new(2);
        timeline.signal(7);
        timeline.wait_for(7);
        timeline.wait_for(7); // idempotent
        timeline.wait_for(0); // waiting for 7 also covers everything below it
    }

    #[test]
    fn wait_for_blocks_until_signaled() {
        let mut timeline = FrameTimeline::new(2);

        // Frames 0 and 1 admit without waiting.
        let f0 = timeline.advance();
        assert_eq!(timeline.reuse_target(f0), None);
        let f1 = timeline.advance();
        assert_eq!(timeline.reuse_target(f1), None);

        // Frame 2 must wait for frame 0.
        let f2 = timeline.advance();
        let target = timeline.reuse_target(f2).expect("frame 2 reuses slot 0");
        assert_eq!(target, 0);
        assert!(!timeline.is_complete(target));

        let signal = timeline.signaler(target);
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            signal();
        });

        timeline.wait_for(target);
        assert!(timeline.is_complete(target));
        handle.join().unwrap();
    }

    #[test]
    fn last_admitted_tracks_submissions() {
        let mut timeline = FrameTimeline::new(2);
        assert_eq!(timeline.last_admitted(), None);
        timeline.advance();
        assert_eq!(timeline.last_admitted(), Some(0));
        timeline.advance();
        timeline.advance();
        assert_eq!(timeline.last_admitted(), Some(2));
    }

    #[test]
    fn numbering_is_continuous_across_a_drain() {
        // Resize drains the timeline but must not reset it: frame 57 is
        // followed by frame 58.
        let mut timeline = FrameTimeline::new(2);
        for _ in 0..58 {
            let f = timeline.advance();
            timeline.signal(f);
        }
        assert_eq!(timeline.last_admitted(), Some(57));
        timeline.wait_for(57); // the drain
        assert_eq!(timeline.advance(), 58);
    }
}
