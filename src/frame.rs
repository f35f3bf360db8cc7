//! Frame-request seam
//!
//! In the browser a frame is requested with `requestAnimationFrame` and
//! released with `cancelAnimationFrame`. The engine only ever holds one
//! pending handle and talks to the host through [`FrameScheduler`].

/// Opaque id of a pending frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Host side of the frame loop
pub trait FrameScheduler {
    /// Ask the host to call back on the next frame
    fn request_frame(&mut self) -> FrameHandle;
    /// Release a pending request
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Scheduler for hosts that pump frames themselves (tests, headless runs)
#[derive(Debug, Default, Clone)]
pub struct ManualScheduler {
    next_id: u64,
    pending: Option<FrameHandle>,
    requested: u64,
    cancelled: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The request the host still owes a callback for
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn requested(&self) -> u64 {
        self.requested
    }

    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        self.requested += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
            self.cancelled += 1;
        }
    }
}
