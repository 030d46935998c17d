use roverkin_core::Scalar;
use roverkin_terrain::Terrain;
use thiserror::Error;
use tracing::{info, warn};

use crate::{Rover, Snapshot};

/// Errors raised while acquiring render resources.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The window, canvas or GPU surface could not be obtained.
    #[error("render surface unavailable: {0}")]
    SurfaceUnavailable(String),
}

/// Render adapter: the only owner of scene-graph or framebuffer handles.
pub trait RenderSink {
    /// Translate one snapshot into visuals.
    fn present(&mut self, snap: &Snapshot);
    /// Drop whatever was acquired. Called at most once by [`Session`].
    fn release(&mut self);
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum SessionState { Running, Inactive, TornDown }

/// Drives a rover and a render sink, one tick per display refresh.
pub struct Session<T: Terrain, S: RenderSink> {
    rover: Rover<T>,
    sink: Option<S>,
    state: SessionState,
}

impl<T: Terrain, S: RenderSink> Session<T, S> {
    /// Acquire the sink. If that fails, the session starts inactive and every
    /// tick is a no-op; nothing is thrown to the caller.
    pub fn start<F>(rover: Rover<T>, acquire: F) -> Self
    where
        F: FnOnce(&Rover<T>) -> Result<S, SessionError>,
    {
        match acquire(&rover) {
            Ok(sink) => {
                info!("render session started");
                Self { rover, sink: Some(sink), state: SessionState::Running }
            }
            Err(e) => {
                warn!(error = %e, "render session inactive");
                Self { rover, sink: None, state: SessionState::Inactive }
            }
        }
    }

    /// Advance and present. `None` once inactive or torn down.
    pub fn tick(&mut self, dt: Scalar) -> Option<Snapshot> {
        if self.state != SessionState::Running { return None; }
        let sink = self.sink.as_mut()?;
        let snap = self.rover.advance(dt);
        sink.present(&snap);
        Some(snap)
    }

    /// Release the sink and stop ticking. Safe to call any number of times.
    pub fn teardown(&mut self) {
        if let Some(mut sink) = self.sink.take() {
            sink.release();
            info!(tick = self.rover.tick(), "render session torn down");
        }
        self.state = SessionState::TornDown;
    }

    pub fn is_running(&self) -> bool { self.state == SessionState::Running }
    pub fn rover(&self) -> &Rover<T> { &self.rover }
    pub fn sink_mut(&mut self) -> Option<&mut S> { self.sink.as_mut() }
}

impl<T: Terrain, S: RenderSink> Drop for Session<T, S> {
    fn drop(&mut self) { self.teardown(); }
}
