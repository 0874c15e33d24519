//! Non-blocking bakes for interactive hosts.
//!
//! A bake runs on rayon's pool and the result comes back through a
//! single-slot channel. The host polls once per frame. Dropping or
//! cancelling the baker only discards the result: a bake already handed to
//! rayon still runs to completion on the pool.
//!
//! ```text
//!   host frame N      start(request) ──► rayon::spawn ──► generate_timed
//!   host frame N+1    poll_results() → None                   │
//!   host frame N+k    poll_results() → Some(BakeResult) ◄─────┘
//! ```

use crossbeam_channel::{self as channel, Receiver, TryRecvError};

use crate::bake::{generate_timed, BakeOutput};
use crate::config::BakeConfig;
use crate::error::SdfError;
use crate::mesh::TriangleMesh;
use crate::types::BoundingBox;

/// Owned inputs for a background bake.
#[derive(Clone, Debug)]
pub struct BakeRequest {
  /// Caller-chosen tag echoed in the result.
  pub id: u64,
  pub mesh: TriangleMesh,
  pub bounds: BoundingBox,
  pub dims: [usize; 3],
  pub config: BakeConfig,
}

impl BakeRequest {
  /// Request over the mesh's own scaled bounds at `resolution³`.
  pub fn around_mesh(id: u64, mesh: TriangleMesh, resolution: usize, config: BakeConfig) -> Self {
    let bounds = BoundingBox::around_mesh_default(mesh.bounds());
    Self {
      id,
      mesh,
      bounds,
      dims: [resolution; 3],
      config,
    }
  }
}

/// Completed background bake.
#[derive(Debug)]
pub struct BakeResult {
  pub id: u64,
  pub output: Result<BakeOutput, SdfError>,
}

/// One bake in flight at a time.
pub struct AsyncBaker {
  receiver: Option<Receiver<BakeResult>>,
}

impl AsyncBaker {
  pub fn new() -> Self {
    Self { receiver: None }
  }

  pub fn is_busy(&self) -> bool {
    self.receiver.is_some()
  }

  /// Start a bake. Returns `false` (and drops `request`) if busy.
  pub fn start(&mut self, request: BakeRequest) -> bool {
    if self.is_busy() {
      return false;
    }

    let (sender, receiver) = channel::bounded(1);
    self.receiver = Some(receiver);

    rayon::spawn(move || {
      let result = run_request(request);
      // Receiver dropped = cancelled.
      let _ = sender.send(result);
    });

    true
  }

  /// Result if the bake has finished, without blocking.
  pub fn poll_results(&mut self) -> Option<BakeResult> {
    let receiver = self.receiver.as_ref()?;

    match receiver.try_recv() {
      Ok(result) => {
        self.receiver = None;
        Some(result)
      }
      Err(TryRecvError::Empty) => None,
      Err(TryRecvError::Disconnected) => {
        self.receiver = None;
        None
      }
    }
  }

  /// Block until the pending bake finishes. `None` if idle.
  pub fn wait(&mut self) -> Option<BakeResult> {
    let receiver = self.receiver.take()?;
    receiver.recv().ok()
  }

  /// Forget the pending bake and free the slot for a new one.
  ///
  /// The running job is not interrupted; it keeps its pool thread until it
  /// finishes, and its result is discarded when it arrives.
  pub fn cancel(&mut self) {
    self.receiver = None;
  }
}

impl Default for AsyncBaker {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "bake::background", fields(id = request.id)))]
fn run_request(request: BakeRequest) -> BakeResult {
  let BakeRequest {
    id,
    mesh,
    bounds,
    dims,
    config,
  } = request;

  BakeResult {
    id,
    output: generate_timed(mesh.view(), &bounds, dims, &config),
  }
}
