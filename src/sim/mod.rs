//! Match simulation module
//!
//! All gameplay logic lives here, with no rendering or platform dependencies:
//! - Fixed step per tick (no frame-time scaling)
//! - Seeded RNG only
//! - Stable iteration order (by target ID)
//! - Timers driven by an explicit scheduler, never by the platform

pub mod autopilot;
pub mod controller;
pub mod hit;
pub mod schedule;
pub mod state;
pub mod target;
pub mod tick;

pub use autopilot::{Autopilot, aim_at_nearest};
pub use controller::{GameEvent, InputEvent, MatchController, Presenter};
pub use hit::{Ray, RayHit, nearest_hit, ray_sphere};
pub use schedule::{Scheduler, TimerKind};
pub use state::{MatchPhase, MatchState, MatchSummary, Outcome};
pub use target::{Advance, Target, TargetId};
pub use tick::{FrameResult, tick_targets};
