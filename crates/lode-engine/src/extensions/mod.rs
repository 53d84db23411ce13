// extensions/mod.rs
//
// Schedulers and easing. Decoupled from Scene: callbacks get whatever context
// the owner passes to `tick`.

pub mod easing;
pub mod timer;
pub mod tween;

pub use easing::{ease, lerp, lerp_vec2, Easing};
pub use timer::{Timer, TimerController, TimerState};
pub use tween::{Tween, TweenController, TweenDirection, TweenState};
