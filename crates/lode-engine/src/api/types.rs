/// Index of a slot inside an `EntityPool`. Stable for the pool's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub usize);

/// Handle to a pool registered in a `Scene`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolId(pub usize);

/// Handle to a single scene-owned entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SingleId(pub usize);

/// Handle to a running timer or tween, unique within its controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScheduleId(pub u32);
