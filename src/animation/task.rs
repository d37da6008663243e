use std::fmt;
use std::time::Duration;

use crate::animation::ease::Ease;
use crate::scene::tree::NodeId;

/// Identifier of a scheduled task, unique per scheduler and increasing in
/// insertion order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub(crate) u64);

impl TaskId {
    /// Raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

/// Identifier of a render root registered with a scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RootIndex(pub(crate) u64);

impl RootIndex {
    /// Raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Identifier of a gesture controller, allocated by the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GestureId(pub(crate) u64);

/// What a task animates; used to cancel every task on one target at once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TaskTarget {
    /// A node of the layer registered under `root`.
    Node {
        /// Layer owning the node.
        root: RootIndex,
        /// Animated node.
        node: NodeId,
    },
    /// A gesture controller's transform.
    Gesture(GestureId),
    /// Not attached to anything cancellable by target.
    #[default]
    Detached,
}

/// How many times a task plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LoopCount {
    /// Play `n` times (`0` is treated as `1`).
    Finite(u32),
    /// Play until cancelled.
    Infinite,
}

impl Default for LoopCount {
    fn default() -> Self {
        Self::Finite(1)
    }
}

/// Playback direction across loops.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Direction {
    /// Every loop runs 0 -> 1.
    #[default]
    Forward,
    /// Odd loops run 1 -> 0.
    Alternate,
}

/// Where a task is at a given elapsed time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    /// Still inside the delay.
    Waiting,
    /// Running; carries eased progress.
    Active(f64),
    /// Last loop complete; carries the terminal eased progress.
    Finished(f64),
}

/// A time-driven unit of work owned by the scheduler.
///
/// `run` receives eased progress every tick; `on_end` fires once after the
/// terminal `run` call. Cancelled tasks never fire `on_end`.
pub struct AnimationTask {
    pub(crate) target: TaskTarget,
    pub(crate) run: Box<dyn FnMut(f64)>,
    pub(crate) on_end: Option<Box<dyn FnOnce()>>,
    duration: Duration,
    delay: Duration,
    loops: LoopCount,
    direction: Direction,
    ease: Ease,
}

impl fmt::Debug for AnimationTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationTask")
            .field("target", &self.target)
            .field("duration", &self.duration)
            .field("delay", &self.delay)
            .field("loops", &self.loops)
            .field("direction", &self.direction)
            .field("ease", &self.ease)
            .finish_non_exhaustive()
    }
}

impl AnimationTask {
    /// A single forward linear play of zero duration calling `run`.
    pub fn new(run: impl FnMut(f64) + 'static) -> Self {
        Self {
            target: TaskTarget::Detached,
            run: Box::new(run),
            on_end: None,
            duration: Duration::ZERO,
            delay: Duration::ZERO,
            loops: LoopCount::default(),
            direction: Direction::default(),
            ease: Ease::default(),
        }
    }

    /// Set the cancellation target.
    pub fn target(mut self, target: TaskTarget) -> Self {
        self.target = target;
        self
    }

    /// Set the length of one loop.
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the wait before the first loop.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set the loop count.
    pub fn loops(mut self, loops: LoopCount) -> Self {
        self.loops = loops;
        self
    }

    /// Set the direction.
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set the easing curve.
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Set the completion callback.
    pub fn on_end(mut self, on_end: impl FnOnce() + 'static) -> Self {
        self.on_end = Some(Box::new(on_end));
        self
    }

    /// Cancellation target.
    pub fn task_target(&self) -> TaskTarget {
        self.target
    }

    /// Length of one loop.
    pub fn loop_duration(&self) -> Duration {
        self.duration
    }

    /// Eased progress of the final step, with direction applied.
    pub fn terminal_progress(&self) -> f64 {
        let last = match self.loops {
            LoopCount::Finite(n) => u128::from(n.max(1) - 1),
            LoopCount::Infinite => 0,
        };
        self.ease.apply(self.directed(last, 1.0))
    }

    /// Step at `elapsed` since the task started.
    pub fn step(&self, elapsed: Duration) -> Step {
        if elapsed < self.delay {
            return Step::Waiting;
        }
        if self.duration.is_zero() {
            return Step::Finished(self.terminal_progress());
        }
        let t = (elapsed - self.delay).as_nanos();
        let d = self.duration.as_nanos();
        let index = t / d;
        let raw = (t % d) as f64 / d as f64;
        match self.loops {
            LoopCount::Finite(n) if index >= u128::from(n.max(1)) => {
                Step::Finished(self.terminal_progress())
            }
            _ => Step::Active(self.ease.apply(self.directed(index, raw))),
        }
    }

    fn directed(&self, index: u128, p: f64) -> f64 {
        match self.direction {
            Direction::Alternate if index % 2 == 1 => 1.0 - p,
            _ => p,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/task.rs"]
mod tests;
