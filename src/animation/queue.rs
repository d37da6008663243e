//! Frame-driven task scheduler and render-root registry.
//!
//! The scheduler owns the active task set and a registry of render roots. All
//! mutation that can happen while a tick is running (adding tasks, cancelling,
//! marking roots dirty) goes through a cloneable [`SchedulerHandle`] backed by
//! interior-mutable shared state, so task callbacks and node mutations may call
//! back into the scheduler freely.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::mem;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::animation::task::{AnimationTask, GestureId, RootIndex, Step, TaskId, TaskTarget};
use crate::foundation::error::{CanopyError, CanopyResult};

/// A rendering surface flushed by the scheduler when marked dirty.
pub trait RenderRoot {
    /// Bring the surface up to date. Must be idempotent when nothing changed.
    fn execute(&self) -> CanopyResult<()>;
}

#[derive(Default)]
struct Shared {
    next_task_id: Cell<u64>,
    next_root_index: Cell<u64>,
    next_gesture_id: Cell<u64>,
    incoming: RefCell<Vec<(TaskId, AnimationTask)>>,
    cancelled: RefCell<HashSet<TaskId>>,
    cancelled_targets: RefCell<HashSet<TaskTarget>>,
    roots: RefCell<BTreeMap<RootIndex, Weak<dyn RenderRoot>>>,
    dirty_roots: RefCell<BTreeSet<RootIndex>>,
}

/// Cloneable, shared access to a [`Scheduler`] for nodes, layers, tasks and
/// gesture controllers.
#[derive(Clone, Default)]
pub struct SchedulerHandle {
    shared: Rc<Shared>,
}

impl std::fmt::Debug for SchedulerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerHandle")
            .field("pending", &self.shared.incoming.borrow().len())
            .field("roots", &self.shared.roots.borrow().len())
            .finish()
    }
}

impl SchedulerHandle {
    /// Queue a task. It starts on the next tick.
    ///
    /// A zero-duration task runs its terminal step and `on_end` immediately
    /// and never enters the active set.
    pub fn add_task(&self, mut task: AnimationTask) -> TaskId {
        let id = TaskId(bump(&self.shared.next_task_id));
        if task.loop_duration().is_zero() {
            tracing::trace!(%id, "zero-duration task runs immediately");
            let p = task.terminal_progress();
            (task.run)(p);
            if let Some(on_end) = task.on_end.take() {
                on_end();
            }
            return id;
        }
        tracing::trace!(%id, target = ?task.target, "task queued");
        self.shared.incoming.borrow_mut().push((id, task));
        id
    }

    /// Cancel a task. Stale or finished ids are a no-op.
    pub fn cancel(&self, id: TaskId) {
        let mut incoming = self.shared.incoming.borrow_mut();
        if let Some(pos) = incoming.iter().position(|(i, _)| *i == id) {
            incoming.remove(pos);
            tracing::debug!(%id, "task cancelled before start");
            return;
        }
        drop(incoming);
        if id.0 >= self.shared.next_task_id.get() {
            let err = CanopyError::StaleTaskReference(id.0);
            tracing::trace!(%err, "ignoring cancel");
            return;
        }
        self.shared.cancelled.borrow_mut().insert(id);
    }

    /// Cancel every queued or running task on `target`.
    pub fn cancel_target(&self, target: TaskTarget) {
        if target == TaskTarget::Detached {
            return;
        }
        self.shared
            .incoming
            .borrow_mut()
            .retain(|(_, t)| t.target != target);
        self.shared.cancelled_targets.borrow_mut().insert(target);
    }

    /// Register a render root. The scheduler holds it weakly.
    pub fn register_root(&self, root: &Rc<dyn RenderRoot>) -> RootIndex {
        let index = self.allocate_root_index();
        self.attach_root(index, Rc::downgrade(root));
        index
    }

    pub(crate) fn allocate_root_index(&self) -> RootIndex {
        RootIndex(bump(&self.shared.next_root_index))
    }

    pub(crate) fn allocate_gesture_id(&self) -> GestureId {
        GestureId(bump(&self.shared.next_gesture_id))
    }

    pub(crate) fn attach_root(&self, index: RootIndex, root: Weak<dyn RenderRoot>) {
        tracing::debug!(root = index.0, "render root registered");
        self.shared.roots.borrow_mut().insert(index, root);
    }

    /// Remove a render root; pending dirty marks for it are dropped.
    pub fn unregister_root(&self, index: RootIndex) {
        if self.shared.roots.borrow_mut().remove(&index).is_some() {
            tracing::debug!(root = index.0, "render root unregistered");
        }
        self.shared.dirty_roots.borrow_mut().remove(&index);
    }

    /// Whether `index` is currently registered.
    pub fn is_registered(&self, index: RootIndex) -> bool {
        self.shared.roots.borrow().contains_key(&index)
    }

    /// Schedule `index` for execution on the next flush. Repeated marks coalesce.
    pub fn mark_dirty(&self, index: RootIndex) {
        self.shared.dirty_roots.borrow_mut().insert(index);
    }

    /// Whether `index` is waiting for a flush.
    pub fn is_dirty(&self, index: RootIndex) -> bool {
        self.shared.dirty_roots.borrow().contains(&index)
    }

    /// Execute every dirty root once. Returns how many roots executed.
    ///
    /// A root that fails is logged and skipped; the others still run.
    #[tracing::instrument(skip(self))]
    pub fn flush(&self) -> usize {
        let dirty = mem::take(&mut *self.shared.dirty_roots.borrow_mut());
        let mut executed = 0;
        for index in dirty {
            let root = self.shared.roots.borrow().get(&index).map(Weak::upgrade);
            match root {
                Some(Some(root)) => {
                    executed += 1;
                    if let Err(err) = root.execute() {
                        tracing::warn!(root = index.0, %err, "render root failed to execute");
                    }
                }
                Some(None) => {
                    tracing::debug!(root = index.0, "dropping dead render root");
                    self.shared.roots.borrow_mut().remove(&index);
                }
                None => tracing::trace!(root = index.0, "dirty mark for unregistered root"),
            }
        }
        executed
    }
}

fn bump(counter: &Cell<u64>) -> u64 {
    let v = counter.get();
    counter.set(v + 1);
    v
}

struct ActiveTask {
    task: AnimationTask,
    start: Option<Duration>,
}

/// Owner of the active task set. Drive it with [`Scheduler::tick`].
#[derive(Default)]
pub struct Scheduler {
    handle: SchedulerHandle,
    active: BTreeMap<TaskId, ActiveTask>,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("active", &self.active.len())
            .field("handle", &self.handle)
            .finish()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        // Queued closures may hold layers that hold this handle.
        self.handle.shared.incoming.borrow_mut().clear();
    }
}

impl Scheduler {
    /// Empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle for enqueuing work from anywhere.
    pub fn handle(&self) -> SchedulerHandle {
        self.handle.clone()
    }

    /// See [`SchedulerHandle::add_task`].
    pub fn add_task(&self, task: AnimationTask) -> TaskId {
        self.handle.add_task(task)
    }

    /// See [`SchedulerHandle::cancel`].
    pub fn cancel(&self, id: TaskId) {
        self.handle.cancel(id);
    }

    /// See [`SchedulerHandle::cancel_target`].
    pub fn cancel_target(&self, target: TaskTarget) {
        self.handle.cancel_target(target);
    }

    /// See [`SchedulerHandle::register_root`].
    pub fn register_root(&self, root: &Rc<dyn RenderRoot>) -> RootIndex {
        self.handle.register_root(root)
    }

    /// See [`SchedulerHandle::unregister_root`].
    pub fn unregister_root(&self, index: RootIndex) {
        self.handle.unregister_root(index);
    }

    /// See [`SchedulerHandle::mark_dirty`].
    pub fn mark_dirty(&self, index: RootIndex) {
        self.handle.mark_dirty(index);
    }

    /// See [`SchedulerHandle::flush`].
    pub fn flush(&self) -> usize {
        self.handle.flush()
    }

    /// Whether `id` is queued or running and not cancelled.
    pub fn is_active(&self, id: TaskId) -> bool {
        let shared = &self.handle.shared;
        if shared.incoming.borrow().iter().any(|(i, _)| *i == id) {
            return true;
        }
        self.active.get(&id).is_some_and(|a| !self.is_cancelled(id, a.task.target))
    }

    /// Number of queued and running tasks.
    pub fn active_count(&self) -> usize {
        let running = self
            .active
            .iter()
            .filter(|(id, a)| !self.is_cancelled(**id, a.task.target))
            .count();
        running + self.handle.shared.incoming.borrow().len()
    }

    fn is_cancelled(&self, id: TaskId, target: TaskTarget) -> bool {
        let shared = &self.handle.shared;
        shared.cancelled.borrow().contains(&id)
            || shared.cancelled_targets.borrow().contains(&target)
    }

    /// Advance every task to `now`, then flush dirty roots.
    ///
    /// Tasks run in id order. Tasks queued during this tick start on the next
    /// one. Returns how many roots executed.
    #[tracing::instrument(skip(self), fields(active = self.active.len()))]
    pub fn tick(&mut self, now: Duration) -> usize {
        self.apply_cancellations();
        for (id, task) in self.handle.shared.incoming.borrow_mut().drain(..) {
            self.active.insert(id, ActiveTask { task, start: None });
        }

        let ids: Vec<TaskId> = self.active.keys().copied().collect();
        for id in ids {
            let Some(target) = self.active.get(&id).map(|a| a.task.target) else {
                continue;
            };
            if self.is_cancelled(id, target) {
                self.active.remove(&id);
                tracing::debug!(%id, "task cancelled");
                continue;
            }
            let Some(entry) = self.active.get_mut(&id) else {
                continue;
            };
            let start = *entry.start.get_or_insert(now);
            match entry.task.step(now.saturating_sub(start)) {
                Step::Waiting => {}
                Step::Active(p) => {
                    tracing::trace!(%id, p, "task step");
                    (entry.task.run)(p);
                }
                Step::Finished(p) => {
                    (entry.task.run)(p);
                    if let Some(mut done) = self.active.remove(&id)
                        && let Some(on_end) = done.task.on_end.take()
                    {
                        on_end();
                    }
                    tracing::debug!(%id, "task finished");
                }
            }
        }

        self.handle.flush()
    }

    fn apply_cancellations(&mut self) {
        let shared = &self.handle.shared;
        let ids = mem::take(&mut *shared.cancelled.borrow_mut());
        let targets = mem::take(&mut *shared.cancelled_targets.borrow_mut());
        if ids.is_empty() && targets.is_empty() {
            return;
        }
        self.active.retain(|id, a| {
            let keep = !ids.contains(id) && !targets.contains(&a.task.target);
            if !keep {
                tracing::debug!(%id, "task cancelled");
            }
            keep
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/queue.rs"]
mod tests;
