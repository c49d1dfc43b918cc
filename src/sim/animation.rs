//! Concurrent tween scheduler
//!
//! Many timed value interpolations run in the same tick window, all driven
//! by one injected frame clock. Tasks live in an arena; each owns a `from`,
//! `to`, easing curve, optional activation delay and an apply callback.
//! Cancellation is a generation watermark: `cancel_all` marks every id issued
//! so far as inert, including tasks still waiting out their delay. Ids are
//! assigned when the task is scheduled, not when its delay expires, so a
//! cancel during the delay window sticks.
//!
//! The model is single-threaded cooperative. A task's target field must have
//! no other writer while the task is active; that discipline is the caller's,
//! not enforced here.

use std::cell::Cell;
use std::rc::Rc;

use super::tween::{ConfigError, Easing};
use crate::consts::{FRAME_MS, SMOOTH_FPS};

/// Shared handle to one animatable numeric field.
///
/// The per-field record the scheduler drives; game objects hand out clones
/// to tween callbacks and read the current value when building a frame.
#[derive(Debug, Clone, Default)]
pub struct AnimValue(Rc<Cell<f32>>);

impl AnimValue {
    pub fn new(v: f32) -> Self {
        Self(Rc::new(Cell::new(v)))
    }

    #[inline]
    pub fn get(&self) -> f32 {
        self.0.get()
    }

    #[inline]
    pub fn set(&self, v: f32) {
        self.0.set(v)
    }
}

type ApplyFn = Box<dyn FnMut(f32, bool)>;

struct Task {
    id: u64,
    from: f32,
    to: f32,
    /// Total logical frames, `ceil(duration * 1000 / 17)`.
    frame_total: f32,
    /// Elapsed logical frames; starts one short of zero and never decreases.
    progress: f32,
    easing: Easing,
    /// Clock time at which the task joins the active set.
    activate_at: f64,
    /// Clock time of the previous step, once active.
    last_step: Option<f64>,
    apply: ApplyFn,
    done: bool,
}

/// Arena of concurrently running tween tasks.
#[derive(Default)]
pub struct Scheduler {
    tasks: Vec<Task>,
    next_id: u64,
    /// Watermark: every task with `id <= stopped_at` is inert.
    stopped_at: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a tween from `from` to `to` over `duration_s`, activating
    /// after `delay_s`. `apply(value, is_final)` runs once per step while
    /// active and exactly once with `is_final = true` at completion.
    ///
    /// Returns the task's generation id.
    pub fn tween(
        &mut self,
        duration_s: f32,
        from: f32,
        to: f32,
        easing: Easing,
        delay_s: f32,
        now_ms: f64,
        apply: impl FnMut(f32, bool) + 'static,
    ) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.tasks.push(Task {
            id,
            from,
            to,
            frame_total: (duration_s * 1000.0 / FRAME_MS).ceil(),
            progress: -1.0,
            easing,
            activate_at: now_ms + f64::from(delay_s) * 1000.0,
            last_step: None,
            apply: Box::new(apply),
            done: false,
        });
        id
    }

    /// Like [`tween`](Self::tween) but resolving the easing by catalogue
    /// name. An unknown name is a fatal configuration error and nothing is
    /// scheduled.
    pub fn tween_named(
        &mut self,
        duration_s: f32,
        from: f32,
        to: f32,
        easing: &str,
        delay_s: f32,
        now_ms: f64,
        apply: impl FnMut(f32, bool) + 'static,
    ) -> Result<u64, ConfigError> {
        let easing = Easing::from_name(easing)?;
        Ok(self.tween(duration_s, from, to, easing, delay_s, now_ms, apply))
    }

    /// Tween a single field from its current value to `to`.
    pub fn drive(
        &mut self,
        duration_s: f32,
        value: &AnimValue,
        to: f32,
        easing: Easing,
        delay_s: f32,
        now_ms: f64,
    ) -> u64 {
        let target = value.clone();
        self.tween(duration_s, value.get(), to, easing, delay_s, now_ms, move |v, _| {
            target.set(v)
        })
    }

    /// Tween several fields of one object in lockstep: one task per field,
    /// all sharing duration, easing and delay. `from` is sampled at schedule
    /// time. Returns the generation id of the last task.
    pub fn drive_fields(
        &mut self,
        duration_s: f32,
        fields: &[(&AnimValue, f32)],
        easing: Easing,
        delay_s: f32,
        now_ms: f64,
    ) -> u64 {
        let mut last = self.next_id;
        for (value, to) in fields {
            last = self.drive(duration_s, value, *to, easing, delay_s, now_ms);
        }
        last
    }

    /// Invalidate every task scheduled so far, delayed ones included.
    /// Forward-only: there is no un-cancel, and tasks scheduled after this
    /// call run normally.
    pub fn cancel_all(&mut self) {
        self.stopped_at = self.next_id;
    }

    /// Advance every active task against the frame clock.
    ///
    /// Progress advances by whole frames when the observed tick rate is at
    /// least [`SMOOTH_FPS`], otherwise by elapsed time in frame units, so a
    /// slow tick skips ahead instead of slowing the animation down.
    pub fn step(&mut self, now_ms: f64) {
        for task in &mut self.tasks {
            if task.done {
                continue;
            }
            if task.id <= self.stopped_at {
                task.done = true;
                continue;
            }
            if now_ms < task.activate_at {
                continue;
            }
            let Some(last) = task.last_step else {
                // Activation frame: take a clock reference, emit nothing yet
                task.last_step = Some(now_ms);
                continue;
            };
            let interval = (now_ms - last) as f32;
            if interval <= 0.0 {
                continue;
            }
            let fps = (1000.0 / interval).ceil();
            if fps >= SMOOTH_FPS {
                task.progress += 1.0;
            } else {
                task.progress += (interval / FRAME_MS).floor();
            }

            if task.progress <= task.frame_total {
                let value = task.easing.apply(
                    task.progress,
                    task.from,
                    task.to - task.from,
                    task.frame_total,
                );
                (task.apply)(value, false);
            } else {
                (task.apply)(task.to, true);
                task.done = true;
            }
            task.last_step = Some(now_ms);
        }
        self.tasks.retain(|t| !t.done);
    }

    /// Number of tasks currently in the active set (activated, not retired,
    /// not behind the watermark). Tasks waiting out a delay do not count.
    pub fn active_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| !t.done && t.id > self.stopped_at && t.last_step.is_some())
            .count()
    }

    /// Total tasks still held in the arena, delayed ones included.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Step the scheduler at a simulated 60 Hz for `seconds`.
    fn run_60hz(sched: &mut Scheduler, start_ms: f64, seconds: f64) -> f64 {
        let dt = 1000.0 / 60.0;
        let steps = (seconds * 60.0).ceil() as usize;
        let mut now = start_ms;
        for _ in 0..steps {
            now += dt;
            sched.step(now);
        }
        now
    }

    #[test]
    fn test_linear_tween_completes_once() {
        let mut sched = Scheduler::new();
        let seen: Rc<RefCell<Vec<(f32, bool)>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        sched.tween(1.0, 0.0, 10.0, Easing::Linear, 0.0, 0.0, move |v, fin| {
            sink.borrow_mut().push((v, fin));
        });
        run_60hz(&mut sched, 0.0, 1.2);

        let seen = seen.borrow();
        let finals: Vec<_> = seen.iter().filter(|(_, fin)| *fin).collect();
        assert_eq!(finals.len(), 1);
        assert_eq!(finals[0].0, 10.0);
        assert_eq!(seen.last().unwrap(), &(10.0, true));
        // Intermediate values approach 10 monotonically
        for pair in seen.windows(2) {
            assert!(pair[1].0 >= pair[0].0);
        }
        assert!(sched.is_empty());
    }

    #[test]
    fn test_drive_writes_field() {
        let mut sched = Scheduler::new();
        let v = AnimValue::new(2.0);
        sched.drive(0.5, &v, 4.0, Easing::Linear, 0.0, 0.0);
        run_60hz(&mut sched, 0.0, 0.3);
        let mid = v.get();
        assert!(mid > 2.0 && mid < 4.0, "mid = {mid}");
        run_60hz(&mut sched, 300.0, 0.4);
        assert_eq!(v.get(), 4.0);
    }

    #[test]
    fn test_delay_defers_activation() {
        let mut sched = Scheduler::new();
        let v = AnimValue::new(0.0);
        sched.drive(0.2, &v, 1.0, Easing::Linear, 0.5, 0.0);

        // During the delay the task is not in the active set
        sched.step(100.0);
        assert_eq!(sched.active_count(), 0);
        assert_eq!(v.get(), 0.0);

        sched.step(510.0);
        assert_eq!(sched.active_count(), 1);
    }

    #[test]
    fn test_cancel_all_stops_running_tasks() {
        let mut sched = Scheduler::new();
        let v = AnimValue::new(0.0);
        sched.drive(1.0, &v, 10.0, Easing::Linear, 0.0, 0.0);
        run_60hz(&mut sched, 0.0, 0.25);
        let frozen = v.get();
        assert!(frozen > 0.0);

        sched.cancel_all();
        run_60hz(&mut sched, 250.0, 1.0);
        assert_eq!(v.get(), frozen);
    }

    #[test]
    fn test_cancel_all_covers_delayed_tasks() {
        let mut sched = Scheduler::new();
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        sched.tween(0.1, 0.0, 1.0, Easing::Linear, 0.3, 0.0, move |_, _| {
            flag.set(true);
        });

        // Cancel while the delay timer is still pending
        sched.cancel_all();
        run_60hz(&mut sched, 0.0, 1.0);
        assert!(!fired.get());
        assert!(sched.is_empty());
    }

    #[test]
    fn test_tasks_after_cancel_run_normally() {
        let mut sched = Scheduler::new();
        sched.cancel_all();
        let v = AnimValue::new(0.0);
        sched.drive(0.2, &v, 5.0, Easing::Linear, 0.0, 0.0);
        run_60hz(&mut sched, 0.0, 0.5);
        assert_eq!(v.get(), 5.0);
    }

    #[test]
    fn test_slow_ticks_advance_fractionally() {
        // 10 Hz stepping: 100 ms intervals are below the whole-frame rate,
        // so progress jumps by floor(100/17) = 5 frames per step
        let mut sched = Scheduler::new();
        let v = AnimValue::new(0.0);
        sched.drive(1.0, &v, 10.0, Easing::Linear, 0.0, 0.0);

        let mut now = 0.0;
        for _ in 0..14 {
            now += 100.0;
            sched.step(now);
        }
        // 1.3 s of wall time has to finish a 1 s tween
        assert_eq!(v.get(), 10.0);
        assert!(sched.is_empty());
    }

    #[test]
    fn test_progress_never_decreases() {
        let mut sched = Scheduler::new();
        let seen: Rc<RefCell<Vec<f32>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        sched.tween(0.5, 0.0, 30.0, Easing::Linear, 0.0, 0.0, move |v, _| {
            sink.borrow_mut().push(v);
        });

        // Alternate fast and slow intervals
        let times = [16.0, 32.0, 132.0, 148.0, 248.0, 264.0, 364.0, 380.0, 480.0, 580.0];
        for t in times {
            sched.step(t);
        }
        let seen = seen.borrow();
        for pair in seen.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
    }

    #[test]
    fn test_drive_fields_shares_parameters() {
        let mut sched = Scheduler::new();
        let x = AnimValue::new(0.0);
        let y = AnimValue::new(10.0);
        sched.drive_fields(0.5, &[(&x, 8.0), (&y, 0.0)], Easing::Linear, 0.0, 0.0);
        run_60hz(&mut sched, 0.0, 0.8);
        assert_eq!(x.get(), 8.0);
        assert_eq!(y.get(), 0.0);
    }

    #[test]
    fn test_unknown_easing_schedules_nothing() {
        let mut sched = Scheduler::new();
        let err = sched.tween_named(1.0, 0.0, 1.0, "Bounce.easeIn", 0.0, 0.0, |_, _| {});
        assert!(err.is_err());
        assert!(sched.is_empty());
    }
}
