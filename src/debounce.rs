use log::warn;
use std::{
    cell::RefCell,
    fmt,
    rc::Rc,
};
use wasm_bindgen::{JsCast, closure::Closure};

pub type Task = Box<dyn FnOnce()>;

///
/// Timer
/// one-shot scheduling on the host's event loop
///

pub trait Timer {
    type Handle;

    fn schedule(&self, delay_ms: u32, task: Task) -> Self::Handle;

    fn cancel(&self, handle: Self::Handle);
}

///
/// Debouncer
///
/// Every `trigger` cancels the pending run and schedules a new one, so the
/// action runs once per burst, `delay_ms` after the last trigger.
///

pub struct Debouncer<T: Timer> {
    timer: T,
    delay_ms: u32,
    action: Rc<dyn Fn()>,
    pending: Rc<RefCell<Option<T::Handle>>>,
}

pub fn debounce<T, F>(timer: T, action: F, delay_ms: u32) -> Debouncer<T>
where
    T: Timer,
    T::Handle: 'static,
    F: Fn() + 'static,
{
    Debouncer {
        timer,
        delay_ms,
        action: Rc::new(action),
        pending: Rc::new(RefCell::new(None)),
    }
}

impl<T> Debouncer<T>
where
    T: Timer,
    T::Handle: 'static,
{
    pub fn trigger(&self) {
        self.cancel();

        let action = Rc::clone(&self.action);
        let pending = Rc::clone(&self.pending);
        let handle = self.timer.schedule(
            self.delay_ms,
            Box::new(move || {
                pending.borrow_mut().take();
                action();
            }),
        );

        *self.pending.borrow_mut() = Some(handle);
    }

    /// Drops the pending run, if any.
    pub fn cancel(&self) {
        let pending = self.pending.borrow_mut().take();
        if let Some(handle) = pending {
            self.timer.cancel(handle);
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.borrow().is_some()
    }

    #[must_use]
    pub const fn delay_ms(&self) -> u32 {
        self.delay_ms
    }
}

impl<T: Timer> fmt::Debug for Debouncer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay_ms", &self.delay_ms)
            .finish_non_exhaustive()
    }
}

///
/// BrowserTimer
/// `setTimeout` / `clearTimeout` on the window
///
/// The handle owns the JS callback; dropping it after `clearTimeout` frees
/// a cancelled run's closure.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTimer;

impl Timer for BrowserTimer {
    type Handle = Option<(i32, Closure<dyn FnMut()>)>;

    fn schedule(&self, delay_ms: u32, task: Task) -> Self::Handle {
        let window = web_sys::window()?;
        let callback = Closure::once(task);
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);

        let id = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                delay,
            )
            .map_err(|err| warn!("setTimeout failed: {err:?}"))
            .ok()?;

        Some((id, callback))
    }

    fn cancel(&self, handle: Self::Handle) {
        if let (Some(window), Some((id, callback))) = (web_sys::window(), handle) {
            window.clear_timeout_with_handle(id);
            drop(callback);
        }
    }
}

///
/// ManualTimer
/// virtual clock; tasks run only when `advance` passes their due time
///

#[derive(Clone, Default)]
pub struct ManualTimer {
    state: Rc<RefCell<ManualState>>,
}

#[derive(Default)]
struct ManualState {
    now: u64,
    next_id: u64,
    queue: Vec<(u64, u64, Task)>,
}

impl ManualTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn now(&self) -> u64 {
        self.state.borrow().now
    }

    #[must_use]
    pub fn scheduled(&self) -> usize {
        self.state.borrow().queue.len()
    }

    /// Moves time forward, running due tasks in due order.
    pub fn advance(&self, ms: u64) {
        let target = self.state.borrow().now + ms;

        loop {
            let next = {
                let mut state = self.state.borrow_mut();
                let due = state
                    .queue
                    .iter()
                    .enumerate()
                    .filter(|(_, (_, at, _))| *at <= target)
                    .min_by_key(|(_, (id, at, _))| (*at, *id))
                    .map(|(i, _)| i);

                due.map(|i| {
                    let (_, at, task) = state.queue.remove(i);
                    state.now = at;
                    task
                })
            };

            // run outside the borrow: tasks may schedule or cancel
            match next {
                Some(task) => task(),
                None => break,
            }
        }

        self.state.borrow_mut().now = target;
    }
}

impl Timer for ManualTimer {
    type Handle = u64;

    fn schedule(&self, delay_ms: u32, task: Task) -> u64 {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        let at = state.now + u64::from(delay_ms);
        state.queue.push((id, at, task));

        id
    }

    fn cancel(&self, handle: u64) {
        self.state
            .borrow_mut()
            .queue
            .retain(|(id, _, _)| *id != handle);
    }
}
