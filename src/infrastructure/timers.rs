use crate::domain::investment::Timer;
use futures::FutureExt;
use futures::future::{self, LocalBoxFuture};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Browser timer backed by `setTimeout`
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTimer;

impl Timer for GlooTimer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        gloo_timers::future::sleep(duration).boxed_local()
    }
}

/// Resolves every sleep at once and remembers what was asked for
#[derive(Debug, Clone, Default)]
pub struct ImmediateTimer {
    requested: Rc<RefCell<Vec<Duration>>>,
}

impl ImmediateTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every duration passed to `sleep`, in call order
    pub fn requested(&self) -> Vec<Duration> {
        self.requested.borrow().clone()
    }
}

impl Timer for ImmediateTimer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        self.requested.borrow_mut().push(duration);
        future::ready(()).boxed_local()
    }
}

/// Never resolves. Lets a test hold settlement in Processing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PendingTimer;

impl Timer for PendingTimer {
    fn sleep(&self, _duration: Duration) -> LocalBoxFuture<'static, ()> {
        future::pending().boxed_local()
    }
}
