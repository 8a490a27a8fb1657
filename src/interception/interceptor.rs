//! Event tap lifecycle gated on accessibility permission

use super::GestureEngine;
use crate::error::CoreError;
use crate::permissions::{GateStatus, PermissionGate};
use log::{info, warn};
use std::cell::{Ref, RefCell};
use std::rc::{Rc, Weak};

/// A live event tap together with its run loop registration
pub trait TapHandle {
    /// Disable the tap and release it; no callback runs afterwards
    fn remove(self: Box<Self>);
}

/// Creates an event tap that feeds `engine`
pub trait HookInstaller {
    fn install(
        &mut self,
        engine: Rc<RefCell<GestureEngine>>,
    ) -> Result<Box<dyn TapHandle>, CoreError>;
}

struct InterceptorInner {
    installer: Box<dyn HookInstaller>,
    tap: Option<Box<dyn TapHandle>>,
}

/// Owns the tap and the permission gate in front of it
pub struct InputEventInterceptor {
    engine: Rc<RefCell<GestureEngine>>,
    gate: PermissionGate,
    inner: Rc<RefCell<InterceptorInner>>,
}

impl InputEventInterceptor {
    pub fn new(
        engine: GestureEngine,
        gate: PermissionGate,
        installer: impl HookInstaller + 'static,
    ) -> Self {
        Self {
            engine: Rc::new(RefCell::new(engine)),
            gate,
            inner: Rc::new(RefCell::new(InterceptorInner {
                installer: Box::new(installer),
                tap: None,
            })),
        }
    }

    /// Install the tap once permission allows it; idempotent
    ///
    /// Returns immediately. Without permission the tap is installed later
    /// from the permission poll.
    pub fn start(&self) -> GateStatus {
        if self.is_running() {
            return GateStatus::Active;
        }

        let inner = Rc::downgrade(&self.inner);
        let engine = Rc::clone(&self.engine);
        self.gate
            .ensure_granted(Box::new(move || install_tap(&inner, engine)))
    }

    /// Remove the tap and cancel any permission poll; idempotent
    pub fn stop(&self) {
        self.gate.stop();

        let tap = self.inner.borrow_mut().tap.take();
        if let Some(tap) = tap {
            tap.remove();
            info!("Event tap removed");
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().tap.is_some()
    }

    pub fn engine(&self) -> Ref<'_, GestureEngine> {
        self.engine.borrow()
    }

    pub fn gate(&self) -> &PermissionGate {
        &self.gate
    }
}

impl Drop for InputEventInterceptor {
    fn drop(&mut self) {
        self.stop();
    }
}

fn install_tap(inner: &Weak<RefCell<InterceptorInner>>, engine: Rc<RefCell<GestureEngine>>) {
    let Some(inner) = inner.upgrade() else {
        return;
    };
    let mut inner = inner.borrow_mut();
    if inner.tap.is_some() {
        return;
    }

    match inner.installer.install(engine) {
        Ok(tap) => {
            inner.tap = Some(tap);
            info!("Event tap installed");
        }
        Err(e) => warn!("{}; interception stays off until the next start", e),
    }
}
