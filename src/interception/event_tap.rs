use super::{Disposition, GestureEngine, HookInstaller, TapEvent, TapHandle};
use crate::error::CoreError;
use core_foundation::base::TCFType;
use core_foundation::runloop::{kCFRunLoopCommonModes, CFRunLoop, CFRunLoopSource};
use core_graphics::event::{CGEvent, CGEventType, EventField};
use core_graphics::sys::{CGEventRef, CGEventTapRef};
use foreign_types::ForeignType;
use log::{debug, info, warn};
use std::cell::{Cell, RefCell};
use std::ffi::c_void;
use std::mem::ManuallyDrop;
use std::rc::Rc;
use std::time::Instant;

type CFAllocatorRef = *mut c_void;
type CFMachPortRef = *mut c_void;
type CFIndex = isize;

type TapCallback = unsafe extern "C" fn(
    proxy: *mut c_void,
    event_type: u32,
    event: CGEventRef,
    user_info: *mut c_void,
) -> CGEventRef;

#[link(name = "CoreGraphics", kind = "framework")]
extern "C" {
    fn CGEventTapCreate(
        tap: u32,
        place: u32,
        options: u32,
        events_of_interest: u64,
        callback: TapCallback,
        user_info: *mut c_void,
    ) -> CGEventTapRef;

    fn CGEventTapEnable(tap: CGEventTapRef, enable: bool);
}

#[link(name = "CoreFoundation", kind = "framework")]
extern "C" {
    fn CFMachPortCreateRunLoopSource(
        allocator: CFAllocatorRef,
        port: CFMachPortRef,
        order: CFIndex,
    ) -> core_foundation::runloop::CFRunLoopSourceRef;

    fn CFMachPortInvalidate(port: CFMachPortRef);
    fn CFRelease(cf: *const c_void);
}

const K_CG_SESSION_EVENT_TAP: u32 = 1;
const K_CG_HEAD_INSERT_EVENT_TAP: u32 = 0;
const K_CG_EVENT_TAP_OPTION_DEFAULT: u32 = 0;

struct TapContext {
    engine: Rc<RefCell<GestureEngine>>,
    tap: Cell<CGEventTapRef>,
}

/// Installs a session-level keyboard tap on the current run loop
pub struct MacEventTapInstaller;

impl HookInstaller for MacEventTapInstaller {
    fn install(
        &mut self,
        engine: Rc<RefCell<GestureEngine>>,
    ) -> Result<Box<dyn TapHandle>, CoreError> {
        info!("Creating keyboard event tap");

        let event_mask: u64 =
            (1 << CGEventType::KeyDown as u64) | (1 << CGEventType::KeyUp as u64);

        let context = Box::into_raw(Box::new(TapContext {
            engine,
            tap: Cell::new(std::ptr::null_mut()),
        }));

        unsafe {
            let tap = CGEventTapCreate(
                K_CG_SESSION_EVENT_TAP,
                K_CG_HEAD_INSERT_EVENT_TAP,
                K_CG_EVENT_TAP_OPTION_DEFAULT,
                event_mask,
                event_tap_callback,
                context as *mut c_void,
            );

            if tap.is_null() {
                drop(Box::from_raw(context));
                return Err(CoreError::HookInstallFailed(
                    "CGEventTapCreate returned null".to_string(),
                ));
            }
            (*context).tap.set(tap);

            let source_ref = CFMachPortCreateRunLoopSource(std::ptr::null_mut(), tap as CFMachPortRef, 0);
            if source_ref.is_null() {
                CFMachPortInvalidate(tap as CFMachPortRef);
                CFRelease(tap as *const c_void);
                drop(Box::from_raw(context));
                return Err(CoreError::HookInstallFailed(
                    "could not create run loop source for event tap".to_string(),
                ));
            }

            let source = CFRunLoopSource::wrap_under_create_rule(source_ref);
            let run_loop = CFRunLoop::get_current();
            run_loop.add_source(&source, kCFRunLoopCommonModes);
            CGEventTapEnable(tap, true);

            info!("Event tap enabled");
            Ok(Box::new(MacEventTap {
                tap,
                source,
                run_loop,
                context,
            }))
        }
    }
}

struct MacEventTap {
    tap: CGEventTapRef,
    source: CFRunLoopSource,
    run_loop: CFRunLoop,
    context: *mut TapContext,
}

impl TapHandle for MacEventTap {
    fn remove(self: Box<Self>) {
        drop(self);
    }
}

impl Drop for MacEventTap {
    fn drop(&mut self) {
        unsafe {
            CGEventTapEnable(self.tap, false);
            self.run_loop
                .remove_source(&self.source, kCFRunLoopCommonModes);
            CFMachPortInvalidate(self.tap as CFMachPortRef);
            CFRelease(self.tap as *const c_void);
            drop(Box::from_raw(self.context));
        }
        debug!("Event tap released");
    }
}

unsafe extern "C" fn event_tap_callback(
    _proxy: *mut c_void,
    event_type: u32,
    event: CGEventRef,
    user_info: *mut c_void,
) -> CGEventRef {
    if user_info.is_null() {
        return event;
    }
    let context = &*(user_info as *const TapContext);
    let now = Instant::now();

    let tap_event = match event_type {
        t if t == CGEventType::TapDisabledByTimeout as u32
            || t == CGEventType::TapDisabledByUserInput as u32 =>
        {
            TapEvent::TapDisabled
        }
        t if t == CGEventType::KeyDown as u32 => TapEvent::KeyDown {
            keycode: event_keycode(event),
        },
        t if t == CGEventType::KeyUp as u32 => TapEvent::KeyUp {
            keycode: event_keycode(event),
        },
        _ => TapEvent::Other,
    };

    // Re-entrant delivery while the engine is busy passes through untouched
    let disposition = match context.engine.try_borrow_mut() {
        Ok(mut engine) => engine.handle(tap_event, now),
        Err(_) => {
            warn!("Gesture engine busy, passing event through");
            Disposition::PassThrough
        }
    };

    match disposition {
        Disposition::PassThrough => event,
        Disposition::Suppress => std::ptr::null_mut(),
        Disposition::ReenableTap => {
            let tap = context.tap.get();
            if !tap.is_null() {
                CGEventTapEnable(tap, true);
            }
            event
        }
    }
}

unsafe fn event_keycode(event: CGEventRef) -> i64 {
    if event.is_null() {
        return -1;
    }
    // Borrowed from the tap; the system still owns the event
    let event = ManuallyDrop::new(CGEvent::from_ptr(event));
    event.get_integer_value_field(EventField::KEYBOARD_EVENT_KEYCODE)
}
