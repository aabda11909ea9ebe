//! Browser glue: logging, visibility and the wake lock request

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::{FrameLoop, WakeLock};

#[wasm_bindgen(inline_js = "
    let sentinel = null;
    export function request_wake_lock(done) {
        if (!('wakeLock' in navigator)) { done(false); return; }
        navigator.wakeLock.request('screen')
            .then((s) => { sentinel = s; done(true); })
            .catch(() => done(false));
    }
    export function release_wake_lock() {
        if (sentinel) {
            sentinel.release().catch(() => {});
            sentinel = null;
        }
    }
")]
extern "C" {
    fn request_wake_lock(done: &Closure<dyn FnMut(bool)>);
    fn release_wake_lock();
}

/// Panic hook plus `console_log`; safe to call more than once
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialised".into());
    }
}

pub fn is_visible() -> bool {
    web_sys::window()
        .and_then(|w| w.document())
        .map(|d| d.visibility_state() == web_sys::VisibilityState::Visible)
        .unwrap_or(true)
}

/// Issue a wake lock request and record the result when it settles
pub fn acquire_wake_lock(lock: Rc<RefCell<WakeLock>>) {
    if !lock.borrow_mut().request() {
        return;
    }
    let done = Closure::<dyn FnMut(bool)>::new(move |ok: bool| {
        let stale = lock.borrow_mut().acquired(ok);
        if stale {
            release_wake_lock();
        }
    });
    request_wake_lock(&done);
    done.forget();
}

/// Give the screen back; drops the browser's sentinel if one is held
pub fn drop_wake_lock(lock: &RefCell<WakeLock>) {
    let held = lock.borrow_mut().release();
    if held {
        release_wake_lock();
        log::info!("Wake lock released");
    }
}

/// Wire `visibilitychange` to the frame loop and the wake lock, and give
/// the lock back on `pagehide`
pub fn watch_visibility(frames: Rc<RefCell<FrameLoop>>, lock: Rc<RefCell<WakeLock>>) {
    let Some(window) = web_sys::window() else {
        log::warn!("No window; visibility changes will not pause the game");
        return;
    };
    let Some(document) = window.document() else {
        log::warn!("No document; visibility changes will not pause the game");
        return;
    };

    {
        let lock = lock.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            drop_wake_lock(&lock);
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    let doc = document.clone();
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
        let visible = doc.visibility_state() == web_sys::VisibilityState::Visible;
        frames.borrow_mut().on_visibility(visible);
        let reacquire = lock.borrow_mut().on_visibility(visible);
        if reacquire {
            acquire_wake_lock(lock.clone());
        }
    });
    let _ = document.add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
    closure.forget();
}
