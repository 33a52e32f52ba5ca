//! Memory-pressure driven cache eviction for the rendering surface.
//!
//! Lifecycle signals are handed to one background worker that samples memory
//! and evaluates the eviction policy. Surface mutations are never performed on
//! that worker: they are posted to the host's interactive thread through a
//! [`UiDispatcher`], and re-check liveness when they finally run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex, Weak};
use std::thread;

use engine_logging::{engine_debug, engine_info, engine_warn};
use reachprobe_core::{CacheAction, EvictionPolicy, LifecycleTrigger};

use crate::MemorySampler;

/// The embedded content surface. Methods other than `is_attached` must only be
/// called on the interactive thread.
pub trait RenderSurface: Send + Sync {
    fn is_attached(&self) -> bool;
    fn clear_cache(&self, include_disk_files: bool);
    fn clear_form_data(&self);
    fn clear_history(&self);
    fn pause(&self);
    fn resume(&self);
    fn destroy(&self);
    /// Advisory memory reclamation. Nothing may depend on it doing anything.
    fn reclaim_hint(&self) {}
}

pub type UiTask = Box<dyn FnOnce() + Send + 'static>;

/// Runs tasks on the interactive thread.
pub trait UiDispatcher: Send + Sync {
    fn post(&self, task: UiTask);
}

/// Background evaluator holding only a non-owning handle to the surface.
pub struct CacheGovernor {
    signal_tx: Mutex<Option<mpsc::Sender<LifecycleTrigger>>>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
}

impl CacheGovernor {
    pub fn spawn(
        surface: Weak<dyn RenderSurface>,
        sampler: Arc<dyn MemorySampler>,
        policy: EvictionPolicy,
        dispatcher: Arc<dyn UiDispatcher>,
    ) -> Self {
        Self::spawn_with_teardown_flag(
            surface,
            sampler,
            policy,
            dispatcher,
            Arc::new(AtomicBool::new(false)),
        )
    }

    /// Like [`CacheGovernor::spawn`], but evictions are also dropped once the
    /// owner sets `torn_down`.
    fn spawn_with_teardown_flag(
        surface: Weak<dyn RenderSurface>,
        sampler: Arc<dyn MemorySampler>,
        policy: EvictionPolicy,
        dispatcher: Arc<dyn UiDispatcher>,
        torn_down: Arc<AtomicBool>,
    ) -> Self {
        let (signal_tx, signal_rx) = mpsc::channel::<LifecycleTrigger>();
        let target = EvictionTarget { surface, torn_down };
        let spawned = thread::Builder::new()
            .name("cache-governor".to_string())
            .spawn(move || {
                for trigger in signal_rx {
                    evaluate_and_post(
                        &target,
                        sampler.as_ref(),
                        &policy,
                        dispatcher.as_ref(),
                        trigger,
                    );
                }
            });

        let (signal_tx, worker) = match spawned {
            Ok(worker) => (Some(signal_tx), Some(worker)),
            Err(err) => {
                engine_warn!("cache governor worker failed to start: {}", err);
                (None, None)
            }
        };
        Self {
            signal_tx: Mutex::new(signal_tx),
            worker: Mutex::new(worker),
        }
    }

    pub fn on_navigation_started(&self) {
        self.signal(LifecycleTrigger::NavigationStarted);
    }

    pub fn on_navigation_finished(&self) {
        self.signal(LifecycleTrigger::NavigationFinished);
    }

    pub fn on_low_memory(&self) {
        self.signal(LifecycleTrigger::LowMemory);
    }

    /// Fire-and-forget; dropped silently once the governor is shut down.
    pub fn signal(&self, trigger: LifecycleTrigger) {
        if let Ok(guard) = self.signal_tx.lock() {
            if let Some(tx) = guard.as_ref() {
                let _ = tx.send(trigger);
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.signal_tx
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    /// Stops accepting signals, lets queued ones drain and joins the worker.
    /// Repeated calls are no-ops.
    pub fn shutdown(&self) {
        if let Ok(mut guard) = self.signal_tx.lock() {
            guard.take();
        }
        let worker = self.worker.lock().ok().and_then(|mut guard| guard.take());
        if let Some(worker) = worker {
            if worker.join().is_err() {
                engine_warn!("cache governor worker panicked");
            }
        }
    }
}

impl Drop for CacheGovernor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Non-owning handle to the surface plus the owner's teardown flag.
#[derive(Clone)]
struct EvictionTarget {
    surface: Weak<dyn RenderSurface>,
    torn_down: Arc<AtomicBool>,
}

impl EvictionTarget {
    /// The surface, if it is still alive, attached and not torn down by its owner.
    fn live(&self) -> Option<Arc<dyn RenderSurface>> {
        if self.torn_down.load(Ordering::SeqCst) {
            return None;
        }
        self.surface
            .upgrade()
            .filter(|surface| surface.is_attached())
    }
}

fn evaluate_and_post(
    target: &EvictionTarget,
    sampler: &dyn MemorySampler,
    policy: &EvictionPolicy,
    dispatcher: &dyn UiDispatcher,
    trigger: LifecycleTrigger,
) {
    if target.live().is_none() {
        engine_debug!("governor skipped {:?}: surface gone", trigger);
        return;
    }
    let sample = sampler.sample();
    let action = policy.evaluate_for(trigger, sample);
    engine_debug!(
        "governor trigger={:?} used={} max={} action={:?}",
        trigger,
        sample.used_bytes,
        sample.max_bytes,
        action
    );
    let Some(action) = action else {
        return;
    };

    let target = target.clone();
    dispatcher.post(Box::new(move || apply_action(&target, action)));
}

/// Runs on the interactive thread.
fn apply_action(target: &EvictionTarget, action: CacheAction) {
    let Some(surface) = target.live() else {
        engine_debug!("eviction {:?} dropped: surface torn down or detached", action);
        return;
    };
    engine_info!("evicting surface state action={:?}", action);
    match action {
        CacheAction::ClearCacheOnly => surface.clear_cache(true),
        CacheAction::ClearCacheAndFormData => {
            surface.clear_cache(true);
            surface.clear_form_data();
        }
        CacheAction::ClearAllAndHistory => {
            surface.clear_cache(true);
            surface.clear_history();
            surface.clear_form_data();
            surface.reclaim_hint();
        }
    }
}

/// A rendering surface together with its governor, with idempotent teardown.
pub struct ManagedSurface {
    surface: Arc<dyn RenderSurface>,
    governor: CacheGovernor,
    torn_down: Arc<AtomicBool>,
}

impl ManagedSurface {
    pub fn new(
        surface: Arc<dyn RenderSurface>,
        sampler: Arc<dyn MemorySampler>,
        policy: EvictionPolicy,
        dispatcher: Arc<dyn UiDispatcher>,
    ) -> Self {
        let torn_down = Arc::new(AtomicBool::new(false));
        let governor = CacheGovernor::spawn_with_teardown_flag(
            Arc::downgrade(&surface),
            sampler,
            policy,
            dispatcher,
            torn_down.clone(),
        );
        Self {
            surface,
            governor,
            torn_down,
        }
    }

    pub fn surface(&self) -> &Arc<dyn RenderSurface> {
        &self.surface
    }

    pub fn governor(&self) -> &CacheGovernor {
        &self.governor
    }

    pub fn on_navigation_started(&self) {
        self.governor.on_navigation_started();
    }

    pub fn on_navigation_finished(&self) {
        self.governor.on_navigation_finished();
    }

    pub fn on_low_memory(&self) {
        self.governor.on_low_memory();
    }

    pub fn pause(&self) {
        if self.is_usable() {
            self.surface.pause();
        }
    }

    pub fn resume(&self) {
        if self.is_usable() {
            self.surface.resume();
        }
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::SeqCst)
    }

    /// Stops the governor, clears every cache and destroys the surface.
    /// Call on the interactive thread; only the first call has any effect.
    pub fn cleanup(&self) {
        if self.torn_down.swap(true, Ordering::SeqCst) {
            return;
        }
        self.governor.shutdown();
        if self.surface.is_attached() {
            self.surface.clear_cache(true);
            self.surface.clear_history();
            self.surface.clear_form_data();
            self.surface.destroy();
        }
        engine_info!("rendering surface torn down");
    }

    fn is_usable(&self) -> bool {
        !self.is_torn_down() && self.surface.is_attached()
    }
}

impl Drop for ManagedSurface {
    fn drop(&mut self) {
        self.cleanup();
    }
}
