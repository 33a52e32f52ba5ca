//! Reachprobe engine: probe transport, sequential runner, worker handle,
//! memory sampling and the cache governor.
mod engine;
mod fetch;
mod governor;
mod memory;
mod runner;
mod types;

pub use engine::ProbeHandle;
pub use fetch::{ReqwestTransport, Transport};
pub use governor::{CacheGovernor, ManagedSurface, RenderSurface, UiDispatcher, UiTask};
pub use memory::{MemorySampler, SysinfoSampler};
pub use runner::{ProbeRunner, ProgressSink};
pub use types::{
    EngineError, ProbeEvent, ProbeResponse, ProbeSettings, TransportError, TransportErrorKind,
    USER_AGENT,
};
