//! Handler registration and event emission

mod registry;

pub use registry::{Emitter, EventRegistry, Handler, HandlerId};
