pub mod builtin;
pub mod capability;
pub mod model;
pub mod registry;

pub use capability::Capability;
pub use model::{
    Arguments, CapabilityDescriptor, DIRECT_ANSWER, ExecutionRecord, ExecutionResult, ParameterSpec,
    all_succeeded,
};
pub use registry::CapabilityRegistry;
