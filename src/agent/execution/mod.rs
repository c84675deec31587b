pub mod executor;
pub mod fallback;
pub mod params;

pub use executor::Executor;
pub use fallback::CapabilityKind;
pub use params::ParameterExtractor;
