pub mod generic;
pub mod gma;
pub mod inquirer;
pub mod manila_bulletin;
pub mod manila_times;
pub mod philstar;
pub mod rappler;
pub mod sunstar;

pub use generic::{GenericAdapter, NewsSiteConfig};

/// The seven shipped publishers, in the order they're registered by
/// [`crate::registry::SourceRegistry::default_sources`].
pub const ALL_SOURCE_CONFIGS: &[fn() -> NewsSiteConfig] = &[
    rappler::config,
    gma::config,
    philstar::config,
    inquirer::config,
    manila_bulletin::config,
    manila_times::config,
    sunstar::config,
];
