//! Emission factor lookup: cover type resolvers and the registry caching them

pub mod registry;
pub mod resolver;

pub use registry::{EfLookup, LookupRequest, ResolverRegistry, Subject};
pub use resolver::FuelbedResolver;
