mod relationship_service_impl;

pub use relationship_service_impl::*;
