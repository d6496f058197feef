pub mod contingency;
pub mod dataset;
pub mod distance_functor;
pub mod lookup;
pub mod stats;
