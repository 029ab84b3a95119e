//! Repository implementations used by the handling server.
//!
//! Everything here lives in process memory; durability is out of scope.

pub mod inmem;

pub use inmem::{
    InMemoryCargoRepository, InMemoryHandlingEventRepository, InMemoryLocationRepository,
    InMemoryVoyageRepository,
};
