//! # Bondstress Traits
//!
//! Record types and storage traits shared by the valuation engine and its
//! storage backends.
//!
//! - [`ids`]: String identifiers and composite keys
//! - [`records`]: Securities, curve points, positions, stress scenarios and
//!   computed results
//! - [`storage`]: Async storage traits, combined into [`Repository`]
//! - [`error`]: [`RepositoryError`]
//!
//! Backends implement the individual store traits; anything implementing
//! all of them is a [`Repository`] automatically.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod ids;
pub mod records;
pub mod storage;

pub use error::{RepositoryError, RepositoryResult};
pub use ids::*;
pub use records::*;
pub use storage::{
    CurvePointStore, PositionStore, Repository, ResultStore, ScenarioStore, SecurityStore,
};
