//! xsec Adapter - Functions as host components
//!
//! Binds a Function to a visual-programming host component:
//! - `ComponentAdapter`: slot registration, input collection, compute, output
//! - `DropdownAdapter`: unit and option lists with persisted selection
//! - `HeadlessComponent`: in-memory host used by tests and the stdio host
//! - `HostedComponent`: registry-backed component with save/load documents

mod error;
mod host;
mod component;
mod dropdown;
mod hosted;

#[cfg(test)]
mod testing;

pub use error::AdapterError;
pub use host::{ComponentHost, HeadlessComponent, SlotSpec};
pub use component::{ComponentAdapter, Cycle};
pub use dropdown::{DropdownAdapter, DropdownState};
pub use hosted::{ComponentDocument, HostedComponent};
