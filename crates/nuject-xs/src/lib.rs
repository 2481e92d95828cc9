#![deny(missing_docs)]
#![doc = "Tabulated cross-section provider: validated interpolation surfaces and final-state sampling for the nuject engine."]

pub mod provider;
pub mod table;

pub use provider::CrossSectionProvider;
pub use table::CrossSectionTable;
