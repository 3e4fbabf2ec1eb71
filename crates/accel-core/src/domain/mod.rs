//! Domain entities for the mouse acceleration toggle.
//!
//! Both types are small `Copy` values.  They carry no behaviour that touches
//! the OS, which keeps them trivially testable.

pub mod configuration;
pub mod state;
