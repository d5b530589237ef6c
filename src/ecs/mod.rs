//! Entity Component System module
//!
//! Components for the hecs worlds this crate's systems run over

mod components;

pub use components::{ColliderRef, Name, Transform};
