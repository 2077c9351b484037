//! A RAD builder for Cloudscape page layouts.
//!
//! Components from a fixed [`catalog::Catalog`] are placed into the regions
//! of a [`layout::LayoutState`], edited with undo/redo, saved as named
//! designs and turned into React source by [`codegen::generate`].

pub mod builder;
pub mod catalog;
pub mod codegen;
pub mod config;
pub mod error;
pub mod highlight;
pub mod history;
pub mod ident;
pub mod layout;
pub mod persistence;
pub mod shell;
pub mod value;

pub use builder::Builder;
pub use error::{BuilderError, Result};
