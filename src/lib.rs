//! Composition and transform engine for the product detail-page builder.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! interactive core of the page builder: an ordered list of sections with
//! independent pan/zoom transforms, vertical resize, grid sub-layouts with
//! fractional columns, draggable line and text annotations, and AI-detected
//! clothing regions overlaid on held sections. The host layer is responsible
//! only for wiring DOM events to the engine, decoding dropped files, talking
//! to the image-edit and vision collaborators, and persisting the
//! [`engine::Action`]s the engine emits.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Ordered section document and all keyed sub-stores |
//! | [`section`] | Section kinds, status state machine, image handles |
//! | [`transform`] | Per-section/per-cell pan/zoom transforms |
//! | [`grid`] | Grid sub-layout: cells and fractional column widths |
//! | [`annotation`] | Line and text annotations attached to sections |
//! | [`region`] | Clothing regions in percentage space |
//! | [`geometry`] | Points, rects, and the percent ↔ pixel boundary |
//! | [`input`] | Input event types and the drag-capture state machine |
//! | [`hit`] | Hit-testing in document space |
//! | [`visibility`] | Centered-section tracker for navigation UI |
//! | [`render`] | Scene rendering to a 2D canvas context |
//! | [`consts`] | Shared numeric constants (zoom limits, minimum sizes, etc.) |

pub mod annotation;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod geometry;
pub mod grid;
pub mod hit;
pub mod input;
pub mod region;
pub mod render;
pub mod section;
pub mod transform;
pub mod visibility;
