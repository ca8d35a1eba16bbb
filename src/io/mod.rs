//! External collaborators (spec.md §6): byte-level readers/writers for the
//! image and mesh formats the core consumes and produces. None of these
//! formats has an ecosystem crate in the retrieval pack's dependency
//! tables, and the teacher does no file I/O at all (it renders to a WASM
//! canvas), so these are hand-rolled against the documented format layouts
//! — the one place spec.md §6 explicitly asks for raw byte-format handling
//! rather than an ecosystem crate.

pub mod bmp;
pub mod hdr;
pub mod mesh_stream;
pub mod pfm;
pub mod tga;

/// A decoded image: linear-float pixels, row-major, top-to-bottom,
/// left-to-right. Every loader in this module normalizes to this shape
/// regardless of the source format's own row order or channel count
/// (spec.md §6: "the core only requires: width, height, number of
/// channels, linear-float pixel array").
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<crate::color::Color3>,
}
