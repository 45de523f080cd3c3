//! Pipeline stages for batch PDF-to-Markdown conversion.
//!
//! Each submodule implements exactly one stage. Keeping stages separate
//! makes each independently testable and lets us swap implementations
//! (e.g. a different conversion engine) without touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! enumerate ──▶ engine ──▶ writer
//! (walkdir)    (pdfium)   (tmp + rename)
//! ```
//!
//! 1. [`enumerate`] — walk the input root, filter by extension, sort,
//!    truncate to the optional limit
//! 2. [`engine`]    — the opaque conversion capability behind
//!    [`engine::DocumentEngine`]; the only stage that touches PDF internals
//! 3. [`writer`]    — persist one artifact per source under the output
//!    root, overwriting unconditionally

pub mod engine;
pub mod enumerate;
pub mod writer;
