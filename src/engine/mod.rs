//! The fieldwork execution engine.
//!
//! Component map, leaf-first: `resolver` builds the initial program,
//! `store` caches it per engagement, `procedure`/`evidence` edit one
//! workpaper, `reorder` moves workpapers within the program, `state` governs
//! the completion lifecycle, `finding` raises and filters linked issues, and
//! `session` is the command surface the presentation layer drives.

pub mod evidence;
pub mod finding;
pub mod procedure;
pub mod reorder;
pub mod resolver;
pub mod session;
pub mod state;
pub mod store;
