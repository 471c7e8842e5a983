#![warn(clippy::nursery, clippy::pedantic)]

//! Retention-coded temporary drop store.
//!
//! A submitter hands over text and/or files plus a retention period and
//! gets back a short numeric pickup code; anyone holding the code can
//! retrieve the content until it expires. Expiry is lazy: expired
//! submissions are deleted at the start of the next lookup, never by a
//! background task, so the store touches disk only when asked.
//!
//! The filesystem is the database. Each submission lives in a directory
//! named `<code>_<created_at>_<expires_at>` under the storage root, with
//! an optional `text.json` record and a `files/` subdirectory holding raw
//! copies under their original names. That layout is a stable interface
//! for anything else that inspects storage directly; an in-memory index
//! rebuilt from it on [`DropStore::open`] is only an optimization.

pub mod archive;
pub mod code;
pub mod entry;
pub mod error;
pub mod store;
pub mod time;

pub use archive::package;
pub use code::{CodeGenerator, PickupCode};
pub use error::{Error, Result};
pub use store::{Bundle, DropStore, FileUpload};
pub use time::Ttl;
