//! Legacy text manifest format.
//!
//! A manifest describes one package snapshot to the legacy client: its
//! identity, optional install hooks, every content file with a retrieval URL,
//! and its pinned includes. Layout:
//!
//! ```text
//! "script"
//! {
//! "scriptid"	"42"
//! "revision"	"1"
//! "type"	"weapon"
//! "dataname"	""
//! "name"	"SuperGun"
//! "content"
//! {
//! "content_11"
//! {
//! "id"	"11"
//! ...
//! }
//! }
//! }
//!
//! <raw payload bytes, if any>
//! ```

mod encoder;
mod hooks;
mod keyvalues;

pub use encoder::{encode_manifest, ManifestEncoder, DEFAULT_CONTENT_URL_BASE, ROOT_KEY};
pub use hooks::InstallHooks;
pub use keyvalues::{KeyValues, Value};
