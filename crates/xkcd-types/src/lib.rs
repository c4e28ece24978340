//! Shared data model, error taxonomy, configuration helpers, and persistence
//! primitives used by every `xkcd-*` service.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod retry;
pub mod shutdown;

/// NATS subject used for corpus-change notifications.
pub const CORPUS_UPDATED_SUBJECT: &str = "xkcd.db.updated";

/// The sole subject accepted by [`jsonwebtoken`]-issued tokens.
pub const ADMIN_SUBJECT: &str = "superuser";

/// Comics with this id are permanently absent from the upstream corpus and
/// must never be fetched, stored, or counted.
pub const ABSENT_COMIC_ID: i64 = 404;

/// Maximum phrase length accepted by the normalizer, in bytes.
pub const MAX_PHRASE_BYTES: usize = 4096;
