//! # Markup
//!
//! String-level operations on the site's hand-written HTML pages. Nothing here
//! parses HTML into a tree: pages are edited by splicing text at offsets found
//! with a depth-counting tag scanner, so the surrounding hand-authored formatting
//! is preserved byte for byte.
//!
//! - [`locate`]: finding a container's closing tag
//! - [`index`]: scanning `data-index` attributes for the next sequence number
//! - [`format`]: escaping and formatting poem text into an entry block
//! - [`extract`]: reading an entry back into plain lines
//! - [`share`]: rewriting social preview tags for a single poem

pub mod extract;
pub mod format;
pub mod index;
pub mod locate;
pub mod share;

pub use extract::find_entry;
pub use format::{entry_block, splice, title_comment, Indentation};
pub use index::next_index;
pub use locate::{find_container_close, find_first_container_close};
