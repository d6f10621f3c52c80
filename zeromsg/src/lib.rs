//! # zeromsg
//!
//! A pure-Rust library for the in-game text containers and IMG_BD/IMG_HD
//! asset archives of the Project Zero PS2 games.
//!
//! ## Supported formats
//!
//! - **Message containers** - The recursive offset-table blobs holding one
//!   locale's text, decoded by structural inference (the format carries no
//!   counts or type tags)
//! - **IMG_BD/IMG_HD archives** - Fixed-capacity archive data plus its bare
//!   sector index, with in-place entry replacement and full-rebuild fallback
//! - **Executable name tables** - The TOC and message-table name lists
//!   embedded in the disc executables
//! - **Tree/JSON/XML exports** - Three interchangeable lossless views for
//!   editing the decoded text
//!
//! ## Quick start
//!
//! ```no_run
//! use zeromsg::locale::Locale;
//! use zeromsg::message::MessageContainer;
//!
//! let blob = std::fs::read("IG_MSG_E.OBJ")?;
//! let container = MessageContainer::parse(&blob, Locale::En)?;
//! for hit in container.find_messages_containing("camera") {
//!     println!("{}", hit.text);
//! }
//! # Ok::<(), zeromsg::Error>(())
//! ```
//!
//! Editing flows run through the exports:
//!
//! ```no_run
//! use zeromsg::export::ExportFormat;
//! use zeromsg::locale::Locale;
//! use zeromsg::pipeline;
//!
//! pipeline::extract_container(
//!     "IG_MSG_E.OBJ",
//!     "out/IG_MSG_E",
//!     None,
//!     Locale::En,
//!     ExportFormat::Json,
//! )?;
//! # Ok::<(), zeromsg::Error>(())
//! ```

pub mod archive;
pub mod charset;
pub mod elf;
pub mod error;
pub mod export;
pub mod locale;
pub mod message;
pub mod pipeline;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::archive::{Archive, Layout, ReplaceOutcome, TocEntry};
    pub use crate::charset::{Charset, FontSet};
    pub use crate::error::{Error, Result};
    pub use crate::export::ExportFormat;
    pub use crate::locale::{ContainerFile, Locale, LocaleConfig};
    pub use crate::message::{Message, MessageContainer, MessageTable};
    pub use crate::pipeline::{extract_container, rebuild_container, replace_in_archive};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
