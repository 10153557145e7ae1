//! dirshelf - reversible directory organization
//!
//! This library sorts a directory's immediate files into category
//! subfolders by extension, records every move in a ledger so the run can
//! be reversed exactly, computes folder statistics, and bundles a tree into
//! a compressed archive with progress reporting. No move ever overwrites
//! existing content, in either direction.

pub mod archive;
pub mod category;
pub mod cli;
pub mod config;
pub mod mover;
pub mod organizer;
pub mod output;
pub mod stats;
pub mod undo;

pub use archive::{ArchiveError, Archiver};
pub use category::{Category, CategoryRules};
pub use config::{CompiledFilters, ConfigError, FilterConfig};
pub use organizer::{MoveLedger, MoveRecord, OrganizeError, OrganizeReport, Organizer};
pub use stats::{FolderStats, StatsCollector, StatsError};
pub use undo::{UndoManager, UndoReport};

pub use cli::{Cli, Session, run};
