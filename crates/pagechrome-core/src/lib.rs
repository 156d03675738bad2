pub mod anchor;
pub mod chrome;
pub mod config;
pub mod dom;
pub mod dropdown;
pub mod error;
pub mod geometry;
pub mod page;
pub mod release;
pub mod scroll;

pub use chrome::{ChromeSnapshot, ClickOutcome, Key, PageChrome, PageEvent};
pub use config::{AppConfig, ScrollConfig};
pub use dom::{Document, NodeId, Page, Viewport};
pub use error::{Error, Result};
pub use page::{MemoryPage, PageLayout};
