//! Simulated landing page
//!
//! - `layout` - Serializable page description (TOML)
//! - `memory` - In-memory [`Document`](crate::dom::Document) + [`Viewport`](crate::dom::Viewport)

pub mod layout;
pub mod memory;

pub use layout::{DropdownLayout, HeroLayout, LinkLayout, NavLayout, PageLayout, SectionLayout, ViewportLayout};
pub use memory::MemoryPage;
