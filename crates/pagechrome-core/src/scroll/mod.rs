//! Programmatic scrolling for anchor navigation
//!
//! Linear, time-bounded interpolation of the viewport scroll offset with an
//! instant-jump fallback for reduced motion.
//!
//! # Layout
//!
//! - `timing` - Pure time math (progress, interpolation)
//! - `config` - Configuration types (re-exported from the crate config)
//! - `animation` - Animation controller combining the two
//!
//! # Usage
//!
//! ```ignore
//! use pagechrome_core::scroll::ScrollAnimator;
//!
//! let mut animator = ScrollAnimator::new(&config.scroll);
//!
//! // Start an animation at the current frame timestamp
//! animator.animate_scroll_to(&mut page, 921.0, 700.0, now);
//!
//! // On every display refresh until it reports completion
//! while animator.step(&mut page, frame_time) { /* wait for next frame */ }
//! ```

pub mod config;
pub mod timing;

pub mod animation;

pub use animation::{ScrollAnimation, ScrollAnimator, ScrollStart};
pub use config::{ScrollConfig, ScrollConfigExt};
