//! # Events Module
//!
//! Event-driven progress reporting.
//!
//! ## Design
//! The core library emits events through channels, allowing any front end
//! to subscribe and display progress while a tree is being cleaned.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Walk(WalkEvent::DirectoryStarted { path }) = event {
//!             println!("Checking {}", path.display());
//!         }
//!     }
//! });
//!
//! cleaner.run_with_events(&sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
