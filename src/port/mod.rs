//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     ▼                                                       ▼
//! ┌─────────────┐                                     ┌─────────────┐
//! │   Series    │                                     │    Event    │
//! │  Provider   │                                     │    Store    │
//! └─────────────┘                                     └─────────────┘
//! ```

pub mod outbound;

pub use outbound::series::SeriesSource;
pub use outbound::store::{EventStore, EventWriter};
