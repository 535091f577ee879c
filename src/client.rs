//! Client façade over the scoring service.
//!
//! Implementation details are split into submodules under `src/client/`.

pub mod builder;
pub mod core;

pub use self::builder::SpamClientBuilder;
pub use self::core::{Analysis, BatchReport, SpamClient};
