//! Content source bindings for Waypoint.
//!
//! All bindings implement the `waypoint_core::ContentSource` trait.
//! [`build_from_config`] selects the binding named in configuration.

pub mod catalog;
pub mod factory;
pub mod http;
pub mod sdk;

pub use catalog::StaticContentSource;
pub use factory::{SourceBuildError, build_from_config};
pub use http::HttpContentSource;
pub use sdk::{EmbeddedSdk, SdkConfig, SdkContentSource, TargetedContentSdk};
