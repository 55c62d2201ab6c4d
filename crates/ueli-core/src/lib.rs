//! Core types for ueli.
//!
//! This crate defines the `ueli.yaml` schema ([`UeliConfig`]), the typed
//! Kubernetes manifest view ([`Manifest`]), image/object naming ([`tag`]),
//! and the deployment plan inspector ([`PlanInspector`]).

pub mod config;
pub mod error;
pub mod inspect;
pub mod manifest;
pub mod tag;

pub use config::{
    BuildConfig, CONFIG_FILE_NAME, ClusterSetting, DeploymentDescriptor, GcloudConfig, UeliConfig,
};
pub use error::{Error, Result};
pub use inspect::{InspectionReport, PlanInspector};
pub use manifest::{Manifest, ManifestKind};
