// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Declarative resource model for flapflap infrastructure.
//!
//! Resources are plain value types collected into an [`App`] → [`Stack`] tree.
//! Nothing here talks to a cloud provider: the tree is rendered into a
//! [`CloudAssembly`] (CloudFormation templates plus a manifest), which is the
//! hand-off artifact for whatever provisioning engine applies it.
//!
//! - [`cognito`]: user pool and user pool client declarations
//! - [`Tags`]: transitive tagging pass over any [`Taggable`] node
//! - [`Token`]: unresolved references to provider-generated identifiers
//! - [`synth`]: template and assembly rendering

pub mod app;
pub mod cognito;
pub mod error;
pub mod id;
pub mod stack;
pub mod synth;
pub mod tags;
pub mod token;

pub use app::App;
pub use error::{DeclarationError, SynthError};
pub use id::{ConstructId, LogicalId};
pub use stack::{Environment, Output, RemovalPolicy, Resource, ResourceKind, Stack, StackProps};
pub use synth::{CloudAssembly, StackArtifact, MANIFEST_VERSION};
pub use tags::{TagMap, Taggable, Tags};
pub use token::Token;
