// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Synthesis: rendering the construct tree into a cloud assembly.
//!
//! A cloud assembly is a directory holding one CloudFormation template per
//! stack plus a `manifest.json` naming each stack's deployment environment.
//! It is the only thing handed to the provisioning engine.

mod assembly;

pub use assembly::{CloudAssembly, StackArtifact, MANIFEST_FILE, MANIFEST_VERSION};
