// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Cognito identity resources: user pools and the clients registered
//! against them.

pub mod attributes;
pub mod client;
pub mod user_pool;

pub use attributes::{
	ClientAttributes, CustomAttribute, CustomAttributeType, StandardAttribute,
	StandardAttributeSpec, StandardAttributes, StandardAttributesMask, WriteAttributes,
	CUSTOM_ATTRIBUTE_PREFIX,
};
pub use client::{
	AuthFlows, IdentityProvider, UserPoolClient, UserPoolClientProps, UserPoolClientRef,
	USER_POOL_CLIENT_TYPE,
};
pub use user_pool::{
	AccountRecovery, AutoVerifiedAttrs, PasswordPolicy, SignInAliases, UserPool, UserPoolProps,
	UserPoolRef, USER_POOL_TYPE,
};
