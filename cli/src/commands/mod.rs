// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the RAGE CLI

pub mod config;
pub mod rpc;
pub mod serve;

pub use self::config::ConfigCommand;
pub use self::rpc::RpcCommand;
