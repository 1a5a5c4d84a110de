// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod config;
pub mod constants;
pub mod error;
pub mod intake;
pub mod kubernetes;
pub mod provisioning;
pub mod release;

#[cfg(test)]
mod test_utils;
