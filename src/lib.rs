// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod amortization;
pub mod bootstrap;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod expenses;
pub mod integrity;
pub mod loans;
pub mod models;
pub mod payments;
pub mod store;
pub mod tracker;
pub mod utils;
