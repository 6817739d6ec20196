// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: annotations, their per-frame store, undo history and the project.

pub mod annotation;
pub mod history;
pub mod project;
pub mod store;
