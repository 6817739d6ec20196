// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations: frame extraction, video metadata and frame export.

pub mod export;
pub mod media;
pub mod metadata;
