// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometry helpers and image filters.

pub mod blur;
pub mod geometry;
