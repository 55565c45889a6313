// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Domain layer: the field group control and its value shapes, free of UI concerns.

pub mod error;
pub mod hidden;
pub mod list;
pub mod record;
pub mod row;
pub mod sub_field;
pub mod template;
pub mod value;
