// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Host-side logic: form submission into records and file I/O.

pub mod record_io;
pub mod submit;
