// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for the Exchange Log and Memory Store tables.

pub mod exchanges;
pub mod memories;
