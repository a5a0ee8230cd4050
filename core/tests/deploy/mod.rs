// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! End-to-end deployment tests against the in-memory workspace.

mod engine;
mod lifecycle;
mod validation;
