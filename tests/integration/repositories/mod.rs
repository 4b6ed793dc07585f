// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod block_repository_test;
pub mod operation_repository_test;
pub mod template_repository_test;
