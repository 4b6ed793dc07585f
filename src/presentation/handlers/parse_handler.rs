// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    application::{
        dto::{operation_response::OperationResponseDto, parse_request::ParseRequestDto},
        use_cases::parse_use_case::ParseUseCase,
    },
    domain::repositories::{
        block_repository::BlockRepository, operation_repository::OperationRepository,
    },
    presentation::errors::AppError,
    queue::job_queue::JobQueue,
};

/// 提交解析操作
///
/// 立即返回 202 与处于 `processing` 状态的操作
pub async fn submit_parse<O, B, Q>(
    Extension(use_case): Extension<Arc<ParseUseCase<O, B, Q>>>,
    Json(payload): Json<ParseRequestDto>,
) -> Result<impl IntoResponse, AppError>
where
    O: OperationRepository + 'static,
    B: BlockRepository + 'static,
    Q: JobQueue + 'static,
{
    payload.validate()?;

    let operation = use_case.submit(&payload.url).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(OperationResponseDto::from(operation)),
    ))
}

/// 获取操作状态及已提取的块
pub async fn get_operation<O, B, Q>(
    Extension(use_case): Extension<Arc<ParseUseCase<O, B, Q>>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    O: OperationRepository + 'static,
    B: BlockRepository + 'static,
    Q: JobQueue + 'static,
{
    let (operation, blocks) = use_case.get_operation_result(id).await?;
    Ok(Json(OperationResponseDto::with_blocks(operation, blocks)))
}
