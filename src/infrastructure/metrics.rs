// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::describe_counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

pub const OPERATIONS_SUBMITTED: &str = "operations_submitted_total";
pub const OPERATIONS_COMPLETED: &str = "operations_completed_total";
pub const OPERATIONS_FAILED: &str = "operations_failed_total";
pub const BLOCKS_EXTRACTED: &str = "blocks_extracted_total";
pub const CRAWL_PAGES_FETCHED: &str = "crawl_pages_fetched_total";

/// 初始化指标系统
///
/// 启动 Prometheus 导出器并注册计数器描述
///
/// # 参数
///
/// * `listen_addr` - 导出器监听地址
pub fn init_metrics(listen_addr: &str) {
    let addr: SocketAddr = match listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics address {}: {}", listen_addr, e);
            return;
        }
    };

    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}", e);
        return;
    }

    describe_counter!(OPERATIONS_SUBMITTED, "Total number of parse operations submitted");
    describe_counter!(OPERATIONS_COMPLETED, "Total number of parse operations completed");
    describe_counter!(OPERATIONS_FAILED, "Total number of parse operations failed");
    describe_counter!(BLOCKS_EXTRACTED, "Total number of blocks persisted");
    describe_counter!(CRAWL_PAGES_FETCHED, "Total number of pages fetched by the crawler");

    info!("Metrics exporter listening on {}", addr);
}
