// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::describe_counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::info;

/// 初始化指标系统
///
/// 配置并注册应用所需的各类监控指标
pub fn init_metrics() {
    let builder = PrometheusBuilder::new();
    let addr: SocketAddr = "0.0.0.0:9000".parse().expect("Invalid metrics address");

    // Start the exporter
    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = builder.with_http_listener(addr).install() {
        tracing::warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
    }

    describe_counter!(
        "limpia_analyses_total",
        "Total number of image analysis requests by outcome"
    );
    describe_counter!(
        "limpia_task_transitions_total",
        "Total number of task status transitions by target status"
    );

    info!("Metrics exporter listening on {}", addr);
}

/// 记录一次分析请求的结果
pub fn record_analysis(outcome: &str) {
    metrics::counter!("limpia_analyses_total", "outcome" => outcome.to_string()).increment(1);
}

/// 记录一次任务状态转换
pub fn record_task_transition(status: &str) {
    metrics::counter!("limpia_task_transitions_total", "status" => status.to_string()).increment(1);
}
