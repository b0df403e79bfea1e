// ==========================================
// 团队排练排期系统 - 日志
// ==========================================
// tracing-subscriber 输出到 stderr; stdout 只放命令行 JSON
// 级别由 RUST_LOG 覆盖
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 未设置 RUST_LOG 时的过滤规则
pub const DEFAULT_FILTER: &str = "info";

/// 按 RUST_LOG 构造过滤器,无效或缺省时使用 `fallback`
pub fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// 命令行入口调用一次
///
/// 例如 `RUST_LOG=rehearsal_planner::repository=debug` 只打开仓储层的调试日志
pub fn init() {
    fmt()
        .with_env_filter(env_filter(DEFAULT_FILTER))
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// 测试用: debug 级别, 输出交给测试框架捕获; 可重复调用
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
