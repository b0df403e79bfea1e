// ==========================================
// 团队排练排期系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享连接、仓储与API实例
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::api::AvailabilityApi;
use crate::config::{ConfigManager, SchedulingConfig, SchedulingConfigReader};
use crate::db::{init_schema, open_sqlite_connection};
use crate::repository::{AvailabilityRepository, MemberRepository};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "REHEARSAL_PLANNER_DB_PATH";

/// 应用状态
///
/// 所有仓储共享同一连接,写入经 Mutex 串行化
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 成员仓储
    pub member_repo: Arc<MemberRepository>,

    /// 可用性仓储
    pub availability_repo: Arc<AvailabilityRepository>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 启动时加载的排期配置
    pub config: SchedulingConfig,

    /// 可用性 / 排练建议 API
    pub availability_api: Arc<AvailabilityApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 1. 打开数据库并初始化表结构 (幂等)
    /// 2. 初始化仓储与配置管理器
    /// 3. 加载排期配置并创建 API
    pub async fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("无法初始化表结构: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let member_repo = Arc::new(MemberRepository::from_connection(conn.clone()));
        let availability_repo = Arc::new(AvailabilityRepository::from_connection(conn.clone()));

        // ==========================================
        // 加载配置
        // ==========================================
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let config = config_manager
            .load_scheduling_config()
            .await
            .map_err(|e| format!("无法加载排期配置: {}", e))?;

        // ==========================================
        // 创建API实例
        // ==========================================
        let availability_api = Arc::new(AvailabilityApi::new(
            member_repo.clone(),
            availability_repo.clone(),
            config.clone(),
        ));

        tracing::info!(
            min_required = config.min_required,
            window_months = config.suggestion_window_months,
            "AppState初始化完成"
        );

        Ok(Self {
            db_path,
            member_repo,
            availability_repo,
            config_manager,
            config,
            availability_api,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 REHEARSAL_PLANNER_DB_PATH > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./rehearsal.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("rehearsal-planner");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("rehearsal.db");
        }
    }

    path.to_string_lossy().to_string()
}
