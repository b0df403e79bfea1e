// ==========================================
// 团队排练排期系统 - 界面文案
// ==========================================
// 词条: locales/zh-CN.yml (默认), locales/en.yml
// 覆盖: 日历分级、可用性状态、时段、命令行提示
// 词条表由 lib.rs 中的 rust_i18n::i18n! 加载
// ==========================================

/// 支持的语言,首项为默认
pub const SUPPORTED_LOCALES: &[&str] = &["zh-CN", "en"];

/// 把用户输入的语言代码归一到支持的语言
///
/// `zh` / `zh_cn` / `ZH-cn` 归到 zh-CN, `en-US` / `EN` 归到 en; 其余返回 None
pub fn normalize_locale(raw: &str) -> Option<&'static str> {
    let lowered = raw.trim().to_lowercase().replace('_', "-");
    let primary = lowered.split('-').next().unwrap_or("");
    match primary {
        "zh" => Some("zh-CN"),
        "en" => Some("en"),
        _ => None,
    }
}

pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 切换界面语言,返回实际生效的语言
///
/// 无法识别的代码回退到 zh-CN 并记 warn
pub fn set_locale(raw: &str) -> &'static str {
    let locale = normalize_locale(raw).unwrap_or_else(|| {
        tracing::warn!(requested = raw, fallback = SUPPORTED_LOCALES[0], "不支持的语言");
        SUPPORTED_LOCALES[0]
    });
    rust_i18n::set_locale(locale);
    locale
}

/// 取词条
///
/// ```no_run
/// use rehearsal_planner::i18n::t;
/// let label = t("tier.high");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 取词条并替换 `%{name}` 占位符
///
/// ```no_run
/// use rehearsal_planner::i18n::t_with_args;
/// let msg = t_with_args("import.roster_done", &[("count", "12")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    args.iter().fold(t(key), |text, (name, value)| {
        text.replace(&format!("%{{{}}}", name), value)
    })
}
