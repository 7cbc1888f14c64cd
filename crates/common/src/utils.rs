//! 通用工具函数

use uuid::Uuid;

/// 生成新的 UUID v7（时间有序）
pub fn new_id() -> Uuid {
    Uuid::now_v7()
}

/// 生成带前缀的业务参考号，如 `TRN0190A3F2C4D5E6F7A8B9`
///
/// 取 UUID v7 的后 20 位十六进制字符（随机部分），大写输出。
pub fn reference_code(prefix: &str) -> String {
    let hex = new_id().simple().to_string().to_uppercase();
    format!("{}{}", prefix, &hex[hex.len() - 20..])
}
