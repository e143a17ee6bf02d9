pub mod url_validator;

use sha2::{Digest, Sha256};

/// 计算 SHA-256 并返回小写十六进制字符串
///
/// 用于设备标识的脱敏：服务端只看到哈希，看不到原始设备 ID。
pub fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// 当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
