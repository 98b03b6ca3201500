use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::PrizeImage;

/// 一次抽奖结果，创建后不可变，也是唯一被持久化的历史单元
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SpinResult {
    pub prize: PrizeImage,
    pub message: String,
    /// ISO-8601 (UTC, 毫秒精度)
    #[serde(with = "iso_timestamp")]
    #[schema(value_type = String, example = "2024-03-15T10:00:00.000Z")]
    pub date: DateTime<Utc>,
}

/// `2024-03-15T10:00:00.000Z` 格式的时间戳序列化
pub mod iso_timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|d| d.with_timezone(&Utc))
            .map_err(D::Error::custom)
    }
}
