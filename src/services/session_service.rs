use crate::constants::STORAGE_KEY_HISTORY;
use crate::error::AppResult;
use crate::models::SpinResult;
use crate::storage::SharedStore;
use chrono::{DateTime, FixedOffset, TimeZone};

/// 周期键：本地日历的 `YYYY-MM`
pub fn period_key<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    timestamp.format("%Y-%m").to_string()
}

/// 未抽过，或上次结果不在当前周期内即可抽奖。
/// 上次结果的时间按 `now` 的时区换算，保证两者使用同一本地日历。
pub fn is_eligible(last_result: Option<&SpinResult>, now: &DateTime<FixedOffset>) -> bool {
    match last_result {
        None => true,
        Some(last) => period_key(&last.date.with_timezone(now.offset())) != period_key(now),
    }
}

/// 单槽抽奖历史
#[derive(Clone)]
pub struct SessionStore {
    store: SharedStore,
}

impl SessionStore {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// 读取最近一次结果；不存在或数据损坏都返回 None
    pub fn load_last_result(&self) -> Option<SpinResult> {
        let raw = match self.store.get(STORAGE_KEY_HISTORY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Failed to read spin history: {e}");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(result) => Some(result),
            Err(e) => {
                log::warn!("Ignoring malformed spin history: {e}");
                None
            }
        }
    }

    /// 覆盖写入唯一的历史槽位
    pub fn record_result(&self, result: &SpinResult) -> AppResult<()> {
        let raw = serde_json::to_string(result)?;
        self.store.set(STORAGE_KEY_HISTORY, &raw)
    }

    pub fn clear_history(&self) -> AppResult<()> {
        self.store.remove(STORAGE_KEY_HISTORY)
    }

    /// 本周期已获得的结果（用于“查看已获得的图片”）
    pub fn current_period_result(&self, now: &DateTime<FixedOffset>) -> Option<SpinResult> {
        self.load_last_result()
            .filter(|last| !is_eligible(Some(last), now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::default_prizes;
    use crate::storage::MemoryStore;
    use chrono::Utc;
    use std::sync::Arc;

    fn at(ts: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(ts).unwrap()
    }

    fn result_at(ts: &str, prize_index: usize) -> SpinResult {
        SpinResult {
            prize: default_prizes().remove(prize_index),
            message: format!("message {prize_index}"),
            date: at(ts).with_timezone(&Utc),
        }
    }

    fn memory_session() -> (SessionStore, SharedStore) {
        let store: SharedStore = Arc::new(MemoryStore::new());
        (SessionStore::new(store.clone()), store)
    }

    #[test]
    fn test_period_key_zero_pads_month() {
        assert_eq!(period_key(&at("2024-03-15T10:00:00Z")), "2024-03");
        assert_eq!(period_key(&at("2024-12-01T00:00:00Z")), "2024-12");
    }

    #[test]
    fn test_period_key_uses_local_calendar() {
        // 东京时间已经是四月
        assert_eq!(period_key(&at("2024-04-01T08:30:00+09:00")), "2024-04");
        assert_eq!(
            period_key(&at("2024-04-01T08:30:00+09:00").with_timezone(&Utc)),
            "2024-03"
        );
    }

    #[test]
    fn test_no_history_is_eligible() {
        assert!(is_eligible(None, &at("2024-03-15T10:00:00Z")));
    }

    #[test]
    fn test_same_period_is_exhausted_regardless_of_time_of_day() {
        let last = result_at("2024-03-15T10:00:00Z", 0);
        assert!(!is_eligible(Some(&last), &at("2024-03-01T00:00:00Z")));
        assert!(!is_eligible(Some(&last), &at("2024-03-20T09:00:00Z")));
        assert!(!is_eligible(Some(&last), &at("2024-03-31T23:59:59Z")));
    }

    #[test]
    fn test_other_period_is_eligible() {
        let last = result_at("2024-03-15T10:00:00Z", 0);
        assert!(is_eligible(Some(&last), &at("2024-04-01T00:00:00Z")));
        assert!(is_eligible(Some(&last), &at("2024-02-29T12:00:00Z")));
        assert!(is_eligible(Some(&last), &at("2025-03-15T10:00:00Z")));
    }

    #[test]
    fn test_eligibility_compares_in_callers_timezone() {
        // UTC 3 月 31 日 23:30 = 东京 4 月 1 日 08:30
        let last = result_at("2024-03-31T23:30:00Z", 0);
        assert!(!is_eligible(Some(&last), &at("2024-04-01T12:00:00+09:00")));
        assert!(is_eligible(Some(&last), &at("2024-04-01T12:00:00Z")));
    }

    #[test]
    fn test_record_then_load() {
        let (session, _) = memory_session();
        assert_eq!(session.load_last_result(), None);

        let result = result_at("2024-03-15T10:00:00Z", 1);
        session.record_result(&result).unwrap();
        assert_eq!(session.load_last_result(), Some(result));
    }

    #[test]
    fn test_single_slot_overwrite() {
        let (session, _) = memory_session();
        let dates = [
            "2024-01-10T10:00:00Z",
            "2024-02-10T10:00:00Z",
            "2024-03-10T10:00:00Z",
        ];
        for (i, date) in dates.iter().enumerate() {
            session.record_result(&result_at(date, i)).unwrap();
        }
        let last = session.load_last_result().unwrap();
        assert_eq!(last, result_at("2024-03-10T10:00:00Z", 2));
    }

    #[test]
    fn test_malformed_history_is_absent() {
        let (session, store) = memory_session();
        store.set(STORAGE_KEY_HISTORY, "{not json").unwrap();
        assert_eq!(session.load_last_result(), None);

        store
            .set(STORAGE_KEY_HISTORY, r#"{"prize": {"id": "p"}, "message": "m"}"#)
            .unwrap();
        assert_eq!(session.load_last_result(), None);
    }

    #[test]
    fn test_clear_history_restores_eligibility() {
        let (session, _) = memory_session();
        let now = at("2024-03-20T10:00:00Z");
        session
            .record_result(&result_at("2024-03-15T10:00:00Z", 0))
            .unwrap();
        assert!(!is_eligible(session.load_last_result().as_ref(), &now));

        session.clear_history().unwrap();
        assert!(is_eligible(session.load_last_result().as_ref(), &now));
    }

    #[test]
    fn test_current_period_result_hides_old_months() {
        let (session, _) = memory_session();
        session
            .record_result(&result_at("2024-02-15T10:00:00Z", 0))
            .unwrap();
        assert_eq!(session.current_period_result(&at("2024-03-20T10:00:00Z")), None);
        assert!(
            session
                .current_period_result(&at("2024-02-28T10:00:00Z"))
                .is_some()
        );
    }
}
