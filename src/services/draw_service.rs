use crate::error::{AppError, AppResult};
use crate::models::{PrizeImage, SpinResult};
use crate::services::{MessageService, SessionStore, is_eligible, period_key, resolve_active_prizes};
use crate::storage::{self, SharedStore};
use chrono::{DateTime, FixedOffset, Utc};
use rand::Rng;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 抽奖引擎
#[derive(Clone)]
pub struct DrawService {
    store: SharedStore,
    defaults: Vec<PrizeImage>,
    messages: MessageService,
    min_duration: Duration,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

/// 进行中标记，析构时释放
struct InFlightGuard {
    members: Arc<Mutex<HashSet<String>>>,
    member: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if let Ok(mut members) = self.members.lock() {
            members.remove(&self.member);
        }
    }
}

impl DrawService {
    pub fn new(
        store: SharedStore,
        defaults: Vec<PrizeImage>,
        messages: MessageService,
        min_duration: Duration,
    ) -> Self {
        Self {
            store,
            defaults,
            messages,
            min_duration,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// 当前链接下生效的奖品
    pub fn active_prizes(&self, encoded_config: Option<&str>) -> Vec<PrizeImage> {
        resolve_active_prizes(&self.defaults, encoded_config)
    }

    /// 指定会员的历史记录
    pub fn session(&self, member: &str) -> SessionStore {
        SessionStore::new(storage::scoped(&self.store, member))
    }

    /// 抽奖 (Spin)
    ///
    /// 逻辑:
    /// 1. 同一会员同时只允许一次抽奖进行中
    /// 2. 校验本月是否已抽过
    /// 3. 在生效奖品中均匀随机选取（稀有度不影响概率）
    /// 4. 并发执行消息生成与最短耗时计时，两者都完成后继续
    /// 5. 写入单槽历史（本月随即不可再抽）并返回结果
    pub async fn perform_draw(
        &self,
        member: &str,
        active_prizes: &[PrizeImage],
        now: DateTime<FixedOffset>,
    ) -> AppResult<SpinResult> {
        let _guard = self.begin(member)?;

        let session = self.session(member);
        if !is_eligible(session.load_last_result().as_ref(), &now) {
            return Err(AppError::AlreadyPlayed(period_key(&now)));
        }

        let selected_prize = select_prize(active_prizes)?.clone();

        let (message, _) = tokio::join!(
            self.messages.generate_message(&selected_prize.name),
            tokio::time::sleep(self.min_duration),
        );

        let result = SpinResult {
            prize: selected_prize,
            message,
            date: now.with_timezone(&Utc),
        };

        // 落盘是阻塞 IO，放到阻塞线程池执行
        let writer = session.clone();
        let persisted = result.clone();
        tokio::task::spawn_blocking(move || writer.record_result(&persisted))
            .await
            .map_err(|e| AppError::InternalError(format!("persist task failed: {e}")))??;
        log::info!(
            "Member {} drew {} for period {}",
            member,
            result.prize.id,
            period_key(&now)
        );

        Ok(result)
    }

    fn begin(&self, member: &str) -> AppResult<InFlightGuard> {
        let mut members = self
            .in_flight
            .lock()
            .map_err(|_| AppError::InternalError("draw guard poisoned".into()))?;
        if !members.insert(member.to_string()) {
            return Err(AppError::DrawInProgress);
        }
        Ok(InFlightGuard {
            members: self.in_flight.clone(),
            member: member.to_string(),
        })
    }
}

/// 按下标均匀随机
fn select_prize(prizes: &[PrizeImage]) -> AppResult<&PrizeImage> {
    if prizes.is_empty() {
        return Err(AppError::ValidationError("No prizes configured".into()));
    }
    let index = rand::rng().random_range(0..prizes.len());
    Ok(&prizes[index])
}
