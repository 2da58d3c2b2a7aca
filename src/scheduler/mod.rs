/// 경매 만료 스케줄러
/// 입찰, 조회 경로는 모두 접근 시점에 만료를 반영하므로 정확성은 이 스케줄러에 의존하지 않는다.
/// 방문되지 않은 경매의 is_active 값을 주기적으로 맞춰 주는 역할만 한다.
// region:    --- Imports
use crate::auction::commands::sweep_expired;
use crate::store::MarketStore;
use chrono::Utc;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error};

// endregion: --- Imports

// region:    --- Expiry Sweeper
/// 경매 만료 스케줄러
pub struct ExpirySweeper {
    store: Arc<dyn MarketStore>,
    period: Duration,
}

impl ExpirySweeper {
    pub fn new(store: Arc<dyn MarketStore>, period: Duration) -> Self {
        Self { store, period }
    }

    /// 스케줄러 시작
    pub fn start(&self) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let period = self.period;
        tokio::spawn(async move {
            let mut interval = interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                Self::run_once(store.as_ref()).await;
            }
        })
    }

    /// 만료 반영 1회 실행
    pub async fn run_once(store: &dyn MarketStore) -> u64 {
        match sweep_expired(store, Utc::now()).await {
            Ok(expired) => {
                debug!(
                    "{:<12} --> 경매 상태가 성공적으로 업데이트되었습니다. ({}건)",
                    "Scheduler", expired
                );
                expired
            }
            Err(e) => {
                error!(
                    "{:<12} --> 경매 상태 업데이트 중 오류 발생: {:?}",
                    "Scheduler", e
                );
                0
            }
        }
    }
}
// endregion: --- Expiry Sweeper
