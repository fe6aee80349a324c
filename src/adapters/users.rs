use crate::domain::model::UserDetails;
use crate::domain::ports::UserDirectory;
use crate::utils::error::RxError;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// 以隨機延遲模擬遠端 API 的使用者服務
///
/// 延遲落在 `[0, max_delay_ms)`，失敗機率為 `failure_rate`。
/// 指定 seed 時，同一個使用者 id 的延遲與成敗每次都相同。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedUserDirectory {
    max_delay_ms: u64,
    seed: Option<u64>,
    failure_rate: f64,
}

impl SimulatedUserDirectory {
    pub fn new(max_delay: Duration, seed: Option<u64>) -> Self {
        Self {
            max_delay_ms: max_delay.as_millis() as u64,
            seed,
            failure_rate: 0.0,
        }
    }

    /// 機率超出 `[0, 1]` 時會被夾回範圍內；NaN 視為 0
    pub fn with_failure_rate(mut self, failure_rate: f64) -> Self {
        self.failure_rate = if failure_rate.is_nan() {
            0.0
        } else {
            failure_rate.clamp(0.0, 1.0)
        };
        self
    }

    fn rng_for(&self, user_id: u32) -> StdRng {
        match self.seed {
            Some(seed) => {
                StdRng::seed_from_u64(seed ^ u64::from(user_id).wrapping_mul(0x9E37_79B9_7F4A_7C15))
            }
            None => StdRng::from_entropy(),
        }
    }

    /// 回傳 (延遲毫秒, 是否失敗)
    fn plan(&self, user_id: u32) -> (u64, bool) {
        let mut rng = self.rng_for(user_id);
        let delay = if self.max_delay_ms == 0 {
            0
        } else {
            rng.gen_range(0..self.max_delay_ms)
        };
        (delay, rng.gen_bool(self.failure_rate))
    }
}

#[async_trait]
impl UserDirectory for SimulatedUserDirectory {
    async fn fetch_user(&self, user_id: u32) -> Result<UserDetails, RxError> {
        let (delay, fails) = self.plan(user_id);
        tracing::debug!("🌐 Fetching user {} (simulated latency {}ms)", user_id, delay);
        tokio::time::sleep(Duration::from_millis(delay)).await;

        if fails {
            tracing::warn!("⚠️ Simulated fetch of user {} failed", user_id);
            return Err(RxError::FetchFailed {
                user_id,
                reason: "simulated network failure".to_string(),
            });
        }
        Ok(UserDetails::new(user_id, delay))
    }
}
