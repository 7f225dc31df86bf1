//! デバウンス状態機械とブラウザタイマーの接続

use std::sync::Arc;

use gloo::timers::callback::Timeout;
use parts_locator_common::DebounceState;

/// キャンセル可能な遅延実行
///
/// scheduleを呼ぶたびに前のタイマーIDを無効化して張り直す。
/// タイマー実体は取り消さず発火時にIDを検査するので、走るのは
/// 常に最後のscheduleのコールバックだけ。
#[derive(Clone, Default)]
pub struct Debouncer {
    state: Arc<DebounceState>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule<F>(&self, delay_ms: u32, callback: F)
    where
        F: FnOnce() + 'static,
    {
        let id = self.state.arm();
        let state = Arc::clone(&self.state);
        Timeout::new(delay_ms, move || {
            if state.fire(id) {
                callback();
            }
        })
        .forget();
    }

    /// 保留中のコールバックを取り消す
    pub fn cancel(&self) {
        self.state.disarm();
    }
}
