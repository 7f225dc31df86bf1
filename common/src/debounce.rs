//! デバウンスと世代カウンタ
//!
//! インクリメンタル検索の「最後のキー入力だけが発火する」保証と、
//! 「古いレスポンスが新しい状態を上書きしない」保証を担う。
//! タイマー実体やfetchはWASM層の仕事で、ここはIDの有効性だけを
//! 管理する純粋な状態機械。

use std::sync::atomic::{AtomicU64, Ordering};

/// キャンセル可能タイマーの状態機械
///
/// キー入力のたびにarm()で新しいタイマーIDを発行し、保留中のIDは
/// 無効化する。発火時にfire(id)が真を返すのは現役のIDだけなので、
/// タイマー実体を取り消せなくても、デバウンス窓の中で何度入力して
/// もコールバックが走るのは最後の1回になる。
#[derive(Debug, Default)]
pub struct DebounceState {
    /// 現役のタイマーID。0は「保留なし」
    live: AtomicU64,
    next: AtomicU64,
}

impl DebounceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// キー入力: 保留中のタイマーを無効化し、新しいタイマーIDを発行する
    pub fn arm(&self) -> u64 {
        let id = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        self.live.store(id, Ordering::Relaxed);
        id
    }

    /// 発火条件を満たさなくなった場合(文字数不足・フォーカス喪失・
    /// 候補の確定)の無効化
    pub fn disarm(&self) {
        self.live.store(0, Ordering::Relaxed);
    }

    /// タイマー発火。IDが現役の場合のみtrueを返し、消費する
    pub fn fire(&self, id: u64) -> bool {
        self.live
            .compare_exchange(id, 0, Ordering::Relaxed, Ordering::Relaxed)
            .is_ok()
    }

    pub fn is_armed(&self) -> bool {
        self.live.load(Ordering::Relaxed) != 0
    }
}

/// リクエスト世代カウンタ(last-query-wins)
///
/// リクエスト発行時にbegin()で世代を取り、完了時にis_current()が
/// 真の場合だけ結果を反映する。ネットワーク完了が前後しても
/// 古い世代の結果は捨てられる。
#[derive(Debug, Default)]
pub struct RequestSequence {
    current: AtomicU64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新しいリクエストを開始し、その世代を返す
    pub fn begin(&self) -> u64 {
        self.current.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// 指定した世代がまだ最新か
    pub fn is_current(&self, generation: u64) -> bool {
        self.current.load(Ordering::Relaxed) == generation
    }
}
