#![allow(dead_code)]

use serde::{Deserialize, Serialize};

/// ディスパッチレコードの完了マーカー
///
/// ホストのサービスディスパッチ基盤が所有するレコードで、このサブシステムは
/// 遷移の書き込みだけを行う。タイムアウトによる陳腐化検出もホスト側の責務。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStatus {
    /// 処理中。再設定するとホストの陳腐化タイマーが巻き直される。
    InProgress,
    Successful,
    /// 一時的な失敗。ホストの再試行機構の対象になる。
    FailedTemporary,
    /// 恒久的な失敗。この申込については再試行されない。
    FailedFatal,
}

impl DispatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Successful => "successful",
            Self::FailedTemporary => "failed_temporary",
            Self::FailedFatal => "failed_fatal",
        }
    }

    /// 失敗系の状態か
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::FailedTemporary | Self::FailedFatal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_classification() {
        assert!(DispatchStatus::FailedTemporary.is_failure());
        assert!(DispatchStatus::FailedFatal.is_failure());
        assert!(!DispatchStatus::InProgress.is_failure());
        assert!(!DispatchStatus::Successful.is_failure());
    }
}
