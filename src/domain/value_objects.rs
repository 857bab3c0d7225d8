#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 解決リクエストID - ホストのリンクリゾルバが発行する識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// サービスレスポンスID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResponseId(Uuid);

impl ResponseId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for ResponseId {
    fn default() -> Self {
        Self::new()
    }
}

/// サービスID - ホストのサービスレジストリにおけるキー
///
/// ホスト側の設定ファイルで定義される文字列キー（例: "BorrowDirect"）。
/// UUIDではなく人間可読な識別子である点に注意。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceId(String);

impl ServiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ServiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// ISBN
///
/// 不変条件：ハイフン・空白を除去した正規化済みの形でのみ存在する。
/// 空文字列からは生成できない。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Isbn(String);

impl Isbn {
    /// 生のISBN文字列から正規化して生成する
    ///
    /// ハイフンと空白を取り除く。残りが空なら`None`。
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect();

        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Isbn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// 受取場所コード - 貸出資料を受け取る物理的な拠点
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PickupLocation(String);

impl PickupLocation {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PickupLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ID value objects のテスト
    #[test]
    fn test_request_id_creation() {
        let id1 = RequestId::new();
        let id2 = RequestId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_request_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = RequestId::from_uuid(uuid);
        assert_eq!(id.value(), uuid);
    }

    #[test]
    fn test_service_id_display() {
        let id = ServiceId::new("BorrowDirect");
        assert_eq!(id.as_str(), "BorrowDirect");
        assert_eq!(format!("{}", id), "BorrowDirect");
    }

    // Isbn のテスト
    #[test]
    fn test_isbn_strips_hyphens() {
        let isbn = Isbn::parse("978-0-306-40615-7").unwrap();
        assert_eq!(isbn.as_str(), "9780306406157");
    }

    #[test]
    fn test_isbn_strips_whitespace() {
        let isbn = Isbn::parse(" 0306406152 ").unwrap();
        assert_eq!(isbn.as_str(), "0306406152");
    }

    #[test]
    fn test_isbn_rejects_empty() {
        assert!(Isbn::parse("").is_none());
        assert!(Isbn::parse("  - - ").is_none());
    }

    #[test]
    fn test_pickup_location_equality() {
        assert_eq!(PickupLocation::new("one"), PickupLocation::new("one"));
        assert_ne!(PickupLocation::new("one"), PickupLocation::new("two"));
    }
}
