#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::value_objects::{RequestId, ResponseId, ServiceId};

// ============================================================================
// レスポンス種別
// ============================================================================

/// サービスレスポンスの種別タグ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceResponseKind {
    /// 代替の検索リンク（常に生成されるフォールバック）
    LinkToSearch,
    /// 申込フォームの表示指示（受取場所リスト付き）
    RequestPrompt,
    /// ベンダー側で入手不可と確認された
    NotAvailable,
    /// 申込処理の進行状況レコード
    RequestStatus,
}

impl ServiceResponseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LinkToSearch => "link_to_search",
            Self::RequestPrompt => "request_prompt",
            Self::NotAvailable => "not_available",
            Self::RequestStatus => "request_status",
        }
    }
}

impl std::str::FromStr for ServiceResponseKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "link_to_search" => Ok(Self::LinkToSearch),
            "request_prompt" => Ok(Self::RequestPrompt),
            "not_available" => Ok(Self::NotAvailable),
            "request_status" => Ok(Self::RequestStatus),
            other => Err(format!("Unknown service response kind: {}", other)),
        }
    }
}

// ============================================================================
// 申込ステータス
// ============================================================================

/// `request_status`レスポンスが取るステータス値
///
/// 状態機械：InProgress → Successful | Error。
/// ValidationErrorは利用者入力の問題を表す独立した終端状態で、
/// バックグラウンド処理を一切起動しない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    InProgress,
    Successful,
    Error,
    ValidationError,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Successful => "successful",
            Self::Error => "error",
            Self::ValidationError => "validation_error",
        }
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(Self::InProgress),
            "successful" => Ok(Self::Successful),
            "error" => Ok(Self::Error),
            "validation_error" => Ok(Self::ValidationError),
            other => Err(format!("Unknown submission status: {}", other)),
        }
    }
}

// ============================================================================
// ステータス更新パッチ
// ============================================================================

/// 任意フィールドの更新指示
///
/// `Keep`は既存値を保持、`Clear`は明示的に消去、`Set`は上書き。
/// 「指定しなかったフィールドは前の値を保つ」というマージ意味論を
/// 型で表現する。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Field<T> {
    #[default]
    Keep,
    Clear,
    Set(T),
}

impl<T> Field<T> {
    /// 既存値にこのパッチを適用した結果を返す
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            Self::Keep => current,
            Self::Clear => None,
            Self::Set(value) => Some(value),
        }
    }
}

/// Status Trackerに渡すフィールド集合
///
/// `status`は常に必須。他は`Field`のマージ意味論に従う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusFields {
    pub status: SubmissionStatus,
    pub request_number: Field<String>,
    pub error_user_message: Field<String>,
}

impl StatusFields {
    pub fn new(status: SubmissionStatus) -> Self {
        Self {
            status,
            request_number: Field::Keep,
            error_user_message: Field::Keep,
        }
    }

    pub fn with_request_number(mut self, request_number: impl Into<String>) -> Self {
        self.request_number = Field::Set(request_number.into());
        self
    }

    pub fn with_error_user_message(mut self, message: impl Into<String>) -> Self {
        self.error_user_message = Field::Set(message.into());
        self
    }

    pub fn clear_error_user_message(mut self) -> Self {
        self.error_user_message = Field::Clear;
        self
    }
}

// ============================================================================
// サービスレスポンス
// ============================================================================

/// ビューデータのキー
pub mod view_keys {
    pub const DISPLAY_TEXT: &str = "display_text";
    pub const NOTES: &str = "notes";
    pub const URL: &str = "url";
    pub const PICKUP_LOCATIONS: &str = "pickup_locations";
    pub const STATUS: &str = "status";
    pub const REQUEST_NUMBER: &str = "request_number";
    pub const ERROR_USER_MESSAGE: &str = "error_user_message";
}

/// サービスレスポンス - 解決リクエストに添付される型付きレコード
///
/// 種別タグと開いたキー/バリューのビューデータを持つ。
/// ビューデータは結果ページの描画にそのまま渡される。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse {
    pub id: ResponseId,
    pub request_id: RequestId,
    pub service_id: ServiceId,
    pub kind: ServiceResponseKind,
    pub view_data: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ServiceResponse {
    pub fn new(request_id: RequestId, service_id: ServiceId, kind: ServiceResponseKind) -> Self {
        let now = Utc::now();
        Self {
            id: ResponseId::new(),
            request_id,
            service_id,
            kind,
            view_data: Map::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// フォールバック検索リンクのレスポンスを組み立てる
    pub fn link_to_search(
        request_id: RequestId,
        service_id: ServiceId,
        url: impl Into<String>,
    ) -> Self {
        let mut response = Self::new(request_id, service_id, ServiceResponseKind::LinkToSearch);
        response.set(view_keys::DISPLAY_TEXT, "Check BorrowDirect for availability");
        response.set(view_keys::NOTES, "May be available in BorrowDirect");
        response.set(view_keys::URL, url.into());
        response
    }

    /// 申込フォーム表示のレスポンスを組み立てる
    pub fn request_prompt(
        request_id: RequestId,
        service_id: ServiceId,
        pickup_locations: Vec<String>,
    ) -> Self {
        let mut response = Self::new(request_id, service_id, ServiceResponseKind::RequestPrompt);
        response.set(view_keys::DISPLAY_TEXT, "Choose your delivery location");
        response.view_data.insert(
            view_keys::PICKUP_LOCATIONS.to_string(),
            json!(pickup_locations),
        );
        response
    }

    /// 入手不可のレスポンスを組み立てる
    pub fn not_available(request_id: RequestId, service_id: ServiceId) -> Self {
        let mut response = Self::new(request_id, service_id, ServiceResponseKind::NotAvailable);
        response.set(
            view_keys::DISPLAY_TEXT,
            "This item is not currently available from BorrowDirect",
        );
        response
    }

    fn set(&mut self, key: &str, value: impl Into<String>) {
        self.view_data
            .insert(key.to_string(), Value::String(value.into()));
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.view_data.get(key).and_then(Value::as_str)
    }

    pub fn url(&self) -> Option<&str> {
        self.get_str(view_keys::URL)
    }

    pub fn display_text(&self) -> Option<&str> {
        self.get_str(view_keys::DISPLAY_TEXT)
    }

    /// `request_prompt`レスポンスの受取場所リスト
    ///
    /// 受取場所キーが無い、または配列でない場合は空リスト。
    pub fn pickup_locations(&self) -> Vec<String> {
        self.view_data
            .get(view_keys::PICKUP_LOCATIONS)
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn status(&self) -> Option<SubmissionStatus> {
        self.get_str(view_keys::STATUS)?.parse().ok()
    }

    pub fn request_number(&self) -> Option<&str> {
        self.get_str(view_keys::REQUEST_NUMBER)
    }

    pub fn error_user_message(&self) -> Option<&str> {
        self.get_str(view_keys::ERROR_USER_MESSAGE)
    }

    /// ステータスフィールドをこのレスポンスへマージする
    ///
    /// `request_status`レスポンスにのみ意味を持つ。`Keep`のフィールドは
    /// 既存のビューデータを保ち、`Clear`はキーごと取り除く。
    pub fn merge_status_fields(&mut self, fields: StatusFields) {
        self.set(view_keys::STATUS, fields.status.as_str());

        let request_number = fields
            .request_number
            .apply(self.request_number().map(str::to_string));
        match request_number {
            Some(value) => self.set(view_keys::REQUEST_NUMBER, value),
            None => {
                self.view_data.remove(view_keys::REQUEST_NUMBER);
            }
        }

        let error_user_message = fields
            .error_user_message
            .apply(self.error_user_message().map(str::to_string));
        match error_user_message {
            Some(value) => self.set(view_keys::ERROR_USER_MESSAGE, value),
            None => {
                self.view_data.remove(view_keys::ERROR_USER_MESSAGE);
            }
        }

        self.updated_at = Utc::now();
    }
}
