#![allow(dead_code)]

use std::time::Duration;
use url::Url;

/// 申込エンドポイントが受け付けるHTTPメソッド
///
/// 既定はGET。POSTボディを正しく中継しないSSOフロントドアが存在するため、
/// 互換性の観点からGETを既定にしている。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMethod {
    Get,
    Post,
}

impl SubmitMethod {
    pub fn from_env_value(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "get" => Some(Self::Get),
            "post" => Some(Self::Post),
            _ => None,
        }
    }
}

/// サブシステム全体の設定
///
/// CLIではなく、ホストアプリケーションの構成から渡される値の集合。
/// 値オブジェクトとして構築時に一度だけ渡され、以後は不変。
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// 利用者向け表示名
    pub display_name: String,
    /// コンソーシアムにおける自館のシンボル
    pub library_symbol: String,
    /// 可用性プリチェック（FindItem）に使う代表バーコード
    pub find_item_patron_barcode: String,
    /// ベンダー呼び出しのタイムアウト
    ///
    /// ベンダーは遅い。既定20秒。これ以上長くするとホスト側の
    /// リクエスト処理タイムアウトと競合し始める。
    pub vendor_timeout: Duration,
    /// フォールバック検索リンクのベースURL
    pub search_base_url: Url,
    /// タイトル切り詰めの語数上限。`None`で無効化。
    pub limit_title_words: Option<usize>,
    /// この参照元IDから来たリクエストは処理しない
    ///
    /// ベンダー自身から遷移してきた場合にベンダーを再検索しないため。
    pub suppress_referrer_ids: Vec<String>,
    /// 「地元で入手可能」とみなす所蔵ステータス
    pub available_statuses: Vec<String>,
    /// 申込後リダイレクト先のホワイトリスト仕様
    pub redirect_whitelist: Vec<String>,
    /// リモートプリチェックを無効化するトグル
    pub enable_precheck: bool,
    /// FindItem成功時にもログを出す（エラー率の観察用）
    pub log_find_item_success: bool,
    /// 申込エンドポイントのHTTPメソッド
    pub submit_method: SubmitMethod,
    /// 結果ページ（解決メニュー）のベースURL
    pub resolve_base_url: Url,
    /// 受取場所未選択時に利用者へ見せるメッセージ
    ///
    /// 実際のローカライズはホストの責務。ここでは既定の文言を持つだけ。
    pub pickup_validation_message: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            display_name: "BorrowDirect".to_string(),
            library_symbol: String::new(),
            find_item_patron_barcode: String::new(),
            vendor_timeout: Duration::from_secs(20),
            search_base_url: Url::parse("https://borrow-direct.example.edu/search")
                .expect("default search base URL is valid"),
            limit_title_words: Some(5),
            suppress_referrer_ids: vec!["info:sid/BD".to_string()],
            available_statuses: vec!["Available".to_string()],
            redirect_whitelist: Vec::new(),
            enable_precheck: true,
            log_find_item_success: false,
            submit_method: SubmitMethod::Get,
            resolve_base_url: Url::parse("http://localhost:3000/resolve")
                .expect("default resolve base URL is valid"),
            pickup_validation_message:
                "You must select a pickup location to place a request.".to_string(),
        }
    }
}

impl GatewayConfig {
    /// 環境変数から設定を組み立てる
    ///
    /// 指定の無い変数は既定値のまま。URLの形式エラーは起動時に落とす。
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(symbol) = std::env::var("BD_LIBRARY_SYMBOL") {
            config.library_symbol = symbol;
        }
        if let Ok(barcode) = std::env::var("BD_FIND_ITEM_PATRON_BARCODE") {
            config.find_item_patron_barcode = barcode;
        }
        if let Ok(secs) = std::env::var("BD_VENDOR_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse::<u64>() {
                config.vendor_timeout = Duration::from_secs(secs);
            }
        }
        if let Ok(base) = std::env::var("BD_SEARCH_BASE_URL") {
            config.search_base_url =
                Url::parse(&base).expect("BD_SEARCH_BASE_URL must be a valid absolute URL");
        }
        if let Ok(base) = std::env::var("BD_RESOLVE_BASE_URL") {
            config.resolve_base_url =
                Url::parse(&base).expect("BD_RESOLVE_BASE_URL must be a valid absolute URL");
        }
        if let Ok(whitelist) = std::env::var("BD_REDIRECT_WHITELIST") {
            config.redirect_whitelist = whitelist
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Ok(value) = std::env::var("BD_ENABLE_PRECHECK") {
            config.enable_precheck = value != "0" && value.to_ascii_lowercase() != "false";
        }
        if let Ok(value) = std::env::var("BD_SUBMIT_METHOD") {
            if let Some(method) = SubmitMethod::from_env_value(&value) {
                config.submit_method = method;
            }
        }

        config
    }
}
