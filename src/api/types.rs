use serde::Deserialize;

/// 申込エンドポイントのパラメータ
///
/// GETではクエリ文字列、POSTではフォームボディから同じ形で読む。
#[derive(Debug, Deserialize)]
pub struct SubmitParams {
    /// 受取場所コード（必須。欠落はValidationErrorとして記録される）
    pub pickup_location: Option<String>,
    /// 申込後に戻る絶対URL（任意。ホワイトリスト検証を通った時だけ尊重）
    pub redirect: Option<String>,
}
