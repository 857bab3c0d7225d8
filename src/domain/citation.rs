#![allow(dead_code)]

use serde::{Deserialize, Serialize};

use super::value_objects::{Isbn, RequestId};

/// 所蔵レコードとの照合信頼度
///
/// ホストの所蔵探索サービスが書誌と所蔵を照合した際の確度。
/// `Unsure`の所蔵は「地元で入手可能」の根拠として扱わない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchReliability {
    Exact,
    Unsure,
}

/// 所蔵サマリ - ホストの所蔵レスポンスのうち可用性判定に必要な部分
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    /// 所蔵ステータス文字列（例: "Available", "Checked Out"）
    pub status: String,
    pub match_reliability: MatchReliability,
}

/// 書誌の種別タグ
///
/// OpenURLのgenre相当。逐次刊行物・論文の判定に使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    Book,
    Journal,
    Article,
    Issue,
    Unknown,
}

impl Default for Genre {
    fn default() -> Self {
        Self::Unknown
    }
}

/// 書誌 - ホストの書誌モデルに対するこのサブシステムの読み取りビュー
///
/// ホストが所有する完全な書誌モデルのうち、直接借受の判定と
/// 検索リンク生成に必要なフィールドだけを持つ。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Citation {
    pub title: Option<String>,
    pub author: Option<String>,
    /// 論文タイトル。存在すれば論文レベルの引用とみなす。
    pub article_title: Option<String>,
    /// 生のISBN（ハイフン付きのままで良い）
    pub isbn: Option<String>,
    pub issn: Option<String>,
    #[serde(default)]
    pub genre: Genre,
}

impl Citation {
    /// 正規化済みISBNを返す
    ///
    /// ハイフン・空白を除去した形。無い、または除去後に空なら`None`。
    pub fn normalized_isbn(&self) -> Option<Isbn> {
        self.isbn.as_deref().and_then(Isbn::parse)
    }

    /// 逐次刊行物・論文らしい書誌か
    ///
    /// 直接借受は単行本のみが対象。以下のいずれかで除外する：
    /// - genreがjournal/article/issue
    /// - 論文タイトルを持つ（論文レベルの引用）
    /// - ISSNだけを持ちISBNが無い
    pub fn is_serial_like(&self) -> bool {
        if matches!(self.genre, Genre::Journal | Genre::Article | Genre::Issue) {
            return true;
        }

        if self.article_title.as_deref().is_some_and(|t| !t.is_empty()) {
            return true;
        }

        self.issn.as_deref().is_some_and(|s| !s.is_empty()) && self.normalized_isbn().is_none()
    }
}

/// 解決リクエスト - 1件の書誌に対する利用者の解決試行
///
/// ホストがこのサブシステムの実行前に作成する。ここでは読み取りビュー。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitationRequest {
    pub id: RequestId,
    /// OpenURLのrfr_id（参照元識別子）
    pub referrer_id: Option<String>,
    pub citation: Citation,
    /// ホストの所蔵探索が付与した所蔵サマリ
    #[serde(default)]
    pub holdings: Vec<Holding>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book_citation(isbn: Option<&str>) -> Citation {
        Citation {
            title: Some("Biological foundations of language".to_string()),
            author: Some("Lenneberg, Eric H.".to_string()),
            isbn: isbn.map(str::to_string),
            genre: Genre::Book,
            ..Citation::default()
        }
    }

    #[test]
    fn test_book_is_not_serial_like() {
        assert!(!book_citation(Some("978-0-471-40718-8")).is_serial_like());
        assert!(!book_citation(None).is_serial_like());
    }

    #[test]
    fn test_journal_genre_is_serial_like() {
        let citation = Citation {
            title: Some("The Atlantic monthly".to_string()),
            genre: Genre::Journal,
            ..Citation::default()
        };
        assert!(citation.is_serial_like());
    }

    #[test]
    fn test_article_title_is_serial_like() {
        let citation = Citation {
            title: Some("The Atlantic monthly".to_string()),
            article_title: Some("The coming anarchy".to_string()),
            ..Citation::default()
        };
        assert!(citation.is_serial_like());
    }

    #[test]
    fn test_issn_without_isbn_is_serial_like() {
        let citation = Citation {
            title: Some("The Atlantic monthly".to_string()),
            issn: Some("1072-7825".to_string()),
            ..Citation::default()
        };
        assert!(citation.is_serial_like());
    }

    #[test]
    fn test_issn_with_isbn_is_not_serial_like() {
        // 年刊など、ISSNとISBNの両方を持つ単行本相当は対象に残す
        let citation = Citation {
            issn: Some("1072-7825".to_string()),
            isbn: Some("9789810743734".to_string()),
            ..Citation::default()
        };
        assert!(!citation.is_serial_like());
    }

    #[test]
    fn test_normalized_isbn() {
        let citation = book_citation(Some("978-981-07-4373-4"));
        assert_eq!(
            citation.normalized_isbn().unwrap().as_str(),
            "9789810743734"
        );
        assert!(book_citation(Some("--")).normalized_isbn().is_none());
    }
}
