#![allow(dead_code)]

use url::Url;

use super::citation::Citation;

/// タイトル・著者の区切りとみなす文字
///
/// 単語境界と句読点境界。ここで切ることで語の途中では切断しない。
const SEPARATORS: [char; 5] = [' ', ',', '.', ':', ';'];

/// タイトルを語数上限で切り詰める
///
/// 切断は直近の語・句読点境界で止まり、末尾の区切り文字は含めない。
/// 上限以下の語数なら元のタイトルをそのまま返す。
///
/// 5語に切り詰めると偽陰性が減り、偽陽性は目立って増えないことが
/// 運用上の観察で分かっている。
pub fn truncate_title_words(title: &str, max_words: usize) -> &str {
    if max_words == 0 {
        return title;
    }

    let mut completed_words = 0;
    let mut in_word = false;

    for (idx, c) in title.char_indices() {
        if SEPARATORS.contains(&c) {
            if in_word {
                completed_words += 1;
                if completed_words == max_words {
                    return &title[..idx];
                }
            }
            in_word = false;
        } else {
            in_word = true;
        }
    }

    title
}

/// 書誌からフォールバック検索URLを組み立てる
///
/// ISBNがあればISBNだけで検索する方が確実なのでそれを使う。
/// 無ければ切り詰めたタイトルと著者で検索する。
///
/// `max_title_words`が`None`なら切り詰めない。
pub fn build_search_url(
    base_url: &Url,
    citation: &Citation,
    max_title_words: Option<usize>,
) -> Url {
    let mut url = base_url.clone();

    {
        let mut pairs = url.query_pairs_mut();

        if let Some(isbn) = citation.normalized_isbn() {
            pairs.append_pair("isbn", isbn.as_str());
        } else {
            if let Some(title) = citation.title.as_deref().map(str::trim) {
                if !title.is_empty() {
                    let title = match max_title_words {
                        Some(max) => truncate_title_words(title, max),
                        None => title,
                    };
                    pairs.append_pair("title", title);
                }
            }
            if let Some(author) = citation.author.as_deref().map(str::trim) {
                if !author.is_empty() {
                    pairs.append_pair("author", author);
                }
            }
        }
    }

    url
}
