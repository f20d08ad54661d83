//! Query Engine
//! フィルタ + ページング + ソートを SQL に変換して実行する
//!
//! フィルタは全て AND 結合。total はページング適用前の件数で、
//! 範囲外ページは空の items と正しい totalPages を返す（エラーに
//! しない）。同値ソートキーは artist_id の昇順で安定化する。

use serde::Serialize;

use crate::db::DbPool;
use crate::models::Artist;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

// ========================================
// Filter / Options
// ========================================

/// Artist 検索フィルタ（全フィールド任意、AND結合）
#[derive(Debug, Default, Clone)]
pub struct ArtistFilter {
    /// genres 配列のいずれかと完全一致（大文字小文字無視）
    pub genre: Option<String>,
    /// country の部分一致（大文字小文字無視）
    pub country: Option<String>,
    /// popularity_score >= しきい値
    pub min_popularity: Option<i64>,
    /// name または description の部分一致（大文字小文字無視）
    pub q: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    PopularityScore,
    DebutYear,
    Country,
    CreatedAt,
}

impl SortField {
    /// 未知のフィールド名は name にフォールバック（SQLに直接埋め込む
    /// ため、ホワイトリスト以外は通さない）
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("popularity_score") => SortField::PopularityScore,
            Some("debut_year") => SortField::DebutYear,
            Some("country") => SortField::Country,
            Some("createdAt") | Some("created_at") => SortField::CreatedAt,
            _ => SortField::Name,
        }
    }

    /// ORDER BY 式。テキスト列は NOCASE で比較
    fn sort_expr(&self) -> &'static str {
        match self {
            SortField::Name => "name COLLATE NOCASE",
            SortField::PopularityScore => "popularity_score",
            SortField::DebutYear => "debut_year",
            SortField::Country => "country COLLATE NOCASE",
            SortField::CreatedAt => "created_at_ms",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }

    fn keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// ページング + ソートオプション
#[derive(Debug, Clone)]
pub struct ListOptions {
    pub page: i64,
    pub limit: i64,
    pub sort_by: SortField,
    pub order: SortOrder,
}

impl ListOptions {
    /// 生のクエリ文字列から組み立てる。非数値・非正値はデフォルトに
    /// フォールバック（limit=0 もデフォルトへクランプ）
    pub fn from_raw(
        page: Option<&str>,
        limit: Option<&str>,
        sort_by: Option<&str>,
        order: Option<&str>,
    ) -> Self {
        Self {
            page: coerce_positive(page, DEFAULT_PAGE),
            limit: coerce_positive(limit, DEFAULT_LIMIT),
            sort_by: SortField::parse(sort_by),
            order: SortOrder::parse(order),
        }
    }
}

fn coerce_positive(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(default)
}

/// minPopularity の緩い解釈: 数値でなければフィルタなし扱い
pub fn coerce_min_popularity(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
}

// ========================================
// Result Envelope
// ========================================

/// ページング済みレスポンス
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl Fn(&T) -> U) -> Page<U> {
        Page {
            items: self.items.iter().map(&f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}

pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total == 0 {
        0
    } else {
        (total + limit - 1) / limit
    }
}

// ========================================
// Query Execution
// ========================================

enum SqlArg {
    Text(String),
    Int(i64),
}

/// LIKE パターン中のワイルドカードを無効化する
fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

/// フィルタから WHERE 句とバインド引数を組み立てる
fn build_where(filter: &ArtistFilter) -> (String, Vec<SqlArg>) {
    let mut clauses: Vec<&'static str> = Vec::new();
    let mut args: Vec<SqlArg> = Vec::new();

    if let Some(genre) = &filter.genre {
        clauses.push(
            "EXISTS (SELECT 1 FROM json_each(artists.genres) \
             WHERE lower(json_each.value) = lower(?))",
        );
        args.push(SqlArg::Text(genre.clone()));
    }
    if let Some(country) = &filter.country {
        clauses.push("country LIKE '%' || ? || '%' ESCAPE '\\'");
        args.push(SqlArg::Text(escape_like(country)));
    }
    if let Some(min) = filter.min_popularity {
        clauses.push("popularity_score >= ?");
        args.push(SqlArg::Int(min));
    }
    if let Some(q) = &filter.q {
        clauses.push(
            "(name LIKE '%' || ? || '%' ESCAPE '\\' \
             OR description LIKE '%' || ? || '%' ESCAPE '\\')",
        );
        let escaped = escape_like(q);
        args.push(SqlArg::Text(escaped.clone()));
        args.push(SqlArg::Text(escaped));
    }

    if clauses.is_empty() {
        (String::new(), args)
    } else {
        (format!(" WHERE {}", clauses.join(" AND ")), args)
    }
}

/// フィルタ済み・ソート済み・ページング済みの Artist 一覧を返す
pub async fn list_artists(
    pool: &DbPool,
    filter: &ArtistFilter,
    opts: &ListOptions,
) -> Result<Page<Artist>, sqlx::Error> {
    let (where_clause, args) = build_where(filter);

    // total はページング適用前に数える
    let count_sql = format!("SELECT COUNT(*) FROM artists{}", where_clause);
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_query = match arg {
            SqlArg::Text(s) => count_query.bind(s.clone()),
            SqlArg::Int(n) => count_query.bind(*n),
        };
    }
    let total = count_query.fetch_one(pool).await?;

    let select_sql = format!(
        "SELECT * FROM artists{} ORDER BY {} {}, artist_id ASC LIMIT ? OFFSET ?",
        where_clause,
        opts.sort_by.sort_expr(),
        opts.order.keyword(),
    );
    let mut select_query = sqlx::query_as::<_, Artist>(&select_sql);
    for arg in &args {
        select_query = match arg {
            SqlArg::Text(s) => select_query.bind(s.clone()),
            SqlArg::Int(n) => select_query.bind(*n),
        };
    }
    let offset = (opts.page - 1) * opts.limit;
    let items = select_query
        .bind(opts.limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok(Page {
        items,
        total,
        page: opts.page,
        limit: opts.limit,
        total_pages: total_pages(total, opts.limit),
    })
}

// ========================================
// Tests
// ========================================
