//! 解析 WhatsApp 訂單訊息。
//!
//! 訊息可能來自店面的「Enviar por WhatsApp」按鈕，也可能是店員手動貼上的文字，
//! 所以這裡不會回傳錯誤：格式不對時最多只是少解析出幾行商品。

use crate::domain::model::{ParsedLineItem, ParsedOrder, DEFAULT_CUSTOMER_NAME};
use crate::utils::money::parse_localized_number;
use regex::{Captures, Regex};
use std::sync::LazyLock;

const PRODUCTS_DELIMITER: &str = r"---\s*PRODUCTOS\s*---";

struct LabeledField {
    label: Regex,
    stop: Regex,
}

impl LabeledField {
    fn new(label: &str, stops: &[&str]) -> Self {
        Self {
            label: Regex::new(&format!(r"(?i){}:\s*", label)).unwrap(),
            stop: Regex::new(&format!("(?i){}", stops.join("|"))).unwrap(),
        }
    }

    /// 值從標籤之後開始，到下一個已知標籤（或文字結尾）為止
    fn extract(&self, text: &str) -> Option<String> {
        let start = self.label.find(text)?.end();
        let rest = &text[start..];
        let end = self.stop.find(rest).map(|m| m.start()).unwrap_or(rest.len());
        Some(rest[..end].trim().to_string())
    }
}

static CUSTOMER_FIELD: LazyLock<LabeledField> = LazyLock::new(|| {
    LabeledField::new(
        "Cliente",
        &[r"Tel[eé]fono:", r"Direcci[oó]n:", "Notas:", PRODUCTS_DELIMITER, "TOTAL:"],
    )
});

static PHONE_FIELD: LazyLock<LabeledField> = LazyLock::new(|| {
    LabeledField::new(
        r"Tel[eé]fono",
        &[r"Direcci[oó]n:", "Notas:", PRODUCTS_DELIMITER, "TOTAL:"],
    )
});

static ADDRESS_FIELD: LazyLock<LabeledField> = LazyLock::new(|| {
    LabeledField::new(r"Direcci[oó]n", &["Notas:", PRODUCTS_DELIMITER, "TOTAL:"])
});

static NOTES_FIELD: LazyLock<LabeledField> =
    LazyLock::new(|| LabeledField::new("Notas", &[PRODUCTS_DELIMITER, "TOTAL:"]));

static DELIMITER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("(?i){}", PRODUCTS_DELIMITER)).unwrap());

static TOTAL_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)TOTAL:").unwrap());

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static EXTRA_SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

static INLINE_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([^\n\r]*?)\s*Cantidad:\s*([0-9]+)\s*Precio:\s*\$?([0-9.,]+)").unwrap()
});

// 邊界由 find_id_marker 以 ASCII 規則檢查，`\b` 在這裡會把 `Ñ` 當成字母
static ID_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:id|cod|codigo|sku|prod)\s*[:#-]?\s*([0-9]+)").unwrap()
});

static HASH_ID_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#\s*([0-9]+)").unwrap());

static QUANTITY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Cantidad:\s*([0-9]+)").unwrap());

static PRICE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Precio:\s*\$?([0-9.,]+)").unwrap());

static CLOSING_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^(Gracias|TOTAL)").unwrap());

/// 解析整則訂單訊息
pub fn parse_order(text: &str) -> ParsedOrder {
    let clean: String = text.chars().filter(|c| *c != '*' && *c != '\r').collect();

    let customer_name = CUSTOMER_FIELD
        .extract(&clean)
        .unwrap_or_else(|| DEFAULT_CUSTOMER_NAME.to_string());
    let phone = PHONE_FIELD.extract(&clean).unwrap_or_default();
    let address = ADDRESS_FIELD.extract(&clean).unwrap_or_default();
    let notes = NOTES_FIELD.extract(&clean).unwrap_or_default();

    let section = products_section(&clean);
    let mut line_items = extract_inline_items(section);
    if line_items.is_empty() && !section.trim().is_empty() {
        tracing::debug!("Inline product pattern found nothing, falling back to line-based parsing");
        line_items = extract_line_items(section);
    }

    tracing::debug!(
        "Parsed order for '{}' with {} line item(s)",
        customer_name,
        line_items.len()
    );

    ParsedOrder {
        customer_name,
        phone,
        address,
        notes,
        line_items,
    }
}

/// `--- PRODUCTOS ---` 之後、`TOTAL:` 之前的文字；沒有分隔線就是空字串
fn products_section(clean: &str) -> &str {
    let Some(section) = DELIMITER.split(clean).nth(1) else {
        return "";
    };

    match TOTAL_MARKER.split(section).next() {
        Some(before_total) if !before_total.is_empty() => before_total,
        _ => section,
    }
}

/// 主要解析方式：`<名稱> Cantidad: <n> Precio: $<金額>`，允許全部擠在同一行
pub fn extract_inline_items(section: &str) -> Vec<ParsedLineItem> {
    let collapsed = WHITESPACE.replace_all(section, " ");
    let collapsed = collapsed.trim();

    INLINE_ITEM
        .captures_iter(collapsed)
        .filter_map(|caps| {
            let (explicit_product_id, name_hint) = split_product_label(caps[1].trim());
            if !has_label(explicit_product_id, &name_hint) {
                return None;
            }

            // 同一行的寫法把 `Cantidad: 0` 視為漏填，當成 1
            let quantity = match parse_quantity(&caps[2]) {
                0 => 1,
                n => n,
            };

            Some(ParsedLineItem {
                explicit_product_id,
                name_hint,
                quantity,
                unit_price_hint: parse_localized_number(&caps[3]),
            })
        })
        .collect()
}

/// 備用解析方式：逐行讀取，`Precio:` 行結束目前的商品。
///
/// 最後一個沒有 `Precio:` 行的商品只在價格大於零時保留，
/// 而價格只會由 `Precio:` 行設定，所以實際上會被丟掉。
pub fn extract_line_items(section: &str) -> Vec<ParsedLineItem> {
    let mut items = Vec::new();
    let mut current: Option<ParsedLineItem> = None;

    for line in section.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(caps) = QUANTITY_LINE.captures(line) {
            if let Some(item) = current.as_mut() {
                item.quantity = parse_quantity(&caps[1]);
            }
        } else if let Some(caps) = PRICE_LINE.captures(line) {
            if let Some(mut item) = current.take() {
                item.unit_price_hint = parse_localized_number(&caps[1]);
                items.push(item);
            }
        } else if !CLOSING_LINE.is_match(line) {
            let (explicit_product_id, name_hint) = split_product_label(line);
            if has_label(explicit_product_id, &name_hint) {
                current = Some(ParsedLineItem {
                    explicit_product_id,
                    name_hint,
                    quantity: 1,
                    unit_price_hint: 0.0,
                });
            }
        }
    }

    if let Some(item) = current {
        if item.unit_price_hint > 0.0 {
            items.push(item);
        } else {
            tracing::debug!("Dropping trailing item '{}' without a price line", item.name_hint);
        }
    }

    items
}

/// 從名稱片段取出 `ID: 5`、`SKU-12`、`#7` 之類的編號，回傳 (編號, 清理後的名稱)
fn split_product_label(chunk: &str) -> (Option<u64>, String) {
    let id_match = find_id_marker(&ID_MARKER, chunk, true)
        .or_else(|| find_id_marker(&HASH_ID_MARKER, chunk, false));

    let mut name = chunk.to_string();
    let mut product_id = None;

    if let Some(caps) = id_match {
        product_id = caps[1].parse::<u64>().ok();
        name = name.replacen(&caps[0], "", 1);
        name = EXTRA_SPACES.replace_all(&name, " ").trim().to_string();
    }

    let cleaned = name.trim_start_matches(|c: char| !is_name_char(c)).trim();
    (product_id, cleaned.to_string())
}

/// 第一個前後都不緊接 ASCII 英數字或底線的編號標記
fn find_id_marker<'h>(marker: &Regex, chunk: &'h str, bounded_start: bool) -> Option<Captures<'h>> {
    let mut start = 0;
    while start <= chunk.len() {
        let caps = marker.captures_at(chunk, start)?;
        let whole = caps.get(0)?;

        let before_ok = !bounded_start
            || !chunk[..whole.start()].chars().next_back().is_some_and(is_ascii_word);
        let after_ok = !chunk[whole.end()..].chars().next().is_some_and(is_ascii_word);
        if before_ok && after_ok {
            return Some(caps);
        }

        start = whole.start() + chunk[whole.start()..].chars().next().map_or(1, char::len_utf8);
    }
    None
}

fn is_ascii_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "ÁÉÍÓÚáéíóúÑñ".contains(c)
}

/// 沒有名稱時需要有效編號；編號 0 不算
fn has_label(explicit_product_id: Option<u64>, name_hint: &str) -> bool {
    !name_hint.is_empty() || explicit_product_id.is_some_and(|id| id != 0)
}

/// 只有數字，解析失敗代表溢位
fn parse_quantity(digits: &str) -> u32 {
    digits.parse::<u32>().unwrap_or(u32::MAX)
}
