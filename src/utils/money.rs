//! 哥倫比亞格式的金額：`.` 是千位分隔符，`,` 是小數點。
//!
//! 只支援這一種地區格式；`1.234,5` 和 `1,234.5` 不會被當成同一個數字。

/// 解析 `$36.000`、`12.500,50` 這類金額。
///
/// 先移除所有 `.`，再把第一個 `,` 換成小數點，取最長的合法數字前綴。
/// 無法解析時回傳 `0.0`，不會失敗。
pub fn parse_localized_number(raw: &str) -> f64 {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',')
        .collect();
    let normalized = digits.replacen(',', ".", 1);

    let mut seen_dot = false;
    let prefix: String = normalized
        .chars()
        .take_while(|c| {
            if *c == '.' {
                if seen_dot {
                    return false;
                }
                seen_dot = true;
                return true;
            }
            c.is_ascii_digit()
        })
        .collect();

    prefix.parse::<f64>().unwrap_or(0.0)
}

/// 以 es-CO 慣例輸出金額，例如 `36000.0` → `36.000`，最多三位小數。
pub fn format_price(value: f64) -> String {
    let negative = value < 0.0;
    let scaled = (value.abs() * 1000.0).round() as u64;
    let integer = scaled / 1000;
    let fraction = scaled % 1000;

    let raw = integer.to_string();
    let mut grouped = String::with_capacity(raw.len() + raw.len() / 3);
    for (i, c) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    if fraction > 0 {
        let frac = format!("{:03}", fraction);
        grouped.push(',');
        grouped.push_str(frac.trim_end_matches('0'));
    }

    if negative && (integer > 0 || fraction > 0) {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
