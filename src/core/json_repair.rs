use crate::utils::error::{EtlError, Result};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct RepairOutcome {
    pub value: Value,
    /// 是否經過修復才解析成功
    pub repaired: bool,
}

/// 解析 JSON；失敗時移除註解與結尾逗號後再試一次。
///
/// 第二次仍失敗就回傳解碼錯誤，不再做其他修復。
pub fn repair(text: &str) -> Result<RepairOutcome> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Ok(RepairOutcome {
            value,
            repaired: false,
        }),
        Err(first) => {
            tracing::warn!(
                "⚠️ JSON decode failed at line {}, column {}: {}. Attempting repair",
                first.line(),
                first.column(),
                first
            );

            let fixed = strip_trailing_commas(&strip_comments(text));
            let value = serde_json::from_str::<Value>(&fixed).map_err(|e| {
                EtlError::JsonRepairError {
                    line: e.line(),
                    column: e.column(),
                    message: e.to_string(),
                }
            })?;

            tracing::info!("🔧 JSON repaired successfully");
            Ok(RepairOutcome {
                value,
                repaired: true,
            })
        }
    }
}

/// 移除 `//` 與 `/* */` 註解，字串內容不受影響
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }

    out
}

/// 移除 `}` 或 `]` 之前多餘的逗號，字串內容不受影響
pub fn strip_trailing_commas(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' if closes_container(&text[i + 1..]) => {}
            _ => out.push(c),
        }
    }

    out
}

fn closes_container(rest: &str) -> bool {
    matches!(rest.trim_start().chars().next(), Some('}' | ']'))
}
