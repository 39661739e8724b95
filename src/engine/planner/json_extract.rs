// ==========================================
// 高校排课系统 - 模型输出 JSON 提取
// ==========================================
// 模型文本不保证是纯 JSON，前后可能夹带说明文字
// 提取策略可替换，与解析/重建逻辑解耦
// ==========================================

/// JSON 对象提取策略
pub trait JsonExtractor: Send + Sync {
    /// 从任意文本中取出顶层 JSON 对象子串；找不到返回 None
    fn extract<'a>(&self, text: &'a str) -> Option<&'a str>;
}

// ==========================================
// BalancedBraceExtractor - 括号配平提取（默认）
// ==========================================
// 只从第一个 '{' 开始单趟扫描；该对象未闭合则视为没有 JSON 对象
// 字符串内的括号与转义不计入深度
#[derive(Debug, Default, Clone, Copy)]
pub struct BalancedBraceExtractor;

impl BalancedBraceExtractor {
    fn balanced_end(text: &str, start: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        for (offset, ch) in text[start..].char_indices() {
            if in_string {
                match ch {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match ch {
                '"' => in_string = true,
                '{' => depth += 1,
                '}' => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(start + offset);
                    }
                }
                _ => {}
            }
        }
        None
    }
}

impl JsonExtractor for BalancedBraceExtractor {
    fn extract<'a>(&self, text: &'a str) -> Option<&'a str> {
        let start = text.find('{')?;
        let end = Self::balanced_end(text, start)?;
        Some(&text[start..=end])
    }
}

// ==========================================
// GreedyBraceExtractor - 首个 '{' 到最后一个 '}'
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyBraceExtractor;

impl JsonExtractor for GreedyBraceExtractor {
    fn extract<'a>(&self, text: &'a str) -> Option<&'a str> {
        let start = text.find('{')?;
        let end = text.rfind('}')?;
        if end <= start {
            return None;
        }
        Some(&text[start..=end])
    }
}
