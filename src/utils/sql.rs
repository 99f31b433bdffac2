/// LIKE 转义字符
pub const LIKE_ESCAPE_CHAR: char = '!';

/// 转义 LIKE 通配符（`%`、`_` 以及转义字符本身），配合 `ESCAPE '!'` 使用
pub fn escape_like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE_CHAR) {
            escaped.push(LIKE_ESCAPE_CHAR);
        }
        escaped.push(ch);
    }
    escaped
}

/// 构造忽略大小写的 "包含" 匹配串
pub fn contains_pattern(input: &str) -> String {
    format!("%{}%", escape_like_pattern(&input.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_pattern() {
        assert_eq!(escape_like_pattern("50%_off!"), "50!%!_off!!");
        assert_eq!(escape_like_pattern("plain"), "plain");
    }

    #[test]
    fn test_contains_pattern_lowercases() {
        assert_eq!(contains_pattern("Grade_1"), "%grade!_1%");
    }
}
