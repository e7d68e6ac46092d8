//! 文本归一化: 去标点、合并空白、去首尾空白、转小写

/// 生成用于比较的规范文本
///
/// 只保留字母、数字和空白; 连续空白合并为单个空格; 去掉首尾空白; 全部转小写。
/// 对任意输入都有定义, 空输入返回空串。
pub fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_space = false;

    for c in input.chars() {
        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if !c.is_alphanumeric() {
            continue;
        }
        // 个别字符小写后会带出组合符号, 一并过滤, 保证结果再次归一化不变
        for lower in c.to_lowercase().filter(|l| l.is_alphanumeric()) {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(lower);
        }
    }

    out
}
