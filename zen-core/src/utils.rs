//! String helpers shared by the filters and the renderer

/// Split on `\r\n`, `\r` or `\n`
pub fn split_by_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;
    while let Some(index) = rest.find(['\r', '\n']) {
        lines.push(&rest[..index]);
        let skip = if rest[index..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[index + skip..];
    }
    lines.push(rest);
    lines
}

/// Indent every line but the first with `pad`
pub fn pad_string(text: &str, pad: &str) -> String {
    if pad.is_empty() {
        return text.to_string();
    }
    let lines = split_by_lines(text);
    let mut result = String::with_capacity(text.len() + pad.len() * lines.len());
    for (index, line) in lines.iter().enumerate() {
        if index > 0 {
            result.push('\n');
            result.push_str(pad);
        }
        result.push_str(line);
    }
    result
}

/// Leading spaces and tabs of `line`
pub fn line_padding(line: &str) -> &str {
    let end = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..end]
}

/// Padding of the line that contains byte offset `pos`
pub fn line_padding_at(text: &str, pos: usize) -> &str {
    let pos = pos.min(text.len());
    let line_start = text[..pos].rfind(['\n', '\r']).map_or(0, |i| i + 1);
    line_padding(&text[line_start..])
}

/// Strip `pad` from the start of every line that carries it
pub fn unindent_string(text: &str, pad: &str) -> String {
    if pad.is_empty() {
        return text.to_string();
    }
    split_by_lines(text)
        .iter()
        .map(|line| line.strip_prefix(pad).unwrap_or(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escape characters that have a meaning in output templates
pub fn escape_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == '$' || ch == '\\' {
            result.push('\\');
        }
        result.push(ch);
    }
    result
}

/// Left pad `value` with zeroes up to `width` digits
pub fn zero_pad(value: i64, width: usize) -> String {
    if value < 0 {
        format!("-{:0width$}", -value, width = width.saturating_sub(1))
    } else {
        format!("{value:0width$}")
    }
}

/// Replace the first `%s` in `template` with `value`
pub fn replace_placeholder(template: &str, value: &str) -> String {
    template.replacen("%s", value, 1)
}
