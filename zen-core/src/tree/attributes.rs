use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Merge repeated attributes, keeping the position of the first occurrence.
///
/// Names compare case-insensitively. Repeated `class` values are joined with a
/// space, any other repeated name takes the last value.
pub fn optimize_attributes(attrs: impl IntoIterator<Item = Attribute>) -> Vec<Attribute> {
    let mut result: Vec<Attribute> = Vec::new();
    for attr in attrs {
        match result
            .iter_mut()
            .find(|a| a.name.eq_ignore_ascii_case(&attr.name))
        {
            Some(existing) if attr.name.eq_ignore_ascii_case("class") => {
                if !existing.value.is_empty() && !attr.value.is_empty() {
                    existing.value.push(' ');
                }
                existing.value.push_str(&attr.value);
            }
            Some(existing) => existing.value = attr.value,
            None => result.push(attr),
        }
    }
    result
}
