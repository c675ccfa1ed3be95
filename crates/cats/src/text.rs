//! Statement text helpers: paragraph splitting and locale headings.

/// Split statement text into paragraphs.
///
/// Lines are concatenated with no separator until an empty line. A run of
/// empty lines ends one paragraph; a line of spaces is still content.
pub fn paragraphs(text: Option<&str>) -> Vec<String> {
    let Some(text) = text else { return Vec::new() };

    let mut result = Vec::new();
    let mut current = String::new();
    for line in text.lines() {
        if !line.is_empty() {
            current.push_str(line);
        } else if !current.is_empty() {
            result.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        result.push(current);
    }
    result
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingKind {
    Interaction,
    Notes,
}

/// Locales with their own heading strings
pub fn has_headings(lang: &str) -> bool {
    matches!(lang, "ru" | "en")
}

/// Heading text for a sub-block appended under `OutputFormat`.
/// Locales without their own strings get the English ones.
pub fn heading(kind: HeadingKind, lang: &str) -> &'static str {
    match (kind, lang) {
        (HeadingKind::Interaction, "ru") => "Протокол взаимодействия",
        (HeadingKind::Notes, "ru") => "Примечание",
        (HeadingKind::Interaction, _) => "Interaction",
        (HeadingKind::Notes, _) => "Notes",
    }
}
