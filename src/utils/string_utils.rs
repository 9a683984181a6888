/// String utility functions
pub struct StringUtils;

impl StringUtils {
    /// Sanitize a string for use as a file name: invalid characters become
    /// underscores, whitespace collapses, length is capped.
    pub fn sanitize_filename(name: &str) -> String {
        let replaced: String = name
            .chars()
            .map(|c| match c {
                '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
                other => other,
            })
            .collect();

        let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join("_");
        collapsed.chars().take(100).collect()
    }

    /// Format a number compactly for display: 1.2M, 3.4K, otherwise plain.
    pub fn format_compact(value: f64) -> String {
        if value >= 1_000_000.0 {
            format!("{:.1}M", value / 1_000_000.0)
        } else if value >= 1_000.0 {
            format!("{:.1}K", value / 1_000.0)
        } else {
            format!("{:.0}", value)
        }
    }

    /// Turn a snake_case field name into a display heading
    /// ("anno_fondazione" -> "Anno Fondazione").
    pub fn title_case_field(field: &str) -> String {
        field
            .split('_')
            .filter(|part| !part.is_empty())
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
