pub const DEFAULT_HEADING: &str = "Safari Gold: (Summary)";

pub const DEFAULT_SECTIONS: [&str; 6] = [
    "Painstorming",
    "Buys",
    "Recommendations",
    "Hidden Pains",
    "Jargons",
    "Worldviews",
];

pub fn default_sections() -> Vec<String> {
    DEFAULT_SECTIONS.iter().map(|s| s.to_string()).collect()
}

/// Fills the note template. Pure: the date arrives already formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRenderer {
    heading: String,
    sections: Vec<String>,
    placeholder: String,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self {
            heading: DEFAULT_HEADING.to_string(),
            sections: default_sections(),
            placeholder: String::new(),
        }
    }
}

impl TemplateRenderer {
    pub fn new(heading: String, sections: Vec<String>, placeholder: String) -> Self {
        Self {
            heading,
            sections,
            placeholder,
        }
    }

    pub fn render(
        &self,
        source_url: &str,
        thread_title: Option<&str>,
        site_name: Option<&str>,
        current_date: &str,
    ) -> String {
        let thread_title = thread_title.unwrap_or(&self.placeholder);
        let site_name = site_name.unwrap_or(&self.placeholder);

        let mut document = format!(
            "# {heading}\n\
             \n> [{thread_title}]({source_url})\n\n\
             From: {site_name}  \n\
             Analysis date: {current_date}  \n\
             Post date: YYYY-MM-DD\n",
            heading = self.heading,
        );

        // 每個章節下方多留一行空白給手動註記
        for section in &self.sections {
            document.push_str(&format!("\n## {}\n\n", section));
        }

        document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPECTED: &str = "# Safari Gold: (Summary)\n\
\n\
> [Thread About Widgets](https://forum.example.com/t/1)\n\
\n\
From: MyForum  \n\
Analysis date: 2024-03-09  \n\
Post date: YYYY-MM-DD\n\
\n\
## Painstorming\n\
\n\
\n\
## Buys\n\
\n\
\n\
## Recommendations\n\
\n\
\n\
## Hidden Pains\n\
\n\
\n\
## Jargons\n\
\n\
\n\
## Worldviews\n\
\n";

    #[test]
    fn test_render_exact_layout() {
        let renderer = TemplateRenderer::default();
        let document = renderer.render(
            "https://forum.example.com/t/1",
            Some("Thread About Widgets"),
            Some("MyForum"),
            "2024-03-09",
        );
        assert_eq!(document, EXPECTED);
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = TemplateRenderer::default();
        let first = renderer.render("https://a.example", Some("T"), None, "2024-01-01");
        let second = renderer.render("https://a.example", Some("T"), None, "2024-01-01");
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_missing_values_use_placeholder() {
        let renderer = TemplateRenderer::default();
        let document = renderer.render("https://a.example", None, None, "2024-01-01");
        assert!(document.contains("> [](https://a.example)\n"));
        assert!(document.contains("From:   \n"));
        assert!(!document.contains("None"));
        assert!(!document.contains("null"));

        let renderer = TemplateRenderer::new(
            DEFAULT_HEADING.to_string(),
            default_sections(),
            "(unknown)".to_string(),
        );
        let document = renderer.render("https://a.example", Some("Title"), None, "2024-01-01");
        assert!(document.contains("From: (unknown)  \n"));
    }

    #[test]
    fn test_render_custom_sections() {
        let renderer = TemplateRenderer::new(
            "Reading Notes".to_string(),
            vec!["Quotes".to_string()],
            String::new(),
        );
        let document = renderer.render("https://a.example", Some("T"), Some("S"), "2024-01-01");
        assert!(document.starts_with("# Reading Notes\n"));
        assert!(document.ends_with("Post date: YYYY-MM-DD\n\n## Quotes\n\n"));
        assert!(!document.contains("## Buys"));
    }
}
