use serde::{Deserialize, Serialize};

pub const BRAND: &str = "Soul AI Agents";

/// Routes that render without a footer
const HIDDEN_ON: &[&str] = &["/deck"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FooterLink {
    pub label: String,
    pub href: String,
    /// Opened in a new tab with `noopener noreferrer`
    pub external: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FooterSection {
    pub title: String,
    pub links: Vec<FooterLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteFooter {
    pub brand: String,
    pub sections: Vec<FooterSection>,
    pub year: i32,
    pub copyright: String,
}

fn link(label: &str, href: &str, external: bool) -> FooterLink {
    FooterLink {
        label: label.to_string(),
        href: href.to_string(),
        external,
    }
}

impl SiteFooter {
    /// Footer for the page at `path`, or `None` where it is hidden
    pub fn for_path(path: &str, year: i32) -> Option<Self> {
        if HIDDEN_ON.contains(&path) {
            return None;
        }

        let sections = vec![
            FooterSection {
                title: BRAND.to_string(),
                links: vec![
                    link("Blog", "https://soulagents.io/blog", false),
                    link("Whitepaper", "https://soulagents.io/whitepaper", false),
                ],
            },
            FooterSection {
                title: "Legal".to_string(),
                links: vec![
                    link("Terms of Service", "https://soulagents.io/terms", false),
                    link("Privacy Policy", "https://soulagents.io/privacy", false),
                ],
            },
            FooterSection {
                title: "Connect".to_string(),
                links: vec![
                    link("X (Twitter)", "https://x.com/soul_agents", true),
                    link("Telegram", "https://t.me/soul_agents", true),
                ],
            },
        ];

        Some(Self {
            brand: BRAND.to_string(),
            sections,
            year,
            copyright: format!("© {} {}. All rights reserved.", year, BRAND),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_on_deck() {
        assert!(SiteFooter::for_path("/deck", 2025).is_none());
    }

    #[test]
    fn shown_elsewhere_with_year() {
        let footer = SiteFooter::for_path("/", 2025).unwrap();
        assert_eq!(footer.copyright, "© 2025 Soul AI Agents. All rights reserved.");
        assert_eq!(footer.sections.len(), 3);
        assert!(SiteFooter::for_path("/deck/1", 2025).is_some());
    }

    #[test]
    fn only_social_links_are_external() {
        let footer = SiteFooter::for_path("/chat", 2025).unwrap();
        let external: Vec<&str> = footer
            .sections
            .iter()
            .flat_map(|s| s.links.iter())
            .filter(|l| l.external)
            .map(|l| l.label.as_str())
            .collect();
        assert_eq!(external, vec!["X (Twitter)", "Telegram"]);
    }
}
