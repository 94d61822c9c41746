use scraper::ElementRef;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `class` attribute contains the fragment (substring, not token match).
    ClassContains(String),
    /// One of the element's own text nodes contains the fragment.
    TextContains(String),
    AttrContains { name: String, value: String },
}

/// Browser-independent element lookup: a tag plus predicates that must all
/// hold. Renders to XPath for WebDriver and can be evaluated against a parsed
/// document directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    tag: String,
    predicates: Vec<Predicate>,
    enabled_only: bool,
}

impl Query {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            predicates: Vec::new(),
            enabled_only: false,
        }
    }

    #[must_use]
    pub fn any() -> Self {
        Self::new("*")
    }

    #[must_use]
    pub fn class_contains(mut self, fragment: impl Into<String>) -> Self {
        self.predicates
            .push(Predicate::ClassContains(fragment.into()));
        self
    }

    #[must_use]
    pub fn text_contains(mut self, fragment: impl Into<String>) -> Self {
        self.predicates
            .push(Predicate::TextContains(fragment.into()));
        self
    }

    #[must_use]
    pub fn attr_contains(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.predicates.push(Predicate::AttrContains {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Excludes elements carrying a `disabled` attribute.
    #[must_use]
    pub fn enabled(mut self) -> Self {
        self.enabled_only = true;
        self
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    #[must_use]
    pub fn is_enabled_only(&self) -> bool {
        self.enabled_only
    }

    /// Absolute XPath (`//tag[...]`).
    #[must_use]
    pub fn to_xpath(&self) -> String {
        format!("//{}", self.to_relative_xpath())
    }

    /// XPath relative to a context element (`.//tag[...]`).
    #[must_use]
    pub fn to_descendant_xpath(&self) -> String {
        format!(".//{}", self.to_relative_xpath())
    }

    fn to_relative_xpath(&self) -> String {
        let mut conditions: Vec<String> = self
            .predicates
            .iter()
            .map(|p| match p {
                Predicate::ClassContains(c) => format!("contains(@class, {})", xpath_literal(c)),
                Predicate::TextContains(t) => {
                    format!("text()[contains(., {})]", xpath_literal(t))
                }
                Predicate::AttrContains { name, value } => {
                    format!("contains(@{name}, {})", xpath_literal(value))
                }
            })
            .collect();
        if self.enabled_only {
            conditions.push("not(@disabled)".to_string());
        }

        if conditions.is_empty() {
            self.tag.clone()
        } else {
            format!("{}[{}]", self.tag, conditions.join(" and "))
        }
    }

    #[must_use]
    pub fn matches(&self, element: &ElementRef<'_>) -> bool {
        let el = element.value();
        if self.tag != "*" && !el.name().eq_ignore_ascii_case(&self.tag) {
            return false;
        }
        if self.enabled_only && el.attr("disabled").is_some() {
            return false;
        }

        self.predicates.iter().all(|p| match p {
            Predicate::ClassContains(c) => el.attr("class").is_some_and(|v| v.contains(c.as_str())),
            Predicate::TextContains(t) => element
                .children()
                .filter_map(|child| child.value().as_text())
                .any(|text| text.contains(t.as_str())),
            Predicate::AttrContains { name, value } => {
                el.attr(name).is_some_and(|v| v.contains(value.as_str()))
            }
        })
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_xpath())
    }
}

/// Quotes a string for XPath 1.0, which has no escape sequences.
#[must_use]
pub fn xpath_literal(s: &str) -> String {
    if !s.contains('\'') {
        format!("'{s}'")
    } else if !s.contains('"') {
        format!("\"{s}\"")
    } else {
        let parts: Vec<String> = s.split('\'').map(|part| format!("'{part}'")).collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}
