//! Pattern matchers that detect change categories in a single file's patch.
//!
//! Each matcher is an independent rule: it looks at the patch text (and the
//! filename where the rule needs it) and reports zero or more findings. The
//! classifier runs them in a fixed order, so the order of [`default_matchers`]
//! is the order descriptions appear in.

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use regex_lite::Regex;

/// File suffixes that may declare HTTP routes.
pub const ROUTE_FILE_SUFFIXES: &[&str] = &[".php", ".js", ".ts", ".py", ".rb"];

/// File suffixes treated as user-interface sources.
const UI_FILE_SUFFIXES: &[&str] = &[
    ".html", ".htm", ".css", ".scss", ".sass", ".less", ".vue", ".svelte", ".jsx", ".tsx",
    ".blade.php", ".twig", ".erb",
];

/// Markup fragments that mark a patch as touching UI even outside UI files.
const UI_MARKUP: &[&str] = &["<div", "<span", "<template", "<section", "<button", "<form"];

/// UI sub-patterns in priority order. The first rule with any matching
/// substring wins; later rules are ignored for that file.
const UI_RULES: &[(&[&str], &str)] = &[
    (&["modal"], "Updated modal dialogs"),
    (&["button"], "Updated buttons"),
    (&["form"], "Updated forms"),
    (&["style", "class"], "Updated styling"),
    (&["layout", "container"], "Updated page layout"),
    (&["responsive", "media"], "Improved responsive design"),
    (&["accessibility", "aria-"], "Improved accessibility"),
    (&["table"], "Updated tables"),
];

const UI_GENERIC: &str = "Enhanced UI";

static FUNCTION_ADD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?im)^\+[ \t]*(?:(?:pub(?:\([a-z]+\))?|public|private|protected|static|async|export|default|final|abstract)[ \t]+)*(?:def|function|fn|func|sub)[ \t]+&?([A-Za-z_][A-Za-z0-9_]*)",
    )
    .expect("Invalid regex")
});

static ROUTE_ADD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?im)^\+.*?(?:route::|router\.|app\.|routes\.|\$router->|\$app->)(get|post|put|patch|delete|options|any)\s*\(\s*['"]([^'"]*)['"]"#,
    )
    .expect("Invalid regex")
});

static DECORATOR_ROUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?im)^\+[ \t]*@\w+\.route\(\s*['"]([^'"]*)['"](?:[^\n]*methods\s*=\s*[\[(]\s*['"](\w+)['"])?"#,
    )
    .expect("Invalid regex")
});

static DECLARATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:def|function|fn|func|class|interface|struct|trait)[ \t]+&?([A-Za-z_][A-Za-z0-9_]*)")
        .expect("Invalid regex")
});

static DECLARATION_KEYWORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:def|function|fn|func|class)\s").expect("Invalid regex")
});

static API_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(/api(?:/[A-Za-z0-9_\-{}:.]+)*)").expect("Invalid regex")
});

static ENDPOINT_LITERAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)endpoints?\s*[:=]?\s*['"]([^'"\s]+)['"]"#).expect("Invalid regex")
});

static BUG_NOTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)\b(?:fix(?:e[sd])?|bug(?:fix)?)\b[:\s\-]+([A-Za-z][^\n]{2,59})")
        .expect("Invalid regex")
});

static TEST_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(test_[A-Za-z0-9_]+|test[A-Z][A-Za-z0-9_]*)\b").expect("Invalid regex")
});

/// Category a finding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FindingCategory {
    Ui,
    Function,
    Route,
    Declaration,
    Api,
    Bug,
    Test,
}

impl FindingCategory {
    /// Get the tag used when rendering a finding.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ui => "UI",
            Self::Function => "Function",
            Self::Route => "Route",
            Self::Declaration => "Code",
            Self::Api => "API",
            Self::Bug => "Bug fix",
            Self::Test => "Tests",
        }
    }
}

/// One signal detected in a patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub category: FindingCategory,
    pub detail: String,
}

impl Finding {
    pub fn new(category: FindingCategory, detail: impl Into<String>) -> Self {
        Self {
            category,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category.as_str(), self.detail)
    }
}

/// An HTTP route declared in a patch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route {
    pub method: String,
    pub path: String,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// The text a matcher inspects: filename, raw patch, and a lowercased copy
/// of the patch for substring triggers.
#[derive(Debug)]
pub struct PatchContext<'a> {
    pub filename: &'a str,
    pub patch: &'a str,
    lowered: String,
}

impl<'a> PatchContext<'a> {
    pub fn new(filename: &'a str, patch: &'a str) -> Self {
        Self {
            filename,
            patch,
            lowered: patch.to_lowercase(),
        }
    }

    /// Whether the lowercased patch contains any of the given substrings.
    pub fn contains_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.lowered.contains(n))
    }

    pub fn is_empty(&self) -> bool {
        self.patch.trim().is_empty()
    }
}

/// A single classification rule.
pub trait Matcher: Send + Sync {
    /// Short rule name, used in logs.
    fn name(&self) -> &'static str;

    /// Inspect the patch and report findings. Empty when the rule does not apply.
    fn detect(&self, ctx: &PatchContext<'_>) -> Vec<Finding>;
}

/// The standard rule set in evaluation order.
pub fn default_matchers() -> Vec<Box<dyn Matcher>> {
    vec![
        Box::new(UiMatcher),
        Box::new(FunctionAddMatcher),
        Box::new(RouteAddMatcher),
        Box::new(DeclarationMatcher),
        Box::new(ApiMatcher),
        Box::new(BugMatcher),
        Box::new(TestMatcher),
    ]
}

/// UI changes. Emits at most one finding per file.
pub struct UiMatcher;

impl Matcher for UiMatcher {
    fn name(&self) -> &'static str {
        "ui"
    }

    fn detect(&self, ctx: &PatchContext<'_>) -> Vec<Finding> {
        if ctx.is_empty() {
            return Vec::new();
        }

        if let Some((_, detail)) = UI_RULES.iter().find(|(needles, _)| ctx.contains_any(needles)) {
            return vec![Finding::new(FindingCategory::Ui, *detail)];
        }

        if is_ui_file(ctx.filename) || ctx.contains_any(UI_MARKUP) {
            return vec![Finding::new(FindingCategory::Ui, UI_GENERIC)];
        }

        Vec::new()
    }
}

/// Functions declared on added lines.
pub struct FunctionAddMatcher;

impl Matcher for FunctionAddMatcher {
    fn name(&self) -> &'static str {
        "function-add"
    }

    fn detect(&self, ctx: &PatchContext<'_>) -> Vec<Finding> {
        if ctx.filename.is_empty() || ctx.is_empty() {
            return Vec::new();
        }

        added_function_names(ctx.patch)
            .into_iter()
            .map(|name| Finding::new(FindingCategory::Function, format!("Added function {}", name)))
            .collect()
    }
}

/// HTTP routes declared on added lines of route-capable files.
pub struct RouteAddMatcher;

impl Matcher for RouteAddMatcher {
    fn name(&self) -> &'static str {
        "route-add"
    }

    fn detect(&self, ctx: &PatchContext<'_>) -> Vec<Finding> {
        if !has_route_suffix(ctx.filename) {
            return Vec::new();
        }

        added_routes(ctx.patch)
            .into_iter()
            .map(|route| Finding::new(FindingCategory::Route, format!("Added route {}", route)))
            .collect()
    }
}

/// Function and class declarations on any line, added or not.
pub struct DeclarationMatcher;

impl Matcher for DeclarationMatcher {
    fn name(&self) -> &'static str {
        "declaration"
    }

    fn detect(&self, ctx: &PatchContext<'_>) -> Vec<Finding> {
        let names = unique_captures(&DECLARATION_RE, ctx.patch);
        if !names.is_empty() {
            return vec![Finding::new(
                FindingCategory::Declaration,
                format!("Modified {}", names.join(", ")),
            )];
        }

        if DECLARATION_KEYWORD_RE.is_match(ctx.patch) {
            return vec![Finding::new(
                FindingCategory::Declaration,
                "Changed functions or classes",
            )];
        }

        Vec::new()
    }
}

/// API surface changes.
pub struct ApiMatcher;

impl Matcher for ApiMatcher {
    fn name(&self) -> &'static str {
        "api"
    }

    fn detect(&self, ctx: &PatchContext<'_>) -> Vec<Finding> {
        if !ctx.contains_any(&["api", "endpoint"]) {
            return Vec::new();
        }

        let endpoint = API_PATH_RE
            .captures(ctx.patch)
            .and_then(|c| c.get(1))
            .or_else(|| ENDPOINT_LITERAL_RE.captures(ctx.patch).and_then(|c| c.get(1)))
            .map(|m| m.as_str().to_string());

        let detail = match endpoint {
            Some(path) => format!("Updated endpoint {}", path),
            None => "Updated API endpoints".to_string(),
        };

        vec![Finding::new(FindingCategory::Api, detail)]
    }
}

/// Bug fixes mentioned in the patch.
pub struct BugMatcher;

impl Matcher for BugMatcher {
    fn name(&self) -> &'static str {
        "bug"
    }

    fn detect(&self, ctx: &PatchContext<'_>) -> Vec<Finding> {
        if !ctx.contains_any(&["bug", "fix"]) {
            return Vec::new();
        }

        let detail = match bug_note(ctx.patch) {
            Some(note) => format!("Fixed {}", note),
            None => "Applied bug fixes".to_string(),
        };

        vec![Finding::new(FindingCategory::Bug, detail)]
    }
}

/// Test changes.
pub struct TestMatcher;

impl Matcher for TestMatcher {
    fn name(&self) -> &'static str {
        "test"
    }

    fn detect(&self, ctx: &PatchContext<'_>) -> Vec<Finding> {
        if !ctx.contains_any(&["test"]) {
            return Vec::new();
        }

        let names = unique_captures(&TEST_NAME_RE, ctx.patch);
        let detail = if names.is_empty() {
            "Updated tests".to_string()
        } else {
            format!("Updated {}", names.join(", "))
        };

        vec![Finding::new(FindingCategory::Test, detail)]
    }
}

/// Names of functions declared on added lines, in first-seen order.
pub fn added_function_names(patch: &str) -> Vec<String> {
    unique_captures(&FUNCTION_ADD_RE, patch)
}

/// Whether any added line declares a function.
pub fn has_added_function(patch: &str) -> bool {
    FUNCTION_ADD_RE.is_match(patch)
}

/// Routes declared on added lines, in first-seen order.
pub fn added_routes(patch: &str) -> Vec<Route> {
    let mut seen = HashSet::new();
    let mut routes = Vec::new();

    let call_style = ROUTE_ADD_RE.captures_iter(patch).filter_map(|caps| {
        let method = caps.get(1)?.as_str();
        let path = caps.get(2)?.as_str();
        Some(make_route(method, path))
    });

    let decorator_style = DECORATOR_ROUTE_RE.captures_iter(patch).filter_map(|caps| {
        let path = caps.get(1)?.as_str();
        let method = caps.get(2).map_or("get", |m| m.as_str());
        Some(make_route(method, path))
    });

    for route in call_style.chain(decorator_style) {
        if seen.insert(route.clone()) {
            routes.push(route);
        }
    }

    routes
}

/// Whether any added line declares a route.
pub fn has_added_route(patch: &str) -> bool {
    ROUTE_ADD_RE.is_match(patch) || DECORATOR_ROUTE_RE.is_match(patch)
}

/// Whether the filename can declare HTTP routes.
pub fn has_route_suffix(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    ROUTE_FILE_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
}

/// Whether the filename is a markup, stylesheet or template source.
pub fn is_ui_file(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    UI_FILE_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
}

/// Short description following a `fix`/`bug` marker, if one can be read.
pub fn bug_note(patch: &str) -> Option<String> {
    let caps = BUG_NOTE_RE.captures(patch)?;
    let note = caps
        .get(1)?
        .as_str()
        .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, '*' | '/' | '\'' | '"' | ';' | '-' | '>'))
        .trim();

    if note.len() < 3 {
        None
    } else {
        Some(note.to_string())
    }
}

fn make_route(method: &str, path: &str) -> Route {
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    };

    Route {
        method: method.to_uppercase(),
        path,
    }
}

fn unique_captures(re: &Regex, text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .filter(|name| seen.insert(name.clone()))
        .collect()
}
