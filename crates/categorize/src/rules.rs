use moneta_core::CategorySource;
use serde::{Deserialize, Serialize};

/// Category given when no rule matches.
pub const DEFAULT_CATEGORY: &str = "Other Expenses";

const RULE_MATCH_CONFIDENCE: f32 = 0.8;
const NO_MATCH_CONFIDENCE: f32 = 0.3;

/// One keyword rule. Rules live in an ordered list, never a map: ambiguous
/// descriptions matching several rules must always resolve to the
/// earliest-declared one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRule {
    pub name: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub keywords: Vec<String>,
}

/// A resolved category assignment for one description.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub category: String,
    pub subcategory: Option<String>,
    pub confidence: f32,
    pub source: CategorySource,
}

/// One entry of the manual-override suggestion ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub category: String,
    pub subcategory: Option<String>,
    pub confidence: f32,
}

/// The built-in rule table. Declaration order is a behavioral contract:
/// "UBER EATS" must hit food before "uber" can hit transportation.
fn rule(name: &str, category: &str, subcategory: Option<&str>, keywords: &[&str]) -> KeywordRule {
    KeywordRule {
        name: name.to_string(),
        category: category.to_string(),
        subcategory: subcategory.map(str::to_string),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

pub fn default_rules() -> Vec<KeywordRule> {
    vec![
        rule("food_dining", "Food & Dining", Some("Restaurants"), &[
            "starbucks", "coffee", "restaurant", "cafe", "mcdonald", "burger", "pizza",
            "chipotle", "doordash", "grubhub", "uber eats", "dining", "bakery", "deli",
        ]),
        rule("groceries", "Groceries", None, &[
            "whole foods", "safeway", "kroger", "trader joe", "grocery", "supermarket",
            "costco", "aldi", "market",
        ]),
        rule("transportation", "Transportation", None, &[
            "uber", "lyft", "shell", "chevron", "exxon", "gas station", "parking",
            "transit", "metro", "toll", "fuel",
        ]),
        rule("shopping", "Shopping", None, &[
            "amazon", "target", "walmart", "ebay", "etsy", "best buy", "nordstrom",
        ]),
        rule("entertainment", "Entertainment", Some("Streaming"), &[
            "netflix", "spotify", "hulu", "disney", "cinema", "theatre", "steam",
            "playstation", "xbox",
        ]),
        rule("bills_utilities", "Bills & Utilities", None, &[
            "electric", "water", "internet", "comcast", "verizon", "t-mobile", "at&t",
            "utility", "insurance", "phone",
        ]),
        rule("healthcare", "Healthcare", None, &[
            "pharmacy", "cvs", "walgreens", "doctor", "dental", "medical", "clinic",
        ]),
        rule("travel", "Travel", None, &[
            "airline", "hotel", "airbnb", "delta", "united", "marriott", "expedia",
            "hertz",
        ]),
        rule("housing", "Housing", None, &[
            "rent", "mortgage", "lease", "apartment", "hoa",
        ]),
        rule("income", "Income", Some("Salary"), &[
            "payroll", "salary", "direct deposit", "paycheck",
        ]),
        rule("transfers", "Transfers", None, &[
            "transfer", "zelle", "venmo", "paypal", "wire",
        ]),
        rule("fees", "Fees & Charges", None, &[
            "fee", "interest", "overdraft", "service charge",
        ]),
    ]
}

#[derive(Debug, Deserialize)]
struct RuleFile {
    rules: Vec<KeywordRule>,
}

/// Deterministic keyword matcher: the fallback and suggestion half of the
/// categorization engine.
pub struct RuleMatcher {
    rules: Vec<KeywordRule>,
}

impl Default for RuleMatcher {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl RuleMatcher {
    pub fn new(rules: Vec<KeywordRule>) -> Self {
        Self { rules }
    }

    /// Load a rule table from TOML (`[[rules]]` entries, in file order).
    pub fn from_toml(toml_content: &str) -> Result<Self, String> {
        let file: RuleFile =
            toml::from_str(toml_content).map_err(|e| format!("Failed to parse rules TOML: {e}"))?;
        Ok(Self::new(file.rules))
    }

    /// First rule (in declaration order) with any keyword appearing as a
    /// substring of the lowercased description wins. No match falls back to
    /// the default category at low confidence.
    pub fn match_description(&self, description: &str) -> Assignment {
        let text = description.to_lowercase();

        for rule in &self.rules {
            if rule.keywords.iter().any(|k| text.contains(k.as_str())) {
                return Assignment {
                    category: rule.category.clone(),
                    subcategory: rule.subcategory.clone(),
                    confidence: RULE_MATCH_CONFIDENCE,
                    source: CategorySource::Rules,
                };
            }
        }

        Assignment {
            category: DEFAULT_CATEGORY.to_string(),
            subcategory: None,
            confidence: NO_MATCH_CONFIDENCE,
            source: CategorySource::Rules,
        }
    }

    /// Rank rules for the manual-override UI: score each rule by how many of
    /// its keywords appear, keep positive scores, confidence
    /// min(0.9, score * 0.3), top 3. Stable sort so ties keep declaration
    /// order.
    pub fn suggest(&self, description: &str) -> Vec<Suggestion> {
        let text = description.to_lowercase();

        let mut scored: Vec<Suggestion> = self
            .rules
            .iter()
            .filter_map(|rule| {
                let score = rule.keywords.iter().filter(|k| text.contains(k.as_str())).count();
                (score > 0).then(|| Suggestion {
                    category: rule.category.clone(),
                    subcategory: rule.subcategory.clone(),
                    confidence: (score as f32 * 0.3).min(0.9),
                })
            })
            .collect();

        scored.sort_by(|a, b| {
            b.confidence.partial_cmp(&a.confidence).unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(3);
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starbucks_resolves_to_food_and_dining() {
        let matcher = RuleMatcher::default();
        let a = matcher.match_description("STARBUCKS COFFEE #1234");
        assert_eq!(a.category, "Food & Dining");
        assert_eq!(a.confidence, 0.8);
        assert_eq!(a.source, CategorySource::Rules);
    }

    #[test]
    fn matching_is_idempotent() {
        let matcher = RuleMatcher::default();
        let first = matcher.match_description("STARBUCKS COFFEE #1234");
        for _ in 0..5 {
            assert_eq!(matcher.match_description("STARBUCKS COFFEE #1234"), first);
        }
    }

    #[test]
    fn no_match_defaults_to_other_expenses() {
        let matcher = RuleMatcher::default();
        let a = matcher.match_description("XQZ 991 UNKNOWN VENDOR");
        assert_eq!(a.category, "Other Expenses");
        assert_eq!(a.confidence, 0.3);
        assert_eq!(a.source, CategorySource::Rules);
    }

    #[test]
    fn declaration_order_breaks_keyword_ambiguity() {
        let matcher = RuleMatcher::default();
        // "UBER EATS ORDER" contains both "uber eats" (food) and "uber"
        // (transportation); the earlier rule must win.
        assert_eq!(matcher.match_description("UBER EATS ORDER 42").category, "Food & Dining");
        assert_eq!(matcher.match_description("UBER TRIP SFO").category, "Transportation");
    }

    #[test]
    fn match_is_case_insensitive() {
        let matcher = RuleMatcher::default();
        assert_eq!(matcher.match_description("netflix.com monthly").category, "Entertainment");
        assert_eq!(matcher.match_description("NETFLIX.COM MONTHLY").category, "Entertainment");
    }

    #[test]
    fn suggestions_rank_by_keyword_hits() {
        let matcher = RuleMatcher::default();
        // Two food keywords vs one grocery keyword.
        let suggestions = matcher.suggest("STARBUCKS COFFEE AT THE MARKET");
        assert!(!suggestions.is_empty());
        assert_eq!(suggestions[0].category, "Food & Dining");
        assert!((suggestions[0].confidence - 0.6).abs() < 1e-6);
        assert!(suggestions.len() <= 3);
    }

    #[test]
    fn suggestion_confidence_caps_at_point_nine() {
        let matcher = RuleMatcher::new(vec![rule(
            "many",
            "Many",
            None,
            &["aa", "bb", "cc", "dd"],
        )]);
        let suggestions = matcher.suggest("aa bb cc dd");
        assert_eq!(suggestions[0].confidence, 0.9);
    }

    #[test]
    fn suggestions_empty_for_no_hits() {
        let matcher = RuleMatcher::default();
        assert!(matcher.suggest("XQZ 991").is_empty());
    }

    #[test]
    fn suggestion_ties_keep_declaration_order() {
        let matcher = RuleMatcher::new(vec![
            rule("first", "First", None, &["alpha"]),
            rule("second", "Second", None, &["alpha"]),
        ]);
        let suggestions = matcher.suggest("alpha");
        assert_eq!(suggestions[0].category, "First");
        assert_eq!(suggestions[1].category, "Second");
    }

    #[test]
    fn rules_load_from_toml_in_file_order() {
        let toml = r#"
            [[rules]]
            name = "coffee"
            category = "Coffee"
            keywords = ["espresso"]

            [[rules]]
            name = "books"
            category = "Books"
            subcategory = "Used"
            keywords = ["espresso", "bookshop"]
        "#;
        let matcher = RuleMatcher::from_toml(toml).unwrap();
        // Both match; the first-declared rule wins.
        assert_eq!(matcher.match_description("ESPRESSO BAR").category, "Coffee");
        assert_eq!(
            matcher.match_description("BOOKSHOP LANE").subcategory.as_deref(),
            Some("Used")
        );
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(RuleMatcher::from_toml("not toml [").is_err());
    }
}
