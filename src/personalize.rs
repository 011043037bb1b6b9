//! Placeholder substitution for license bodies
//!
//! License families use different placeholder conventions for the copyright
//! holder and year. The mapping is kept as a data table so supporting a new
//! family is a data change, not a code change. Substitution is pure and never
//! touches the cache; licenses with no known convention pass through
//! unchanged.

/// How a license family marks the spots to personalize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenSet {
    /// Distinct placeholder tokens for author and year
    Tokens {
        author: &'static str,
        year: &'static str,
    },
    /// A literal embedded "<year> <author>" string to replace wholesale,
    /// used by licenses that ship with their original author's name in place
    Literal { text: &'static str },
}

/// Placeholder convention shared by a family of licenses
#[derive(Debug)]
struct PlaceholderRule {
    /// License keys this rule applies to
    licenses: &'static [&'static str],
    tokens: TokenSet,
}

static PLACEHOLDER_RULES: &[PlaceholderRule] = &[
    PlaceholderRule {
        licenses: &["mit", "bsd-2-clause", "bsd-3-clause", "isc"],
        tokens: TokenSet::Tokens {
            author: "[fullname]",
            year: "[year]",
        },
    },
    PlaceholderRule {
        licenses: &["apache-2.0"],
        tokens: TokenSet::Tokens {
            author: "[name of copyright owner]",
            year: "[yyyy]",
        },
    },
    PlaceholderRule {
        licenses: &["gpl-2.0", "gpl-3.0", "agpl-3.0", "lgpl-2.1"],
        tokens: TokenSet::Tokens {
            author: "<name of author>",
            year: "<year>",
        },
    },
    PlaceholderRule {
        // WTFPL embeds its author's real name and email instead of a token
        licenses: &["wtfpl"],
        tokens: TokenSet::Literal {
            text: "2004 Sam Hocevar <sam@hocevar.net>",
        },
    },
];

/// Looks up the placeholder convention for a license key
fn rule_for(key: &str) -> Option<&'static TokenSet> {
    PLACEHOLDER_RULES
        .iter()
        .find(|rule| rule.licenses.contains(&key))
        .map(|rule| &rule.tokens)
}

/// Replaces the author/year placeholders of `key`'s license family in `body`
///
/// Every occurrence of the recognized tokens is replaced. Idempotent: once a
/// body has been substituted, a second pass finds no tokens and returns the
/// text unchanged. Unknown license keys return the body as-is.
pub fn substitute(key: &str, body: &str, author: &str, year: &str) -> String {
    match rule_for(key) {
        Some(TokenSet::Tokens {
            author: author_token,
            year: year_token,
        }) => body.replace(author_token, author).replace(year_token, year),
        Some(TokenSet::Literal { text }) => {
            body.replace(text, &format!("{} {}", year, author))
        }
        None => body.to_string(),
    }
}
