//! Condition expressions selecting which tag groups contribute to an embed
//!
//! The grammar is a conjunction of disjunctions:
//!
//! ```text
//! condition := clause ("and" clause)*
//! clause    := name | "(" name ("or" name)+ ")" | name ("or" name)+
//! name      := word+
//! ```
//!
//! `and` concatenates the output of its clauses and `or` picks one of the
//! groups that exist in the tagset at random. Neither is a logical operator.
//! A clause without `or` names a group directly, so `(g)` refers to a group
//! literally called `(g)`.

use crate::io::error::{EmbedError, Result};
use crate::tags::document::Tagset;
use crate::tags::sampler::sample;
use rand::Rng;
use rand::seq::IndexedRandom;
use std::fmt;
use tracing::{debug, warn};

/// One conjunct of a condition
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Clause {
    /// A bare group reference
    Group(String),
    /// Exactly one of these groups, chosen among those that exist
    AnyOf(Vec<String>),
}

/// Parsed condition expression
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Condition {
    /// Blank expression; every group contributes in document order
    All,
    /// Clauses whose outputs are concatenated in order
    Clauses(Vec<Clause>),
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Token {
    Open,
    Close,
    And,
    Or,
    Word(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("("),
            Self::Close => f.write_str(")"),
            Self::And => f.write_str("and"),
            Self::Or => f.write_str("or"),
            Self::Word(word) => f.write_str(word),
        }
    }
}

impl Condition {
    /// Parse an expression, failing on the first malformed clause
    ///
    /// # Errors
    ///
    /// Returns [`EmbedError::MalformedCondition`] for an empty clause, a
    /// dangling `or`, or unbalanced or nested parentheses
    pub fn parse(text: &str) -> Result<Self> {
        let (condition, mut errors) = Self::parse_lenient(text);
        if errors.is_empty() {
            Ok(condition)
        } else {
            Err(errors.swap_remove(0))
        }
    }

    /// Parse an expression, dropping malformed clauses
    ///
    /// Returns the clauses that parsed together with one error per clause
    /// that did not.
    pub fn parse_lenient(text: &str) -> (Self, Vec<EmbedError>) {
        if text.trim().is_empty() {
            return (Self::All, Vec::new());
        }

        let tokens = tokenize(text);
        let mut clauses = Vec::new();
        let mut errors = Vec::new();

        for clause_tokens in tokens.split(|token| *token == Token::And) {
            match parse_clause(clause_tokens) {
                Ok(clause) => clauses.push(clause),
                Err(reason) => errors.push(EmbedError::MalformedCondition {
                    clause: render(clause_tokens),
                    reason: reason.to_string(),
                }),
            }
        }

        (Self::Clauses(clauses), errors)
    }

    /// Expand the selected groups and concatenate their tags
    pub fn evaluate<R: Rng + ?Sized>(&self, tagset: &Tagset, rng: &mut R) -> Vec<String> {
        match self {
            Self::All => {
                warn!("No condition specified, expanding every tag group");
                tagset
                    .iter()
                    .flat_map(|(_, group)| sample(group, &mut *rng))
                    .collect()
            }
            Self::Clauses(clauses) => clauses
                .iter()
                .flat_map(|clause| clause.evaluate(tagset, &mut *rng))
                .collect(),
        }
    }
}

impl Clause {
    /// Expand this clause against a tagset
    ///
    /// Missing groups contribute nothing.
    pub fn evaluate<R: Rng + ?Sized>(&self, tagset: &Tagset, rng: &mut R) -> Vec<String> {
        match self {
            Self::Group(name) => match tagset.group(name) {
                Ok(group) => sample(group, rng),
                Err(error) => {
                    warn!(%error, "Skipping clause");
                    Vec::new()
                }
            },
            Self::AnyOf(names) => {
                let available: Vec<&str> = names
                    .iter()
                    .map(String::as_str)
                    .filter(|name| tagset.contains(name))
                    .collect();

                let Some(&selected) = available.choose(rng) else {
                    warn!(?names, "No valid groups found in or condition");
                    return Vec::new();
                };

                debug!(selected, "Selected group from or condition");
                tagset.get(selected).map(|group| sample(group, rng)).unwrap_or_default()
            }
        }
    }
}

/// Parse `condition` leniently and expand it against `tagset`
///
/// Malformed clauses are logged and contribute nothing.
pub fn evaluate<R: Rng + ?Sized>(condition: &str, tagset: &Tagset, rng: &mut R) -> Vec<String> {
    let (parsed, errors) = Condition::parse_lenient(condition);
    for error in &errors {
        warn!(%error, "Ignoring condition clause");
    }
    parsed.evaluate(tagset, rng)
}

fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word = String::new();

    for ch in text.chars() {
        match ch {
            '(' | ')' => {
                flush_word(&mut word, &mut tokens);
                tokens.push(if ch == '(' { Token::Open } else { Token::Close });
            }
            c if c.is_whitespace() => flush_word(&mut word, &mut tokens),
            c => word.push(c),
        }
    }
    flush_word(&mut word, &mut tokens);

    tokens
}

fn flush_word(word: &mut String, tokens: &mut Vec<Token>) {
    if word.is_empty() {
        return;
    }

    let token = match word.as_str() {
        "and" => Token::And,
        "or" => Token::Or,
        _ => Token::Word(word.clone()),
    };
    word.clear();
    tokens.push(token);
}

fn parse_clause(tokens: &[Token]) -> std::result::Result<Clause, &'static str> {
    let (inner, grouped) = match tokens {
        [] => return Err("empty clause"),
        [Token::Open, inner @ .., Token::Close] => (inner, true),
        [Token::Open, ..] => return Err("unbalanced parentheses"),
        _ => (tokens, false),
    };

    if inner.iter().any(|token| matches!(token, Token::Open | Token::Close)) {
        return Err("unbalanced or nested parentheses");
    }

    let mut names = Vec::new();
    for operand in inner.split(|token| *token == Token::Or) {
        if operand.is_empty() {
            return Err("missing group name");
        }
        names.push(render(operand));
    }

    // Without `or` the clause is a literal group name, parentheses included
    if names.len() == 1 {
        return Ok(Clause::Group(if grouped {
            render(tokens)
        } else {
            names.swap_remove(0)
        }));
    }

    Ok(Clause::AnyOf(names))
}

/// Rebuild clause text with single spaces between words
fn render(tokens: &[Token]) -> String {
    let mut text = String::new();
    let mut previous: Option<&Token> = None;

    for token in tokens {
        let attached = matches!(
            (previous, token),
            (None | Some(Token::Open), _) | (_, Token::Close)
        );
        if !attached {
            text.push(' ');
        }
        text.push_str(&token.to_string());
        previous = Some(token);
    }

    text
}
