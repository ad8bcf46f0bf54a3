//! Pluggable content-policy rules
//!
//! This module defines the core abstractions for policy checks:
//! - `PolicyRule` trait that every rule implements
//! - `FnRule` for wrapping a plain function as a rule
//! - `RuleSet`, the name-keyed registry the validator runs
//!
//! Rules are pure functions of a deserialized [`Card`]. Adding or removing
//! one never touches the validator's control flow.

use crate::models::{Card, Reason};
use std::collections::BTreeMap;
use std::fmt;

/// Trait for all content-policy rules
///
/// # Example Implementation
///
/// ```ignore
/// struct NoEmptyConcept;
///
/// impl PolicyRule for NoEmptyConcept {
///     fn name(&self) -> &'static str {
///         "no-empty-concept"
///     }
///
///     fn description(&self) -> &'static str {
///         "concept_ja must not be blank"
///     }
///
///     fn check(&self, card: &Card) -> Vec<Reason> {
///         if card.concept_ja.trim().is_empty() {
///             vec![Reason::policy(self.name(), "concept_ja is blank")]
///         } else {
///             vec![]
///         }
///     }
/// }
/// ```
pub trait PolicyRule: Send + Sync {
    /// Unique identifier, used as the registry key and in reports
    fn name(&self) -> &'static str;

    /// Human-readable description of what this rule enforces
    fn description(&self) -> &'static str;

    /// Inspect one card and return every reason found (empty = clean)
    fn check(&self, card: &Card) -> Vec<Reason>;
}

type CheckFn = dyn Fn(&Card) -> Vec<Reason> + Send + Sync;

/// A rule backed by a closure.
pub struct FnRule {
    name: &'static str,
    description: &'static str,
    check: Box<CheckFn>,
}

impl FnRule {
    pub fn new<F>(name: &'static str, description: &'static str, check: F) -> Self
    where
        F: Fn(&Card) -> Vec<Reason> + Send + Sync + 'static,
    {
        Self {
            name,
            description,
            check: Box::new(check),
        }
    }
}

impl PolicyRule for FnRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn check(&self, card: &Card) -> Vec<Reason> {
        (self.check)(card)
    }
}

/// Name-keyed set of policy rules, run in name order.
#[derive(Default)]
pub struct RuleSet {
    rules: BTreeMap<&'static str, Box<dyn PolicyRule>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule, replacing any rule registered under the same name.
    pub fn with_rule(mut self, rule: impl PolicyRule + 'static) -> Self {
        self.insert(Box::new(rule));
        self
    }

    /// Add a closure-backed rule.
    pub fn with_fn<F>(self, name: &'static str, description: &'static str, check: F) -> Self
    where
        F: Fn(&Card) -> Vec<Reason> + Send + Sync + 'static,
    {
        self.with_rule(FnRule::new(name, description, check))
    }

    /// Drop a rule by name.
    pub fn without(mut self, name: &str) -> Self {
        self.rules.remove(name);
        self
    }

    pub fn insert(&mut self, rule: Box<dyn PolicyRule>) -> Option<Box<dyn PolicyRule>> {
        self.rules.insert(rule.name(), rule)
    }

    pub fn get(&self, name: &str) -> Option<&dyn PolicyRule> {
        self.rules.get(name).map(|r| r.as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule against the card and concatenate their reasons.
    pub fn check(&self, card: &Card) -> Vec<Reason> {
        self.rules.values().flat_map(|rule| rule.check(card)).collect()
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("rules", &self.names())
            .finish()
    }
}
