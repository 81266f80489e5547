//! Per-type constraint table and its fluent builder.

use std::any::Any;
use std::collections::HashSet;

use regex::Regex;

use super::constraint::{Check, Constraint};
use super::failure::{ConstraintId, FailureRecord};
use crate::error::BindError;

/// Type-erased view of one property's registration.
pub(crate) trait PropertyValidator<M>: Send + Sync {
    fn name(&self) -> &str;

    fn value_type(&self) -> &'static str;

    fn constraint_count(&self) -> usize;

    /// Validate the value currently held by `model`.
    fn validate(&self, model: &M) -> Vec<FailureRecord>;

    /// Validate an explicit value in the context of `model`.
    ///
    /// Returns `None` if `value` is not of the registered type.
    fn validate_value(&self, model: &M, value: &dyn Any) -> Option<Vec<FailureRecord>>;
}

type Getter<M, V> = Box<dyn Fn(&M) -> V + Send + Sync>;

struct PropertyRules<M, V> {
    name: String,
    getter: Getter<M, V>,
    constraints: Vec<Constraint<M, V>>,
}

impl<M, V> PropertyRules<M, V> {
    fn run(&self, value: &V, model: &M) -> Vec<FailureRecord> {
        self.constraints
            .iter()
            .filter_map(|constraint| constraint.evaluate(value, model))
            .collect()
    }
}

impl<M: 'static, V: 'static> PropertyValidator<M> for PropertyRules<M, V> {
    fn name(&self) -> &str {
        &self.name
    }

    fn value_type(&self) -> &'static str {
        std::any::type_name::<V>()
    }

    fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    fn validate(&self, model: &M) -> Vec<FailureRecord> {
        let value = (self.getter)(model);
        self.run(&value, model)
    }

    fn validate_value(&self, model: &M, value: &dyn Any) -> Option<Vec<FailureRecord>> {
        value
            .downcast_ref::<V>()
            .map(|value| self.run(value, model))
    }
}

/// The constraint table of a validatable type `M`.
///
/// Build it once per type and share it (`Arc<Rules<M>>`) between every
/// [`ValidationEngine`](super::ValidationEngine) of that type.
///
/// # Example
///
/// ```ignore
/// let rules = Rules::<User>::builder()
///     .property("Login", |u: &User| u.login.clone())
///         .required("Login is required")
///     .property("Email", |u: &User| u.email.clone())
///         .required("Email is required")
///         .email("Please enter a valid email")
///     .property("Age", |u: &User| u.age)
///         .rule(|age| *age >= 18, "Age must be greater than 18")
///     .build()?;
/// ```
pub struct Rules<M> {
    properties: Vec<Box<dyn PropertyValidator<M>>>,
}

impl<M: 'static> Rules<M> {
    /// Start a new table.
    pub fn builder() -> RulesBuilder<M> {
        RulesBuilder::new()
    }

    /// A table with no properties; every validation succeeds.
    pub fn empty() -> Self {
        Self {
            properties: Vec::new(),
        }
    }

    /// Registered property names, in registration order.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|property| property.name())
    }

    /// Returns `true` if `name` has a registration.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of constraints registered for `name` (zero if unregistered).
    pub fn constraint_count(&self, name: &str) -> usize {
        self.get(name)
            .map(|property| property.constraint_count())
            .unwrap_or(0)
    }

    pub(crate) fn get(&self, name: &str) -> Option<&dyn PropertyValidator<M>> {
        self.properties
            .iter()
            .find(|property| property.name() == name)
            .map(|property| property.as_ref())
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &dyn PropertyValidator<M>> {
        self.properties.iter().map(|property| property.as_ref())
    }
}

impl<M> std::fmt::Debug for Rules<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.properties.iter().map(|property| property.name()))
            .finish()
    }
}

/// Builder for a [`Rules`] table.
pub struct RulesBuilder<M> {
    properties: Vec<Box<dyn PropertyValidator<M>>>,
    error: Option<BindError>,
}

impl<M: 'static> RulesBuilder<M> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            properties: Vec::new(),
            error: None,
        }
    }

    /// Register a property and start adding constraints to it.
    ///
    /// `getter` reads the property's current value from the model.
    pub fn property<V, G>(self, name: impl Into<String>, getter: G) -> PropertyBuilder<M, V>
    where
        V: 'static,
        G: Fn(&M) -> V + Send + Sync + 'static,
    {
        PropertyBuilder {
            rules: self,
            current: PropertyRules {
                name: name.into(),
                getter: Box::new(getter),
                constraints: Vec::new(),
            },
        }
    }

    /// Finish the table.
    ///
    /// Fails on an empty or duplicate property name, or on any constraint
    /// that could not be built (e.g. an invalid regex).
    pub fn build(self) -> Result<Rules<M>, BindError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let mut seen = HashSet::new();
        for property in &self.properties {
            if property.name().is_empty() {
                return Err(BindError::invalid_argument(
                    "property_name",
                    "property name must not be empty",
                ));
            }
            if !seen.insert(property.name()) {
                return Err(BindError::invalid_argument(
                    "property_name",
                    format!("property '{}' is registered twice", property.name()),
                ));
            }
        }

        log::debug!(
            "[rules] built table with {} properties",
            self.properties.len()
        );

        Ok(Rules {
            properties: self.properties,
        })
    }

    fn fail(&mut self, err: BindError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}

impl<M: 'static> Default for RulesBuilder<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for adding constraints to a single property.
pub struct PropertyBuilder<M, V> {
    rules: RulesBuilder<M>,
    current: PropertyRules<M, V>,
}

impl<M: 'static, V: 'static> PropertyBuilder<M, V> {
    /// Add a constraint from a function returning the failure message.
    pub fn check<F>(self, f: F) -> Self
    where
        F: Fn(&V, &M) -> Result<(), String> + Send + Sync + 'static,
    {
        self.push("check", Box::new(f))
    }

    /// Add a constraint over the value alone.
    pub fn rule<F>(self, f: F, msg: impl Into<String>) -> Self
    where
        F: Fn(&V) -> bool + Send + Sync + 'static,
    {
        let msg = msg.into();
        self.push(
            "rule",
            Box::new(move |v, _| if f(v) { Ok(()) } else { Err(msg.clone()) }),
        )
    }

    /// Add a constraint that can read sibling properties of the model.
    pub fn rule_with<F>(self, f: F, msg: impl Into<String>) -> Self
    where
        F: Fn(&V, &M) -> bool + Send + Sync + 'static,
    {
        let msg = msg.into();
        self.push(
            "rule_with",
            Box::new(move |v, m| if f(v, m) { Ok(()) } else { Err(msg.clone()) }),
        )
    }

    /// File failures of the most recently added constraint under additional
    /// properties as well.
    pub fn spanning<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self.current.constraints.last_mut() {
            Some(constraint) => {
                for member in members {
                    constraint.add_member(member.into());
                }
            }
            None => self.rules.fail(BindError::invalid_argument(
                "members",
                format!(
                    "spanning() on '{}' needs a preceding constraint",
                    self.current.name
                ),
            )),
        }
        self
    }

    /// Continue to the next property.
    pub fn property<V2, G>(self, name: impl Into<String>, getter: G) -> PropertyBuilder<M, V2>
    where
        V2: 'static,
        G: Fn(&M) -> V2 + Send + Sync + 'static,
    {
        self.finish().property(name, getter)
    }

    /// Finish this property and the whole table.
    pub fn build(self) -> Result<Rules<M>, BindError> {
        self.finish().build()
    }

    fn push(mut self, kind: &'static str, check: Check<M, V>) -> Self {
        let id = ConstraintId {
            property: self.current.name.clone(),
            kind,
            index: self.current.constraints.len(),
        };
        self.current.constraints.push(Constraint::new(id, check));
        self
    }

    fn finish(self) -> RulesBuilder<M> {
        let mut rules = self.rules;
        rules.properties.push(Box::new(self.current));
        rules
    }
}

// Built-in rules for ordered values
impl<M: 'static, V: PartialOrd + Send + Sync + 'static> PropertyBuilder<M, V> {
    /// Require `min <= value <= max`.
    pub fn range(self, min: V, max: V, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        self.push(
            "range",
            Box::new(move |v, _| {
                if *v >= min && *v <= max {
                    Ok(())
                } else {
                    Err(msg.clone())
                }
            }),
        )
    }
}

// Built-in rules for String values
impl<M: 'static> PropertyBuilder<M, String> {
    /// Require the value to be non-blank.
    pub fn required(self, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        self.push(
            "required",
            Box::new(move |v: &String, _| {
                if v.trim().is_empty() {
                    Err(msg.clone())
                } else {
                    Ok(())
                }
            }),
        )
    }

    /// Require minimum length (in characters).
    pub fn min_length(self, min: usize, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        self.push(
            "min_length",
            Box::new(move |v: &String, _| {
                if v.chars().count() >= min {
                    Ok(())
                } else {
                    Err(msg.clone())
                }
            }),
        )
    }

    /// Require maximum length (in characters).
    pub fn max_length(self, max: usize, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        self.push(
            "max_length",
            Box::new(move |v: &String, _| {
                if v.chars().count() <= max {
                    Ok(())
                } else {
                    Err(msg.clone())
                }
            }),
        )
    }

    /// Require the whole value to match a regex pattern.
    ///
    /// An empty value passes; use [`required`](Self::required) for non-empty.
    /// An invalid pattern makes [`build`](Self::build) fail.
    pub fn pattern(mut self, pattern: &str, msg: impl Into<String>) -> Self {
        let re = match Regex::new(pattern) {
            Ok(re) => re,
            Err(err) => {
                self.rules.fail(BindError::invalid_argument(
                    "pattern",
                    format!("invalid regex '{}': {}", pattern, err),
                ));
                return self;
            }
        };
        let msg = msg.into();
        self.push(
            "pattern",
            Box::new(move |v: &String, _| {
                let whole = v.is_empty()
                    || re
                        .find(v)
                        .is_some_and(|m| m.start() == 0 && m.end() == v.len());
                if whole { Ok(()) } else { Err(msg.clone()) }
            }),
        )
    }

    /// Require a valid email address.
    pub fn email(self, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        self.push(
            "email",
            Box::new(move |v: &String, _| {
                // Empty is valid; use required() for non-empty
                if v.is_empty() || email_address::EmailAddress::is_valid(v) {
                    Ok(())
                } else {
                    Err(msg.clone())
                }
            }),
        )
    }

    /// Require the value to contain a substring.
    pub fn contains(self, substr: impl Into<String>, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        let substr = substr.into();
        self.push(
            "contains",
            Box::new(move |v: &String, _| {
                if v.contains(&substr) {
                    Ok(())
                } else {
                    Err(msg.clone())
                }
            }),
        )
    }

    /// Require the value to equal a sibling property.
    ///
    /// The failure is filed under both properties during whole-object
    /// validation.
    pub fn equals_field<G>(
        self,
        other: impl Into<String>,
        getter: G,
        msg: impl Into<String>,
    ) -> Self
    where
        G: Fn(&M) -> String + Send + Sync + 'static,
    {
        let msg = msg.into();
        let other = other.into();
        self.push(
            "equals_field",
            Box::new(move |v: &String, m| {
                if *v == getter(m) {
                    Ok(())
                } else {
                    Err(msg.clone())
                }
            }),
        )
        .spanning([other])
    }
}

// Built-in rules for bool values
impl<M: 'static> PropertyBuilder<M, bool> {
    /// Require the flag to be set.
    pub fn checked(self, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        self.push(
            "checked",
            Box::new(move |v: &bool, _| if *v { Ok(()) } else { Err(msg.clone()) }),
        )
    }
}

// Built-in rules for Option values
impl<M: 'static, T: 'static> PropertyBuilder<M, Option<T>> {
    /// Require a value to be present.
    pub fn some(self, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        self.push(
            "some",
            Box::new(move |v: &Option<T>, _| {
                if v.is_some() {
                    Ok(())
                } else {
                    Err(msg.clone())
                }
            }),
        )
    }
}
