//! Per-field rule chains for form submissions.
//!
//! A [`FieldRules`] chain is an ordered list of rules, each taking the current
//! value and returning either the (possibly transformed) value or a message.
//! Rules run in order and the chain stops at the first failure, so a field
//! yields at most one [`Violation`]. Sanitizing rules such as
//! [`FieldRules::escape`] rewrite the value that is later echoed back into a
//! re-rendered form.

use chrono::NaiveDate;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    field: &'static str,
    message: String,
}

impl Violation {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    pub const fn field(&self) -> &'static str {
        self.field
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

type Rule = Box<dyn Fn(String) -> Result<String, String> + Send + Sync>;

pub struct FieldRules {
    field: &'static str,
    optional: bool,
    rules: Vec<Rule>,
}

impl FieldRules {
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            optional: false,
            rules: Vec::new(),
        }
    }

    /// Skips the whole chain when the submitted value is missing or empty.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    #[must_use]
    pub fn rule<F>(mut self, rule: F) -> Self
    where
        F: Fn(String) -> Result<String, String> + Send + Sync + 'static,
    {
        self.rules.push(Box::new(rule));
        self
    }

    #[must_use]
    pub fn trim(self) -> Self {
        self.rule(|value| Ok(value.trim().to_string()))
    }

    #[must_use]
    pub fn not_empty(self, message: &'static str) -> Self {
        self.rule(move |value| {
            if value.is_empty() {
                Err(message.into())
            } else {
                Ok(value)
            }
        })
    }

    #[must_use]
    pub fn escape(self) -> Self {
        self.rule(|value| Ok(escape_html(&value)))
    }

    #[must_use]
    pub fn alphanumeric(self, message: &'static str) -> Self {
        self.rule(move |value| {
            if is_alphanumeric(&value) {
                Ok(value)
            } else {
                Err(message.into())
            }
        })
    }

    #[must_use]
    pub fn integer(self, message: &'static str) -> Self {
        self.rule(move |value| match value.parse::<i64>() {
            Ok(_) => Ok(value),
            Err(_) => Err(message.into()),
        })
    }

    /// Checks for an ISO-8601 date or date-time and coerces it to `YYYY-MM-DD`.
    #[must_use]
    pub fn iso8601_date(self, message: &'static str) -> Self {
        self.rule(move |value| match parse_iso8601_date(&value) {
            Some(date) => Ok(date.format(DATE_FORMAT).to_string()),
            None => Err(message.into()),
        })
    }

    fn apply(&self, raw: Option<&str>) -> (String, Option<Violation>) {
        let raw = raw.unwrap_or_default();
        if self.optional && raw.is_empty() {
            return (String::new(), None);
        }

        let mut value = raw.to_string();
        for rule in &self.rules {
            match rule(value.clone()) {
                Ok(next) => value = next,
                Err(message) => return (value, Some(Violation::new(self.field, message))),
            }
        }
        (value, None)
    }
}

impl std::fmt::Debug for FieldRules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRules")
            .field("field", &self.field)
            .field("optional", &self.optional)
            .field("rules", &self.rules.len())
            .finish()
    }
}

/// Submitted form fields, looked up by name.
pub trait FormInput {
    fn field(&self, name: &str) -> Option<&str>;
}

impl FormInput for HashMap<String, String> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

#[derive(Debug)]
pub struct FormRules(Vec<FieldRules>);

impl FormRules {
    pub const fn new(fields: Vec<FieldRules>) -> Self {
        Self(fields)
    }

    pub fn validate(&self, input: &impl FormInput) -> Validated {
        let mut values = HashMap::with_capacity(self.0.len());
        let mut violations = Vec::new();

        for chain in &self.0 {
            let (value, violation) = chain.apply(input.field(chain.field));
            values.insert(chain.field, value);
            violations.extend(violation);
        }

        Validated { values, violations }
    }
}

/// Sanitized field values plus the violations found while producing them.
#[derive(Debug, Clone, Default)]
pub struct Validated {
    values: HashMap<&'static str, String>,
    violations: Vec<Violation>,
}

impl Validated {
    pub fn value(&self, field: &str) -> &str {
        self.values.get(field).map_or("", String::as_str)
    }

    pub fn date(&self, field: &str) -> Option<NaiveDate> {
        parse_iso8601_date(self.value(field))
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Replaces markup-sensitive characters with HTML entities.
#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '/' => escaped.push_str("&#x2F;"),
            '\\' => escaped.push_str("&#x5C;"),
            '`' => escaped.push_str("&#96;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn is_alphanumeric(s: &str) -> bool {
    static RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9A-Za-z]+$").unwrap());
    RE.is_match(s)
}

/// Parses calendar dates in extended (`1775-12-16`), basic (`17751216`) and
/// reduced precision (`1775-12`, `1775`) forms, optionally followed by a
/// `T` time of day and zone. Reduced dates resolve to the first day of the
/// period and any time part is dropped.
#[must_use]
pub fn parse_iso8601_date(s: &str) -> Option<NaiveDate> {
    static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^(?P<y>\d{4})(?:-(?P<m>\d{2})(?:-(?P<d>\d{2}))?|(?P<bm>\d{2})(?P<bd>\d{2}))?$")
            .unwrap()
    });
    static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(
            r"^([01]\d|2[0-3])(:?[0-5]\d(:?[0-5]\d([.,]\d+)?)?)?(Z|[+-]([01]\d|2[0-3])(:?[0-5]\d)?)?$",
        )
        .unwrap()
    });

    let (date, time) = match s.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (s, None),
    };
    if time.is_some_and(|time| !TIME_RE.is_match(time)) {
        return None;
    }

    let caps = DATE_RE.captures(date)?;
    let month = caps.name("m").or_else(|| caps.name("bm"));
    let day = caps.name("d").or_else(|| caps.name("bd"));
    // A time of day only follows a complete date.
    if time.is_some() && day.is_none() {
        return None;
    }

    let year = caps["y"].parse().ok()?;
    let month = month.map_or(Some(1), |m| m.as_str().parse().ok())?;
    let day = day.map_or(Some(1), |d| d.as_str().parse().ok())?;
    NaiveDate::from_ymd_opt(year, month, day)
}
