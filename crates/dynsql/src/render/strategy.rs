//! Placeholder syntax per target dialect.
//!
//! A [`RenderingStrategy`] is the only place that knows what a bind parameter
//! looks like in SQL text. Every renderer mints keys and asks the strategy for
//! the placeholder; none of them formats placeholders itself.

use serde::{Deserialize, Serialize};

use super::sequence::Sequence;
use crate::column::JdbcType;

/// Prefix of the parameter path in bind expressions that address a nested map,
/// e.g. `#{parameters.p1}`.
pub const DEFAULT_PARAMETER_PREFIX: &str = "parameters";

/// Prefix of generated parameter-map keys (`p1`, `p2`, ...).
pub const DEFAULT_KEY_PREFIX: &str = "p";

/// Dialect policy for parameter keys and placeholders.
///
/// Implementations must be pure: the same inputs always produce the same text.
pub trait RenderingStrategy: std::fmt::Debug + Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Mint the next parameter-map key: `key_prefix + sequence.next()`.
    fn format_parameter_map_key(&self, key_prefix: &str, sequence: &mut Sequence) -> String {
        format!("{key_prefix}{}", sequence.next())
    }

    /// Placeholder text for `map_key`.
    fn placeholder(&self, prefix: &str, map_key: &str) -> String;

    /// Placeholder text for a value bound against a column with a known type.
    fn typed_placeholder(&self, jdbc_type: Option<JdbcType>, prefix: &str, map_key: &str) -> String {
        let _ = jdbc_type;
        self.placeholder(prefix, map_key)
    }
}

/// JDBC/ODBC-style positional markers: `?`.
///
/// Values bind in parameter-map order, which is textual placeholder order.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionalRenderingStrategy;

impl RenderingStrategy for PositionalRenderingStrategy {
    fn name(&self) -> &'static str {
        "positional"
    }

    fn placeholder(&self, _prefix: &str, _map_key: &str) -> String {
        "?".to_string()
    }
}

/// Named parameters: `:p1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamedRenderingStrategy;

impl RenderingStrategy for NamedRenderingStrategy {
    fn name(&self) -> &'static str {
        "named"
    }

    fn placeholder(&self, _prefix: &str, map_key: &str) -> String {
        format!(":{map_key}")
    }
}

/// MyBatis bind expressions: `#{parameters.p1}` or `#{parameters.p1,jdbcType=INTEGER}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MyBatis3RenderingStrategy;

impl RenderingStrategy for MyBatis3RenderingStrategy {
    fn name(&self) -> &'static str {
        "mybatis3"
    }

    fn placeholder(&self, prefix: &str, map_key: &str) -> String {
        format!("#{{{prefix}.{map_key}}}")
    }

    fn typed_placeholder(&self, jdbc_type: Option<JdbcType>, prefix: &str, map_key: &str) -> String {
        match jdbc_type {
            Some(t) => format!("#{{{prefix}.{map_key},jdbcType={}}}", t.as_str()),
            None => self.placeholder(prefix, map_key),
        }
    }
}

static POSITIONAL: PositionalRenderingStrategy = PositionalRenderingStrategy;
static NAMED: NamedRenderingStrategy = NamedRenderingStrategy;
static MYBATIS3: MyBatis3RenderingStrategy = MyBatis3RenderingStrategy;

/// Built-in strategies, selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Positional,
    Named,
    #[default]
    #[serde(alias = "mybatis3")]
    MyBatis3,
}

impl StrategyKind {
    /// The shared strategy instance for this kind.
    pub fn strategy(self) -> &'static dyn RenderingStrategy {
        match self {
            StrategyKind::Positional => &POSITIONAL,
            StrategyKind::Named => &NAMED,
            StrategyKind::MyBatis3 => &MYBATIS3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_keys_use_prefix_and_sequence() {
        let mut seq = Sequence::new();
        let s = NamedRenderingStrategy;
        assert_eq!(s.format_parameter_map_key("p", &mut seq), "p1");
        assert_eq!(s.format_parameter_map_key("p", &mut seq), "p2");
        assert_eq!(s.format_parameter_map_key("arg", &mut seq), "arg3");
    }

    #[test]
    fn placeholders_per_strategy() {
        assert_eq!(PositionalRenderingStrategy.placeholder("parameters", "p1"), "?");
        assert_eq!(NamedRenderingStrategy.placeholder("parameters", "p1"), ":p1");
        assert_eq!(
            MyBatis3RenderingStrategy.placeholder("parameters", "p1"),
            "#{parameters.p1}"
        );
    }

    #[test]
    fn mybatis_typed_placeholder_carries_jdbc_type() {
        let s = MyBatis3RenderingStrategy;
        assert_eq!(
            s.typed_placeholder(Some(JdbcType::Integer), "parameters", "p4"),
            "#{parameters.p4,jdbcType=INTEGER}"
        );
        assert_eq!(
            s.typed_placeholder(None, "parameters", "p4"),
            "#{parameters.p4}"
        );
        // Other strategies ignore the type.
        assert_eq!(
            NamedRenderingStrategy.typed_placeholder(Some(JdbcType::Varchar), "parameters", "p4"),
            ":p4"
        );
    }

    #[test]
    fn strategy_kind_resolves() {
        assert_eq!(StrategyKind::Positional.strategy().name(), "positional");
        assert_eq!(StrategyKind::Named.strategy().name(), "named");
        assert_eq!(StrategyKind::default().strategy().name(), "mybatis3");
    }
}
