use super::Connective;
use crate::stmt::Value;

/// The filter applied to one column of a criteria object.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnFilter {
    /// A bare value (`=`) or an explicit comparison.
    Comparison(Comparison),

    /// An array of plain values, matched with `IN`. Empty matches nothing.
    List(Vec<Value>),

    /// An array holding comparison objects, combined with connectives.
    Group(Vec<FilterEntry>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterEntry {
    Connective(Connective),
    Comparison(Comparison),
    Invalid(serde_json::Value),
}

/// `{operator, value, negate}`
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub operator: Operator,
    pub operand: Operand,
    pub negate: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Value(Value),
    List(Vec<Value>),

    /// Missing, or not representable as a value or a list of values.
    Invalid(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    In,
    NotIn,
    Like,
    NotLike,
    ILike,
    NotILike,

    /// Any other operator. Never compiled.
    Unsupported(String),
}

impl Operator {
    /// Parses an operator, ignoring case and surrounding whitespace.
    pub fn parse(src: &str) -> Operator {
        let normalized = src
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();

        match normalized.as_str() {
            "=" | "==" => Operator::Eq,
            "!=" | "<>" => Operator::Ne,
            ">" => Operator::Gt,
            ">=" => Operator::Ge,
            "<" => Operator::Lt,
            "<=" => Operator::Le,
            "IN" => Operator::In,
            "NOT IN" => Operator::NotIn,
            "LIKE" => Operator::Like,
            "NOT LIKE" => Operator::NotLike,
            "ILIKE" => Operator::ILike,
            "NOT ILIKE" => Operator::NotILike,
            _ => Operator::Unsupported(src.to_string()),
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Operator::Unsupported(_))
    }
}

impl Comparison {
    /// Plain equality, as produced by a bare value.
    pub fn eq(value: impl Into<Value>) -> Comparison {
        Comparison {
            operator: Operator::Eq,
            operand: Operand::Value(value.into()),
            negate: false,
        }
    }

    pub fn new(operator: Operator, value: impl Into<Value>) -> Comparison {
        Comparison {
            operator,
            operand: Operand::Value(value.into()),
            negate: false,
        }
    }

    /// Describes why the comparison cannot be compiled, if it cannot.
    pub fn problem(&self) -> Option<String> {
        if let Operator::Unsupported(op) = &self.operator {
            return Some(format!("unsupported operator `{op}`"));
        }

        match &self.operand {
            Operand::Invalid(json) if json.is_null() => {
                Some("comparison is missing a value".to_string())
            }
            Operand::Invalid(json) => Some(format!("invalid comparison value `{json}`")),
            Operand::List(_) => match self.operator {
                Operator::Eq | Operator::Ne | Operator::In | Operator::NotIn => None,
                _ => Some(format!(
                    "operator `{}` does not accept a list",
                    self.operator
                )),
            },
            Operand::Value(_) => None,
        }
    }
}

impl core::fmt::Display for Operator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Operator::Eq => "=",
            Operator::Ne => "<>",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::ILike => "ILIKE",
            Operator::NotILike => "NOT ILIKE",
            Operator::Unsupported(op) => op,
        })
    }
}
