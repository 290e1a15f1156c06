//! Abstract Syntax Tree for rule expressions

use crate::answer::format_number;
use smallvec::SmallVec;
use std::collections::BTreeSet;
use std::fmt;

/// AST node for rule expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// OR operation
    Or(Box<Expr>, Box<Expr>),
    /// AND operation
    And(Box<Expr>, Box<Expr>),
    /// NOT operation
    Not(Box<Expr>),
    /// Single comparison like `age >= 65`
    Comparison(Comparison),
}

/// Comparison between one referenced answer and literal values
///
/// `values` holds exactly one literal except for `In`/`NotIn`.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub question_id: String,
    pub operator: ComparisonOp,
    pub values: SmallVec<[Literal; 4]>,
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    /// Equal (==)
    Equals,
    /// Not equal (!=)
    NotEquals,
    /// Greater than (>)
    Greater,
    /// Greater than or equal (>=)
    GreaterOrEqual,
    /// Less than (<)
    Less,
    /// Less than or equal (<=)
    LessOrEqual,
    /// Matches any listed literal (IN)
    In,
    /// Matches none of the listed literals (NOT IN)
    NotIn,
}

impl ComparisonOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOp::Equals => "==",
            ComparisonOp::NotEquals => "!=",
            ComparisonOp::Greater => ">",
            ComparisonOp::GreaterOrEqual => ">=",
            ComparisonOp::Less => "<",
            ComparisonOp::LessOrEqual => "<=",
            ComparisonOp::In => "IN",
            ComparisonOp::NotIn => "NOT IN",
        }
    }

    #[inline]
    pub fn takes_list(self) -> bool {
        matches!(self, ComparisonOp::In | ComparisonOp::NotIn)
    }
}

/// Literal values
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Number(f64),
    Boolean(bool),
}

impl Expr {
    pub fn comparison(
        question_id: impl Into<String>,
        operator: ComparisonOp,
        values: impl IntoIterator<Item = Literal>,
    ) -> Self {
        Expr::Comparison(Comparison {
            question_id: question_id.into(),
            operator,
            values: values.into_iter().collect(),
        })
    }

    pub fn or(left: Expr, right: Expr) -> Self {
        Expr::Or(Box::new(left), Box::new(right))
    }

    pub fn and(left: Expr, right: Expr) -> Self {
        Expr::And(Box::new(left), Box::new(right))
    }

    pub fn negate(operand: Expr) -> Self {
        Expr::Not(Box::new(operand))
    }

    /// Add every question id this expression reads to `ids`
    pub fn collect_ids(&self, ids: &mut BTreeSet<String>) {
        match self {
            Expr::Or(left, right) | Expr::And(left, right) => {
                left.collect_ids(ids);
                right.collect_ids(ids);
            }
            Expr::Not(operand) => operand.collect_ids(ids),
            Expr::Comparison(cmp) => {
                ids.insert(cmp.question_id.clone());
            }
        }
    }

    pub fn referenced_ids(&self) -> BTreeSet<String> {
        let mut ids = BTreeSet::new();
        self.collect_ids(&mut ids);
        ids
    }

    /// Nesting depth; a lone comparison is 1
    pub fn depth(&self) -> usize {
        match self {
            Expr::Or(left, right) | Expr::And(left, right) => 1 + left.depth().max(right.depth()),
            Expr::Not(operand) => 1 + operand.depth(),
            Expr::Comparison(_) => 1,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => {
                f.write_str("'")?;
                for c in s.chars() {
                    if c == '\'' || c == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{}", c)?;
                }
                f.write_str("'")
            }
            Literal::Number(n) => f.write_str(&format_number(*n)),
            Literal::Boolean(true) => f.write_str("TRUE"),
            Literal::Boolean(false) => f.write_str("FALSE"),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.question_id, self.operator.symbol())?;
        if !self.operator.takes_list() {
            return match self.values.first() {
                Some(value) => write!(f, "{}", value),
                None => f.write_str("''"),
            };
        }

        f.write_str("[")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", value)?;
        }
        f.write_str("]")
    }
}

/// Canonical form: every binary node parenthesized
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Or(left, right) => write!(f, "({} OR {})", left, right),
            Expr::And(left, right) => write!(f, "({} AND {})", left, right),
            Expr::Not(operand) => write!(f, "NOT {}", operand),
            Expr::Comparison(cmp) => write!(f, "{}", cmp),
        }
    }
}
