//! Expression evaluation.

use crate::parser::parse;
use crate::{BinaryOp, EvaluationContext, Expr, ExprError, ExprResult, Literal, UnaryOp};
use graft_core::Value;

/// The seam between the template pipeline and the expression language.
/// The pipeline only ever asks these two questions.
pub trait ExpressionEvaluator {
    /// Whether a raw string should be treated as an expression. Strings
    /// that don't look like expressions pass through as literals.
    fn looks_like_expression(&self, raw: &str) -> bool;

    /// Evaluate an expression string against a variable context.
    fn evaluate(&self, raw: &str, context: &EvaluationContext) -> ExprResult<Value>;
}

/// The default evaluator for `${...}` expressions.
///
/// Stateless - the context is a parameter to each call, so one evaluator can
/// serve every recursion branch of a template evaluation.
#[derive(Debug, Default)]
pub struct Evaluator;

impl Evaluator {
    /// Create a new evaluator.
    pub fn new() -> Self {
        Self
    }

    fn eval(&self, expr: &Expr, context: &EvaluationContext) -> ExprResult<Value> {
        match expr {
            Expr::Literal(lit) => Ok(eval_literal(lit)),
            Expr::Var(name) => context
                .get(name)
                .cloned()
                .ok_or_else(|| ExprError::unbound_variable(name)),
            Expr::Member(base, member) => self.eval_member(base, member, context),
            Expr::Unary(op, operand) => self.eval_unary(*op, operand, context),
            Expr::Binary(op, left, right) => self.eval_binary(*op, left, right, context),
        }
    }

    fn eval_member(
        &self,
        base: &Expr,
        member: &str,
        context: &EvaluationContext,
    ) -> ExprResult<Value> {
        let base_val = self.eval(base, context)?;
        match base_val {
            // Missing members and access through Null yield Null, so dotted
            // paths over partially-filled input maps don't explode.
            Value::Map(map) => Ok(map.get(member).cloned().unwrap_or(Value::Null)),
            Value::Null => Ok(Value::Null),
            other => Err(ExprError::type_error(format!(
                "cannot access member '{}' on {}",
                member,
                other.type_name()
            ))),
        }
    }

    fn eval_unary(
        &self,
        op: UnaryOp,
        operand: &Expr,
        context: &EvaluationContext,
    ) -> ExprResult<Value> {
        let value = self.eval(operand, context)?;
        match op {
            UnaryOp::Not => Ok(Value::Bool(!value.is_truthy())),
            UnaryOp::Neg => match value {
                Value::Int(i) => Ok(Value::Int(-i)),
                Value::Float(f) => Ok(Value::Float(-f)),
                other => Err(ExprError::type_error(format!(
                    "cannot negate {}",
                    other.type_name()
                ))),
            },
        }
    }

    fn eval_binary(
        &self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        context: &EvaluationContext,
    ) -> ExprResult<Value> {
        // Short-circuit logical operators before evaluating the right side.
        match op {
            BinaryOp::Or => {
                let left_val = self.eval(left, context)?;
                if left_val.is_truthy() {
                    return Ok(Value::Bool(true));
                }
                return Ok(Value::Bool(self.eval(right, context)?.is_truthy()));
            }
            BinaryOp::And => {
                let left_val = self.eval(left, context)?;
                if !left_val.is_truthy() {
                    return Ok(Value::Bool(false));
                }
                return Ok(Value::Bool(self.eval(right, context)?.is_truthy()));
            }
            _ => {}
        }

        let left_val = self.eval(left, context)?;
        let right_val = self.eval(right, context)?;

        match op {
            BinaryOp::Eq => Ok(Value::Bool(values_equal(&left_val, &right_val))),
            BinaryOp::Ne => Ok(Value::Bool(!values_equal(&left_val, &right_val))),
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                compare(op, &left_val, &right_val)
            }
            BinaryOp::Add => add(&left_val, &right_val),
            BinaryOp::Sub => arithmetic(op, &left_val, &right_val),
            BinaryOp::Mul => arithmetic(op, &left_val, &right_val),
            BinaryOp::Div => arithmetic(op, &left_val, &right_val),
            BinaryOp::Mod => arithmetic(op, &left_val, &right_val),
            BinaryOp::Or | BinaryOp::And => unreachable!("handled above"),
        }
    }
}

impl ExpressionEvaluator for Evaluator {
    fn looks_like_expression(&self, raw: &str) -> bool {
        raw.starts_with("${") && raw.ends_with('}')
    }

    fn evaluate(&self, raw: &str, context: &EvaluationContext) -> ExprResult<Value> {
        let source = raw
            .strip_prefix("${")
            .and_then(|s| s.strip_suffix('}'))
            .ok_or_else(|| ExprError::parse(0, "expression must be wrapped in ${...}"))?;
        let expr = parse(source)?;
        self.eval(&expr, context)
    }
}

fn eval_literal(lit: &Literal) -> Value {
    match lit {
        Literal::Null => Value::Null,
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Int(i) => Value::Int(*i),
        Literal::Float(f) => Value::Float(*f),
        Literal::String(s) => Value::String(s.clone()),
    }
}

/// Loose equality: Int and Float compare numerically, everything else by
/// structural equality.
fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => *a as f64 == *b,
        _ => left == right,
    }
}

fn compare(op: BinaryOp, left: &Value, right: &Value) -> ExprResult<Value> {
    let ordering = match (left, right) {
        (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
        (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
        (Value::String(a), Value::String(b)) => a.partial_cmp(b),
        _ => None,
    };
    let Some(ordering) = ordering else {
        return Err(ExprError::type_error(format!(
            "cannot compare {} and {}",
            left.type_name(),
            right.type_name()
        )));
    };
    let result = match op {
        BinaryOp::Lt => ordering.is_lt(),
        BinaryOp::Le => ordering.is_le(),
        BinaryOp::Gt => ordering.is_gt(),
        BinaryOp::Ge => ordering.is_ge(),
        _ => unreachable!(),
    };
    Ok(Value::Bool(result))
}

/// `+` concatenates strings and adds numbers.
fn add(left: &Value, right: &Value) -> ExprResult<Value> {
    if let (Value::String(a), Value::String(b)) = (left, right) {
        return Ok(Value::String(format!("{}{}", a, b)));
    }
    arithmetic(BinaryOp::Add, left, right)
}

fn arithmetic(op: BinaryOp, left: &Value, right: &Value) -> ExprResult<Value> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => int_arithmetic(op, *a, *b),
        (Value::Float(a), Value::Float(b)) => float_arithmetic(op, *a, *b),
        (Value::Int(a), Value::Float(b)) => float_arithmetic(op, *a as f64, *b),
        (Value::Float(a), Value::Int(b)) => float_arithmetic(op, *a, *b as f64),
        _ => Err(ExprError::type_error(format!(
            "cannot apply {:?} to {} and {}",
            op,
            left.type_name(),
            right.type_name()
        ))),
    }
}

fn int_arithmetic(op: BinaryOp, a: i64, b: i64) -> ExprResult<Value> {
    let result = match op {
        BinaryOp::Add => a.wrapping_add(b),
        BinaryOp::Sub => a.wrapping_sub(b),
        BinaryOp::Mul => a.wrapping_mul(b),
        BinaryOp::Div => {
            if b == 0 {
                return Err(ExprError::DivisionByZero);
            }
            a / b
        }
        BinaryOp::Mod => {
            if b == 0 {
                return Err(ExprError::DivisionByZero);
            }
            a % b
        }
        _ => unreachable!(),
    };
    Ok(Value::Int(result))
}

fn float_arithmetic(op: BinaryOp, a: f64, b: f64) -> ExprResult<Value> {
    let result = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => {
            if b == 0.0 {
                return Err(ExprError::DivisionByZero);
            }
            a / b
        }
        BinaryOp::Mod => {
            if b == 0.0 {
                return Err(ExprError::DivisionByZero);
            }
            a % b
        }
        _ => unreachable!(),
    };
    Ok(Value::Float(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn context() -> EvaluationContext {
        let mut data = IndexMap::new();
        data.insert("title".to_string(), Value::String("Hello".to_string()));
        EvaluationContext::from_vars([
            ("data".to_string(), Value::Map(data)),
            ("count".to_string(), Value::Int(3)),
        ])
    }

    #[test]
    fn test_arithmetic_expression() {
        // GIVEN
        let evaluator = Evaluator::new();

        // WHEN / THEN
        assert_eq!(
            evaluator.evaluate("${1+1}", &context()).unwrap(),
            Value::Int(2)
        );
        assert_eq!(
            evaluator.evaluate("${2 * count + 1}", &context()).unwrap(),
            Value::Int(7)
        );
        assert_eq!(
            evaluator.evaluate("${1 / 2.0}", &context()).unwrap(),
            Value::Float(0.5)
        );
    }

    #[test]
    fn test_member_access() {
        let evaluator = Evaluator::new();
        assert_eq!(
            evaluator.evaluate("${data.title}", &context()).unwrap(),
            Value::String("Hello".to_string())
        );
        // Missing member yields Null rather than an error.
        assert_eq!(
            evaluator.evaluate("${data.missing}", &context()).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn test_string_concat_and_comparison() {
        let evaluator = Evaluator::new();
        assert_eq!(
            evaluator
                .evaluate("${data.title + ' World'}", &context())
                .unwrap(),
            Value::String("Hello World".to_string())
        );
        assert_eq!(
            evaluator.evaluate("${count >= 3}", &context()).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_logic_short_circuits() {
        let evaluator = Evaluator::new();
        // The right side would be an unbound-variable error if evaluated.
        assert_eq!(
            evaluator
                .evaluate("${false && missing}", &context())
                .unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            evaluator
                .evaluate("${true || missing}", &context())
                .unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_unbound_variable_error() {
        let evaluator = Evaluator::new();
        let result = evaluator.evaluate("${nothing}", &context());
        assert!(matches!(result, Err(ExprError::UnboundVariable { .. })));
    }

    #[test]
    fn test_division_by_zero() {
        let evaluator = Evaluator::new();
        let result = evaluator.evaluate("${1 / 0}", &context());
        assert!(matches!(result, Err(ExprError::DivisionByZero)));
    }

    #[test]
    fn test_looks_like_expression() {
        let evaluator = Evaluator::new();
        assert!(evaluator.looks_like_expression("${1+1}"));
        assert!(!evaluator.looks_like_expression("plain text"));
        assert!(!evaluator.looks_like_expression("{not an expression}"));
    }
}
