//! Expression traversal: finds every column reference and nested subquery
//! inside scalar expressions.

use super::Checker;
use sqlparser::ast::{Expr, FunctionArg, FunctionArgExpr, FunctionArguments};

impl Checker<'_> {
    /// Walks one expression, resolving column references against the scope
    /// stack and recursing into subqueries with the outer scopes live, so
    /// correlated references keep resolving.
    pub(super) fn check_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Identifier(ident) => {
                self.check_unqualified(&ident.value);
            }
            Expr::CompoundIdentifier(parts) => {
                if parts.len() >= 2 {
                    let qualifier = parts[..parts.len() - 1]
                        .iter()
                        .map(|i| i.value.as_str())
                        .collect::<Vec<_>>()
                        .join(".");
                    if let Some(column) = parts.last() {
                        self.check_qualified(&qualifier, &column.value);
                    }
                }
            }
            Expr::BinaryOp { left, right, .. } => {
                self.check_expr(left);
                self.check_expr(right);
            }
            Expr::UnaryOp { expr, .. } => self.check_expr(expr),
            Expr::Function(func) => {
                if let FunctionArguments::List(arg_list) = &func.args {
                    for arg in &arg_list.args {
                        match arg {
                            FunctionArg::Unnamed(FunctionArgExpr::Expr(e))
                            | FunctionArg::Named {
                                arg: FunctionArgExpr::Expr(e),
                                ..
                            } => self.check_expr(e),
                            _ => {}
                        }
                    }
                }
            }
            Expr::Case {
                operand,
                conditions,
                results,
                else_result,
            } => {
                if let Some(operand) = operand {
                    self.check_expr(operand);
                }
                for condition in conditions {
                    self.check_expr(condition);
                }
                for result in results {
                    self.check_expr(result);
                }
                if let Some(else_result) = else_result {
                    self.check_expr(else_result);
                }
            }
            Expr::Cast { expr, .. } => self.check_expr(expr),
            Expr::Nested(inner) => self.check_expr(inner),
            Expr::InList { expr, list, .. } => {
                self.check_expr(expr);
                for item in list {
                    self.check_expr(item);
                }
            }
            Expr::Between {
                expr, low, high, ..
            } => {
                self.check_expr(expr);
                self.check_expr(low);
                self.check_expr(high);
            }
            Expr::IsNull(e) | Expr::IsNotNull(e) => self.check_expr(e),
            Expr::IsFalse(e) | Expr::IsNotFalse(e) | Expr::IsTrue(e) | Expr::IsNotTrue(e) => {
                self.check_expr(e);
            }
            Expr::Like { expr, pattern, .. }
            | Expr::ILike { expr, pattern, .. }
            | Expr::SimilarTo { expr, pattern, .. } => {
                self.check_expr(expr);
                self.check_expr(pattern);
            }
            Expr::Tuple(exprs) => {
                for e in exprs {
                    self.check_expr(e);
                }
            }
            Expr::Extract { expr, .. } => self.check_expr(expr),
            Expr::Subquery(query) => self.check_query(query),
            Expr::InSubquery { expr, subquery, .. } => {
                self.check_expr(expr);
                self.check_query(subquery);
            }
            Expr::Exists { subquery, .. } => self.check_query(subquery),
            _ => {
                // Literals, parameters, intervals and the rest carry no
                // column references of their own.
            }
        }
    }
}
