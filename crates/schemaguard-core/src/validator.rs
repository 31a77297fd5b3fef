//! Query validation: resolves every table and column reference in a parsed
//! statement against the physical schema and collects findings.
//!
//! Validation is resilient by design. Parsing must succeed, but resolution
//! keeps going past the first bad reference so the caller sees every problem
//! in one pass. An unknown table is bound as an opaque relation afterwards,
//! which stops one typo from drowning the report in follow-on column noise.

mod exprs;
mod scope;

use crate::error::ValidationFailed;
use crate::suggest::suggest;
use crate::types::{PhysicalSchema, QueryRequest, QueryResult, ValidationIssue};
use crate::{parser, Dialect, DialectResolutionError};
use scope::{Binding, ColumnSet, ScopeKind, ScopeStack};
use sqlparser::ast::{
    Expr, FromTable, JoinConstraint, JoinOperator, OrderBy, Query, Select, SelectItem, SetExpr,
    Statement, TableFactor, TableWithJoins,
};
#[cfg(feature = "tracing")]
use tracing::debug;

/// Validates one query string against the schema.
///
/// Returns the issues in statement order; an empty vector means the query
/// passed. A query that fails to parse yields exactly one
/// [`crate::IssueKind::SyntaxError`] issue. The walk order is deterministic,
/// so validating the same input twice yields identical sequences.
pub fn validate(sql: &str, schema: &PhysicalSchema, dialect: Dialect) -> Vec<ValidationIssue> {
    let statements = match parser::parse(sql, dialect) {
        Ok(statements) => statements,
        Err(err) => return vec![ValidationIssue::syntax_error(err.to_string())],
    };

    let mut checker = Checker {
        schema,
        scopes: ScopeStack::default(),
        issues: Vec::new(),
    };
    for statement in &statements {
        checker.check_statement(statement);
    }

    #[cfg(feature = "tracing")]
    debug!(
        statements = statements.len(),
        issues = checker.issues.len(),
        "query validated"
    );

    checker.issues
}

/// [`validate`] for callers who want issues raised instead of returned.
pub fn validate_strict(
    sql: &str,
    schema: &PhysicalSchema,
    dialect: Dialect,
) -> Result<(), ValidationFailed> {
    let issues = validate(sql, schema, dialect);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationFailed { issues })
    }
}

/// Validates one request, honoring its per-query dialect override.
pub fn validate_request(
    request: &QueryRequest,
    schema: &PhysicalSchema,
    default_dialect: Dialect,
) -> Result<QueryResult, DialectResolutionError> {
    let dialect = match &request.dialect {
        Some(name) => name.parse()?,
        None => default_dialect,
    };
    Ok(QueryResult {
        name: request.name.clone(),
        issues: validate(&request.sql, schema, dialect),
    })
}

struct Checker<'a> {
    schema: &'a PhysicalSchema,
    scopes: ScopeStack,
    issues: Vec<ValidationIssue>,
}

impl Checker<'_> {
    fn check_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Query(query) => self.check_query(query),
            Statement::Insert(insert) => {
                let table = final_name_segment(&insert.table_name.to_string());
                if !self.schema.contains_table(&table) {
                    self.report_unknown_table(&table);
                }
                // The column list names insert targets positionally and is
                // exempt; only the source query gets resolved.
                if let Some(source) = &insert.source {
                    self.check_query(source);
                }
            }
            Statement::Update {
                table,
                assignments,
                from,
                selection,
                ..
            } => {
                self.scopes.push(ScopeKind::Relations);
                self.register_table_with_joins(table);
                if let Some(from_table) = from {
                    self.register_table_with_joins(from_table);
                }
                self.check_join_constraints(table);
                if let Some(from_table) = from {
                    self.check_join_constraints(from_table);
                }
                // SET targets are exempt like INSERT column lists; the
                // assigned values are not.
                for assignment in assignments {
                    self.check_expr(&assignment.value);
                }
                if let Some(expr) = selection {
                    self.check_expr(expr);
                }
                self.scopes.pop();
            }
            Statement::Delete(delete) => {
                self.scopes.push(ScopeKind::Relations);
                let from_tables = match &delete.from {
                    FromTable::WithFromKeyword(ts) | FromTable::WithoutKeyword(ts) => ts,
                };
                for table in from_tables {
                    self.register_table_with_joins(table);
                }
                if let Some(using) = &delete.using {
                    for table in using {
                        self.register_table_with_joins(table);
                    }
                }
                for table in from_tables {
                    self.check_join_constraints(table);
                }
                if let Some(expr) = &delete.selection {
                    self.check_expr(expr);
                }
                self.scopes.pop();
            }
            // DDL, transaction control and session statements reference no
            // schema objects the validator tracks.
            _ => {}
        }
    }

    fn check_query(&mut self, query: &Query) {
        let has_with = query.with.is_some();
        if let Some(with) = &query.with {
            self.scopes.push(ScopeKind::Ctes);
            for cte in &with.cte_tables {
                let name = cte.alias.name.value.clone();
                if with.recursive {
                    // Pre-bind so the self-reference inside the body
                    // resolves; the columns are unknowable at that point.
                    self.scopes.bind(
                        ScopeKind::Ctes,
                        Binding {
                            key: name.clone(),
                            columns: ColumnSet::Opaque,
                        },
                    );
                }
                self.check_query(&cte.query);
                let columns = if cte.alias.columns.is_empty() {
                    projection_columns(&cte.query)
                } else {
                    ColumnSet::Known(
                        cte.alias
                            .columns
                            .iter()
                            .map(|c| unquote_identifier(&c.to_string()))
                            .collect(),
                    )
                };
                self.scopes.bind(ScopeKind::Ctes, Binding { key: name, columns });
            }
        }

        match &*query.body {
            SetExpr::Select(select) => self.check_select(select, query.order_by.as_ref()),
            other => {
                self.check_body(other);
                if let Some(order_by) = &query.order_by {
                    // ORDER BY on a set operation sees the output columns of
                    // the body, not any relation.
                    self.scopes.push(ScopeKind::Relations);
                    self.scopes.bind(
                        ScopeKind::Relations,
                        Binding {
                            key: String::new(),
                            columns: body_projection(other),
                        },
                    );
                    self.check_order_by(order_by);
                    self.scopes.pop();
                }
            }
        }

        if has_with {
            self.scopes.pop();
        }
    }

    fn check_body(&mut self, body: &SetExpr) {
        match body {
            SetExpr::Select(select) => self.check_select(select, None),
            SetExpr::Query(query) => self.check_query(query),
            SetExpr::SetOperation { left, right, .. } => {
                self.check_body(left);
                self.check_body(right);
            }
            // VALUES rows contain no resolvable references.
            SetExpr::Values(_) => {}
            _ => {}
        }
    }

    fn check_select(&mut self, select: &Select, order_by: Option<&OrderBy>) {
        self.scopes.push(ScopeKind::Relations);

        // Register every FROM and JOIN target before touching any
        // expression, so join conditions see all relations of the clause.
        for table_with_joins in &select.from {
            self.register_table_with_joins(table_with_joins);
        }
        for table_with_joins in &select.from {
            self.check_join_constraints(table_with_joins);
        }

        let mut aliases: Vec<String> = Vec::new();
        for item in &select.projection {
            match item {
                SelectItem::UnnamedExpr(expr) => self.check_expr(expr),
                SelectItem::ExprWithAlias { expr, alias } => {
                    self.check_expr(expr);
                    aliases.push(alias.value.clone());
                }
                SelectItem::QualifiedWildcard(name, _) => {
                    // table.* is valid iff the qualifier names a visible
                    // relation; its columns are never checked individually.
                    let qualifier = normalize_qualifier(&name.to_string());
                    if self.scopes.resolve_qualifier(&qualifier).is_none() {
                        self.report_unknown_qualifier(&qualifier);
                    }
                }
                SelectItem::Wildcard(_) => {}
            }
        }

        if let Some(where_clause) = &select.selection {
            self.check_expr(where_clause);
        }

        // Projection aliases become referencable in the grouping and
        // ordering clauses; they live in their own inner scope so they win
        // over relation columns without ever reading as ambiguous.
        self.scopes.push(ScopeKind::Relations);
        self.scopes.bind(
            ScopeKind::Relations,
            Binding {
                key: String::new(),
                columns: ColumnSet::Known(aliases),
            },
        );

        if let sqlparser::ast::GroupByExpr::Expressions(exprs, _) = &select.group_by {
            for expr in exprs {
                self.check_expr(expr);
            }
        }
        if let Some(having) = &select.having {
            self.check_expr(having);
        }
        if let Some(order_by) = order_by {
            self.check_order_by(order_by);
        }

        self.scopes.pop();
        self.scopes.pop();
    }

    fn check_order_by(&mut self, order_by: &OrderBy) {
        for order_expr in &order_by.exprs {
            self.check_expr(&order_expr.expr);
        }
    }

    fn register_table_with_joins(&mut self, table_with_joins: &TableWithJoins) {
        self.register_table_factor(&table_with_joins.relation);
        for join in &table_with_joins.joins {
            self.register_table_factor(&join.relation);
        }
    }

    fn register_table_factor(&mut self, factor: &TableFactor) {
        match factor {
            TableFactor::Table { name, alias, .. } => {
                let parts = split_qualified_identifiers(&name.to_string());
                let table = parts
                    .last()
                    .map(|p| unquote_identifier(p))
                    .unwrap_or_default();
                let key = alias
                    .as_ref()
                    .map(|a| a.name.value.clone())
                    .unwrap_or_else(|| table.clone());

                // A bare single-part name may refer to a CTE, which shadows
                // any schema table of the same name.
                let cte_columns = if parts.len() == 1 {
                    self.scopes.lookup_cte(&table).map(|b| b.columns.clone())
                } else {
                    None
                };
                let mut columns = match cte_columns {
                    Some(columns) => columns,
                    None => match self.schema.table(&table) {
                        Some(physical) => ColumnSet::Known(
                            physical.column_names().map(str::to_string).collect(),
                        ),
                        None => {
                            self.report_unknown_table(&table);
                            ColumnSet::Opaque
                        }
                    },
                };
                if let Some(alias) = alias {
                    if !alias.columns.is_empty() {
                        columns = ColumnSet::Known(
                            alias
                                .columns
                                .iter()
                                .map(|c| unquote_identifier(&c.to_string()))
                                .collect(),
                        );
                    }
                }
                self.scopes
                    .bind(ScopeKind::Relations, Binding { key, columns });
            }
            TableFactor::Derived {
                subquery, alias, ..
            } => {
                self.check_query(subquery);
                let key = alias
                    .as_ref()
                    .map(|a| a.name.value.clone())
                    .unwrap_or_default();
                let columns = match alias {
                    Some(alias) if !alias.columns.is_empty() => ColumnSet::Known(
                        alias
                            .columns
                            .iter()
                            .map(|c| unquote_identifier(&c.to_string()))
                            .collect(),
                    ),
                    _ => projection_columns(subquery),
                };
                self.scopes
                    .bind(ScopeKind::Relations, Binding { key, columns });
            }
            TableFactor::NestedJoin {
                table_with_joins, ..
            } => {
                self.register_table_with_joins(table_with_joins);
            }
            // Table functions, UNNEST and friends produce rows the schema
            // knows nothing about.
            _ => {
                self.scopes.bind(
                    ScopeKind::Relations,
                    Binding {
                        key: String::new(),
                        columns: ColumnSet::Opaque,
                    },
                );
            }
        }
    }

    fn check_join_constraints(&mut self, table_with_joins: &TableWithJoins) {
        if let TableFactor::NestedJoin {
            table_with_joins: inner,
            ..
        } = &table_with_joins.relation
        {
            self.check_join_constraints(inner);
        }
        for join in &table_with_joins.joins {
            match join_constraint(&join.join_operator) {
                Some(JoinConstraint::On(expr)) => self.check_expr(expr),
                Some(JoinConstraint::Using(columns)) => {
                    // USING names a column present on both sides, so it is
                    // exempt from ambiguity by construction; existence still
                    // has to hold.
                    for column in columns {
                        let name = unquote_identifier(&column.to_string());
                        if self.scopes.resolve_unqualified(&name)
                            == scope::Resolution::NotFound
                        {
                            self.report_unknown_column(&name);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn check_unqualified(&mut self, column: &str) {
        match self.scopes.resolve_unqualified(column) {
            scope::Resolution::Found => {}
            scope::Resolution::Ambiguous(keys) => {
                self.issues
                    .push(ValidationIssue::ambiguous_column(column, &keys));
            }
            scope::Resolution::NotFound => self.report_unknown_column(column),
        }
    }

    fn check_qualified(&mut self, qualifier: &str, column: &str) {
        let verdict = match self.scopes.resolve_qualifier(qualifier) {
            None => None,
            Some(binding) => {
                if binding.columns.contains(column) {
                    return;
                }
                let pool: Vec<&str> = match &binding.columns {
                    ColumnSet::Known(cols) => cols.iter().map(String::as_str).collect(),
                    ColumnSet::Opaque => Vec::new(),
                };
                Some(suggest(column, pool))
            }
        };
        match verdict {
            Some(suggestion) => self.issues.push(ValidationIssue::unknown_column_in(
                qualifier, column, suggestion,
            )),
            None => self.report_unknown_qualifier(qualifier),
        }
    }

    fn report_unknown_table(&mut self, table: &str) {
        let pool: Vec<&str> = self
            .schema
            .table_names()
            .chain(self.scopes.cte_names())
            .collect();
        let suggestion = suggest(table, pool);
        self.issues
            .push(ValidationIssue::unknown_table(table, suggestion));
    }

    /// A qualifier that names no visible relation. Suggestion candidates
    /// cover aliases and CTEs as well as schema tables, since any of them
    /// could be what was meant.
    fn report_unknown_qualifier(&mut self, qualifier: &str) {
        let pool: Vec<&str> = self
            .scopes
            .relation_keys()
            .chain(self.schema.table_names())
            .chain(self.scopes.cte_names())
            .collect();
        let suggestion = suggest(qualifier, pool);
        self.issues
            .push(ValidationIssue::unknown_table(qualifier, suggestion));
    }

    fn report_unknown_column(&mut self, column: &str) {
        let pool = self.scopes.visible_columns();
        let suggestion = suggest(column, pool);
        self.issues
            .push(ValidationIssue::unknown_column(column, suggestion));
    }
}

/// Output column names of a query, for binding CTEs and derived tables.
fn projection_columns(query: &Query) -> ColumnSet {
    body_projection(&query.body)
}

fn body_projection(body: &SetExpr) -> ColumnSet {
    match body {
        SetExpr::Select(select) => {
            let mut columns = Vec::with_capacity(select.projection.len());
            for item in &select.projection {
                match item {
                    SelectItem::UnnamedExpr(Expr::Identifier(ident)) => {
                        columns.push(ident.value.clone());
                    }
                    SelectItem::UnnamedExpr(Expr::CompoundIdentifier(parts)) => {
                        match parts.last() {
                            Some(last) => columns.push(last.value.clone()),
                            None => return ColumnSet::Opaque,
                        }
                    }
                    SelectItem::ExprWithAlias { alias, .. } => {
                        columns.push(alias.value.clone());
                    }
                    // Wildcards and unnamed computed expressions make the
                    // output list unknowable without a schema walk.
                    _ => return ColumnSet::Opaque,
                }
            }
            ColumnSet::Known(columns)
        }
        SetExpr::Query(query) => projection_columns(query),
        // Branch projections must agree in arity, so the left one speaks
        // for the whole operation.
        SetExpr::SetOperation { left, .. } => body_projection(left),
        _ => ColumnSet::Opaque,
    }
}

fn join_constraint(operator: &JoinOperator) -> Option<&JoinConstraint> {
    match operator {
        JoinOperator::Inner(constraint)
        | JoinOperator::LeftOuter(constraint)
        | JoinOperator::RightOuter(constraint)
        | JoinOperator::FullOuter(constraint)
        | JoinOperator::LeftSemi(constraint)
        | JoinOperator::RightSemi(constraint)
        | JoinOperator::LeftAnti(constraint)
        | JoinOperator::RightAnti(constraint) => Some(constraint),
        _ => None,
    }
}

/// A qualified name with each segment unquoted, rejoined with dots, so it
/// compares against binding keys the same way identifier parts do.
fn normalize_qualifier(name: &str) -> String {
    split_qualified_identifiers(name)
        .iter()
        .map(|p| unquote_identifier(p))
        .collect::<Vec<_>>()
        .join(".")
}

/// Last segment of a possibly qualified name, unquoted.
fn final_name_segment(name: &str) -> String {
    let mut parts = split_qualified_identifiers(name);
    parts
        .pop()
        .map(|p| unquote_identifier(&p))
        .unwrap_or_else(|| name.to_string())
}

fn split_qualified_identifiers(name: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = name.chars().peekable();
    let mut active_quote: Option<char> = None;

    while let Some(ch) = chars.next() {
        if let Some(q) = active_quote {
            current.push(ch);
            if ch == q {
                if matches!(q, '"' | '\'' | '`') {
                    if let Some(next) = chars.peek() {
                        if *next == q {
                            current.push(ch);
                            chars.next();
                            continue;
                        }
                    }
                }
                active_quote = None;
            }
            continue;
        }

        match ch {
            '"' | '\'' | '`' => {
                active_quote = Some(ch);
                current.push(ch);
            }
            '[' => {
                active_quote = Some(']');
                current.push(ch);
            }
            '.' => {
                if !current.is_empty() {
                    parts.push(current.trim().to_string());
                    current.clear();
                }
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() {
        parts.push(current.trim().to_string());
    }

    if parts.is_empty() && !name.is_empty() {
        vec![name.trim().to_string()]
    } else {
        parts
    }
}

fn is_quoted_identifier(part: &str) -> bool {
    let trimmed = part.trim();
    if trimmed.len() < 2 {
        return false;
    }
    let first = trimmed.chars().next().unwrap_or_default();
    let last = trimmed.chars().last().unwrap_or_default();
    matches!(
        (first, last),
        ('"', '"') | ('`', '`') | ('[', ']') | ('\'', '\'')
    )
}

fn unquote_identifier(part: &str) -> String {
    let trimmed = part.trim();
    if trimmed.len() < 2 {
        return trimmed.to_string();
    }

    if is_quoted_identifier(trimmed) {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("jobs", vec!["jobs"])]
    #[case("public.jobs", vec!["public", "jobs"])]
    #[case("\"My Schema\".jobs", vec!["\"My Schema\"", "jobs"])]
    #[case("`db`.`jobs`", vec!["`db`", "`jobs`"])]
    #[case("[dbo].[jobs]", vec!["[dbo]", "[jobs]"])]
    fn splits_qualified_names(#[case] input: &str, #[case] expected: Vec<&str>) {
        assert_eq!(split_qualified_identifiers(input), expected);
    }

    #[rstest]
    #[case("\"jobs\"", "jobs")]
    #[case("`jobs`", "jobs")]
    #[case("[jobs]", "jobs")]
    #[case("jobs", "jobs")]
    #[case("j", "j")]
    fn unquotes_identifiers(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(unquote_identifier(input), expected);
    }

    #[test]
    fn final_segment_of_qualified_name() {
        assert_eq!(final_name_segment("public.\"Jobs\""), "Jobs");
        assert_eq!(final_name_segment("jobs"), "jobs");
    }

    #[rstest]
    #[case("\"jobs\"", "jobs")]
    #[case("public.\"jobs\"", "public.jobs")]
    #[case("`db`.`jobs`", "db.jobs")]
    #[case("jobs", "jobs")]
    fn qualifiers_normalize_unquoted(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_qualifier(input), expected);
    }
}
