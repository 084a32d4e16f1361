//! Statement, block and pattern rendering.

use minipy_ast::{
    Alias, ClassDef, ConstantValue, ExceptHandler, Expr, For, FunctionDef, If, ImportFrom, Match,
    Pattern, Precedence, Stmt, StmtKind, Try, TypeParam, While, With,
};

use super::literal::{clean_docstring, docstring_literal};
use super::{is_identifier, terminator, Printer};
use crate::error::RenderError;

type Result<T = ()> = std::result::Result<T, RenderError>;

/// `yield` needs parentheses everywhere except assignment values and bare
/// expression statements.
fn value_level(expr: &Expr, level: Precedence) -> Precedence {
    match expr {
        Expr::Yield(_) | Expr::YieldFrom(_) => Precedence::Test,
        _ => level,
    }
}

fn opens_block(stmt: &Stmt) -> bool {
    matches!(
        stmt,
        Stmt::FunctionDef(_)
            | Stmt::AsyncFunctionDef(_)
            | Stmt::ClassDef(_)
            | Stmt::For(_)
            | Stmt::AsyncFor(_)
            | Stmt::While(_)
            | Stmt::If(_)
            | Stmt::With(_)
            | Stmt::AsyncWith(_)
            | Stmt::Match(_)
            | Stmt::Try(_)
            | Stmt::TryStar(_)
    )
}

fn check_dotted(node: &'static str, name: &str) -> Result {
    if name.split('.').all(is_identifier) {
        Ok(())
    } else {
        Err(RenderError::malformed(
            node,
            format!("'{}' is not a dotted name", name),
        ))
    }
}

impl Printer {
    /// Render the statements of one body. `docstring` allows the first
    /// statement to be treated as a docstring.
    pub(crate) fn statements(&mut self, body: &[Stmt], docstring: bool) -> Result {
        for (i, stmt) in body.iter().enumerate() {
            if let (true, 0, Stmt::Expr(node)) = (docstring, i, stmt) {
                if let Expr::Constant(constant) = &node.value {
                    if let ConstantValue::Str(text) = &constant.value {
                        self.docstring(text, constant.kind.as_deref() == Some("u"));
                        continue;
                    }
                }
            }
            self.stmt(stmt)?;
        }
        // A trailing import stays inside its own block.
        self.flush_imports()
    }

    fn docstring(&mut self, text: &str, u_prefix: bool) {
        self.state.begin_statement(false);
        let literal = docstring_literal(&clean_docstring(text));
        if u_prefix {
            self.state.add_token(&format!("u{}", literal));
        } else {
            self.state.add_token(&literal);
        }
        self.hooks.run(StmtKind::Expr, &mut self.state);
    }

    /// `:` followed by an indented body.
    fn block(&mut self, node: &'static str, body: &[Stmt], docstring: bool) -> Result {
        if body.is_empty() {
            return Err(RenderError::malformed(node, "empty block"));
        }
        self.state.add_token(":");
        self.state.indent();
        let result = self.statements(body, docstring);
        self.state.dedent();
        result
    }

    /// A continuation clause (`else`, `finally`, ...) on its own line.
    fn clause(&mut self, node: &'static str, keyword: &str, body: &[Stmt]) -> Result {
        self.state.begin_statement(true);
        self.state.add_keyword(keyword);
        self.block(node, body, false)
    }

    fn flush_imports(&mut self) -> Result {
        if self.imports.is_empty() {
            return Ok(());
        }
        let names = std::mem::take(&mut self.imports);
        self.state.begin_statement(false);
        self.state.add_keyword("import");
        self.comma_separated(&names, |p, alias| p.alias("Import", alias))?;
        terminator::terminate(&mut self.state);
        self.hooks.run(StmtKind::Import, &mut self.state);
        Ok(())
    }

    fn alias(&mut self, node: &'static str, alias: &Alias) -> Result {
        if alias.name != "*" {
            check_dotted(node, &alias.name)?;
        }
        self.state.add_token(&alias.name);
        if let Some(asname) = &alias.asname {
            self.state.add_keyword("as");
            self.identifier(node, asname)?;
        }
        Ok(())
    }

    fn stmt(&mut self, stmt: &Stmt) -> Result {
        if let Stmt::Import(node) = stmt {
            if node.names.is_empty() {
                return Err(RenderError::malformed("Import", "no names"));
            }
            for alias in &node.names {
                check_dotted("Import", &alias.name)?;
            }
            self.imports.extend(node.names.iter().cloned());
            return Ok(());
        }
        self.flush_imports()?;
        self.state.begin_statement(opens_block(stmt));

        match stmt {
            Stmt::FunctionDef(node) => self.function_def(node, false)?,
            Stmt::AsyncFunctionDef(node) => self.function_def(node, true)?,
            Stmt::ClassDef(node) => self.class_def(node)?,
            Stmt::Return(node) => {
                self.state.add_keyword("return");
                if let Some(value) = &node.value {
                    self.expr(value, value_level(value, Precedence::Tuple))?;
                }
            }
            Stmt::Delete(node) => {
                if node.targets.is_empty() {
                    return Err(RenderError::malformed("Delete", "no targets"));
                }
                self.state.add_keyword("del");
                self.comma_separated(&node.targets, |p, t| p.expr(t, Precedence::Test))?;
            }
            Stmt::Assign(node) => {
                if node.targets.is_empty() {
                    return Err(RenderError::malformed("Assign", "no targets"));
                }
                for target in &node.targets {
                    self.expr(target, Precedence::Tuple)?;
                    self.state.add_token("=");
                }
                self.expr(&node.value, Precedence::Tuple)?;
            }
            Stmt::TypeAlias(node) => {
                self.state.add_keyword("type");
                self.expr(&node.name, Precedence::Atom)?;
                self.type_params(&node.type_params)?;
                self.state.add_token("=");
                self.expr(&node.value, Precedence::Test)?;
            }
            Stmt::AugAssign(node) => {
                self.expr(&node.target, Precedence::Atom)?;
                self.state.add_token(node.op.symbol());
                self.state.add_token("=");
                self.expr(&node.value, Precedence::Tuple)?;
            }
            Stmt::AnnAssign(node) => {
                match (&node.target, node.simple) {
                    (Expr::Name(name), false) => {
                        self.state.add_token("(");
                        self.identifier("AnnAssign", &name.id)?;
                        self.state.add_token(")");
                    }
                    (target, _) => self.expr(target, Precedence::Atom)?,
                }
                self.state.add_token(":");
                self.expr(&node.annotation, Precedence::Test)?;
                if let Some(value) = &node.value {
                    self.state.add_token("=");
                    self.expr(value, Precedence::Tuple)?;
                }
            }
            Stmt::For(node) => self.for_loop(node, false)?,
            Stmt::AsyncFor(node) => self.for_loop(node, true)?,
            Stmt::While(node) => self.while_loop(node)?,
            Stmt::If(node) => self.if_chain(node, "if")?,
            Stmt::With(node) => self.with(node, false)?,
            Stmt::AsyncWith(node) => self.with(node, true)?,
            Stmt::Match(node) => self.match_stmt(node)?,
            Stmt::Raise(node) => {
                self.state.add_keyword("raise");
                match (&node.exc, &node.cause) {
                    (None, Some(_)) => {
                        return Err(RenderError::malformed(
                            "Raise",
                            "cause without an exception",
                        ))
                    }
                    (None, None) => {}
                    (Some(exc), cause) => {
                        self.expr(exc, Precedence::Test)?;
                        if let Some(cause) = cause {
                            self.state.add_keyword("from");
                            self.expr(cause, Precedence::Test)?;
                        }
                    }
                }
            }
            Stmt::Try(node) => self.try_stmt("Try", node, false)?,
            Stmt::TryStar(node) => self.try_stmt("TryStar", node, true)?,
            Stmt::Assert(node) => {
                self.state.add_keyword("assert");
                self.expr(&node.test, Precedence::Test)?;
                if let Some(msg) = &node.msg {
                    self.state.add_token(",");
                    self.expr(msg, Precedence::Test)?;
                }
            }
            Stmt::Import(_) => {}
            Stmt::ImportFrom(node) => self.import_from(node)?,
            Stmt::Global(node) => self.names("Global", "global", &node.names)?,
            Stmt::Nonlocal(node) => self.names("Nonlocal", "nonlocal", &node.names)?,
            Stmt::Expr(node) => self.expr(&node.value, Precedence::Tuple)?,
            Stmt::Pass {} => self.state.add_keyword("pass"),
            Stmt::Break {} => self.state.add_keyword("break"),
            Stmt::Continue {} => self.state.add_keyword("continue"),
        }

        self.hooks.run(stmt.kind(), &mut self.state);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Definitions
    // ------------------------------------------------------------------

    fn decorators(&mut self, decorators: &[Expr]) -> Result {
        for decorator in decorators {
            self.state.add_token("@");
            self.expr(decorator, Precedence::NamedExpr)?;
            self.state.begin_statement(true);
        }
        Ok(())
    }

    fn function_def(&mut self, node: &FunctionDef, is_async: bool) -> Result {
        self.decorators(&node.decorator_list)?;
        if is_async {
            self.state.add_keyword("async");
        }
        self.state.add_keyword("def");
        self.identifier("FunctionDef", &node.name)?;
        self.type_params(&node.type_params)?;
        self.state.add_token("(");
        self.arguments("FunctionDef", &node.args, true)?;
        self.state.add_token(")");
        if let Some(returns) = &node.returns {
            self.state.add_token("->");
            self.expr(returns, Precedence::Test)?;
        }
        self.block("FunctionDef", &node.body, true)
    }

    fn class_def(&mut self, node: &ClassDef) -> Result {
        self.decorators(&node.decorator_list)?;
        self.state.add_keyword("class");
        self.identifier("ClassDef", &node.name)?;
        self.type_params(&node.type_params)?;
        if !node.bases.is_empty() || !node.keywords.is_empty() {
            self.state.add_token("(");
            self.comma_separated(&node.bases, |p, base| p.expr(base, Precedence::Test))?;
            if !node.bases.is_empty() && !node.keywords.is_empty() {
                self.state.add_token(",");
            }
            self.comma_separated(&node.keywords, Printer::keyword)?;
            self.state.add_token(")");
        }
        self.block("ClassDef", &node.body, true)
    }

    fn type_params(&mut self, params: &[TypeParam]) -> Result {
        if params.is_empty() {
            return Ok(());
        }
        self.state.add_token("[");
        self.comma_separated(params, |p, param| {
            let default = match param {
                TypeParam::TypeVar {
                    name,
                    bound,
                    default_value,
                } => {
                    p.identifier("TypeVar", name)?;
                    if let Some(bound) = bound {
                        p.state.add_token(":");
                        p.expr(bound, Precedence::Test)?;
                    }
                    default_value
                }
                TypeParam::ParamSpec {
                    name,
                    default_value,
                } => {
                    p.state.add_token("**");
                    p.identifier("ParamSpec", name)?;
                    default_value
                }
                TypeParam::TypeVarTuple {
                    name,
                    default_value,
                } => {
                    p.state.add_token("*");
                    p.identifier("TypeVarTuple", name)?;
                    default_value
                }
            };
            if let Some(default) = default {
                p.state.add_token("=");
                p.expr(default, Precedence::Test)?;
            }
            Ok(())
        })?;
        self.state.add_token("]");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Simple statements
    // ------------------------------------------------------------------

    fn import_from(&mut self, node: &ImportFrom) -> Result {
        if node.names.is_empty() {
            return Err(RenderError::malformed("ImportFrom", "no names"));
        }
        let mut source = ".".repeat(node.level as usize);
        match &node.module {
            Some(module) => {
                check_dotted("ImportFrom", module)?;
                source.push_str(module);
            }
            None if node.level == 0 => {
                return Err(RenderError::malformed("ImportFrom", "no module and no level"))
            }
            None => {}
        }
        self.state.add_keyword("from");
        self.state.add_token(&source);
        self.state.add_keyword("import");
        self.comma_separated(&node.names, |p, alias| p.alias("ImportFrom", alias))
    }

    fn names(&mut self, node: &'static str, keyword: &str, names: &[String]) -> Result {
        if names.is_empty() {
            return Err(RenderError::malformed(node, "no names"));
        }
        self.state.add_keyword(keyword);
        self.comma_separated(names, |p, name| p.identifier(node, name))
    }

    // ------------------------------------------------------------------
    // Compound statements
    // ------------------------------------------------------------------

    fn if_chain(&mut self, node: &If, keyword: &str) -> Result {
        self.state.add_keyword(keyword);
        self.expr(&node.test, value_level(&node.test, Precedence::NamedExpr))?;
        self.block("If", &node.body, false)?;
        match node.orelse.as_slice() {
            [] => Ok(()),
            [Stmt::If(inner)] => {
                self.state.begin_statement(true);
                self.if_chain(inner, "elif")
            }
            orelse => self.clause("If", "else", orelse),
        }
    }

    fn for_loop(&mut self, node: &For, is_async: bool) -> Result {
        if is_async {
            self.state.add_keyword("async");
        }
        self.state.add_keyword("for");
        self.expr(&node.target, Precedence::Tuple)?;
        self.state.add_keyword("in");
        self.expr(&node.iter, value_level(&node.iter, Precedence::Tuple))?;
        self.block("For", &node.body, false)?;
        if !node.orelse.is_empty() {
            self.clause("For", "else", &node.orelse)?;
        }
        Ok(())
    }

    fn while_loop(&mut self, node: &While) -> Result {
        self.state.add_keyword("while");
        self.expr(&node.test, value_level(&node.test, Precedence::NamedExpr))?;
        self.block("While", &node.body, false)?;
        if !node.orelse.is_empty() {
            self.clause("While", "else", &node.orelse)?;
        }
        Ok(())
    }

    fn with(&mut self, node: &With, is_async: bool) -> Result {
        if node.items.is_empty() {
            return Err(RenderError::malformed("With", "no items"));
        }
        if is_async {
            self.state.add_keyword("async");
        }
        self.state.add_keyword("with");
        self.comma_separated(&node.items, |p, item| {
            p.expr(&item.context_expr, Precedence::Test)?;
            if let Some(vars) = &item.optional_vars {
                p.state.add_keyword("as");
                p.expr(vars, Precedence::Test)?;
            }
            Ok(())
        })?;
        self.block("With", &node.body, false)
    }

    fn try_stmt(&mut self, node_name: &'static str, node: &Try, star: bool) -> Result {
        if node.handlers.is_empty() && node.finalbody.is_empty() {
            return Err(RenderError::malformed(
                node_name,
                "neither handlers nor finally",
            ));
        }
        if node.handlers.is_empty() && !node.orelse.is_empty() {
            return Err(RenderError::malformed(node_name, "else without handlers"));
        }
        self.state.add_keyword("try");
        self.block(node_name, &node.body, false)?;
        for handler in &node.handlers {
            self.handler(handler, star)?;
        }
        if !node.orelse.is_empty() {
            self.clause(node_name, "else", &node.orelse)?;
        }
        if !node.finalbody.is_empty() {
            self.clause(node_name, "finally", &node.finalbody)?;
        }
        Ok(())
    }

    fn handler(&mut self, handler: &ExceptHandler, star: bool) -> Result {
        self.state.begin_statement(true);
        self.state.add_keyword("except");
        if star {
            self.state.add_token("*");
        }
        match (&handler.type_, &handler.name) {
            (None, Some(_)) => {
                return Err(RenderError::malformed(
                    "ExceptHandler",
                    "name without an exception type",
                ))
            }
            (None, None) => {}
            (Some(type_), name) => {
                self.expr(type_, Precedence::Test)?;
                if let Some(name) = name {
                    self.state.add_keyword("as");
                    self.identifier("ExceptHandler", name)?;
                }
            }
        }
        self.block("ExceptHandler", &handler.body, false)
    }

    fn match_stmt(&mut self, node: &Match) -> Result {
        if node.cases.is_empty() {
            return Err(RenderError::malformed("Match", "no cases"));
        }
        // Soft keyword: always separated from the subject.
        self.state.add_keyword("match");
        self.state.add_token(" ");
        self.expr(&node.subject, value_level(&node.subject, Precedence::Tuple))?;
        self.state.add_token(":");
        self.state.indent();
        let result = node.cases.iter().try_for_each(|case| {
            self.state.begin_statement(false);
            self.state.add_keyword("case");
            self.state.add_token(" ");
            self.pattern(&case.pattern, Precedence::Test)?;
            if let Some(guard) = &case.guard {
                self.state.add_keyword("if");
                self.expr(guard, Precedence::NamedExpr)?;
            }
            self.block("MatchCase", &case.body, false)
        });
        self.state.dedent();
        result
    }

    // ------------------------------------------------------------------
    // Patterns
    // ------------------------------------------------------------------

    pub(crate) fn pattern(&mut self, pattern: &Pattern, required: Precedence) -> Result {
        match pattern {
            Pattern::MatchValue { value } => self.expr(value, Precedence::EXPR),
            Pattern::MatchSingleton { value } => match value {
                ConstantValue::None | ConstantValue::Bool(_) => {
                    self.constant(value, Precedence::Atom)
                }
                other => Err(RenderError::malformed(
                    "MatchSingleton",
                    format!("{:?} is not a singleton", other),
                )),
            },
            Pattern::MatchSequence { patterns } => {
                self.state.add_token("[");
                self.comma_separated(patterns, |p, item| p.pattern(item, Precedence::Test))?;
                self.state.add_token("]");
                Ok(())
            }
            Pattern::MatchMapping {
                keys,
                patterns,
                rest,
            } => {
                if keys.len() != patterns.len() {
                    return Err(RenderError::malformed(
                        "MatchMapping",
                        format!("{} keys for {} patterns", keys.len(), patterns.len()),
                    ));
                }
                self.state.add_token("{");
                for (i, (key, value)) in keys.iter().zip(patterns).enumerate() {
                    if i > 0 {
                        self.state.add_token(",");
                    }
                    self.expr(key, Precedence::EXPR)?;
                    self.state.add_token(":");
                    self.pattern(value, Precedence::Test)?;
                }
                if let Some(rest) = rest {
                    if !keys.is_empty() {
                        self.state.add_token(",");
                    }
                    self.state.add_token("**");
                    self.identifier("MatchMapping", rest)?;
                }
                self.state.add_token("}");
                Ok(())
            }
            Pattern::MatchClass {
                cls,
                patterns,
                kwd_attrs,
                kwd_patterns,
            } => {
                if kwd_attrs.len() != kwd_patterns.len() {
                    return Err(RenderError::malformed(
                        "MatchClass",
                        format!(
                            "{} keyword names for {} keyword patterns",
                            kwd_attrs.len(),
                            kwd_patterns.len()
                        ),
                    ));
                }
                self.expr(cls, Precedence::Atom)?;
                self.state.add_token("(");
                self.comma_separated(patterns, |p, item| p.pattern(item, Precedence::Test))?;
                for (i, (attr, value)) in kwd_attrs.iter().zip(kwd_patterns).enumerate() {
                    if i > 0 || !patterns.is_empty() {
                        self.state.add_token(",");
                    }
                    self.identifier("MatchClass", attr)?;
                    self.state.add_token("=");
                    self.pattern(value, Precedence::Test)?;
                }
                self.state.add_token(")");
                Ok(())
            }
            Pattern::MatchStar { name } => {
                self.state.add_token("*");
                match name {
                    Some(name) => self.identifier("MatchStar", name),
                    None => {
                        self.state.add_token("_");
                        Ok(())
                    }
                }
            }
            Pattern::MatchAs { pattern, name } => match (pattern, name) {
                (None, None) => {
                    self.state.add_token("_");
                    Ok(())
                }
                (None, Some(name)) => self.identifier("MatchAs", name),
                (Some(inner), Some(name)) => {
                    self.parenthesize(required > Precedence::Test, |p| {
                        p.pattern(inner, Precedence::BitOr)?;
                        p.state.add_keyword("as");
                        p.identifier("MatchAs", name)
                    })
                }
                (Some(_), None) => Err(RenderError::malformed(
                    "MatchAs",
                    "sub-pattern without a name",
                )),
            },
            Pattern::MatchOr { patterns } => {
                if patterns.len() < 2 {
                    return Err(RenderError::malformed(
                        "MatchOr",
                        format!("{} alternative(s), expected at least 2", patterns.len()),
                    ));
                }
                self.parenthesize(required > Precedence::BitOr, |p| {
                    for (i, item) in patterns.iter().enumerate() {
                        if i > 0 {
                            p.state.add_token("|");
                        }
                        p.pattern(item, Precedence::BitOr.next())?;
                    }
                    Ok(())
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use minipy_ast::{
        AnnAssign, Arguments, Assign, BoolOperator, ExprStmt, MatchCase, Module, Operator,
        Raise, WithItem,
    };

    use super::*;
    use crate::codegen::Terminators;

    fn render(body: Vec<Stmt>) -> String {
        Printer::minimizer().render(&Module::new(body)).unwrap()
    }

    fn assign(name: &str, value: u32) -> Stmt {
        Stmt::assign(vec![Expr::name(name)], Expr::int(value))
    }

    fn call(name: &str) -> Stmt {
        Stmt::expr(Expr::call(Expr::name(name), vec![]))
    }

    #[test]
    fn simple_statements_share_a_line() {
        assert_eq!(render(vec![assign("x", 1), assign("y", 2)]), "x=1;y=2;");
        assert_eq!(
            render(vec![Stmt::return_(Some(Expr::ellipsis()))]),
            "return...;"
        );
    }

    #[test]
    fn blocks_indent_by_one_space() {
        let text = render(vec![
            Stmt::function("f", Arguments::simple(["a"]), vec![Stmt::return_(Some(Expr::name("a")))]),
            call("f"),
        ]);
        assert_eq!(text, "def f(a):\n return a;\nf();");
    }

    #[test]
    fn else_if_chains_use_elif() {
        let chain = Stmt::if_(
            Expr::name("a"),
            vec![assign("x", 1)],
            vec![Stmt::if_(
                Expr::name("b"),
                vec![assign("x", 2)],
                vec![assign("x", 3)],
            )],
        );
        assert_eq!(
            render(vec![chain]),
            "if a:\n x=1;\nelif b:\n x=2;\nelse:\n x=3;"
        );
    }

    #[test]
    fn imports_coalesce_until_another_statement() {
        let text = render(vec![
            Stmt::import(["os"]),
            Stmt::import(["sys", "re"]),
            assign("x", 1),
            Stmt::import(["json"]),
        ]);
        assert_eq!(text, "import os,sys,re;x=1;import json;");
    }

    #[test]
    fn trailing_import_stays_in_its_block() {
        let text = render(vec![
            Stmt::if_(Expr::name("a"), vec![Stmt::import(["os"])], vec![]),
            assign("x", 1),
        ]);
        assert_eq!(text, "if a:\n import os;\nx=1;");
    }

    #[test]
    fn import_hooks_run_once_per_flush() {
        let mut printer = Printer::minimizer();
        printer
            .hooks_mut()
            .attach(StmtKind::Import, Box::new(|state| state.add_token("#")));
        let module = Module::new(vec![Stmt::import(["a"]), Stmt::import(["b"])]);
        assert_eq!(printer.render(&module).unwrap(), "import a,b;#");
    }

    #[test]
    fn import_kept_in_terminator_set_is_not_doubled() {
        let mut printer = Printer::new(&Terminators::default());
        let module = Module::new(vec![Stmt::import(["a"])]);
        assert_eq!(printer.render(&module).unwrap(), "import a;");
    }

    #[test]
    fn docstrings_are_cleaned() {
        let body = vec![
            Stmt::expr(Expr::str("\n    Summary.\n\n    More.\n    ")),
            Stmt::pass(),
        ];
        let text = render(vec![Stmt::function("f", Arguments::default(), body)]);
        assert_eq!(text, "def f():\n 'Summary.\\n\\nMore.';pass;");
    }

    #[test]
    fn u_prefixed_docstring_keeps_its_prefix() {
        let doc = Expr::Constant(minipy_ast::Constant {
            value: ConstantValue::Str("Doc.".to_string()),
            kind: Some("u".to_string()),
        });
        let text = render(vec![Stmt::expr(doc), Stmt::pass()]);
        assert_eq!(text, "u'Doc.';pass;");
    }

    #[test]
    fn decorators_and_classes() {
        let mut def = match Stmt::function("m", Arguments::simple(["self"]), vec![Stmt::pass()]) {
            Stmt::FunctionDef(def) => def,
            _ => unreachable!(),
        };
        def.decorator_list = vec![Expr::name("staticmethod")];
        let class = Stmt::class("C", vec![Expr::name("B")], vec![Stmt::FunctionDef(def)]);
        assert_eq!(
            render(vec![class]),
            "class C(B):\n @staticmethod\n def m(self):\n  pass;"
        );
    }

    #[test]
    fn yield_in_statement_positions() {
        let yielded = Expr::yield_(Some(Expr::name("x")));
        assert_eq!(render(vec![Stmt::expr(yielded.clone())]), "yield x;");
        assert_eq!(
            render(vec![Stmt::assign(vec![Expr::name("y")], yielded.clone())]),
            "y=yield x;"
        );
        assert_eq!(render(vec![Stmt::return_(Some(yielded))]), "return(yield x);");
    }

    #[test]
    fn assignment_forms() {
        let tuple = Stmt::Assign(Assign {
            targets: vec![Expr::tuple(vec![Expr::name("a"), Expr::name("b")])],
            value: Expr::tuple(vec![Expr::name("b"), Expr::name("a")]),
        });
        assert_eq!(render(vec![tuple]), "a,b=b,a;");

        let aug = Stmt::AugAssign(minipy_ast::AugAssign {
            target: Expr::name("n"),
            op: Operator::FloorDiv,
            value: Expr::int(2u32),
        });
        assert_eq!(render(vec![aug]), "n//=2;");

        let ann = Stmt::AnnAssign(AnnAssign {
            target: Expr::name("v"),
            annotation: Expr::name("int"),
            value: None,
            simple: false,
        });
        assert_eq!(render(vec![ann]), "(v):int;");
    }

    #[test]
    fn conditions_skip_walrus_parentheses() {
        let test = Expr::named(Expr::name("m"), Expr::call(Expr::name("f"), vec![]));
        let text = render(vec![Stmt::while_(test, vec![Stmt::pass()])]);
        assert_eq!(text, "while m:=f():\n pass;");
    }

    #[test]
    fn try_except_finally() {
        let node = Try {
            body: vec![call("f")],
            handlers: vec![ExceptHandler {
                type_: Some(Expr::name("E")),
                name: Some("e".into()),
                body: vec![Stmt::pass()],
            }],
            orelse: vec![],
            finalbody: vec![call("g")],
        };
        assert_eq!(
            render(vec![Stmt::Try(node.clone())]),
            "try:\n f();\nexcept E as e:\n pass;\nfinally:\n g();"
        );
        assert_eq!(
            render(vec![Stmt::TryStar(node)]),
            "try:\n f();\nexcept*E as e:\n pass;\nfinally:\n g();"
        );
    }

    #[test]
    fn with_items() {
        let node = With {
            items: vec![
                WithItem {
                    context_expr: Expr::call(Expr::name("open"), vec![Expr::name("p")]),
                    optional_vars: Some(Expr::name("f")),
                },
                WithItem {
                    context_expr: Expr::name("lock"),
                    optional_vars: None,
                },
            ],
            body: vec![Stmt::pass()],
        };
        assert_eq!(render(vec![Stmt::With(node)]), "with open(p)as f,lock:\n pass;");
    }

    #[test]
    fn match_statement_and_patterns() {
        let cases = vec![
            MatchCase {
                pattern: Pattern::MatchOr {
                    patterns: vec![
                        Pattern::value(Expr::int(1u32)),
                        Pattern::value(Expr::int(2u32)),
                    ],
                },
                guard: None,
                body: vec![Stmt::pass()],
            },
            MatchCase {
                pattern: Pattern::MatchSequence {
                    patterns: vec![
                        Pattern::capture("a"),
                        Pattern::MatchStar { name: None },
                    ],
                },
                guard: Some(Expr::name("a")),
                body: vec![Stmt::pass()],
            },
            MatchCase {
                pattern: Pattern::MatchAs {
                    pattern: Some(Box::new(Pattern::MatchClass {
                        cls: Box::new(Expr::name("P")),
                        patterns: vec![],
                        kwd_attrs: vec!["x".into()],
                        kwd_patterns: vec![Pattern::wildcard()],
                    })),
                    name: Some("p".into()),
                },
                guard: None,
                body: vec![Stmt::pass()],
            },
        ];
        let text = render(vec![Stmt::Match(Match {
            subject: Expr::name("v"),
            cases,
        })]);
        assert_eq!(
            text,
            "match v:\n case 1|2:\n  pass;\n case [a,*_]if a:\n  pass;\n case P(x=_)as p:\n  pass;"
        );
    }

    #[test]
    fn nested_as_pattern_is_parenthesized() {
        let inner = Pattern::MatchAs {
            pattern: Some(Box::new(Pattern::capture("a"))),
            name: Some("b".into()),
        };
        let mut printer = Printer::minimizer();
        let text = printer
            .detached(|p| {
                p.pattern(
                    &Pattern::MatchOr {
                        patterns: vec![inner, Pattern::capture("c")],
                    },
                    Precedence::Test,
                )
            })
            .unwrap();
        assert_eq!(text, "(a as b)|c");
    }

    #[test]
    fn malformed_nodes_are_rejected() {
        let empty_if = Stmt::if_(Expr::name("a"), vec![], vec![]);
        let err = Printer::minimizer()
            .render(&Module::new(vec![empty_if]))
            .unwrap_err();
        assert_eq!(err, RenderError::malformed("If", "empty block"));

        let raise = Stmt::Raise(Raise {
            exc: None,
            cause: Some(Expr::name("e")),
        });
        assert!(Printer::minimizer().render(&Module::new(vec![raise])).is_err());

        let bad_name = Stmt::Expr(ExprStmt {
            value: Expr::name("not a name"),
        });
        assert!(Printer::minimizer().render(&Module::new(vec![bad_name])).is_err());

        let lone_or = Stmt::Match(Match {
            subject: Expr::name("v"),
            cases: vec![MatchCase {
                pattern: Pattern::MatchOr {
                    patterns: vec![Pattern::wildcard()],
                },
                guard: None,
                body: vec![Stmt::pass()],
            }],
        });
        assert!(Printer::minimizer().render(&Module::new(vec![lone_or])).is_err());
    }

    #[test]
    fn keyword_spacing() {
        let cond = Expr::bool_op(
            BoolOperator::And,
            vec![Expr::str("s"), Expr::name("x")],
        );
        let text = render(vec![
            Stmt::pass(),
            Stmt::if_(cond, vec![Stmt::return_(Some(Expr::unary(
                minipy_ast::UnaryOperator::USub,
                Expr::name("x"),
            )))], vec![]),
        ]);
        assert_eq!(text, "pass;\nif's'and x:\n return-x;");
    }
}
