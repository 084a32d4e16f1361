//! Expression rendering.

use minipy_ast::{
    Arguments, BoolOp, Call, CmpSpelling, Compare, Comprehension, ConstantValue, Dict, Expr,
    FormattedValue, IntLiteral, Keyword, Operator, Precedence, Subscript, UnaryOperator,
};
use tracing::debug;

use super::literal::{
    bytes_literal, escape_str, float_literal, imaginary_literal, power_form, str_literal,
};
use super::Printer;
use crate::error::RenderError;

type Result<T = ()> = std::result::Result<T, RenderError>;

impl Printer {
    /// Render `expr` in a position that needs at least `required` precedence.
    pub(crate) fn expr(&mut self, expr: &Expr, required: Precedence) -> Result {
        let own = expr.precedence();
        let wrap = own < required;
        match expr {
            Expr::BoolOp(node) => self.parenthesize(wrap, |p| p.bool_op(node)),
            Expr::NamedExpr(node) => self.parenthesize(wrap, |p| {
                p.expr(&node.target, Precedence::Atom)?;
                p.state.add_token(":=");
                p.expr(&node.value, Precedence::Test)
            }),
            Expr::BinOp(node) => self.parenthesize(wrap, |p| {
                let (left, right) = node.op.operand_precedence();
                // `x**-y` is valid: the right side of `**` is a factor.
                let right = if node.op == Operator::Pow {
                    Precedence::Factor
                } else {
                    right
                };
                p.expr(&node.left, left)?;
                p.state.add_token(node.op.symbol());
                p.expr(&node.right, right)
            }),
            Expr::UnaryOp(node) => self.parenthesize(wrap, |p| {
                if node.op == UnaryOperator::Not {
                    p.state.add_keyword("not");
                    p.expr(&node.operand, Precedence::Not)
                } else {
                    p.state.add_token(node.op.symbol());
                    p.expr(&node.operand, Precedence::Factor)
                }
            }),
            Expr::Lambda(node) => self.parenthesize(wrap, |p| {
                p.state.add_keyword("lambda");
                p.arguments("Lambda", &node.args, false)?;
                p.state.add_token(":");
                p.expr(&node.body, Precedence::Test)
            }),
            Expr::IfExp(node) => self.parenthesize(wrap, |p| {
                p.expr(&node.body, Precedence::Test.next())?;
                p.state.add_keyword("if");
                p.expr(&node.test, Precedence::Test.next())?;
                p.state.add_keyword("else");
                p.expr(&node.orelse, Precedence::Test)
            }),
            Expr::Dict(node) => self.dict(node),
            Expr::Set(node) => {
                if node.elts.is_empty() {
                    self.state.add_token("{*()}");
                    return Ok(());
                }
                self.state.add_token("{");
                self.comma_separated(&node.elts, |p, e| p.expr(e, Precedence::Test))?;
                self.state.add_token("}");
                Ok(())
            }
            Expr::ListComp(node) => {
                self.state.add_token("[");
                self.expr(&node.elt, Precedence::Test)?;
                self.generators("ListComp", &node.generators)?;
                self.state.add_token("]");
                Ok(())
            }
            Expr::SetComp(node) => {
                self.state.add_token("{");
                self.expr(&node.elt, Precedence::Test)?;
                self.generators("SetComp", &node.generators)?;
                self.state.add_token("}");
                Ok(())
            }
            Expr::DictComp(node) => {
                self.state.add_token("{");
                self.expr(&node.key, Precedence::Test)?;
                self.state.add_token(":");
                self.expr(&node.value, Precedence::Test)?;
                self.generators("DictComp", &node.generators)?;
                self.state.add_token("}");
                Ok(())
            }
            Expr::GeneratorExp(node) => self.parenthesize(true, |p| {
                p.expr(&node.elt, Precedence::Test)?;
                p.generators("GeneratorExp", &node.generators)
            }),
            Expr::Await(node) => self.parenthesize(wrap, |p| {
                p.state.add_keyword("await");
                p.expr(&node.value, Precedence::Atom)
            }),
            Expr::Yield(node) => self.parenthesize(wrap, |p| {
                p.state.add_keyword("yield");
                match &node.value {
                    Some(value) => p.expr(value, Precedence::Tuple),
                    None => Ok(()),
                }
            }),
            Expr::YieldFrom(node) => self.parenthesize(wrap, |p| {
                p.state.add_keyword("yield");
                p.state.add_keyword("from");
                p.expr(&node.value, Precedence::Test)
            }),
            Expr::Compare(node) => self.parenthesize(wrap, |p| p.compare(node)),
            Expr::Call(node) => self.call(node),
            Expr::FormattedValue(_) => self.joined_str(std::slice::from_ref(expr)),
            Expr::JoinedStr(node) => self.joined_str(&node.values),
            Expr::Constant(node) => match (&node.value, node.kind.as_deref()) {
                (ConstantValue::Str(value), Some("u")) => {
                    self.state.add_token(&format!("u{}", str_literal(value)));
                    Ok(())
                }
                _ => self.constant(&node.value, required),
            },
            Expr::Attribute(node) => {
                self.expr(&node.value, Precedence::Atom)?;
                // `1.real` would lex as a float.
                if matches!(node.value.as_constant(), Some(ConstantValue::Int(_)))
                    && self.state.tokens.ends_with(|c: char| c.is_ascii_digit())
                {
                    self.state.tokens.push(' ');
                }
                self.state.add_token(".");
                self.identifier("Attribute", &node.attr)
            }
            Expr::Subscript(node) => self.subscript(node),
            Expr::Starred(node) => {
                self.state.add_token("*");
                self.expr(&node.value, Precedence::EXPR)
            }
            Expr::Name(node) => self.identifier("Name", &node.id),
            Expr::List(node) => {
                self.state.add_token("[");
                self.comma_separated(&node.elts, |p, e| p.expr(e, Precedence::Test))?;
                self.state.add_token("]");
                Ok(())
            }
            Expr::Tuple(node) => {
                let wrap = node.elts.is_empty() || required > Precedence::Tuple;
                self.parenthesize(wrap, |p| p.tuple_items(&node.elts))
            }
            Expr::Slice(node) => {
                if let Some(lower) = &node.lower {
                    self.expr(lower, Precedence::Test)?;
                }
                self.state.add_token(":");
                if let Some(upper) = &node.upper {
                    self.expr(upper, Precedence::Test)?;
                }
                if let Some(step) = &node.step {
                    self.state.add_token(":");
                    self.expr(step, Precedence::Test)?;
                }
                Ok(())
            }
        }
    }

    /// `a,b` with a trailing comma for a single element.
    fn tuple_items(&mut self, elts: &[Expr]) -> Result {
        self.comma_separated(elts, |p, e| p.expr(e, Precedence::Test))?;
        if elts.len() == 1 {
            self.state.add_token(",");
        }
        Ok(())
    }

    fn bool_op(&mut self, node: &BoolOp) -> Result {
        if node.values.len() < 2 {
            return Err(RenderError::malformed(
                "BoolOp",
                format!("{} operand(s), expected at least 2", node.values.len()),
            ));
        }
        let operand = Precedence::of_bool(node.op).next();
        for (i, value) in node.values.iter().enumerate() {
            if i > 0 {
                self.state.add_keyword(node.op.keyword());
            }
            self.expr(value, operand)?;
        }
        Ok(())
    }

    fn compare(&mut self, node: &Compare) -> Result {
        if node.ops.is_empty() || node.ops.len() != node.comparators.len() {
            return Err(RenderError::malformed(
                "Compare",
                format!(
                    "{} operator(s) for {} comparator(s)",
                    node.ops.len(),
                    node.comparators.len()
                ),
            ));
        }
        let operand = Precedence::Cmp.next();
        self.expr(&node.left, operand)?;
        for (op, comparator) in node.ops.iter().zip(&node.comparators) {
            match op.spelling() {
                CmpSpelling::Symbol(symbol) => self.state.add_token(symbol),
                CmpSpelling::Keywords(words) => {
                    for word in words {
                        self.state.add_keyword(word);
                    }
                }
            }
            self.expr(comparator, operand)?;
        }
        Ok(())
    }

    fn dict(&mut self, node: &Dict) -> Result {
        if node.keys.len() != node.values.len() {
            return Err(RenderError::malformed(
                "Dict",
                format!("{} keys for {} values", node.keys.len(), node.values.len()),
            ));
        }
        self.state.add_token("{");
        for (i, (key, value)) in node.keys.iter().zip(&node.values).enumerate() {
            if i > 0 {
                self.state.add_token(",");
            }
            match key {
                Some(key) => {
                    self.expr(key, Precedence::Test)?;
                    self.state.add_token(":");
                    self.expr(value, Precedence::Test)?;
                }
                None => {
                    self.state.add_token("**");
                    self.expr(value, Precedence::EXPR)?;
                }
            }
        }
        self.state.add_token("}");
        Ok(())
    }

    fn generators(&mut self, node: &'static str, generators: &[Comprehension]) -> Result {
        if generators.is_empty() {
            return Err(RenderError::malformed(node, "no for clause"));
        }
        for generator in generators {
            if generator.is_async {
                self.state.add_keyword("async");
            }
            self.state.add_keyword("for");
            self.expr(&generator.target, Precedence::Tuple)?;
            self.state.add_keyword("in");
            self.expr(&generator.iter, Precedence::Test.next())?;
            for condition in &generator.ifs {
                self.state.add_keyword("if");
                self.expr(condition, Precedence::Test.next())?;
            }
        }
        Ok(())
    }

    fn call(&mut self, node: &Call) -> Result {
        self.expr(&node.func, Precedence::Atom)?;
        self.state.add_token("(");
        match (node.args.as_slice(), node.keywords.is_empty()) {
            // f(x for x in y): the call's parentheses serve the generator.
            ([Expr::GeneratorExp(gen)], true) => {
                self.expr(&gen.elt, Precedence::Test)?;
                self.generators("GeneratorExp", &gen.generators)?;
            }
            _ => {
                self.comma_separated(&node.args, |p, e| p.expr(e, Precedence::Test))?;
                if !node.args.is_empty() && !node.keywords.is_empty() {
                    self.state.add_token(",");
                }
                self.comma_separated(&node.keywords, Printer::keyword)?;
            }
        }
        self.state.add_token(")");
        Ok(())
    }

    pub(crate) fn keyword(&mut self, keyword: &Keyword) -> Result {
        match &keyword.arg {
            Some(name) => {
                self.identifier("keyword", name)?;
                self.state.add_token("=");
                self.expr(&keyword.value, Precedence::Test)
            }
            None => {
                self.state.add_token("**");
                self.expr(&keyword.value, Precedence::EXPR)
            }
        }
    }

    fn subscript(&mut self, node: &Subscript) -> Result {
        self.expr(&node.value, Precedence::Atom)?;
        self.state.add_token("[");
        match node.slice.as_ref() {
            Expr::Tuple(tuple) if !tuple.elts.is_empty() => self.tuple_items(&tuple.elts)?,
            slice => self.expr(slice, Precedence::Tuple)?,
        }
        self.state.add_token("]");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Parameters
    // ------------------------------------------------------------------

    /// Parameter list of a `def` (with annotations) or a `lambda`.
    pub(crate) fn arguments(
        &mut self,
        node: &'static str,
        args: &Arguments,
        annotations: bool,
    ) -> Result {
        let positional: Vec<_> = args.posonlyargs.iter().chain(&args.args).collect();
        if args.defaults.len() > positional.len() {
            return Err(RenderError::malformed(
                node,
                format!(
                    "{} defaults for {} positional parameters",
                    args.defaults.len(),
                    positional.len()
                ),
            ));
        }
        if args.kw_defaults.len() != args.kwonlyargs.len() {
            return Err(RenderError::malformed(
                node,
                format!(
                    "{} keyword defaults for {} keyword-only parameters",
                    args.kw_defaults.len(),
                    args.kwonlyargs.len()
                ),
            ));
        }

        let first_default = positional.len() - args.defaults.len();
        let mut first = true;
        let mut separator = |p: &mut Printer| {
            if !std::mem::take(&mut first) {
                p.state.add_token(",");
            }
        };

        for (i, arg) in positional.iter().enumerate() {
            separator(self);
            self.parameter(node, &arg.arg, arg.annotation.as_deref(), annotations)?;
            if i >= first_default {
                self.state.add_token("=");
                self.expr(&args.defaults[i - first_default], Precedence::Test)?;
            }
            if i + 1 == args.posonlyargs.len() {
                self.state.add_token(",/");
            }
        }

        if args.vararg.is_some() || !args.kwonlyargs.is_empty() {
            separator(self);
            self.state.add_token("*");
            if let Some(vararg) = &args.vararg {
                self.parameter(node, &vararg.arg, vararg.annotation.as_deref(), annotations)?;
            }
        }

        for (i, arg) in args.kwonlyargs.iter().enumerate() {
            separator(self);
            self.parameter(node, &arg.arg, arg.annotation.as_deref(), annotations)?;
            if let Some(Some(default)) = args.kw_defaults.get(i) {
                self.state.add_token("=");
                self.expr(default, Precedence::Test)?;
            }
        }

        if let Some(kwarg) = &args.kwarg {
            separator(self);
            self.state.add_token("**");
            self.parameter(node, &kwarg.arg, kwarg.annotation.as_deref(), annotations)?;
        }
        Ok(())
    }

    fn parameter(
        &mut self,
        node: &'static str,
        name: &str,
        annotation: Option<&Expr>,
        annotations: bool,
    ) -> Result {
        self.identifier(node, name)?;
        if let (true, Some(annotation)) = (annotations, annotation) {
            self.state.add_token(":");
            self.expr(annotation, Precedence::Test)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Constants
    // ------------------------------------------------------------------

    pub(crate) fn constant(&mut self, value: &ConstantValue, required: Precedence) -> Result {
        match value {
            ConstantValue::None => self.state.add_token("None"),
            ConstantValue::Bool(true) => self.state.add_token("True"),
            ConstantValue::Bool(false) => self.state.add_token("False"),
            ConstantValue::Ellipsis => self.state.add_token("..."),
            ConstantValue::Int(value) => return self.int(value, required),
            ConstantValue::Float(value) => return self.float(*value, required),
            ConstantValue::Complex { real, imag } => return self.complex(*real, *imag, required),
            ConstantValue::Str(value) => self.state.add_token(&str_literal(value)),
            ConstantValue::Bytes(value) => self.state.add_token(&bytes_literal(value)),
            ConstantValue::Tuple(items) => {
                let wrap = items.is_empty() || required > Precedence::Tuple;
                return self.parenthesize(wrap, |p| {
                    p.comma_separated(items, |p, item| p.constant(item, Precedence::Test))?;
                    if items.len() == 1 {
                        p.state.add_token(",");
                    }
                    Ok(())
                });
            }
        }
        Ok(())
    }

    /// Decimal digits, or `10**k`/`2**k` when that is strictly shorter in
    /// this position.
    fn int(&mut self, value: &IntLiteral, required: Precedence) -> Result {
        let digits = value.digits();
        if let Some((base, exponent)) = power_form(value) {
            let rewrite = Expr::bin_op(Expr::int(base), Operator::Pow, Expr::int(exponent));
            let text = self.detached(|p| p.expr(&rewrite, required))?;
            if text.len() < digits.len() {
                self.state.add_token(&text);
                return Ok(());
            }
        }
        self.state.add_token(digits);
        Ok(())
    }

    fn float(&mut self, value: f64, required: Precedence) -> Result {
        if value.is_nan() {
            self.state.add_token("(1e999-1e999)");
            return Ok(());
        }
        let text = if value.is_infinite() {
            "1e999".to_string()
        } else {
            float_literal(value.abs())
        };
        let negative = value.is_sign_negative();
        self.parenthesize(negative && required > Precedence::Factor, |p| {
            if negative {
                p.state.add_token("-");
            }
            p.state.add_token(&text);
            Ok(())
        })
    }

    fn complex(&mut self, real: f64, imag: f64, required: Precedence) -> Result {
        let imag_text = if imag.is_nan() {
            "(1e999j-1e999j)".to_string()
        } else if imag.is_infinite() {
            "1e999j".to_string()
        } else {
            imaginary_literal(imag.abs())
        };
        let imag_negative = imag.is_sign_negative() && !imag.is_nan();

        if real == 0.0 && !real.is_sign_negative() {
            return self.parenthesize(imag_negative && required > Precedence::Factor, |p| {
                if imag_negative {
                    p.state.add_token("-");
                }
                p.state.add_token(&imag_text);
                Ok(())
            });
        }

        let real_text = if real.is_nan() {
            "(1e999-1e999)".to_string()
        } else if real.is_infinite() {
            "1e999".to_string()
        } else {
            float_literal(real.abs())
        };
        let mut text = String::from("(");
        if real.is_sign_negative() && !real.is_nan() {
            text.push('-');
        }
        text.push_str(&real_text);
        text.push(if imag_negative { '-' } else { '+' });
        text.push_str(&imag_text);
        text.push(')');
        self.state.add_token(&text);
        Ok(())
    }

    // ------------------------------------------------------------------
    // f-strings
    // ------------------------------------------------------------------

    /// Render the parts of an f-string with the cheapest quote that none of
    /// the embedded expressions use.
    ///
    /// When every quote is taken (f-strings nested five deep) the output
    /// reuses `'` inside its own fields, which only Python 3.12 and later
    /// accept.
    fn joined_str(&mut self, values: &[Expr]) -> Result {
        let parts = self.fstring_parts(values)?;
        let mut best: Option<String> = None;
        for quote in ["'", "\"", "'''", "\"\"\""] {
            if parts.iter().any(|part| part.uses_quote(quote)) {
                continue;
            }
            let mut text = format!("f{}", quote);
            for part in &parts {
                part.write(&mut text, quote);
            }
            text.push_str(quote);
            match &best {
                Some(current) if current.len() <= text.len() => {}
                _ => best = Some(text),
            }
        }
        let text = match best {
            Some(text) => text,
            None => {
                debug!("no free f-string quote, reusing ' (needs Python 3.12+)");
                let mut text = String::from("f'");
                for part in &parts {
                    part.write(&mut text, "'");
                }
                text.push('\'');
                text
            }
        };
        self.state.add_token(&text);
        Ok(())
    }

    fn fstring_parts(&mut self, values: &[Expr]) -> Result<Vec<FStringPart>> {
        let mut parts = Vec::with_capacity(values.len());
        for value in values {
            match value {
                Expr::Constant(constant) => match &constant.value {
                    ConstantValue::Str(text) => parts.push(FStringPart::Text(text.clone())),
                    other => {
                        return Err(RenderError::malformed(
                            "JoinedStr",
                            format!("non-string constant part {:?}", other),
                        ))
                    }
                },
                Expr::FormattedValue(field) => parts.push(self.fstring_field(field)?),
                other => {
                    return Err(RenderError::malformed(
                        "JoinedStr",
                        format!("unexpected {} part", other.type_name()),
                    ))
                }
            }
        }
        Ok(parts)
    }

    fn fstring_field(&mut self, field: &FormattedValue) -> Result<FStringPart> {
        let expr = self.detached(|p| p.expr(&field.value, Precedence::Test.next()))?;
        let spec = match field.format_spec.as_deref() {
            None => None,
            Some(Expr::JoinedStr(spec)) => Some(self.fstring_parts(&spec.values)?),
            Some(other) => {
                return Err(RenderError::malformed(
                    "FormattedValue",
                    format!("format spec is a {}", other.type_name()),
                ))
            }
        };
        Ok(FStringPart::Field {
            expr,
            conversion: field.conversion_char(),
            spec,
        })
    }
}

/// One piece of an f-string, with embedded expressions already rendered.
#[derive(Debug)]
enum FStringPart {
    Text(String),
    Field {
        expr: String,
        conversion: Option<char>,
        spec: Option<Vec<FStringPart>>,
    },
}

impl FStringPart {
    fn uses_quote(&self, quote: &str) -> bool {
        match self {
            FStringPart::Text(_) => false,
            FStringPart::Field { expr, spec, .. } => {
                expr.contains(quote)
                    || spec
                        .as_ref()
                        .is_some_and(|parts| parts.iter().any(|p| p.uses_quote(quote)))
            }
        }
    }

    fn write(&self, out: &mut String, quote: &str) {
        match self {
            FStringPart::Text(text) => {
                let escaped = escape_str(text, quote);
                out.push_str(&escaped.replace('{', "{{").replace('}', "}}"));
            }
            FStringPart::Field {
                expr,
                conversion,
                spec,
            } => {
                out.push('{');
                if expr.starts_with('{') {
                    out.push(' ');
                }
                out.push_str(expr);
                if let Some(c) = conversion {
                    out.push('!');
                    out.push(*c);
                }
                if let Some(spec) = spec {
                    out.push(':');
                    for part in spec {
                        part.write(out, quote);
                    }
                }
                out.push('}');
            }
        }
    }
}
