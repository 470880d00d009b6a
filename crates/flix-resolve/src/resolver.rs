//! Name resolution (§4.2 Resolver).
//!
//! Replaces every ambiguous name with a fully qualified name by searching,
//! in order, `current-namespace ++ name` then `name`. The ad-hoc lattice
//! operator names (`leq`, `lub`, `glb`, `widen`, `narrow`, `bot`, `top`)
//! are left unresolved here: `flix-resolve`'s Typer picks their concrete
//! instance once the operand's type is known.

use std::collections::HashMap;

use flix_base::Name;
use flix_ir::{Atom, BodyAtom, Decl, Diagnostics, Expr, ExprKind, MatchRule, Program, Rule, SymbolTable};

use crate::error::ResolveError;

const LATTICE_OP_NAMES: &[&str] = &["leq", "lub", "glb", "widen", "narrow", "bot", "top"];

fn is_lattice_op(name: &Name) -> bool {
    name.is_unqualified() && LATTICE_OP_NAMES.contains(&name.leaf())
}

/// Builds the symbol table from every weeded declaration (§3: the table
/// "grows only during resolution").
pub fn build_symbol_table(decls: Vec<Decl>) -> SymbolTable {
    let mut table = SymbolTable::new();
    for decl in decls {
        table.declare(decl);
    }
    table
}

fn resolve_name(table: &SymbolTable, current_ns: &[String], name: &Name, span: flix_base::Span, errors: &mut Diagnostics<ResolveError>) -> Name {
    let prefixed = name.prefixed(current_ns);
    let prefixed_hits = table.lookup(&prefixed).len();
    if prefixed_hits == 1 {
        return prefixed;
    }
    if prefixed_hits > 1 {
        errors.push(ResolveError::AmbiguousName { name: prefixed.to_string(), candidates: prefixed_hits, span });
        return prefixed;
    }

    let bare_hits = table.lookup(name).len();
    if bare_hits == 1 {
        return name.clone();
    }
    if bare_hits > 1 {
        errors.push(ResolveError::AmbiguousName { name: name.to_string(), candidates: bare_hits, span });
        return name.clone();
    }

    errors.push(ResolveError::NameNotFound { name: name.to_string(), span });
    name.clone()
}

/// Maps a bare tag name to the enum declarations that define it, used to
/// resolve a bare tag-construction reference (§4.2 "Enum-tag bare
/// references resolve to a tag-construction").
fn build_tag_index(table: &SymbolTable) -> HashMap<String, Vec<Name>> {
    let mut index: HashMap<String, Vec<Name>> = HashMap::new();
    for name in table.names() {
        for decl in table.lookup(name) {
            if let Decl::Enum(e) = decl {
                for (tag, _) in &e.tags {
                    index.entry(tag.clone()).or_default().push(e.name.clone());
                }
            }
        }
    }
    index
}

struct Ctx<'a> {
    table: &'a SymbolTable,
    tag_index: HashMap<String, Vec<Name>>,
    current_ns: Vec<String>,
    errors: Diagnostics<ResolveError>,
}

fn resolve_expr(expr: Expr, ctx: &mut Ctx) -> Expr {
    let span = expr.span;
    let ty = expr.ty;
    let kind = match *expr.kind {
        ExprKind::Var(name) if is_lattice_op(&name) => ExprKind::Var(name),
        ExprKind::Var(name) => ExprKind::Var(resolve_name(ctx.table, &ctx.current_ns, &name, span, &mut ctx.errors)),
        ExprKind::Lambda { params, body } => ExprKind::Lambda { params, body: resolve_expr(body, ctx) },
        ExprKind::App { func, args } => ExprKind::App {
            func: resolve_expr(func, ctx),
            args: args.into_iter().map(|a| resolve_expr(a, ctx)).collect(),
        },
        ExprKind::Unary { op, operand } => ExprKind::Unary { op, operand: resolve_expr(operand, ctx) },
        ExprKind::Binary { op, lhs, rhs } => ExprKind::Binary {
            op,
            lhs: resolve_expr(lhs, ctx),
            rhs: resolve_expr(rhs, ctx),
        },
        ExprKind::If { cond, then_branch, else_branch } => ExprKind::If {
            cond: resolve_expr(cond, ctx),
            then_branch: resolve_expr(then_branch, ctx),
            else_branch: resolve_expr(else_branch, ctx),
        },
        ExprKind::Let { name, value, body } => ExprKind::Let {
            name,
            value: resolve_expr(value, ctx),
            body: resolve_expr(body, ctx),
        },
        ExprKind::Match { scrutinee, rules } => ExprKind::Match {
            scrutinee: resolve_expr(scrutinee, ctx),
            rules: rules
                .into_iter()
                .map(|r| MatchRule { pattern: r.pattern, body: resolve_expr(r.body, ctx) })
                .collect(),
        },
        ExprKind::Tag { enum_name, tag, payload } => {
            let resolved_enum = if enum_name.leaf().is_empty() {
                match ctx.tag_index.get(&tag).map(Vec::as_slice) {
                    Some([only]) => only.clone(),
                    Some(many) if many.len() > 1 => {
                        ctx.errors.push(ResolveError::AmbiguousName { name: tag.clone(), candidates: many.len(), span });
                        many[0].clone()
                    }
                    _ => {
                        ctx.errors.push(ResolveError::NameNotFound { name: tag.clone(), span });
                        enum_name
                    }
                }
            } else {
                enum_name
            };
            ExprKind::Tag { enum_name: resolved_enum, tag, payload: resolve_expr(payload, ctx) }
        }
        ExprKind::Tuple(items) => ExprKind::Tuple(items.into_iter().map(|e| resolve_expr(e, ctx)).collect()),
        ExprKind::Collection { kind, items } => ExprKind::Collection {
            kind,
            items: items.into_iter().map(|e| resolve_expr(e, ctx)).collect(),
        },
        ExprKind::MapLiteral(pairs) => {
            ExprKind::MapLiteral(pairs.into_iter().map(|(k, v)| (resolve_expr(k, ctx), resolve_expr(v, ctx))).collect())
        }
        ExprKind::Quantifier { kind, params, body } => {
            ExprKind::Quantifier { kind, params, body: resolve_expr(body, ctx) }
        }
        ExprKind::Ascribe { expr, ty } => ExprKind::Ascribe { expr: resolve_expr(expr, ctx), ty },
        other @ (ExprKind::Literal(_) | ExprKind::UserError { .. }) => other,
    };
    Expr::new(kind, ty, span)
}

fn resolve_atom(atom: Atom, ctx: &mut Ctx) -> Atom {
    let predicate = resolve_name(ctx.table, &ctx.current_ns, &atom.predicate, atom.span, &mut ctx.errors);
    Atom { predicate, ..atom }
}

fn resolve_rule(rule: Rule, ctx: &mut Ctx) -> Rule {
    let head = resolve_atom(rule.head, ctx);
    let body = rule
        .body
        .into_iter()
        .map(|b| match b {
            BodyAtom::Relational(a) => BodyAtom::Relational(resolve_atom(a, ctx)),
            other => other,
        })
        .collect();
    Rule { head, body, span: rule.span }
}

/// Resolves every declaration body and every rule atom, returning the
/// fully built symbol table alongside the resolved declarations/program.
pub fn resolve_program(decls: Vec<Decl>, program: Program) -> (SymbolTable, Vec<Decl>, Program, Vec<ResolveError>) {
    let table = build_symbol_table(decls);
    let tag_index = build_tag_index(&table);

    let mut ctx = Ctx { table: &table, tag_index, current_ns: Vec::new(), errors: Diagnostics::new() };

    let mut resolved_decls = Vec::new();
    for name in table.names().cloned().collect::<Vec<_>>() {
        for decl in table.lookup(&name) {
            ctx.current_ns = name.namespace().to_vec();
            resolved_decls.push(resolve_decl(decl.clone(), &mut ctx));
        }
    }

    ctx.current_ns = Vec::new();
    let resolved_rules: Vec<Rule> = program.rules.into_iter().map(|r| resolve_rule(r, &mut ctx)).collect();

    let errors = ctx.errors.into_vec();
    (table, resolved_decls, Program { rules: resolved_rules }, errors)
}

fn resolve_decl(decl: Decl, ctx: &mut Ctx) -> Decl {
    match decl {
        Decl::Value(mut d) => {
            d.body = resolve_expr(d.body, ctx);
            Decl::Value(d)
        }
        Decl::Function(mut d) => {
            d.body = resolve_expr(d.body, ctx);
            Decl::Function(d)
        }
        Decl::Lattice(mut d) => {
            d.leq = resolve_expr(d.leq, ctx);
            d.lub = resolve_expr(d.lub, ctx);
            d.glb = resolve_expr(d.glb, ctx);
            Decl::Lattice(d)
        }
        Decl::BoundedLattice(mut d) => {
            d.bot = resolve_expr(d.bot, ctx);
            d.top = resolve_expr(d.top, ctx);
            d.leq = resolve_expr(d.leq, ctx);
            d.lub = resolve_expr(d.lub, ctx);
            d.glb = resolve_expr(d.glb, ctx);
            d.widen = d.widen.map(|w| resolve_expr(w, ctx));
            Decl::BoundedLattice(d)
        }
        Decl::Impl(mut d) => {
            d.methods = d.methods.into_iter().map(|(n, e)| (n, resolve_expr(e, ctx))).collect();
            Decl::Impl(d)
        }
        other => other,
    }
}
