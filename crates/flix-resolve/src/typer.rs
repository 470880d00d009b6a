//! Bidirectional type inference (§4.3 Typer).
//!
//! A synthesis/checking pair rather than full Hindley-Milner unification:
//! enough to cover the twists the specification actually calls out —
//! ad-hoc lattice-operator dictionary selection, lattice-table element
//! metadata, uniform match-arm typing, and `Native` nominal types — without
//! a general constraint solver. See `DESIGN.md` for why this suffices.

use std::collections::HashMap;

use flix_base::{Name, Span};
use flix_ir::{
    BoundedLatticeDecl, Decl, Diagnostics, Expr, ExprKind, FunctionDecl, Literal, Pattern,
    SymbolTable, Type,
};

use crate::error::TyperError;

const LATTICE_DICT_OPS: &[&str] = &["leq", "lub", "glb", "widen", "narrow"];
const LATTICE_BOUND_OPS: &[&str] = &["bot", "top"];

struct Ctx<'a> {
    table: &'a SymbolTable,
    locals: HashMap<String, Type>,
    errors: Diagnostics<TyperError>,
}

fn types_compatible(a: &Type, b: &Type) -> bool {
    matches!(a, Type::Var(_)) || matches!(b, Type::Var(_)) || a == b
}

fn expect(ctx: &mut Ctx, expected: &Type, found: &Type, span: Span) {
    if !types_compatible(expected, found) {
        ctx.errors.push(TyperError::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
            span,
        });
    }
}

/// Finds the unique `BoundedLattice` instance over `ty`, used to resolve a
/// bare lattice-operator name left untouched by the Resolver. Ambiguity
/// (more than one instance for the same element type) is reported as an
/// unsupported operation, since the specification gives no tie-break rule.
fn find_lattice_instance<'a>(table: &'a SymbolTable, ty: &Type) -> Option<&'a BoundedLatticeDecl> {
    let mut found = None;
    for name in table.names() {
        for decl in table.lookup(name) {
            if let Decl::BoundedLattice(bl) = decl {
                if &bl.element_type == ty {
                    if found.is_some() {
                        return None;
                    }
                    found = Some(bl);
                }
            }
        }
    }
    found
}

fn resolve_lattice_op(ctx: &mut Ctx, op: &str, operand_ty: &Type, span: Span) -> Type {
    match find_lattice_instance(ctx.table, operand_ty) {
        Some(bl) => match op {
            "bot" | "top" => bl.element_type.clone(),
            "leq" => Type::Bool,
            "lub" | "glb" | "widen" | "narrow" => bl.element_type.clone(),
            _ => operand_ty.clone(),
        },
        None => {
            ctx.errors.push(TyperError::UnsupportedLatticeOperation {
                op: op.to_string(),
                ty: operand_ty.to_string(),
                span,
            });
            operand_ty.clone()
        }
    }
}

/// Synthesizes a type for `expr`, mutating it in place with the inferred
/// type (the Typer's contract: every IR node carries its final type).
fn infer(expr: &mut Expr, ctx: &mut Ctx) {
    let span = expr.span;
    let ty = match &mut *expr.kind {
        ExprKind::Literal(lit) => literal_type(lit),
        ExprKind::Var(name) if LATTICE_BOUND_OPS.contains(&name.leaf()) && name.is_unqualified() => {
            // Bare `bot`/`top` with no argument: cannot determine the
            // instance without an expected type. Left for `check`.
            Type::Var(flix_ir::TypeVar(0))
        }
        ExprKind::Var(name) => ctx
            .locals
            .get(name.leaf())
            .cloned()
            .or_else(|| ctx.table.lookup(name).first().map(decl_type))
            .unwrap_or_else(|| Type::Var(flix_ir::TypeVar(0))),
        ExprKind::Lambda { params, body } => {
            let saved: Vec<_> = params
                .iter()
                .map(|(n, t)| (n.clone(), ctx.locals.insert(n.clone(), t.clone())))
                .collect();
            infer(body, ctx);
            let ret = body.ty.clone();
            for (n, prev) in saved {
                match prev {
                    Some(t) => {
                        ctx.locals.insert(n, t);
                    }
                    None => {
                        ctx.locals.remove(&n);
                    }
                }
            }
            Type::Lambda(params.iter().map(|(_, t)| t.clone()).collect(), Box::new(ret))
        }
        ExprKind::App { func, args } => {
            for a in args.iter_mut() {
                infer(a, ctx);
            }
            if let ExprKind::Var(name) = &*func.kind {
                let leaf = name.leaf();
                if name.is_unqualified() && LATTICE_DICT_OPS.contains(&leaf) {
                    let operand_ty = args.first().map(|a| a.ty.clone()).unwrap_or(Type::Unit);
                    func.ty = Type::Var(flix_ir::TypeVar(0));
                    resolve_lattice_op(ctx, leaf, &operand_ty, span)
                } else if name.is_unqualified() && LATTICE_BOUND_OPS.contains(&leaf) {
                    let operand_ty = args.first().map(|a| a.ty.clone()).unwrap_or(Type::Unit);
                    resolve_lattice_op(ctx, leaf, &operand_ty, span)
                } else {
                    infer(func, ctx);
                    match &func.ty {
                        Type::Lambda(_, ret) => (**ret).clone(),
                        _ => Type::Var(flix_ir::TypeVar(0)),
                    }
                }
            } else {
                infer(func, ctx);
                match &func.ty {
                    Type::Lambda(_, ret) => (**ret).clone(),
                    _ => Type::Var(flix_ir::TypeVar(0)),
                }
            }
        }
        ExprKind::Unary { operand, .. } => {
            infer(operand, ctx);
            operand.ty.clone()
        }
        ExprKind::Binary { op, lhs, rhs } => {
            infer(lhs, ctx);
            infer(rhs, ctx);
            use flix_ir::BinOp::*;
            match op {
                Eq | Neq | Lt | Leq | Gt | Geq | And | Or => Type::Bool,
                _ => lhs.ty.clone(),
            }
        }
        ExprKind::If { cond, then_branch, else_branch } => {
            infer(cond, ctx);
            expect(ctx, &Type::Bool, &cond.ty, cond.span);
            infer(then_branch, ctx);
            infer(else_branch, ctx);
            expect(ctx, &then_branch.ty, &else_branch.ty, else_branch.span);
            then_branch.ty.clone()
        }
        ExprKind::Let { name, value, body } => {
            infer(value, ctx);
            let prev = ctx.locals.insert(name.clone(), value.ty.clone());
            infer(body, ctx);
            match prev {
                Some(t) => {
                    ctx.locals.insert(name.clone(), t);
                }
                None => {
                    ctx.locals.remove(name);
                }
            }
            body.ty.clone()
        }
        ExprKind::Match { scrutinee, rules } => {
            infer(scrutinee, ctx);
            let mut result_ty = None;
            for rule in rules.iter_mut() {
                bind_pattern(&rule.pattern, &scrutinee.ty, ctx);
                infer(&mut rule.body, ctx);
                unbind_pattern(&rule.pattern, ctx);
                match &result_ty {
                    None => result_ty = Some(rule.body.ty.clone()),
                    Some(t) => expect(ctx, t, &rule.body.ty, rule.body.span),
                }
            }
            result_ty.unwrap_or(Type::Unit)
        }
        ExprKind::Tag { enum_name, tag, payload } => {
            infer(payload, ctx);
            tag_type(ctx, enum_name, tag).unwrap_or_else(|| Type::Enum(enum_name.clone(), Default::default()))
        }
        ExprKind::Tuple(items) => {
            for i in items.iter_mut() {
                infer(i, ctx);
            }
            Type::Tuple(items.iter().map(|i| i.ty.clone()).collect())
        }
        ExprKind::Collection { items, .. } => {
            for i in items.iter_mut() {
                infer(i, ctx);
            }
            items.first().map(|i| i.ty.clone()).unwrap_or(Type::Var(flix_ir::TypeVar(0)))
        }
        ExprKind::MapLiteral(pairs) => {
            for (k, v) in pairs.iter_mut() {
                infer(k, ctx);
                infer(v, ctx);
            }
            Type::Unit
        }
        ExprKind::Quantifier { params, body, .. } => {
            let saved: Vec<_> = params
                .iter()
                .map(|(n, t)| (n.clone(), ctx.locals.insert(n.clone(), t.clone())))
                .collect();
            infer(body, ctx);
            for (n, prev) in saved {
                match prev {
                    Some(t) => {
                        ctx.locals.insert(n, t);
                    }
                    None => {
                        ctx.locals.remove(&n);
                    }
                }
            }
            expect(ctx, &Type::Bool, &body.ty, body.span);
            Type::Bool
        }
        ExprKind::Ascribe { expr: inner, ty } => {
            infer(inner, ctx);
            expect(ctx, ty, &inner.ty, inner.span);
            ty.clone()
        }
        ExprKind::UserError { .. } => Type::Var(flix_ir::TypeVar(0)),
    };
    expr.ty = ty;
}

fn literal_type(lit: &Literal) -> Type {
    match lit {
        Literal::Unit => Type::Unit,
        Literal::Bool(_) => Type::Bool,
        Literal::Char(_) => Type::Char,
        Literal::Int(w, _) => Type::Int(*w),
        Literal::BigInt(_) => Type::BigInt,
        Literal::Float(w, _) => Type::Float(*w),
        Literal::Str(_) => Type::Str,
    }
}

fn decl_type(decl: &Decl) -> Type {
    match decl {
        Decl::Value(d) => d.ty.clone(),
        Decl::Function(d) => Type::Lambda(d.params.iter().map(|(_, t)| t.clone()).collect(), Box::new(d.ret.clone())),
        _ => Type::Var(flix_ir::TypeVar(0)),
    }
}

fn tag_type(ctx: &Ctx, enum_name: &Name, tag: &str) -> Option<Type> {
    for decl in ctx.table.lookup(enum_name) {
        if let Decl::Enum(e) = decl {
            if e.tag_names().any(|t| t == tag) {
                return Some(Type::Enum(e.name.clone(), e.tags.iter().cloned().collect()));
            }
        }
    }
    None
}

fn bind_pattern(pattern: &Pattern, ty: &Type, ctx: &mut Ctx) {
    match pattern {
        Pattern::Var(name) => {
            ctx.locals.insert(name.clone(), ty.clone());
        }
        Pattern::Tuple(pats) => {
            if let Type::Tuple(tys) = ty {
                for (p, t) in pats.iter().zip(tys) {
                    bind_pattern(p, t, ctx);
                }
            }
        }
        Pattern::Tag { .. } | Pattern::Wildcard | Pattern::Literal(_) => {}
    }
}

fn unbind_pattern(pattern: &Pattern, ctx: &mut Ctx) {
    match pattern {
        Pattern::Var(name) => {
            ctx.locals.remove(name);
        }
        Pattern::Tuple(pats) => {
            for p in pats {
                unbind_pattern(p, ctx);
            }
        }
        _ => {}
    }
}

/// Type-checks every function/value body in `decls`, detecting direct
/// self-recursion through a non-function value (§4.3 `RecursiveType`).
pub fn type_check(table: &SymbolTable, decls: &mut [Decl]) -> Vec<TyperError> {
    let mut ctx = Ctx { table, locals: HashMap::new(), errors: Diagnostics::new() };
    for decl in decls.iter_mut() {
        match decl {
            Decl::Value(d) => {
                check_recursive_value(d.name.clone(), &d.body, &mut ctx);
                infer(&mut d.body, &mut ctx);
                expect(&mut ctx, &d.ty, &d.body.ty, d.body.span);
            }
            Decl::Function(f) => {
                infer_function(f, &mut ctx);
            }
            _ => {}
        }
    }
    ctx.errors.into_vec()
}

fn infer_function(f: &mut FunctionDecl, ctx: &mut Ctx) {
    let saved: Vec<_> = f
        .params
        .iter()
        .map(|(n, t)| (n.clone(), ctx.locals.insert(n.clone(), t.clone())))
        .collect();
    infer(&mut f.body, ctx);
    expect(ctx, &f.ret, &f.body.ty, f.body.span);
    for (n, prev) in saved {
        match prev {
            Some(t) => {
                ctx.locals.insert(n, t);
            }
            None => {
                ctx.locals.remove(&n);
            }
        }
    }
}

fn check_recursive_value(name: Name, body: &Expr, ctx: &mut Ctx) {
    if mentions(body, &name) {
        ctx.errors.push(TyperError::RecursiveType { name: name.to_string(), span: body.span });
    }
}

fn mentions(expr: &Expr, name: &Name) -> bool {
    match &*expr.kind {
        ExprKind::Var(n) => n == name,
        ExprKind::App { func, args } => mentions(func, name) || args.iter().any(|a| mentions(a, name)),
        ExprKind::Binary { lhs, rhs, .. } => mentions(lhs, name) || mentions(rhs, name),
        ExprKind::If { cond, then_branch, else_branch } => {
            mentions(cond, name) || mentions(then_branch, name) || mentions(else_branch, name)
        }
        ExprKind::Let { value, body, .. } => mentions(value, name) || mentions(body, name),
        ExprKind::Tuple(items) | ExprKind::Collection { items, .. } => items.iter().any(|e| mentions(e, name)),
        ExprKind::Unary { operand, .. } => mentions(operand, name),
        ExprKind::Tag { payload, .. } => mentions(payload, name),
        ExprKind::Ascribe { expr, .. } => mentions(expr, name),
        _ => false,
    }
}

fn new_ctx(table: &SymbolTable) -> Ctx {
    Ctx { table, locals: HashMap::new(), errors: Diagnostics::new() }
}
