//! Z3 solver wrapper for law verification (§4.6 step 2).
//!
//! A law's property formula is closed (no free function symbols beyond
//! uninterpreted `Apply`s) except for the variables universally quantified
//! over the law — `x`, `y`, `z` in [`crate::law`]'s terminology. Validity is
//! checked the standard way: assert the formula's *negation* and ask Z3 for
//! satisfiability. `Unsat` means the negation has no model, so the formula
//! holds under every assignment — the law is proved. `Sat` hands back a
//! model, which becomes a [`CounterExample`]. `Unknown` (timeout or a
//! theory Z3 can't decide) is reported, not silently dropped.

use std::collections::HashMap;

use z3::ast::{Ast, Bool, Dynamic, Int, Real};
use z3::{Config, Context, FuncDecl, SatResult, Solver, Sort};

use crate::error::CounterExample;
use crate::ir::{VerifyExpr, VerifyOp, VerifyType};

/// The result of attempting to discharge one law obligation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Z3 proved the negation unsatisfiable: the law holds for every input.
    Proved,
    /// Z3 found a model making the law false for some input.
    Violated(CounterExample),
    /// Z3 returned `unknown`, typically a timeout on a theory it cannot decide.
    Inconclusive(String),
}

/// Discharges `formula`, universally quantified over `free_vars`, against
/// a Z3 instance configured with `timeout_ms`.
///
/// Each entry in `free_vars` becomes a fresh sort-typed constant; the
/// formula must not reference any variable absent from this list.
pub fn discharge(formula: &VerifyExpr, free_vars: &[(String, VerifyType)], timeout_ms: u64) -> Outcome {
    let mut cfg = Config::new();
    cfg.set_param_value("timeout", &timeout_ms.to_string());
    let ctx = Context::new(&cfg);
    let solver = Solver::new(&ctx);

    let vars: HashMap<String, VerifyType> = free_vars.iter().cloned().collect();
    let encoder = Encoder::new(&ctx, &vars);

    let assertion = match encoder.encode(formula).as_bool() {
        Some(b) => b,
        None => return Outcome::Inconclusive("law property did not encode to a boolean formula".into()),
    };

    solver.assert(&assertion.not());

    match solver.check() {
        SatResult::Unsat => Outcome::Proved,
        SatResult::Sat => {
            let assignments = solver
                .get_model()
                .map(|model| {
                    free_vars
                        .iter()
                        .map(|(name, ty)| {
                            let value = encoder
                                .const_of(name, *ty)
                                .and_then(|c| model.eval(&c, true))
                                .map(|v| format!("{v:?}"))
                                .unwrap_or_else(|| "?".to_string());
                            (name.clone(), value)
                        })
                        .collect()
                })
                .unwrap_or_default();
            Outcome::Violated(CounterExample { assignments })
        }
        SatResult::Unknown => Outcome::Inconclusive(
            solver.get_reason_unknown().unwrap_or_else(|| "solver returned unknown".to_string()),
        ),
    }
}

/// Converts [`VerifyExpr`] into Z3 ASTs under a fixed variable-typing.
struct Encoder<'ctx> {
    ctx: &'ctx Context,
    vars: &'ctx HashMap<String, VerifyType>,
}

impl<'ctx> Encoder<'ctx> {
    fn new(ctx: &'ctx Context, vars: &'ctx HashMap<String, VerifyType>) -> Self {
        Self { ctx, vars }
    }

    /// Rebuilds the constant AST for an already-declared variable, used to
    /// read its value back out of a satisfying model.
    fn const_of(&self, name: &str, ty: VerifyType) -> Option<Dynamic<'ctx>> {
        Some(match ty {
            VerifyType::Int | VerifyType::Object => Dynamic::from_ast(&Int::new_const(self.ctx, name)),
            VerifyType::Bool => Dynamic::from_ast(&Bool::new_const(self.ctx, name)),
            VerifyType::Real => Dynamic::from_ast(&Real::new_const(self.ctx, name)),
        })
    }

    fn encode(&self, expr: &VerifyExpr) -> Dynamic<'ctx> {
        match expr {
            VerifyExpr::Int(n) => Dynamic::from_ast(&Int::from_i64(self.ctx, *n)),
            VerifyExpr::Bool(b) => Dynamic::from_ast(&Bool::from_bool(self.ctx, *b)),
            VerifyExpr::Var(name) => {
                let ty = self.vars.get(name).copied().unwrap_or(VerifyType::Object);
                self.const_of(name, ty).expect("const_of is total over VerifyType")
            }
            VerifyExpr::Binary { op, left, right } => {
                let l = self.encode(left);
                let r = self.encode(right);
                self.encode_binary(*op, l, r)
            }
            VerifyExpr::Not(inner) => {
                let i = self.encode(inner);
                match i.as_bool() {
                    Some(b) => Dynamic::from_ast(&b.not()),
                    None => i,
                }
            }
            VerifyExpr::If { cond, then_branch, else_branch } => {
                let c = self.encode(cond);
                let t = self.encode(then_branch);
                let e = self.encode(else_branch);
                match c.as_bool() {
                    Some(cb) => cb.ite(&t, &e),
                    None => t,
                }
            }
            VerifyExpr::Apply { name, args } => self.encode_apply(name, args),
        }
    }

    fn encode_binary(&self, op: VerifyOp, l: Dynamic<'ctx>, r: Dynamic<'ctx>) -> Dynamic<'ctx> {
        let both_int = l.as_int().zip(r.as_int());
        let both_real = l.as_real().zip(r.as_real());
        match op {
            VerifyOp::Add => match both_int {
                Some((li, ri)) => Dynamic::from_ast(&(li + ri)),
                None => match both_real {
                    Some((li, ri)) => Dynamic::from_ast(&(li + ri)),
                    None => l,
                },
            },
            VerifyOp::Sub => match both_int {
                Some((li, ri)) => Dynamic::from_ast(&(li - ri)),
                None => match both_real {
                    Some((li, ri)) => Dynamic::from_ast(&(li - ri)),
                    None => l,
                },
            },
            VerifyOp::Mul => match both_int {
                Some((li, ri)) => Dynamic::from_ast(&(li * ri)),
                None => match both_real {
                    Some((li, ri)) => Dynamic::from_ast(&(li * ri)),
                    None => l,
                },
            },
            VerifyOp::Div => match both_int {
                Some((li, ri)) => Dynamic::from_ast(&(li / ri)),
                None => match both_real {
                    Some((li, ri)) => Dynamic::from_ast(&(li / ri)),
                    None => l,
                },
            },
            VerifyOp::Mod => match both_int {
                Some((li, ri)) => Dynamic::from_ast(&li.modulo(&ri)),
                // §4.6: Real approximates float arithmetic; modulo has no
                // Real-sort counterpart in Z3, so it is left uninterpreted.
                None => Dynamic::from_ast(&Int::fresh_const(self.ctx, "mod")),
            },
            VerifyOp::Gt => self.compare(l, r, |a: &Int, b: &Int| a.gt(b), |a: &Real, b: &Real| a.gt(b)),
            VerifyOp::Lt => self.compare(l, r, |a: &Int, b: &Int| a.lt(b), |a: &Real, b: &Real| a.lt(b)),
            VerifyOp::Gte => self.compare(l, r, |a: &Int, b: &Int| a.ge(b), |a: &Real, b: &Real| a.ge(b)),
            VerifyOp::Lte => self.compare(l, r, |a: &Int, b: &Int| a.le(b), |a: &Real, b: &Real| a.le(b)),
            VerifyOp::Eq => Dynamic::from_ast(&l._eq(&r)),
            VerifyOp::Neq => Dynamic::from_ast(&l._eq(&r).not()),
            VerifyOp::And => match l.as_bool().zip(r.as_bool()) {
                Some((lb, rb)) => Dynamic::from_ast(&Bool::and(self.ctx, &[&lb, &rb])),
                None => Dynamic::from_ast(&Bool::from_bool(self.ctx, false)),
            },
            VerifyOp::Or => match l.as_bool().zip(r.as_bool()) {
                Some((lb, rb)) => Dynamic::from_ast(&Bool::or(self.ctx, &[&lb, &rb])),
                None => Dynamic::from_ast(&Bool::from_bool(self.ctx, false)),
            },
            VerifyOp::Implies => match l.as_bool().zip(r.as_bool()) {
                Some((lb, rb)) => Dynamic::from_ast(&lb.implies(&rb)),
                None => Dynamic::from_ast(&Bool::from_bool(self.ctx, true)),
            },
        }
    }

    fn compare(
        &self,
        l: Dynamic<'ctx>,
        r: Dynamic<'ctx>,
        int_cmp: impl Fn(&Int<'ctx>, &Int<'ctx>) -> Bool<'ctx>,
        real_cmp: impl Fn(&Real<'ctx>, &Real<'ctx>) -> Bool<'ctx>,
    ) -> Dynamic<'ctx> {
        if let (Some(li), Some(ri)) = (l.as_int(), r.as_int()) {
            return Dynamic::from_ast(&int_cmp(&li, &ri));
        }
        if let (Some(li), Some(ri)) = (l.as_real(), r.as_real()) {
            return Dynamic::from_ast(&real_cmp(&li, &ri));
        }
        Dynamic::from_ast(&Bool::from_bool(self.ctx, false))
    }

    fn encode_apply(&self, name: &str, args: &[VerifyExpr]) -> Dynamic<'ctx> {
        // Uninterpreted application: an unrecognized `Var` (recursive
        // self-call, or a reference to another declaration `inline_call`
        // declined to follow) becomes arity-0 here; a genuine `App` keeps
        // its arguments. Both use the Int sort for arguments and range over
        // Bool, matching the uninterpreted-function theory §4.6 describes
        // for collaborator calls the encoder does not inline.
        let int_sort = Sort::int(self.ctx);
        let domain: Vec<&Sort> = args.iter().map(|_| &int_sort).collect();
        let range = Sort::bool(self.ctx);
        let func_decl = FuncDecl::new(self.ctx, name, &domain, &range);
        let encoded_args: Vec<Dynamic> = args.iter().map(|a| self.encode(a)).collect();
        let arg_refs: Vec<&dyn Ast> = encoded_args.iter().map(|a| a as &dyn Ast).collect();
        Dynamic::from_ast(&func_decl.apply(&arg_refs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proves_reflexivity_of_equality() {
        // forall x. x <= x, encoded over Int.
        let formula = VerifyExpr::lte(VerifyExpr::var("x"), VerifyExpr::var("x"));
        let outcome = discharge(&formula, &[("x".into(), VerifyType::Int)], 5000);
        assert_eq!(outcome, Outcome::Proved);
    }

    #[test]
    fn reports_a_counterexample_for_a_false_formula() {
        // forall x. x > x is false for every x.
        let formula = VerifyExpr::gt(VerifyExpr::var("x"), VerifyExpr::var("x"));
        let outcome = discharge(&formula, &[("x".into(), VerifyType::Int)], 5000);
        assert!(matches!(outcome, Outcome::Violated(_)));
    }

    #[test]
    fn proves_commutativity_of_addition() {
        let formula = VerifyExpr::eq(
            VerifyExpr::binary(VerifyOp::Add, VerifyExpr::var("x"), VerifyExpr::var("y")),
            VerifyExpr::binary(VerifyOp::Add, VerifyExpr::var("y"), VerifyExpr::var("x")),
        );
        let outcome = discharge(&formula, &[("x".into(), VerifyType::Int), ("y".into(), VerifyType::Int)], 5000);
        assert_eq!(outcome, Outcome::Proved);
    }
}
