//! Pattern weeding: linearity checking and literal desugaring.

use std::collections::HashSet;

use flix_ir::surface::SurfacePattern;
use flix_ir::{Diagnostics, FloatWidth, IntWidth, Literal, Pattern};

use crate::error::WeederError;
use crate::literal::weed_literal;

/// Weeds a pattern, collecting every bound variable name into `bound` and
/// reporting [`WeederError::NonLinearPattern`] for a repeat within the
/// same pattern (§4.1 "Patterns... must be linear").
pub fn weed_pattern(
    surface: &SurfacePattern,
    bound: &mut HashSet<String>,
    errors: &mut Diagnostics<WeederError>,
    span: flix_base::Span,
) -> Pattern {
    match surface {
        SurfacePattern::Wildcard => Pattern::Wildcard,
        SurfacePattern::Var(name) => {
            if !bound.insert(name.clone()) {
                errors.push(WeederError::NonLinearPattern { name: name.clone(), span });
            }
            Pattern::Var(name.clone())
        }
        SurfacePattern::Lit(lit) => {
            Pattern::Literal(weed_literal(lit, IntWidth::W32, FloatWidth::W64, span, errors))
        }
        SurfacePattern::Tuple(elems) => {
            Pattern::Tuple(elems.iter().map(|e| weed_pattern(e, bound, errors, span)).collect())
        }
        SurfacePattern::Tag { tag, payload } => {
            let payload = match payload {
                Some(p) => weed_pattern(p, bound, errors, span),
                None => Pattern::Literal(Literal::Unit),
            };
            Pattern::Tag {
                tag: tag.clone(),
                payload: Box::new(payload),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flix_base::Span;

    #[test]
    fn repeated_variable_is_non_linear() {
        let pat = SurfacePattern::Tuple(vec![
            SurfacePattern::Var("x".into()),
            SurfacePattern::Var("x".into()),
        ]);
        let mut bound = HashSet::new();
        let mut errors = Diagnostics::new();
        weed_pattern(&pat, &mut bound, &mut errors, Span::new(0, 1));
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], WeederError::NonLinearPattern { .. }));
    }

    #[test]
    fn distinct_variables_are_linear() {
        let pat = SurfacePattern::Tuple(vec![
            SurfacePattern::Var("x".into()),
            SurfacePattern::Var("y".into()),
        ]);
        let mut bound = HashSet::new();
        let mut errors = Diagnostics::new();
        weed_pattern(&pat, &mut bound, &mut errors, Span::new(0, 1));
        assert!(errors.is_empty());
    }

    #[test]
    fn tag_without_payload_gets_unit() {
        let pat = SurfacePattern::Tag { tag: "None".into(), payload: None };
        let mut bound = HashSet::new();
        let mut errors = Diagnostics::new();
        let woven = weed_pattern(&pat, &mut bound, &mut errors, Span::new(0, 1));
        assert!(matches!(woven, Pattern::Tag { payload, .. } if *payload == Pattern::Literal(Literal::Unit)));
    }
}
