//! Shared literal weeding, used by both expression and pattern weeding.

use flix_base::Span;
use flix_ir::surface::SurfaceLit;
use flix_ir::{Diagnostics, FloatWidth, IntWidth, Literal};

use crate::error::WeederError;
use crate::numeric::{parse_float, parse_int};

pub fn weed_literal(
    lit: &SurfaceLit,
    int_width: IntWidth,
    float_width: FloatWidth,
    span: Span,
    errors: &mut Diagnostics<WeederError>,
) -> Literal {
    match lit {
        SurfaceLit::Bool(b) => Literal::Bool(*b),
        SurfaceLit::Char(c) => Literal::Char(*c),
        SurfaceLit::Str(s) => Literal::Str(s.clone()),
        SurfaceLit::Int(text) => match parse_int(text, int_width, span) {
            Ok(v) => Literal::Int(int_width, v),
            Err(e) => {
                errors.push(e);
                Literal::Int(int_width, 0)
            }
        },
        SurfaceLit::Float(text) => match parse_float(text, float_width, span) {
            Ok(v) => Literal::Float(float_width, v),
            Err(e) => {
                errors.push(e);
                Literal::Float(float_width, 0.0)
            }
        },
    }
}
