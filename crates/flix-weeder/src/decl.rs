//! Top-level declaration weeding (§4.1).

use std::collections::HashSet;

use flix_base::{Name, Span};
use flix_ir::surface::{SurfaceBoundedLattice, SurfaceDefinition, SurfaceEnum, SurfaceIndex, SurfaceRelation};
use flix_ir::{
    Annotation, BoundedLatticeDecl, Decl, EnumDecl, FunctionDecl, IndexDecl, RelationDecl, Type, TypeVar,
};

use flix_ir::Diagnostics;

use crate::error::WeederError;
use crate::expr::weed_expr;
use crate::surface_type::weed_type;

fn untyped() -> Type {
    Type::Var(TypeVar(0))
}

pub fn weed_definition(surface: &SurfaceDefinition, errors: &mut Diagnostics<WeederError>) -> Decl {
    let name = Name::unqualified(surface.name.clone());

    if surface.params.is_empty() {
        errors.push(WeederError::IllegalParameterList { decl: surface.name.clone(), span: surface.span });
    }

    let mut seen_params = HashSet::new();
    for p in &surface.params {
        if !seen_params.insert(p.clone()) {
            errors.push(WeederError::DuplicateFormal { decl: surface.name.clone(), name: p.clone(), span: surface.span });
        }
    }

    let mut seen_annotations = HashSet::new();
    let mut annotations = Vec::new();
    for raw in &surface.annotations {
        if !seen_annotations.insert(raw.clone()) {
            errors.push(WeederError::DuplicateAnnotation { decl: surface.name.clone(), name: raw.clone(), span: surface.span });
            continue;
        }
        match Annotation::parse(raw) {
            Some(a) => annotations.push(a),
            None => errors.push(WeederError::IllegalAnnotation { name: raw.clone(), span: surface.span }),
        }
    }

    let ret = surface.ret_ty.as_ref().map(weed_type).unwrap_or_else(untyped);

    Decl::Function(FunctionDecl {
        name,
        span: surface.span,
        params: surface.params.iter().map(|p| (p.clone(), untyped())).collect(),
        ret,
        annotations,
        body: weed_expr(&surface.body, errors),
    })
}

pub fn weed_enum(surface: &SurfaceEnum, errors: &mut Diagnostics<WeederError>) -> Decl {
    let mut seen: HashSet<String> = HashSet::new();
    let mut first_span: std::collections::HashMap<String, Span> = std::collections::HashMap::new();
    let mut tags = Vec::new();
    for (tag, ty, tag_span) in &surface.tags {
        if !seen.insert(tag.clone()) {
            errors.push(WeederError::DuplicateTag {
                decl: surface.name.clone(),
                name: tag.clone(),
                first: first_span[tag],
                second: *tag_span,
            });
            continue;
        }
        first_span.insert(tag.clone(), *tag_span);
        tags.push((tag.clone(), ty.as_ref().map(weed_type).unwrap_or(Type::Unit)));
    }
    Decl::Enum(EnumDecl { name: Name::unqualified(surface.name.clone()), span: surface.span, tags })
}

pub fn weed_relation(surface: &SurfaceRelation, errors: &mut Diagnostics<WeederError>) -> Decl {
    if surface.attributes.is_empty() {
        if surface.is_lattice {
            errors.push(WeederError::EmptyLattice { decl: surface.name.clone(), span: surface.span });
        } else {
            errors.push(WeederError::EmptyRelation { decl: surface.name.clone(), span: surface.span });
        }
        return Decl::Relation(RelationDecl {
            name: Name::unqualified(surface.name.clone()),
            span: surface.span,
            attributes: Vec::new(),
            element: None,
        });
    }

    let mut seen = HashSet::new();
    let mut attributes: Vec<(String, Type)> = Vec::new();
    for (attr, ty) in &surface.attributes {
        if !seen.insert(attr.clone()) {
            errors.push(WeederError::DuplicateAttribute { decl: surface.name.clone(), name: attr.clone(), span: surface.span });
            continue;
        }
        attributes.push((attr.clone(), weed_type(ty)));
    }

    let element = if surface.is_lattice { attributes.pop() } else { None };

    Decl::Relation(RelationDecl { name: Name::unqualified(surface.name.clone()), span: surface.span, attributes, element })
}

pub fn weed_index(surface: &SurfaceIndex, errors: &mut Diagnostics<WeederError>) -> Decl {
    let table_name = {
        let (leaf, namespace) = surface.table.split_last().expect("non-empty table path");
        Name::from_segments(namespace.to_vec(), leaf.clone())
    };

    if surface.keys.is_empty() {
        errors.push(WeederError::EmptyIndex { table: table_name.to_string(), span: surface.span });
    }
    for key in &surface.keys {
        if key.is_empty() {
            errors.push(WeederError::IllegalIndex { table: table_name.to_string(), span: surface.span });
        }
    }

    Decl::Index(IndexDecl {
        name: Name::from_segments(Vec::<String>::new(), format!("{table_name}#index")),
        span: surface.span,
        table: table_name,
        keys: surface.keys.clone(),
    })
}

pub fn weed_bounded_lattice(surface: &SurfaceBoundedLattice, errors: &mut Diagnostics<WeederError>) -> Decl {
    if surface.elements.len() != 5 {
        errors.push(WeederError::IllegalLattice {
            decl: surface.name.clone(),
            found: surface.elements.len(),
            span: surface.span,
        });
        let placeholder = || weed_expr(&surface.elements[0], errors);
        let (bot, top, leq, lub, glb) = if surface.elements.is_empty() {
            let dummy = flix_ir::Expr::new(flix_ir::ExprKind::UserError { message: "missing lattice element".into() }, untyped(), surface.span);
            (dummy.clone(), dummy.clone(), dummy.clone(), dummy.clone(), dummy)
        } else {
            (placeholder(), placeholder(), placeholder(), placeholder(), placeholder())
        };
        return Decl::BoundedLattice(BoundedLatticeDecl {
            name: Name::unqualified(surface.name.clone()),
            span: surface.span,
            element_type: weed_type(&surface.element_ty),
            bot,
            top,
            leq,
            lub,
            glb,
            widen: None,
        });
    }

    Decl::BoundedLattice(BoundedLatticeDecl {
        name: Name::unqualified(surface.name.clone()),
        span: surface.span,
        element_type: weed_type(&surface.element_ty),
        bot: weed_expr(&surface.elements[0], errors),
        top: weed_expr(&surface.elements[1], errors),
        leq: weed_expr(&surface.elements[2], errors),
        lub: weed_expr(&surface.elements[3], errors),
        glb: weed_expr(&surface.elements[4], errors),
        widen: None,
    })
}
