//! Method extractor: a service contract → IR [`Service`].

use std::collections::HashSet;

use remoto_ir::{ERROR_FIELD, Method, Service, is_exported};

use crate::ast::{InterfaceDecl, MethodSig, Param, TypeExpr};
use crate::classify::{Record, resolve_record};
use crate::diagnostics::Diagnostic;
use crate::package::Package;
use crate::structure::{Built, StructureBuilder};

const SIGNATURE: &str = "service methods must have signature (*Request) *Response";

/// Extract a service and every structure its methods reach.
pub fn extract_service<'a>(
    pkg: &Package<'a>,
    decl: &'a InterfaceDecl,
) -> Result<Service, Diagnostic> {
    let mut service = Service::new(decl.name.name.clone());
    service.comment = decl.doc.clone();

    let mut seen = HashSet::new();
    for sig in &decl.methods {
        if !seen.insert(sig.name.name.as_str()) {
            return Err(pkg.diag(
                sig.name.pos,
                format!("duplicate method {}", sig.name.name),
            ));
        }
        let method = extract_method(pkg, &mut service, sig)?;
        service.methods.push(method);
    }
    Ok(service)
}

fn extract_method<'a>(
    pkg: &Package<'a>,
    service: &mut Service,
    sig: &'a MethodSig,
) -> Result<Method, Diagnostic> {
    let at_method = |message: &str| pkg.diag(sig.name.pos, message);

    if !is_exported(&sig.name.name) {
        return Err(at_method(&format!(
            "method {}: must be exported",
            sig.name.name
        )));
    }
    if sig.is_variadic() {
        return Err(at_method(SIGNATURE));
    }
    let ([param], [result]) = (sig.params.as_slice(), sig.results.as_slice()) else {
        return Err(at_method(SIGNATURE));
    };
    let request_record = record_of(pkg, param, "request")?;
    let response_record = record_of(pkg, result, "response")?;

    let mut request = StructureBuilder::new(pkg, service)
        .build(request_record)?
        .structure;
    if !request.name.ends_with("Request") {
        return Err(at_method(
            "request object type name should end with \"Request\"",
        ));
    }
    request.is_request_object = true;
    service.ensure_structure(request.clone());

    let built = StructureBuilder::new(pkg, service).build(response_record)?;
    if built.structure.name == request.name {
        return Err(at_method(
            "service methods must use different types for request and response objects",
        ));
    }
    if !built.structure.name.ends_with("Response") {
        return Err(at_method(
            "response object type name should end with \"Response\"",
        ));
    }
    check_file_response(pkg, &built)?;

    let mut response = built.structure;
    response.is_response_object = true;
    response.ensure_error_field();
    service.ensure_structure(response.clone());

    tracing::trace!(service = %service.name, method = %sig.name.name, "extracted method");
    Ok(Method {
        name: sig.name.name.clone(),
        comment: sig.doc.clone(),
        request_structure: request,
        response_structure: response,
    })
}

/// The record a request or response parameter points to.
fn record_of<'a>(pkg: &Package<'a>, param: &'a Param, kind: &str) -> Result<Record<'a>, Diagnostic> {
    let pointer_required =
        || pkg.diag(param.pos(), format!("{} object must be a pointer to a struct", kind));
    let TypeExpr::Pointer(target, _) = &param.ty else {
        return Err(pointer_required());
    };
    resolve_record(pkg, &**target)
        .map_err(|e| pkg.diag(param.pos(), e.to_string()))?
        .ok_or_else(pointer_required)
}

/// A response that carries a file carries nothing else.
fn check_file_response(pkg: &Package<'_>, built: &Built) -> Result<(), Diagnostic> {
    let mut files = 0;
    let mut others = 0;
    for (field, pos) in built.structure.fields.iter().zip(&built.positions) {
        if field.name == ERROR_FIELD {
            continue;
        }
        if field.ty.is_file() {
            files += if field.ty.is_multiple { 2 } else { 1 };
        } else {
            others += 1;
        }
        if files > 1 || (files == 1 && others > 0) {
            return Err(pkg.diag(
                *pos,
                "response object may contain a single remototypes.File field only",
            ));
        }
    }
    Ok(())
}
