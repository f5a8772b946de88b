use crate::ast::ast::Expression;
use crate::errors::errors::{Error, ErrorImpl};
use crate::lexer::tokens::Token;

use super::registry::Param;

/// Checks an argument list against a declared parameter list.
///
/// Arity is checked first: the required count ignores optional parameters,
/// and a trailing variadic parameter lifts the upper bound. Argument types
/// are then matched positionally, with surplus variadic arguments checked
/// against the last parameter.
pub fn validate_call(
    name: &str,
    args: &[Expression],
    params: &[Param],
    token: &Token,
) -> Result<(), Error> {
    let variadic = params.last().map(|param| param.variadic).unwrap_or(false);
    let required = params.iter().filter(|param| !param.optional).count();

    if args.len() < required {
        return Err(Error::new(
            ErrorImpl::MissingArguments {
                name: name.to_string(),
                expected: required,
                received: args.len(),
            },
            token,
        ));
    }

    if !variadic && args.len() > params.len() {
        return Err(Error::new(
            ErrorImpl::UnexpectedArguments {
                name: name.to_string(),
                expected: params.len(),
                received: args.len(),
            },
            token,
        ));
    }

    for (i, arg) in args.iter().enumerate() {
        let param = match params.get(i) {
            Some(param) => param,
            None => match params.last() {
                Some(param) => param,
                None => break,
            },
        };

        if !param.types.contains(&arg.ty()) {
            let expected = param
                .types
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" or ");
            let argument = param
                .name
                .clone()
                .unwrap_or_else(|| (i + 1).to_string());
            return Err(Error::new(
                ErrorImpl::ArgumentTypeMismatch {
                    argument,
                    name: name.to_string(),
                    expected,
                    received: arg.ty().to_string(),
                },
                arg.token(),
            ));
        }
    }

    Ok(())
}
