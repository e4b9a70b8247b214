use crate::{
    lang::tokenizing::{Token, TokenKind, TokenStream},
    runtime::{
        data_structures::{dictionary::DefineOutcome, value::Value},
        error::{self, ErrorKind, ScriptError},
        interpreter::Interpreter,
    },
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    /// An optional minus sign followed by one or more digits.
    static ref INTEGER: Regex = Regex::new(r"^-?[0-9]+$").expect("could not compile regex for integer");
}

/// The directives understood at the top level of a source unit.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Directive {
    /// `:variable NAME` registers a variable holding nil.
    Variable,

    /// `:defer NAME` reserves a word whose body is given by a later definition.
    Defer,

    /// `:include "path"` processes another source file in place.
    Include,
}

impl Directive {
    pub fn parse(text: &str) -> Option<Directive> {
        match text {
            ":variable" => Some(Directive::Variable),
            ":defer" => Some(Directive::Defer),
            ":include" => Some(Directive::Include),
            _ => None,
        }
    }
}

/// Errors found while compiling point at the offending token and carry no call stack.
fn compile_error<T>(token: &Token, kind: ErrorKind) -> error::Result<T> {
    ScriptError::new_as_result(kind, Some(token.location().clone()), None)
}

fn unexpected<T>(token: &Token, context: &str) -> error::Result<T> {
    compile_error(
        token,
        ErrorKind::UnexpectedToken(format!("{} '{}' {}", token.kind(), token.text(), context)),
    )
}

/// Try to read the text of a token as a boolean or integer literal.
pub fn parse_literal(text: &str) -> Option<Value> {
    match text {
        "true" => Some(Value::Boolean(true)),
        "false" => Some(Value::Boolean(false)),
        _ if INTEGER.is_match(text) => text.parse::<i64>().ok().map(Value::Number),
        _ => None,
    }
}

/// Turn a token into the value it stands for.
///
/// Literals come first, then words, then variables.  A word resolves to the definition layer that
/// is current right now.  An opening bracket collects the whole quotation from the stream.
pub fn resolve_token(
    token: &Token,
    stream: &mut TokenStream,
    interpreter: &dyn Interpreter,
) -> error::Result<Value> {
    match token.kind() {
        TokenKind::StringLiteral => Ok(Value::String(token.text().clone())),

        TokenKind::QuotationOpen => collect_quotation(token, stream, interpreter),

        TokenKind::WordOrData => {
            let text = token.text();

            if let Some(value) = parse_literal(text) {
                return Ok(value);
            }

            if let Some((id, layer)) = interpreter.dictionary().resolve(text) {
                return Ok(Value::WordRef {
                    id,
                    name: text.clone(),
                    layer,
                });
            }

            if interpreter.variables().contains(text) {
                return Ok(Value::VariableRef(text.clone()));
            }

            compile_error(token, ErrorKind::UnresolvedToken(text.clone()))
        }

        TokenKind::Directive
        | TokenKind::WordDefinitionHeader
        | TokenKind::DefinitionTerminator
        | TokenKind::QuotationClose => unexpected(token, "where a value was expected"),
    }
}

/// Collect the values of a quotation up to its matching close bracket.  Nested quotations are
/// built on an explicit stack of partly collected values, one entry per open bracket.
fn collect_quotation(
    open: &Token,
    stream: &mut TokenStream,
    interpreter: &dyn Interpreter,
) -> error::Result<Value> {
    let max_nesting = interpreter.config().max_nesting_depth;
    let mut open_quotations: Vec<Vec<Value>> = vec![Vec::new()];

    loop {
        let Some(token) = stream.next_token() else {
            return compile_error(open, ErrorKind::UnterminatedQuotation);
        };

        match token.kind() {
            TokenKind::QuotationOpen => {
                if open_quotations.len() >= max_nesting {
                    return compile_error(&token, ErrorKind::NestingTooDeep(max_nesting));
                }

                open_quotations.push(Vec::new());
            }

            TokenKind::QuotationClose => {
                let Some(values) = open_quotations.pop() else {
                    return unexpected(&token, "inside a quotation");
                };

                match open_quotations.last_mut() {
                    Some(enclosing) => enclosing.push(Value::Quotation(values)),
                    None => return Ok(Value::Quotation(values)),
                }
            }

            TokenKind::Directive | TokenKind::WordDefinitionHeader => {
                return unexpected(&token, "inside a quotation");
            }

            TokenKind::DefinitionTerminator => {
                return compile_error(open, ErrorKind::UnterminatedQuotation);
            }

            TokenKind::WordOrData | TokenKind::StringLiteral => {
                let value = resolve_token(&token, stream, interpreter)?;

                if let Some(current) = open_quotations.last_mut() {
                    current.push(value);
                }
            }
        }
    }
}

/// Compile the body following a definition header and install it in the dictionary.
fn compile_definition(
    header: &Token,
    stream: &mut TokenStream,
    interpreter: &mut dyn Interpreter,
) -> error::Result<()> {
    let name = header.text();
    let mut body = Vec::new();

    loop {
        let Some(token) = stream.next_token() else {
            return compile_error(header, ErrorKind::UnterminatedDefinition(name.clone()));
        };

        match token.kind() {
            TokenKind::DefinitionTerminator => break,

            TokenKind::Directive | TokenKind::WordDefinitionHeader => {
                return unexpected(&token, &format!("inside the definition of '{}'", name));
            }

            _ => body.push(resolve_token(&token, stream, interpreter)?),
        }
    }

    let size = body.len();

    match interpreter
        .dictionary_mut()
        .define(name, body, header.location().clone())
    {
        Ok((id, outcome)) => {
            match outcome {
                DefineOutcome::Created => debug!("Defined {} as word {}.", name, id),
                DefineOutcome::Redefined => debug!("Redefined word {} ({}).", name, id),
                DefineOutcome::FilledDeferred => {
                    debug!("Filled in deferred word {} ({}).", name, id)
                }
            }

            debug!("Body of {} holds {} value(s).", name, size);
            Ok(())
        }

        Err(kind) => compile_error(header, kind),
    }
}

/// Run a top level directive.  Every directive takes exactly one argument token.
fn process_directive(
    token: &Token,
    stream: &mut TokenStream,
    interpreter: &mut dyn Interpreter,
) -> error::Result<()> {
    let Some(directive) = Directive::parse(token.text()) else {
        return compile_error(token, ErrorKind::UnknownDirective(token.text().clone()));
    };

    let argument = match stream.next_token() {
        Some(argument)
            if matches!(
                argument.kind(),
                TokenKind::WordOrData | TokenKind::StringLiteral
            ) =>
        {
            argument
        }

        Some(argument) => return unexpected(&argument, &format!("after '{}'", token.text())),

        None => {
            return compile_error(
                token,
                ErrorKind::UnexpectedToken(format!(
                    "end of input, '{}' needs an argument",
                    token.text()
                )),
            );
        }
    };

    let name = argument.text();

    match directive {
        Directive::Variable => {
            if interpreter.variables_mut().register(name) {
                debug!("Registered variable {}.", name);
            } else {
                debug!("Variable {} already exists, keeping its value.", name);
            }

            Ok(())
        }

        Directive::Defer => match interpreter
            .dictionary_mut()
            .defer(name, argument.location().clone())
        {
            Ok(id) => {
                debug!("Deferred word {} reserved as {}.", name, id);
                Ok(())
            }

            Err(kind) => compile_error(&argument, kind),
        },

        // Includes nest like calls so that runaway self inclusion hits the depth limit.
        Directive::Include => {
            interpreter.call_stack_push(
                format!("{} {}", token.text(), name),
                token.location().clone(),
            )?;

            let result = interpreter.process_source_file(name);

            interpreter.call_stack_pop()?;
            result
        }
    }
}

/// Process a whole source unit.  Definitions and directives are handled as they are found, every
/// other top level token is resolved and dispatched right away.
pub fn process_source_from_tokens(
    mut stream: TokenStream,
    interpreter: &mut dyn Interpreter,
) -> error::Result<()> {
    while let Some(token) = stream.next_token() {
        interpreter.set_current_location(token.location().clone());

        match token.kind() {
            TokenKind::Directive => process_directive(&token, &mut stream, interpreter)?,

            TokenKind::WordDefinitionHeader => {
                compile_definition(&token, &mut stream, interpreter)?
            }

            TokenKind::DefinitionTerminator | TokenKind::QuotationClose => {
                return unexpected(&token, "outside of a definition or quotation");
            }

            _ => {
                let value = resolve_token(&token, &mut stream, interpreter)?;
                interpreter.dispatch(&value)?;
            }
        }
    }

    Ok(())
}
