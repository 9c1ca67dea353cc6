//! Declarative parameter-list model used to validate route arguments against
//! the router's registration entry points, and to rewrite endpoint
//! signatures for dependency injection.
//!
//! Signatures here are plain data, never live callables: validation binds
//! argument names and arity exactly like an ordinary call would, without
//! invoking anything.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::di::Depends;

/// How a parameter may be passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParamKind {
    PositionalOrKeyword,
    KeywordOnly,
}

/// Default value of a parameter, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ParamDefault {
    /// No default; the parameter must be supplied.
    Required,
    Value(Value),
    /// Resolved from the DI container at request time.
    Dependency(Depends),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    name: Cow<'static, str>,
    kind: ParamKind,
    default: ParamDefault,
}

impl Param {
    /// Positional-or-keyword parameter without a default.
    pub fn required(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::PositionalOrKeyword,
            default: ParamDefault::Required,
        }
    }

    /// Positional-or-keyword parameter with a default.
    pub fn optional(name: impl Into<Cow<'static, str>>, default: Value) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::PositionalOrKeyword,
            default: ParamDefault::Value(default),
        }
    }

    /// Keyword-only parameter without a default.
    pub fn keyword(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::KeywordOnly,
            default: ParamDefault::Required,
        }
    }

    /// Keyword-only parameter with a default.
    pub fn keyword_optional(name: impl Into<Cow<'static, str>>, default: Value) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::KeywordOnly,
            default: ParamDefault::Value(default),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    pub fn default(&self) -> &ParamDefault {
        &self.default
    }
}

/// Raised when supplied arguments do not bind to a target signature.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignatureMismatch {
    #[error("missing required parameter `{name}`")]
    MissingRequired { name: String },

    #[error("unexpected keyword parameter `{name}`")]
    UnexpectedKeyword { name: String },

    #[error("too many positional arguments: expected at most {expected}, got {given}")]
    TooManyPositional { expected: usize, given: usize },

    #[error("parameter `{name}` supplied both positionally and by keyword")]
    DuplicateParameter { name: String },
}

/// An ordered parameter list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signature {
    params: Vec<Param>,
}

impl Signature {
    pub fn new(params: Vec<Param>) -> Self {
        Self { params }
    }

    /// The canonical endpoint signature when none is declared: a lone
    /// receiver parameter.
    pub fn receiver_only() -> Self {
        Self::new(vec![Param::required("self")])
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// The same signature with the implicit leading router/receiver
    /// parameter removed. Validation of caller-supplied arguments always
    /// happens against this view.
    pub fn without_receiver(&self) -> Signature {
        Signature {
            params: self.params.iter().skip(1).cloned().collect(),
        }
    }

    /// Bind `args` and `kwargs` against this parameter list using ordinary
    /// call-binding rules. Succeeds silently.
    ///
    /// # Errors
    /// [`SignatureMismatch`] on missing required parameters, unknown
    /// keywords, duplicate assignment, or positional overflow.
    pub fn bind(
        &self,
        args: &[Value],
        kwargs: &BTreeMap<String, Value>,
    ) -> Result<(), SignatureMismatch> {
        let mut filled = vec![false; self.params.len()];

        let positional = self
            .params
            .iter()
            .take_while(|p| p.kind == ParamKind::PositionalOrKeyword)
            .count();
        if args.len() > positional {
            return Err(SignatureMismatch::TooManyPositional {
                expected: positional,
                given: args.len(),
            });
        }
        for slot in filled.iter_mut().take(args.len()) {
            *slot = true;
        }

        for name in kwargs.keys() {
            match self.params.iter().position(|p| p.name == *name) {
                Some(ix) if filled[ix] => {
                    return Err(SignatureMismatch::DuplicateParameter { name: name.clone() });
                }
                Some(ix) => filled[ix] = true,
                None => {
                    return Err(SignatureMismatch::UnexpectedKeyword { name: name.clone() });
                }
            }
        }

        for (param, filled) in self.params.iter().zip(filled) {
            if !filled && param.default == ParamDefault::Required {
                return Err(SignatureMismatch::MissingRequired {
                    name: param.name.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Rewrite an endpoint signature for controller dispatch: the receiver
    /// parameter keeps its name and kind but defaults to `owner` (so the
    /// controller instance is injected per request), and every remaining
    /// parameter becomes keyword-only.
    ///
    /// Returns `None` when the signature has no parameters at all; the
    /// assembler treats that as a fatal configuration error.
    pub fn rewrite(&self, owner: Depends) -> Option<Signature> {
        let (receiver, rest) = self.params.split_first()?;
        let mut params = Vec::with_capacity(self.params.len());
        params.push(Param {
            name: receiver.name.clone(),
            kind: receiver.kind,
            default: ParamDefault::Dependency(owner),
        });
        for param in rest {
            params.push(Param {
                name: param.name.clone(),
                kind: ParamKind::KeywordOnly,
                default: param.default.clone(),
            });
        }
        Some(Signature { params })
    }
}
