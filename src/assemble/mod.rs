//! Endpoint chaining. One pass per matching axis; see [`chain::ChainAssembler`].

pub(crate) mod chain;
pub(crate) mod graph;
