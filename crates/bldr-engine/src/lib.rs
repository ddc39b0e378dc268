//! Synthesis engine for fluent builder code generation.
//!
//! Given an immutable type model ([`bldr_model`]), the engine produces
//! method descriptions for the fluent surface of a generated builder:
//! `with*`/`addTo*`/`removeFrom*` mutators, `get*`/`build*`/`has*`
//! accessors, and the `withNew*`/`edit*`/`and()`/`end*()` nested-builder
//! navigation. Output is a statement AST, not source text; rendering is a
//! downstream concern.
//!
//! Entry point: [`assembly::BuilderAssembler::assemble`], which routes each
//! property of a [`bldr_model::TypeDef`] to the right synthesizer families
//! and returns an ordered [`assembly::BuilderPlan`].

pub mod assembly;
pub mod cache;
pub mod context;
pub mod descendants;
pub mod error;
pub mod nesting;
pub mod synth;
pub mod transform;

pub use assembly::{BuilderAssembler, BuilderPlan};
pub use cache::{SynthCache, SynthKind};
pub use context::BuilderContext;
pub use descendants::buildable_descendants;
pub use error::{EngineError, Result};
pub use nesting::NestedTypes;
pub use synth::MethodSynthesizers;
pub use transform::{combine, unwrap_all, TypeTransform, BUILDER_SUFFIX, VISITABLE_BUILDER};
