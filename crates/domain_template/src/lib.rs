//! Domain Template - merging sales data into DOCX templates
//!
//! This crate implements the document side of the sales workflow:
//! - Template references carrying their placeholder convention
//! - Literal and expression substitution behind one strategy trait
//! - DOCX package rewriting, including headers and footers
//! - Inline images sized by a fixed constraint
//! - Collision-free output naming and the external PDF converter port

pub mod context;
pub mod converter;
pub mod engine;
pub mod error;
pub mod images;
pub mod output;
pub mod package;
pub mod strategy;
pub mod template;
mod xml;

pub use context::{ContextValue, InlineImage, TemplateContext};
pub use converter::{DocumentConverter, OfficeConverter};
pub use engine::TemplateEngine;
pub use error::{ConversionError, TemplateError};
pub use images::ImageConstraint;
pub use output::{MergedDocument, OutputPaths};
pub use package::DocxPackage;
pub use strategy::{strategy_for, ExpressionSubstitution, LiteralSubstitution, Segment, SubstitutionStrategy};
pub use template::{MissingKeyPolicy, PlaceholderConvention, TemplateRef, TemplateStore, TokenStyle};
