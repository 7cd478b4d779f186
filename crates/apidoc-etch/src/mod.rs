//! apidoc-etch: Documentation generator for OData operations and options classes
//!
//! This crate turns the declarations extracted from a C# code base into
//! reference documentation:
//! - OData operations (functions and actions) with request examples
//! - Options classes with JSON configuration and environment variable examples
//! - Index tables, cheat sheets and per-category aggregation files
//! - A plain-text generation report listing documentation gaps and conflicts
//!
//! Every run writes two trees, one for external API consumers (`frontend`)
//! and one for internal developers (`backend`).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ declaration dump │  (JSON from the language front end)
//! └────────┬─────────┘
//!          ▼
//!   ┌──────────────┐     ┌────────────────┐
//!   │  normalizer  │◄────│  doc comments  │
//!   └──────┬───────┘     └────────────────┘
//!          ▼
//!   ┌──────────────┐     ┌────────────────┐
//!   │  conflicts   │     │ classification │
//!   └──────┬───────┘     └───────┬────────┘
//!          └──────────┬──────────┘
//!                     ▼
//!          ┌─────────────────────┐
//!          │ renderers + router  │  (frontend, backend)
//!          └──────────┬──────────┘
//!                     ▼
//!              ┌─────────────┐
//!              │  Markdown   │
//!              └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use apidoc_etch::{FileLevel, Generator, GeneratorConfig};
//!
//! let config = GeneratorConfig::new("dumps/", "docs").with_file_level(FileLevel::Category);
//! let mut generator = Generator::new(config);
//! let output = generator.run().expect("Failed to generate docs");
//! println!("{} files written", output.files.len());
//! ```

// Core types
pub mod node;
pub mod params;
pub mod types;

// Declarations and documented entities
pub mod class;
pub mod declaration;
pub mod r#enum;
pub mod operation;
pub mod options_class;

// Processing
pub mod classification;
pub mod conflicts;
pub mod diagnostics;
pub mod doc_comment;
pub mod example;
pub mod normalize;
pub mod slug;
pub mod test;

// Output
pub mod docgen;
pub mod publish;
pub mod render;
pub mod report;
pub mod router;

// Re-exports for convenience
pub use class::{ClassDef, ClassRegistry, ClassShape};
pub use classification::{Category, ClassificationTable};
pub use declaration::{load_input, DeclarationDump};
pub use diagnostics::{Diagnostic, DiagnosticSeverity, DiagnosticsCollector, DocError, DocResult};
pub use node::{Audience, ProjectInfo, ProjectKind};
pub use operation::{OperationDef, OperationGroup};
pub use options_class::{OptionsClassDef, PropertyDef};
pub use params::{ParamDef, ReturnDef, TypeParamDef};
pub use r#enum::{EnumDef, EnumRegistry};

// Pipeline
pub use docgen::{GenerationOutput, Generator, GeneratorConfig};
pub use example::ExampleGenerator;
pub use render::{BackendRenderer, FrontendRenderer, Renderer};
pub use router::{FileLevel, FsStreamFactory, MemoryStreamFactory, StreamFactory};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
