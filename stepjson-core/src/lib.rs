//! stepjson Core Parser
//!
//! Incremental, pausable parser for a lenient JSON-like notation. Builds an
//! owned element tree and can stop after any token, so a host can spread a
//! large parse over many scheduler ticks.
//!
//! # Architecture
//!
//! - **parser.rs** - Resumable state machine, one-shot `parse` entry points
//! - **scan.rs** - memchr-based delimiter search, token trimming
//! - **pause.rs** - Pause policies consulted once per token
//! - **element.rs** - Element tree (Primitive, List, Object)
//! - **render.rs** - Compact and pretty rendering
//! - **value.rs** - Typed coercion of primitive values
//! - **config.rs** - Access mode, scan mode, depth limit
//! - **error.rs** - Parse and coercion errors
//!
//! # Example
//!
//! ```
//! use stepjson_core::{Parser, ParseStatus, TokenBudget};
//!
//! let mut parser = Parser::new(r#"{"ore":"12","rate":"0.5"}"#, TokenBudget::new(2));
//! while parser.resume()? == ParseStatus::Suspended {
//!     // yield to the host scheduler here
//! }
//!
//! let root = parser.into_result().unwrap();
//! let rate: f64 = root.as_object().unwrap()["rate"].as_primitive().unwrap().get()?;
//! assert_eq!(rate, 0.5);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod element;
pub mod error;
pub mod parser;
pub mod pause;
pub mod render;
pub mod scan;
pub mod value;

pub use config::{AccessMode, ParserConfig, ScanMode};
pub use element::{Element, ElementKind, List, Object, Primitive};
pub use error::{CoerceError, ParseError};
pub use parser::{parse, parse_with, ParseStatus, Parser};
pub use pause::{EveryToken, Never, PausePolicy, TokenBudget};
pub use scan::{DelimiterSet, Scanner};
pub use value::{FromPrimitive, Value, ValueKind};
