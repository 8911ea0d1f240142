//! Text file to printing-module transformation.
//!
//! This crate turns a text file into a module exporting a `print` function
//! that writes the file out line by line. It handles:
//! - Splitting the source into lines once and sharing the split
//! - Rendering each line as an escaped `console.log` statement
//! - Building a source map from every statement back to its line
//! - Talking to the host build tool through the [`Host`] and [`Loader`] traits
//!
//! # Example
//!
//! ```
//! use print_loader::{transform, ResourceIdentity, HEADER_LINES};
//!
//! let resource = ResourceIdentity::new("/proj/app/style/main.scss", "/proj");
//! let result = transform("body{\n  background:yellow;\n}", &resource).unwrap();
//!
//! assert_eq!(result.relative_path, "app/style/main.scss");
//! for record in result.records() {
//!     assert_eq!(record.generated_line, record.original_line + HEADER_LINES);
//! }
//! println!("module:\n{}", result.code);
//! ```

mod document;
mod error;
mod escape;
mod loader;
mod position_map;
mod resource;
mod start_case;
mod template;
mod transform;

pub use document::SourceDocument;
pub use error::TransformError;
pub use escape::{js_string, push_js_string};
pub use loader::{Host, Loader, LoaderKind, LoaderOutput, PrintLoader, StartCaseLoader};
pub use position_map::{build_position_map, position_records, PositionRecord, ORIGINAL_COLUMN};
pub use resource::ResourceIdentity;
pub use start_case::{start_case, start_case_lines};
pub use template::{Template, HEADER_LINES, PRINT_TEMPLATE, STATEMENT_COLUMN};
pub use transform::{self_check, transform, transform_bytes, TransformResult};
