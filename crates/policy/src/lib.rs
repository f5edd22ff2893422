//! Content policy for plot documents.
//!
//! Two consumers share one [`PatternCatalog`] and one [`UrlScreen`]:
//!
//! - [`Validator`]: the admission gate. Runs every pass over a document and
//!   returns a [`ValidationVerdict`]; it never returns an error and never
//!   panics out to the caller.
//! - [`Scanner`]: the lint tool. Enumerates findings per file for an operator
//!   to review and never decides validity. [`Scanner::scan_dir`] is the batch
//!   driver behind `plotgrid scan`.
//!
//! Embedded code is only ever inspected as text. Nothing here evaluates it.

mod agent;
mod catalog;
mod limits;
mod scanner;
mod syntax;
mod validator;

pub use agent::is_ai_agent;
pub use catalog::{CodeLanguage, DangerousPattern, PatternCatalog, UrlFinding, UrlKind, UrlScreen, catalog};
pub use limits::PolicyLimits;
pub use scanner::{BatchScanReport, FileScanReport, ScanError, ScanReport, Scanner};
pub use syntax::{JsBalance, PySyntaxError, check_python, js_balance};
pub use validator::{ValidationVerdict, Validator};
