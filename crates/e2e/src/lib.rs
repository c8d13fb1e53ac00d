//! Pagelog instrumented browser automation
//!
//! Wraps the primitives of a browser automation driver so that every
//! operation:
//! - logs a start record naming the operation and a readable subject
//! - measures elapsed time and reports success / performance records
//! - captures a screenshot when it fails, then returns the driver's own
//!   error untouched
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  InstrumentedPage<D: Driver>                                │
//! │    ├── goto / get_by_role / click / fill / get_text         │
//! │    ├── wait_for_selector / wait_for_load_state              │
//! │    ├── evaluate / screenshot                                │
//! │    └── instrument(op, subject, call)                        │
//! │          ├── Target::describe()  -> subject label           │
//! │          ├── Logger (pagelog-logging)                       │
//! │          └── FailureCapture::capture() -> Option<PathBuf>   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Settings (resolved from RunConfig + environment)           │
//! │    ├── log: LogConfig                                       │
//! │    ├── screenshot { enabled, on_failure, dir }              │
//! │    └── timeouts { element_ms, page_ms }                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod capture;
pub mod driver;
pub mod error;
pub mod page;
pub mod settings;
pub mod target;

pub use capture::FailureCapture;
pub use driver::{AttributeSet, AttributeSource, Driver};
pub use error::{CaptureError, DescriptionError, E2eError, E2eResult};
pub use page::{instrument, InstrumentedPage, Operation};
pub use settings::{RunConfig, ScreenshotConfig, Settings, Timeouts};
pub use target::Target;
