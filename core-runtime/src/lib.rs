//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the file bridge:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Event bus system
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the document operations and the
//! service façade depend on. It establishes the logging conventions, the
//! validated [`BridgeConfig`](config::BridgeConfig) that carries every
//! injected bridge, and the event bus hosts subscribe to.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{BridgeConfig, BridgeConfigBuilder, ShareTitle};
pub use error::{Error, Result};
pub use events::{CoreEvent, DocumentEvent, EventBus, EventSeverity, EventStream, HostEvent};
